//! Certificate data models.

use serde::{Deserialize, Serialize};

use crate::schema::CertificateKind;

/// Structured record extracted from one certificate.
///
/// Every field except `kind` is optional. An absent field means nothing
/// plausible was read, which callers must treat as "needs manual entry".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCertificate {
    /// Form identifier, assigned by the caller.
    pub kind: CertificateKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Personal identity number, digits only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_id: Option<String>,

    /// Specialty the application concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty_header: Option<String>,

    /// Normalized, de-duplicated and regime-sorted competency codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competency_codes: Vec<String>,

    /// Short title field: course subject, essay topic, audit venue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Principal free-text field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_period: Option<ServicePeriod>,

    /// Printed course-leader name (2015 course certificates).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_leader: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer: Option<Signer>,
}

impl ParsedCertificate {
    /// Create a record carrying only the kind.
    pub fn empty(kind: CertificateKind) -> Self {
        Self {
            kind,
            full_name: None,
            first_name: None,
            last_name: None,
            personal_id: None,
            specialty_header: None,
            competency_codes: Vec::new(),
            subject: None,
            description: None,
            service_period: None,
            course_leader: None,
            signer: None,
        }
    }

    /// Whether any name or the personal id was resolved.
    pub fn has_identity(&self) -> bool {
        self.full_name.is_some()
            || self.first_name.is_some()
            || self.last_name.is_some()
            || self.personal_id.is_some()
    }

    /// Number of populated top-level fields, `kind` excluded.
    pub fn populated_fields(&self) -> usize {
        [
            self.full_name.is_some(),
            self.first_name.is_some(),
            self.last_name.is_some(),
            self.personal_id.is_some(),
            self.specialty_header.is_some(),
            !self.competency_codes.is_empty(),
            self.subject.is_some(),
            self.description.is_some(),
            self.service_period.is_some(),
            self.course_leader.is_some(),
            self.signer.is_some(),
        ]
        .iter()
        .filter(|populated| **populated)
        .count()
    }

    /// True when nothing but `kind` is set.
    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }

    /// Names of the fields that were not read, for "please complete" prompts.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.full_name.is_none() {
            missing.push("fullName");
        }
        if self.personal_id.is_none() {
            missing.push("personalId");
        }
        if self.specialty_header.is_none() {
            missing.push("specialtyHeader");
        }
        if self.competency_codes.is_empty() {
            missing.push("competencyCodes");
        }
        if self.subject.is_none() {
            missing.push("subject");
        }
        if self.description.is_none() {
            missing.push("description");
        }
        if self.kind.has_date_fields() && self.service_period.is_none() {
            missing.push("servicePeriod");
        }
        if self.signer.as_ref().and_then(|s| s.name.as_ref()).is_none() {
            missing.push("signer.name");
        }
        missing
    }
}

/// Service period with ISO 8601 dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePeriod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl ServicePeriod {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

/// Person who signed the certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub speciality: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<SignerRole>,
}

impl Signer {
    /// True when no identifying signer field was read. The role alone does not count.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.speciality.is_none() && self.site.is_none()
    }
}

/// Role of the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignerRole {
    /// Handledare.
    Supervisor,
    /// Kursledare.
    CourseLeader,
}

impl SignerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supervisor => "supervisor",
            Self::CourseLeader => "courseLeader",
        }
    }
}

/// Raw OCR output handed to the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrInput {
    /// Full recognized text, lines separated by newlines.
    pub text: String,

    /// Word boxes in image pixel coordinates, when the OCR engine supplies them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<WordBox>,

    /// Page size in pixels (width, height), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<(f32, f32)>,
}

impl OcrInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            words: Vec::new(),
            page_size: None,
        }
    }

    pub fn with_words(mut self, words: Vec<WordBox>) -> Self {
        self.words = words;
        self
    }

    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_size = Some((width, height));
        self
    }
}

/// A recognized word with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    pub text: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl WordBox {
    pub fn new(text: impl Into<String>, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            text: text.into(),
            x1,
            y1,
            x2,
            y2,
            confidence: None,
        }
    }

    /// Axis-aligned rectangle (min_x, min_y, max_x, max_y).
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        (
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }
}
