//! Declarative per-kind label schemas.
//!
//! A schema is pure data: which printed labels exist on a form, which of them
//! open a multi-line value, which lines are boilerplate, and which cleanup
//! runs on a captured value. One scan engine interprets every schema.
//!
//! All label comparison goes through [`fold`], so "Tjänst- göringsställe:" and
//! "tjanstgoringsstalle" are the same label.

mod common;
mod hslf2021;
pub mod registry;
mod sosfs2015;
pub mod zones;

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::fold;

pub use registry::{
    all_kinds, display_labels, get_schema, has_date_fields, CertificateKind, DisplayLabels, Regime,
};
pub use zones::{zone_map, Zone, ZoneMap, ZoneRect, ZoneTarget};

/// Line predicate used for labels, boilerplate and stop conditions.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Folded line equals the folded literal.
    Exact(String),
    /// Folded line contains the folded literal.
    Contains(String),
    /// Folded line starts with the folded literal.
    StartsWith(String),
    /// Folded line contains every folded literal.
    AllOf(Vec<String>),
    /// Trimmed line equals the literal as printed, case and accents included.
    Verbatim(String),
    /// Regex over the trimmed line.
    Regex(Regex),
}

impl Pattern {
    pub fn exact(s: &str) -> Self {
        Pattern::Exact(fold(s))
    }

    pub fn contains(s: &str) -> Self {
        Pattern::Contains(fold(s))
    }

    pub fn starts_with(s: &str) -> Self {
        Pattern::StartsWith(fold(s))
    }

    pub fn all_of(parts: &[&str]) -> Self {
        Pattern::AllOf(parts.iter().map(|p| fold(p)).collect())
    }

    pub fn verbatim(s: &str) -> Self {
        Pattern::Verbatim(s.to_string())
    }

    /// Regex pattern for static schema tables.
    ///
    /// # Panics
    ///
    /// On an invalid pattern. Only called while building the lazy statics.
    pub fn re(pattern: &str) -> Self {
        Pattern::Regex(Regex::new(pattern).unwrap())
    }

    /// Match against a line's raw text and its folded key.
    pub fn matches(&self, text: &str, key: &str) -> bool {
        match self {
            Pattern::Exact(p) => !key.is_empty() && key == p,
            Pattern::Contains(p) => !p.is_empty() && key.contains(p.as_str()),
            Pattern::StartsWith(p) => !p.is_empty() && key.starts_with(p.as_str()),
            Pattern::AllOf(parts) => !parts.is_empty() && parts.iter().all(|p| key.contains(p.as_str())),
            Pattern::Verbatim(p) => text.trim() == p,
            Pattern::Regex(re) => re.is_match(text.trim()),
        }
    }

    /// Match a whole line, or the label part before its colon.
    pub fn matches_line(&self, line: &Line) -> bool {
        if self.matches(&line.text, &line.key) {
            return true;
        }
        match &line.inline {
            Some(inline) => self.matches(&inline.head, &inline.head_key),
            None => false,
        }
    }
}

/// A "Label: value" split of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineValue {
    pub head: String,
    pub head_key: String,
    pub value: String,
}

/// One non-empty line of normalized text, with its comparison key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub key: String,
    pub inline: Option<InlineValue>,
}

impl Line {
    pub fn new(text: &str) -> Self {
        let text = text.trim().to_string();
        let inline = text.split_once(':').and_then(|(head, value)| {
            let head_key = fold(head);
            let value = value.trim();
            (!head_key.is_empty() && !value.is_empty()).then(|| InlineValue {
                head: head.trim().to_string(),
                head_key,
                value: value.to_string(),
            })
        });
        Self {
            key: fold(&text),
            text,
            inline,
        }
    }

    /// Split normalized text into non-empty lines.
    pub fn split(text: &str) -> Vec<Line> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(Line::new)
            .collect()
    }
}

/// Part of the form a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// The applicant block at the top of every form.
    Applicant,
    /// The certifying supervisor or course leader block.
    Signer,
}

lazy_static! {
    // Printed headings that open a section. A line belongs to the section of
    // the nearest anchor above it.
    static ref SECTION_ANCHORS: Vec<(Pattern, Section)> = vec![
        (Pattern::exact("Sökande"), Section::Applicant),
        (Pattern::exact("Efternamn"), Section::Applicant),
        (Pattern::exact("Förnamn"), Section::Applicant),
        (Pattern::all_of(&["Efternamn", "Förnamn"]), Section::Applicant),
        (Pattern::contains("Specialitet som ansökan avser"), Section::Applicant),
        (Pattern::contains("Delmål som intyget avser"), Section::Applicant),
        (Pattern::exact("Intygande"), Section::Signer),
        (Pattern::exact("Handledare"), Section::Signer),
        (Pattern::starts_with("Namnförtydligande"), Section::Signer),
        (Pattern::starts_with("Tjänsteställe"), Section::Signer),
        (Pattern::starts_with("Ort och datum"), Section::Signer),
        (Pattern::starts_with("Namnteckning"), Section::Signer),
    ];
}

/// Section of every line, resolved by the nearest preceding anchor.
///
/// Lines above the first anchor count as applicant lines.
pub fn sections(lines: &[Line]) -> Vec<Section> {
    let mut current = Section::Applicant;
    lines
        .iter()
        .map(|line| {
            if let Some((_, section)) = SECTION_ANCHORS.iter().find(|(p, _)| p.matches_line(line)) {
                current = *section;
            }
            current
        })
        .collect()
}

/// Logical field a label feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    LastName,
    FirstName,
    /// Combined "Efternamn Förnamn" value, read as "Last First".
    NameLastFirst,
    PersonalId,
    Specialty,
    CompetencyCodes,
    Subject,
    /// Site or subject with a service period on the same line.
    SubjectAndPeriod,
    Period,
    Description,
    /// Second free-text block, appended to the description.
    Verification,
    CourseLeader,
    SignerName,
    SignerSpecialty,
    SignerSite,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::LastName => "lastName",
            FieldKey::FirstName => "firstName",
            FieldKey::NameLastFirst => "nameLastFirst",
            FieldKey::PersonalId => "personalId",
            FieldKey::Specialty => "specialty",
            FieldKey::CompetencyCodes => "competencyCodes",
            FieldKey::Subject => "subject",
            FieldKey::SubjectAndPeriod => "subjectAndPeriod",
            FieldKey::Period => "period",
            FieldKey::Description => "description",
            FieldKey::Verification => "verification",
            FieldKey::CourseLeader => "courseLeader",
            FieldKey::SignerName => "signerName",
            FieldKey::SignerSpecialty => "signerSpecialty",
            FieldKey::SignerSite => "signerSite",
        }
    }

    /// Whether the field belongs to the signer block.
    pub fn is_signer(&self) -> bool {
        matches!(self, FieldKey::SignerName | FieldKey::SignerSpecialty | FieldKey::SignerSite)
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cleanup applied to a captured value before assembly.
pub type PostProcess = fn(&str) -> String;

/// One field of a schema: where its value is printed and how to read it.
#[derive(Debug, Clone)]
pub struct LabelSchemaEntry {
    pub field: FieldKey,
    pub label_variants: Vec<Pattern>,
    pub multiline: bool,
    pub stop_patterns: Vec<Pattern>,
    /// Only label lines in this section count.
    pub section: Option<Section>,
    pub post_process: Option<PostProcess>,
}

impl LabelSchemaEntry {
    /// Single-line field.
    pub fn new(field: FieldKey, label_variants: Vec<Pattern>) -> Self {
        Self {
            field,
            label_variants,
            multiline: false,
            stop_patterns: Vec::new(),
            section: None,
            post_process: None,
        }
    }

    /// Multi-line field ending at another label or one of `stops`.
    pub fn block(field: FieldKey, label_variants: Vec<Pattern>, stops: Vec<Pattern>) -> Self {
        Self {
            multiline: true,
            stop_patterns: stops,
            ..Self::new(field, label_variants)
        }
    }

    pub fn in_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    pub fn post(mut self, post_process: PostProcess) -> Self {
        self.post_process = Some(post_process);
        self
    }

    pub fn is_label(&self, line: &Line) -> bool {
        self.label_variants.iter().any(|p| p.matches_line(line))
    }

    pub fn is_stop(&self, line: &Line) -> bool {
        self.stop_patterns.iter().any(|p| p.matches_line(line))
    }

    /// Run the post-processing step, dropping values that end up empty.
    pub fn apply(&self, value: &str) -> Option<String> {
        let value = match self.post_process {
            Some(post) => post(value),
            None => value.trim().to_string(),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// How the signer role is decided for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePolicy {
    /// Always the supervisor when a signer was read.
    Supervisor,
    /// Read from the "Kursledare / Handledare" checkbox pair.
    Checkbox,
}

/// Complete label schema for one certificate kind.
#[derive(Debug, Clone)]
pub struct Schema {
    pub kind: CertificateKind,
    pub fields: Vec<LabelSchemaEntry>,
    /// Static text printed on every copy of the form.
    pub boilerplate: Vec<Pattern>,
    /// Printed labels that carry no field but end a multi-line value.
    pub terminators: Vec<Pattern>,
    /// Values that are label text misread as a value.
    pub reject_values: Vec<Pattern>,
    pub role: RolePolicy,
}

impl Schema {
    pub fn regime(&self) -> Regime {
        self.kind.regime()
    }

    pub fn entry(&self, field: FieldKey) -> Option<&LabelSchemaEntry> {
        self.fields.iter().find(|e| e.field == field)
    }

    pub fn is_boilerplate(&self, line: &Line) -> bool {
        self.boilerplate.iter().any(|p| p.matches(&line.text, &line.key))
    }

    /// Whether the line is any printed label of this form.
    pub fn is_label(&self, line: &Line) -> bool {
        self.fields.iter().any(|e| e.is_label(line)) || self.is_terminator(line)
    }

    pub fn is_terminator(&self, line: &Line) -> bool {
        self.terminators.iter().any(|p| p.matches_line(line))
    }

    pub fn rejects(&self, value: &str) -> bool {
        self.reject_values.iter().any(|p| p.matches(value, &fold(value)))
    }

    /// Field whose label the line carries, honoring section bindings.
    pub fn field_for_label(&self, line: &Line, section: Section) -> Option<&LabelSchemaEntry> {
        self.fields
            .iter()
            .filter(|e| e.section.is_none_or(|s| s == section))
            .find(|e| e.is_label(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pattern_is_accent_and_space_insensitive() {
        let line = Line::new("Tjänst- göringsställe");
        assert!(Pattern::exact("Tjänstgöringsställe").matches_line(&line));
        assert!(Pattern::exact("TJANSTGORINGSSTALLE").matches_line(&line));
        assert!(!Pattern::exact("Tjänsteställe").matches_line(&line));
    }

    #[test]
    fn test_pattern_matches_head_before_colon() {
        let line = Line::new("Efternamn: Svensson");
        assert!(Pattern::exact("Efternamn").matches_line(&line));
        assert_eq!(line.inline.as_ref().map(|i| i.value.as_str()), Some("Svensson"));
    }

    #[test]
    fn test_verbatim_is_case_sensitive() {
        let line = Line::new("INTYG");
        assert!(Pattern::verbatim("INTYG").matches_line(&line));
        assert!(!Pattern::verbatim("Intyg").matches_line(&line));
    }

    #[test]
    fn test_line_without_value_after_colon() {
        assert_eq!(Line::new("Personnummer:").inline, None);
        assert_eq!(Line::new("10:30").inline.map(|i| i.value), Some("30".to_string()));
    }

    #[test]
    fn test_sections_follow_nearest_anchor() {
        let lines = Line::split(
            "Bilaga 3\nEfternamn\nSvensson\nSpecialitet som ansökan avser\nKirurgi\nIntygande\nSpecialitet\nKirurgi\nNamnförtydligande\nBo Berg",
        );
        let got = sections(&lines);
        assert_eq!(got[0], Section::Applicant);
        assert_eq!(got[4], Section::Applicant);
        assert_eq!(got[5], Section::Signer);
        assert_eq!(got[6], Section::Signer);
        assert_eq!(got[9], Section::Signer);
    }

    #[test]
    fn test_field_for_label_uses_section() {
        let schema = get_schema(CertificateKind::Ausk2015).unwrap();
        let line = Line::new("Specialitet");
        assert_eq!(
            schema.field_for_label(&line, Section::Signer).map(|e| e.field),
            Some(FieldKey::SignerSpecialty)
        );
        assert_eq!(
            schema.field_for_label(&line, Section::Applicant).map(|e| e.field),
            Some(FieldKey::Specialty)
        );
    }
}
