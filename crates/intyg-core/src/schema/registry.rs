//! Certificate kinds and the kind → schema lookup.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::{hslf2021, sosfs2015, Schema};
use crate::error::IntygError;

/// Regulation a form belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// SOSFS 2015:8, codes `a1`..`c14`.
    #[serde(rename = "SOSFS 2015:8")]
    Sosfs2015,
    /// HSLF-FS 2021:8, codes `STa1`..`STc14`.
    #[serde(rename = "HSLF-FS 2021:8")]
    Hslf2021,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Sosfs2015 => "SOSFS 2015:8",
            Regime::Hslf2021 => "HSLF-FS 2021:8",
        }
    }
}

/// Certificate form, as classified upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateKind {
    #[serde(rename = "2015-B3-AUSK")]
    Ausk2015,
    #[serde(rename = "2015-B4-KLIN")]
    Klin2015,
    #[serde(rename = "2015-B5-KURS")]
    Kurs2015,
    #[serde(rename = "2015-B6-UTV")]
    Utv2015,
    #[serde(rename = "2015-B7-SKRIFTLIGT")]
    Skriftligt2015,
    #[serde(rename = "2021-B5-ANS")]
    Ans2021,
    #[serde(rename = "2021-B6-FULLST")]
    Fullst2021,
    #[serde(rename = "2021-B7-UPPN")]
    Uppn2021,
    #[serde(rename = "2021-B8-AUSK")]
    Ausk2021,
    #[serde(rename = "2021-B9-KLIN")]
    Klin2021,
    #[serde(rename = "2021-B10-KURS")]
    Kurs2021,
    #[serde(rename = "2021-B11-UTV")]
    Utv2021,
    #[serde(rename = "2021-B12-STa3")]
    Sta3,
    #[serde(rename = "2021-B13-TREDJELAND")]
    Tredjeland2021,
}

const ALL_KINDS: [CertificateKind; 14] = [
    CertificateKind::Ausk2015,
    CertificateKind::Klin2015,
    CertificateKind::Kurs2015,
    CertificateKind::Utv2015,
    CertificateKind::Skriftligt2015,
    CertificateKind::Ans2021,
    CertificateKind::Fullst2021,
    CertificateKind::Uppn2021,
    CertificateKind::Ausk2021,
    CertificateKind::Klin2021,
    CertificateKind::Kurs2021,
    CertificateKind::Utv2021,
    CertificateKind::Sta3,
    CertificateKind::Tredjeland2021,
];

impl CertificateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateKind::Ausk2015 => "2015-B3-AUSK",
            CertificateKind::Klin2015 => "2015-B4-KLIN",
            CertificateKind::Kurs2015 => "2015-B5-KURS",
            CertificateKind::Utv2015 => "2015-B6-UTV",
            CertificateKind::Skriftligt2015 => "2015-B7-SKRIFTLIGT",
            CertificateKind::Ans2021 => "2021-B5-ANS",
            CertificateKind::Fullst2021 => "2021-B6-FULLST",
            CertificateKind::Uppn2021 => "2021-B7-UPPN",
            CertificateKind::Ausk2021 => "2021-B8-AUSK",
            CertificateKind::Klin2021 => "2021-B9-KLIN",
            CertificateKind::Kurs2021 => "2021-B10-KURS",
            CertificateKind::Utv2021 => "2021-B11-UTV",
            CertificateKind::Sta3 => "2021-B12-STa3",
            CertificateKind::Tredjeland2021 => "2021-B13-TREDJELAND",
        }
    }

    pub fn regime(&self) -> Regime {
        match self {
            CertificateKind::Ausk2015
            | CertificateKind::Klin2015
            | CertificateKind::Kurs2015
            | CertificateKind::Utv2015
            | CertificateKind::Skriftligt2015 => Regime::Sosfs2015,
            _ => Regime::Hslf2021,
        }
    }

    /// Whether the printed form carries a service period.
    pub fn has_date_fields(&self) -> bool {
        !matches!(
            self,
            CertificateKind::Utv2015 | CertificateKind::Skriftligt2015 | CertificateKind::Utv2021
        )
    }

    /// Administrative forms describe no training activity.
    pub fn is_administrative(&self) -> bool {
        matches!(
            self,
            CertificateKind::Ans2021 | CertificateKind::Fullst2021 | CertificateKind::Uppn2021
        )
    }

    /// Course forms, where a course leader may sign instead of a supervisor.
    pub fn is_course(&self) -> bool {
        matches!(self, CertificateKind::Kurs2015 | CertificateKind::Kurs2021)
    }
}

impl fmt::Display for CertificateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateKind {
    type Err = IntygError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL_KINDS
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| IntygError::UnknownKind(wanted.to_string()))
    }
}

/// Every known kind, in form order.
pub fn all_kinds() -> &'static [CertificateKind] {
    &ALL_KINDS
}

lazy_static! {
    static ref SCHEMAS: HashMap<CertificateKind, Schema> = sosfs2015::schemas()
        .into_iter()
        .chain(hslf2021::schemas())
        .map(|s| (s.kind, s))
        .collect();
}

/// Schema for a kind. `None` means the form has no activity to extract.
pub fn get_schema(kind: CertificateKind) -> Option<&'static Schema> {
    SCHEMAS.get(&kind)
}

/// Whether a kind's form carries a service period.
pub fn has_date_fields(kind: CertificateKind) -> bool {
    kind.has_date_fields()
}

/// Fixed UI headings for a kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLabels {
    pub title: &'static str,
    pub subject_label: &'static str,
    pub description_label: &'static str,
}

pub fn display_labels(kind: CertificateKind) -> DisplayLabels {
    let base = DisplayLabels {
        title: "",
        subject_label: "Tjänstgöringsställe",
        description_label: "Beskrivning av den kliniska tjänstgöringen",
    };

    match kind {
        CertificateKind::Ausk2015 | CertificateKind::Ausk2021 => DisplayLabels {
            title: "Intyg för auskultation",
            description_label: "Beskrivning av auskultationen",
            ..base
        },
        CertificateKind::Klin2015 | CertificateKind::Klin2021 => DisplayLabels {
            title: "Intyg för klinisk tjänstgöring",
            ..base
        },
        CertificateKind::Kurs2015 | CertificateKind::Kurs2021 => DisplayLabels {
            title: "Intyg för kurs",
            subject_label: "Kursens ämne",
            description_label: "Beskrivning av kursen",
        },
        CertificateKind::Utv2015 | CertificateKind::Utv2021 => DisplayLabels {
            title: "Intyg för kvalitets- och utvecklingsarbete",
            subject_label: "Ämne (rubrik)",
            description_label: "Beskrivning av kvalitets- och utvecklingsarbete",
        },
        CertificateKind::Skriftligt2015 => DisplayLabels {
            title: "Självständigt skriftligt arbete",
            subject_label: "Ämne (rubrik)",
            description_label: "Beskrivning av det självständiga skriftliga arbetet",
        },
        CertificateKind::Sta3 => DisplayLabels {
            title: "Intyg för delmål STa3",
            description_label: "Utbildningsaktiviteter och hur det kontrollerats",
            ..base
        },
        CertificateKind::Tredjeland2021 => DisplayLabels {
            title: "Intyg för specialistläkare från tredjeland",
            description_label: "Utbildningsaktiviteter och hur det kontrollerats",
            ..base
        },
        CertificateKind::Ans2021 | CertificateKind::Fullst2021 | CertificateKind::Uppn2021 => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in all_kinds() {
            assert_eq!(kind.as_str().parse::<CertificateKind>().unwrap(), *kind);
        }
        assert_eq!("2021-b12-sta3".parse::<CertificateKind>().unwrap(), CertificateKind::Sta3);
    }

    #[test]
    fn test_unknown_kind() {
        let err = "2021-B99-NOPE".parse::<CertificateKind>().unwrap_err();
        assert!(matches!(err, IntygError::UnknownKind(k) if k == "2021-B99-NOPE"));
    }

    #[test]
    fn test_serde_uses_form_ids() {
        let json = serde_json::to_string(&CertificateKind::Kurs2021).unwrap();
        assert_eq!(json, "\"2021-B10-KURS\"");
    }

    #[test]
    fn test_every_activity_kind_has_matching_schema() {
        for kind in all_kinds() {
            match get_schema(*kind) {
                Some(schema) => {
                    assert!(!kind.is_administrative(), "{kind} should have no schema");
                    assert_eq!(schema.kind, *kind);
                    assert_eq!(schema.regime(), kind.regime());
                    assert!(!schema.fields.is_empty());
                }
                None => assert!(kind.is_administrative(), "{kind} is missing a schema"),
            }
        }
    }

    #[test]
    fn test_date_fields() {
        assert!(!has_date_fields(CertificateKind::Utv2015));
        assert!(!has_date_fields(CertificateKind::Skriftligt2015));
        assert!(!has_date_fields(CertificateKind::Utv2021));
        assert!(has_date_fields(CertificateKind::Klin2015));
        assert!(has_date_fields(CertificateKind::Kurs2021));
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(display_labels(CertificateKind::Kurs2021).title, "Intyg för kurs");
        assert_eq!(
            display_labels(CertificateKind::Ausk2015).description_label,
            "Beskrivning av auskultationen"
        );
        assert_eq!(display_labels(CertificateKind::Ans2021).title, "");
    }
}
