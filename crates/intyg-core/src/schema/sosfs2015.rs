//! Forms under SOSFS 2015:8, appendices 3 to 7.
//!
//! Label and boilerplate text follows the printed templates word for word.

use super::common::{
    applicant_fields, bilaga_header, checkbox_rows, description, reject_values, shared_boilerplate,
    signer_fields, terminators,
};
use super::{CertificateKind, FieldKey, LabelSchemaEntry, Pattern, RolePolicy, Schema};
use crate::extract::rules::{strip_purpose_suffix, tidy};

fn boilerplate(bilaga: u8, extra: Vec<Pattern>) -> Vec<Pattern> {
    let mut patterns = shared_boilerplate();
    patterns.push(Pattern::verbatim(&format!("SOSFS 2015:8 - Bilaga {}", bilaga)));
    patterns.push(Pattern::re(r"(?i)^SOSFS\s*2015\s*:\s*8"));
    patterns.push(bilaga_header(bilaga));
    patterns.extend(extra);
    patterns
}

fn schema(
    kind: CertificateKind,
    bilaga: u8,
    activity: Vec<LabelSchemaEntry>,
    extra_boilerplate: Vec<Pattern>,
    role: RolePolicy,
) -> Schema {
    let mut fields = applicant_fields();
    fields.extend(activity);
    fields.extend(signer_fields());
    Schema {
        kind,
        fields,
        boilerplate: boilerplate(bilaga, extra_boilerplate),
        terminators: terminators(),
        reject_values: reject_values(),
        role,
    }
}

fn site_and_period() -> LabelSchemaEntry {
    LabelSchemaEntry::new(
        FieldKey::SubjectAndPeriod,
        vec![Pattern::contains("Tjänstgöringsställe och period")],
    )
    .post(strip_purpose_suffix)
}

pub(super) fn schemas() -> Vec<Schema> {
    vec![
        schema(
            CertificateKind::Ausk2015,
            3,
            vec![
                site_and_period(),
                description(vec![Pattern::starts_with("Beskrivning av auskultationen")]),
            ],
            vec![Pattern::re(r"(?i)^Auskultation$")],
            RolePolicy::Supervisor,
        ),
        schema(
            CertificateKind::Klin2015,
            4,
            vec![
                site_and_period(),
                description(vec![Pattern::starts_with(
                    "Beskrivning av den kliniska tjänstgöringen",
                )]),
            ],
            vec![Pattern::re(r"(?i)^Klinisk\s+tjänstgöring\s+under\s+handledning$")],
            RolePolicy::Supervisor,
        ),
        schema(
            CertificateKind::Kurs2015,
            5,
            vec![
                LabelSchemaEntry::new(
                    FieldKey::SubjectAndPeriod,
                    vec![
                        Pattern::contains("Ämne (i rubrikform) och period"),
                        Pattern::starts_with("Ämne i rubrikform"),
                    ],
                )
                .post(strip_purpose_suffix),
                LabelSchemaEntry::new(FieldKey::CourseLeader, vec![Pattern::exact("Kursledare")])
                    .post(tidy),
                description(vec![Pattern::starts_with("Beskrivning av kursen")]),
            ],
            vec![Pattern::re(r"(?i)^Kurs$"), checkbox_rows()],
            RolePolicy::Checkbox,
        ),
        schema(
            CertificateKind::Utv2015,
            6,
            vec![
                LabelSchemaEntry::new(
                    FieldKey::Subject,
                    vec![Pattern::all_of(&["Ämne för kvalitets", "utvecklingsarbete"])],
                )
                .post(tidy),
                description(vec![Pattern::all_of(&[
                    "Beskrivning av kvalitets",
                    "utvecklingsarbetet",
                ])]),
            ],
            vec![
                Pattern::verbatim("Kvalitets- och utvecklingsarbete"),
                Pattern::re(r"(?i)^Kvalitets[- ]?\s*och\s+utvecklingsarbete$"),
            ],
            RolePolicy::Supervisor,
        ),
        schema(
            CertificateKind::Skriftligt2015,
            7,
            vec![
                LabelSchemaEntry::new(
                    FieldKey::Subject,
                    vec![Pattern::contains("Ämne för självständigt skriftligt arbete")],
                )
                .post(tidy),
                description(vec![Pattern::contains(
                    "Beskrivning av det självständiga skriftliga arbetet",
                )]),
            ],
            vec![Pattern::re(
                r"(?i)^Självständigt\s+skriftligt\s+arbete(?:\s+enligt\s+vetenskapliga\s+principer)?$",
            )],
            RolePolicy::Supervisor,
        ),
    ]
}
