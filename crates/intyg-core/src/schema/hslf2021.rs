//! Forms under HSLF-FS 2021:8, appendices 8 to 13.
//!
//! Appendices 5 to 7 are administrative and have no schema.

use super::common::{
    applicant_fields, bilaga_header, checkbox_rows, description, reject_values, shared_boilerplate,
    signer_fields, terminators,
};
use super::{CertificateKind, FieldKey, LabelSchemaEntry, Pattern, RolePolicy, Schema};
use crate::extract::rules::{strip_purpose_suffix, tidy};

fn boilerplate(bilaga: u8, extra: Vec<Pattern>) -> Vec<Pattern> {
    let mut patterns = shared_boilerplate();
    patterns.push(Pattern::re(r"(?i)^HSLF-FS\s*2021\s*:\s*8"));
    patterns.push(Pattern::re(r"^2021-2-7212\b"));
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

/// Site on its own line; a period printed beside it is split off.
fn site() -> LabelSchemaEntry {
    LabelSchemaEntry::new(
        FieldKey::SubjectAndPeriod,
        vec![Pattern::starts_with("Tjänstgöringsställe")],
    )
    .post(strip_purpose_suffix)
}

fn period() -> LabelSchemaEntry {
    LabelSchemaEntry::new(FieldKey::Period, vec![Pattern::starts_with("Period")])
}

fn activities_and_verification() -> Vec<LabelSchemaEntry> {
    vec![
        description(vec![Pattern::contains(
            "Utbildningsaktiviteter som sökanden genomfört",
        )]),
        LabelSchemaEntry::block(
            FieldKey::Verification,
            vec![Pattern::contains("Hur det kontrollerats")],
            vec![Pattern::starts_with("Intygande"), Pattern::exact("Handledare")],
        ),
    ]
}

pub(super) fn schemas() -> Vec<Schema> {
    vec![
        schema(
            CertificateKind::Ausk2021,
            8,
            vec![
                site(),
                period(),
                description(vec![Pattern::contains("Beskrivning av auskultationen")]),
            ],
            vec![Pattern::re(r"(?i)^Auskultation$")],
            RolePolicy::Supervisor,
        ),
        schema(
            CertificateKind::Klin2021,
            9,
            vec![
                site(),
                period(),
                description(vec![Pattern::contains(
                    "Beskrivning av den kliniska tjänstgöringen",
                )]),
            ],
            vec![Pattern::re(r"(?i)^Klinisk\s+tjänstgöring\s+under\s+handledning$")],
            RolePolicy::Supervisor,
        ),
        schema(
            CertificateKind::Kurs2021,
            10,
            vec![
                LabelSchemaEntry::new(FieldKey::Subject, vec![Pattern::contains("Kursens ämne")])
                    .post(tidy),
                period(),
                description(vec![Pattern::contains("Beskrivning av kursen")]),
            ],
            vec![Pattern::re(r"(?i)^Kurs$"), checkbox_rows()],
            RolePolicy::Checkbox,
        ),
        schema(
            CertificateKind::Utv2021,
            11,
            vec![
                LabelSchemaEntry::new(
                    FieldKey::Subject,
                    vec![Pattern::contains("Utvecklingsarbetets ämne")],
                )
                .post(tidy),
                description(vec![Pattern::contains("Beskrivning av ST-läkarens deltagande")]),
            ],
            vec![Pattern::re(r"(?i)^Deltagande\s+i\s+utvecklingsarbete$")],
            RolePolicy::Supervisor,
        ),
        schema(
            CertificateKind::Sta3,
            12,
            activities_and_verification(),
            vec![],
            RolePolicy::Supervisor,
        ),
        schema(
            CertificateKind::Tredjeland2021,
            13,
            activities_and_verification(),
            vec![Pattern::re(r"(?i)^Delmål\s+för\s+specialistläkare\s+från\s+tredjeland$")],
            RolePolicy::Supervisor,
        ),
    ]
}
