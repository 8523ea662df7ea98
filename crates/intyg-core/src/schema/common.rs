//! Labels and boilerplate shared by both regimes.

use super::{FieldKey, LabelSchemaEntry, Pattern, Section};
use crate::extract::rules::patterns::{CHECKBOX_ROLE, PAGE_COUNTER};
use crate::extract::rules::{leading_code_lines, strip_citation, strip_personal_id, tidy};

/// Printed name under "Namnförtydligande". OCR often puts the page counter
/// of the signature box there instead, and 2021 forms print the supervisor's
/// personnummer on the same row.
fn printed_name(value: &str) -> String {
    let value = strip_citation(&strip_personal_id(value));
    if PAGE_COUNTER.is_match(&value) {
        String::new()
    } else {
        value
    }
}

/// Applicant specialty. 2021 forms print it beside the personnummer.
fn applicant_specialty(value: &str) -> String {
    strip_citation(&strip_personal_id(value))
}

/// Applicant block: name, personal id, specialty and codes.
pub(super) fn applicant_fields() -> Vec<LabelSchemaEntry> {
    vec![
        LabelSchemaEntry::new(FieldKey::LastName, vec![Pattern::exact("Efternamn")]).post(tidy),
        LabelSchemaEntry::new(FieldKey::FirstName, vec![Pattern::exact("Förnamn")]).post(tidy),
        LabelSchemaEntry::new(
            FieldKey::NameLastFirst,
            vec![Pattern::all_of(&["Efternamn", "Förnamn"])],
        )
        .post(tidy),
        LabelSchemaEntry::new(FieldKey::PersonalId, vec![Pattern::starts_with("Personnummer")])
            .in_section(Section::Applicant),
        LabelSchemaEntry::new(
            FieldKey::Specialty,
            vec![
                Pattern::contains("Specialitet som ansökan avser"),
                Pattern::exact("Specialitet"),
            ],
        )
        .in_section(Section::Applicant)
        .post(applicant_specialty),
        LabelSchemaEntry::block(
            FieldKey::CompetencyCodes,
            vec![
                Pattern::contains("Delmål som intyget avser"),
                Pattern::exact("Delmål"),
            ],
            Vec::new(),
        )
        .post(leading_code_lines),
    ]
}

/// Signer block printed under "Intygande".
pub(super) fn signer_fields() -> Vec<LabelSchemaEntry> {
    vec![
        LabelSchemaEntry::new(FieldKey::SignerSpecialty, vec![Pattern::exact("Specialitet")])
            .in_section(Section::Signer)
            .post(strip_citation),
        LabelSchemaEntry::new(FieldKey::SignerSite, vec![Pattern::starts_with("Tjänsteställe")])
            .post(strip_citation),
        LabelSchemaEntry::new(
            FieldKey::SignerName,
            vec![Pattern::starts_with("Namnförtydligande")],
        )
        .post(printed_name),
    ]
}

/// Multi-line description with the stops every form shares.
pub(super) fn description(labels: Vec<Pattern>) -> LabelSchemaEntry {
    LabelSchemaEntry::block(
        FieldKey::Description,
        labels,
        vec![
            Pattern::starts_with("Intygande"),
            Pattern::exact("Handledare"),
            Pattern::exact("Kursledare"),
            Pattern::starts_with("Specialitet"),
        ],
    )
}

/// Printed labels with no field of their own.
pub(super) fn terminators() -> Vec<Pattern> {
    vec![
        Pattern::exact("Handledare"),
        Pattern::exact("Kursledare"),
        Pattern::exact("Intygande"),
        Pattern::exact("Beskrivning"),
        Pattern::starts_with("Namnteckning"),
        Pattern::starts_with("Ort och datum"),
        Pattern::starts_with("Ort o datum"),
    ]
}

/// Label words a careless scan might return as a value.
pub(super) fn reject_values() -> Vec<Pattern> {
    vec![
        Pattern::exact("Sökande"),
        Pattern::exact("Kurs"),
        Pattern::exact("Auskultation"),
        Pattern::exact("Handledare"),
        Pattern::exact("Kursledare"),
    ]
}

/// Lines printed on every copy of every form.
pub(super) fn shared_boilerplate() -> Vec<Pattern> {
    vec![
        Pattern::verbatim("Skriv ut"),
        Pattern::verbatim("Sökande"),
        Pattern::verbatim("Rensa"),
        Pattern::verbatim("Bilaga nr:"),
        Pattern::verbatim("INTYG"),
        Pattern::verbatim("om genomförd utbildningsaktivitet och"),
        Pattern::verbatim("uppfyllda kompetenskrav"),
        Pattern::verbatim("Intygande"),
        Pattern::verbatim(
            "Sökanden har genomfört utbildningsaktiviteten och uppfyllt kompetenskrav i delmålet/-en.",
        ),
        Pattern::re(r"^\*{3,}"),
        Pattern::re(r"(?i)^(?:page|sida)\s*\d+$"),
        Pattern::re(r"(?i)^Bilaga\s*nr\b"),
        Pattern::re(r"^INTYG\b"),
        Pattern::re(r"(?i)\bSkriv\s+ut\b"),
        Pattern::re(r"(?i)^Rensa$"),
        Pattern::re(r"(?i)\bom\s+genomförd\s+utbildningsaktivitet"),
        Pattern::re(r"(?i)^Sökande$"),
        Pattern::re(r"(?i)^Intygande\b"),
        Pattern::re(r"(?i)\bSökanden\s+har\s+genomfört"),
    ]
}

/// "X Kursledare" / "X Handledare" rows on course forms.
pub(super) fn checkbox_rows() -> Pattern {
    Pattern::Regex(CHECKBOX_ROLE.clone())
}

/// Appendix header for form `number`, anchored so a value line that merely
/// ends in a citation survives for post-processing.
pub(super) fn bilaga_header(number: u8) -> Pattern {
    Pattern::re(&format!(r"(?i)^Bilaga\s*{}\b", number))
}
