//! Schema-driven label scan, the primary strategy for every kind.

use super::assemble::{Assembler, FieldValues};
use super::rules::{
    detect_checkbox_role, extract_competency_codes, extract_name_block, extract_period_range, normalize_codes,
    FieldExtractor,
};
use super::trace::Trace;
use super::{Document, ExtractionStrategy, StrategyUsed};
use crate::models::certificate::ParsedCertificate;
use crate::schema::{LabelSchemaEntry, Line, RolePolicy, Schema};

/// Walks the document's lines once per schema field.
#[derive(Debug, Clone)]
pub struct LabelScanStrategy {
    assembler: Assembler,
    min_lines: usize,
    period_fallback: bool,
}

impl LabelScanStrategy {
    pub fn new(assembler: Assembler) -> Self {
        Self {
            assembler,
            min_lines: 5,
            period_fallback: true,
        }
    }

    pub fn with_min_lines(mut self, min_lines: usize) -> Self {
        self.min_lines = min_lines;
        self
    }

    pub fn with_period_fallback(mut self, enabled: bool) -> Self {
        self.period_fallback = enabled;
        self
    }

    /// Raw field values read by label, before assembly.
    pub fn scan(&self, schema: &Schema, doc: &Document<'_>, trace: &mut Trace) -> FieldValues {
        let visible: Vec<usize> = (0..doc.lines.len())
            .filter(|&i| !schema.is_boilerplate(&doc.lines[i]))
            .collect();

        let mut values = FieldValues::new();
        for entry in &schema.fields {
            let Some(pos) = visible.iter().position(|&i| {
                entry.section.is_none_or(|s| doc.sections[i] == s) && entry.is_label(&doc.lines[i])
            }) else {
                continue;
            };

            let label = &doc.lines[visible[pos]];
            let following = visible[pos + 1..].iter().map(|&i| &doc.lines[i]);
            let Some(raw) = read_value(schema, entry, label, following) else {
                trace.record("scan", || format!("{}: label `{}` has no value", entry.field, label.text));
                continue;
            };

            match entry.apply(&raw) {
                Some(value) if !schema.rejects(&value) => {
                    trace.record("scan", || format!("{} = {:?}", entry.field, value));
                    values.insert(entry.field, value);
                }
                _ => trace.record("scan", || format!("{}: dropped {:?}", entry.field, raw)),
            }
        }
        values
    }
}

/// Value for a matched label line.
///
/// A value after the label's colon wins for single-line fields. A multi-line
/// field keeps that value and continues below it.
fn read_value<'a>(
    schema: &Schema,
    entry: &LabelSchemaEntry,
    label: &Line,
    mut following: impl Iterator<Item = &'a Line>,
) -> Option<String> {
    let inline = label
        .inline
        .as_ref()
        .filter(|inline| entry.label_variants.iter().any(|p| p.matches(&inline.head, &inline.head_key)))
        .map(|inline| inline.value.clone());

    if !entry.multiline {
        if inline.is_some() {
            return inline;
        }
        let next = following.next()?;
        return (!schema.is_label(next)).then(|| next.text.clone());
    }

    let block: Vec<String> = inline
        .into_iter()
        .chain(
            following
                .take_while(|l| !schema.is_label(l) && !entry.is_stop(l))
                .map(|l| l.text.clone()),
        )
        .collect();
    (!block.is_empty()).then(|| block.join("\n"))
}

impl ExtractionStrategy for LabelScanStrategy {
    fn kind(&self) -> StrategyUsed {
        StrategyUsed::LabelScan
    }

    fn extract(&self, schema: &Schema, doc: &Document<'_>, trace: &mut Trace) -> Option<ParsedCertificate> {
        let visible = doc.lines.iter().filter(|l| !schema.is_boilerplate(l)).count();
        if visible < self.min_lines {
            trace.record("scan", || format!("{} content lines, need {}", visible, self.min_lines));
            return None;
        }

        let values = self.scan(schema, doc, trace);

        let role = match schema.role {
            RolePolicy::Checkbox => {
                let texts: Vec<&str> = doc.lines.iter().map(|l| l.text.as_str()).collect();
                detect_checkbox_role(&texts).map(|choice| {
                    trace.record("scan", || format!("checkbox `{}`", texts[choice.line]));
                    choice.role
                })
            }
            RolePolicy::Supervisor => None,
        };

        let mut cert = self.assembler.assemble(schema, &values, role);

        if cert.full_name.is_none() {
            if let Some(name) = extract_name_block(&doc.text) {
                trace.record("scan", || "name from combined name header".into());
                cert.full_name = name.full;
                cert.first_name = name.first;
                cert.last_name = name.last;
            }
        }
        if cert.personal_id.is_none() {
            cert.personal_id = self.assembler.personal_id_extractor().extract(&doc.text).map(|m| {
                trace.record("scan", || "personal id from whole text".into());
                m.value
            });
        }
        if cert.competency_codes.is_empty() {
            let content: Vec<&str> = doc
                .lines
                .iter()
                .filter(|l| !schema.is_boilerplate(l))
                .map(|l| l.text.as_str())
                .collect();
            let codes = normalize_codes(schema.regime(), &extract_competency_codes(&content.join("\n")));
            if !codes.is_empty() {
                trace.notice(
                    "scan",
                    format!("Competency codes {} read outside the Delmål field", codes.join(", ")),
                );
                cert.competency_codes = codes;
            }
        }
        if self.period_fallback && doc.kind.has_date_fields() && cert.service_period.is_none() {
            cert.service_period = extract_period_range(&doc.text);
        }

        if !cert.has_identity() {
            trace.record("scan", || "no identity field resolved".into());
            return None;
        }
        Some(cert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::SignerRole;
    use crate::schema::{get_schema, CertificateKind, FieldKey};
    use pretty_assertions::assert_eq;

    fn scan(kind: CertificateKind, text: &str) -> Option<ParsedCertificate> {
        let doc = Document::from_text(kind, text);
        let schema = get_schema(kind).unwrap();
        LabelScanStrategy::new(Assembler::new()).extract(schema, &doc, &mut Trace::disabled())
    }

    const KLIN_2015: &str = "\
SOSFS 2015:8 - Bilaga 4
Sökande
Efternamn
Svensson
Förnamn
Anna
Personnummer
861027-4857
Specialitet som ansökan avser
Allmänmedicin
Delmål som intyget avser
a1, b2
Tjänstgöringsställe och period (ååmmdd - ååmmdd) för den kliniska tjänstgöringen
Vårdcentralen Eslöv 250101 - 250630
Beskrivning av den kliniska tjänstgöringen
Handledd tjänstgöring på vårdcentral.
Egen mottagning med daglig handledning.
Intygande
Sökanden har genomfört utbildningsaktiviteten och uppfyllt kompetenskrav i delmålet/-en.
Specialitet
Allmänmedicin
Tjänsteställe
Vårdcentralen Eslöv SOSFS 2015:8
Ort och datum
Eslöv 2025-07-01
Namnförtydligande
Bo Berg";

    #[test]
    fn test_scan_full_2015_form() {
        let cert = scan(CertificateKind::Klin2015, KLIN_2015).unwrap();
        assert_eq!(cert.full_name.as_deref(), Some("Anna Svensson"));
        assert_eq!(cert.personal_id.as_deref(), Some("8610274857"));
        assert_eq!(cert.specialty_header.as_deref(), Some("Allmänmedicin"));
        assert_eq!(cert.competency_codes, vec!["a1", "b2"]);
        assert_eq!(cert.subject.as_deref(), Some("Vårdcentralen Eslöv"));
        let period = cert.service_period.clone().unwrap();
        assert_eq!(period.start_date.as_deref(), Some("2025-01-01"));
        assert_eq!(period.end_date.as_deref(), Some("2025-06-30"));
        assert_eq!(
            cert.description.as_deref(),
            Some("Handledd tjänstgöring på vårdcentral.\nEgen mottagning med daglig handledning.")
        );
        let signer = cert.signer.unwrap();
        assert_eq!(signer.name.as_deref(), Some("Bo Berg"));
        assert_eq!(signer.speciality.as_deref(), Some("Allmänmedicin"));
        assert_eq!(signer.site.as_deref(), Some("Vårdcentralen Eslöv"));
        assert_eq!(signer.role, Some(SignerRole::Supervisor));
    }

    #[test]
    fn test_single_line_field_takes_one_line() {
        let text = "\
Efternamn
Svensson
Förnamn
Anna
Tjänsteställe
Akutkliniken Lund
HSLF-FS 2021:8 Bilaga 8
Namnförtydligande
Bo Berg";
        let cert = scan(CertificateKind::Ausk2021, text).unwrap();
        assert_eq!(cert.signer.unwrap().site.as_deref(), Some("Akutkliniken Lund"));
    }

    #[test]
    fn test_single_line_label_followed_by_label_is_empty() {
        let text = "Efternamn\nFörnamn\nAnna\nPersonnummer\n861027-4857\nSpecialitet som ansökan avser\nKirurgi";
        let cert = scan(CertificateKind::Klin2015, text).unwrap();
        assert_eq!(cert.last_name, None);
        assert_eq!(cert.first_name.as_deref(), Some("Anna"));
    }

    #[test]
    fn test_inline_colon_value() {
        let text = "Efternamn: Svensson\nFörnamn: Anna\nPersonnummer: 19861027-4857\nKursens ämne: Akut omhändertagande\nBeskrivning av kursen\nTre dagar";
        let cert = scan(CertificateKind::Kurs2021, text).unwrap();
        assert_eq!(cert.full_name.as_deref(), Some("Anna Svensson"));
        assert_eq!(cert.personal_id.as_deref(), Some("198610274857"));
        assert_eq!(cert.subject.as_deref(), Some("Akut omhändertagande"));
        assert_eq!(cert.description.as_deref(), Some("Tre dagar"));
    }

    #[test]
    fn test_wrapped_delmal_line() {
        let text = "\
Efternamn
Svensson
Förnamn
Anna
Delmål som intyget avser
a1, a2, b1,
c3, c4
Tjänstgöringsställe och period
Vårdcentralen Eslöv 250101 - 250630";
        let cert = scan(CertificateKind::Klin2015, text).unwrap();
        assert_eq!(cert.competency_codes, vec!["a1", "a2", "b1", "c3", "c4"]);
        assert_eq!(cert.subject.as_deref(), Some("Vårdcentralen Eslöv"));
    }

    #[test]
    fn test_codes_from_text_when_delmal_is_empty() {
        let text = "\
Efternamn
Svensson
Förnamn
Anna
Delmål som intyget avser
Se nedan
Beskrivning av auskultationen
Auskultation för delmål STa3 och STc1";
        let doc = Document::from_text(CertificateKind::Ausk2021, text);
        let schema = get_schema(CertificateKind::Ausk2021).unwrap();
        let mut trace = Trace::disabled();
        let cert = LabelScanStrategy::new(Assembler::new()).extract(schema, &doc, &mut trace).unwrap();
        assert_eq!(cert.competency_codes, vec!["STa3", "STc1"]);
        assert_eq!(trace.notices().len(), 1);
        assert!(trace.notices()[0].contains("STa3, STc1"));
    }

    #[test]
    fn test_too_few_lines() {
        assert_eq!(scan(CertificateKind::Klin2015, "Efternamn\nSvensson"), None);
    }

    #[test]
    fn test_requires_identity() {
        let text = "Kursens ämne\nAkutmedicin\nBeskrivning av kursen\nTre dagar\nmed övningar";
        assert_eq!(scan(CertificateKind::Kurs2021, text), None);
    }

    #[test]
    fn test_course_checkbox_sets_role() {
        let text = "\
Efternamn
Svensson
Förnamn
Anna
Kursledare
Eva Ek
X Kursledare
Handledare
Specialitet
Kirurgi
Namnförtydligande
Eva Ek";
        let cert = scan(CertificateKind::Kurs2015, text).unwrap();
        assert_eq!(cert.course_leader.as_deref(), Some("Eva Ek"));
        assert_eq!(cert.signer.unwrap().role, Some(SignerRole::CourseLeader));
    }

    #[test]
    fn test_period_falls_back_to_range_in_text() {
        let text = "Efternamn\nSvensson\nFörnamn\nAnna\nUtbildningsaktiviteter som sökanden genomfört\nKurs 2024-01-10 - 2024-02-20";
        let cert = scan(CertificateKind::Sta3, text).unwrap();
        let period = cert.service_period.unwrap();
        assert_eq!(period.start_date.as_deref(), Some("2024-01-10"));
    }

    #[test]
    fn test_scan_values_are_raw_fields() {
        let doc = Document::from_text(CertificateKind::Klin2015, KLIN_2015);
        let schema = get_schema(CertificateKind::Klin2015).unwrap();
        let values = LabelScanStrategy::new(Assembler::new()).scan(schema, &doc, &mut Trace::disabled());
        assert_eq!(values.get(FieldKey::SignerSite), Some("Vårdcentralen Eslöv"));
        assert_eq!(values.get(FieldKey::PersonalId), Some("861027-4857"));
    }
}
