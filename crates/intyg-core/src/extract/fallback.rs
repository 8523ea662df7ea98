//! Last-resort whole-text regex extraction.

use super::assemble::Assembler;
use super::rules::patterns::{
    BLOCK_STOPS, DELMAL_LABEL, DESCRIPTION_LABEL, PERSONAL_ID_LABEL, SPECIALTY_INLINE,
};
use super::rules::{
    extract_block, extract_competency_codes, extract_name_block, extract_period_range, leading_code_lines,
    normalize_codes, strip_citation, strip_personal_id, value_after_label, FieldExtractor,
};
use super::trace::Trace;
use super::{Document, ExtractionStrategy, StrategyUsed};
use crate::models::certificate::ParsedCertificate;
use crate::schema::Schema;

/// Coarse patterns over the whole text, ignoring layout.
#[derive(Debug, Clone, Default)]
pub struct RegexFallbackStrategy {
    assembler: Assembler,
}

impl RegexFallbackStrategy {
    pub fn new(assembler: Assembler) -> Self {
        Self { assembler }
    }
}

impl ExtractionStrategy for RegexFallbackStrategy {
    fn kind(&self) -> StrategyUsed {
        StrategyUsed::RegexFallback
    }

    fn extract(&self, schema: &Schema, doc: &Document<'_>, trace: &mut Trace) -> Option<ParsedCertificate> {
        let text = doc.text.as_str();
        let mut cert = ParsedCertificate::empty(doc.kind);

        if let Some(name) = extract_name_block(text) {
            cert.full_name = name.full;
            cert.first_name = name.first;
            cert.last_name = name.last;
        }

        // Prefer the id under the "Personnummer" label over the first one in
        // the text, which may be the supervisor's
        let ids = self.assembler.personal_id_extractor();
        cert.personal_id = value_after_label(text, &PERSONAL_ID_LABEL)
            .and_then(|v| ids.extract(&v))
            .or_else(|| ids.extract(text))
            .map(|m| m.value);

        cert.specialty_header = SPECIALTY_INLINE
            .captures(text)
            .map(|caps| strip_citation(&strip_personal_id(&caps[1])))
            .filter(|s| !s.is_empty() && !schema.rejects(s));

        let delmal = extract_block(text, &DELMAL_LABEL, BLOCK_STOPS.as_slice())
            .map(|block| leading_code_lines(&block))
            .unwrap_or_default();
        let mut codes = extract_competency_codes(&delmal);
        if codes.is_empty() {
            codes = extract_competency_codes(text);
        }
        cert.competency_codes = normalize_codes(schema.regime(), &codes);

        cert.description = extract_block(text, &DESCRIPTION_LABEL, BLOCK_STOPS.as_slice());

        if doc.kind.has_date_fields() {
            cert.service_period = extract_period_range(text);
        }

        trace.record("fallback", || format!("{} fields from whole text", cert.populated_fields()));
        (!cert.is_empty()).then_some(cert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{get_schema, CertificateKind};
    use pretty_assertions::assert_eq;

    fn run(kind: CertificateKind, text: &str) -> Option<ParsedCertificate> {
        let doc = Document::from_text(kind, text);
        RegexFallbackStrategy::default().extract(get_schema(kind).unwrap(), &doc, &mut Trace::disabled())
    }

    #[test]
    fn test_flat_text() {
        let text = "Intyg om klinisk tjänstgöring. Sökande 19861027-4857. \
                    Specialitet som ansökan avser: Kirurgi\n\
                    Period 2024-01-10 - 2024-06-30";
        let cert = run(CertificateKind::Klin2021, text).unwrap();
        assert_eq!(cert.personal_id.as_deref(), Some("198610274857"));
        assert_eq!(cert.specialty_header.as_deref(), Some("Kirurgi"));
        let period = cert.service_period.unwrap();
        assert_eq!(period.start_date.as_deref(), Some("2024-01-10"));
        assert_eq!(period.end_date.as_deref(), Some("2024-06-30"));
    }

    #[test]
    fn test_name_header_line() {
        let cert = run(CertificateKind::Utv2015, "Efternamn, förnamn\nSvensson Anna").unwrap();
        assert_eq!(cert.full_name.as_deref(), Some("Anna Svensson"));
        assert_eq!(cert.service_period, None);
    }

    #[test]
    fn test_labeled_values_win() {
        let text = "\
Sal c9
Handledare 700101-1234
Personnummer
19861027-4857
Delmål
a1, b2,
c3
Beskrivning av kursen
Tre dagar
med övningar
Namnteckning";
        let cert = run(CertificateKind::Kurs2015, text).unwrap();
        assert_eq!(cert.personal_id.as_deref(), Some("198610274857"));
        assert_eq!(cert.competency_codes, vec!["a1", "b2", "c3"]);
        assert_eq!(cert.description.as_deref(), Some("Tre dagar\nmed övningar"));
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(run(CertificateKind::Kurs2021, "oläslig text utan innehåll"), None);
    }
}
