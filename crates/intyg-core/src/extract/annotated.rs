//! Extraction from user-annotated text.
//!
//! Users correct a bad scan by tagging lines:
//!
//! | Tag        | Meaning                                   |
//! |------------|-------------------------------------------|
//! | `R<n> ...` | rubric (label) number `n`                 |
//! | `T<n> ...` | value for rubric `n`                      |
//! | `X ...`    | ignore this line                          |
//! | `C ...`    | ticked checkbox, e.g. `C Kursledare`      |
//!
//! Tags are explicit, so when enough of them are present this strategy wins
//! over the label scan.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::assemble::{Assembler, FieldValues};
use super::rules::role_from_caption;
use super::trace::Trace;
use super::{Document, ExtractionStrategy, StrategyUsed};
use crate::models::certificate::{ParsedCertificate, SignerRole};
use crate::schema::{sections, LabelSchemaEntry, Line, Schema};

lazy_static! {
    static ref RUBRIC_TAG: Regex = Regex::new(r"^R(\d{1,3})(?:[\s:.]+(.*))?$").unwrap();
    static ref VALUE_TAG: Regex = Regex::new(r"^T(\d{1,3})(?:[\s:.]+(.*))?$").unwrap();
    static ref IGNORE_TAG: Regex = Regex::new(r"^X(?:\s.*)?$").unwrap();
    static ref CHECKBOX_TAG: Regex = Regex::new(r"^C\s+(.+)$").unwrap();
}

/// Tag of one annotated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Rubric,
    Value,
    Ignore,
    Checkbox,
    /// Untagged text.
    Plain,
}

/// A line split into its tag, rubric id and remaining text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    pub tag: Tag,
    pub id: Option<u32>,
    pub text: String,
}

impl TaggedLine {
    pub fn classify(line: &str) -> Self {
        let line = line.trim();
        let numbered = |caps: regex::Captures<'_>, tag| TaggedLine {
            tag,
            id: caps[1].parse().ok(),
            text: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
        };

        if let Some(caps) = RUBRIC_TAG.captures(line) {
            return numbered(caps, Tag::Rubric);
        }
        if let Some(caps) = VALUE_TAG.captures(line) {
            return numbered(caps, Tag::Value);
        }
        if IGNORE_TAG.is_match(line) {
            return Self {
                tag: Tag::Ignore,
                id: None,
                text: String::new(),
            };
        }
        if let Some(caps) = CHECKBOX_TAG.captures(line) {
            return Self {
                tag: Tag::Checkbox,
                id: None,
                text: caps[1].trim().to_string(),
            };
        }
        Self {
            tag: Tag::Plain,
            id: None,
            text: line.to_string(),
        }
    }
}

/// Collected lines for one rubric id.
#[derive(Debug, Default)]
struct Rubric<'s> {
    entry: Option<&'s LabelSchemaEntry>,
    labeled: bool,
    explicit: Vec<String>,
    collected: Vec<String>,
}

impl Rubric<'_> {
    fn multiline(&self) -> bool {
        self.entry.is_some_and(|e| e.multiline)
    }

    fn value(&self) -> Option<String> {
        let lines = if self.explicit.is_empty() { &self.collected } else { &self.explicit };
        let joined = lines.join(if self.multiline() { "\n" } else { " " });
        (!joined.trim().is_empty()).then_some(joined)
    }
}

/// Strategy for annotated text.
#[derive(Debug, Clone)]
pub struct AnnotatedStrategy {
    assembler: Assembler,
    min_tags: usize,
    min_ignore_tags: usize,
}

impl AnnotatedStrategy {
    pub fn new(assembler: Assembler) -> Self {
        Self {
            assembler,
            min_tags: 6,
            min_ignore_tags: 3,
        }
    }

    pub fn with_thresholds(mut self, min_tags: usize, min_ignore_tags: usize) -> Self {
        self.min_tags = min_tags;
        self.min_ignore_tags = min_ignore_tags;
        self
    }

    /// Whether the tag density is high enough to trust the annotations.
    pub fn is_annotated(&self, tagged: &[TaggedLine]) -> bool {
        let tags = tagged
            .iter()
            .filter(|t| matches!(t.tag, Tag::Rubric | Tag::Value))
            .count();
        let ignores = tagged.iter().filter(|t| t.tag == Tag::Ignore).count();
        tags >= self.min_tags || ignores >= self.min_ignore_tags
    }

    /// Field values and an explicitly ticked role.
    fn read(
        &self,
        schema: &Schema,
        tagged: &[TaggedLine],
        trace: &mut Trace,
    ) -> (FieldValues, Option<SignerRole>) {
        // Rubric text decides sections the same way printed labels do
        let text_lines: Vec<Line> = tagged.iter().map(|t| Line::new(&t.text)).collect();
        let line_sections = sections(&text_lines);

        let mut order: Vec<u32> = Vec::new();
        let mut rubrics: HashMap<u32, Rubric<'_>> = HashMap::new();
        let mut current: Option<u32> = None;
        let mut role = None;

        for (i, t) in tagged.iter().enumerate() {
            match (t.tag, t.id) {
                (Tag::Rubric, Some(id)) if rubrics.get(&id).is_some_and(|r| r.labeled) => {
                    rubrics.entry(id).or_default().explicit.push(t.text.clone());
                    current = None;
                }
                (Tag::Rubric, Some(id)) => {
                    let entry = schema.field_for_label(&text_lines[i], line_sections[i]);
                    trace.record("annotated", || match entry {
                        Some(e) => format!("R{} `{}` -> {}", id, t.text, e.field),
                        None => format!("R{} `{}` matches no field", id, t.text),
                    });
                    if !order.contains(&id) {
                        order.push(id);
                    }
                    let rubric = rubrics.entry(id).or_default();
                    rubric.entry = entry;
                    rubric.labeled = true;
                    current = Some(id);
                }
                (Tag::Value, Some(id)) => {
                    if !order.contains(&id) {
                        order.push(id);
                    }
                    rubrics.entry(id).or_default().explicit.push(t.text.clone());
                    current = None;
                }
                (Tag::Checkbox, _) => {
                    if role.is_none() {
                        role = role_from_caption(&t.text);
                    }
                }
                (Tag::Plain, _) => {
                    let Some(rubric) = current.and_then(|id| rubrics.get_mut(&id)) else {
                        continue;
                    };
                    if !rubric.explicit.is_empty() {
                        continue;
                    }
                    rubric.collected.push(t.text.clone());
                    if !rubric.multiline() {
                        current = None;
                    }
                }
                _ => {}
            }
        }

        let mut values = FieldValues::new();
        for id in order {
            let Some(rubric) = rubrics.get(&id) else {
                continue;
            };
            let (Some(entry), Some(raw)) = (rubric.entry, rubric.value()) else {
                continue;
            };
            if let Some(value) = entry.apply(&raw).filter(|v| !schema.rejects(v)) {
                values.insert(entry.field, value);
            }
        }
        (values, role)
    }
}

impl ExtractionStrategy for AnnotatedStrategy {
    fn kind(&self) -> StrategyUsed {
        StrategyUsed::Annotated
    }

    fn extract(&self, schema: &Schema, doc: &Document<'_>, trace: &mut Trace) -> Option<ParsedCertificate> {
        let tagged: Vec<TaggedLine> = doc.lines.iter().map(|l| TaggedLine::classify(&l.text)).collect();
        if !self.is_annotated(&tagged) {
            trace.record("annotated", || "too few tags".into());
            return None;
        }

        let (values, role) = self.read(schema, &tagged, trace);
        let cert = self.assembler.assemble(schema, &values, role);
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
        AnnotatedStrategy::new(Assembler::new()).extract(get_schema(kind).unwrap(), &doc, &mut Trace::disabled())
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            TaggedLine::classify("R3 Efternamn"),
            TaggedLine { tag: Tag::Rubric, id: Some(3), text: "Efternamn".into() }
        );
        assert_eq!(TaggedLine::classify("T12: Svensson").id, Some(12));
        assert_eq!(TaggedLine::classify("X").tag, Tag::Ignore);
        assert_eq!(TaggedLine::classify("X SOSFS 2015:8").tag, Tag::Ignore);
        assert_eq!(TaggedLine::classify("C Kursledare").text, "Kursledare");
        assert_eq!(TaggedLine::classify("Röntgen").tag, Tag::Plain);
        assert_eq!(TaggedLine::classify("R2D2").tag, Tag::Plain);
    }

    #[test]
    fn test_explicit_value_wins_over_collected() {
        let text = "\
R1 Efternamn
Fel Namn
T1 Svensson
R2 Förnamn
Anna
R3 Personnummer
T3 861027-4857
R4 Specialitet som ansökan avser
T4 Allmänmedicin";
        let cert = run(CertificateKind::Klin2015, text).unwrap();
        assert_eq!(cert.last_name.as_deref(), Some("Svensson"));
        assert_eq!(cert.first_name.as_deref(), Some("Anna"));
        assert_eq!(cert.specialty_header.as_deref(), Some("Allmänmedicin"));
        assert_eq!(cert.personal_id.as_deref(), Some("8610274857"));
    }

    #[test]
    fn test_ignored_lines_never_enter_fields() {
        let text = "\
X SOSFS 2015:8
X Bilaga 4
R1 Efternamn
T1 Svensson
R7 Beskrivning av den kliniska tjänstgöringen
Rad ett
X Sidfot som inte hör hit
Rad två
R8 Specialitet
Kirurgi";
        let cert = run(CertificateKind::Klin2015, text).unwrap();
        assert_eq!(cert.description.as_deref(), Some("Rad ett\nRad två"));
    }

    #[test]
    fn test_single_line_rubric_takes_one_line() {
        let text = "\
R1 Efternamn
Svensson
Extra rad
R2 Förnamn
Anna
R3 Personnummer
861027-4857
X
X
X";
        let cert = run(CertificateKind::Klin2015, text).unwrap();
        assert_eq!(cert.last_name.as_deref(), Some("Svensson"));
    }

    #[test]
    fn test_repeated_rubric_is_a_value() {
        let text = "R1 Kursens ämne\nR1 Akutmedicin\nR2 Efternamn\nT2 Svensson\nR3 Förnamn\nT3 Anna";
        let cert = run(CertificateKind::Kurs2021, text).unwrap();
        assert_eq!(cert.subject.as_deref(), Some("Akutmedicin"));
    }

    #[test]
    fn test_checkbox_tag_sets_role() {
        let text = "R1 Efternamn\nT1 Svensson\nR2 Förnamn\nT2 Anna\nR3 Namnförtydligande\nT3 Eva Ek\nC Kursledare";
        let cert = run(CertificateKind::Kurs2021, text).unwrap();
        let signer = cert.signer.unwrap();
        assert_eq!(signer.name.as_deref(), Some("Eva Ek"));
        assert_eq!(signer.role, Some(SignerRole::CourseLeader));
    }

    #[test]
    fn test_plain_text_is_not_annotated() {
        let text = "Efternamn\nSvensson\nFörnamn\nAnna\nPersonnummer\n861027-4857";
        assert_eq!(run(CertificateKind::Klin2015, text), None);
    }
}
