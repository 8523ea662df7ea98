//! Zone extraction: read fields from word boxes that fall inside the
//! template's known field rectangles.

use super::assemble::{Assembler, FieldValues};
use super::rules::has_mark;
use super::trace::Trace;
use super::{Document, ExtractionStrategy, StrategyUsed};
use crate::models::certificate::{ParsedCertificate, WordBox};
use crate::normalize::Normalizer;
use crate::schema::{zone_map, Schema, ZoneTarget};

/// Words whose vertical positions differ by at most this many pixels share a line.
const LINE_TOLERANCE: f32 = 10.0;

/// Padding added around every scaled zone, in pixels.
const ZONE_PADDING: f32 = 2.0;

/// Reads fields from the words that fall inside the template's field rectangles.
#[derive(Debug, Clone, Default)]
pub struct ZoneStrategy {
    assembler: Assembler,
    normalizer: Normalizer,
}

impl ZoneStrategy {
    pub fn new(assembler: Assembler) -> Self {
        Self {
            assembler,
            normalizer: Normalizer::new(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }
}

/// Page size from the words themselves when the caller gave none.
fn estimate_page_size(words: &[WordBox]) -> (f32, f32) {
    let (w, h) = words.iter().fold((0.0f32, 0.0f32), |(w, h), word| {
        let (_, _, x2, y2) = word.rect();
        (w.max(x2), h.max(y2))
    });
    ((w * 1.1).ceil(), (h * 1.1).ceil())
}

fn intersects(a: (f32, f32, f32, f32), b: (f32, f32, f32, f32)) -> bool {
    a.0 <= b.2 && b.0 <= a.2 && a.1 <= b.3 && b.1 <= a.3
}

/// Text of the words touching `rect`, in reading order.
pub fn text_in_rect(words: &[WordBox], rect: (f32, f32, f32, f32)) -> String {
    let mut hits: Vec<&WordBox> = words.iter().filter(|w| intersects(w.rect(), rect)).collect();
    hits.sort_by(|a, b| {
        let (ax, ay, _, _) = a.rect();
        let (bx, by, _, _) = b.rect();
        ay.total_cmp(&by).then(ax.total_cmp(&bx))
    });

    // Group words into lines by vertical position
    let mut lines: Vec<Vec<&str>> = Vec::new();
    let mut line_y = f32::NEG_INFINITY;
    for word in hits {
        let (_, y, _, _) = word.rect();
        if y - line_y > LINE_TOLERANCE || lines.is_empty() {
            lines.push(Vec::new());
            line_y = y;
        }
        if let Some(line) = lines.last_mut() {
            line.push(word.text.trim());
        }
    }

    lines
        .iter()
        .map(|words| words.join(" "))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

impl ExtractionStrategy for ZoneStrategy {
    fn kind(&self) -> StrategyUsed {
        StrategyUsed::Zones
    }

    fn extract(&self, schema: &Schema, doc: &Document<'_>, trace: &mut Trace) -> Option<ParsedCertificate> {
        if doc.words.is_empty() {
            return None;
        }
        let Some(map) = zone_map(doc.kind) else {
            trace.record("zones", || format!("no zone map for {}", doc.kind));
            return None;
        };

        let (pw, ph) = doc.page_size.unwrap_or_else(|| estimate_page_size(doc.words));
        let (sx, sy) = (pw / map.width, ph / map.height);
        trace.record("zones", || format!("page {}x{}, scale {:.3}x{:.3}", pw, ph, sx, sy));

        let mut values = FieldValues::new();
        let mut role = None;
        for zone in map.zones {
            let raw = text_in_rect(doc.words, zone.rect.scaled(sx, sy, ZONE_PADDING));
            if raw.is_empty() {
                continue;
            }
            let text = self.normalizer.normalize(&raw);

            match zone.target {
                ZoneTarget::Field(key) => {
                    let Some(entry) = schema.entry(key) else {
                        continue;
                    };
                    let text = if entry.multiline { text } else { text.replace('\n', " ") };
                    if let Some(value) = entry.apply(&text).filter(|v| !schema.rejects(v)) {
                        trace.record("zones", || format!("{} = {:?}", key, value));
                        values.insert(key, value);
                    }
                }
                ZoneTarget::Checkbox(checked) => {
                    if role.is_none() && has_mark(&text) {
                        trace.record("zones", || format!("checkbox {} ticked", checked.as_str()));
                        role = Some(checked);
                    }
                }
            }
        }

        let cert = self.assembler.assemble(schema, &values, role);
        cert.has_identity().then_some(cert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::OcrInput;
    use crate::schema::{get_schema, CertificateKind};
    use pretty_assertions::assert_eq;

    fn word(text: &str, x: f32, y: f32) -> WordBox {
        WordBox::new(text, x, y, x + 8.0 * text.chars().count() as f32, y + 20.0)
    }

    fn run(kind: CertificateKind, input: &OcrInput) -> Option<ParsedCertificate> {
        let doc = Document::new(kind, input, &Normalizer::new());
        ZoneStrategy::new(Assembler::new()).extract(get_schema(kind).unwrap(), &doc, &mut Trace::disabled())
    }

    #[test]
    fn test_text_in_rect_reading_order() {
        let words = vec![
            word("två", 60.0, 42.0),
            word("Rad", 10.0, 40.0),
            word("ett", 60.0, 12.0),
            word("Rad", 10.0, 10.0),
            word("utanför", 500.0, 10.0),
        ];
        assert_eq!(text_in_rect(&words, (0.0, 0.0, 200.0, 100.0)), "Rad ett\nRad två");
    }

    #[test]
    fn test_klin_2015_zones() {
        let words = vec![
            word("Svensson", 150.0, 368.0),
            word("Anna", 580.0, 368.0),
            word("861027-4857", 150.0, 420.0),
            word("Allmänmedicin", 150.0, 494.0),
            word("a1,", 150.0, 546.0),
            word("b2", 190.0, 546.0),
            word("Bo", 580.0, 1430.0),
            word("Berg", 610.0, 1430.0),
        ];
        let input = OcrInput::from_text("").with_words(words).with_page_size(1128.0, 1584.0);
        let cert = run(CertificateKind::Klin2015, &input).unwrap();
        assert_eq!(cert.full_name.as_deref(), Some("Anna Svensson"));
        assert_eq!(cert.personal_id.as_deref(), Some("8610274857"));
        assert_eq!(cert.specialty_header.as_deref(), Some("Allmänmedicin"));
        assert_eq!(cert.competency_codes, vec!["a1", "b2"]);
        assert_eq!(cert.signer.unwrap().name.as_deref(), Some("Bo Berg"));
    }

    #[test]
    fn test_zones_scale_to_page() {
        // Same layout scanned at half resolution
        let words = vec![word("Svensson", 75.0, 184.0), word("Anna", 290.0, 184.0)];
        let input = OcrInput::from_text("").with_words(words).with_page_size(564.0, 792.0);
        let cert = run(CertificateKind::Ausk2015, &input).unwrap();
        assert_eq!(cert.last_name.as_deref(), Some("Svensson"));
        assert_eq!(cert.first_name.as_deref(), Some("Anna"));
    }

    #[test]
    fn test_no_words_or_no_map() {
        let input = OcrInput::from_text("Efternamn\nSvensson");
        assert_eq!(run(CertificateKind::Klin2015, &input), None);

        let words = vec![word("Svensson", 150.0, 368.0)];
        let input = OcrInput::from_text("").with_words(words).with_page_size(1057.0, 1496.0);
        assert_eq!(run(CertificateKind::Sta3, &input), None);
    }

    #[test]
    fn test_estimate_page_size() {
        let words = vec![WordBox::new("a", 0.0, 0.0, 100.0, 50.0)];
        assert_eq!(estimate_page_size(&words), (110.0, 55.0));
    }
}
