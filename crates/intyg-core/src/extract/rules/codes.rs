//! Competency code (delmål) extraction and regime-specific normalization.

use std::collections::BTreeSet;

use super::patterns::COMPETENCY_CODE;
use super::{ExtractionMatch, FieldExtractor};
use crate::schema::Regime;

/// Competency code extractor returning de-duplicated raw matches.
pub struct CodeExtractor;

impl CodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for m in COMPETENCY_CODE.find_iter(text) {
            let raw = m.as_str().to_string();
            if results.iter().any(|r| r.value == raw) {
                continue;
            }
            results.push(ExtractionMatch::new(raw, m.as_str()).with_position(m.start(), m.end()));
        }

        results
    }
}

/// Raw competency codes in order of first appearance, duplicates removed.
pub fn extract_competency_codes(text: &str) -> Vec<String> {
    CodeExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// Leading lines of a Delmål value that carry codes, so a list wrapped over
/// two OCR lines is read whole and an unlabeled line below it is not.
pub fn leading_code_lines(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take_while(|l| COMPETENCY_CODE.is_match(l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Canonical sort key: letter group, then number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CodeKey {
    group: char,
    number: u32,
}

fn parse_code(raw: &str) -> Option<CodeKey> {
    let caps = COMPETENCY_CODE.captures(raw.trim())?;
    let group = caps[2].chars().next()?.to_ascii_lowercase();
    let number = caps[3].parse().ok()?;
    Some(CodeKey { group, number })
}

/// Highest valid number per letter group.
fn max_number(regime: Regime, group: char) -> u32 {
    match (regime, group) {
        (Regime::Sosfs2015, 'a') => 6,
        (Regime::Sosfs2015, 'b') => 5,
        (Regime::Hslf2021, 'a') => 7,
        (Regime::Hslf2021, 'b') => 4,
        (_, 'c') => 14,
        _ => 0,
    }
}

/// Normalize, de-duplicate and sort codes for a regime.
///
/// 2015 codes are lower-case (`a1`); 2021 codes carry the `ST` prefix
/// (`STa1`), and a bare `a1` is the same code as `STa1`. Codes outside the
/// regime's milestone range are dropped.
pub fn normalize_codes<S: AsRef<str>>(regime: Regime, codes: &[S]) -> Vec<String> {
    let keys: BTreeSet<CodeKey> = codes
        .iter()
        .filter_map(|c| parse_code(c.as_ref()))
        .filter(|k| k.number >= 1 && k.number <= max_number(regime, k.group))
        .collect();

    keys.into_iter()
        .map(|k| match regime {
            Regime::Sosfs2015 => format!("{}{}", k.group, k.number),
            Regime::Hslf2021 => format!("ST{}{}", k.group, k.number),
        })
        .collect()
}
