//! Label-delimited value extraction over whole text.

use regex::Regex;

use super::text::tidy;
use crate::normalize::fold;

/// Text between the first line matching `label` and the first stop condition.
///
/// Collection starts on the line after the label and runs until a line
/// matching any of `stops`, or the end of the text.
pub fn extract_block(text: &str, label: &Regex, stops: &[Regex]) -> Option<String> {
    let mut lines = text.lines().map(str::trim).skip_while(|l| !label.is_match(l));
    lines.next()?;

    let block: Vec<&str> = lines
        .filter(|l| !l.is_empty())
        .take_while(|l| !stops.iter().any(|s| s.is_match(l)))
        .collect();

    let joined = block.join("\n");
    (!joined.trim().is_empty()).then_some(joined)
}

/// Short value for a label: the text after a colon on the label line, or the
/// next non-empty line.
pub fn value_after_label(text: &str, label: &Regex) -> Option<String> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let label_line = lines.find(|l| label.is_match(l))?;

    if let Some((_, after)) = label_line.split_once(':') {
        let after = tidy(after);
        if !after.is_empty() {
            return Some(after);
        }
    }

    lines.next().map(tidy).filter(|v| !v.is_empty())
}

/// Name split into parts. `full` is "first last".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub full: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
}

impl NameParts {
    /// Build from separately read parts; either may be missing.
    pub fn from_parts(first: Option<String>, last: Option<String>) -> Self {
        let full = match (&first, &last) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            (Some(f), None) => Some(f.clone()),
            (None, Some(l)) => Some(l.clone()),
            (None, None) => None,
        };
        Self { full, first, last }
    }

    /// Split a "Last First [Middle]" value as printed under a combined
    /// "Efternamn Förnamn" header. Needs at least two words.
    pub fn from_last_first(value: &str) -> Option<Self> {
        let mut words = value.split_whitespace();
        let last = words.next()?.to_string();
        let first = words.collect::<Vec<_>>().join(" ");
        if first.is_empty() {
            return None;
        }
        Some(Self::from_parts(Some(first), Some(last)))
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_none()
    }
}

/// Name from a line carrying both "Efternamn" and "Förnamn", read from the
/// following line as "Last First".
pub fn extract_name_block(text: &str) -> Option<NameParts> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let header = lines.iter().position(|l| {
        let key = fold(l);
        key.contains("efternamn") && key.contains("fornamn")
    })?;
    NameParts::from_last_first(lines.get(header + 1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn re(p: &str) -> Regex {
        Regex::new(p).unwrap()
    }

    #[test]
    fn test_block_until_stop() {
        let text = "Beskrivning av kursen\nRad ett\nRad två\nOrt och datum\nLund";
        let block = extract_block(text, &re("(?i)^beskrivning"), &[re("(?i)^ort och datum")]);
        assert_eq!(block.as_deref(), Some("Rad ett\nRad två"));
    }

    #[test]
    fn test_block_runs_to_end_without_stop() {
        let text = "Beskrivning\nRad ett\nRad två";
        let block = extract_block(text, &re("(?i)^beskrivning"), &[re("(?i)^namnteckning")]);
        assert_eq!(block.as_deref(), Some("Rad ett\nRad två"));
    }

    #[test]
    fn test_block_missing_label() {
        assert_eq!(extract_block("Rad ett", &re("(?i)^beskrivning"), &[]), None);
        assert_eq!(extract_block("Beskrivning", &re("(?i)^beskrivning"), &[]), None);
    }

    #[test]
    fn test_value_after_label() {
        let label = re("(?i)^personnummer");
        assert_eq!(value_after_label("Personnummer: 861027-4857", &label).as_deref(), Some("861027-4857"));
        assert_eq!(value_after_label("Personnummer\n861027-4857", &label).as_deref(), Some("861027-4857"));
        assert_eq!(value_after_label("Personnummer:\n\n861027-4857", &label).as_deref(), Some("861027-4857"));
    }

    #[test]
    fn test_name_block() {
        let text = "Sökande\nEfternamn Förnamn\nSvensson Anna Maria\nPersonnummer";
        let name = extract_name_block(text).unwrap();
        assert_eq!(name.full.as_deref(), Some("Anna Maria Svensson"));
        assert_eq!(name.first.as_deref(), Some("Anna Maria"));
        assert_eq!(name.last.as_deref(), Some("Svensson"));
    }

    #[test]
    fn test_name_block_needs_two_words() {
        assert_eq!(extract_name_block("Efternamn Förnamn\nSvensson"), None);
    }
}
