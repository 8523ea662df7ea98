//! Swedish personal identity number (personnummer) extraction and validation.

use super::patterns::PERSONAL_ID;
use super::{ExtractionMatch, FieldExtractor};

/// Personal id field extractor.
pub struct PersonalIdExtractor {
    validate: bool,
}

impl PersonalIdExtractor {
    /// Create a new extractor. Checksums are not validated by default since
    /// OCR misreads a digit far more often than a form carries a wrong number.
    pub fn new() -> Self {
        Self { validate: false }
    }

    /// Set whether to validate the Luhn check digit.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for PersonalIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PersonalIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for caps in PERSONAL_ID.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            let id = format!("{}{}", &caps[1], &caps[2]);

            if results.iter().any(|r| r.value == id) {
                continue;
            }

            if !self.validate || validate_personal_id(&id) {
                results.push(
                    ExtractionMatch::new(id, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Extract the first personal id from text, digits only.
pub fn extract_personal_id(text: &str) -> Option<String> {
    PersonalIdExtractor::new().extract(text).map(|m| m.value)
}

/// Validate a personal id with the Luhn algorithm.
///
/// Accepts 10 or 12 digits (separators ignored). For 12 digits the century
/// prefix is not part of the checksum.
pub fn validate_personal_id(id: &str) -> bool {
    let digits: Vec<u32> = id.chars().filter_map(|c| c.to_digit(10)).collect();

    let digits = match digits.len() {
        10 => &digits[..],
        12 => &digits[2..],
        _ => return false,
    };

    let sum: u32 = digits
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, d)| {
            let v = if i % 2 == 0 { d * 2 } else { *d };
            if v > 9 { v - 9 } else { v }
        })
        .sum();

    (10 - sum % 10) % 10 == digits[9]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_with_dash() {
        assert_eq!(extract_personal_id("861027-4857"), Some("8610274857".to_string()));
    }

    #[test]
    fn test_extract_variants() {
        assert_eq!(extract_personal_id("Personnummer 19861027-4857"), Some("198610274857".to_string()));
        assert_eq!(extract_personal_id("861027+4857"), Some("8610274857".to_string()));
        assert_eq!(extract_personal_id("861027 4857"), Some("8610274857".to_string()));
        assert_eq!(extract_personal_id("8610274857"), Some("8610274857".to_string()));
    }

    #[test]
    fn test_no_match_on_period() {
        assert_eq!(extract_personal_id("270101-270401"), None);
        assert_eq!(extract_personal_id("Anna Svensson"), None);
    }

    #[test]
    fn test_validate_luhn() {
        assert!(validate_personal_id("861027-4857"));
        assert!(validate_personal_id("19861027-4857"));
        assert!(!validate_personal_id("861027-4858"));
        assert!(!validate_personal_id("86102748"));
    }

    #[test]
    fn test_validation_filters_matches() {
        let extractor = PersonalIdExtractor::new().with_validation(true);
        let results = extractor.extract_all("861027-4858 och 861027-4857");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, "8610274857");
        assert_eq!(results[0].position, Some((16, 27)));
    }
}
