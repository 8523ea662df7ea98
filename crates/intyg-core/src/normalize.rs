//! OCR text normalization and the label comparator.
//!
//! [`Normalizer::normalize`] is idempotent: running it on its own output
//! returns the same string.

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::{IntygError, Result};
use crate::models::config::{MisreadRule, NormalizerConfig};

/// Recurring OCR misreads of printed field labels, as (misread, label).
pub const OCR_MISREADS: &[(&str, &str)] = &[
    ("Fömamn", "Förnamn"),
    ("Eftemamn", "Efternamn"),
    ("Tiänstgöringsställe", "Tjänstgöringsställe"),
    ("Tiänsteställe", "Tjänsteställe"),
];

/// Characters rewritten to ASCII `-`.
const DASH_VARIANTS: &[char] = &[
    '\u{2010}', // hyphen
    '\u{2011}', // non-breaking hyphen
    '\u{2012}', // figure dash
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{2015}', // horizontal bar
    '\u{2212}', // minus sign
    '\u{FE58}',
    '\u{FE63}',
    '\u{FF0D}',
];

lazy_static! {
    static ref BUILTIN_MISREADS: Vec<(Regex, String)> = OCR_MISREADS
        .iter()
        .map(|(from, to)| (misread_pattern(from).unwrap(), (*to).to_string()))
        .collect();
}

fn misread_pattern(from: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(from.trim())))
}

/// Whether a rule's replacement contains its own misread as a whole word.
/// Such a rule would rewrite its output again on a second pass.
pub(crate) fn rewrites_own_output(rule: &MisreadRule) -> bool {
    let to: String = rule.to.nfc().collect();
    misread_pattern(&rule.from).is_ok_and(|re| re.is_match(&to))
}

/// Text normalizer with the built-in misread table plus configured extras.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    extra: Vec<(Regex, String)>,
}

impl Normalizer {
    /// Normalizer using only the built-in misread table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a normalizer from configuration.
    pub fn from_config(config: &NormalizerConfig) -> Result<Self> {
        let mut normalizer = Self::new();
        for rule in &config.extra_misreads {
            normalizer = normalizer.with_misread(rule)?;
        }
        Ok(normalizer)
    }

    /// Add one misread correction after the built-in table.
    pub fn with_misread(mut self, rule: &MisreadRule) -> Result<Self> {
        let pattern = misread_pattern(&rule.from)
            .map_err(|e| IntygError::Config(format!("invalid misread `{}`: {}", rule.from, e)))?;
        if rewrites_own_output(rule) {
            return Err(IntygError::Config(format!(
                "misread `{}` reappears in its replacement `{}`",
                rule.from, rule.to
            )));
        }
        self.extra.push((pattern, rule.to.nfc().collect()));
        Ok(self)
    }

    /// Normalize raw OCR text.
    ///
    /// NFC composition, misread correction, dash and colon unification,
    /// then whitespace collapse per line. Line breaks are kept and empty
    /// lines dropped.
    pub fn normalize(&self, raw: &str) -> String {
        let composed: String = raw.nfc().collect();

        let mut text = composed;
        for (pattern, label) in BUILTIN_MISREADS.iter().chain(self.extra.iter()) {
            if pattern.is_match(&text) {
                text = pattern.replace_all(&text, NoExpand(label)).into_owned();
            }
        }

        let unified: String = text
            .replace("\r\n", "\n")
            .chars()
            .map(|c| match c {
                '\r' => '\n',
                '\u{FF1A}' => ':',
                c if DASH_VARIANTS.contains(&c) => '-',
                c if c != '\n' && c.is_control() => ' ',
                c => c,
            })
            .collect();

        unified
            .split('\n')
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Normalize with the built-in misread table.
pub fn normalize(raw: &str) -> String {
    Normalizer::new().normalize(raw)
}

/// Comparison key for label matching.
///
/// Lower-cased, diacritics stripped, every non-alphanumeric character
/// removed, so "Tjänst- göringsställe:" and "tjanstgoringsstalle" compare equal.
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_fixes_label_misreads() {
        assert_eq!(normalize("Fömamn\nEftemamn"), "Förnamn\nEfternamn");
        assert_eq!(normalize("fömamn"), "Förnamn");
        assert_eq!(normalize("Tiänstgöringsställe"), "Tjänstgöringsställe");
        // Only whole words.
        assert_eq!(normalize("XFömamn"), "XFömamn");
    }

    #[test]
    fn test_composes_decomposed_letters() {
        let decomposed = "Fo\u{0308}rnamn";
        assert_eq!(normalize(decomposed), "Förnamn");
    }

    #[test]
    fn test_unifies_dashes_and_colons() {
        assert_eq!(normalize("2025-01-01 \u{2013} 2025-04-01"), "2025-01-01 - 2025-04-01");
        assert_eq!(normalize("a\u{2014}b\u{2212}c"), "a-b-c");
        assert_eq!(normalize("Efternamn\u{FF1A} Svensson"), "Efternamn: Svensson");
    }

    #[test]
    fn test_collapses_whitespace_but_keeps_lines() {
        let raw = "  Efternamn \t  \r\n\r\n   Svensson   Berg \u{00a0}\n\n";
        assert_eq!(normalize(raw), "Efternamn\nSvensson Berg");
    }

    #[test]
    fn test_empty_and_control_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\u{0}\u{1}\u{7f}"), "");
    }

    #[test]
    fn test_extra_misread_from_config() {
        let config = NormalizerConfig {
            extra_misreads: vec![MisreadRule {
                from: "Namnförtvdligande".to_string(),
                to: "Namnförtydligande".to_string(),
            }],
        };
        let normalizer = Normalizer::from_config(&config).unwrap();
        assert_eq!(normalizer.normalize("Namnförtvdligande"), "Namnförtydligande");
    }

    #[test]
    fn test_extra_misread_must_not_match_its_replacement() {
        let rule = MisreadRule {
            from: "ST".to_string(),
            to: "ST-läkare".to_string(),
        };
        assert!(rewrites_own_output(&rule));
        assert!(matches!(Normalizer::new().with_misread(&rule), Err(IntygError::Config(_))));

        let rule = MisreadRule {
            from: "Delmal".to_string(),
            to: "Delmål".to_string(),
        };
        assert!(!rewrites_own_output(&rule));
        let normalizer = Normalizer::new().with_misread(&rule).unwrap();
        let once = normalizer.normalize("Delmal som intyget avser");
        assert_eq!(once, "Delmål som intyget avser");
        assert_eq!(normalizer.normalize(&once), once);
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("Tjänst- göringsställe:"), "tjanstgoringsstalle");
        assert_eq!(fold("SPECIALITET som ansökan avser"), "specialitetsomansokanavser");
        assert_eq!(fold("Delmål"), fold("delmal"));
        assert_eq!(fold("---"), "");
    }

    #[test]
    fn test_idempotent_on_sample() {
        let raw = "R1  Efternamn\r\nT1 Svensson\u{2013}Berg\n\n Fömamn :  Anna";
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalize_is_idempotent_on_form_like_text(
            s in "[A-Za-zÅÄÖåäö0-9 :\\-\u{2013}\u{2014}\t\r\n]{0,80}(Fömamn|Eftemamn|Tiänsteställe)?[ \n\u{00a0}a-z]{0,20}"
        ) {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
