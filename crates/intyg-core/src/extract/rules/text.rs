//! Small cleanups applied to captured field values.

use super::patterns::{PERSONAL_ID, PURPOSE_SUFFIX, REGULATION_CITATION, TRAILING_PUNCTUATION};

/// Collapse inner whitespace, trim, and drop trailing punctuation.
pub fn tidy(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    TRAILING_PUNCTUATION.replace(&collapsed, "").trim().to_string()
}

/// Cut a regulation citation ("SOSFS 2015:8", "HSLF-FS 2021:8", "Bilaga 3")
/// and everything after it from a single-line value.
pub fn strip_citation(value: &str) -> String {
    tidy(&REGULATION_CITATION.replace(value, ""))
}

/// Drop a trailing purpose phrase such as "för auskultationen".
pub fn strip_purpose_suffix(value: &str) -> String {
    tidy(&PURPOSE_SUFFIX.replace(value, ""))
}

/// Remove personal-id tokens from a value printed on the same row as a
/// "Personnummer" box (2021 specialty and supervisor name rows).
pub fn strip_personal_id(value: &str) -> String {
    tidy(&PERSONAL_ID.replace_all(value, " "))
}
