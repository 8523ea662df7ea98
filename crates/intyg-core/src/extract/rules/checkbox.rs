//! Signer role from the "Kursledare / Handledare" checkbox pair.

use super::patterns::CHECKBOX_ROLE;
use crate::models::certificate::SignerRole;
use crate::normalize::fold;

/// A ticked role and the line it was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxChoice {
    pub role: SignerRole,
    pub line: usize,
}

/// Role named on a ticked checkbox line, if the line is one.
pub fn is_checkbox_line(line: &str) -> Option<SignerRole> {
    let caps = CHECKBOX_ROLE.captures(line.trim())?;
    let word = caps.get(1).or_else(|| caps.get(2))?.as_str().to_lowercase();
    if word.starts_with("kurs") {
        Some(SignerRole::CourseLeader)
    } else {
        Some(SignerRole::Supervisor)
    }
}

/// Role named by a checkbox caption, ticked or not.
pub fn role_from_caption(caption: &str) -> Option<SignerRole> {
    let key = fold(caption);
    if key.contains("kursledare") {
        Some(SignerRole::CourseLeader)
    } else if key.contains("handledare") {
        Some(SignerRole::Supervisor)
    } else {
        None
    }
}

/// Whether text read from a checkbox zone shows a mark.
pub fn has_mark(text: &str) -> bool {
    text.split_whitespace().any(|token| {
        matches!(token, "☒" | "✓" | "✗" | "☑" | "✔" | "x" | "X" | "[x]" | "[X]")
    })
}

/// First ticked role among the lines.
pub fn detect_checkbox_role<S: AsRef<str>>(lines: &[S]) -> Option<CheckboxChoice> {
    lines.iter().enumerate().find_map(|(i, l)| {
        is_checkbox_line(l.as_ref()).map(|role| CheckboxChoice { role, line: i })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_before_role() {
        assert_eq!(is_checkbox_line("☒ Kursledare"), Some(SignerRole::CourseLeader));
        assert_eq!(is_checkbox_line("X Handledare"), Some(SignerRole::Supervisor));
        assert_eq!(is_checkbox_line("x kursledare"), Some(SignerRole::CourseLeader));
        assert_eq!(is_checkbox_line("[x] Handledare"), Some(SignerRole::Supervisor));
    }

    #[test]
    fn test_mark_after_role() {
        assert_eq!(is_checkbox_line("Kursledare ✓"), Some(SignerRole::CourseLeader));
    }

    #[test]
    fn test_plain_role_is_not_ticked() {
        assert_eq!(is_checkbox_line("Kursledare"), None);
        assert_eq!(is_checkbox_line("Handledare Anna Berg"), None);
    }

    #[test]
    fn test_caption_role() {
        assert_eq!(role_from_caption("Kursledare"), Some(SignerRole::CourseLeader));
        assert_eq!(role_from_caption("handledare"), Some(SignerRole::Supervisor));
        assert_eq!(role_from_caption("Studierektor"), None);
    }

    #[test]
    fn test_zone_mark() {
        assert!(has_mark("☒"));
        assert!(has_mark("X Kursledare"));
        assert!(!has_mark("Kursledare"));
        assert!(!has_mark(""));
    }

    #[test]
    fn test_detect_first_choice() {
        let lines = ["Kursledare", "Handledare", "☑ Handledare", "X Kursledare"];
        let choice = detect_checkbox_role(&lines).unwrap();
        assert_eq!(choice.role, SignerRole::Supervisor);
        assert_eq!(choice.line, 2);
    }
}
