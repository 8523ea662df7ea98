//! Stateless field primitives shared by every certificate kind.

pub mod blocks;
pub mod checkbox;
pub mod codes;
pub mod dates;
pub mod patterns;
pub mod personal_id;
pub mod text;

pub use blocks::{extract_block, extract_name_block, value_after_label, NameParts};
pub use checkbox::{detect_checkbox_role, has_mark, is_checkbox_line, role_from_caption, CheckboxChoice};
pub use codes::{extract_competency_codes, leading_code_lines, normalize_codes, CodeExtractor};
pub use dates::{extract_dates, extract_period, extract_period_range, split_text_and_period, DateExtractor};
pub use personal_id::{extract_personal_id, validate_personal_id, PersonalIdExtractor};
pub use text::{strip_citation, strip_personal_id, strip_purpose_suffix, tidy};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched value with its location in the source text.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
