//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{IntygError, Result};

/// Main configuration for the intyg pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntygConfig {
    /// Extraction strategy configuration.
    pub extraction: ExtractionConfig,

    /// Text normalization configuration.
    pub normalizer: NormalizerConfig,

    /// Output configuration for front-ends.
    pub output: OutputConfig,
}

/// Extraction strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum number of `R<n>`/`T<n>` lines before annotated parsing is tried.
    pub annotation_min_tags: usize,

    /// Minimum number of `X` lines before annotated parsing is tried.
    pub annotation_min_ignore_tags: usize,

    /// Minimum number of lines for the label scan to run at all.
    pub min_scan_lines: usize,

    /// Use word boxes for zone pre-extraction when they are supplied.
    pub use_zones: bool,

    /// Run the coarse whole-text regex fallback as last resort.
    pub use_regex_fallback: bool,

    /// Reject personal ids with a bad Luhn check digit.
    pub validate_personal_id: bool,

    /// Look for a date range anywhere in the text when no period field was read.
    pub period_fallback: bool,

    /// Record a diagnostics trace for every extraction.
    pub trace: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            annotation_min_tags: 6,
            annotation_min_ignore_tags: 3,
            min_scan_lines: 5,
            use_zones: true,
            use_regex_fallback: true,
            validate_personal_id: false,
            period_fallback: true,
            trace: false,
        }
    }
}

/// Text normalization configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Additional OCR misread corrections applied after the built-in table.
    /// A replacement must not contain its own misread, or normalization
    /// stops being idempotent.
    pub extra_misreads: Vec<MisreadRule>,
}

/// One OCR misread correction, matched as a whole word, case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MisreadRule {
    pub from: String,
    pub to: String,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,

    /// Include the list of unread fields in text output.
    pub show_missing: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            show_missing: true,
        }
    }
}

impl IntygConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot constrain.
    pub fn validate(&self) -> Result<()> {
        for rule in &self.normalizer.extra_misreads {
            if rule.from.trim().is_empty() {
                return Err(IntygError::Config(
                    "normalizer.extra_misreads entries need a non-empty `from`".to_string(),
                ));
            }
            if crate::normalize::rewrites_own_output(rule) {
                return Err(IntygError::Config(format!(
                    "normalizer.extra_misreads: `{}` reappears in its replacement `{}`",
                    rule.from, rule.to
                )));
            }
        }
        if self.extraction.annotation_min_tags == 0 && self.extraction.annotation_min_ignore_tags == 0 {
            return Err(IntygError::Config(
                "annotation thresholds cannot both be zero".to_string(),
            ));
        }
        Ok(())
    }
}
