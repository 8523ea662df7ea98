//! Certificate field extraction.
//!
//! Strategies run in a fixed order and the first accepted record wins:
//! annotated text, template zones, label scan, then the whole-text regex
//! fallback. Every strategy hands raw field values to the same
//! [`Assembler`](assemble::Assembler).

mod annotated;
pub mod assemble;
mod fallback;
mod label_scan;
pub mod rules;
pub mod trace;
mod zones;

pub use annotated::{AnnotatedStrategy, Tag, TaggedLine};
pub use fallback::RegexFallbackStrategy;
pub use label_scan::LabelScanStrategy;
pub use trace::{Trace, TraceEvent};
pub use zones::{text_in_rect, ZoneStrategy};

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::certificate::{OcrInput, ParsedCertificate, WordBox};
use crate::models::config::{ExtractionConfig, IntygConfig};
use crate::normalize::Normalizer;
use crate::schema::{get_schema, sections, CertificateKind, Line, Schema, Section};
use assemble::Assembler;

/// Which strategy produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyUsed {
    Annotated,
    Zones,
    LabelScan,
    RegexFallback,
    /// Nothing was accepted; the record carries only the kind.
    None,
}

impl StrategyUsed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annotated => "annotated",
            Self::Zones => "zones",
            Self::LabelScan => "labelScan",
            Self::RegexFallback => "regexFallback",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for StrategyUsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized OCR input shared by all strategies.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub kind: CertificateKind,
    /// Normalized text.
    pub text: String,
    pub lines: Vec<Line>,
    /// Section of each line in `lines`.
    pub sections: Vec<Section>,
    pub words: &'a [WordBox],
    pub page_size: Option<(f32, f32)>,
}

impl<'a> Document<'a> {
    pub fn new(kind: CertificateKind, input: &'a OcrInput, normalizer: &Normalizer) -> Self {
        let mut doc = Self::from_normalized(kind, normalizer.normalize(&input.text));
        doc.words = &input.words;
        doc.page_size = input.page_size;
        doc
    }

    fn from_normalized(kind: CertificateKind, text: String) -> Self {
        let lines = Line::split(&text);
        let sections = sections(&lines);
        Self {
            kind,
            text,
            lines,
            sections,
            words: &[],
            page_size: None,
        }
    }
}

impl Document<'static> {
    /// Document from plain text, normalized with the built-in table.
    pub fn from_text(kind: CertificateKind, raw: &str) -> Self {
        Self::from_normalized(kind, Normalizer::new().normalize(raw))
    }
}

/// One way of reading a certificate.
pub trait ExtractionStrategy: Send + Sync {
    fn kind(&self) -> StrategyUsed;

    /// A record when the strategy applies and its acceptance rule holds.
    fn extract(&self, schema: &Schema, doc: &Document<'_>, trace: &mut Trace) -> Option<ParsedCertificate>;
}

/// Result of one extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub certificate: ParsedCertificate,
    pub strategy: StrategyUsed,
    /// Values that need checking, then fields that could not be read.
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "trace_is_empty")]
    pub trace: Trace,
    pub processing_time_ms: u64,
}

fn trace_is_empty(trace: &Trace) -> bool {
    trace.events().is_empty()
}

// `Instant::now` panics on wasm32-unknown-unknown
#[cfg(not(target_arch = "wasm32"))]
fn start_clock() -> Option<Instant> {
    Some(Instant::now())
}

#[cfg(target_arch = "wasm32")]
fn start_clock() -> Option<Instant> {
    None
}

fn elapsed_ms(start: Option<Instant>) -> u64 {
    start.map_or(0, |s| s.elapsed().as_millis() as u64)
}

/// Extractor running the strategy chain for any certificate kind.
pub struct CertificateExtractor {
    config: ExtractionConfig,
    normalizer: Normalizer,
}

impl CertificateExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            normalizer: Normalizer::new(),
        }
    }

    /// Create an extractor from a loaded configuration.
    pub fn from_config(config: &IntygConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.extraction.clone(),
            normalizer: Normalizer::from_config(&config.normalizer)?,
        })
    }

    /// Record a diagnostics trace.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.config.trace = enabled;
        self
    }

    /// Use word boxes for zone extraction.
    pub fn with_zones(mut self, enabled: bool) -> Self {
        self.config.use_zones = enabled;
        self
    }

    /// Run the whole-text regex fallback.
    pub fn with_regex_fallback(mut self, enabled: bool) -> Self {
        self.config.use_regex_fallback = enabled;
        self
    }

    /// Reject personal ids with a bad check digit.
    pub fn with_personal_id_validation(mut self, validate: bool) -> Self {
        self.config.validate_personal_id = validate;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    fn strategies(&self) -> Vec<Box<dyn ExtractionStrategy>> {
        let assembler = Assembler::new().with_personal_id_validation(self.config.validate_personal_id);

        let mut chain: Vec<Box<dyn ExtractionStrategy>> = vec![Box::new(
            AnnotatedStrategy::new(assembler)
                .with_thresholds(self.config.annotation_min_tags, self.config.annotation_min_ignore_tags),
        )];
        if self.config.use_zones {
            chain.push(Box::new(ZoneStrategy::new(assembler).with_normalizer(self.normalizer.clone())));
        }
        chain.push(Box::new(
            LabelScanStrategy::new(assembler)
                .with_min_lines(self.config.min_scan_lines)
                .with_period_fallback(self.config.period_fallback),
        ));
        if self.config.use_regex_fallback {
            chain.push(Box::new(RegexFallbackStrategy::new(assembler)));
        }
        chain
    }

    /// Extract a certificate of `kind` from OCR output. Never fails; unread
    /// fields are absent and listed in the warnings.
    pub fn extract(&self, kind: CertificateKind, input: &OcrInput) -> ExtractionResult {
        let start = start_clock();
        let mut trace = if self.config.trace { Trace::enabled() } else { Trace::disabled() };

        info!(
            "Extracting {} from {} characters and {} word boxes",
            kind,
            input.text.len(),
            input.words.len()
        );

        let Some(schema) = get_schema(kind) else {
            debug!("{} is administrative, nothing to extract", kind);
            return ExtractionResult {
                certificate: ParsedCertificate::empty(kind),
                strategy: StrategyUsed::None,
                warnings: vec![format!("No activity to extract for {}", kind)],
                trace,
                processing_time_ms: elapsed_ms(start),
            };
        };

        let doc = Document::new(kind, input, &self.normalizer);
        let (certificate, strategy) = self
            .strategies()
            .iter()
            .find_map(|s| {
                let notices = trace.notices().len();
                let cert = s.extract(schema, &doc, &mut trace);
                if cert.is_none() {
                    trace.truncate_notices(notices);
                }
                trace.record("chain", || {
                    format!("{} {}", s.kind(), if cert.is_some() { "accepted" } else { "declined" })
                });
                cert.map(|c| (c, s.kind()))
            })
            .unwrap_or_else(|| (ParsedCertificate::empty(kind), StrategyUsed::None));

        let mut warnings = trace.take_notices();
        warnings.extend(
            certificate
                .missing_fields()
                .into_iter()
                .map(|field| format!("Could not extract {}", field)),
        );

        debug!(
            "Extracted {} fields of {} via {}",
            certificate.populated_fields(),
            kind,
            strategy
        );

        ExtractionResult {
            certificate,
            strategy,
            warnings,
            trace,
            processing_time_ms: elapsed_ms(start),
        }
    }

    /// Same as [`extract`](Self::extract) for a kind given by its identifier.
    pub fn extract_str(&self, kind: &str, input: &OcrInput) -> Result<ExtractionResult> {
        let kind: CertificateKind = kind.parse()?;
        Ok(self.extract(kind, input))
    }
}

impl Default for CertificateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a certificate with default settings.
///
/// Fails only for an unknown kind identifier.
pub fn extract(kind: &str, raw_text: &str, words: Option<Vec<WordBox>>) -> Result<ParsedCertificate> {
    let input = OcrInput::from_text(raw_text).with_words(words.unwrap_or_default());
    CertificateExtractor::new()
        .extract_str(kind, &input)
        .map(|r| r.certificate)
}
