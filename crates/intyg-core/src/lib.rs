//! Core library for Swedish specialist-training certificate OCR.
//!
//! This crate provides:
//! - Text normalization for noisy OCR output (misreads, dashes, Unicode)
//! - Declarative label schemas for every SOSFS 2015:8 and HSLF-FS 2021:8 form
//! - A strategy chain: annotated text, template zones, label scan, regex fallback
//! - Field primitives: personal identity numbers, dates, competency codes
//! - Certificate data models serialized as camelCase JSON

pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod schema;

pub use error::{IntygError, Result};
pub use extract::{
    extract, CertificateExtractor, Document, ExtractionResult, ExtractionStrategy, StrategyUsed, Trace,
    TraceEvent,
};
pub use models::{
    ExtractionConfig, IntygConfig, OcrInput, ParsedCertificate, ServicePeriod, Signer, SignerRole, WordBox,
};
pub use normalize::{fold, normalize, Normalizer};
pub use schema::{all_kinds, display_labels, get_schema, has_date_fields, CertificateKind, DisplayLabels, Regime};
