//! Data models: the extracted certificate, OCR input and configuration.

pub mod certificate;
pub mod config;

pub use certificate::{OcrInput, ParsedCertificate, ServicePeriod, Signer, SignerRole, WordBox};
pub use config::{ExtractionConfig, IntygConfig, MisreadRule, NormalizerConfig, OutputConfig};
