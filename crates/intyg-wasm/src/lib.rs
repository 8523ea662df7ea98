//! WASM bindings for Swedish ST certificate OCR text extraction.
//!
//! The browser runs OCR itself (e.g. tesseract.js) and hands the text, and
//! optionally the word boxes, to these functions.

use wasm_bindgen::prelude::*;

use intyg_core::{CertificateExtractor, CertificateKind, OcrInput, WordBox};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_kind(kind: &str) -> Result<CertificateKind, JsValue> {
    kind.parse().map_err(js_err)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_err)
}

fn words_from_js(words: JsValue) -> Result<Vec<WordBox>, JsValue> {
    if words.is_undefined() || words.is_null() {
        return Ok(Vec::new());
    }
    serde_wasm_bindgen::from_value(words).map_err(js_err)
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract a certificate of `kind` from OCR text.
///
/// Returns the certificate object; throws only for an unknown kind.
#[wasm_bindgen]
pub fn extract_certificate(kind: &str, text: &str) -> Result<JsValue, JsValue> {
    let cert = intyg_core::extract(kind, text, None).map_err(js_err)?;
    to_js(&cert)
}

/// Extract a certificate using word boxes (`[{text, x1, y1, x2, y2}]`) for
/// zone extraction.
#[wasm_bindgen]
pub fn extract_with_words(
    kind: &str,
    text: &str,
    words: JsValue,
    page_width: Option<f32>,
    page_height: Option<f32>,
) -> Result<JsValue, JsValue> {
    let kind = parse_kind(kind)?;
    let mut input = OcrInput::from_text(text).with_words(words_from_js(words)?);
    if let (Some(w), Some(h)) = (page_width, page_height) {
        input = input.with_page_size(w, h);
    }
    let result = CertificateExtractor::new().extract(kind, &input);
    to_js(&result.certificate)
}

/// Title and field captions for rendering a kind.
#[wasm_bindgen]
pub fn display_labels(kind: &str) -> Result<JsValue, JsValue> {
    to_js(&intyg_core::display_labels(parse_kind(kind)?))
}

/// Whether the kind's form carries a service period.
#[wasm_bindgen]
pub fn has_date_fields(kind: &str) -> Result<bool, JsValue> {
    Ok(intyg_core::has_date_fields(parse_kind(kind)?))
}

/// Every known kind identifier.
#[wasm_bindgen]
pub fn list_kinds() -> Vec<String> {
    intyg_core::all_kinds().iter().map(|k| k.as_str().to_string()).collect()
}

/// Normalize raw OCR text (misreads, dashes, whitespace).
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    intyg_core::normalize(text)
}

/// Check a personal identity number's Luhn digit.
#[wasm_bindgen]
pub fn validate_personal_id(id: &str) -> bool {
    intyg_core::extract::rules::validate_personal_id(id)
}

/// Certificate extractor class for browser use.
#[wasm_bindgen]
pub struct IntygExtractor {
    extractor: CertificateExtractor,
}

#[wasm_bindgen]
impl IntygExtractor {
    /// Create a new certificate extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: CertificateExtractor::new(),
        }
    }

    /// Record a diagnostics trace in `extract_with_metadata` results.
    #[wasm_bindgen]
    pub fn set_trace(&mut self, enabled: bool) {
        self.replace(|e| e.with_trace(enabled));
    }

    /// Use word boxes for zone extraction.
    #[wasm_bindgen]
    pub fn set_zones(&mut self, enabled: bool) {
        self.replace(|e| e.with_zones(enabled));
    }

    /// Configure personal id check-digit validation.
    #[wasm_bindgen]
    pub fn set_validate_personal_id(&mut self, validate: bool) {
        self.replace(|e| e.with_personal_id_validation(validate));
    }

    fn replace(&mut self, f: impl FnOnce(CertificateExtractor) -> CertificateExtractor) {
        let current = std::mem::take(&mut self.extractor);
        self.extractor = f(current);
    }

    /// Extract a certificate from text.
    #[wasm_bindgen]
    pub fn extract(&self, kind: &str, text: &str) -> Result<JsValue, JsValue> {
        let result = self.extractor.extract(parse_kind(kind)?, &OcrInput::from_text(text));
        to_js(&result.certificate)
    }

    /// Extract from a full OCR result (`{text, words?, pageSize?}`) and
    /// return the certificate with strategy, warnings and trace.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, kind: &str, input: JsValue) -> Result<JsValue, JsValue> {
        let kind = parse_kind(kind)?;
        let input: OcrInput = serde_wasm_bindgen::from_value(input).map_err(js_err)?;
        to_js(&self.extractor.extract(kind, &input))
    }
}

impl Default for IntygExtractor {
    fn default() -> Self {
        Self::new()
    }
}
