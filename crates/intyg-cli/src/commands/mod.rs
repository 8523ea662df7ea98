//! Subcommands and the input/config helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod kinds;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use intyg_core::{CertificateKind, IntygConfig, OcrInput};

/// Parse a kind identifier such as `2015-B4-KLIN`.
pub fn parse_kind(s: &str) -> Result<CertificateKind, String> {
    s.parse()
        .map_err(|e: intyg_core::IntygError| format!("{} (run `intyg kinds` for the list)", e))
}

/// Configuration from `--config`, else the user config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<IntygConfig> {
    if let Some(path) = config_path {
        return IntygConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let path = config::default_config_path();
    if path.exists() {
        debug!("Using config {}", path.display());
        return IntygConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    Ok(IntygConfig::default())
}

/// Read an OCR input file.
///
/// `.json` files hold a full OCR result (`text`, optional `words` and
/// `pageSize`); anything else is plain text.
pub fn read_input(path: &Path) -> anyhow::Result<OcrInput> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_input(path, content)
}

pub fn parse_input(path: &Path, content: String) -> anyhow::Result<OcrInput> {
    if is_json(path) {
        serde_json::from_str(&content).with_context(|| format!("Invalid OCR JSON in {}", path.display()))
    } else {
        Ok(OcrInput::from_text(content))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Output path for `input` inside `dir` with a new extension.
pub fn output_path(dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("intyg");
    dir.join(format!("{}.{}", stem, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("2021-b10-kurs"), Ok(CertificateKind::Kurs2021));
        assert!(parse_kind("B10").unwrap_err().contains("intyg kinds"));
    }

    #[test]
    fn test_parse_input_by_extension() {
        let json = r#"{"text": "Efternamn\nSvensson", "words": [{"text": "Svensson", "x1": 1, "y1": 2, "x2": 3, "y2": 4}], "pageSize": [1128, 1584]}"#;
        let input = parse_input(Path::new("scan.JSON"), json.to_string()).unwrap();
        assert_eq!(input.words.len(), 1);
        assert_eq!(input.page_size, Some((1128.0, 1584.0)));

        let input = parse_input(Path::new("scan.txt"), json.to_string()).unwrap();
        assert!(input.words.is_empty());
        assert!(input.text.starts_with('{'));
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("out"), Path::new("in/anna.txt"), "json");
        assert_eq!(path, Path::new("out").join("anna.json"));
    }
}
