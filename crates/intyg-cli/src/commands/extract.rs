//! Extract command - read one certificate from OCR text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::{debug, info};

use intyg_core::{
    display_labels, CertificateExtractor, CertificateKind, ExtractionResult, ParsedCertificate, WordBox,
};

use super::{load_config, parse_input, parse_kind, read_input};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR text or JSON file, `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Certificate kind, e.g. 2015-B4-KLIN
    #[arg(short, long, value_parser = parse_kind)]
    kind: CertificateKind,

    /// JSON array of word boxes for zone extraction
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include the extraction trace in JSON output
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut input = if args.input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
        parse_input(&args.input, text)?
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        read_input(&args.input)?
    };

    if let Some(words_path) = &args.words {
        input.words = read_words(words_path)?;
    }

    info!("Extracting {} from {}", args.kind, args.input.display());

    let extractor = CertificateExtractor::from_config(&config)?.with_trace(args.trace || config.extraction.trace);
    let result = extractor.extract(args.kind, &input);

    let output = format_result(&result, args.format, config.output.pretty_json, config.output.show_missing)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_words(path: &Path) -> anyhow::Result<Vec<WordBox>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid word box JSON in {}", path.display()))
}

/// Render one result in the requested format.
pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    pretty: bool,
    show_missing: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_certificate_csv(result),
        OutputFormat::Text => Ok(format_certificate_text(result, show_missing)),
    }
}

const CSV_HEADER: [&str; 18] = [
    "kind",
    "strategy",
    "full_name",
    "first_name",
    "last_name",
    "personal_id",
    "specialty",
    "competency_codes",
    "subject",
    "description",
    "start_date",
    "end_date",
    "course_leader",
    "signer_name",
    "signer_speciality",
    "signer_site",
    "signer_role",
    "warnings",
];

fn csv_row(result: &ExtractionResult) -> Vec<String> {
    let cert = &result.certificate;
    let period = cert.service_period.clone().unwrap_or_default();
    let signer = cert.signer.clone().unwrap_or_default();
    vec![
        cert.kind.to_string(),
        result.strategy.to_string(),
        cert.full_name.clone().unwrap_or_default(),
        cert.first_name.clone().unwrap_or_default(),
        cert.last_name.clone().unwrap_or_default(),
        cert.personal_id.clone().unwrap_or_default(),
        cert.specialty_header.clone().unwrap_or_default(),
        cert.competency_codes.join(";"),
        cert.subject.clone().unwrap_or_default(),
        cert.description.clone().unwrap_or_default(),
        period.start_date.unwrap_or_default(),
        period.end_date.unwrap_or_default(),
        cert.course_leader.clone().unwrap_or_default(),
        signer.name.unwrap_or_default(),
        signer.speciality.unwrap_or_default(),
        signer.site.unwrap_or_default(),
        signer.role.map(|r| r.as_str().to_string()).unwrap_or_default(),
        result.warnings.len().to_string(),
    ]
}

fn format_certificate_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(result))?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn push_field(output: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        output.push_str(&format!("{:<14}{}\n", format!("{}:", label), value));
    }
}

fn format_certificate_text(result: &ExtractionResult, show_missing: bool) -> String {
    let cert: &ParsedCertificate = &result.certificate;
    let labels = display_labels(cert.kind);
    let mut output = String::new();

    output.push_str(&format!("{} ({})\n", labels.title, cert.kind));
    output.push_str(&format!("Strategy: {}\n\n", result.strategy));

    push_field(&mut output, "Name", cert.full_name.as_deref());
    push_field(&mut output, "Personnummer", cert.personal_id.as_deref());
    push_field(&mut output, "Specialty", cert.specialty_header.as_deref());
    if !cert.competency_codes.is_empty() {
        push_field(&mut output, "Delmål", Some(&cert.competency_codes.join(", ")));
    }
    push_field(&mut output, labels.subject_label, cert.subject.as_deref());
    if let Some(period) = &cert.service_period {
        let range = format!(
            "{} - {}",
            period.start_date.as_deref().unwrap_or("?"),
            period.end_date.as_deref().unwrap_or("?")
        );
        push_field(&mut output, "Period", Some(&range));
    }
    push_field(&mut output, "Course leader", cert.course_leader.as_deref());

    if let Some(signer) = &cert.signer {
        output.push_str("\nSigned by:\n");
        push_field(&mut output, "  Name", signer.name.as_deref());
        push_field(&mut output, "  Specialty", signer.speciality.as_deref());
        push_field(&mut output, "  Site", signer.site.as_deref());
        push_field(&mut output, "  Role", signer.role.map(|r| r.as_str()));
    }

    if let Some(description) = &cert.description {
        output.push_str(&format!("\n{}:\n", labels.description_label));
        for line in description.lines() {
            output.push_str(&format!("  {}\n", line));
        }
    }

    if show_missing && !result.warnings.is_empty() {
        output.push('\n');
        for warning in &result.warnings {
            output.push_str(&format!("! {}\n", warning));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use intyg_core::OcrInput;

    fn sample() -> ExtractionResult {
        let text = "Efternamn\nSvensson\nFörnamn\nAnna\nPersonnummer\n861027-4857\nDelmål som intyget avser\na1, b2";
        CertificateExtractor::new().extract(CertificateKind::Klin2015, &OcrInput::from_text(text))
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let csv = format_result(&sample(), OutputFormat::Csv, false, false).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("kind,strategy,full_name"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("2015-B4-KLIN,labelScan,Anna Svensson,Anna,Svensson,8610274857"));
        assert!(row.contains("a1;b2"));
    }

    #[test]
    fn test_text_lists_fields_and_warnings() {
        let text = format_result(&sample(), OutputFormat::Text, false, true).unwrap();
        assert!(text.contains("Name:         Anna Svensson"));
        assert!(text.contains("Delmål:       a1, b2"));
        assert!(text.contains("! Could not extract description"));

        let quiet = format_result(&sample(), OutputFormat::Text, false, false).unwrap();
        assert!(!quiet.contains("Could not extract"));
    }

    #[test]
    fn test_json_is_camel_case() {
        let json = format_result(&sample(), OutputFormat::Json, false, false).unwrap();
        assert!(json.contains(r#""fullName":"Anna Svensson""#));
        assert!(json.contains(r#""strategy":"labelScan""#));
        assert!(json.contains(r#""processingTimeMs""#));
    }
}
