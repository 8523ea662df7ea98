//! Kinds command - list the registered certificate kinds.

use clap::Args;
use console::style;
use serde::Serialize;

use intyg_core::{all_kinds, display_labels, get_schema, CertificateKind};

/// Arguments for the kinds command.
#[derive(Args)]
pub struct KindsArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KindInfo {
    id: &'static str,
    title: &'static str,
    regime: &'static str,
    has_schema: bool,
    has_date_fields: bool,
}

impl KindInfo {
    fn new(kind: CertificateKind) -> Self {
        Self {
            id: kind.as_str(),
            title: display_labels(kind).title,
            regime: kind.regime().as_str(),
            has_schema: get_schema(kind).is_some(),
            has_date_fields: kind.has_date_fields(),
        }
    }
}

pub fn run(args: KindsArgs) -> anyhow::Result<()> {
    let kinds: Vec<KindInfo> = all_kinds().iter().copied().map(KindInfo::new).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&kinds)?);
        return Ok(());
    }

    println!(
        "{}",
        style(format!("{:<22} {:<8} {:<7} {:<6} {}", "KIND", "REGIME", "SCHEMA", "DATES", "TITLE")).bold()
    );
    for info in &kinds {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        println!(
            "{:<22} {:<8} {:<7} {:<6} {}",
            info.id,
            info.regime,
            yes_no(info.has_schema),
            yes_no(info.has_date_fields),
            info.title
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_kind_has_no_schema() {
        let info = KindInfo::new(CertificateKind::Ans2021);
        assert!(!info.has_schema);
        assert_eq!(info.id, "2021-B5-ANS");

        let info = KindInfo::new(CertificateKind::Klin2015);
        assert!(info.has_schema);
        assert!(info.has_date_fields);
    }
}
