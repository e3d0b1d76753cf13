//! Import command - load a batch output file into the insight store.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use serde_json::{Value, json};
use tracing::warn;

use packscan_core::{DocumentInsights, InsightStore, PendingInsight, SqliteInsightStore};

use super::load_config;

/// Arguments for the import command.
#[derive(Args)]
pub struct ImportArgs {
    /// JSONL file produced by the batch command
    #[arg(required = true)]
    input: PathBuf,

    /// Database file (default: from config)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub async fn run(args: ImportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let db_path = args.db.unwrap_or(config.store.db_path);
    let store = SqliteInsightStore::open(&db_path)?;

    let file = fs::File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    let mut imported = 0usize;

    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let document: DocumentInsights = serde_json::from_str(&line)?;
        let Some(barcode) = document.barcode else {
            warn!("skipping line without barcode");
            continue;
        };

        for record in document.insights {
            let mut data = json!({
                "text": record.value,
                "raw": record.raw,
            });
            if let Some(Value::Object(extra)) = record.data {
                for (key, value) in extra {
                    data[key] = value;
                }
            }

            let insight =
                PendingInsight::new(barcode.as_str(), document.insight_type.as_str(), data);
            store.insert(&insight)?;
            imported += 1;
        }
    }

    println!(
        "{} Imported {} insights into {}",
        style("✓").green(),
        imported,
        db_path.display()
    );

    Ok(())
}
