//! Batch command - extract insights from a whole OCR archive.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use packscan_core::barcode::barcode_from_path;
use packscan_core::{DocumentInsights, OcrDocument, ProductClient, REGISTRY, extract};

use super::load_config;
use crate::sources;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Barcode, directory of JSON files, JSONL archive, or single JSON file
    #[arg(required = true)]
    input: String,

    /// Insight type to extract
    #[arg(short = 't', long)]
    insight_type: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep documents yielding zero insights
    #[arg(long)]
    keep_empty: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    if REGISTRY.matchers(&args.insight_type).is_none() {
        anyhow::bail!("unknown insight type: {}", args.insight_type);
    }

    let config = load_config(config_path)?;
    let client = ProductClient::new(config.api)?;

    let inputs = sources::collect(&args.input, &client).await?;
    if inputs.is_empty() {
        anyhow::bail!("no OCR documents found for input: {}", args.input);
    }

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut written = 0usize;
    let mut skipped = 0usize;

    for input in &inputs {
        pb.inc(1);

        let Some(document) = OcrDocument::from_provider(&input.payload) else {
            skipped += 1;
            continue;
        };

        let insights = extract(&document, &args.insight_type)?;
        if insights.is_empty() && !args.keep_empty {
            skipped += 1;
            continue;
        }

        let barcode = input
            .source
            .as_deref()
            .and_then(|source| barcode_from_path(Path::new(source)));

        let line = DocumentInsights {
            insight_type: args.insight_type.clone(),
            barcode,
            insights,
            source: input.source.clone(),
        };

        writeln!(writer, "{}", serde_json::to_string(&line)?)?;
        written += 1;
    }

    writer.flush()?;
    pb.finish_and_clear();

    eprintln!(
        "{} Wrote {} documents ({} skipped)",
        style("✓").green(),
        written,
        skipped
    );

    Ok(())
}
