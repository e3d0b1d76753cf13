//! Extract command - print insights for one OCR document or barcode.

use clap::Args;
use tracing::info;

use packscan_core::{OcrDocument, ProductClient, extract};

use super::load_config;
use crate::sources;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR JSON file or barcode
    #[arg(required = true)]
    input: String,

    /// Insight type to extract
    #[arg(short = 't', long)]
    insight_type: String,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let client = ProductClient::new(config.api)?;

    let inputs = sources::collect(&args.input, &client).await?;
    info!("resolved {} OCR documents", inputs.len());

    for input in &inputs {
        let Some(document) = OcrDocument::from_provider(&input.payload) else {
            continue;
        };

        let records = extract(&document, &args.insight_type)?;
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    Ok(())
}
