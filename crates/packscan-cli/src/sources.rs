//! Input resolution: turn a CLI input argument into OCR documents.
//!
//! Accepted inputs: a barcode (documents are fetched from the product API),
//! a directory of `.json` files, a `.jsonl` archive, or a single `.json`
//! file.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, bail};
use glob::glob;
use serde_json::Value;
use tracing::{debug, warn};

use packscan_core::ProductClient;
use packscan_core::barcode::{barcode_from_path, is_barcode, source_image_path};

/// One OCR document with the source it was loaded from.
pub struct OcrInput {
    /// Canonical source path, when recoverable.
    pub source: Option<String>,
    /// Raw provider envelope or response.
    pub payload: Value,
}

/// Resolve `input` into OCR documents.
pub async fn collect(input: &str, client: &ProductClient) -> anyhow::Result<Vec<OcrInput>> {
    if is_barcode(input) {
        return collect_from_barcode(input, client).await;
    }

    let path = Path::new(input);
    if !path.exists() {
        bail!("unrecognized input: {input}");
    }

    if path.is_dir() {
        collect_from_dir(path)
    } else if input.ends_with(".jsonl") {
        collect_from_jsonl(path)
    } else {
        let payload = read_json(path)?;
        Ok(vec![OcrInput {
            source: None,
            payload,
        }])
    }
}

async fn collect_from_barcode(
    barcode: &str,
    client: &ProductClient,
) -> anyhow::Result<Vec<OcrInput>> {
    let mut documents = Vec::new();

    for image_name in client.fetch_product_images(barcode).await? {
        debug!("fetching OCR for image {image_name}");
        match client.fetch_ocr(barcode, &image_name).await {
            Ok(Some(payload)) => documents.push(OcrInput {
                source: Some(source_image_path(barcode, &image_name)?),
                payload,
            }),
            Ok(None) => {}
            Err(err) => warn!("skipping image {image_name}: {err}"),
        }
    }

    Ok(documents)
}

fn collect_from_dir(dir: &Path) -> anyhow::Result<Vec<OcrInput>> {
    let pattern = format!("{}/**/*.json", dir.display());
    let mut documents = Vec::new();

    for entry in glob(&pattern)? {
        let json_path = entry?;
        let payload = read_json(&json_path)?;

        // Documents archived under digit-named directories map back to an
        // image path; anything else keeps its filesystem path as source.
        let source = match (
            barcode_from_path(&json_path),
            json_path.file_stem().and_then(|s| s.to_str()),
        ) {
            (Some(barcode), Some(stem)) => source_image_path(&barcode, stem)
                .unwrap_or_else(|_| json_path.display().to_string()),
            _ => json_path.display().to_string(),
        };

        documents.push(OcrInput {
            source: Some(source),
            payload,
        });
    }

    Ok(documents)
}

fn collect_from_jsonl(path: &Path) -> anyhow::Result<Vec<OcrInput>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut documents = Vec::new();

    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut record: Value = serde_json::from_str(&line)?;
        let Some(payload) = record.get_mut("content").map(Value::take) else {
            debug!("skipping archive line without content");
            continue;
        };

        let source = record
            .get("source")
            .and_then(Value::as_str)
            .map(|s| s.replace("//", "/"));

        documents.push(OcrInput { source, payload });
    }

    Ok(documents)
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid JSON in {}", path.display()))
}
