//! Annotate command - apply the per-type side effect of an accepted insight.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use console::style;
use uuid::Uuid;

use packscan_core::{AnnotatorRegistry, InsightStore, ProductClient, SqliteInsightStore};

use super::load_config;

/// Arguments for the annotate command.
#[derive(Args)]
pub struct AnnotateArgs {
    /// Id of the insight to annotate
    #[arg(long)]
    id: String,

    /// Annotation verdict to record
    #[arg(long, default_value_t = 1)]
    value: i32,

    /// Database file (default: from config)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub async fn run(args: AnnotateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let id = Uuid::parse_str(&args.id).context("invalid insight id")?;

    let config = load_config(config_path)?;
    let db_path = args.db.unwrap_or(config.store.db_path);

    let store: Arc<SqliteInsightStore> = Arc::new(SqliteInsightStore::open(&db_path)?);
    let client = Arc::new(ProductClient::new(config.api)?);
    let registry = AnnotatorRegistry::standard(client, store.clone());

    let insight = store
        .get(id)?
        .with_context(|| format!("insight {id} not found"))?;

    registry.annotate(&insight).await?;
    store.mark_annotated(id, args.value)?;

    println!(
        "{} Annotated {} insight {}",
        style("✓").green(),
        insight.insight_type,
        id
    );

    Ok(())
}
