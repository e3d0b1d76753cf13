//! CLI application for product-packaging OCR insight processing.

mod commands;
mod sources;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{annotate, batch, extract, import};

/// packscan - Extract and annotate structured insights from packaging OCR
#[derive(Parser)]
#[command(name = "packscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract insights from one OCR document or barcode
    Extract(extract::ExtractArgs),

    /// Extract insights from an OCR archive, one JSONL line per document
    Batch(batch::BatchArgs),

    /// Load a batch output file into the insight store
    Import(import::ImportArgs),

    /// Apply the annotator for an accepted insight
    Annotate(annotate::AnnotateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Import(args) => import::run(args, cli.config.as_deref()).await,
        Commands::Annotate(args) => annotate::run(args, cli.config.as_deref()).await,
    }
}
