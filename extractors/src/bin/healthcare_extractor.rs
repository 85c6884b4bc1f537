use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use extractors::HealthcareDataExtractor;

#[derive(Parser, Debug)]
#[command(
    name = "healthcare-extractor",
    about = "Extract structured fields from OCR'd healthcare document text"
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["text_file", "text"]),
))]
struct Cli {
    /// Path to a file containing the OCR-extracted document text
    #[arg(long, value_name = "PATH", group = "input")]
    text_file: Option<PathBuf>,

    /// Raw document text
    #[arg(long, group = "input")]
    text: Option<String>,

    /// Document type hint (insurance_claim, prescription, medical_report)
    #[arg(long)]
    doc_type: Option<String>,

    /// Write the JSON result to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let text = match (&cli.text_file, &cli.text) {
        (Some(path), None) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document text from {:?}", path))?,
        (None, Some(text)) => text.clone(),
        _ => unreachable!("clap enforces exactly one input"),
    };

    let extractor = HealthcareDataExtractor::new();
    let result = extractor.extract_structured_data(&text, cli.doc_type.as_deref());

    let json = serde_json::to_string_pretty(&result)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write results to {:?}", path))?;
            tracing::info!("Results saved to {:?}", path);
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
