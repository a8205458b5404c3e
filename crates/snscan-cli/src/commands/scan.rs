//! Scan command - extract a serial number from a single label photo.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use snscan_core::AnalysisResult;

use super::{build_analyzer, load_config};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input image (JPEG/PNG photo of the equipment label)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("input file not found: {}", args.input.display());
    }

    let analyzer = build_analyzer(args.model_dir.as_deref(), &config)?;

    info!("analyzing {}", args.input.display());
    let bytes = fs::read(&args.input)?;
    let result = analyzer.analyze_bytes(&bytes);

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => format_text(&result),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        println!(
            "{} Result written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{rendered}");
    }

    if !result.found {
        anyhow::bail!("no serial number recognized");
    }

    Ok(())
}

fn format_text(result: &AnalysisResult) -> String {
    match (&result.serial, &result.password) {
        (Some(serial), Some(password)) => format!(
            "{} serial number: {}\n  BIOS password: {}",
            style("✓").green(),
            style(serial).cyan().bold(),
            style(password).bold()
        ),
        _ => format!(
            "{} {}",
            style("✗").red(),
            result
                .diagnostic
                .as_deref()
                .unwrap_or("no serial number found")
        ),
    }
}
