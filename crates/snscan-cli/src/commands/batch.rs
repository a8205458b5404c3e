//! Batch command - scan many label photos and summarize the results.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use snscan_core::AnalysisResult;

use super::{build_analyzer, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-photo JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of scanning a single photo.
struct ScanRecord {
    path: PathBuf,
    result: Option<AnalysisResult>,
    error: Option<String>,
    processing_time_ms: u64,
    scanned_at: DateTime<Utc>,
}

impl ScanRecord {
    fn status(&self) -> &'static str {
        match (&self.result, &self.error) {
            (Some(result), _) if result.found => "found",
            (Some(_), _) => "not_found",
            _ => "error",
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("no matching image files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} label photos to scan",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let analyzer = build_analyzer(args.model_dir.as_deref(), &config)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} photos")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();

        let record = match fs::read(&path) {
            Ok(bytes) => {
                let result = analyzer.analyze_bytes(&bytes);
                ScanRecord {
                    path: path.clone(),
                    result: Some(result),
                    error: None,
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                    scanned_at: Utc::now(),
                }
            }
            Err(e) => {
                if !args.continue_on_error {
                    anyhow::bail!("failed to read {}: {}", path.display(), e);
                }
                warn!("failed to read {}: {}", path.display(), e);
                ScanRecord {
                    path: path.clone(),
                    result: None,
                    error: Some(e.to_string()),
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                    scanned_at: Utc::now(),
                }
            }
        };

        if let (Some(result), Some(output_dir)) = (&record.result, &args.output_dir) {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("photo");
            let output_path = output_dir.join(format!("{stem}.json"));
            fs::write(&output_path, serde_json::to_string_pretty(result)?)?;
            debug!("wrote result to {}", output_path.display());
        }

        records.push(record);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &records)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_totals(&records, start.elapsed());

    Ok(())
}

fn print_totals(records: &[ScanRecord], elapsed: std::time::Duration) {
    let found: Vec<_> = records.iter().filter(|r| r.status() == "found").collect();
    let missed: Vec<_> = records
        .iter()
        .filter(|r| r.status() == "not_found")
        .collect();
    let failed: Vec<_> = records.iter().filter(|r| r.status() == "error").collect();

    println!();
    println!(
        "{} Scanned {} photos in {:?}",
        style("✓").green(),
        records.len(),
        elapsed
    );
    println!(
        "   {} serials recognized, {} without a serial, {} unreadable",
        style(found.len()).green(),
        style(missed.len()).yellow(),
        style(failed.len()).red()
    );

    for record in &found {
        if let Some(result) = &record.result {
            if let (Some(serial), Some(password)) = (&result.serial, &result.password) {
                println!(
                    "  {} {}  {}  {}",
                    style("•").green(),
                    record
                        .path
                        .file_name()
                        .and_then(|s| s.to_str())
                        .unwrap_or(""),
                    serial,
                    password
                );
            }
        }
    }

    if !missed.is_empty() {
        println!();
        println!("{}", style("No serial recognized in:").yellow());
        for record in &missed {
            println!("  - {}", record.path.display());
        }
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Unreadable files:").red());
        for record in &failed {
            println!(
                "  - {}: {}",
                record.path.display(),
                record.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn write_summary(path: &PathBuf, records: &[ScanRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "serial",
        "password",
        "diagnostic",
        "processing_time_ms",
        "scanned_at",
    ])?;

    for record in records {
        let filename = record
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let (serial, password, diagnostic) = match &record.result {
            Some(result) => (
                result
                    .serial
                    .as_ref()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
                result.password.clone().unwrap_or_default(),
                result.diagnostic.clone().unwrap_or_default(),
            ),
            None => (
                String::new(),
                String::new(),
                record.error.clone().unwrap_or_default(),
            ),
        };

        wtr.write_record([
            filename.to_string(),
            record.status().to_string(),
            serial,
            password,
            diagnostic,
            record.processing_time_ms.to_string(),
            record.scanned_at.to_rfc3339(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
