//! Models command - download and manage OCR models.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use console::style;
use futures_util::StreamExt;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Arguments for the models command.
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    command: ModelsCommand,
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// List available models
    List,

    /// Download models
    Download(DownloadArgs),

    /// Check model status
    Status(StatusArgs),

    /// Remove downloaded models
    Clean(CleanArgs),

    /// Set the active model variant
    Use(UseArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelVariant {
    /// Mobile models - smaller, faster (~12MB)
    Mobile,
    /// Server models - better detection on curved or glossy labels (~92MB)
    Server,
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelVariant::Mobile => write!(f, "mobile"),
            ModelVariant::Server => write!(f, "server"),
        }
    }
}

#[derive(Args)]
struct DownloadArgs {
    /// Model variant to download
    #[arg(short, long, value_enum, default_value = "mobile")]
    variant: ModelVariant,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force re-download even if files exist
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct StatusArgs {
    /// Check specific variant only
    #[arg(short, long, value_enum)]
    variant: Option<ModelVariant>,
}

#[derive(Args)]
struct CleanArgs {
    /// Clean specific variant only
    #[arg(short, long, value_enum)]
    variant: Option<ModelVariant>,

    /// Clean all variants
    #[arg(long)]
    all: bool,
}

#[derive(Args)]
struct UseArgs {
    /// Variant to set as active
    #[arg(value_enum)]
    variant: ModelVariant,
}

/// Model information with download URL.
#[derive(Clone)]
struct ModelInfo {
    filename: &'static str,
    size_bytes: u64,
    description: &'static str,
    url: &'static str,
}

/// Models making up one variant.
struct VariantConfig {
    detection: ModelInfo,
    recognition: ModelInfo,
    dictionary: ModelInfo,
}

impl VariantConfig {
    fn models(&self) -> [&ModelInfo; 3] {
        [&self.detection, &self.recognition, &self.dictionary]
    }

    fn total_size(&self) -> u64 {
        self.models().iter().map(|m| m.size_bytes).sum()
    }
}

fn get_variant_config(variant: ModelVariant) -> VariantConfig {
    match variant {
        ModelVariant::Mobile => VariantConfig {
            detection: ModelInfo {
                filename: "det.onnx",
                size_bytes: 4_500_000,
                description: "PP-OCRv3 mobile detection",
                url: "https://github.com/example/snscan/raw/main/models/mobile/det.onnx",
            },
            recognition: ModelInfo {
                filename: "latin_rec.onnx",
                size_bytes: 7_500_000,
                description: "Latin recognition",
                url: "https://github.com/example/snscan/raw/main/models/mobile/latin_rec.onnx",
            },
            dictionary: ModelInfo {
                filename: "latin_dict.txt",
                size_bytes: 2_000,
                description: "Latin character dictionary",
                url: "https://github.com/example/snscan/raw/main/models/mobile/latin_dict.txt",
            },
        },
        ModelVariant::Server => VariantConfig {
            detection: ModelInfo {
                filename: "det.onnx",
                size_bytes: 84_000_000,
                description: "PP-OCRv5 server detection",
                url: "https://github.com/example/snscan/raw/main/models/server/det.onnx",
            },
            recognition: ModelInfo {
                filename: "latin_rec.onnx",
                size_bytes: 7_500_000,
                description: "Latin recognition",
                url: "https://github.com/example/snscan/raw/main/models/server/latin_rec.onnx",
            },
            dictionary: ModelInfo {
                filename: "latin_dict.txt",
                size_bytes: 2_000,
                description: "Latin character dictionary",
                url: "https://github.com/example/snscan/raw/main/models/server/latin_dict.txt",
            },
        },
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snscan")
}

/// Get the model directory for a specific variant
pub fn get_variant_dir(variant: ModelVariant) -> PathBuf {
    data_dir().join("models").join(variant.to_string())
}

/// Get the active variant from the marker file
pub fn get_active_variant() -> ModelVariant {
    let marker_path = data_dir().join("active_variant");

    if let Ok(content) = fs::read_to_string(&marker_path) {
        match content.trim() {
            "server" => ModelVariant::Server,
            _ => ModelVariant::Mobile,
        }
    } else {
        ModelVariant::Mobile
    }
}

/// Set the active variant
fn set_active_variant(variant: ModelVariant) -> anyhow::Result<()> {
    let dir = data_dir();
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("active_variant"), variant.to_string())?;
    Ok(())
}

pub async fn run(args: ModelsArgs) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::List => list_models(),
        ModelsCommand::Download(download_args) => download_models(download_args).await,
        ModelsCommand::Status(status_args) => check_status(status_args),
        ModelsCommand::Clean(clean_args) => clean_models(clean_args),
        ModelsCommand::Use(use_args) => use_variant(use_args),
    }
}

fn list_models() -> anyhow::Result<()> {
    println!("{}", style("Available Model Variants").bold());
    println!();

    let active = get_active_variant();

    for variant in [ModelVariant::Mobile, ModelVariant::Server] {
        let config = get_variant_config(variant);
        let active_marker = if variant == active { " (active)" } else { "" };

        let desc = match variant {
            ModelVariant::Mobile => "- faster, smaller",
            ModelVariant::Server => "- better detection on difficult labels",
        };

        println!(
            "{} {} {}{}",
            style(format!("▸ {}", variant)).bold().cyan(),
            format_size(config.total_size()),
            style(desc).dim(),
            style(active_marker).green().bold()
        );

        for model in config.models() {
            println!(
                "    {:<20} {:>10}  {}",
                model.filename,
                format_size(model.size_bytes),
                model.description
            );
        }
        println!();
    }

    println!("Commands:");
    println!("  snscan models download -v mobile    Download mobile models (~12MB)");
    println!("  snscan models download -v server    Download server models (~92MB)");
    println!("  snscan models use <variant>         Switch active variant");

    Ok(())
}

fn use_variant(args: UseArgs) -> anyhow::Result<()> {
    let variant_dir = get_variant_dir(args.variant);
    let config = get_variant_config(args.variant);

    let downloaded = config
        .models()
        .iter()
        .all(|m| variant_dir.join(m.filename).exists());

    if !downloaded {
        println!(
            "{} {} models not downloaded yet.",
            style("⚠").yellow(),
            args.variant
        );
        println!("Run: snscan models download -v {}", args.variant);
        return Ok(());
    }

    set_active_variant(args.variant)?;
    println!(
        "{} Switched to {} models",
        style("✓").green(),
        style(args.variant.to_string()).cyan().bold()
    );

    Ok(())
}

async fn download_models(args: DownloadArgs) -> anyhow::Result<()> {
    let variant = args.variant;
    let config = get_variant_config(variant);

    let output_dir = args.output.unwrap_or_else(|| get_variant_dir(variant));
    fs::create_dir_all(&output_dir)?;

    println!(
        "{} Downloading {} models to {}",
        style("ℹ").blue(),
        style(variant.to_string()).cyan().bold(),
        output_dir.display()
    );
    println!();

    let client = reqwest::Client::builder()
        .user_agent("snscan-cli/0.1.0")
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let multi_progress = MultiProgress::new();
    let mut success_count = 0;
    let mut skip_count = 0;
    let mut error_count = 0;

    for model in config.models() {
        let path = output_dir.join(model.filename);

        // A partial download from an interrupted run is re-fetched.
        if path.exists() && !args.force {
            let metadata = fs::metadata(&path)?;
            if metadata.len() > model.size_bytes / 2 {
                println!(
                    "  {} {} (already exists, {})",
                    style("✓").green(),
                    model.filename,
                    format_size(metadata.len())
                );
                skip_count += 1;
                continue;
            }
        }

        let pb = multi_progress.add(ProgressBar::new(model.size_bytes));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} {msg:<30} [{bar:25.cyan/blue}] {bytes}/{total_bytes}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_message(model.filename.to_string());

        match download_file(&client, model.url, &path, &pb).await {
            Ok(()) => {
                pb.finish_with_message(format!("{} {}", style("✓").green(), model.filename));
                success_count += 1;
            }
            Err(e) => {
                pb.finish_with_message(format!(
                    "{} {} - {}",
                    style("✗").red(),
                    model.filename,
                    e
                ));
                error_count += 1;
            }
        }
    }

    println!();
    if error_count > 0 {
        anyhow::bail!(
            "{} downloaded, {} skipped, {} failed",
            success_count,
            skip_count,
            error_count
        );
    }

    println!(
        "{} {} downloaded, {} already present",
        style("✓").green(),
        success_count,
        skip_count
    );

    Ok(())
}

async fn download_file(
    client: &reqwest::Client,
    url: &str,
    path: &std::path::Path,
    pb: &ProgressBar,
) -> anyhow::Result<()> {
    let response = client.get(url).send().await?.error_for_status()?;

    if let Some(total) = response.content_length() {
        pb.set_length(total);
    }

    let mut file = File::create(path)?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        pb.inc(chunk.len() as u64);
    }

    Ok(())
}

fn check_status(args: StatusArgs) -> anyhow::Result<()> {
    let variants = match args.variant {
        Some(variant) => vec![variant],
        None => vec![ModelVariant::Mobile, ModelVariant::Server],
    };

    let active = get_active_variant();

    for variant in variants {
        let config = get_variant_config(variant);
        let variant_dir = get_variant_dir(variant);
        let active_marker = if variant == active { " (active)" } else { "" };

        println!(
            "{}{}",
            style(format!("▸ {}", variant)).bold().cyan(),
            style(active_marker).green().bold()
        );

        for model in config.models() {
            let path = variant_dir.join(model.filename);
            match fs::metadata(&path) {
                Ok(metadata) => println!(
                    "    {} {:<20} {}",
                    style("✓").green(),
                    model.filename,
                    format_size(metadata.len())
                ),
                Err(_) => println!(
                    "    {} {:<20} not downloaded",
                    style("✗").red(),
                    model.filename
                ),
            }
        }
        println!();
    }

    Ok(())
}

fn clean_models(args: CleanArgs) -> anyhow::Result<()> {
    let variants = if args.all {
        vec![ModelVariant::Mobile, ModelVariant::Server]
    } else {
        match args.variant {
            Some(variant) => vec![variant],
            None => anyhow::bail!("specify --variant <VARIANT> or --all"),
        }
    };

    for variant in variants {
        let variant_dir = get_variant_dir(variant);
        if variant_dir.exists() {
            fs::remove_dir_all(&variant_dir)?;
            println!(
                "{} Removed {} models from {}",
                style("✓").green(),
                variant,
                variant_dir.display()
            );
        } else {
            println!("{} No {} models to remove", style("ℹ").blue(), variant);
        }
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1}KB", bytes as f64 / 1_000.0)
    } else {
        format!("{bytes}B")
    }
}
