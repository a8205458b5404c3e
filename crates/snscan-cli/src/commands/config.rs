//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use snscan_core::ScanConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Replace the serial prefix allow-list
    Allow(AllowArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct AllowArgs {
    /// Accepted 2-letter serial prefixes (e.g. PC CE)
    #[arg(required = true)]
    prefixes: Vec<String>,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Allow(allow_args) => set_allowed_prefixes(allow_args),
        ConfigCommand::Path => show_path(),
    }
}

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snscan")
        .join("config.json")
}

fn load_or_default() -> anyhow::Result<ScanConfig> {
    let config_path = default_config_path();
    if config_path.exists() {
        Ok(ScanConfig::from_file(&config_path)?)
    } else {
        Ok(ScanConfig::default())
    }
}

fn show_config() -> anyhow::Result<()> {
    let config_path = default_config_path();

    if !config_path.exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    println!("{}", serde_json::to_string_pretty(&load_or_default()?)?);

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = ScanConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn set_allowed_prefixes(args: AllowArgs) -> anyhow::Result<()> {
    let mut prefixes = Vec::with_capacity(args.prefixes.len());
    for prefix in &args.prefixes {
        let prefix = prefix.trim().to_ascii_uppercase();
        if prefix.len() != 2 || !prefix.chars().all(|c| c.is_ascii_uppercase()) {
            anyhow::bail!("invalid prefix {prefix:?}: expected exactly 2 letters");
        }
        if !prefixes.contains(&prefix) {
            prefixes.push(prefix);
        }
    }

    let config_path = default_config_path();
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut config = load_or_default()?;
    config.serial.allowed_prefixes = prefixes;
    config.save(&config_path)?;

    println!(
        "{} Allowed serial prefixes: {}",
        style("✓").green(),
        config.serial.allowed_prefixes.join(", ")
    );

    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'snscan config init' to create a configuration file.");
    }

    Ok(())
}
