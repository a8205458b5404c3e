//! Password command - derive a BIOS password from a typed serial number.
//!
//! Covers the case where the label is unreadable but the serial could be
//! read off by eye.

use clap::Args;
use console::style;

use snscan_core::{derive_password, SerialValidator};

use super::load_config;

/// Arguments for the password command.
#[derive(Args)]
pub struct PasswordArgs {
    /// Serial number (5 letters followed by 9 digits)
    #[arg(required = true)]
    serial: String,

    /// Print only the password (for scripting)
    #[arg(short, long)]
    quiet: bool,
}

pub async fn run(args: PasswordArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let validator = SerialValidator::new(config.serial.allowed_prefixes);

    let candidate = args.serial.trim().to_ascii_uppercase();
    let serial = validator.validate(&candidate)?;
    let password = derive_password(&serial);

    if args.quiet {
        println!("{password}");
    } else {
        println!(
            "{} serial number: {}",
            style("✓").green(),
            style(&serial).cyan().bold()
        );
        println!("  BIOS password: {}", style(&password).bold());
    }

    Ok(())
}
