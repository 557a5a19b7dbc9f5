use std::path::Path;

use anyhow::{Context, Result};
use carlot_core::CarlotConfig;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective config as TOML
    Show,
    /// Parse and validate the config file
    Validate,
}

pub fn run_config(args: ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Path => run_path(explicit),
        ConfigCommands::Show => run_show(explicit),
        ConfigCommands::Validate => run_validate(explicit),
    }
}

fn run_path(explicit: Option<&Path>) -> Result<()> {
    let path = CarlotConfig::config_path(explicit);
    println!("{}", path.display());
    if !path.exists() {
        eprintln!("(file does not exist, defaults apply)");
    }
    Ok(())
}

fn run_show(explicit: Option<&Path>) -> Result<()> {
    let config = CarlotConfig::load(explicit).context("Failed to load carlot config")?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn run_validate(explicit: Option<&Path>) -> Result<()> {
    let path = CarlotConfig::config_path(explicit);
    CarlotConfig::load(explicit)
        .with_context(|| format!("Config at {} is invalid", path.display()))?;
    println!("✓ {} is valid", path.display());
    Ok(())
}
