//! Configuration CLI commands.

use crate::cli::common::{load_config, CliError, CliResult};
use crate::config::Config;
use crate::constants::APP_NAME;
use clap::{Args, Subcommand};

/// Configuration commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Print the configuration file path
    Path,
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Path => {
                let path = Config::config_file_path()
                    .map_err(|e| CliError::io(format!("{e:#}")))?;
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;

        if self.json {
            let json = serde_json::to_string_pretty(&config).map_err(|e| {
                CliError::io(format!("Failed to serialize configuration to JSON: {e}"))
            })?;
            println!("{json}");
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    let title = format!("{APP_NAME} Configuration");
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    println!();

    println!("Layout:");
    println!("  Default: {}", config.default_layout);
    if config.layouts.is_empty() {
        println!("  Overrides: (none)");
    } else {
        let names: Vec<&str> = config.layouts.keys().map(String::as_str).collect();
        println!("  Overrides: {}", names.join(", "));
    }
    println!();

    println!("Export:");
    println!("  File Name: {}", config.export.default_filename);
    println!("  Padding: {} mm", config.export.padding_mm);
    match &config.export.output_dir {
        Some(dir) => println!("  Output Directory: {}", dir.display()),
        None => println!("  Output Directory: (current directory)"),
    }
    println!();

    println!("Preview:");
    println!("  Zoom: {}", config.preview.zoom);
    println!("  Columns per mm: {}", config.preview.columns_per_mm);
    println!();
}
