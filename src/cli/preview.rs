//! Text preview of a sheet file.

use crate::cli::common::{load_config, load_sheet, resolve_padding, CliError, CliResult};
use crate::preview::{build_preview, render_to_string};
use clap::Args;
use std::path::PathBuf;

/// Draw the sheet in the terminal
#[derive(Debug, Clone, Args)]
pub struct PreviewArgs {
    /// Path to the sheet file (.toml or .json)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Layout to preview with (overrides the file)
    #[arg(long, value_name = "NAME")]
    pub layout: Option<String>,

    /// Padding between cell border and symbol in millimeters
    #[arg(long, value_name = "MM")]
    pub padding: Option<f64>,

    /// Output the projected cells as JSON instead of drawing them
    #[arg(long)]
    pub json: bool,
}

impl PreviewArgs {
    /// Execute the preview command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let build = load_sheet(&self.file, &config, self.layout.as_deref())?;
        let padding = resolve_padding(self.padding, &config)?;

        for problem in &build.problems {
            eprintln!("⚠ entry #{}: {}", problem.ordinal, problem.message);
        }

        let preview = build_preview(
            &build.sheet.snapshot(),
            config.preview.projection(),
            padding,
        );

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&preview)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            print!("{}", render_to_string(&preview, config.preview.terminal()));
            println!(
                "{} - {} of {} cells used",
                preview.format,
                preview.occupied().count(),
                preview.cells.len()
            );
        }

        Ok(())
    }
}
