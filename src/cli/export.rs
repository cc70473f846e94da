//! Export command for sheet files.

use crate::cli::common::{load_config, load_sheet, resolve_padding, CliError, CliResult};
use crate::config::Config;
use crate::error::LabelError;
use crate::export::{output_path, pdf_file_name, ExportRenderer};
use clap::Args;
use std::path::PathBuf;

/// Export a sheet file to a printable PDF
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Path to the sheet file (.toml or .json)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output PDF path (default: <output_dir>/barcode-labels.pdf)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Layout to export with (overrides the file)
    #[arg(long, value_name = "NAME")]
    pub layout: Option<String>,

    /// Padding between cell border and symbol in millimeters
    #[arg(long, value_name = "MM")]
    pub padding: Option<f64>,

    /// Print the export report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExportArgs {
    /// Resolves where the PDF goes.
    fn output_path(&self, config: &Config) -> CliResult<PathBuf> {
        if let Some(path) = &self.output {
            let name = path
                .file_name()
                .map(|n| pdf_file_name(&n.to_string_lossy()))
                .ok_or_else(|| CliError::validation(format!("Not a file path: {}", path.display())))?;
            return Ok(path.with_file_name(name));
        }

        let dir = match &config.export.output_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| CliError::io(format!("Failed to read current directory: {e}")))?,
        };
        Ok(output_path(&dir, &config.export.default_filename))
    }

    /// Execute the export command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let build = load_sheet(&self.file, &config, self.layout.as_deref())?;

        if !build.is_clean() {
            for problem in &build.problems {
                eprintln!("✗ entry #{}: {}", problem.ordinal, problem.message);
            }
            return Err(CliError::validation(
                "Sheet has rejected cells; fix them before exporting (see `check`)",
            ));
        }

        let snapshot = build.sheet.snapshot();
        if snapshot.valid_entries().next().is_none() {
            return Err(CliError::validation(
                "Nothing to export: no entry has both text and cells",
            ));
        }

        let padding = resolve_padding(self.padding, &config)?;

        let path = self.output_path(&config)?;
        let renderer = ExportRenderer::new().with_padding(padding);
        let report = renderer.export_pdf(&snapshot, &path).map_err(|e| match e {
            LabelError::ExportFailure(_) => CliError::io(e.to_string()),
            other => CliError::validation(other.to_string()),
        })?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            for skipped in &report.skipped {
                eprintln!("⚠ skipped {:?}: {}", skipped.text, skipped.reason);
            }
            println!(
                "✓ Placed {} label(s) on {}",
                report.placed.len(),
                path.display()
            );
        }

        Ok(())
    }
}
