//! Validation command for sheet files.

use crate::cli::common::{load_config, load_sheet, CliError, CliResult};
use crate::parser::EntryProblem;
use crate::services::StoreStats;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Check a sheet file for out-of-range and conflicting cells
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Path to the sheet file (.toml or .json)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Layout to check against (overrides the file)
    #[arg(long, value_name = "NAME")]
    pub layout: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CheckResponse {
    valid: bool,
    layout: String,
    total_cells: u32,
    stats: StoreStats,
    problems: Vec<EntryProblem>,
}

impl CheckArgs {
    /// Execute the check command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let build = load_sheet(&self.file, &config, self.layout.as_deref())?;

        let response = CheckResponse {
            valid: build.is_clean(),
            layout: build.sheet.format().to_string(),
            total_cells: crate::services::geometry::total_cells(build.sheet.layout()),
            stats: build.sheet.stats(),
            problems: build.problems,
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            if response.valid {
                println!("✓ Sheet is valid");
            } else {
                println!("✗ Sheet has problems");
            }

            println!("\nSheet:");
            println!("  Layout:     {} ({} cells)", response.layout, response.total_cells);
            println!("  Entries:    {}", response.stats.entries);
            println!("  Printable:  {}", response.stats.valid);
            println!("  Cells used: {}", response.stats.cells_used);

            if !response.problems.is_empty() {
                println!("\nIssues:");
                for problem in &response.problems {
                    println!("  ✗ entry #{} ({:?}): {}", problem.ordinal, problem.text, problem.message);
                }
            }
        }

        if response.valid {
            Ok(())
        } else {
            Err(CliError::validation(format!(
                "{} entr{} rejected",
                response.problems.len(),
                if response.problems.len() == 1 { "y" } else { "ies" }
            )))
        }
    }
}
