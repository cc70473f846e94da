//! Layout listing command.

use crate::cli::common::{load_config, parse_layout, CliError, CliResult};
use crate::models::{LayoutSpec, Rect};
use crate::services::geometry;
use clap::Args;
use serde::Serialize;

/// List the available sheet layouts
#[derive(Debug, Clone, Args)]
pub struct LayoutsArgs {
    /// Show one layout with every cell rectangle
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct LayoutOutput {
    name: String,
    description: String,
    total_cells: u32,
    spec: LayoutSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    cells: Option<Vec<CellOutput>>,
}

#[derive(Debug, Serialize)]
struct CellOutput {
    cell: u32,
    rect: Rect,
}

impl LayoutsArgs {
    /// Execute the layouts command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let catalog = config
            .catalog()
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        let selected = self.name.as_deref().map(parse_layout).transpose()?;
        let outputs: Vec<LayoutOutput> = catalog
            .iter()
            .filter(|(format, _)| selected.map_or(true, |wanted| wanted == *format))
            .map(|(format, spec)| LayoutOutput {
                name: format.to_string(),
                description: catalog.describe(format),
                total_cells: geometry::total_cells(spec),
                spec: spec.clone(),
                cells: selected.map(|_| {
                    geometry::all_rects(spec)
                        .into_iter()
                        .map(|(cell, rect)| CellOutput { cell, rect })
                        .collect()
                }),
            })
            .collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&outputs)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
            return Ok(());
        }

        for output in &outputs {
            let marker = if output.name == config.default_layout.to_string() {
                "*"
            } else {
                " "
            };
            println!("{marker} {}", output.description);

            if let Some(cells) = &output.cells {
                println!();
                println!("  Cell      x mm     y mm  w mm  h mm");
                for cell in cells {
                    println!(
                        "  {:>4}  {:>8.2} {:>8.2} {:>5.1} {:>5.1}",
                        cell.cell, cell.rect.x, cell.rect.y, cell.rect.width, cell.rect.height
                    );
                }
            }
        }

        Ok(())
    }
}
