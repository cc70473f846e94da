//! Sheet description files.
//!
//! ```toml
//! layout = "40L"
//!
//! [[entry]]
//! text = "12345678"
//! cells = "1-3,7"
//!
//! [[entry]]
//! text = "ABC-1"
//! cells = [10, 11]
//! ```
//!
//! JSON files use the same shape (`"entry"` or `"entries"` for the list).

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::APP_BINARY_NAME;
use crate::error::LabelError;
use crate::models::{CellIndex, LayoutFormat};
use crate::services::{geometry, LayoutCatalog, Sheet};

/// Cell selection as written in a sheet file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellList {
    /// Ranges like `"1-3,7"`
    Ranges(String),
    /// Explicit indices
    List(Vec<CellIndex>),
}

impl Default for CellList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl CellList {
    /// Expands the selection for a layout with `total` cells.
    ///
    /// Explicit lists are taken as written and checked later by the session.
    pub fn to_set(&self, total: u32) -> Result<BTreeSet<CellIndex>> {
        match self {
            Self::Ranges(text) => parse_cell_list(text, total),
            Self::List(cells) => Ok(cells.iter().copied().collect()),
        }
    }
}

/// One `[[entry]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySpec {
    /// Barcode text
    #[serde(default)]
    pub text: String,
    /// Cells to print it in
    #[serde(default)]
    pub cells: CellList,
}

/// Parsed sheet file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetFile {
    /// Layout name; the configured default when absent
    #[serde(default)]
    pub layout: Option<String>,
    /// Entries in display order
    #[serde(default, rename = "entry", alias = "entries")]
    pub entries: Vec<EntrySpec>,
}

/// Serialization format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFileFormat {
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl SheetFileFormat {
    /// Detects the format from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => anyhow::bail!(
                "Unsupported sheet file: {}\n\nUse a .toml or .json file.",
                path.display()
            ),
        }
    }
}

/// Parses `"1-3,7"` into `{1, 2, 3, 7}`.
///
/// Whitespace is ignored, an empty string is an empty selection. Range bounds
/// must be ascending and every index at least 1. A bound above `total` fails
/// with [`LabelError::OutOfRange`] before anything is expanded.
pub fn parse_cell_list(text: &str, total: u32) -> Result<BTreeSet<CellIndex>> {
    let mut cells = BTreeSet::new();

    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_index(start)?, parse_index(end)?),
            None => {
                let cell = parse_index(part)?;
                (cell, cell)
            }
        };

        if start > end {
            anyhow::bail!("Descending cell range: {part}");
        }
        if end > total {
            return Err(LabelError::OutOfRange { cell: end, total }.into());
        }
        cells.extend(start..=end);
    }

    Ok(cells)
}

fn parse_index(text: &str) -> Result<CellIndex> {
    let cell: CellIndex = text
        .trim()
        .parse()
        .with_context(|| format!("Invalid cell number: {:?}", text.trim()))?;
    if cell == 0 {
        anyhow::bail!("Cell numbers start at 1");
    }
    Ok(cell)
}

/// Reads a sheet file from disk.
pub fn read_sheet_file(path: &Path) -> Result<String> {
    if !path.exists() {
        anyhow::bail!(
            "Sheet file not found: {}\n\n\
             Please check the file path and try again.\n\
             Run `{} check <FILE>` to validate a sheet file.",
            path.display(),
            APP_BINARY_NAME
        );
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sheet file: {}", path.display()))
}

/// Parses sheet file content.
pub fn parse_sheet_str(content: &str, format: SheetFileFormat) -> Result<SheetFile> {
    let file: SheetFile = match format {
        SheetFileFormat::Toml => toml::from_str(content).context("Invalid TOML")?,
        SheetFileFormat::Json => serde_json::from_str(content).context("Invalid JSON")?,
    };
    Ok(file)
}

/// Reads and parses a sheet file.
pub fn load_sheet_file(path: &Path) -> Result<SheetFile> {
    let format = SheetFileFormat::from_path(path)?;
    let content = read_sheet_file(path)?;
    parse_sheet_str(&content, format)
        .with_context(|| format!("Failed to parse sheet file: {}", path.display()))
}

/// Entry whose cells were rejected while building the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryProblem {
    /// 1-based entry position in the file
    pub ordinal: usize,
    /// Entry text
    pub text: String,
    /// Why the cells were rejected
    pub message: String,
    /// Cells involved, if any
    pub cells: Vec<CellIndex>,
}

/// Result of building a session from a sheet file.
#[derive(Debug)]
pub struct SheetBuild {
    /// Session with every accepted assignment
    pub sheet: Sheet,
    /// Entries whose cells were rejected; they are kept without cells
    pub problems: Vec<EntryProblem>,
}

impl SheetBuild {
    /// True when every entry was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

fn problem(ordinal: usize, text: &str, err: &LabelError) -> EntryProblem {
    let cells = match err {
        LabelError::OutOfRange { cell, .. } => vec![*cell],
        LabelError::CellConflict { cells } => cells.clone(),
        _ => Vec::new(),
    };
    EntryProblem {
        ordinal,
        text: text.to_string(),
        message: err.to_string(),
        cells,
    }
}

/// Builds a session from a parsed file.
///
/// Entries are applied in file order through the session's checks, so a cell
/// claimed twice goes to the earlier entry and the later one is reported.
///
/// # Errors
///
/// Fails on an unknown layout name or a malformed cell list.
pub fn build_sheet(
    file: &SheetFile,
    catalog: &LayoutCatalog,
    default_layout: LayoutFormat,
) -> Result<SheetBuild> {
    let (format, spec) = match &file.layout {
        Some(name) => catalog.resolve_name(name)?,
        None => (default_layout, catalog.resolve(default_layout)),
    };

    let mut sheet = Sheet::new(format, spec.clone());
    let total = geometry::total_cells(spec);
    let mut problems = Vec::new();

    for (idx, entry) in file.entries.iter().enumerate() {
        let ordinal = idx + 1;
        let id = if idx == 0 {
            sheet.first_id()
        } else {
            sheet.add_entry()
        };
        sheet.set_text(id, entry.text.clone())?;

        let assigned = match entry.cells.to_set(total) {
            Ok(cells) => sheet.assign_cells(id, cells),
            Err(err) => match err.downcast::<LabelError>() {
                Ok(rejected) => Err(rejected),
                Err(err) => {
                    return Err(err.context(format!("Entry #{ordinal} has an invalid cell list")))
                }
            },
        };

        if let Err(err) = assigned {
            debug!(ordinal, %err, "entry cells rejected");
            problems.push(problem(ordinal, &entry.text, &err));
            sheet.assign_cells(id, BTreeSet::new())?;
        }
    }

    Ok(SheetBuild { sheet, problems })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_cell_list() {
        assert_eq!(
            parse_cell_list("1-3,7", 65).unwrap(),
            BTreeSet::from([1, 2, 3, 7])
        );
        assert_eq!(
            parse_cell_list(" 5 , 2-2, 4-5 ", 65).unwrap(),
            BTreeSet::from([2, 4, 5])
        );
        assert!(parse_cell_list("", 65).unwrap().is_empty());
        assert_eq!(parse_cell_list("60-65", 65).unwrap().len(), 6);
    }

    #[test]
    fn test_parse_cell_list_errors() {
        assert!(parse_cell_list("0", 65).is_err());
        assert!(parse_cell_list("5-3", 65).is_err());
        assert!(parse_cell_list("a", 65).is_err());
        assert!(parse_cell_list("1-", 65).is_err());
    }

    #[test]
    fn test_parse_cell_list_rejects_huge_range_without_expanding() {
        let err = parse_cell_list("1-4000000000", 65).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LabelError>(),
            Some(&LabelError::OutOfRange {
                cell: 4_000_000_000,
                total: 65
            })
        );

        let err = parse_cell_list("3,66", 65).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LabelError>(),
            Some(LabelError::OutOfRange { cell: 66, .. })
        ));
    }

    #[test]
    fn test_build_sheet_reports_out_of_range_ranges() {
        let file = parse_sheet_str(
            "[[entry]]\ntext = \"A\"\ncells = \"1-2\"\n\
             [[entry]]\ntext = \"B\"\ncells = \"10-4000000000\"\n",
            SheetFileFormat::Toml,
        )
        .unwrap();

        let build = build_sheet(&file, &LayoutCatalog::builtin(), LayoutFormat::L40).unwrap();
        assert_eq!(build.problems.len(), 1);
        assert_eq!(build.problems[0].ordinal, 2);
        assert_eq!(build.problems[0].cells, vec![4_000_000_000]);

        let entries = build.sheet.entries();
        assert_eq!(entries[0].cells, BTreeSet::from([1, 2]));
        assert_eq!(entries[1].text, "B");
        assert!(entries[1].cells.is_empty());
    }

    #[test]
    fn test_build_sheet_fails_on_malformed_cell_list() {
        let file = parse_sheet_str(
            "[[entry]]\ntext = \"A\"\ncells = \"1-x\"\n",
            SheetFileFormat::Toml,
        )
        .unwrap();
        assert!(build_sheet(&file, &LayoutCatalog::builtin(), LayoutFormat::L40).is_err());
    }

    #[test]
    fn test_toml_and_json_agree() {
        let toml_src = r#"
layout = "65l"

[[entry]]
text = "12345678"
cells = "1-3"

[[entry]]
text = "ABC"
cells = [10, 11]
"#;
        let json_src = r#"{
  "layout": "65l",
  "entries": [
    {"text": "12345678", "cells": "1-3"},
    {"text": "ABC", "cells": [10, 11]}
  ]
}"#;

        let from_toml = parse_sheet_str(toml_src, SheetFileFormat::Toml).unwrap();
        let from_json = parse_sheet_str(json_src, SheetFileFormat::Json).unwrap();
        assert_eq!(from_toml, from_json);
        assert_eq!(from_toml.entries.len(), 2);
        assert_eq!(
            from_toml.entries[1].cells,
            CellList::List(vec![10, 11])
        );
    }

    #[test]
    fn test_build_sheet_applies_entries() {
        let file = parse_sheet_str(
            "layout = \"65L\"\n[[entry]]\ntext = \"A\"\ncells = \"2-3\"\n[[entry]]\ntext = \"B\"\ncells = [1]\n",
            SheetFileFormat::Toml,
        )
        .unwrap();

        let build = build_sheet(&file, &LayoutCatalog::builtin(), LayoutFormat::L40).unwrap();
        assert!(build.is_clean());
        assert_eq!(build.sheet.format(), LayoutFormat::L65);

        let entries = build.sheet.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].cells, BTreeSet::from([2, 3]), "seed cell replaced");
        assert_eq!(entries[1].cells, BTreeSet::from([1]));
    }

    #[test]
    fn test_build_sheet_reports_conflicts_and_range() {
        let file = parse_sheet_str(
            "[[entry]]\ntext = \"A\"\ncells = [5]\n\
             [[entry]]\ntext = \"B\"\ncells = [4, 5]\n\
             [[entry]]\ntext = \"C\"\ncells = [66]\n",
            SheetFileFormat::Toml,
        )
        .unwrap();

        let build = build_sheet(&file, &LayoutCatalog::builtin(), LayoutFormat::L40).unwrap();
        assert_eq!(build.sheet.format(), LayoutFormat::L40);
        assert_eq!(build.problems.len(), 2);
        assert_eq!(build.problems[0].ordinal, 2);
        assert_eq!(build.problems[0].cells, vec![5]);
        assert_eq!(build.problems[1].ordinal, 3);
        assert_eq!(build.problems[1].cells, vec![66]);

        let entries = build.sheet.entries();
        assert_eq!(entries[0].cells, BTreeSet::from([5]));
        assert!(entries[1].cells.is_empty());
        assert!(entries[2].cells.is_empty());
    }

    #[test]
    fn test_build_sheet_rejects_unknown_layout() {
        let file = SheetFile {
            layout: Some("24L".to_string()),
            entries: Vec::new(),
        };
        assert!(build_sheet(&file, &LayoutCatalog::builtin(), LayoutFormat::L40).is_err());
    }

    #[test]
    fn test_load_sheet_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sheet.json");
        std::fs::write(&path, r#"{"entry": [{"text": "X", "cells": "1"}]}"#).unwrap();

        let file = load_sheet_file(&path).unwrap();
        assert_eq!(file.entries[0].text, "X");

        assert!(load_sheet_file(&temp.path().join("missing.toml")).is_err());
        assert!(SheetFileFormat::from_path(Path::new("sheet.yaml")).is_err());
    }
}
