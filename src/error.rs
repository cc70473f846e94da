//! Error taxonomy for sheet layout and export.
//!
//! `OutOfRange` and `CellConflict` are contract violations: the sheet session
//! rejects them before the store is touched. `InvalidSymbologyInput` is
//! collected per entry during export, while `ExportFailure` aborts the attempt.

use thiserror::Error;

use crate::models::{CellIndex, EntryId};

/// Convenience alias used across the library.
pub type Result<T> = std::result::Result<T, LabelError>;

/// Errors surfaced by the layout, occupancy and export components.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabelError {
    /// Cell index outside `1..=total` for the active layout.
    #[error("cell {cell} is outside the sheet (valid cells are 1..={total})")]
    OutOfRange {
        /// Requested cell index
        cell: CellIndex,
        /// Number of addressable cells in the layout
        total: u32,
    },

    /// Requested cells are already owned by another entry.
    #[error("cells already taken by another entry: {}", format_cells(.cells))]
    CellConflict {
        /// Conflicting cells in ascending order
        cells: Vec<CellIndex>,
    },

    /// Text cannot be encoded by the chosen symbology.
    #[error("cannot encode {text:?}: {reason}")]
    InvalidSymbologyInput {
        /// Offending barcode text
        text: String,
        /// Why the symbology rejected it
        reason: String,
    },

    /// The document or raster backend failed.
    #[error("export failed: {0}")]
    ExportFailure(String),

    /// An export is already running.
    #[error("an export is already in progress")]
    ExportInProgress,

    /// No entry with this id exists in the store.
    #[error("entry {0} not found")]
    UnknownEntry(EntryId),

    /// Layout name is not part of the catalog.
    #[error("unknown layout `{0}` (expected one of 40L, 80L, 65L)")]
    UnknownLayout(String),

    /// Layout spec is geometrically impossible.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

fn format_cells(cells: &[CellIndex]) -> String {
    cells
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
