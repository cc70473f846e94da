//! Data models for label sheets, entries, and page geometry.
//!
//! This module contains the core data structures used throughout the application.
//! Models are independent of rendering and session logic.

pub mod entry;
pub mod layout_spec;
pub mod rect;

/// 1-based, row-major index of a label cell.
pub type CellIndex = u32;

// Re-export all model types
pub use entry::{EntryId, EntryUpdate, LabelEntry};
pub use layout_spec::{LayoutFormat, LayoutSpec, PageSpec, RowSpacing};
pub use rect::{PlacedGlyph, Rect};
