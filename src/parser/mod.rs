//! Parsing for sheet description files.
//!
//! A sheet file lists the entries of one label sheet in TOML or JSON. It is
//! read once per CLI invocation; nothing is ever written back.

pub mod sheet_file;

// Re-export commonly used functions
pub use sheet_file::{
    build_sheet, load_sheet_file, parse_cell_list, parse_sheet_str, read_sheet_file, EntryProblem,
    SheetBuild, SheetFile, SheetFileFormat,
};
