//! Label Sheet Library
//!
//! Lays barcode entries out on a fixed-grid A4 label sheet and renders the
//! result as a PDF or a terminal preview. One geometry engine feeds both
//! renderers, and an occupancy index keeps every cell to a single entry.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod preview;
pub mod services;

pub use error::{LabelError, Result};
