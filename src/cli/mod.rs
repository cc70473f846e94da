//! CLI command handlers for labelsheet.
//!
//! Each subcommand reads a sheet file (or the configuration), runs it through
//! the library and maps failures to [`ExitCode`]s.

pub mod check;
pub mod common;
pub mod config;
pub mod export;
pub mod layouts;
pub mod preview;

// Re-export types used by main.rs and tests
pub use check::CheckArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use export::ExportArgs;
pub use layouts::LayoutsArgs;
pub use preview::PreviewArgs;
