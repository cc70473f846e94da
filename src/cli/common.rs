//! Shared CLI plumbing: exit codes, errors and sheet loading.

use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::models::LayoutFormat;
use crate::parser::{self, SheetBuild, SheetFileFormat};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input was rejected
    ValidationError = 1,
    /// A file could not be read or written
    IoError = 2,
}

impl ExitCode {
    /// Numeric code for `std::process::exit`.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error carrying the exit code it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Message printed to stderr
    pub message: String,
    /// Exit code
    pub code: ExitCode,
}

impl CliError {
    /// Input was rejected (exit 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: ExitCode::ValidationError,
        }
    }

    /// I/O failure (exit 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: ExitCode::IoError,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result alias for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Loads the configuration, mapping failures to validation errors.
pub fn load_config() -> CliResult<Config> {
    Config::load().map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
}

/// Reads a sheet file and builds a session from it.
///
/// Missing or unreadable files are I/O errors; malformed content, unknown
/// layouts and bad cell lists are validation errors. Rejected cell
/// assignments are returned in [`SheetBuild::problems`] for the caller to
/// report.
pub fn load_sheet(
    path: &Path,
    config: &Config,
    layout: Option<&str>,
) -> CliResult<SheetBuild> {
    let format = SheetFileFormat::from_path(path).map_err(|e| CliError::validation(format!("{e:#}")))?;
    let content = parser::read_sheet_file(path).map_err(|e| CliError::io(format!("{e:#}")))?;
    let mut file = parser::parse_sheet_str(&content, format).map_err(|e| {
        CliError::validation(format!("Failed to parse sheet file {}: {e:#}", path.display()))
    })?;

    if let Some(name) = layout {
        file.layout = Some(name.to_string());
    }

    let catalog = config
        .catalog()
        .map_err(|e| CliError::validation(format!("{e:#}")))?;
    parser::build_sheet(&file, &catalog, config.default_layout)
        .map_err(|e| CliError::validation(format!("{e:#}")))
}

/// Resolves the cell padding from `--padding` or the config file.
///
/// Export and preview both go through here so they place symbols alike.
pub fn resolve_padding(arg: Option<f64>, config: &Config) -> CliResult<f64> {
    let padding = arg.unwrap_or(config.export.padding_mm);
    if !(0.0..10.0).contains(&padding) {
        return Err(CliError::validation(format!(
            "Padding must be between 0 and 10 mm, got {padding}"
        )));
    }
    Ok(padding)
}

/// Parses a `--layout` value.
pub fn parse_layout(name: &str) -> CliResult<LayoutFormat> {
    name.parse()
        .map_err(|e: crate::error::LabelError| CliError::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(CliError::validation("x").code.code(), 1);
        assert_eq!(CliError::io("x").code.code(), 2);
    }

    #[test]
    fn test_resolve_padding() {
        let mut config = Config::new();
        config.export.padding_mm = 3.5;
        assert!((resolve_padding(None, &config).unwrap() - 3.5).abs() < f64::EPSILON);
        assert!((resolve_padding(Some(1.0), &config).unwrap() - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            resolve_padding(Some(12.0), &config).unwrap_err().code,
            ExitCode::ValidationError
        );
    }

    #[test]
    fn test_parse_layout() {
        assert_eq!(parse_layout("80l").unwrap(), LayoutFormat::L80);
        assert_eq!(
            parse_layout("nope").unwrap_err().code,
            ExitCode::ValidationError
        );
    }
}
