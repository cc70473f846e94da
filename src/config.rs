//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME};
use crate::export::{DEFAULT_FILENAME, DEFAULT_PADDING_MM};
use crate::models::{LayoutFormat, LayoutSpec};
use crate::preview::{PreviewProjection, TerminalProjection, DEFAULT_ZOOM, PX_PER_MM};
use crate::services::LayoutCatalog;

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name used when none is given (".pdf" is appended)
    pub default_filename: String,
    /// Gap between a cell border and its symbol in millimeters
    pub padding_mm: f64,
    /// Directory exports are written to when no path is given
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_filename: DEFAULT_FILENAME.to_string(),
            padding_mm: DEFAULT_PADDING_MM,
            output_dir: None,
        }
    }
}

/// Preview settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Zoom factor on top of 3.78 px/mm (1.0 = 100%)
    pub zoom: f64,
    /// Terminal columns per millimeter for the text preview
    pub columns_per_mm: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            columns_per_mm: TerminalProjection::default().cols_per_mm,
        }
    }
}

impl PreviewConfig {
    /// Pixel projection for the configured zoom.
    #[must_use]
    pub fn projection(&self) -> PreviewProjection {
        PreviewProjection::new(self.zoom * PX_PER_MM)
    }

    /// Character-cell projection for the text preview.
    #[must_use]
    pub const fn terminal(&self) -> TerminalProjection {
        TerminalProjection {
            cols_per_mm: self.columns_per_mm,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/labelsheet/config.toml`
/// - macOS: `~/Library/Application Support/labelsheet/config.toml`
/// - Windows: `%APPDATA%\labelsheet\config.toml`
///
/// `LABELSHEET_CONFIG_DIR` replaces the directory.
///
/// # Validation
///
/// - `export.default_filename` must be a plain, non-empty file name
/// - `export.padding_mm` must be in `0..10`
/// - `preview.zoom` and `preview.columns_per_mm` must be positive
/// - every `[layouts.<name>]` entry must name a known format and validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Layout used when a sheet file does not name one
    pub default_layout: LayoutFormat,
    /// Export settings
    pub export: ExportConfig,
    /// Preview settings
    pub preview: PreviewConfig,
    /// Per-format geometry replacing the built-in table
    pub layouts: BTreeMap<String, LayoutSpec>,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// `LABELSHEET_CONFIG_DIR` wins over the platform directory.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);
        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate().context(format!(
            "Invalid config file: {}",
            config_path.display()
        ))?;
        Ok(config)
    }

    /// Saves configuration to an explicit file using temp file + rename.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let name = self.export.default_filename.trim();
        if name.is_empty() {
            anyhow::bail!("export.default_filename must not be empty");
        }
        if name.contains(['/', '\\']) {
            anyhow::bail!("export.default_filename must be a file name, got {name:?}");
        }

        if !(0.0..10.0).contains(&self.export.padding_mm) {
            anyhow::bail!(
                "export.padding_mm must be between 0 and 10, got {}",
                self.export.padding_mm
            );
        }

        if self.preview.zoom <= 0.0 {
            anyhow::bail!("preview.zoom must be positive, got {}", self.preview.zoom);
        }
        if self.preview.columns_per_mm <= 0.0 {
            anyhow::bail!(
                "preview.columns_per_mm must be positive, got {}",
                self.preview.columns_per_mm
            );
        }

        self.catalog()?;
        Ok(())
    }

    /// Layout table with the configured overrides applied.
    pub fn catalog(&self) -> Result<LayoutCatalog> {
        LayoutCatalog::with_overrides(&self.layouts).context("Invalid [layouts] section")
    }
}
