//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and configuration locations.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Label Sheet";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "labelsheet";

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "labelsheet";

/// Environment variable that replaces the config directory.
pub const CONFIG_DIR_ENV: &str = "LABELSHEET_CONFIG_DIR";
