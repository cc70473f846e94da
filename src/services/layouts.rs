//! Catalog of named sheet formats.
//!
//! Every [`LayoutFormat`] resolves to a [`LayoutSpec`]. The built-in table maps
//! all three names to the same 5 x 13 sheet of 37 x 20 mm labels; whether the
//! names should describe different physical sheets is still open, so the table
//! can be completed per name from the `[layouts]` section of the config file
//! instead of guessing geometries here.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::models::{LayoutFormat, LayoutSpec};
use crate::services::geometry;

/// Resolved layout table.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCatalog {
    specs: BTreeMap<LayoutFormat, LayoutSpec>,
}

impl LayoutCatalog {
    /// Built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        let specs = LayoutFormat::ALL
            .into_iter()
            .map(|format| (format, LayoutSpec::a4_65()))
            .collect();
        Self { specs }
    }

    /// Built-in table with per-name replacements.
    ///
    /// # Errors
    ///
    /// Fails on an unknown format name or on a spec that does not validate.
    pub fn with_overrides(overrides: &BTreeMap<String, LayoutSpec>) -> Result<Self> {
        let mut catalog = Self::builtin();
        for (name, spec) in overrides {
            let format: LayoutFormat = name.parse()?;
            spec.validate()?;
            debug!(layout = %format, cells = geometry::total_cells(spec), "layout override");
            catalog.specs.insert(format, spec.clone());
        }
        Ok(catalog)
    }

    /// Spec for a format.
    #[must_use]
    pub fn resolve(&self, format: LayoutFormat) -> &LayoutSpec {
        // Every format is inserted by `builtin`, overrides only replace.
        &self.specs[&format]
    }

    /// Parses a format name and resolves it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLayout` for names outside the catalog.
    pub fn resolve_name(&self, name: &str) -> Result<(LayoutFormat, &LayoutSpec)> {
        let format: LayoutFormat = name.parse()?;
        Ok((format, self.resolve(format)))
    }

    /// All formats with their specs, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (LayoutFormat, &LayoutSpec)> {
        self.specs.iter().map(|(format, spec)| (*format, spec))
    }

    /// Human-readable label, e.g. `40L - 65 cells on A4 (37 x 20 mm)`.
    #[must_use]
    pub fn describe(&self, format: LayoutFormat) -> String {
        let spec = self.resolve(format);
        format!(
            "{} - {} cells on A4 ({} x {} mm)",
            format,
            geometry::total_cells(spec),
            spec.cell_width_mm,
            spec.cell_height_mm
        )
    }
}

impl Default for LayoutCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
