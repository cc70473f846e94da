//! On-screen preview of a label sheet.
//!
//! The preview is a pure projection of the geometry engine: every cell
//! rectangle is multiplied by one uniform factor, so what the preview shows is
//! exactly what the export prints, only smaller.

pub mod widget;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::export::{place_in_cell, BarcodeOptions, Code128, Symbology};
use crate::models::{CellIndex, EntryId, LayoutFormat, Rect};
use crate::services::{geometry, OccupancyIndex, SheetSnapshot};

pub use widget::{render_to_string, SheetWidget, TerminalProjection};

/// CSS pixels per millimeter at 96 dpi.
pub const PX_PER_MM: f64 = 3.78;

/// Default preview zoom applied on top of [`PX_PER_MM`].
pub const DEFAULT_ZOOM: f64 = 0.8;

/// Uniform millimeter to preview-unit factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PreviewProjection {
    /// Preview units per millimeter
    pub scale: f64,
}

impl PreviewProjection {
    /// Projection with an explicit factor.
    #[must_use]
    pub const fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// Projects a page rectangle.
    #[must_use]
    pub fn project(&self, rect: Rect) -> Rect {
        rect.scaled(self.scale, self.scale)
    }
}

impl Default for PreviewProjection {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM * PX_PER_MM)
    }
}

/// Entry shown in a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupant {
    /// Owning entry
    pub entry_id: EntryId,
    /// 1-based position in the entry list
    pub ordinal: usize,
    /// Barcode text
    pub text: String,
}

/// One cell of the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewCell {
    /// Cell index
    pub cell: CellIndex,
    /// Page rectangle in millimeters
    pub rect_mm: Rect,
    /// Projected rectangle
    pub rect: Rect,
    /// Owning entry, if any
    pub occupant: Option<Occupant>,
    /// Projected symbol box, for occupants whose text encodes
    pub glyph: Option<Rect>,
}

impl PreviewCell {
    /// True when an entry owns the cell.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Projected sheet, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPreview {
    /// Active layout
    pub format: LayoutFormat,
    /// Projected page
    pub page: Rect,
    /// Page in millimeters
    pub page_mm: Rect,
    /// Every cell in index order
    pub cells: Vec<PreviewCell>,
}

impl SheetPreview {
    /// Cells owned by some entry.
    pub fn occupied(&self) -> impl Iterator<Item = &PreviewCell> {
        self.cells.iter().filter(|c| c.is_occupied())
    }

    /// Looks up one cell.
    #[must_use]
    pub fn cell(&self, cell: CellIndex) -> Option<&PreviewCell> {
        self.cells.get(cell.checked_sub(1)? as usize)
    }
}

/// Projects `sheet` with the default symbology and preview symbol parameters.
///
/// `padding_mm` must match the export's so symbols land in the same place.
#[must_use]
pub fn build_preview(
    sheet: &SheetSnapshot,
    projection: PreviewProjection,
    padding_mm: f64,
) -> SheetPreview {
    build_preview_with(
        sheet,
        projection,
        &Code128,
        &BarcodeOptions::preview(),
        padding_mm,
    )
}

/// Projects `sheet`, sizing symbols with `symbology` and `options`.
#[must_use]
pub fn build_preview_with<S: Symbology>(
    sheet: &SheetSnapshot,
    projection: PreviewProjection,
    symbology: &S,
    options: &BarcodeOptions,
    padding_mm: f64,
) -> SheetPreview {
    let occupancy = OccupancyIndex::rebuild(&sheet.entries);

    let mut occupants = BTreeMap::new();
    let mut natural_sizes = BTreeMap::new();
    for (idx, entry) in sheet.entries.iter().enumerate() {
        occupants.insert(
            entry.id,
            Occupant {
                entry_id: entry.id,
                ordinal: idx + 1,
                text: entry.text.clone(),
            },
        );
        if entry.is_valid() {
            if let Ok(raster) = symbology.render(entry.text.trim(), options) {
                natural_sizes.insert(entry.id, (raster.width_mm, raster.height_mm));
            }
        }
    }

    let cells: Vec<PreviewCell> = geometry::all_rects(&sheet.layout)
        .into_iter()
        .map(|(cell, rect_mm)| {
            let owner = occupancy.occupied_by(cell);
            let glyph = owner
                .and_then(|id| natural_sizes.get(&id))
                .map(|&(w, h)| projection.project(place_in_cell(rect_mm, padding_mm, w, h)));

            PreviewCell {
                cell,
                rect_mm,
                rect: projection.project(rect_mm),
                occupant: owner.and_then(|id| occupants.get(&id).cloned()),
                glyph,
            }
        })
        .collect();

    debug!(
        cells = cells.len(),
        occupied = occupancy.len(),
        scale = projection.scale,
        "preview built"
    );

    let page_mm = geometry::page_rect(&sheet.layout);
    SheetPreview {
        format: sheet.format,
        page: projection.project(page_mm),
        page_mm,
        cells,
    }
}
