//! Export of a label sheet to a printable document.
//!
//! The renderer walks the valid entries of a sheet snapshot, renders each
//! entry's symbol once and places a copy into every cell it owns. Placement
//! uses the geometry engine's rectangles unscaled, inset by the padding and
//! fitted without ever enlarging the symbol.

pub mod pdf;
pub mod symbology;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{LabelError, Result};
use crate::models::{EntryId, LayoutSpec, PlacedGlyph, Rect};
use crate::services::{geometry, SheetSnapshot};

pub use pdf::PdfWriter;
pub use symbology::{BarcodeFormat, BarcodeOptions, BarcodeRaster, Code128, Symbology};

/// Default padding between a cell border and its symbol.
pub const DEFAULT_PADDING_MM: f64 = 2.0;

/// Default export file stem.
pub const DEFAULT_FILENAME: &str = "barcode-labels";

/// Sink for placed symbols.
pub trait DocumentWriter {
    /// Places a raster into `rect` (millimeters, top-left origin).
    ///
    /// # Errors
    ///
    /// Returns `ExportFailure` when the backend rejects the image.
    fn place_image(&mut self, raster: &BarcodeRaster, rect: Rect) -> Result<()>;

    /// Finalizes the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ExportFailure` when the file cannot be written.
    fn save(self, path: &Path) -> Result<()>;
}

/// Entry left out of the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Entry id
    pub entry_id: EntryId,
    /// Text that failed to encode
    pub text: String,
    /// Symbology error message
    pub reason: String,
}

/// Outcome of one export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportReport {
    /// Every symbol copy placed on the page
    pub placed: Vec<PlacedGlyph>,
    /// Entries skipped because their text could not be encoded
    pub skipped: Vec<SkippedEntry>,
    /// When the placements were computed
    pub exported_at: DateTime<Utc>,
}

impl ExportReport {
    /// True when nothing was skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Busy flag that rejects overlapping exports.
#[derive(Debug, Default)]
pub struct ExportGuard {
    busy: AtomicBool,
}

/// Held for the duration of one export; releases the guard on drop.
#[derive(Debug)]
pub struct ExportTicket<'a> {
    guard: &'a ExportGuard,
}

impl ExportGuard {
    /// Creates an idle guard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Marks an export as running.
    ///
    /// # Errors
    ///
    /// Returns `ExportInProgress` if another ticket is alive.
    pub fn acquire(&self) -> Result<ExportTicket<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LabelError::ExportInProgress)?;
        Ok(ExportTicket { guard: self })
    }

    /// True while an export is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for ExportTicket<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

/// Where a symbol of the given natural size lands inside `cell`.
///
/// The cell is inset by `padding_mm` on every side and the symbol is centered
/// in what remains, scaled down to fit but never enlarged. The preview uses
/// the same rule so both renderers agree.
#[must_use]
pub fn place_in_cell(
    cell: Rect,
    padding_mm: f64,
    natural_width_mm: f64,
    natural_height_mm: f64,
) -> Rect {
    cell.inset(padding_mm)
        .fit_centered(natural_width_mm, natural_height_mm)
}

/// Appends `.pdf` unless the name already ends with it.
#[must_use]
pub fn pdf_file_name(name: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { DEFAULT_FILENAME } else { name };
    if name.to_ascii_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}

/// Resolves the output file from a directory and a file name.
#[must_use]
pub fn output_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(pdf_file_name(name))
}

/// Lays symbols out on the page.
#[derive(Debug)]
pub struct ExportRenderer<S = Code128> {
    symbology: S,
    options: BarcodeOptions,
    padding_mm: f64,
    guard: ExportGuard,
}

impl ExportRenderer<Code128> {
    /// Code 128 renderer with export parameters and the default padding.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_symbology(Code128)
    }
}

impl Default for ExportRenderer<Code128> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbology> ExportRenderer<S> {
    /// Renderer over a custom symbology.
    #[must_use]
    pub const fn with_symbology(symbology: S) -> Self {
        Self {
            symbology,
            options: BarcodeOptions::export(),
            padding_mm: DEFAULT_PADDING_MM,
            guard: ExportGuard::new(),
        }
    }

    /// Overrides the symbol parameters.
    #[must_use]
    pub fn with_options(mut self, options: BarcodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the cell padding.
    #[must_use]
    pub fn with_padding(mut self, padding_mm: f64) -> Self {
        self.padding_mm = padding_mm;
        self
    }

    /// Busy flag shared by every export through this renderer.
    #[must_use]
    pub const fn guard(&self) -> &ExportGuard {
        &self.guard
    }

    /// Where a symbol of the given natural size lands inside `cell`.
    #[must_use]
    pub fn placement(&self, cell: Rect, natural_width_mm: f64, natural_height_mm: f64) -> Rect {
        place_in_cell(cell, self.padding_mm, natural_width_mm, natural_height_mm)
    }

    /// Places every valid entry of `sheet` into `writer`.
    ///
    /// Entries whose text the symbology rejects are skipped and reported; any
    /// other failure aborts.
    ///
    /// # Errors
    ///
    /// `ExportInProgress` when another export holds the guard, `OutOfRange`
    /// for a cell outside the layout, or the writer's `ExportFailure`.
    pub fn render<W: DocumentWriter>(
        &self,
        sheet: &SheetSnapshot,
        writer: &mut W,
    ) -> Result<ExportReport> {
        let _ticket = self.guard.acquire()?;
        self.place_all(sheet, &sheet.layout, writer)
    }

    fn place_all<W: DocumentWriter>(
        &self,
        sheet: &SheetSnapshot,
        layout: &LayoutSpec,
        writer: &mut W,
    ) -> Result<ExportReport> {
        let mut report = ExportReport {
            exported_at: Utc::now(),
            ..ExportReport::default()
        };

        for entry in sheet.valid_entries() {
            let text = entry.text.trim();
            let raster = match self.symbology.render(text, &self.options) {
                Ok(raster) => raster,
                Err(LabelError::InvalidSymbologyInput { text, reason }) => {
                    warn!(entry = %entry.id, %text, %reason, "skipping entry");
                    report.skipped.push(SkippedEntry {
                        entry_id: entry.id,
                        text,
                        reason,
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            for &cell in &entry.cells {
                let cell_rect = geometry::rect_for(cell, layout)?;
                let rect = self.placement(cell_rect, raster.width_mm, raster.height_mm);
                writer.place_image(&raster, rect)?;
                report.placed.push(PlacedGlyph {
                    entry_id: entry.id,
                    cell,
                    rect,
                });
            }
            debug!(entry = %entry.id, cells = entry.cells.len(), "entry placed");
        }

        Ok(report)
    }

    /// Renders `sheet` into `writer` and saves it at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::render`], plus the writer's save failure.
    pub fn export_with<W: DocumentWriter>(
        &self,
        sheet: &SheetSnapshot,
        mut writer: W,
        path: &Path,
    ) -> Result<ExportReport> {
        let _ticket = self.guard.acquire()?;
        let report = self.place_all(sheet, &sheet.layout, &mut writer)?;
        writer.save(path)?;

        info!(
            path = %path.display(),
            placed = report.placed.len(),
            skipped = report.skipped.len(),
            "export finished"
        );
        Ok(report)
    }

    /// Writes `sheet` as a one-page PDF.
    ///
    /// # Errors
    ///
    /// Same as [`Self::export_with`].
    pub fn export_pdf(&self, sheet: &SheetSnapshot, path: &Path) -> Result<ExportReport> {
        let writer = PdfWriter::new("Barcode labels", sheet.layout.page)?;
        self.export_with(sheet, writer, path)
    }
}
