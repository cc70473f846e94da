//! PDF document writer backed by `printpdf`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::DynamicImage;
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Px,
};
use tracing::debug;

use crate::error::{LabelError, Result};
use crate::export::symbology::BarcodeRaster;
use crate::export::DocumentWriter;
use crate::models::{PageSpec, Rect};

const MM_PER_INCH: f64 = 25.4;
const PT_PER_MM: f64 = 72.0 / MM_PER_INCH;
/// Advance width of a Courier glyph relative to the font size.
const COURIER_ADVANCE: f64 = 0.6;

/// Single-page PDF with a top-left millimeter coordinate system.
pub struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    page: PageSpec,
}

impl std::fmt::Debug for PdfWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfWriter").field("page", &self.page).finish_non_exhaustive()
    }
}

fn pdf_error(err: impl std::fmt::Display) -> LabelError {
    LabelError::ExportFailure(err.to_string())
}

#[allow(clippy::cast_possible_truncation)]
fn mm(value: f64) -> Mm {
    Mm(value as f32)
}

impl PdfWriter {
    /// Starts a document with one blank page.
    ///
    /// # Errors
    ///
    /// Returns `ExportFailure` if the caption font cannot be registered.
    pub fn new(title: &str, page: PageSpec) -> Result<Self> {
        let (doc, page_idx, layer_idx) =
            PdfDocument::new(title, mm(page.width_mm), mm(page.height_mm), "Labels");
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        let font = doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_error)?;

        Ok(Self {
            doc,
            layer,
            font,
            page,
        })
    }

    /// Converts a top-left y coordinate to PDF's bottom-left origin.
    fn flip_y(&self, y_mm: f64) -> f64 {
        self.page.height_mm - y_mm
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_caption(&self, raster: &BarcodeRaster, rect: Rect) {
        let Some(caption) = &raster.caption else {
            return;
        };

        let scale = rect.width / raster.width_mm;
        let size_mm = caption.font_size_mm * scale;
        let text_width = caption.text.chars().count() as f64 * COURIER_ADVANCE * size_mm;
        let x = rect.x + (rect.width - text_width) / 2.0;
        let baseline = self.flip_y(rect.bottom()) + caption.baseline_mm * scale;

        self.layer.use_text(
            caption.text.clone(),
            (size_mm * PT_PER_MM) as f32,
            mm(x),
            mm(baseline),
            &self.font,
        );
    }
}

impl DocumentWriter for PdfWriter {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn place_image(&mut self, raster: &BarcodeRaster, rect: Rect) -> Result<()> {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(LabelError::ExportFailure(format!(
                "cannot place an image into an empty rectangle at ({:.1}, {:.1})",
                rect.x, rect.y
            )));
        }

        let rgb = DynamicImage::ImageLuma8(raster.image.clone()).to_rgb8();
        let (width_px, height_px) = rgb.dimensions();

        let image = Image::from(ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: rgb.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // DPI = pixels / inches
        let dpi = f64::from(width_px) / (rect.width / MM_PER_INCH);

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(rect.x)),
                translate_y: Some(mm(self.flip_y(rect.bottom()))),
                dpi: Some(dpi as f32),
                ..Default::default()
            },
        );

        self.draw_caption(raster, rect);
        Ok(())
    }

    fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| LabelError::ExportFailure(format!("{}: {e}", path.display())))?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(pdf_error)?;
        debug!(path = %path.display(), "pdf written");
        Ok(())
    }
}
