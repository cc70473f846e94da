//! Barcode symbol rendering.
//!
//! Encoding is delegated to `barcoders`; this module turns the encoded module
//! pattern into a grayscale raster with a known physical size so placement
//! code can fit it into a cell.

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};

/// CSS reference resolution used for the natural symbol size.
pub const PX_PER_INCH: f64 = 96.0;

/// Raster pixels per CSS pixel. Keeps 1.2px and 1.5px modules crisp.
pub const SUPERSAMPLE: u32 = 4;

const MM_PER_INCH: f64 = 25.4;

/// Converts CSS pixels to millimeters.
#[must_use]
pub fn px_to_mm(px: f64) -> f64 {
    px * MM_PER_INCH / PX_PER_INCH
}

/// Supported symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BarcodeFormat {
    /// Code 128 (sets B and C)
    #[default]
    Code128,
}

/// Symbol parameters, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarcodeOptions {
    /// Symbology
    pub format: BarcodeFormat,
    /// Width of one narrow module
    pub module_width: f64,
    /// Bar height
    pub height: f64,
    /// Print the text below the bars
    pub show_text: bool,
    /// Caption font size
    pub font_size: f64,
    /// Gap between bars and caption
    pub text_margin: f64,
    /// Quiet zone on every side
    pub margin: f64,
}

impl BarcodeOptions {
    /// Parameters for the printed sheet.
    #[must_use]
    pub const fn export() -> Self {
        Self {
            format: BarcodeFormat::Code128,
            module_width: 1.5,
            height: 30.0,
            show_text: true,
            font_size: 20.0,
            text_margin: 2.0,
            margin: 5.0,
        }
    }

    /// Parameters for the on-screen preview.
    #[must_use]
    pub const fn preview() -> Self {
        Self {
            format: BarcodeFormat::Code128,
            module_width: 1.2,
            height: 20.0,
            show_text: true,
            font_size: 18.0,
            text_margin: 2.0,
            margin: 5.0,
        }
    }

    /// Height of the caption band below the bars, zero when text is hidden.
    #[must_use]
    pub fn caption_band(&self) -> f64 {
        if self.show_text {
            self.text_margin + self.font_size
        } else {
            0.0
        }
    }

    /// Natural symbol size in CSS pixels for `modules` narrow modules.
    #[must_use]
    pub fn natural_size_px(&self, modules: usize) -> (f64, f64) {
        #[allow(clippy::cast_precision_loss)]
        let bars = modules as f64 * self.module_width;
        (
            bars + self.margin * 2.0,
            self.height + self.caption_band() + self.margin * 2.0,
        )
    }
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self::export()
    }
}

/// Caption to print under the bars.
///
/// Sizes are millimeters at natural symbol size; the writer scales them with
/// the placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    /// Human-readable text
    pub text: String,
    /// Font size
    pub font_size_mm: f64,
    /// Distance from the raster's bottom edge to the text baseline
    pub baseline_mm: f64,
}

/// Rendered symbol: bars only, with room reserved for the caption.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeRaster {
    /// Grayscale pixels, black bars on white
    pub image: GrayImage,
    /// Natural width
    pub width_mm: f64,
    /// Natural height, caption band included
    pub height_mm: f64,
    /// Caption drawn by the document writer
    pub caption: Option<Caption>,
}

/// Turns text into a placeable symbol.
pub trait Symbology {
    /// Renders `text`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSymbologyInput` when `text` cannot be encoded.
    fn render(&self, text: &str, options: &BarcodeOptions) -> Result<BarcodeRaster>;
}

/// Code 128 through `barcoders`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Code128;

impl Code128 {
    /// Picks the character set: C for even-length digit strings, B otherwise.
    fn with_charset(text: &str) -> Result<String> {
        if text.is_empty() {
            return Err(invalid(text, "empty text"));
        }

        if text.len() % 2 == 0 && text.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(format!("\u{0106}{text}"));
        }

        if let Some(c) = text.chars().find(|c| !(' '..='~').contains(c)) {
            return Err(invalid(text, &format!("character {c:?} is not in Code 128 set B")));
        }
        Ok(format!("\u{0181}{text}"))
    }

    /// Encoded module pattern, 1 = bar.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSymbologyInput` when `text` cannot be encoded.
    pub fn encode(text: &str) -> Result<Vec<u8>> {
        let data = Self::with_charset(text)?;
        let barcode = barcoders::sym::code128::Code128::new(data)
            .map_err(|e| invalid(text, &format!("{e:?}")))?;
        Ok(barcode.encode())
    }
}

impl Symbology for Code128 {
    fn render(&self, text: &str, options: &BarcodeOptions) -> Result<BarcodeRaster> {
        let modules = Self::encode(text)?;
        let (width_px, height_px) = options.natural_size_px(modules.len());
        let image = rasterize(&modules, options, width_px, height_px);

        let caption = options.show_text.then(|| Caption {
            text: text.to_string(),
            font_size_mm: px_to_mm(options.font_size),
            baseline_mm: px_to_mm(options.margin + options.font_size * 0.2),
        });

        Ok(BarcodeRaster {
            image,
            width_mm: px_to_mm(width_px),
            height_mm: px_to_mm(height_px),
            caption,
        })
    }
}

fn invalid(text: &str, reason: &str) -> LabelError {
    LabelError::InvalidSymbologyInput {
        text: text.to_string(),
        reason: reason.to_string(),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn rasterize(modules: &[u8], options: &BarcodeOptions, width_px: f64, height_px: f64) -> GrayImage {
    let scale = f64::from(SUPERSAMPLE);
    let to_px = |v: f64| (v * scale).round() as u32;

    let mut image = GrayImage::from_pixel(to_px(width_px), to_px(height_px), Luma([255]));
    let top = to_px(options.margin);
    let bottom = to_px(options.margin + options.height);

    for (i, _) in modules.iter().enumerate().filter(|(_, m)| **m == 1) {
        let left = to_px(options.margin + i as f64 * options.module_width);
        let right = to_px(options.margin + (i + 1) as f64 * options.module_width);
        for x in left..right.min(image.width()) {
            for y in top..bottom.min(image.height()) {
                image.put_pixel(x, y, Luma([0]));
            }
        }
    }

    image
}
