//! Cell geometry for label sheets.
//!
//! Maps 1-based cell indices to physical rectangles in millimeters. This is
//! the single source of placement truth: the preview scales these rectangles
//! for display and the PDF export uses them unscaled, so both always agree.

use crate::error::{LabelError, Result};
use crate::models::{CellIndex, LayoutSpec, Rect};

/// Number of addressable cells (`columns * rows`).
///
/// Saturates for grids that [`LayoutSpec::validate`] would reject.
#[must_use]
pub fn total_cells(spec: &LayoutSpec) -> u32 {
    spec.columns.saturating_mul(spec.rows)
}

/// Grid shape as `(columns, rows)`.
#[must_use]
pub const fn grid_shape(spec: &LayoutSpec) -> (u32, u32) {
    (spec.columns, spec.rows)
}

/// Resolves a cell index to its zero-based `(row, col)`.
///
/// # Errors
///
/// Returns `OutOfRange` if `cell` is 0 or greater than [`total_cells`].
pub fn grid_position(cell: CellIndex, spec: &LayoutSpec) -> Result<(u32, u32)> {
    let total = total_cells(spec);
    if cell == 0 || cell > total {
        return Err(LabelError::OutOfRange { cell, total });
    }

    let idx = cell - 1;
    Ok((idx / spec.columns, idx % spec.columns))
}

/// Distance from the top page edge to the top of `row`.
///
/// Accumulates `cell_height + spacing_for_row(r)` for every row above, so the
/// non-uniform gaps of the physical sheet are reproduced exactly.
#[must_use]
pub fn row_offset_mm(row: u32, spec: &LayoutSpec) -> f64 {
    let mut y = spec.top_margin_mm;
    for r in 0..row {
        y += spec.cell_height_mm + spec.spacing_for_row(r);
    }
    y
}

/// Distance from the left page edge to the left of `col`.
#[must_use]
pub fn column_offset_mm(col: u32, spec: &LayoutSpec) -> f64 {
    spec.left_margin_mm + f64::from(col) * (spec.cell_width_mm + spec.column_spacing_mm)
}

/// Physical rectangle of a cell in millimeters.
///
/// # Errors
///
/// Returns `OutOfRange` if `cell` is not a valid index for `spec`.
pub fn rect_for(cell: CellIndex, spec: &LayoutSpec) -> Result<Rect> {
    let (row, col) = grid_position(cell, spec)?;

    Ok(Rect::new(
        column_offset_mm(col, spec),
        row_offset_mm(row, spec),
        spec.cell_width_mm,
        spec.cell_height_mm,
    ))
}

/// Rectangles of every cell in index order.
#[must_use]
pub fn all_rects(spec: &LayoutSpec) -> Vec<(CellIndex, Rect)> {
    let mut rects = Vec::with_capacity(total_cells(spec) as usize);
    for row in 0..spec.rows {
        let y = row_offset_mm(row, spec);
        for col in 0..spec.columns {
            let cell = row * spec.columns + col + 1;
            rects.push((
                cell,
                Rect::new(
                    column_offset_mm(col, spec),
                    y,
                    spec.cell_width_mm,
                    spec.cell_height_mm,
                ),
            ));
        }
    }
    rects
}

/// Bounding box of the whole grid.
#[must_use]
pub fn grid_bounds(spec: &LayoutSpec) -> Rect {
    let last_col = spec.columns.saturating_sub(1);
    let last_row = spec.rows.saturating_sub(1);
    let right = column_offset_mm(last_col, spec) + spec.cell_width_mm;
    let bottom = row_offset_mm(last_row, spec) + spec.cell_height_mm;

    Rect::new(
        spec.left_margin_mm,
        spec.top_margin_mm,
        right - spec.left_margin_mm,
        bottom - spec.top_margin_mm,
    )
}

/// The page itself as a rectangle anchored at the origin.
#[must_use]
pub fn page_rect(spec: &LayoutSpec) -> Rect {
    Rect::new(0.0, 0.0, spec.page.width_mm, spec.page.height_mm)
}

/// Finds the cell under a page point, if any. Gaps and margins hit nothing.
#[must_use]
pub fn cell_at(x_mm: f64, y_mm: f64, spec: &LayoutSpec) -> Option<CellIndex> {
    all_rects(spec).into_iter().find_map(|(cell, rect)| {
        let inside = x_mm >= rect.x && x_mm < rect.right() && y_mm >= rect.y && y_mm < rect.bottom();
        inside.then_some(cell)
    })
}
