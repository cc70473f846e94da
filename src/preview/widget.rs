//! Terminal rendering of a sheet preview.

use ratatui::{
    buffer::Buffer,
    layout::Rect as TermRect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Widget},
};

use crate::models::Rect;
use crate::preview::{PreviewCell, SheetPreview};

/// Height to width ratio of a terminal character cell.
pub const CHAR_ASPECT: f64 = 2.0;

/// Millimeter to character-cell projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalProjection {
    /// Columns per millimeter
    pub cols_per_mm: f64,
}

impl TerminalProjection {
    /// Lines per millimeter, derived from the character aspect.
    #[must_use]
    pub fn lines_per_mm(&self) -> f64 {
        self.cols_per_mm / CHAR_ASPECT
    }

    /// Projects a millimeter rectangle onto the character grid.
    ///
    /// Edges are floored independently so rectangles that do not overlap on
    /// the page never overlap on screen.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn project(&self, rect: Rect) -> TermRect {
        let to_col = |mm: f64| (mm * self.cols_per_mm).floor().max(0.0) as u16;
        let to_line = |mm: f64| (mm * self.lines_per_mm()).floor().max(0.0) as u16;

        let x = to_col(rect.x);
        let y = to_line(rect.y);
        TermRect::new(
            x,
            y,
            to_col(rect.right()).saturating_sub(x),
            to_line(rect.bottom()).saturating_sub(y),
        )
    }

    /// Size of the whole page in characters.
    #[must_use]
    pub fn page_size(&self, page_mm: Rect) -> (u16, u16) {
        let area = self.project(page_mm);
        (area.width, area.height)
    }
}

impl Default for TerminalProjection {
    fn default() -> Self {
        Self { cols_per_mm: 0.4 }
    }
}

/// Draws every cell of a preview as a bordered box.
///
/// Occupied cells show `#n` and the entry text, empty cells their number.
#[derive(Debug, Clone, Copy)]
pub struct SheetWidget<'a> {
    preview: &'a SheetPreview,
    projection: TerminalProjection,
}

impl<'a> SheetWidget<'a> {
    /// Widget with the default projection.
    #[must_use]
    pub fn new(preview: &'a SheetPreview) -> Self {
        Self {
            preview,
            projection: TerminalProjection::default(),
        }
    }

    /// Overrides the projection.
    #[must_use]
    pub const fn projection(mut self, projection: TerminalProjection) -> Self {
        self.projection = projection;
        self
    }

    fn render_cell(&self, cell: &PreviewCell, area: TermRect, buf: &mut Buffer) {
        let local = self.projection.project(cell.rect_mm);
        let target = TermRect::new(
            area.x.saturating_add(local.x),
            area.y.saturating_add(local.y),
            local.width,
            local.height,
        )
        .intersection(area);
        if target.width < 2 || target.height < 2 {
            return;
        }

        let (border, label, text) = match &cell.occupant {
            Some(occupant) => (
                Style::default().fg(Color::Green),
                format!("#{}", occupant.ordinal),
                Some(occupant.text.trim()),
            ),
            None => (
                Style::default().fg(Color::DarkGray),
                cell.cell.to_string(),
                None,
            ),
        };

        let block = Block::bordered()
            .border_type(BorderType::Plain)
            .border_style(border);
        let inner = block.inner(target);
        block.render(target, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = usize::from(inner.width);
        buf.set_stringn(
            inner.x,
            inner.y,
            &label,
            width,
            Style::default().add_modifier(Modifier::BOLD),
        );
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            if inner.height > 1 {
                buf.set_stringn(inner.x, inner.y + 1, text, width, Style::default());
            }
        }
    }
}

impl Widget for SheetWidget<'_> {
    fn render(self, area: TermRect, buf: &mut Buffer) {
        for cell in &self.preview.cells {
            self.render_cell(cell, area, buf);
        }
    }
}

/// Renders `preview` off-screen at page size and returns the text lines.
#[must_use]
pub fn render_to_string(preview: &SheetPreview, projection: TerminalProjection) -> String {
    let (width, height) = projection.page_size(preview.page_mm);
    let area = TermRect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    SheetWidget::new(preview)
        .projection(projection)
        .render(area, &mut buf);

    let mut out = String::new();
    for y in 0..height {
        let line: String = (0..width).map(|x| buf[(x, y)].symbol()).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
