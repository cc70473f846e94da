//! Physical label sheet definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};

/// Physical page size in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Page width
    pub width_mm: f64,
    /// Page height
    pub height_mm: f64,
}

impl PageSpec {
    /// ISO 216 A4, portrait.
    pub const A4: Self = Self {
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::A4
    }
}

/// One step of the row spacing schedule.
///
/// The spacing applies below every row from `from_row` onwards until the next
/// step takes over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowSpacing {
    /// First zero-based row this spacing applies to
    pub from_row: u32,
    /// Vertical gap below the row in millimeters
    pub spacing_mm: f64,
}

impl RowSpacing {
    /// Creates a schedule step.
    #[must_use]
    pub const fn new(from_row: u32, spacing_mm: f64) -> Self {
        Self {
            from_row,
            spacing_mm,
        }
    }
}

/// Grid geometry of a label sheet.
///
/// Cells are addressed with 1-based row-major indices: cell 1 is row 0,
/// column 0 and cell `columns + 1` starts the second row.
///
/// # Validation
///
/// - `columns` and `rows` must be non-zero
/// - cell dimensions must be positive, margins and spacings non-negative
/// - `row_spacing` must start at row 0 and be strictly increasing
/// - the whole grid must fit on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    /// Number of label columns
    pub columns: u32,
    /// Number of label rows
    pub rows: u32,
    /// Label width in millimeters
    pub cell_width_mm: f64,
    /// Label height in millimeters
    pub cell_height_mm: f64,
    /// Horizontal gap between adjacent columns
    pub column_spacing_mm: f64,
    /// Distance from the top page edge to the first row
    pub top_margin_mm: f64,
    /// Distance from the left page edge to the first column
    pub left_margin_mm: f64,
    /// Step function of row index to vertical gap below that row
    pub row_spacing: Vec<RowSpacing>,
    /// Page the grid is printed on
    #[serde(default)]
    pub page: PageSpec,
}

impl LayoutSpec {
    /// The 5 x 13 sheet of 37 x 20 mm labels on A4.
    ///
    /// Row gaps are not uniform on the physical sheet: 2 mm below the first
    /// row, 1.7 mm below rows 1 and 2, 1.5 mm from row 3 on.
    #[must_use]
    pub fn a4_65() -> Self {
        Self {
            columns: 5,
            rows: 13,
            cell_width_mm: 37.0,
            cell_height_mm: 20.0,
            column_spacing_mm: 2.0,
            top_margin_mm: 9.0,
            left_margin_mm: 8.0,
            row_spacing: vec![
                RowSpacing::new(0, 2.0),
                RowSpacing::new(1, 1.7),
                RowSpacing::new(3, 1.5),
            ],
            page: PageSpec::A4,
        }
    }

    /// Vertical gap below the given zero-based row.
    #[must_use]
    pub fn spacing_for_row(&self, row: u32) -> f64 {
        self.row_spacing
            .iter()
            .take_while(|step| step.from_row <= row)
            .last()
            .map_or(0.0, |step| step.spacing_mm)
    }

    /// Checks that the spec describes a printable grid.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(LabelError::InvalidLayout(format!(
                "grid must have at least one row and column (got {}x{})",
                self.columns, self.rows
            )));
        }

        if self.columns.checked_mul(self.rows).is_none() {
            return Err(LabelError::InvalidLayout(format!(
                "grid of {}x{} cells is too large",
                self.columns, self.rows
            )));
        }

        let lengths = [
            self.cell_width_mm,
            self.cell_height_mm,
            self.column_spacing_mm,
            self.top_margin_mm,
            self.left_margin_mm,
            self.page.width_mm,
            self.page.height_mm,
        ];
        if lengths
            .into_iter()
            .chain(self.row_spacing.iter().map(|step| step.spacing_mm))
            .any(|mm| !mm.is_finite())
        {
            return Err(LabelError::InvalidLayout(
                "dimensions must be finite numbers".to_string(),
            ));
        }

        if self.cell_width_mm <= 0.0 || self.cell_height_mm <= 0.0 {
            return Err(LabelError::InvalidLayout(format!(
                "cell size must be positive (got {} x {} mm)",
                self.cell_width_mm, self.cell_height_mm
            )));
        }

        if self.column_spacing_mm < 0.0 || self.top_margin_mm < 0.0 || self.left_margin_mm < 0.0
        {
            return Err(LabelError::InvalidLayout(
                "margins and column spacing cannot be negative".to_string(),
            ));
        }

        match self.row_spacing.first() {
            Some(first) if first.from_row == 0 => {}
            _ => {
                return Err(LabelError::InvalidLayout(
                    "row spacing schedule must start at row 0".to_string(),
                ))
            }
        }

        for pair in self.row_spacing.windows(2) {
            if pair[1].from_row <= pair[0].from_row {
                return Err(LabelError::InvalidLayout(format!(
                    "row spacing schedule is not increasing at row {}",
                    pair[1].from_row
                )));
            }
        }

        if self.row_spacing.iter().any(|step| step.spacing_mm < 0.0) {
            return Err(LabelError::InvalidLayout(
                "row spacing cannot be negative".to_string(),
            ));
        }

        let grid_width = self.left_margin_mm
            + f64::from(self.columns) * self.cell_width_mm
            + f64::from(self.columns - 1) * self.column_spacing_mm;
        let grid_height = self.top_margin_mm
            + (0..self.rows - 1)
                .map(|row| self.cell_height_mm + self.spacing_for_row(row))
                .sum::<f64>()
            + self.cell_height_mm;

        if grid_width > self.page.width_mm || grid_height > self.page.height_mm {
            return Err(LabelError::InvalidLayout(format!(
                "grid needs {grid_width:.1} x {grid_height:.1} mm but the page is {} x {} mm",
                self.page.width_mm, self.page.height_mm
            )));
        }

        Ok(())
    }
}

/// Named sheet formats offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum LayoutFormat {
    /// "40L" sheet
    #[default]
    #[serde(rename = "40L")]
    L40,
    /// "80L" sheet
    #[serde(rename = "80L")]
    L80,
    /// "65L" sheet
    #[serde(rename = "65L")]
    L65,
}

impl LayoutFormat {
    /// All formats in display order.
    pub const ALL: [Self; 3] = [Self::L40, Self::L80, Self::L65];

    /// Canonical identifier ("40L", "80L", "65L").
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::L40 => "40L",
            Self::L80 => "80L",
            Self::L65 => "65L",
        }
    }
}

impl fmt::Display for LayoutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutFormat {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LabelError::UnknownLayout(wanted.to_string()))
    }
}
