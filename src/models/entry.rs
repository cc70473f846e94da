//! Label entry data structures.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::CellIndex;

/// Opaque unique identifier of a label entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Barcode text paired with the cells it is printed into.
///
/// # Validation
///
/// An entry is exportable only when its text is non-blank and it owns at
/// least one cell. Cell uniqueness across entries is enforced by the sheet
/// session, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    /// Stable identifier
    pub id: EntryId,
    /// Barcode content
    pub text: String,
    /// Assigned cells, kept sorted
    pub cells: BTreeSet<CellIndex>,
}

impl LabelEntry {
    /// Creates an entry with empty text and no cells.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: EntryId::new(),
            text: String::new(),
            cells: BTreeSet::new(),
        }
    }

    /// Creates an entry with empty text assigned to a single cell.
    #[must_use]
    pub fn with_cell(cell: CellIndex) -> Self {
        let mut entry = Self::new();
        entry.cells.insert(cell);
        entry
    }

    /// Returns true if the entry has printable text and at least one cell.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.cells.is_empty()
    }

    /// Applies a partial update, returning the previous cell set.
    pub fn apply(&mut self, update: EntryUpdate) -> BTreeSet<CellIndex> {
        if let Some(text) = update.text {
            self.text = text;
        }
        match update.cells {
            Some(cells) => std::mem::replace(&mut self.cells, cells),
            None => self.cells.clone(),
        }
    }
}

impl Default for LabelEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial change to a [`LabelEntry`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    /// Replacement text
    pub text: Option<String>,
    /// Replacement cell set
    pub cells: Option<BTreeSet<CellIndex>>,
}

impl EntryUpdate {
    /// Update that only replaces the text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            cells: None,
        }
    }

    /// Update that only replaces the cell set.
    pub fn cells(cells: impl IntoIterator<Item = CellIndex>) -> Self {
        Self {
            text: None,
            cells: Some(cells.into_iter().collect()),
        }
    }

    /// Also replaces the cell set.
    #[must_use]
    pub fn with_cells(mut self, cells: impl IntoIterator<Item = CellIndex>) -> Self {
        self.cells = Some(cells.into_iter().collect());
        self
    }
}
