//! Ordered collection of label entries.
//!
//! The store is plain CRUD: it never consults the occupancy index and never
//! rejects a cell assignment. Each mutation reports what changed as a
//! [`StoreEvent`] so the owner can keep derived state current.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{CellIndex, EntryId, EntryUpdate, LabelEntry};

/// Change produced by a store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A new entry was appended.
    Added {
        /// New entry
        id: EntryId,
    },
    /// An entry was removed together with its cells.
    Removed {
        /// Removed entry
        id: EntryId,
        /// Cells the entry held
        cells: BTreeSet<CellIndex>,
    },
    /// An entry's text and/or cells changed.
    Updated {
        /// Changed entry
        id: EntryId,
        /// Cells before the update
        old_cells: BTreeSet<CellIndex>,
        /// Cells after the update
        new_cells: BTreeSet<CellIndex>,
    },
    /// Every entry but the first was dropped.
    Cleared {
        /// Dropped entries with their cells
        removed: Vec<(EntryId, BTreeSet<CellIndex>)>,
    },
}

/// Counters shown next to the entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of entries
    pub entries: usize,
    /// Entries with text and at least one cell
    pub valid: usize,
    /// Cells assigned across all entries
    pub cells_used: usize,
}

/// Insertion-ordered label entries. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelStore {
    entries: Vec<LabelEntry>,
}

impl LabelStore {
    /// Creates a store seeded with one blank entry on cell 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![LabelEntry::with_cell(1)],
        }
    }

    /// Appends a blank entry with no cells.
    pub fn add(&mut self) -> (EntryId, StoreEvent) {
        let entry = LabelEntry::new();
        let id = entry.id;
        self.entries.push(entry);
        (id, StoreEvent::Added { id })
    }

    /// Removes an entry. Unknown ids and the last remaining entry are left alone.
    pub fn remove(&mut self, id: EntryId) -> Option<StoreEvent> {
        if self.entries.len() <= 1 {
            return None;
        }
        let idx = self.entries.iter().position(|e| e.id == id)?;
        let entry = self.entries.remove(idx);
        Some(StoreEvent::Removed {
            id,
            cells: entry.cells,
        })
    }

    /// Merges a partial update into an entry. Returns `None` for unknown ids.
    pub fn update(&mut self, id: EntryId, update: EntryUpdate) -> Option<StoreEvent> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        let old_cells = entry.apply(update);
        Some(StoreEvent::Updated {
            id,
            old_cells,
            new_cells: entry.cells.clone(),
        })
    }

    /// Keeps only the first entry.
    pub fn retain_first(&mut self) -> StoreEvent {
        let removed = self
            .entries
            .drain(1..)
            .map(|entry| (entry.id, entry.cells))
            .collect();
        StoreEvent::Cleared { removed }
    }

    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&LabelEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// 1-based display position of an entry.
    #[must_use]
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id).map(|idx| idx + 1)
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    /// First entry (always present).
    #[must_use]
    pub fn first(&self) -> &LabelEntry {
        &self.entries[0]
    }

    /// Entries ready for rendering.
    pub fn valid_entries(&self) -> impl Iterator<Item = &LabelEntry> {
        self.entries.iter().filter(|e| e.is_valid())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry, validity and cell counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            entries: self.entries.len(),
            valid: self.valid_entries().count(),
            cells_used: self.entries.iter().map(|e| e.cells.len()).sum(),
        }
    }
}

impl Default for LabelStore {
    fn default() -> Self {
        Self::new()
    }
}
