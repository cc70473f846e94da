//! Sheet editing session.
//!
//! `Sheet` is the caller the store and occupancy index expect: it owns the
//! active layout, the entries and the cached occupancy index, checks every
//! cell request for range and ownership before the store is touched, and
//! notifies observers after each change so previews can refresh.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::error::{LabelError, Result};
use crate::models::{CellIndex, EntryId, EntryUpdate, LabelEntry, LayoutFormat, LayoutSpec};
use crate::services::geometry;
use crate::services::occupancy::{toggle_select_all, CellFilter, OccupancyIndex};
use crate::services::store::{LabelStore, StoreEvent, StoreStats};

/// Notification sent to observers after the sheet changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetEvent {
    /// An entry was appended.
    EntryAdded(EntryId),
    /// An entry was removed.
    EntryRemoved(EntryId),
    /// An entry's text or cells changed.
    EntryChanged(EntryId),
    /// All entries except the first were dropped.
    Cleared,
    /// A different layout became active.
    LayoutChanged(LayoutFormat),
}

type Observer = Box<dyn FnMut(&SheetEvent)>;

/// Read-only copy of the sheet for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    /// Active layout name
    pub format: LayoutFormat,
    /// Active layout geometry
    pub layout: LayoutSpec,
    /// Entries in display order
    pub entries: Vec<LabelEntry>,
}

impl SheetSnapshot {
    /// Entries with text and at least one cell.
    pub fn valid_entries(&self) -> impl Iterator<Item = &LabelEntry> {
        self.entries.iter().filter(|e| e.is_valid())
    }
}

/// Editing session over one label sheet.
pub struct Sheet {
    format: LayoutFormat,
    layout: LayoutSpec,
    store: LabelStore,
    occupancy: OccupancyIndex,
    observers: Vec<Observer>,
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("format", &self.format)
            .field("layout", &self.layout)
            .field("store", &self.store)
            .field("occupancy", &self.occupancy)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Sheet {
    /// Starts a session with the seed entry on cell 1.
    #[must_use]
    pub fn new(format: LayoutFormat, layout: LayoutSpec) -> Self {
        let store = LabelStore::new();
        let occupancy = OccupancyIndex::rebuild(store.entries());
        Self {
            format,
            layout,
            store,
            occupancy,
            observers: Vec::new(),
        }
    }

    /// Registers an observer called after every change.
    pub fn subscribe(&mut self, observer: impl FnMut(&SheetEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn commit(&mut self, store_event: &StoreEvent, sheet_event: SheetEvent) {
        self.occupancy.apply(store_event);
        self.notify(sheet_event);
    }

    fn notify(&mut self, event: SheetEvent) {
        debug!(?event, "sheet changed");
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Active layout name.
    #[must_use]
    pub const fn format(&self) -> LayoutFormat {
        self.format
    }

    /// Active layout geometry.
    #[must_use]
    pub const fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[LabelEntry] {
        self.store.entries()
    }

    /// Looks up an entry.
    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&LabelEntry> {
        self.store.get(id)
    }

    /// 1-based display position of an entry.
    #[must_use]
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.store.position(id)
    }

    /// Id of the first entry (always present).
    #[must_use]
    pub fn first_id(&self) -> EntryId {
        self.store.first().id
    }

    /// Entries ready for rendering.
    pub fn valid_entries(&self) -> impl Iterator<Item = &LabelEntry> {
        self.store.valid_entries()
    }

    /// Entry, validity and cell counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Cached cell ownership.
    #[must_use]
    pub const fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    /// Copies the state renderers need.
    #[must_use]
    pub fn snapshot(&self) -> SheetSnapshot {
        SheetSnapshot {
            format: self.format,
            layout: self.layout.clone(),
            entries: self.store.entries().to_vec(),
        }
    }

    /// Switches layout. Fails if an assigned cell does not exist in the new grid.
    pub fn set_layout(&mut self, format: LayoutFormat, layout: LayoutSpec) -> Result<()> {
        layout.validate()?;
        let total = geometry::total_cells(&layout);
        if let Some(cell) = self.occupancy.occupied_cells(None).into_iter().find(|c| *c > total) {
            return Err(LabelError::OutOfRange { cell, total });
        }

        self.format = format;
        self.layout = layout;
        self.notify(SheetEvent::LayoutChanged(format));
        Ok(())
    }

    /// Appends a blank entry.
    pub fn add_entry(&mut self) -> EntryId {
        let (id, event) = self.store.add();
        self.commit(&event, SheetEvent::EntryAdded(id));
        id
    }

    /// Removes an entry. Returns false when nothing was removed.
    pub fn remove_entry(&mut self, id: EntryId) -> bool {
        match self.store.remove(id) {
            Some(event) => {
                self.commit(&event, SheetEvent::EntryRemoved(id));
                true
            }
            None => false,
        }
    }

    /// Keeps only the first entry.
    pub fn clear_all(&mut self) {
        let event = self.store.retain_first();
        self.commit(&event, SheetEvent::Cleared);
    }

    /// Replaces an entry's text.
    pub fn set_text(&mut self, id: EntryId, text: impl Into<String>) -> Result<()> {
        let event = self
            .store
            .update(id, EntryUpdate::text(text))
            .ok_or(LabelError::UnknownEntry(id))?;
        self.commit(&event, SheetEvent::EntryChanged(id));
        Ok(())
    }

    /// Cells of `cells` that would break the single-owner rule for `id`.
    pub fn conflicts_for(&self, id: EntryId, cells: &BTreeSet<CellIndex>) -> BTreeSet<CellIndex> {
        self.occupancy.conflicts_for(id, cells)
    }

    fn check_request(&self, id: EntryId, cells: &BTreeSet<CellIndex>) -> Result<()> {
        if self.store.get(id).is_none() {
            return Err(LabelError::UnknownEntry(id));
        }

        let total = geometry::total_cells(&self.layout);
        if let Some(&cell) = cells.iter().find(|c| **c == 0 || **c > total) {
            return Err(LabelError::OutOfRange { cell, total });
        }

        let conflicts = self.occupancy.conflicts_for(id, cells);
        if !conflicts.is_empty() {
            return Err(LabelError::CellConflict {
                cells: conflicts.into_iter().collect(),
            });
        }

        Ok(())
    }

    /// Replaces an entry's cell set after range and conflict checks.
    ///
    /// # Errors
    ///
    /// `UnknownEntry`, `OutOfRange` or `CellConflict`; the store is unchanged
    /// on error.
    pub fn assign_cells(&mut self, id: EntryId, cells: BTreeSet<CellIndex>) -> Result<()> {
        if let Err(err) = self.check_request(id, &cells) {
            debug!(entry = %id, %err, "cell request rejected");
            return Err(err);
        }

        let event = self
            .store
            .update(id, EntryUpdate::cells(cells))
            .ok_or(LabelError::UnknownEntry(id))?;
        self.commit(&event, SheetEvent::EntryChanged(id));
        Ok(())
    }

    /// Adds or removes a single cell, like clicking it in the picker.
    ///
    /// Returns true if the cell is selected afterwards.
    pub fn toggle_cell(&mut self, id: EntryId, cell: CellIndex) -> Result<bool> {
        let mut cells = self
            .store
            .get(id)
            .ok_or(LabelError::UnknownEntry(id))?
            .cells
            .clone();

        let selected = if cells.remove(&cell) {
            false
        } else {
            cells.insert(cell);
            true
        };

        self.assign_cells(id, cells)?;
        Ok(selected)
    }

    /// Select-all toggle over the cells available to `id` under `filter`.
    ///
    /// Returns the resulting cell set.
    pub fn select_all(&mut self, id: EntryId, filter: &CellFilter) -> Result<BTreeSet<CellIndex>> {
        let current = self
            .store
            .get(id)
            .ok_or(LabelError::UnknownEntry(id))?
            .cells
            .clone();
        let available = self.occupancy.available_cells(id, filter, &self.layout);
        let cells = toggle_select_all(&current, &available);

        self.assign_cells(id, cells.clone())?;
        Ok(cells)
    }

    /// Cells available to `id` under `filter`.
    #[must_use]
    pub fn available_cells(&self, id: EntryId, filter: &CellFilter) -> BTreeSet<CellIndex> {
        self.occupancy.available_cells(id, filter, &self.layout)
    }
}
