//! Cell ownership index.
//!
//! Tracks which entry owns each cell and answers the conflict and availability
//! queries the sheet session runs before it mutates the store. The index is
//! advisory: it reports conflicts, it never drops cells on its own.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::models::{CellIndex, EntryId, LabelEntry, LayoutSpec};
use crate::services::geometry;
use crate::services::store::StoreEvent;

/// Restricts bulk cell queries, mirroring the cell picker's search box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellFilter {
    /// Every cell
    #[default]
    All,
    /// Cells whose number contains the given digits ("1" matches 1, 10-19, 21, ...)
    Search(String),
    /// Cells in a 1-based row
    Row(u32),
    /// Cells in a 1-based column
    Column(u32),
}

impl CellFilter {
    /// Returns true if `cell` passes the filter under `spec`.
    #[must_use]
    pub fn matches(&self, cell: CellIndex, spec: &LayoutSpec) -> bool {
        match self {
            Self::All => true,
            Self::Search(term) => cell.to_string().contains(term.trim()),
            Self::Row(row) => geometry::grid_position(cell, spec)
                .is_ok_and(|(r, _)| r + 1 == *row),
            Self::Column(col) => geometry::grid_position(cell, spec)
                .is_ok_and(|(_, c)| c + 1 == *col),
        }
    }
}

/// Cell to owner map, maintained incrementally from [`StoreEvent`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    owners: BTreeMap<CellIndex, EntryId>,
}

impl OccupancyIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from scratch. Earlier entries win duplicate cells.
    #[must_use]
    pub fn rebuild(entries: &[LabelEntry]) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.claim(entry.id, &entry.cells);
        }
        index
    }

    /// Folds one store mutation into the index.
    ///
    /// Assumes every cell has at most one owner, which [`Sheet`] guarantees by
    /// checking requests before the store changes. If two entries claim the
    /// same cell anyway, the first claim wins and releasing it leaves the cell
    /// free, whereas [`Self::rebuild`] would hand it to the other claimant.
    ///
    /// [`Sheet`]: crate::services::Sheet
    pub fn apply(&mut self, event: &StoreEvent) {
        match event {
            StoreEvent::Added { .. } => {}
            StoreEvent::Removed { id, cells } => self.release(*id, cells),
            StoreEvent::Updated {
                id,
                old_cells,
                new_cells,
            } => {
                self.release(*id, old_cells);
                self.claim(*id, new_cells);
            }
            StoreEvent::Cleared { removed } => {
                for (id, cells) in removed {
                    self.release(*id, cells);
                }
            }
        }
    }

    fn release(&mut self, id: EntryId, cells: &BTreeSet<CellIndex>) {
        for cell in cells {
            if self.owners.get(cell) == Some(&id) {
                self.owners.remove(cell);
            }
        }
    }

    fn claim(&mut self, id: EntryId, cells: &BTreeSet<CellIndex>) {
        for &cell in cells {
            match self.owners.get(&cell) {
                Some(owner) if *owner != id => {
                    warn!(cell, owner = %owner, claimant = %id, "cell already owned, keeping first owner");
                }
                _ => {
                    self.owners.insert(cell, id);
                }
            }
        }
    }

    /// Entry owning `cell`, if any.
    #[must_use]
    pub fn occupied_by(&self, cell: CellIndex) -> Option<EntryId> {
        self.owners.get(&cell).copied()
    }

    /// Cells of `proposed` that belong to an entry other than `candidate`.
    pub fn conflicts_for<'a>(
        &self,
        candidate: EntryId,
        proposed: impl IntoIterator<Item = &'a CellIndex>,
    ) -> BTreeSet<CellIndex> {
        proposed
            .into_iter()
            .copied()
            .filter(|cell| self.occupied_by(*cell).is_some_and(|owner| owner != candidate))
            .collect()
    }

    /// Every owned cell, optionally ignoring one entry's cells.
    #[must_use]
    pub fn occupied_cells(&self, exclude: Option<EntryId>) -> BTreeSet<CellIndex> {
        self.owners
            .iter()
            .filter(|(_, owner)| Some(**owner) != exclude)
            .map(|(cell, _)| *cell)
            .collect()
    }

    /// Cells `for_entry` could take: in range, matching `filter`, not owned by
    /// another entry. Cells the entry already holds are included.
    #[must_use]
    pub fn available_cells(
        &self,
        for_entry: EntryId,
        filter: &CellFilter,
        spec: &LayoutSpec,
    ) -> BTreeSet<CellIndex> {
        (1..=geometry::total_cells(spec))
            .filter(|cell| filter.matches(*cell, spec))
            .filter(|cell| {
                self.occupied_by(*cell)
                    .map_or(true, |owner| owner == for_entry)
            })
            .collect()
    }

    /// Number of owned cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns true when no cell is owned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Select-all toggle over a filtered set of available cells.
///
/// When every available cell is already selected they are all deselected;
/// otherwise they are merged into the selection. Cells outside `available`
/// are never touched.
#[must_use]
pub fn toggle_select_all(
    current: &BTreeSet<CellIndex>,
    available: &BTreeSet<CellIndex>,
) -> BTreeSet<CellIndex> {
    let all_selected = !available.is_empty() && available.is_subset(current);
    if all_selected {
        current.difference(available).copied().collect()
    } else {
        current.union(available).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryUpdate;
    use crate::services::store::LabelStore;

    #[test]
    fn test_conflicts_ignore_own_cells() {
        let mut store = LabelStore::new();
        let a = store.first().id;
        let (b, _) = store.add();
        store.update(b, EntryUpdate::cells([5, 6]));
        let index = OccupancyIndex::rebuild(store.entries());

        assert_eq!(index.occupied_by(1), Some(a));
        assert_eq!(index.occupied_by(5), Some(b));
        assert_eq!(index.occupied_by(7), None);

        assert_eq!(index.conflicts_for(a, &[1, 5, 7]), BTreeSet::from([5]));
        assert!(index.conflicts_for(b, &[5, 6]).is_empty());
    }

    #[test]
    fn test_contested_cell_keeps_first_owner() {
        // Store updates bypass the session checks here.
        let mut store = LabelStore::new();
        let mut index = OccupancyIndex::rebuild(store.entries());
        let first = store.first().id;

        let (b, event) = store.add();
        index.apply(&event);
        let event = store.update(b, EntryUpdate::cells([1, 2])).unwrap();
        index.apply(&event);
        assert_eq!(index.occupied_by(1), Some(first));
        assert_eq!(index.occupied_by(2), Some(b));

        let event = store.update(first, EntryUpdate::cells([9])).unwrap();
        index.apply(&event);
        assert_eq!(index.occupied_by(1), None);
        assert_eq!(
            OccupancyIndex::rebuild(store.entries()).occupied_by(1),
            Some(b)
        );
    }

    #[test]
    fn test_incremental_matches_rebuild() {
        let mut store = LabelStore::new();
        let mut index = OccupancyIndex::rebuild(store.entries());
        let first = store.first().id;

        let (b, event) = store.add();
        index.apply(&event);
        let event = store.update(b, EntryUpdate::cells([2, 3, 4])).unwrap();
        index.apply(&event);
        let event = store.update(first, EntryUpdate::cells([10])).unwrap();
        index.apply(&event);
        assert_eq!(index, OccupancyIndex::rebuild(store.entries()));

        let event = store.update(b, EntryUpdate::cells([3, 1])).unwrap();
        index.apply(&event);
        assert_eq!(index, OccupancyIndex::rebuild(store.entries()));

        let event = store.remove(b).unwrap();
        index.apply(&event);
        assert_eq!(index, OccupancyIndex::rebuild(store.entries()));
        assert_eq!(index.occupied_cells(None), BTreeSet::from([10]));
    }

    #[test]
    fn test_cleared_releases_cells() {
        let mut store = LabelStore::new();
        let mut index = OccupancyIndex::rebuild(store.entries());
        let (b, event) = store.add();
        index.apply(&event);
        index.apply(&store.update(b, EntryUpdate::cells([20, 21])).unwrap());
        assert_eq!(index.len(), 3);

        index.apply(&store.retain_first());
        assert_eq!(index.occupied_cells(None), BTreeSet::from([1]));
    }

    #[test]
    fn test_claim_keeps_first_owner() {
        let mut store = LabelStore::new();
        let a = store.first().id;
        let (b, _) = store.add();
        // Bypassing the session: the store accepts the duplicate, the index does not
        store.update(b, EntryUpdate::cells([1]));
        let index = OccupancyIndex::rebuild(store.entries());
        assert_eq!(index.occupied_by(1), Some(a));
    }

    #[test]
    fn test_occupied_cells_excluding_entry() {
        let mut store = LabelStore::new();
        let a = store.first().id;
        let (b, _) = store.add();
        store.update(b, EntryUpdate::cells([2, 3]));
        let index = OccupancyIndex::rebuild(store.entries());

        assert_eq!(index.occupied_cells(Some(a)), BTreeSet::from([2, 3]));
        assert_eq!(index.occupied_cells(Some(b)), BTreeSet::from([1]));
    }

    #[test]
    fn test_available_cells_with_filters() {
        let spec = LayoutSpec::a4_65();
        let mut store = LabelStore::new();
        let a = store.first().id;
        let (b, _) = store.add();
        store.update(b, EntryUpdate::cells([11, 12]));
        let index = OccupancyIndex::rebuild(store.entries());

        let all = index.available_cells(a, &CellFilter::All, &spec);
        assert_eq!(all.len(), 63);
        assert!(all.contains(&1), "own cell stays available");
        assert!(!all.contains(&11));

        let search = index.available_cells(a, &CellFilter::Search("1".to_string()), &spec);
        let expected: BTreeSet<CellIndex> = (1..=65)
            .filter(|c: &u32| c.to_string().contains('1'))
            .filter(|c| *c != 11 && *c != 12)
            .collect();
        assert_eq!(search, expected);

        let row = index.available_cells(a, &CellFilter::Row(3), &spec);
        assert_eq!(row, BTreeSet::from([13, 14, 15]));

        let column = index.available_cells(b, &CellFilter::Column(1), &spec);
        assert_eq!(column.len(), 12, "cell 1 in column 1 belongs to another entry");
        assert!(!column.contains(&1));
        assert!(column.contains(&11));
    }

    #[test]
    fn test_toggle_select_all() {
        let available = BTreeSet::from([2, 3, 4]);

        let selected = toggle_select_all(&BTreeSet::from([3, 40]), &available);
        assert_eq!(selected, BTreeSet::from([2, 3, 4, 40]));

        let deselected = toggle_select_all(&selected, &available);
        assert_eq!(deselected, BTreeSet::from([40]));

        let untouched = toggle_select_all(&BTreeSet::from([9]), &BTreeSet::new());
        assert_eq!(untouched, BTreeSet::from([9]));
    }
}
