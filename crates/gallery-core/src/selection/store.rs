//! Session-wide selection keyed by record identity.

use std::collections::{HashMap, HashSet};

use crate::record::{Page, Record, RecordId};

/// Change applied to the store by a single selection event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDelta {
    /// Ids that were not selected before the event
    pub added: Vec<RecordId>,
    /// Ids that were selected before the event
    pub removed: Vec<RecordId>,
}

impl SelectionDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Identity-keyed set of selected records.
///
/// `SelectionStore` is responsible for:
/// - Tracking selections independently of the page currently displayed
/// - Reconciling a page's full checked set against what is stored
/// - Answering which rows of a given page are selected
///
/// No per-row "selected" flag exists anywhere; the visible selection is always
/// recomputed from identity lookup.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selected: HashMap<RecordId, Record>,
}

impl SelectionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the checked set the view reports for the visible page.
    ///
    /// Every record in `checked` is inserted (or its snapshot refreshed).
    /// Every record of `visible` missing from `checked` is removed. Records
    /// of other pages are left alone.
    ///
    /// # Arguments
    ///
    /// * `visible` - All records of the page currently displayed
    /// * `checked` - The subset of the page the user now has checked
    ///
    /// # Returns
    ///
    /// The ids that became selected and the ids that were deselected.
    pub fn reconcile(&mut self, visible: &[Record], checked: &[Record]) -> SelectionDelta {
        let mut delta = SelectionDelta::default();

        for record in checked {
            if self.selected.insert(record.id, record.clone()).is_none() {
                delta.added.push(record.id);
            }
        }

        let checked_ids: HashSet<RecordId> = checked.iter().map(|r| r.id).collect();
        for record in visible {
            if !checked_ids.contains(&record.id) && self.selected.remove(&record.id).is_some() {
                delta.removed.push(record.id);
            }
        }

        tracing::debug!(
            "Reconciled selection: +{} -{} (total {})",
            delta.added.len(),
            delta.removed.len(),
            self.selected.len()
        );

        delta
    }

    /// Records of `page` that are selected, in page order.
    pub fn visible_selection<'a>(&self, page: &'a Page) -> Vec<&'a Record> {
        page.records
            .iter()
            .filter(|record| self.selected.contains_key(&record.id))
            .collect()
    }

    /// Total number of selected records across the whole collection.
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.selected.contains_key(&id)
    }

    /// Selects a single record. Returns `false` if it was already selected.
    pub fn select(&mut self, record: Record) -> bool {
        self.selected.insert(record.id, record).is_none()
    }

    /// Deselects a single record. Returns `false` if it was not selected.
    pub fn deselect(&mut self, id: RecordId) -> bool {
        self.selected.remove(&id).is_some()
    }

    /// Flips the selection state of a record and returns the new state.
    pub fn toggle(&mut self, record: &Record) -> bool {
        if self.deselect(record.id) {
            false
        } else {
            self.select(record.clone())
        }
    }

    /// Inserts every record that is not selected yet, keeping existing
    /// snapshots untouched.
    ///
    /// # Returns
    ///
    /// Number of records actually inserted.
    pub fn merge<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = Record>,
    {
        let mut inserted = 0;
        for record in records {
            if let std::collections::hash_map::Entry::Vacant(slot) = self.selected.entry(record.id) {
                slot.insert(record);
                inserted += 1;
            }
        }
        inserted
    }

    /// Drops every selection.
    pub fn clear(&mut self) -> usize {
        let cleared = self.selected.len();
        self.selected.clear();
        cleared
    }

    /// Snapshot of the selected identities.
    pub fn ids(&self) -> HashSet<RecordId> {
        self.selected.keys().copied().collect()
    }

    /// Selected records ordered by id.
    pub fn records(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.selected.values().collect();
        records.sort_by_key(|r| r.id);
        records
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.selected.get(&id)
    }
}
