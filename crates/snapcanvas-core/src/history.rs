//! Undo/redo of item geometry.
//!
//! Entries are whole-item snapshots, not deltas. Undo pops a snapshot,
//! pushes the item's current geometry onto the redo stack and applies the
//! snapshot; redo is symmetric. Any fresh edit clears the redo stack.

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::item::{Geometry, ItemId};
use crate::store::ItemStore;
use std::collections::HashMap;

/// A snapshot of one item's geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub item_id: ItemId,
    pub geometry: Geometry,
}

impl HistoryEntry {
    pub fn new(item_id: ItemId, geometry: Geometry) -> Self {
        Self { item_id, geometry }
    }
}

/// Undo and redo stacks plus the last committed geometry of every item.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    limit: usize,
    /// Geometry as of the last committed change, per item.
    committed: HashMap<ItemId, Geometry>,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history keeping at most `limit` undo entries.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
            committed: HashMap::new(),
        }
    }

    /// Change the undo depth, dropping the oldest entries if needed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        trim(&mut self.undo_stack, self.limit);
        trim(&mut self.redo_stack, self.limit);
    }

    /// Record the state of an item before a change is committed.
    pub fn save_state(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();
        trim(&mut self.undo_stack, self.limit);
    }

    /// Undo the last change. Returns the id of the restored item.
    pub fn undo(&mut self, store: &mut ItemStore) -> Option<ItemId> {
        let limit = self.limit;
        replay(&mut self.undo_stack, &mut self.redo_stack, &mut self.committed, store, limit)
    }

    /// Redo the last undone change. Returns the id of the restored item.
    pub fn redo(&mut self, store: &mut ItemStore) -> Option<ItemId> {
        let limit = self.limit;
        replay(&mut self.redo_stack, &mut self.undo_stack, &mut self.committed, store, limit)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Record `geometry` as the committed state of an item.
    pub fn mark_committed(&mut self, id: ItemId, geometry: Geometry) {
        self.committed.insert(id, geometry);
    }

    /// The last committed geometry of an item.
    pub fn committed(&self, id: ItemId) -> Option<Geometry> {
        self.committed.get(&id).copied()
    }

    /// Forget the committed geometry of an item.
    pub fn forget(&mut self, id: ItemId) {
        self.committed.remove(&id);
    }

    /// Drop every reference to a deleted item.
    pub fn purge(&mut self, id: ItemId) {
        self.undo_stack.retain(|entry| entry.item_id != id);
        self.redo_stack.retain(|entry| entry.item_id != id);
        self.forget(id);
    }

    /// Clear both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Pop from `from`, save the item's current geometry onto `to`, then apply
/// the popped snapshot. Entries for items that no longer exist are dropped.
fn replay(
    from: &mut Vec<HistoryEntry>,
    to: &mut Vec<HistoryEntry>,
    committed: &mut HashMap<ItemId, Geometry>,
    store: &mut ItemStore,
    limit: usize,
) -> Option<ItemId> {
    while let Some(entry) = from.pop() {
        let Some(current) = store.get(entry.item_id).map(|item| item.geometry()) else {
            log::warn!("Dropping history entry for missing item {}", entry.item_id);
            continue;
        };
        let Ok(applied) = store.update_geometry(entry.item_id, entry.geometry.position, entry.geometry.size) else {
            continue;
        };

        to.push(HistoryEntry::new(entry.item_id, current));
        trim(to, limit);
        committed.insert(entry.item_id, applied);
        return Some(entry.item_id);
    }
    None
}

fn trim(stack: &mut Vec<HistoryEntry>, limit: usize) {
    if stack.len() > limit {
        let excess = stack.len() - limit;
        stack.drain(..excess);
    }
}
