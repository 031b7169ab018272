//! Authoritative storage of item geometry.

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::sanitize_size;
use crate::item::{CanvasItem, Geometry, ImageSource, ItemId};
use kurbo::{Point, Size};
use std::collections::HashMap;

/// Owns every item on the canvas, keyed by id, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: HashMap<ItemId, CanvasItem>,
    /// Insertion order (back to front).
    order: Vec<ItemId>,
}

impl ItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item and return its id. Non-positive sizes are clamped.
    pub fn add(&mut self, position: Point, size: Size) -> ItemId {
        self.insert(Geometry::new(position, sanitize_size(size)), None)
    }

    /// Add an item showing `source`.
    pub fn add_with_source(&mut self, position: Point, size: Size, source: ImageSource) -> ItemId {
        self.insert(Geometry::new(position, sanitize_size(size)), Some(source))
    }

    fn insert(&mut self, geometry: Geometry, source: Option<ImageSource>) -> ItemId {
        let item = CanvasItem::new(geometry, source);
        let id = item.id();
        self.order.push(id);
        self.items.insert(id, item);
        id
    }

    /// Get an item by id.
    pub fn get(&self, id: ItemId) -> Option<&CanvasItem> {
        self.items.get(&id)
    }

    /// Check whether an item exists.
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Replace position and size together.
    /// Returns the geometry actually stored.
    pub fn update_geometry(&mut self, id: ItemId, position: Point, size: Size) -> CanvasResult<Geometry> {
        let item = self.items.get_mut(&id).ok_or(CanvasError::NotFound(id))?;
        item.geometry = Geometry::new(position, sanitize_size(size));
        Ok(item.geometry)
    }

    /// Remove an item. History and manipulation references must be purged by the caller.
    pub fn remove(&mut self, id: ItemId) -> Option<CanvasItem> {
        self.order.retain(|&item_id| item_id != id);
        self.items.remove(&id)
    }

    /// Items in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &CanvasItem> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Every item except `id`, in insertion order.
    pub fn others(&self, id: ItemId) -> impl Iterator<Item = &CanvasItem> {
        self.all().filter(move |item| item.id() != id)
    }

    /// Item ids in insertion order.
    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }
}
