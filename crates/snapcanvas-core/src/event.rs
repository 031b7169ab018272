//! Notifications sent from the canvas to its rendering collaborator.

use crate::item::{Geometry, ItemId};
use crate::snap::AlignmentGuide;

/// Change notifications, delivered over the channel handed to
/// [`Canvas::with_events`](crate::Canvas::with_events).
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// A new item was added.
    ItemAdded(ItemId),
    /// An item was deleted.
    ItemRemoved(ItemId),
    /// An item's geometry changed (gesture tick, cancel, undo or redo).
    GeometryChanged { id: ItemId, geometry: Geometry },
    /// The set of guides to draw changed. Empty means hide all guides.
    GuidesChanged(Vec<AlignmentGuide>),
    /// Undo/redo availability after a history change.
    HistoryChanged { can_undo: bool, can_redo: bool },
}
