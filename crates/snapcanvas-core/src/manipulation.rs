//! State of an in-progress drag or resize gesture.

use crate::item::{Geometry, ItemId};
use crate::snap::ManipulationKind;
use kurbo::Vec2;

/// State of an active manipulation of a single item.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    /// The item being manipulated.
    pub item_id: ItemId,
    /// Committed geometry the gesture started from. Restored on cancel and
    /// recorded in the history when the gesture ends with a change.
    pub baseline: Geometry,
    /// Unsnapped geometry accumulated from raw gesture deltas.
    pub raw: Geometry,
    /// Geometry written to the store by the last tick.
    pub applied: Geometry,
    /// Kind of the last tick, if any.
    pub kind: Option<ManipulationKind>,
}

impl ManipulationState {
    /// Create a new manipulation state.
    pub fn new(item_id: ItemId, baseline: Geometry, current: Geometry) -> Self {
        Self {
            item_id,
            baseline,
            raw: current,
            applied: current,
            kind: None,
        }
    }

    /// Offset of the applied center from the baseline.
    pub fn delta(&self) -> Vec2 {
        self.applied.position - self.baseline.position
    }

    /// Whether the applied geometry differs from the baseline.
    pub fn is_changed(&self) -> bool {
        self.applied != self.baseline
    }
}
