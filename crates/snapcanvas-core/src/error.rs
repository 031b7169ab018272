//! Error types for canvas operations.

use crate::item::ItemId;
use thiserror::Error;

/// Errors reported by the item store and the canvas facade.
///
/// None of these are fatal: callers treat `NotFound` as a no-op and
/// `InvalidGeometry` is recovered by clamping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),
    #[error("Invalid geometry: {width}x{height}")]
    InvalidGeometry { width: f64, height: f64 },
}

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;
