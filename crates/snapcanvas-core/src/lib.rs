//! SnapCanvas Core Library
//!
//! Item store, snapping and undo/redo for a fixed-size composition canvas.
//! Rendering and gesture recognition live outside this crate; they drive a
//! [`Canvas`] and draw the items and guides it reports.

pub mod canvas;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod item;
pub mod manipulation;
pub mod snap;
pub mod store;

pub use canvas::{Canvas, ManipulationUpdate};
pub use config::{CanvasConfig, ConfigError, SnapConfig};
pub use error::{CanvasError, CanvasResult};
pub use event::CanvasEvent;
pub use geometry::{Axis, GuideOrientation, MIN_ITEM_EXTENT};
pub use history::{History, HistoryEntry};
pub use item::{CanvasItem, DEFAULT_ITEM_SIZE, Geometry, ImageSource, ItemId};
pub use manipulation::ManipulationState;
pub use snap::{AlignmentGuide, GuideSource, ManipulationKind, SnapEngine, SnapMode, SnapRequest, SnapResult};
pub use store::ItemStore;
