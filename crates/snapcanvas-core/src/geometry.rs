//! Scalar and axis helpers shared by the store and the snap engine.

use crate::error::{CanvasError, CanvasResult};
use kurbo::{Line, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Smallest width or height an item may have.
pub const MIN_ITEM_EXTENT: f64 = 1.0;

/// Check whether `value` lies within `threshold` of `target` (inclusive).
pub fn is_near(value: f64, target: f64, threshold: f64) -> bool {
    (value - target).abs() <= threshold
}

/// Orientation of a full-span guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuideOrientation {
    /// Line of constant x, spanning the canvas height.
    Vertical,
    /// Line of constant y, spanning the canvas width.
    Horizontal,
}

/// Build the segment for a guide at `coordinate` spanning the whole canvas.
pub fn full_span_line(orientation: GuideOrientation, coordinate: f64, canvas: Size) -> Line {
    match orientation {
        GuideOrientation::Vertical => Line::new(
            Point::new(coordinate, 0.0),
            Point::new(coordinate, canvas.height),
        ),
        GuideOrientation::Horizontal => Line::new(
            Point::new(0.0, coordinate),
            Point::new(canvas.width, coordinate),
        ),
    }
}

/// A canvas axis. Snapping evaluates each axis on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    /// Component of `point` along this axis.
    pub fn of(self, point: Point) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }

    /// Extent of `size` along this axis.
    pub fn extent(self, size: Size) -> f64 {
        match self {
            Axis::X => size.width,
            Axis::Y => size.height,
        }
    }

    /// Lower and upper edge of `rect` along this axis.
    pub fn span(self, rect: Rect) -> (f64, f64) {
        match self {
            Axis::X => (rect.x0, rect.x1),
            Axis::Y => (rect.y0, rect.y1),
        }
    }

    /// Return `point` with this axis' component replaced.
    pub fn with_point(self, point: Point, value: f64) -> Point {
        match self {
            Axis::X => Point::new(value, point.y),
            Axis::Y => Point::new(point.x, value),
        }
    }

    /// Return `size` with this axis' extent replaced.
    pub fn with_size(self, size: Size, value: f64) -> Size {
        match self {
            Axis::X => Size::new(value, size.height),
            Axis::Y => Size::new(size.width, value),
        }
    }

    /// Orientation of the guide that marks a coordinate on this axis.
    pub fn guide_orientation(self) -> GuideOrientation {
        match self {
            Axis::X => GuideOrientation::Vertical,
            Axis::Y => GuideOrientation::Horizontal,
        }
    }
}

/// Bounding rectangle of an item centered at `center`.
pub fn bounds_of(center: Point, size: Size) -> Rect {
    Rect::from_center_size(center, size)
}

/// Validate that both extents are finite and positive.
pub fn validate_size(size: Size) -> CanvasResult<Size> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(size.width) && valid(size.height) {
        Ok(size)
    } else {
        Err(CanvasError::InvalidGeometry {
            width: size.width,
            height: size.height,
        })
    }
}

/// Clamp both extents to at least [`MIN_ITEM_EXTENT`].
pub fn clamp_size(size: Size) -> Size {
    let clamp = |v: f64| if v.is_finite() { v.max(MIN_ITEM_EXTENT) } else { MIN_ITEM_EXTENT };
    Size::new(clamp(size.width), clamp(size.height))
}

/// Validate `size`, logging and clamping it when invalid.
pub(crate) fn sanitize_size(size: Size) -> Size {
    match validate_size(size) {
        Ok(size) => clamp_size(size),
        Err(e) => {
            log::warn!("{}, clamping to minimum extent", e);
            clamp_size(size)
        }
    }
}
