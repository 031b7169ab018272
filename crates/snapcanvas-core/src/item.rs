//! Image items placed on the canvas.

use crate::geometry::bounds_of;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for canvas items.
pub type ItemId = Uuid;

/// Display size of a freshly added image when none is requested.
pub const DEFAULT_ITEM_SIZE: Size = Size::new(100.0, 100.0);

/// Center point and size of an item at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Center point in canvas coordinates.
    pub position: Point,
    /// Width and height.
    pub size: Size,
}

impl Geometry {
    pub fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    /// Derived bounding rectangle.
    pub fn bounds(&self) -> Rect {
        bounds_of(self.position, self.size)
    }
}

/// Where the pixels shown by an item come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Human readable label (photographer, file name).
    pub label: String,
    /// Location of the image data.
    pub uri: String,
    /// Original image width in pixels.
    pub pixel_width: u32,
    /// Original image height in pixels.
    pub pixel_height: u32,
}

impl ImageSource {
    pub fn new(label: impl Into<String>, uri: impl Into<String>, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            label: label.into(),
            uri: uri.into(),
            pixel_width,
            pixel_height,
        }
    }

    /// Scale the source to fit within `max` while preserving aspect ratio.
    pub fn fitted_size(&self, max: Size) -> Size {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return max;
        }
        let aspect = self.pixel_width as f64 / self.pixel_height as f64;
        let target_aspect = max.width / max.height;

        if aspect > target_aspect {
            Size::new(max.width, max.width / aspect)
        } else {
            Size::new(max.height * aspect, max.height)
        }
    }
}

/// An item on the canvas.
///
/// Geometry is only writable through the item store, so the bounds are
/// always derived from the current position and size.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasItem {
    pub(crate) id: ItemId,
    pub(crate) geometry: Geometry,
    pub(crate) source: Option<ImageSource>,
}

impl CanvasItem {
    pub(crate) fn new(geometry: Geometry, source: Option<ImageSource>) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            source,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn position(&self) -> Point {
        self.geometry.position
    }

    pub fn size(&self) -> Size {
        self.geometry.size
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    pub fn min_x(&self) -> f64 {
        self.bounds().x0
    }

    pub fn max_x(&self) -> f64 {
        self.bounds().x1
    }

    pub fn min_y(&self) -> f64 {
        self.bounds().y0
    }

    pub fn max_y(&self) -> f64 {
        self.bounds().y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_geometry() {
        let mut item = CanvasItem::new(Geometry::new(Point::new(50.0, 60.0), Size::new(20.0, 10.0)), None);
        assert!((item.min_x() - 40.0).abs() < f64::EPSILON);
        assert!((item.max_x() - 60.0).abs() < f64::EPSILON);
        assert!((item.min_y() - 55.0).abs() < f64::EPSILON);
        assert!((item.max_y() - 65.0).abs() < f64::EPSILON);

        item.geometry = Geometry::new(Point::new(0.0, 0.0), Size::new(4.0, 4.0));
        assert!((item.min_x() + 2.0).abs() < f64::EPSILON);
        assert!((item.max_y() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ids_are_unique() {
        let g = Geometry::new(Point::ZERO, DEFAULT_ITEM_SIZE);
        let a = CanvasItem::new(g, None);
        let b = CanvasItem::new(g, None);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_fitted_size_wide() {
        let source = ImageSource::new("wide", "mem://wide", 1000, 500);
        let size = source.fitted_size(Size::new(400.0, 400.0));
        assert!((size.width - 400.0).abs() < 0.01);
        assert!((size.height - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_fitted_size_tall() {
        let source = ImageSource::new("tall", "mem://tall", 300, 600);
        let size = source.fitted_size(Size::new(100.0, 100.0));
        assert!((size.width - 50.0).abs() < 0.01);
        assert!((size.height - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_fitted_size_degenerate_source() {
        let source = ImageSource::new("empty", "mem://empty", 0, 10);
        assert_eq!(source.fitted_size(DEFAULT_ITEM_SIZE), DEFAULT_ITEM_SIZE);
    }
}
