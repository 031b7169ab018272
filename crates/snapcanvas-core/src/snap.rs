//! Snap functionality for aligning items to the grid, the canvas center
//! and the edges of other items.
//!
//! Each axis is evaluated on its own. Every test compares the *proposed*
//! geometry against one target; the tests run in a fixed order (grid,
//! canvas center, then other items in store order) and the last satisfied
//! test decides the final coordinate. Every satisfied test still yields a
//! guide, so the caller can show all near matches and not only the winner.

use crate::config::SnapConfig;
use crate::geometry::{Axis, GuideOrientation, clamp_size, full_span_line, is_near};
use crate::item::CanvasItem;
use kurbo::{Line, Point, Rect, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Snap mode for aligning items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapMode {
    /// No snapping.
    None,
    /// Snap to grid lines and the canvas center.
    Grid,
    /// Snap to other item edges.
    Items,
    /// Snap to everything.
    #[default]
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Items,
            SnapMode::Items => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    /// Check if grid and canvas-center snapping is enabled.
    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    /// Check if item edge snapping is enabled.
    pub fn snaps_to_items(self) -> bool {
        matches!(self, SnapMode::Items | SnapMode::All)
    }

    /// Check if any snapping is enabled.
    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// What a guide aligned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuideSource {
    /// A grid line.
    Grid,
    /// The canvas center axis.
    Center,
    /// An edge of another item.
    Item,
}

impl GuideSource {
    /// Stroke color used when drawing guides of this kind.
    pub fn color(self) -> Color {
        match self {
            GuideSource::Grid => Color::from_rgba8(0, 200, 0, 255),
            GuideSource::Center => Color::from_rgba8(128, 0, 128, 255),
            GuideSource::Item => Color::from_rgba8(255, 0, 0, 255),
        }
    }
}

/// A transient full-span line marking an active alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGuide {
    pub orientation: GuideOrientation,
    /// x for vertical guides, y for horizontal guides.
    pub coordinate: f64,
    pub source: GuideSource,
}

impl AlignmentGuide {
    pub fn new(orientation: GuideOrientation, coordinate: f64, source: GuideSource) -> Self {
        Self {
            orientation,
            coordinate,
            source,
        }
    }

    /// Segment spanning the whole canvas.
    pub fn line(&self, canvas: Size) -> Line {
        full_span_line(self.orientation, self.coordinate, canvas)
    }
}

/// How the active item is being changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManipulationKind {
    /// The center moves, the size is fixed.
    Move,
    /// The center is fixed, the size changes symmetrically around it.
    Resize,
}

/// Proposed geometry for the item being manipulated.
#[derive(Debug, Clone, Copy)]
pub struct SnapRequest {
    pub position: Point,
    pub size: Size,
    pub kind: ManipulationKind,
}

impl SnapRequest {
    pub fn moving(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            kind: ManipulationKind::Move,
        }
    }

    pub fn resizing(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            kind: ManipulationKind::Resize,
        }
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// The snapped center.
    pub position: Point,
    /// The snapped size.
    pub size: Size,
    /// Guides for every satisfied test, x axis first.
    pub guides: Vec<AlignmentGuide>,
    /// Whether the x axis was adjusted.
    pub snapped_x: bool,
    /// Whether the y axis was adjusted.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            guides: Vec::new(),
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Feature of the proposed rectangle compared against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Center,
    Min,
    Max,
}

/// Proposed geometry projected onto one axis.
#[derive(Debug, Clone, Copy)]
struct AxisSpan {
    center: f64,
    half: f64,
    kind: ManipulationKind,
}

impl AxisSpan {
    fn value(&self, probe: Probe) -> f64 {
        match probe {
            Probe::Center => self.center,
            Probe::Min => self.center - self.half,
            Probe::Max => self.center + self.half,
        }
    }

    /// Center (move) or extent (resize) that puts `probe` exactly on `target`.
    fn align(&self, probe: Probe, target: f64) -> Option<f64> {
        match (self.kind, probe) {
            (ManipulationKind::Move, _) => Some(self.center + (target - self.value(probe))),
            (ManipulationKind::Resize, Probe::Center) => None,
            (ManipulationKind::Resize, Probe::Min) => Some(2.0 * (self.center - target)).filter(|e| *e > 0.0),
            (ManipulationKind::Resize, Probe::Max) => Some(2.0 * (target - self.center)).filter(|e| *e > 0.0),
        }
    }
}

/// Edge pairs tested against every other item, in evaluation order.
const ITEM_RELATIONS: [(Probe, bool); 4] = [
    (Probe::Min, false),
    (Probe::Max, true),
    (Probe::Max, false),
    (Probe::Min, true),
];

/// Probes tested against the grid and the canvas center, in evaluation order.
const FRAME_PROBES: [Probe; 3] = [Probe::Center, Probe::Min, Probe::Max];

/// Computes snapped geometry and alignment guides.
#[derive(Debug, Clone, Copy)]
pub struct SnapEngine {
    config: SnapConfig,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new(&SnapConfig::default())
    }
}

impl SnapEngine {
    pub fn new(config: &SnapConfig) -> Self {
        Self { config: *config }
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Spacing between grid lines on a canvas of the given width.
    pub fn grid_spacing(&self, canvas: Size) -> f64 {
        self.config.grid_spacing(canvas.width)
    }

    /// Snap `request` against the grid, the canvas center and `others`.
    ///
    /// `others` must not contain the item being manipulated.
    pub fn snap<'a>(
        &self,
        request: SnapRequest,
        others: impl IntoIterator<Item = &'a CanvasItem>,
        canvas: Size,
    ) -> SnapResult {
        let mut result = SnapResult::none(request.position, request.size);
        if !self.config.mode.is_enabled() {
            return result;
        }

        let other_bounds: Vec<Rect> = if self.config.mode.snaps_to_items() {
            others.into_iter().map(CanvasItem::bounds).collect()
        } else {
            Vec::new()
        };

        for axis in Axis::BOTH {
            let span = AxisSpan {
                center: axis.of(request.position),
                half: axis.extent(request.size) / 2.0,
                kind: request.kind,
            };
            let resolved = self.snap_axis(axis, span, &other_bounds, canvas, &mut result.guides);

            if let Some(value) = resolved {
                match request.kind {
                    ManipulationKind::Move => result.position = axis.with_point(result.position, value),
                    ManipulationKind::Resize => result.size = axis.with_size(result.size, value),
                }
                match axis {
                    Axis::X => result.snapped_x = true,
                    Axis::Y => result.snapped_y = true,
                }
            }
        }

        if request.kind == ManipulationKind::Resize {
            result.size = clamp_size(result.size);
        }
        if result.is_snapped() {
            log::trace!(
                "Snapped {:?} to {:?} / {:?} with {} guides",
                request.kind,
                result.position,
                result.size,
                result.guides.len()
            );
        }
        result
    }

    /// Run every test on one axis. Returns the adjustment of the last
    /// satisfied test, if any.
    fn snap_axis(
        &self,
        axis: Axis,
        span: AxisSpan,
        others: &[Rect],
        canvas: Size,
        guides: &mut Vec<AlignmentGuide>,
    ) -> Option<f64> {
        let orientation = axis.guide_orientation();
        let mut resolved = None;
        let mut hit = |probe: Probe, target: f64, source: GuideSource, guides: &mut Vec<AlignmentGuide>| {
            if let Some(value) = span.align(probe, target) {
                resolved = Some(value);
                push_guide(guides, AlignmentGuide::new(orientation, target, source));
            }
        };

        if self.config.mode.snaps_to_grid() {
            let spacing = self.grid_spacing(canvas);
            let limit = axis.extent(canvas);
            if spacing.is_finite() && spacing > 0.0 {
                for probe in FRAME_PROBES {
                    let value = span.value(probe);
                    let line = (value / spacing).round() * spacing;
                    if (0.0..=limit).contains(&line) && is_near(value, line, self.config.grid_threshold) {
                        hit(probe, line, GuideSource::Grid, guides);
                    }
                }
            }

            let center = limit / 2.0;
            for probe in FRAME_PROBES {
                if is_near(span.value(probe), center, self.config.threshold) {
                    hit(probe, center, GuideSource::Center, guides);
                }
            }
        }

        for other in others {
            let (other_min, other_max) = axis.span(*other);
            for (probe, against_max) in ITEM_RELATIONS {
                let target = if against_max { other_max } else { other_min };
                if is_near(span.value(probe), target, self.config.threshold) {
                    hit(probe, target, GuideSource::Item, guides);
                }
            }
        }

        resolved
    }
}

fn push_guide(guides: &mut Vec<AlignmentGuide>, guide: AlignmentGuide) {
    if !guides.contains(&guide) {
        guides.push(guide);
    }
}
