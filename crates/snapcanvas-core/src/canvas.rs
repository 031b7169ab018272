//! Canvas state and the manipulation/undo interface used by gesture and
//! rendering glue.

use crate::config::{CanvasConfig, ConfigError, SnapConfig};
use crate::error::{CanvasError, CanvasResult};
use crate::event::CanvasEvent;
use crate::geometry::sanitize_size;
use crate::history::{History, HistoryEntry};
use crate::item::{CanvasItem, DEFAULT_ITEM_SIZE, Geometry, ImageSource, ItemId};
use crate::manipulation::ManipulationState;
use crate::snap::{AlignmentGuide, ManipulationKind, SnapEngine, SnapMode, SnapRequest};
use crate::store::ItemStore;
use kurbo::{Line, Point, Size, Vec2};
use peniko::Color;
use std::collections::HashMap;
use std::sync::mpsc::Sender;

/// Geometry applied by one manipulation tick and the guides justifying it.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulationUpdate {
    pub position: Point,
    pub size: Size,
    pub guides: Vec<AlignmentGuide>,
}

/// Runtime canvas state.
///
/// All mutation happens on the thread that owns the canvas; gestures call
/// `begin_manipulation`, any number of `update_manipulation` (or `pan` /
/// `pinch`) ticks, then `end_manipulation`. Only ended gestures produce
/// undo entries.
#[derive(Debug)]
pub struct Canvas {
    store: ItemStore,
    history: History,
    snap: SnapConfig,
    size: Size,
    /// Active gestures, keyed by item.
    manipulations: HashMap<ItemId, ManipulationState>,
    /// Guides from the most recent tick.
    guides: Vec<AlignmentGuide>,
    events: Option<Sender<CanvasEvent>>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    /// Create an empty canvas.
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            store: ItemStore::new(),
            history: History::with_limit(config.snap.history_limit),
            snap: config.snap,
            size: config.canvas_size(),
            manipulations: HashMap::new(),
            guides: Vec::new(),
            events: None,
        }
    }

    /// Create an empty canvas that reports changes on `events`.
    pub fn with_events(config: CanvasConfig, events: Sender<CanvasEvent>) -> Self {
        Self {
            events: Some(events),
            ..Self::new(config)
        }
    }

    fn emit(&self, event: CanvasEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                log::trace!("Canvas event receiver dropped");
            }
        }
    }

    fn emit_history(&self) {
        self.emit(CanvasEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn set_guides(&mut self, guides: Vec<AlignmentGuide>) {
        if guides != self.guides {
            self.guides = guides;
            self.emit(CanvasEvent::GuidesChanged(self.guides.clone()));
        }
    }

    /// The item store.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Get an item by id.
    pub fn item(&self, id: ItemId) -> Option<&CanvasItem> {
        self.store.get(id)
    }

    /// Items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &CanvasItem> {
        self.store.all()
    }

    /// Canvas dimensions.
    pub fn canvas_size(&self) -> Size {
        self.size
    }

    /// Current snapping options.
    pub fn snap_config(&self) -> &SnapConfig {
        &self.snap
    }

    /// Add an item and return its id.
    pub fn add_item(&mut self, position: Point, size: Size) -> ItemId {
        let id = self.store.add(position, size);
        self.on_added(id);
        id
    }

    /// Add an item showing `source`. Without an explicit size the image is
    /// fitted into the default item size.
    pub fn add_image(&mut self, position: Point, source: ImageSource, size: Option<Size>) -> ItemId {
        let size = size.unwrap_or_else(|| source.fitted_size(DEFAULT_ITEM_SIZE));
        let id = self.store.add_with_source(position, size, source);
        self.on_added(id);
        id
    }

    fn on_added(&mut self, id: ItemId) {
        if let Some(item) = self.store.get(id) {
            self.history.mark_committed(id, item.geometry());
            log::debug!("Added item {} at {:?}", id, item.position());
        }
        self.emit(CanvasEvent::ItemAdded(id));
    }

    /// Delete an item together with its history and any active gesture.
    pub fn remove_item(&mut self, id: ItemId) -> CanvasResult<CanvasItem> {
        let item = self.store.remove(id).ok_or(CanvasError::NotFound(id))?;
        let before = (self.history.undo_len(), self.history.redo_len());
        self.history.purge(id);
        if self.manipulations.remove(&id).is_some() {
            self.set_guides(Vec::new());
        }

        log::debug!("Removed item {}", id);
        self.emit(CanvasEvent::ItemRemoved(id));
        if before != (self.history.undo_len(), self.history.redo_len()) {
            self.emit_history();
        }
        Ok(item)
    }

    /// Check whether a gesture is in progress on an item.
    pub fn is_manipulating(&self, id: ItemId) -> bool {
        self.manipulations.contains_key(&id)
    }

    /// Start a gesture on an item.
    ///
    /// The baseline is the item's last committed geometry, so a previous
    /// gesture that never ended is not mistaken for a committed state.
    pub fn begin_manipulation(&mut self, id: ItemId) -> CanvasResult<()> {
        let current = self.store.get(id).ok_or(CanvasError::NotFound(id))?.geometry();
        let baseline = self.history.committed(id).unwrap_or(current);
        if self.manipulations.contains_key(&id) {
            log::debug!("Restarting manipulation of {}", id);
        }
        self.manipulations.insert(id, ManipulationState::new(id, baseline, current));
        log::debug!("Begin manipulation of {}", id);
        Ok(())
    }

    fn ensure_manipulation(&mut self, id: ItemId) -> CanvasResult<&mut ManipulationState> {
        if !self.manipulations.contains_key(&id) {
            self.begin_manipulation(id)?;
        }
        self.manipulations.get_mut(&id).ok_or(CanvasError::NotFound(id))
    }

    /// Apply one gesture tick.
    ///
    /// A size proposal resizes around the center; otherwise the item moves.
    /// Missing values keep the item's current position or size. When both a
    /// position and a size are proposed, only the size is snapped and the
    /// item is placed at the proposed position as given. Non-finite
    /// positions are ignored.
    pub fn update_manipulation(
        &mut self,
        id: ItemId,
        proposed_position: Option<Point>,
        proposed_size: Option<Size>,
    ) -> CanvasResult<ManipulationUpdate> {
        let state = self.ensure_manipulation(id)?;
        let (current, raw) = (state.applied, state.raw);
        let proposed_position = proposed_position.filter(|p| {
            let finite = p.is_finite();
            if !finite {
                log::warn!("Ignoring non-finite position {:?} for {}", p, id);
            }
            finite
        });
        let position = proposed_position.unwrap_or(current.position);
        let (size, kind) = match proposed_size {
            Some(size) => (sanitize_size(size), ManipulationKind::Resize),
            None => (current.size, ManipulationKind::Move),
        };
        let request = SnapRequest { position, size, kind };

        let result = SnapEngine::new(&self.snap).snap(request, self.store.others(id), self.size);
        let applied = self.store.update_geometry(id, result.position, result.size)?;

        let state = self.manipulations.get_mut(&id).ok_or(CanvasError::NotFound(id))?;
        // Raw position only follows explicit proposals, so a resize keeps the
        // unsnapped center that later pans accumulate on.
        state.raw = Geometry::new(proposed_position.unwrap_or(raw.position), size);
        state.applied = applied;
        state.kind = Some(kind);

        self.emit(CanvasEvent::GeometryChanged { id, geometry: applied });
        self.set_guides(result.guides.clone());
        Ok(ManipulationUpdate {
            position: applied.position,
            size: applied.size,
            guides: result.guides,
        })
    }

    /// Move an item by a gesture translation since the previous tick.
    ///
    /// Deltas accumulate on the unsnapped geometry so a snapped item can be
    /// dragged away from its target.
    pub fn pan(&mut self, id: ItemId, translation: Vec2) -> CanvasResult<ManipulationUpdate> {
        let raw = self.ensure_manipulation(id)?.raw;
        self.update_manipulation(id, Some(raw.position + translation), None)
    }

    /// Scale an item around its current center by a gesture factor since the
    /// previous tick.
    pub fn pinch(&mut self, id: ItemId, scale: f64) -> CanvasResult<ManipulationUpdate> {
        let raw = self.ensure_manipulation(id)?.raw;
        self.update_manipulation(id, None, Some(raw.size * scale))
    }

    /// Finish a gesture. Returns `true` if an undo entry was recorded.
    pub fn end_manipulation(&mut self, id: ItemId) -> CanvasResult<bool> {
        let current = self.store.get(id).ok_or(CanvasError::NotFound(id))?.geometry();
        let Some(state) = self.manipulations.remove(&id) else {
            log::debug!("End without active manipulation of {}", id);
            return Ok(false);
        };

        let recorded = state.is_changed();
        if recorded {
            self.history.save_state(HistoryEntry::new(id, state.baseline));
            self.emit_history();
        }
        self.history.mark_committed(id, current);
        self.set_guides(Vec::new());
        log::debug!("End manipulation of {}, moved by {:?}", id, state.delta());
        Ok(recorded)
    }

    /// Abort a gesture and restore the geometry it started from.
    pub fn cancel_manipulation(&mut self, id: ItemId) -> CanvasResult<()> {
        let Some(state) = self.manipulations.remove(&id) else {
            return if self.store.contains(id) {
                Ok(())
            } else {
                Err(CanvasError::NotFound(id))
            };
        };
        let geometry = self
            .store
            .update_geometry(id, state.baseline.position, state.baseline.size)?;
        self.emit(CanvasEvent::GeometryChanged { id, geometry });
        self.set_guides(Vec::new());
        log::debug!("Cancelled manipulation of {}", id);
        Ok(())
    }

    /// Undo the last committed change. Returns the restored item.
    ///
    /// Gestures still in progress are cancelled first.
    pub fn undo(&mut self) -> Option<ItemId> {
        self.cancel_all();
        let id = self.history.undo(&mut self.store)?;
        self.after_replay(id);
        Some(id)
    }

    /// Redo the last undone change. Returns the restored item.
    pub fn redo(&mut self) -> Option<ItemId> {
        self.cancel_all();
        let id = self.history.redo(&mut self.store)?;
        self.after_replay(id);
        Some(id)
    }

    fn cancel_all(&mut self) {
        let active: Vec<ItemId> = self.manipulations.keys().copied().collect();
        for id in active {
            if let Err(e) = self.cancel_manipulation(id) {
                log::warn!("Failed to cancel manipulation of {}: {}", id, e);
            }
        }
    }

    fn after_replay(&mut self, id: ItemId) {
        if let Some(item) = self.store.get(id) {
            self.emit(CanvasEvent::GeometryChanged {
                id,
                geometry: item.geometry(),
            });
        }
        self.emit_history();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Guides produced by the most recent tick.
    pub fn guides(&self) -> &[AlignmentGuide] {
        &self.guides
    }

    /// Current guides as full-span segments with their stroke colors.
    pub fn guide_lines(&self) -> impl Iterator<Item = (Line, Color)> + '_ {
        self.guides
            .iter()
            .map(|guide| (guide.line(self.size), guide.source.color()))
    }

    /// Set the number of interior grid divisions.
    pub fn configure_grid(&mut self, line_count: u32) {
        self.snap.grid_line_count = line_count;
        log::info!("Grid line count set to {}", line_count);
    }

    /// Set the distance for every snap test.
    pub fn configure_snap_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        let snap = SnapConfig {
            threshold,
            grid_threshold: threshold,
            ..self.snap
        };
        snap.validate()?;
        self.snap = snap;
        log::info!("Snap threshold set to {}", threshold);
        Ok(())
    }

    /// Set the distance for grid snapping only.
    pub fn configure_grid_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        let snap = SnapConfig {
            grid_threshold: threshold,
            ..self.snap
        };
        snap.validate()?;
        self.snap = snap;
        log::info!("Grid snap threshold set to {}", threshold);
        Ok(())
    }

    /// Choose which snap targets are active.
    pub fn set_snap_mode(&mut self, mode: SnapMode) {
        self.snap.mode = mode;
        log::info!("Snap mode set to {:?}", mode);
    }

    /// Set the maximum number of undo entries.
    pub fn configure_history_limit(&mut self, limit: usize) {
        self.snap.history_limit = limit;
        self.history.set_limit(limit);
    }

    /// Change the canvas dimensions.
    pub fn resize_canvas(&mut self, size: Size) -> Result<(), ConfigError> {
        let config = CanvasConfig {
            width: size.width,
            height: size.height,
            snap: self.snap,
        };
        config.validate()?;
        self.size = size;
        log::info!("Canvas resized to {}x{}", size.width, size.height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GuideOrientation;
    use crate::snap::GuideSource;
    use std::sync::mpsc::channel;
    use uuid::Uuid;

    const EPS: f64 = 1e-9;

    fn config(mode: SnapMode) -> CanvasConfig {
        CanvasConfig {
            width: 1000.0,
            height: 600.0,
            snap: SnapConfig {
                grid_line_count: 4,
                mode,
                ..SnapConfig::default()
            },
        }
    }

    /// Canvas without snapping, for history tests.
    fn plain_canvas() -> Canvas {
        Canvas::new(config(SnapMode::None))
    }

    fn snapping_canvas() -> Canvas {
        Canvas::new(config(SnapMode::All))
    }

    fn drag(canvas: &mut Canvas, id: ItemId, to: Point) {
        canvas.begin_manipulation(id).unwrap();
        canvas.update_manipulation(id, Some(to), None).unwrap();
        canvas.end_manipulation(id).unwrap();
    }

    fn position(canvas: &Canvas, id: ItemId) -> Point {
        canvas.item(id).unwrap().position()
    }

    #[test]
    fn test_add_and_remove_item() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(10.0, 10.0), Size::new(20.0, 20.0));
        assert_eq!(canvas.items().count(), 1);

        let removed = canvas.remove_item(id).unwrap();
        assert_eq!(removed.id(), id);
        assert!(canvas.item(id).is_none());
        assert_eq!(canvas.remove_item(id), Err(CanvasError::NotFound(id)));
    }

    #[test]
    fn test_add_image_fits_default_size() {
        let mut canvas = plain_canvas();
        let source = ImageSource::new("Pexels 1", "https://images.example/1.jpeg", 1600, 800);
        let id = canvas.add_image(Point::new(300.0, 300.0), source, None);
        let item = canvas.item(id).unwrap();
        assert!((item.size().width - 100.0).abs() < EPS);
        assert!((item.size().height - 50.0).abs() < EPS);
        assert_eq!(item.source().unwrap().label, "Pexels 1");
    }

    #[test]
    fn test_unknown_item_is_not_found() {
        let mut canvas = plain_canvas();
        let id = Uuid::new_v4();
        assert_eq!(canvas.begin_manipulation(id), Err(CanvasError::NotFound(id)));
        assert_eq!(
            canvas.update_manipulation(id, Some(Point::ZERO), None),
            Err(CanvasError::NotFound(id))
        );
        assert_eq!(canvas.end_manipulation(id), Err(CanvasError::NotFound(id)));
        assert_eq!(canvas.cancel_manipulation(id), Err(CanvasError::NotFound(id)));
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_update_snaps_and_reports_guides() {
        let mut canvas = snapping_canvas();
        let id = canvas.add_item(Point::new(100.0, 100.0), Size::new(50.0, 50.0));

        canvas.begin_manipulation(id).unwrap();
        let update = canvas.update_manipulation(id, Some(Point::new(198.0, 100.0)), None).unwrap();
        assert_eq!(update.position, Point::new(200.0, 100.0));
        assert_eq!(
            update.guides,
            vec![AlignmentGuide::new(GuideOrientation::Vertical, 200.0, GuideSource::Grid)]
        );
        assert_eq!(canvas.guides(), update.guides.as_slice());
        assert_eq!(position(&canvas, id), Point::new(200.0, 100.0));

        let lines: Vec<_> = canvas.guide_lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0.p1, Point::new(200.0, 600.0));

        canvas.end_manipulation(id).unwrap();
        assert!(canvas.guides().is_empty());
    }

    #[test]
    fn test_snaps_against_other_items() {
        let mut canvas = snapping_canvas();
        canvas.add_item(Point::new(150.0, 450.0), Size::new(100.0, 100.0));
        let b = canvas.add_item(Point::new(20.0, 100.0), Size::new(50.0, 50.0));

        canvas.begin_manipulation(b).unwrap();
        let update = canvas.update_manipulation(b, Some(Point::new(78.0, 100.0)), None).unwrap();
        assert!((update.position.x - 75.0).abs() < EPS);
        assert_eq!(update.guides[0].source, GuideSource::Item);
        assert!((update.guides[0].coordinate - 100.0).abs() < EPS);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let targets = [Point::new(10.0, 0.0), Point::new(10.0, 30.0), Point::new(50.0, 60.0)];

        assert!(!canvas.can_undo());
        for target in targets {
            drag(&mut canvas, id, target);
            assert!(canvas.can_undo());
            assert!(!canvas.can_redo());
        }

        let expected_after_undo = [Point::new(10.0, 30.0), Point::new(10.0, 0.0), Point::new(0.0, 0.0)];
        for (i, expected) in expected_after_undo.iter().enumerate() {
            assert_eq!(canvas.undo(), Some(id));
            assert_eq!(position(&canvas, id), *expected);
            assert_eq!(canvas.can_undo(), i < 2);
            assert!(canvas.can_redo());
        }
        assert_eq!(canvas.undo(), None);

        for (i, expected) in targets.iter().enumerate() {
            assert_eq!(canvas.redo(), Some(id));
            assert_eq!(position(&canvas, id), *expected);
            assert!(canvas.can_undo());
            assert_eq!(canvas.can_redo(), i < 2);
        }
        assert_eq!(canvas.redo(), None);
    }

    #[test]
    fn test_new_manipulation_invalidates_redo() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));

        drag(&mut canvas, id, Point::new(20.0, 20.0));
        canvas.undo();
        assert!(canvas.can_redo());

        drag(&mut canvas, id, Point::new(40.0, 40.0));
        assert!(!canvas.can_redo());
        assert_eq!(canvas.redo(), None);
        assert_eq!(position(&canvas, id), Point::new(40.0, 40.0));
    }

    #[test]
    fn test_uncommitted_gesture_records_nothing() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));

        canvas.begin_manipulation(id).unwrap();
        for i in 1..=5 {
            canvas.update_manipulation(id, Some(Point::new(i as f64 * 10.0, 0.0)), None).unwrap();
        }
        assert!(!canvas.can_undo());
        assert!(canvas.is_manipulating(id));
        assert_eq!(position(&canvas, id), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_unchanged_gesture_records_nothing() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(5.0, 5.0), Size::new(10.0, 10.0));

        canvas.begin_manipulation(id).unwrap();
        canvas.update_manipulation(id, Some(Point::new(9.0, 9.0)), None).unwrap();
        canvas.update_manipulation(id, Some(Point::new(5.0, 5.0)), None).unwrap();
        assert_eq!(canvas.end_manipulation(id), Ok(false));
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_abandoned_gesture_uses_committed_baseline() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));

        // Never ended: the item stays where it was dragged, nothing is recorded.
        canvas.begin_manipulation(id).unwrap();
        canvas.update_manipulation(id, Some(Point::new(30.0, 0.0)), None).unwrap();

        canvas.begin_manipulation(id).unwrap();
        canvas.update_manipulation(id, Some(Point::new(60.0, 0.0)), None).unwrap();
        assert_eq!(canvas.end_manipulation(id), Ok(true));

        canvas.undo();
        assert_eq!(position(&canvas, id), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_interleaved_items_keep_their_own_baseline() {
        let mut canvas = plain_canvas();
        let a = canvas.add_item(Point::new(100.0, 100.0), Size::new(10.0, 10.0));
        let b = canvas.add_item(Point::new(500.0, 400.0), Size::new(10.0, 10.0));

        canvas.begin_manipulation(a).unwrap();
        canvas.pan(a, Vec2::new(10.0, 0.0)).unwrap();
        canvas.begin_manipulation(b).unwrap();
        canvas.pan(b, Vec2::new(0.0, 10.0)).unwrap();
        canvas.pan(a, Vec2::new(10.0, 0.0)).unwrap();
        canvas.end_manipulation(a).unwrap();
        canvas.end_manipulation(b).unwrap();

        assert_eq!(position(&canvas, a), Point::new(120.0, 100.0));
        assert_eq!(position(&canvas, b), Point::new(500.0, 410.0));

        assert_eq!(canvas.undo(), Some(b));
        assert_eq!(position(&canvas, b), Point::new(500.0, 400.0));
        assert_eq!(canvas.undo(), Some(a));
        assert_eq!(position(&canvas, a), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_pan_accumulates_unsnapped_deltas() {
        let mut canvas = snapping_canvas();
        let id = canvas.add_item(Point::new(150.0, 100.0), Size::new(50.0, 50.0));

        canvas.begin_manipulation(id).unwrap();
        let first = canvas.pan(id, Vec2::new(46.0, 0.0)).unwrap();
        assert!((first.position.x - 200.0).abs() < EPS);
        let second = canvas.pan(id, Vec2::new(2.0, 0.0)).unwrap();
        assert!((second.position.x - 200.0).abs() < EPS);
        // Raw position is now 208, out of reach of the grid line.
        let third = canvas.pan(id, Vec2::new(10.0, 0.0)).unwrap();
        assert!((third.position.x - 208.0).abs() < EPS);
        assert!(third.guides.is_empty());
    }

    #[test]
    fn test_pinch_keeps_snapped_center() {
        let mut canvas = snapping_canvas();
        let id = canvas.add_item(Point::new(150.0, 100.0), Size::new(50.0, 50.0));

        canvas.begin_manipulation(id).unwrap();
        let panned = canvas.pan(id, Vec2::new(46.0, 0.0)).unwrap();
        assert!((panned.position.x - 200.0).abs() < EPS);

        let pinched = canvas.pinch(id, 1.0).unwrap();
        assert_eq!(pinched.position, Point::new(200.0, 100.0));
        assert_eq!(pinched.size, Size::new(50.0, 50.0));

        let pinched = canvas.pinch(id, 1.2).unwrap();
        assert_eq!(pinched.position, Point::new(200.0, 100.0));
        assert!((pinched.size.width - 60.0).abs() < EPS);

        // Pans still accumulate on the unsnapped center: 196 + 12 = 208.
        let panned = canvas.pan(id, Vec2::new(12.0, 0.0)).unwrap();
        assert!((panned.position.x - 208.0).abs() < EPS);
        assert!((panned.size.width - 60.0).abs() < EPS);
    }

    #[test]
    fn test_non_finite_position_is_ignored() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(40.0, 40.0), Size::new(10.0, 10.0));

        let update = canvas
            .update_manipulation(id, Some(Point::new(f64::NAN, 10.0)), None)
            .unwrap();
        assert_eq!(update.position, Point::new(40.0, 40.0));
        let update = canvas.pan(id, Vec2::new(f64::INFINITY, 0.0)).unwrap();
        assert_eq!(update.position, Point::new(40.0, 40.0));

        canvas.pan(id, Vec2::new(5.0, 0.0)).unwrap();
        assert_eq!(position(&canvas, id), Point::new(45.0, 40.0));
    }

    #[test]
    fn test_position_with_size_is_not_snapped() {
        let mut canvas = snapping_canvas();
        let id = canvas.add_item(Point::new(100.0, 100.0), Size::new(50.0, 50.0));

        // 198 would snap to the grid line at 200 when moving.
        let update = canvas
            .update_manipulation(id, Some(Point::new(198.0, 100.0)), Some(Size::new(60.0, 60.0)))
            .unwrap();
        assert_eq!(update.position, Point::new(198.0, 100.0));
        assert_eq!(update.size, Size::new(60.0, 60.0));
    }

    #[test]
    fn test_pinch_resizes_around_center() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(300.0, 300.0), Size::new(40.0, 20.0));

        canvas.begin_manipulation(id).unwrap();
        canvas.pinch(id, 2.0).unwrap();
        let update = canvas.pinch(id, 1.5).unwrap();
        assert_eq!(update.position, Point::new(300.0, 300.0));
        assert!((update.size.width - 120.0).abs() < EPS);
        assert!((update.size.height - 60.0).abs() < EPS);
        assert_eq!(canvas.end_manipulation(id), Ok(true));

        canvas.undo();
        assert_eq!(canvas.item(id).unwrap().size(), Size::new(40.0, 20.0));
    }

    #[test]
    fn test_pinch_snaps_edges() {
        let mut canvas = snapping_canvas();
        let id = canvas.add_item(Point::new(300.0, 100.0), Size::new(98.0, 40.0));

        // 196 wide: edges at 202 and 398 snap to the lines at 200 and 400.
        let update = canvas.pinch(id, 2.0).unwrap();
        assert!((update.size.width - 200.0).abs() < EPS);
        assert_eq!(update.guides.len(), 2);
    }

    #[test]
    fn test_invalid_size_is_clamped() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(300.0, 300.0), Size::new(40.0, 20.0));

        let update = canvas.update_manipulation(id, None, Some(Size::new(-10.0, 0.0))).unwrap();
        assert_eq!(update.size, Size::new(1.0, 1.0));
        let update = canvas.pinch(id, 0.0).unwrap();
        assert_eq!(update.size, Size::new(1.0, 1.0));
    }

    #[test]
    fn test_update_without_begin_starts_gesture() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));

        canvas.update_manipulation(id, Some(Point::new(5.0, 5.0)), None).unwrap();
        assert!(canvas.is_manipulating(id));
        assert_eq!(canvas.end_manipulation(id), Ok(true));
        canvas.undo();
        assert_eq!(position(&canvas, id), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_end_without_begin_is_noop() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert_eq!(canvas.end_manipulation(id), Ok(false));
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_cancel_restores_baseline() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));

        canvas.begin_manipulation(id).unwrap();
        canvas.update_manipulation(id, Some(Point::new(80.0, 80.0)), None).unwrap();
        canvas.cancel_manipulation(id).unwrap();

        assert_eq!(position(&canvas, id), Point::new(0.0, 0.0));
        assert!(!canvas.is_manipulating(id));
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_undo_cancels_active_gesture() {
        let mut canvas = plain_canvas();
        let id = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        drag(&mut canvas, id, Point::new(10.0, 10.0));

        canvas.begin_manipulation(id).unwrap();
        canvas.update_manipulation(id, Some(Point::new(90.0, 90.0)), None).unwrap();
        assert_eq!(canvas.undo(), Some(id));

        assert!(!canvas.is_manipulating(id));
        assert_eq!(position(&canvas, id), Point::new(0.0, 0.0));
        assert_eq!(canvas.end_manipulation(id), Ok(false));
        assert!(canvas.can_redo());
    }

    #[test]
    fn test_remove_purges_history() {
        let mut canvas = plain_canvas();
        let a = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = canvas.add_item(Point::new(100.0, 0.0), Size::new(10.0, 10.0));
        drag(&mut canvas, b, Point::new(110.0, 0.0));
        drag(&mut canvas, a, Point::new(10.0, 0.0));

        canvas.begin_manipulation(a).unwrap();
        canvas.remove_item(a).unwrap();
        assert!(!canvas.is_manipulating(a));

        assert_eq!(canvas.undo(), Some(b));
        assert_eq!(position(&canvas, b), Point::new(100.0, 0.0));
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_configuration() {
        let mut canvas = snapping_canvas();
        canvas.configure_grid(1);
        assert_eq!(canvas.snap_config().grid_line_count, 1);

        canvas.configure_snap_threshold(2.0).unwrap();
        assert!((canvas.snap_config().threshold - 2.0).abs() < EPS);
        assert!((canvas.snap_config().grid_threshold - 2.0).abs() < EPS);

        canvas.configure_grid_threshold(8.0).unwrap();
        assert!((canvas.snap_config().threshold - 2.0).abs() < EPS);
        assert!((canvas.snap_config().grid_threshold - 8.0).abs() < EPS);

        assert!(matches!(canvas.configure_snap_threshold(-1.0), Err(ConfigError::Invalid(_))));
        assert!(matches!(canvas.resize_canvas(Size::new(0.0, 10.0)), Err(ConfigError::Invalid(_))));
        canvas.resize_canvas(Size::new(400.0, 400.0)).unwrap();
        assert_eq!(canvas.canvas_size(), Size::new(400.0, 400.0));

        canvas.set_snap_mode(SnapMode::Items);
        assert_eq!(canvas.snap_config().mode, SnapMode::Items);
    }

    #[test]
    fn test_grid_configuration_changes_snapping() {
        let mut canvas = snapping_canvas();
        let id = canvas.add_item(Point::new(100.0, 100.0), Size::new(50.0, 50.0));

        // One interior line on a 1000 wide canvas: spacing 500, which is also the center.
        canvas.configure_grid(1);
        let update = canvas.update_manipulation(id, Some(Point::new(497.0, 100.0)), None).unwrap();
        assert!((update.position.x - 500.0).abs() < EPS);
        assert_eq!(
            update.guides,
            vec![
                AlignmentGuide::new(GuideOrientation::Vertical, 500.0, GuideSource::Grid),
                AlignmentGuide::new(GuideOrientation::Vertical, 500.0, GuideSource::Center),
            ]
        );
    }

    #[test]
    fn test_history_limit() {
        let mut canvas = plain_canvas();
        canvas.configure_history_limit(2);
        let id = canvas.add_item(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        for i in 1..=4 {
            drag(&mut canvas, id, Point::new(i as f64, 0.0));
        }
        assert!(canvas.undo().is_some());
        assert!(canvas.undo().is_some());
        assert!(canvas.undo().is_none());
        assert_eq!(position(&canvas, id), Point::new(2.0, 0.0));
    }

    #[test]
    fn test_events() {
        let (tx, rx) = channel();
        let mut canvas = Canvas::with_events(config(SnapMode::All), tx);
        let id = canvas.add_item(Point::new(100.0, 100.0), Size::new(50.0, 50.0));

        canvas.begin_manipulation(id).unwrap();
        canvas.update_manipulation(id, Some(Point::new(198.0, 100.0)), None).unwrap();
        canvas.end_manipulation(id).unwrap();
        canvas.undo();

        let snapped = Geometry::new(Point::new(200.0, 100.0), Size::new(50.0, 50.0));
        let original = Geometry::new(Point::new(100.0, 100.0), Size::new(50.0, 50.0));
        let guide = AlignmentGuide::new(GuideOrientation::Vertical, 200.0, GuideSource::Grid);
        let events: Vec<CanvasEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                CanvasEvent::ItemAdded(id),
                CanvasEvent::GeometryChanged { id, geometry: snapped },
                CanvasEvent::GuidesChanged(vec![guide]),
                CanvasEvent::HistoryChanged { can_undo: true, can_redo: false },
                CanvasEvent::GuidesChanged(Vec::new()),
                CanvasEvent::GeometryChanged { id, geometry: original },
                CanvasEvent::HistoryChanged { can_undo: false, can_redo: true },
            ]
        );
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (tx, rx) = channel();
        drop(rx);
        let mut canvas = Canvas::with_events(config(SnapMode::None), tx);
        let id = canvas.add_item(Point::ZERO, Size::new(10.0, 10.0));
        drag(&mut canvas, id, Point::new(5.0, 5.0));
        assert!(canvas.can_undo());
    }
}
