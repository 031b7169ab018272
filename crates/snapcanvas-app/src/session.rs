//! A canvas session driven by [`SessionAction`]s.

use crate::action::{ActionError, SessionAction};
use snapcanvas_core::{
    Canvas, CanvasConfig, CanvasError, CanvasEvent, ConfigError, DEFAULT_ITEM_SIZE, ImageSource, ItemId,
};
use std::sync::mpsc::{Receiver, channel};
use thiserror::Error;

/// Errors from running a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("line {line}: {source}")]
    Parse { line: usize, source: ActionError },
    #[error("no item with index {0}")]
    UnknownItem(usize),
    #[error("canvas error: {0}")]
    Canvas(#[from] CanvasError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Owns a canvas and the receiving end of its event channel.
pub struct Session {
    canvas: Canvas,
    /// Item ids in the order they were added. Removed items stay in place
    /// so later indices keep their meaning.
    ids: Vec<ItemId>,
    events: Receiver<CanvasEvent>,
}

impl Session {
    pub fn new(config: CanvasConfig) -> Self {
        let (tx, rx) = channel();
        Self {
            canvas: Canvas::with_events(config, tx),
            ids: Vec::new(),
            events: rx,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Id of the item added at `index`.
    pub fn item_id(&self, index: usize) -> Result<ItemId, SessionError> {
        self.ids.get(index).copied().ok_or(SessionError::UnknownItem(index))
    }

    /// Apply one action.
    pub fn apply(&mut self, action: SessionAction) -> Result<(), SessionError> {
        match action {
            SessionAction::Add { position, size } => {
                let size = size.unwrap_or(DEFAULT_ITEM_SIZE);
                let id = self.canvas.add_item(position, size);
                self.ids.push(id);
            }
            SessionAction::Image { label, pixels, position } => {
                let uri = format!("memory://{label}");
                let source = ImageSource::new(label, uri, pixels.0, pixels.1);
                let id = self.canvas.add_image(position, source, None);
                self.ids.push(id);
            }
            SessionAction::Begin(index) => {
                let id = self.item_id(index)?;
                self.canvas.begin_manipulation(id)?;
            }
            SessionAction::Move(index, position) => {
                let id = self.item_id(index)?;
                self.canvas.update_manipulation(id, Some(position), None)?;
            }
            SessionAction::Resize(index, size) => {
                let id = self.item_id(index)?;
                self.canvas.update_manipulation(id, None, Some(size))?;
            }
            SessionAction::Pan(index, translation) => {
                let id = self.item_id(index)?;
                self.canvas.pan(id, translation)?;
            }
            SessionAction::Pinch(index, scale) => {
                let id = self.item_id(index)?;
                self.canvas.pinch(id, scale)?;
            }
            SessionAction::End(index) => {
                let id = self.item_id(index)?;
                if !self.canvas.end_manipulation(id)? {
                    log::debug!("Gesture on item {} left no history entry", index);
                }
            }
            SessionAction::Cancel(index) => {
                let id = self.item_id(index)?;
                self.canvas.cancel_manipulation(id)?;
            }
            SessionAction::Remove(index) => {
                let id = self.item_id(index)?;
                self.canvas.remove_item(id)?;
            }
            SessionAction::Undo => {
                if self.canvas.undo().is_none() {
                    log::info!("Nothing to undo");
                }
            }
            SessionAction::Redo => {
                if self.canvas.redo().is_none() {
                    log::info!("Nothing to redo");
                }
            }
            SessionAction::Grid(count) => self.canvas.configure_grid(count),
            SessionAction::Threshold(threshold) => self.canvas.configure_snap_threshold(threshold)?,
            SessionAction::GridThreshold(threshold) => self.canvas.configure_grid_threshold(threshold)?,
            SessionAction::Mode(mode) => self.canvas.set_snap_mode(mode),
            SessionAction::HistoryLimit(limit) => self.canvas.configure_history_limit(limit),
            SessionAction::CanvasSize(size) => self.canvas.resize_canvas(size)?,
        }
        Ok(())
    }

    /// Parse and apply every line of a script, stopping at the first error.
    pub fn run_script(&mut self, script: &str) -> Result<(), SessionError> {
        for (i, line) in script.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let action: SessionAction = line
                .parse()
                .map_err(|source| SessionError::Parse { line: i + 1, source })?;
            log::debug!("> {}", line);
            self.apply(action)?;
            self.report_events();
        }
        Ok(())
    }

    /// Drain pending canvas events into the log. Returns how many were seen.
    pub fn report_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events.try_recv() {
            count += 1;
            match event {
                CanvasEvent::GuidesChanged(guides) if guides.is_empty() => log::info!("Guides hidden"),
                CanvasEvent::GuidesChanged(_) => {
                    for (line, color) in self.canvas.guide_lines() {
                        let rgba = color.to_rgba8();
                        log::info!(
                            "Guide ({:.1}, {:.1}) -> ({:.1}, {:.1}) rgb({}, {}, {})",
                            line.p0.x,
                            line.p0.y,
                            line.p1.x,
                            line.p1.y,
                            rgba.r,
                            rgba.g,
                            rgba.b
                        );
                    }
                }
                CanvasEvent::GeometryChanged { id, geometry } => {
                    log::info!(
                        "Item {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
                        id,
                        geometry.position.x,
                        geometry.position.y,
                        geometry.size.width,
                        geometry.size.height
                    );
                }
                CanvasEvent::HistoryChanged { can_undo, can_redo } => {
                    log::info!("History: can_undo={} can_redo={}", can_undo, can_redo);
                }
                CanvasEvent::ItemAdded(id) => log::info!("Added item {}", id),
                CanvasEvent::ItemRemoved(id) => log::info!("Removed item {}", id),
            }
        }
        count
    }
}
