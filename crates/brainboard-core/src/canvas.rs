//! The editing engine.
//!
//! [`Canvas`] owns the scene and its history and is the only way to mutate
//! them. Pointer events drive gestures (draw, move, resize, erase); every
//! completed gesture is one history commit, which also queues a broadcast and
//! bumps the revision watched by autosave.

use crate::codec::{BoardDocument, CodecError, DecodedDocument, MinimalDocument};
use crate::collaboration::{CollabMessage, CollaborationManager, RemoteChange};
use crate::config::{BoardSettings, EditorConfig};
use crate::error::{EditError, Notice};
use crate::eraser;
use crate::geometry::point_in_rect;
use crate::history::History;
use crate::scene::{Layer, LayerId, LayerMove, Scene};
use crate::selection::{ManipulationState, hit_test_handles};
use crate::shapes::{
    ApproxTextMeasure, DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, Element, ElementId, ElementStyle,
    Image, Note, Sticker, Text, TextMeasure, UserId,
};
use crate::snap::snap_to_grid;
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::HashMap;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Hands out element ids that increase in creation order.
///
/// Ids are millisecond timestamps, bumped when two elements are created in
/// the same millisecond.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> ElementId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        self.last = now.max(self.last.saturating_add(1));
        ElementId::new(self.last.to_string())
    }
}

/// Runtime editing state for one board.
pub struct Canvas {
    scene: Scene,
    history: History,
    tools: ToolManager,
    manipulation: Option<ManipulationState>,
    erasing: bool,
    selection: Option<ElementId>,
    settings: BoardSettings,
    config: EditorConfig,
    ids: IdGenerator,
    collab: CollaborationManager,
    notices: Vec<Notice>,
    measure: Box<dyn TextMeasure>,
    viewport: Size,
    /// Where the last pointer-down landed, for placing stickers.
    placement: Option<Point>,
    revision: u64,
    last_change: Option<Instant>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Canvas {
    /// Create an empty board.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::new(),
            history: History::new(Vec::new(), config.history_limit),
            tools: ToolManager::new(),
            manipulation: None,
            erasing: false,
            selection: None,
            settings: BoardSettings::from_config(&config),
            ids: IdGenerator::new(),
            collab: CollaborationManager::new(config.user_id, config.collaboration),
            notices: Vec::new(),
            measure: Box::new(ApproxTextMeasure),
            viewport: Size::new(800.0, 600.0),
            placement: None,
            revision: 0,
            last_change: None,
            config,
        }
    }

    /// Replace the text measurer used for hit-testing text.
    pub fn set_text_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width, height);
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn selection(&self) -> Option<&ElementId> {
        self.selection.as_ref()
    }

    /// The selected element, if it is still on the active layer.
    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.selection.as_ref()?;
        self.scene.active_layer().get(id)
    }

    /// The element currently being drawn.
    pub fn preview(&self) -> Option<&Element> {
        self.tools.preview()
    }

    pub fn manipulation(&self) -> Option<&ManipulationState> {
        self.manipulation.as_ref()
    }

    /// Check if any gesture is in progress.
    pub fn is_busy(&self) -> bool {
        self.tools.is_active() || self.manipulation.is_some() || self.erasing
    }

    /// Counter bumped by every change worth persisting.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// When the revision last changed.
    pub fn last_change(&self) -> Option<Instant> {
        self.last_change
    }

    /// Remote cursors by participant.
    pub fn peers(&self) -> &HashMap<UserId, Point> {
        self.collab.peers()
    }

    pub fn collaboration(&self) -> &CollaborationManager {
        &self.collab
    }

    pub fn collaboration_mut(&mut self) -> &mut CollaborationManager {
        &mut self.collab
    }

    /// Drain queued outgoing collaboration messages.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        self.collab.take_outgoing()
    }

    /// Drain queued user-facing notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    // --- Pointer gestures ---

    /// Start a gesture at `point`.
    ///
    /// Rejected with a notice when the active layer is locked.
    pub fn pointer_down(&mut self, point: Point) -> Result<(), EditError> {
        let point = self.snap(point);
        self.ensure_unlocked()?;
        self.end_gesture();
        self.placement = Some(point);

        let tool = self.tools.current_tool;
        match tool {
            ToolKind::Select => self.begin_manipulation(point),
            ToolKind::Eraser => {
                self.erasing = true;
                self.erase_active(point);
            }
            _ if tool.draws_by_gesture() => {
                if self.note_at(point) {
                    log::debug!("Not starting {:?} inside a note", tool);
                    return Ok(());
                }
                let id = self.ids.next_id();
                let style = ElementStyle::new(self.settings.current_color.clone(), self.settings.line_width);
                if self.tools.begin(point, id, style, self.config.user_id) {
                    log::debug!("Started drawing with {:?} at ({}, {})", tool, point.x, point.y);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Advance the gesture. Returns whether a repaint is needed.
    ///
    /// A move with no gesture in progress does nothing.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let point = self.snap(point);

        if let Some(manip) = &mut self.manipulation {
            manip.current_point = point;
            let updated = manip.apply(self.config.min_box_size);
            let id = manip.element_id.clone();
            match self.scene.active_layer_mut().get_mut(&id) {
                Some(element) => *element = updated,
                None => {
                    log::debug!("Manipulated element {} vanished", id);
                    self.manipulation = None;
                }
            }
            return true;
        }

        if self.erasing {
            return self.erase_active(point) > 0;
        }

        if self.tools.is_active() {
            if self.tools.current_tool.stroke_capture().is_some() && self.note_at(point) {
                self.finish_drawing();
                return true;
            }
            return self.tools.update(point);
        }
        false
    }

    /// Finish the gesture. Returns whether anything was committed.
    pub fn pointer_up(&mut self, point: Point) -> bool {
        let point = self.snap(point);
        if let Some(manip) = &mut self.manipulation {
            manip.current_point = point;
        }
        self.end_gesture()
    }

    /// The pointer left the surface: finish the gesture where it stands.
    pub fn pointer_leave(&mut self) -> bool {
        self.end_gesture()
    }

    fn begin_manipulation(&mut self, point: Point) {
        let tolerance = self.config.handle_tolerance;
        let measure = self.measure.as_ref();
        let hit = self.scene.active_layer().elements.iter().rev().find_map(|element| {
            if let Some(handle) = hit_test_handles(element, point, tolerance) {
                Some((Some(handle), element))
            } else if element.hit_test(point, measure) {
                Some((None, element))
            } else {
                None
            }
        });

        match hit {
            Some((handle, element)) => {
                log::debug!(
                    "{} {} {}",
                    if handle.is_some() { "Resizing" } else { "Dragging" },
                    element.kind(),
                    element.id()
                );
                self.selection = Some(element.id().clone());
                self.manipulation = Some(ManipulationState::new(handle, point, element.clone()));
            }
            None => self.selection = None,
        }
    }

    fn end_gesture(&mut self) -> bool {
        self.erasing = false;

        if let Some(manip) = self.manipulation.take() {
            let changed = self
                .scene
                .active_layer()
                .get(&manip.element_id)
                .is_some_and(|current| *current != manip.original);
            if changed {
                log::debug!("Committed manipulation of {}", manip.element_id);
                self.commit_active();
                self.broadcast_active_layer();
            }
            return changed;
        }

        if self.tools.is_active() {
            return self.finish_drawing();
        }
        false
    }

    fn finish_drawing(&mut self) -> bool {
        let Some(element) = self.tools.end() else {
            return false;
        };
        log::debug!("Committed {} {}", element.kind(), element.id());
        self.insert(element);
        true
    }

    /// Append to the active layer as one commit and broadcast it.
    fn insert(&mut self, element: Element) -> ElementId {
        let id = element.id().clone();
        self.collab.broadcast_draw(&element, self.scene.active_layer_id());
        self.scene.active_layer_mut().elements.push(element);
        self.commit_active();
        id
    }

    // --- Direct insertion ---

    /// Add a line of text at the viewport center. Blank text adds nothing.
    pub fn add_text(&mut self, text: &str) -> Result<Option<ElementId>, EditError> {
        self.ensure_unlocked()?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let mut element = Element::Text(Text::new(self.ids.next_id(), self.viewport_center(), text));
        self.stamp(&mut element);
        Ok(Some(self.insert(element)))
    }

    /// Add a sticker where the pointer last went down, or at the viewport center.
    pub fn add_sticker(&mut self, glyph: &str) -> Result<ElementId, EditError> {
        self.ensure_unlocked()?;
        let position = self.placement.take().unwrap_or_else(|| self.viewport_center());
        let mut element = Element::Sticker(Sticker::new(self.ids.next_id(), position, glyph));
        self.stamp(&mut element);
        let id = self.insert(element);
        self.tools.set_tool(ToolKind::Select);
        Ok(id)
    }

    /// Add an image centered in the viewport.
    pub fn add_image(&mut self, url: &str) -> Result<ElementId, EditError> {
        self.ensure_unlocked()?;
        let mut image = Image::new(self.ids.next_id(), Point::ZERO, url);
        image.position = self.viewport_center() - Vec2::new(image.width / 2.0, image.height / 2.0);
        let mut element = Element::Image(image);
        self.stamp(&mut element);
        Ok(self.insert(element))
    }

    /// Add a note centered in the viewport. Blank text adds nothing.
    pub fn add_note(&mut self, text: &str) -> Result<Option<ElementId>, EditError> {
        self.ensure_unlocked()?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let origin =
            self.viewport_center() - Vec2::new(DEFAULT_NOTE_WIDTH / 2.0, DEFAULT_NOTE_HEIGHT / 2.0);
        let mut note = Note::new(self.ids.next_id(), origin, text);
        note.owner = self.config.user_id;
        note.style.stroke_width = self.settings.line_width;
        Ok(Some(self.insert(Element::Note(note))))
    }

    fn stamp(&self, element: &mut Element) {
        *element.style_mut() = ElementStyle::new(self.settings.current_color.clone(), self.settings.line_width);
        element.set_owner(self.config.user_id);
    }

    // --- Text editing ---

    /// The topmost text or note on the active layer under `point`.
    pub fn editable_at(&self, point: Point) -> Option<ElementId> {
        let point = self.snap(point);
        self.scene
            .active_layer()
            .elements_at_point(point, self.measure.as_ref())
            .find(|e| e.is_editable())
            .map(|e| e.id().clone())
    }

    /// Replace the content of a text or note. Blank text removes a text element.
    pub fn update_text(&mut self, id: &ElementId, text: &str) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        let layer = self.scene.active_layer_mut();
        let Some(index) = layer
            .elements
            .iter()
            .position(|e| e.id() == id && e.is_editable())
        else {
            return Err(self.reject(EditError::ElementNotFound(id.to_string())));
        };

        let current = &mut layer.elements[index];
        if current.text() == Some(text) {
            return Ok(());
        }
        match current {
            Element::Text(_) if text.trim().is_empty() => {
                layer.elements.remove(index);
                if self.selection.as_ref() == Some(id) {
                    self.selection = None;
                }
            }
            Element::Text(t) => t.text = text.to_string(),
            Element::Note(n) => n.text = text.to_string(),
            _ => {}
        }
        self.commit_active();
        self.broadcast_active_layer();
        Ok(())
    }

    // --- Editing ---

    /// Erase around `point` on the active layer. Returns the number removed.
    pub fn erase_at(&mut self, point: Point) -> Result<usize, EditError> {
        self.ensure_unlocked()?;
        Ok(self.erase_active(point))
    }

    fn erase_active(&mut self, point: Point) -> usize {
        let radius = self.config.eraser_size;
        let removed = eraser::erase(&mut self.scene.active_layer_mut().elements, point, radius);
        if removed.is_empty() {
            return 0;
        }
        if self.selection.as_ref().is_some_and(|id| removed.contains(id)) {
            self.selection = None;
        }
        log::debug!("Erased {} element(s)", removed.len());
        self.commit_active();
        self.broadcast_active_layer();
        removed.len()
    }

    /// Remove every element of the active layer as one undoable commit.
    pub fn clear(&mut self) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        self.cancel_gesture();
        let layer = self.scene.active_layer_mut();
        if layer.elements.is_empty() {
            return Ok(());
        }
        layer.elements.clear();
        log::info!("Cleared layer {}", layer.name);
        self.selection = None;
        self.commit_active();
        self.collab.broadcast_clear();
        Ok(())
    }

    /// Step back in history. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditError> {
        self.ensure_unlocked()?;
        self.cancel_gesture();
        let Some(snapshot) = self.history.undo() else {
            return Ok(false);
        };
        self.scene.active_layer_mut().elements = snapshot.to_vec();
        self.after_history_step();
        Ok(true)
    }

    /// Step forward in history. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EditError> {
        self.ensure_unlocked()?;
        self.cancel_gesture();
        let Some(snapshot) = self.history.redo() else {
            return Ok(false);
        };
        self.scene.active_layer_mut().elements = snapshot.to_vec();
        self.after_history_step();
        Ok(true)
    }

    fn after_history_step(&mut self) {
        if self.selected_element().is_none() {
            self.selection = None;
        }
        self.touch();
        self.broadcast_active_layer();
    }

    /// Remove the selected element.
    pub fn delete_selected(&mut self) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        let Some(id) = self.selection.take() else {
            return Err(self.reject(EditError::NothingSelected));
        };
        let layer = self.scene.active_layer_mut();
        let before = layer.elements.len();
        layer.elements.retain(|e| e.id() != &id);
        if layer.elements.len() == before {
            return Err(self.reject(EditError::ElementNotFound(id.to_string())));
        }
        log::debug!("Deleted {}", id);
        self.commit_active();
        self.broadcast_active_layer();
        Ok(())
    }

    // --- Layers ---

    /// Append a new layer and make it active.
    pub fn add_layer(&mut self) -> LayerId {
        self.cancel_gesture();
        let id = self.scene.add_layer();
        log::info!("Added layer {}", id);
        self.selection = None;
        self.rebase_history();
        self.touch();
        self.collab.broadcast_sync(&self.scene);
        id
    }

    /// Delete a layer and its elements. Not undoable.
    pub fn delete_layer(&mut self, id: &LayerId) -> Result<(), EditError> {
        let was_active = self.scene.active_layer_id() == id;
        let removed = match self.scene.remove_layer(id) {
            Ok(layer) => layer,
            Err(e) => return Err(self.reject(e)),
        };
        log::info!("Deleted layer {} ({} elements)", removed.name, removed.elements.len());
        if was_active {
            self.cancel_gesture();
            self.selection = None;
            self.rebase_history();
        }
        self.touch();
        self.collab.broadcast_sync(&self.scene);
        Ok(())
    }

    /// Swap a layer with its neighbor. Returns false at either end of the stack.
    pub fn move_layer(&mut self, id: &LayerId, direction: LayerMove) -> Result<bool, EditError> {
        let moved = match self.scene.move_layer(id, direction) {
            Ok(moved) => moved,
            Err(e) => return Err(self.reject(e)),
        };
        if moved {
            self.touch();
            self.collab.broadcast_sync(&self.scene);
        }
        Ok(moved)
    }

    pub fn set_layer_visible(&mut self, id: &LayerId, visible: bool) -> Result<(), EditError> {
        self.update_layer(id, |layer| layer.visible = visible)
    }

    pub fn set_layer_locked(&mut self, id: &LayerId, locked: bool) -> Result<(), EditError> {
        if locked && self.scene.active_layer_id() == id {
            self.cancel_gesture();
        }
        self.update_layer(id, |layer| layer.locked = locked)
    }

    pub fn rename_layer(&mut self, id: &LayerId, name: &str) -> Result<(), EditError> {
        let name = name.to_string();
        self.update_layer(id, move |layer| layer.name = name)
    }

    fn update_layer(&mut self, id: &LayerId, f: impl FnOnce(&mut Layer)) -> Result<(), EditError> {
        let Some(layer) = self.scene.layer_mut(id) else {
            return Err(self.reject(EditError::LayerNotFound(id.to_string())));
        };
        f(layer);
        self.collab.broadcast_layer(layer);
        self.touch();
        Ok(())
    }

    /// Switch the layer that receives edits. History restarts from its elements.
    pub fn set_active_layer(&mut self, id: &LayerId) -> Result<(), EditError> {
        if self.scene.active_layer_id() == id {
            return Ok(());
        }
        if let Err(e) = self.scene.set_active(id) {
            return Err(self.reject(e));
        }
        self.cancel_gesture();
        self.selection = None;
        self.rebase_history();
        self.touch();
        Ok(())
    }

    // --- Settings ---

    /// Switch tools, finishing any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.end_gesture();
        self.tools.set_tool(tool);
        if tool != ToolKind::Select {
            self.selection = None;
        }
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.settings.current_color = color.into();
        self.touch();
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.settings.line_width = width;
        self.touch();
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.settings.show_grid = show;
        self.touch();
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.settings.snap_to_grid = snap;
        self.touch();
    }

    // --- Collaboration ---

    /// Apply a received JSON message.
    pub fn apply_remote(&mut self, json: &str) -> RemoteChange {
        let change = self.collab.apply_json(&mut self.scene, json);
        self.after_remote(&change);
        change
    }

    /// Apply an already-decoded message.
    pub fn apply_message(&mut self, message: CollabMessage) -> RemoteChange {
        let change = self.collab.apply(&mut self.scene, message);
        self.after_remote(&change);
        change
    }

    fn after_remote(&mut self, change: &RemoteChange) {
        if !change.is_scene_change() {
            return;
        }
        if *change == RemoteChange::Scene {
            self.cancel_gesture();
            self.rebase_history();
        }
        if self.selected_element().is_none() {
            self.selection = None;
        }
        self.touch();
    }

    /// Send the whole board to peers.
    pub fn broadcast_sync(&mut self) {
        self.collab.broadcast_sync(&self.scene);
    }

    // --- Persistence ---

    /// The full document: layers plus board settings.
    pub fn to_document_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&BoardDocument::new(&self.scene, &self.settings))?)
    }

    /// Layers and active layer only.
    pub fn to_minimal_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&MinimalDocument::new(&self.scene))?)
    }

    /// Apply a saved document. Fields that are missing or fail validation keep
    /// their current values. Returns whether anything was applied.
    pub fn load_document_json(&mut self, json: &str) -> Result<bool, CodecError> {
        let doc = DecodedDocument::from_json(json)?;
        if doc.is_empty() {
            log::warn!("Saved document had nothing usable");
            return Ok(false);
        }

        self.cancel_gesture();
        match doc.layers {
            Some(layers) => {
                self.scene.replace_layers(layers, doc.active_layer);
            }
            None => {
                if let Some(active) = doc.active_layer {
                    if self.scene.set_active(&active).is_err() {
                        log::warn!("Saved active layer {} does not exist", active);
                    }
                }
            }
        }
        if let Some(color) = doc.current_color {
            self.settings.current_color = color;
        }
        if let Some(width) = doc.line_width {
            self.settings.line_width = width;
        }
        if let Some(show) = doc.show_grid {
            self.settings.show_grid = show;
        }
        if let Some(snap) = doc.snap_to_grid {
            self.settings.snap_to_grid = snap;
        }

        self.selection = None;
        self.rebase_history();
        self.touch();
        log::info!(
            "Loaded board: {} layers, {} elements",
            self.scene.layers().len(),
            self.scene.element_count()
        );
        Ok(true)
    }

    // --- Export ---

    /// Region covering every visible element plus padding, clamped to the viewport.
    pub fn export_frame(&self) -> Option<Rect> {
        let bounds = self.scene.visible_bounds(self.measure.as_ref())?;
        let padded = bounds.inflate(self.config.export_padding, self.config.export_padding);
        let frame = Rect::new(
            padded.x0.max(0.0),
            padded.y0.max(0.0),
            padded.x1.min(self.viewport.width),
            padded.y1.min(self.viewport.height),
        );
        (frame.width() > 0.0 && frame.height() > 0.0).then_some(frame)
    }

    // --- Internals ---

    fn snap(&self, point: Point) -> Point {
        if self.settings.snap_to_grid {
            snap_to_grid(point, self.config.grid_size)
        } else {
            point
        }
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    fn note_at(&self, point: Point) -> bool {
        self.scene
            .active_layer()
            .elements
            .iter()
            .filter_map(Element::as_note)
            .any(|note| point_in_rect(point, note.as_rect()))
    }

    fn ensure_unlocked(&mut self) -> Result<(), EditError> {
        let layer = self.scene.active_layer();
        if layer.locked {
            let err = EditError::LayerLocked {
                layer: layer.name.clone(),
            };
            return Err(self.reject(err));
        }
        Ok(())
    }

    fn reject(&mut self, err: EditError) -> EditError {
        log::warn!("{}", err);
        self.notices.push(Notice::from(&err));
        err
    }

    /// Drop any gesture without committing it.
    fn cancel_gesture(&mut self) {
        if let Some(manip) = self.manipulation.take() {
            if let Some(element) = self.scene.active_layer_mut().get_mut(&manip.element_id) {
                *element = manip.original;
            }
        }
        self.tools.cancel();
        self.erasing = false;
    }

    fn commit_active(&mut self) {
        self.history.commit(self.scene.active_layer().elements.clone());
        self.touch();
    }

    fn rebase_history(&mut self) {
        self.history.reset(self.scene.active_layer().elements.clone());
    }

    fn broadcast_active_layer(&mut self) {
        self.collab.broadcast_layer(self.scene.active_layer());
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.last_change = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoticeLevel;
    use crate::shapes::{BoxGeometry, Circle, Rectangle};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn canvas() -> Canvas {
        init();
        Canvas::new(EditorConfig::default())
    }

    fn draw(canvas: &mut Canvas, tool: ToolKind, from: (f64, f64), to: (f64, f64)) {
        canvas.set_tool(tool);
        canvas.pointer_down(Point::new(from.0, from.1)).unwrap();
        canvas.pointer_move(Point::new(to.0, to.1));
        canvas.pointer_up(Point::new(to.0, to.1));
    }

    fn elements(canvas: &Canvas) -> &[Element] {
        &canvas.scene().active_layer().elements
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut ids = IdGenerator::new();
        let a: u64 = ids.next_id().as_str().parse().unwrap();
        let b: u64 = ids.next_id().as_str().parse().unwrap();
        assert!(b > a);

        let mut saturated = IdGenerator { last: u64::MAX - 1 };
        assert_eq!(saturated.next_id().as_str(), u64::MAX.to_string());
    }

    #[test]
    fn test_draw_rectangle_commits_once() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));

        assert_eq!(elements(&canvas).len(), 1);
        assert_eq!(
            elements(&canvas)[0].box_geometry(),
            Some(BoxGeometry::new(10.0, 10.0, 50.0, 50.0))
        );
        assert_eq!(elements(&canvas)[0].owner(), 1);
        assert_eq!(canvas.history().len(), 2);
        assert!(canvas.preview().is_none());
    }

    #[test]
    fn test_resize_scenario() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));

        canvas.set_tool(ToolKind::Select);
        canvas.pointer_down(Point::new(60.0, 60.0)).unwrap();
        assert!(canvas.manipulation().is_some_and(|m| m.is_resize()));
        canvas.pointer_move(Point::new(75.0, 75.0));
        canvas.pointer_move(Point::new(90.0, 90.0));
        assert!(canvas.pointer_up(Point::new(90.0, 90.0)));

        assert_eq!(
            elements(&canvas)[0].box_geometry(),
            Some(BoxGeometry::new(10.0, 10.0, 80.0, 80.0))
        );
        // One commit for the draw, one for the resize
        assert_eq!(canvas.history().len(), 3);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (110.0, 110.0));

        canvas.set_tool(ToolKind::Select);
        canvas.pointer_down(Point::new(50.0, 50.0)).unwrap();
        assert!(canvas.selection().is_some());
        canvas.pointer_move(Point::new(70.0, 80.0));
        canvas.pointer_up(Point::new(70.0, 80.0));

        assert_eq!(elements(&canvas)[0].anchor(), Point::new(30.0, 40.0));
    }

    #[test]
    fn test_freehand_undo_redo_scenario() {
        let mut canvas = canvas();
        let before = elements(&canvas).to_vec();

        canvas.set_tool(ToolKind::Pen);
        canvas.pointer_down(Point::new(0.0, 0.0)).unwrap();
        canvas.pointer_move(Point::new(1.0, 0.0));
        canvas.pointer_move(Point::new(100.0, 0.0));
        canvas.pointer_up(Point::new(100.0, 0.0));
        let after = elements(&canvas).to_vec();
        assert_eq!(after.len(), 1);

        assert!(canvas.undo().unwrap());
        assert_eq!(elements(&canvas), before.as_slice());
        assert!(canvas.redo().unwrap());
        assert_eq!(elements(&canvas), after.as_slice());
        assert!(!canvas.redo().unwrap());
    }

    #[test]
    fn test_erase_scenario() {
        let mut canvas = canvas();
        {
            let layer = canvas.scene.active_layer_mut();
            layer.elements.push(Element::Rectangle(Rectangle::new(
                "a".into(),
                Point::new(0.0, 0.0),
                20.0,
                20.0,
            )));
            layer.elements.push(Element::Circle(Circle::new(
                "b".into(),
                Point::new(100.0, 100.0),
                20.0,
                20.0,
            )));
        }
        canvas.rebase_history();

        canvas.set_tool(ToolKind::Eraser);
        canvas.pointer_down(Point::new(10.0, 10.0)).unwrap();
        canvas.pointer_up(Point::new(10.0, 10.0));

        assert_eq!(elements(&canvas).len(), 1);
        assert_eq!(elements(&canvas)[0].id().as_str(), "b");
        assert_eq!(canvas.history().len(), 2);

        // Erasing empty space commits nothing
        assert_eq!(canvas.erase_at(Point::new(400.0, 400.0)).unwrap(), 0);
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn test_locked_layer_rejects_edits() {
        let mut canvas = canvas();
        let id = canvas.scene().active_layer_id().clone();
        canvas.set_layer_locked(&id, true).unwrap();
        let revision = canvas.revision();

        canvas.set_tool(ToolKind::Rectangle);
        let err = canvas.pointer_down(Point::new(10.0, 10.0)).unwrap_err();
        assert!(matches!(err, EditError::LayerLocked { .. }));
        canvas.pointer_move(Point::new(60.0, 60.0));
        assert!(!canvas.pointer_up(Point::new(60.0, 60.0)));

        assert!(canvas.add_text("hello").is_err());
        assert!(canvas.undo().is_err());
        assert!(elements(&canvas).is_empty());
        assert_eq!(canvas.revision(), revision);

        let notices = canvas.take_notices();
        assert_eq!(notices.len(), 3);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].title, "Layer Locked");
    }

    #[test]
    fn test_moves_without_gesture_are_noops() {
        let mut canvas = canvas();
        assert!(!canvas.pointer_move(Point::new(5.0, 5.0)));
        assert!(!canvas.pointer_up(Point::new(5.0, 5.0)));
        assert!(!canvas.pointer_leave());
        assert_eq!(canvas.revision(), 0);
    }

    #[test]
    fn test_pointer_leave_commits_gesture() {
        let mut canvas = canvas();
        canvas.set_tool(ToolKind::Line);
        canvas.pointer_down(Point::new(0.0, 0.0)).unwrap();
        canvas.pointer_move(Point::new(40.0, 30.0));
        assert!(canvas.pointer_leave());
        assert_eq!(elements(&canvas).len(), 1);
        assert!(!canvas.is_busy());
    }

    #[test]
    fn test_snap_to_grid() {
        let mut canvas = canvas();
        canvas.set_snap_to_grid(true);
        draw(&mut canvas, ToolKind::Rectangle, (12.0, 9.0), (49.0, 71.0));
        assert_eq!(
            elements(&canvas)[0].box_geometry(),
            Some(BoxGeometry::new(20.0, 0.0, 20.0, 80.0))
        );
    }

    #[test]
    fn test_note_blocks_strokes() {
        let mut canvas = canvas();
        canvas.set_viewport_size(400.0, 300.0);
        // Note spans (100, 75) to (300, 225)
        canvas.add_note("todo").unwrap();

        canvas.set_tool(ToolKind::Pen);
        canvas.pointer_down(Point::new(150.0, 100.0)).unwrap();
        assert!(!canvas.is_busy());

        canvas.pointer_down(Point::new(10.0, 100.0)).unwrap();
        canvas.pointer_move(Point::new(50.0, 100.0));
        canvas.pointer_move(Point::new(120.0, 100.0));
        assert!(!canvas.is_busy());
        canvas.pointer_move(Point::new(160.0, 100.0));

        let stroke = &elements(&canvas)[1];
        assert_eq!(stroke.points().unwrap().last(), Some(&Point::new(50.0, 100.0)));
    }

    #[test]
    fn test_insertions() {
        let mut canvas = canvas();
        canvas.set_viewport_size(800.0, 600.0);

        let text = canvas.add_text("hello").unwrap().unwrap();
        assert_eq!(canvas.scene().find_element(&text).unwrap().1.anchor(), Point::new(400.0, 300.0));
        assert_eq!(canvas.add_text("   ").unwrap(), None);

        let image = canvas.add_image("https://example.com/cat.png").unwrap();
        assert_eq!(
            canvas.scene().find_element(&image).unwrap().1.box_geometry(),
            Some(BoxGeometry::new(300.0, 200.0, 200.0, 200.0))
        );

        canvas.set_tool(ToolKind::Sticker);
        canvas.pointer_down(Point::new(40.0, 50.0)).unwrap();
        let sticker = canvas.add_sticker("🎉").unwrap();
        assert_eq!(canvas.scene().find_element(&sticker).unwrap().1.anchor(), Point::new(40.0, 50.0));
        assert_eq!(canvas.tool(), ToolKind::Select);

        let note = canvas.add_note("remember").unwrap().unwrap();
        let (_, el) = canvas.scene().find_element(&note).unwrap();
        assert_eq!(el.style().color, crate::shapes::NOTE_COLOR);

        assert_eq!(elements(&canvas).len(), 4);
        assert_eq!(canvas.history().len(), 5);
        // Ids increase in creation order
        let ids: Vec<_> = elements(&canvas).iter().map(|e| e.id().as_str().parse::<u64>().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_text_editing() {
        let mut canvas = canvas();
        let note = canvas.add_note("first").unwrap().unwrap();
        let text = canvas.add_text("label").unwrap().unwrap();

        let inside_note = Point::new(400.0, 300.0 + 60.0);
        assert_eq!(canvas.editable_at(inside_note), Some(note.clone()));
        assert_eq!(canvas.editable_at(Point::new(405.0, 295.0)), Some(text.clone()));

        canvas.update_text(&note, "second").unwrap();
        let (_, el) = canvas.scene().find_element(&note).unwrap();
        assert_eq!(el.text(), Some("second"));

        canvas.update_text(&text, "").unwrap();
        assert!(canvas.scene().find_element(&text).is_none());

        let missing = ElementId::from("nope");
        assert!(matches!(canvas.update_text(&missing, "x"), Err(EditError::ElementNotFound(_))));
    }

    #[test]
    fn test_delete_selected() {
        let mut canvas = canvas();
        assert_eq!(canvas.delete_selected(), Err(EditError::NothingSelected));

        draw(&mut canvas, ToolKind::Circle, (100.0, 100.0), (130.0, 140.0));
        canvas.set_tool(ToolKind::Select);
        canvas.pointer_down(Point::new(150.0, 150.0)).unwrap();
        canvas.pointer_up(Point::new(150.0, 150.0));
        assert!(canvas.selection().is_some());

        canvas.delete_selected().unwrap();
        assert!(elements(&canvas).is_empty());
        assert!(canvas.selection().is_none());
        assert!(canvas.undo().unwrap());
        assert_eq!(elements(&canvas).len(), 1);
    }

    #[test]
    fn test_click_on_empty_space_clears_selection() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));
        canvas.set_tool(ToolKind::Select);
        canvas.pointer_down(Point::new(30.0, 30.0)).unwrap();
        canvas.pointer_up(Point::new(30.0, 30.0));
        assert!(canvas.selection().is_some());

        canvas.pointer_down(Point::new(300.0, 300.0)).unwrap();
        assert!(canvas.selection().is_none());
        // A click without movement commits nothing
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));
        canvas.take_outgoing();

        canvas.clear().unwrap();
        assert!(elements(&canvas).is_empty());
        assert_eq!(canvas.take_outgoing(), vec![r#"{"type":"clear"}"#.to_string()]);

        canvas.undo().unwrap();
        assert_eq!(elements(&canvas).len(), 1);
    }

    #[test]
    fn test_layers() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));
        let first = canvas.scene().active_layer_id().clone();

        let second = canvas.add_layer();
        assert_eq!(canvas.scene().active_layer_id(), &second);
        assert_eq!(canvas.scene().active_layer().name, "Layer 2");
        assert!(!canvas.can_undo());

        draw(&mut canvas, ToolKind::Rectangle, (100.0, 100.0), (160.0, 160.0));
        assert_eq!(canvas.scene().layer(&first).unwrap().elements.len(), 1);
        assert_eq!(canvas.scene().active_layer().elements.len(), 1);

        assert!(canvas.move_layer(&second, LayerMove::Down).unwrap());
        assert_eq!(canvas.scene().layers()[0].id, second);

        canvas.rename_layer(&second, "Sketch").unwrap();
        canvas.set_layer_visible(&first, false).unwrap();
        assert!(!canvas.scene().layer(&first).unwrap().visible);

        canvas.delete_layer(&second).unwrap();
        assert_eq!(canvas.scene().active_layer_id(), &first);
        assert_eq!(canvas.delete_layer(&first), Err(EditError::LastLayer));
        assert_eq!(canvas.take_notices().len(), 1);

        let missing = LayerId::from("missing");
        assert!(matches!(canvas.set_active_layer(&missing), Err(EditError::LayerNotFound(_))));
    }

    #[test]
    fn test_broadcasts() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));
        let sent = canvas.take_outgoing();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains(r#""type":"draw""#));
        assert!(sent[0].contains(r#""layerId":"default""#));

        canvas.undo().unwrap();
        let sent = canvas.take_outgoing();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains(r#""type":"layerUpdate""#));

        canvas.collaboration_mut().disable();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));
        assert!(canvas.take_outgoing().is_empty());
    }

    #[test]
    fn test_remote_draw_bypasses_history_and_locks() {
        let mut canvas = canvas();
        let mut peer = Canvas::new(EditorConfig {
            user_id: 2,
            ..EditorConfig::default()
        });
        draw(&mut peer, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));
        let message = peer.take_outgoing().remove(0);

        let id = canvas.scene().active_layer_id().clone();
        canvas.set_layer_locked(&id, true).unwrap();
        assert!(canvas.apply_remote(&message).is_scene_change());
        assert_eq!(canvas.apply_remote(&message), RemoteChange::None);

        assert_eq!(elements(&canvas).len(), 1);
        assert_eq!(elements(&canvas)[0].owner(), 2);
        assert!(!canvas.can_undo());
    }

    #[test]
    fn test_document_round_trip() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Triangle, (10.0, 10.0), (60.0, 80.0));
        canvas.add_layer();
        canvas.add_text("on layer two").unwrap();
        canvas.set_color("#ff0000");
        canvas.set_show_grid(true);

        let json = canvas.to_document_json().unwrap();
        let mut restored = Canvas::default();
        assert!(restored.load_document_json(&json).unwrap());

        assert_eq!(restored.scene(), canvas.scene());
        assert_eq!(restored.settings(), canvas.settings());
    }

    #[test]
    fn test_minimal_document_keeps_settings() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));
        let json = canvas.to_minimal_json().unwrap();

        let mut restored = Canvas::default();
        restored.set_line_width(7.0);
        assert!(restored.load_document_json(&json).unwrap());
        assert_eq!(restored.scene(), canvas.scene());
        assert_eq!(restored.settings().line_width, 7.0);
    }

    #[test]
    fn test_bad_document_keeps_state() {
        let mut canvas = canvas();
        draw(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 60.0));
        let scene = canvas.scene().clone();

        assert!(canvas.load_document_json("[]").is_err());
        assert!(!canvas.load_document_json(r#"{"layers":"nope"}"#).unwrap());
        assert_eq!(canvas.scene(), &scene);
    }

    #[test]
    fn test_export_frame() {
        let mut canvas = canvas();
        assert!(canvas.export_frame().is_none());

        draw(&mut canvas, ToolKind::Rectangle, (100.0, 100.0), (200.0, 150.0));
        draw(&mut canvas, ToolKind::Rectangle, (20.0, 300.0), (40.0, 320.0));
        assert_eq!(canvas.export_frame(), Some(Rect::new(0.0, 50.0, 250.0, 370.0)));

        let id = canvas.scene().active_layer_id().clone();
        canvas.set_layer_visible(&id, false).unwrap();
        assert!(canvas.export_frame().is_none());
    }
}
