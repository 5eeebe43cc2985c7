//! The annotation engine: one per canvas.
//!
//! Owns the history (and through it the drawing state), the drawing session
//! and the text edit coordinator. Every mutation of the element collection
//! goes through the history operations exposed here.

use crate::config::{EngineOptions, ToolConfig};
use crate::elements::{DrawingElement, ElementId, ElementPatch, Text};
use crate::history::{DrawingState, History};
use crate::session::DrawingSession;
use crate::text_edit::{EditKey, EditOutcome, SurfaceFactory, TextEditCoordinator, TextEditingState};
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// What a stage click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing to do (no position, or no text tool and no text hit).
    Ignored,
    /// The click landed on a text element and editing was requested.
    EditRequested(ElementId),
    /// A placeholder text element was created; editing opens after the
    /// configured delay (see [`Engine::poll`]).
    TextCreated(ElementId),
}

/// A text edit waiting for the new element to be laid out.
#[derive(Debug, Clone, Copy)]
struct PendingEdit {
    id: ElementId,
    due: Instant,
}

/// Vector annotation engine.
#[derive(Debug)]
pub struct Engine {
    history: History,
    session: DrawingSession,
    text_edit: TextEditCoordinator,
    options: EngineOptions,
    /// Offset of the stage container on the page.
    stage_offset: Vec2,
    pending_edit: Option<PendingEdit>,
}

impl Engine {
    pub fn new(config: ToolConfig, options: EngineOptions, surfaces: Box<dyn SurfaceFactory>) -> Self {
        Self {
            history: History::new(config),
            session: DrawingSession::new(options.pen_min_distance),
            text_edit: TextEditCoordinator::new(surfaces),
            options,
            stage_offset: Vec2::ZERO,
            pending_edit: None,
        }
    }

    /// Engine with default configuration and options.
    pub fn with_surfaces(surfaces: Box<dyn SurfaceFactory>) -> Self {
        Self::new(ToolConfig::default(), EngineOptions::default(), surfaces)
    }

    // --- Observable state -------------------------------------------------

    /// The visible drawing state (`states[current_index]`).
    pub fn drawing_state(&self) -> &DrawingState {
        self.history.current()
    }

    pub fn elements(&self) -> &[DrawingElement] {
        self.history.elements()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &ToolConfig {
        &self.history.current().config
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn temp_element(&self) -> Option<&DrawingElement> {
        self.session.temp_element()
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    pub fn text_editing(&self) -> &TextEditingState {
        self.text_edit.state()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Configuration ----------------------------------------------------

    /// Replace the whole toolbar configuration. A tool change releases any
    /// in-progress session without committing it.
    pub fn set_config(&mut self, config: ToolConfig) {
        if config.tool != self.config().tool {
            self.session.cancel();
        }
        self.history.set_config(config);
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        let config = self.config().clone().with_tool(tool);
        self.set_config(config);
    }

    pub fn set_color(&mut self, color: crate::elements::SerializableColor) {
        let mut config = self.config().clone();
        config.color = color;
        self.set_config(config);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        let mut config = self.config().clone();
        config.stroke_width = width.max(0.0);
        self.set_config(config);
    }

    pub fn set_font_size(&mut self, size: f64) {
        let mut config = self.config().clone();
        config.font_size = size;
        self.set_config(config);
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        let mut config = self.config().clone();
        config.font_family = family.into();
        self.set_config(config);
    }

    /// Page offset of the stage container, used to place the text surface.
    pub fn set_stage_offset(&mut self, offset: Vec2) {
        self.stage_offset = offset;
    }

    // --- Pointer session --------------------------------------------------

    /// `None` means the stage could not report a position yet.
    pub fn pointer_down(&mut self, position: Option<Point>) -> bool {
        let config = self.history.current().config.clone();
        self.session.begin(position, &config)
    }

    pub fn pointer_move(&mut self, position: Option<Point>) -> bool {
        self.session.update(position)
    }

    /// Ends the session, committing the element unless it is degenerate.
    pub fn pointer_up(&mut self) -> Option<ElementId> {
        let element = self.session.finish()?;
        Some(self.history.add_element(element))
    }

    /// Release the session without committing (pointer left the stage).
    pub fn cancel_drawing(&mut self) -> bool {
        self.session.cancel()
    }

    /// A click on the stage.
    ///
    /// The topmost visible element under the click decides: text opens for
    /// editing whatever the tool, anything else swallows the click. On empty
    /// stage with the text tool, a placeholder text element is committed at
    /// the click and its editor is scheduled for `now` plus the configured
    /// delay.
    pub fn stage_click(&mut self, position: Option<Point>, now: Instant) -> ClickOutcome {
        let Some(position) = position else {
            return ClickOutcome::Ignored;
        };
        match self.element_at(position).map(|e| (e.id(), e.is_text())) {
            Some((id, true)) => {
                self.begin_text_edit(id);
                return ClickOutcome::EditRequested(id);
            }
            Some(_) => return ClickOutcome::Ignored,
            None => {}
        }
        if self.config().tool != ToolKind::Text {
            return ClickOutcome::Ignored;
        }

        let config = self.config();
        let text = Text::placeholder(position)
            .with_style(config.element_style())
            .with_font_size(config.font_size)
            .with_font_family(config.font_family.clone());
        let id = self.history.add_element(DrawingElement::Text(text));
        self.pending_edit = Some(PendingEdit {
            id,
            due: now + self.options.text_edit_delay,
        });
        log::debug!("Text {id} placed, edit scheduled");
        ClickOutcome::TextCreated(id)
    }

    /// Topmost visible element under `point`.
    pub fn element_at(&self, point: Point) -> Option<&DrawingElement> {
        self.elements()
            .iter()
            .rev()
            .filter(|e| e.is_visible())
            .find(|e| e.hit_test(point, self.options.hit_tolerance))
    }

    /// Text element under `point`, if it is the topmost hit.
    pub fn text_at(&self, point: Point) -> Option<ElementId> {
        self.element_at(point)
            .filter(|e| e.is_text())
            .map(DrawingElement::id)
    }

    /// Run deferred work that is due. Returns true if an edit was started.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending_edit {
            Some(pending) if now >= pending.due => self.start_pending_edit(),
            _ => false,
        }
    }

    /// Start the scheduled edit immediately, skipping the delay.
    pub fn start_pending_edit(&mut self) -> bool {
        match self.pending_edit.take() {
            Some(pending) => self.begin_text_edit(pending.id),
            None => false,
        }
    }

    pub fn has_pending_edit(&self) -> bool {
        self.pending_edit.is_some()
    }

    // --- History operations ----------------------------------------------

    pub fn add_element(&mut self, element: DrawingElement) -> ElementId {
        self.history.add_element(element)
    }

    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.history.update_element(id, patch)
    }

    pub fn finish_text_edit(&mut self, id: ElementId, final_text: &str) -> bool {
        self.history.finish_text_edit(id, final_text)
    }

    /// Non-history content update.
    pub fn update_text_live(&mut self, id: ElementId, text: &str) -> bool {
        self.history.update_text_live(id, text)
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    // --- Text editing -----------------------------------------------------

    pub fn begin_text_edit(&mut self, id: ElementId) -> bool {
        self.pending_edit = None;
        self.text_edit.begin(id, &mut self.history, self.stage_offset)
    }

    /// The input surface's value changed.
    pub fn text_input(&mut self, value: &str) -> bool {
        self.text_edit.input(value, &mut self.history)
    }

    pub fn text_key(&mut self, key: EditKey) -> EditOutcome {
        self.text_edit.key(key, &mut self.history)
    }

    pub fn text_blur(&mut self) -> EditOutcome {
        self.text_edit.blur(&mut self.history)
    }

    pub fn cancel_text_edit(&mut self) -> EditOutcome {
        self.text_edit.cancel(&mut self.history)
    }
}
