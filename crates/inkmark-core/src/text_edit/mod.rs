//! Text edit coordination.
//!
//! The coordinator owns the input surface of the element being edited and
//! keeps the element's content in sync with it. It talks to the model through
//! two operations only: a live update per keystroke (not history-tracked) and
//! one commit when the edit ends.

mod headless;
mod surface;

pub use headless::{HeadlessSurfaceFactory, SurfaceRecord};
pub use surface::{EditSurface, SurfaceFactory, SurfacePlacement};

use crate::elements::{ElementId, Text};
use crate::history::History;
use kurbo::Vec2;

/// Model operations the coordinator is allowed to use.
pub trait TextTarget {
    fn text_element(&self, id: ElementId) -> Option<&Text>;

    /// Replace displayed content without a history entry.
    fn update_text_live(&mut self, id: ElementId, text: &str) -> bool;

    /// Drop live content, showing the committed text again.
    fn discard_live_text(&mut self) -> Option<ElementId>;

    /// Commit final content as one history entry.
    fn finish_text_edit(&mut self, id: ElementId, text: &str) -> bool;
}

impl TextTarget for History {
    fn text_element(&self, id: ElementId) -> Option<&Text> {
        History::text_element(self, id)
    }

    fn update_text_live(&mut self, id: ElementId, text: &str) -> bool {
        History::update_text_live(self, id, text)
    }

    fn discard_live_text(&mut self) -> Option<ElementId> {
        History::discard_live_text(self)
    }

    fn finish_text_edit(&mut self, id: ElementId, text: &str) -> bool {
        History::finish_text_edit(self, id, text)
    }
}

/// Observable editing state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditingState {
    /// Element currently being edited.
    pub is_editing: Option<ElementId>,
    /// Whether an input surface is up. Hosts suppress other interactions
    /// while this is set.
    pub has_active_edit: bool,
    /// Current value of the input surface.
    pub live_text: String,
}

/// Keys with editing semantics. Everything else arrives through
/// [`TextEditCoordinator::input`] as the surface's new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    /// Enter commits; Shift+Enter is left to the surface (newline).
    Enter { shift: bool },
    Escape,
}

/// Result of a key press or blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// No edit was active.
    NotEditing,
    /// The edit continues.
    Continue,
    /// The edit ended and its value was applied. `snapshot` is false when the
    /// text did not change (or the element no longer exists).
    Committed { id: ElementId, snapshot: bool },
    /// The edit ended and the pre-edit text was restored.
    Cancelled { id: ElementId },
}

/// Lifecycle owner for the text input surface.
pub struct TextEditCoordinator {
    state: TextEditingState,
    font_size: f64,
    surface: Option<Box<dyn EditSurface>>,
    factory: Box<dyn SurfaceFactory>,
}

impl std::fmt::Debug for TextEditCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEditCoordinator")
            .field("state", &self.state)
            .field("has_surface", &self.surface.is_some())
            .finish()
    }
}

impl TextEditCoordinator {
    pub fn new(factory: Box<dyn SurfaceFactory>) -> Self {
        Self {
            state: TextEditingState::default(),
            font_size: Text::DEFAULT_FONT_SIZE,
            surface: None,
            factory,
        }
    }

    pub fn state(&self) -> &TextEditingState {
        &self.state
    }

    pub fn editing_id(&self) -> Option<ElementId> {
        self.state.is_editing
    }

    pub fn is_editing(&self, id: ElementId) -> bool {
        self.state.is_editing == Some(id)
    }

    pub fn has_active_edit(&self) -> bool {
        self.state.has_active_edit
    }

    /// Start editing text element `id`.
    ///
    /// No-op when `id` is already being edited or is not a text element. An
    /// edit on another element is committed first.
    pub fn begin<T: TextTarget + ?Sized>(
        &mut self,
        id: ElementId,
        target: &mut T,
        stage_offset: Vec2,
    ) -> bool {
        if self.is_editing(id) {
            return false;
        }
        let Some(text) = target.text_element(id) else {
            return false;
        };
        let original = text.content().to_string();
        let placement = SurfacePlacement {
            position: text.position + stage_offset,
            font_size: text.font_size,
            font_family: text.font_family.clone(),
            color: text.fill,
        };

        if self.state.is_editing.is_some() {
            self.commit(target);
        }

        let (seed, select_all) = if original == Text::PLACEHOLDER {
            (String::new(), false)
        } else {
            (original, true)
        };

        let mut surface = self.factory.create();
        surface.mount(&placement, &seed, select_all);
        surface.resize(Text::measure(&seed, placement.font_size));
        self.surface = Some(surface);

        log::debug!(
            "Text edit started on {id} at ({}, {})",
            placement.position.x,
            placement.position.y
        );
        self.font_size = placement.font_size;
        self.state = TextEditingState {
            is_editing: Some(id),
            has_active_edit: true,
            live_text: seed,
        };
        true
    }

    /// The surface's value changed. Mirrors it into the model without a
    /// history entry and refits the surface.
    pub fn input<T: TextTarget + ?Sized>(&mut self, value: &str, target: &mut T) -> bool {
        let Some(id) = self.state.is_editing else {
            return false;
        };
        self.state.live_text = value.to_string();
        target.update_text_live(id, value);
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(Text::measure(value, self.font_size));
        }
        true
    }

    pub fn key<T: TextTarget + ?Sized>(&mut self, key: EditKey, target: &mut T) -> EditOutcome {
        if self.state.is_editing.is_none() {
            if key == EditKey::Escape {
                self.teardown();
            }
            return EditOutcome::NotEditing;
        }
        match key {
            EditKey::Enter { shift: false } => self.commit(target),
            EditKey::Enter { shift: true } => EditOutcome::Continue,
            EditKey::Escape => self.cancel(target),
        }
    }

    /// Focus left the surface: same as Enter.
    pub fn blur<T: TextTarget + ?Sized>(&mut self, target: &mut T) -> EditOutcome {
        self.commit(target)
    }

    /// End the edit keeping the typed value.
    ///
    /// The value is trimmed; an empty result becomes the placeholder. Live
    /// text is dropped first, so the single committed snapshot is the only
    /// one carrying the new content. Nothing is committed when the value
    /// matches what the visible snapshot already holds.
    pub fn commit<T: TextTarget + ?Sized>(&mut self, target: &mut T) -> EditOutcome {
        let Some(id) = self.state.is_editing else {
            return EditOutcome::NotEditing;
        };
        let trimmed = self.state.live_text.trim();
        let final_text = if trimmed.is_empty() {
            Text::PLACEHOLDER.to_string()
        } else {
            trimmed.to_string()
        };

        target.discard_live_text();
        let unchanged = target
            .text_element(id)
            .is_none_or(|text| text.content() == final_text);
        let snapshot = !unchanged && target.finish_text_edit(id, &final_text);
        log::debug!("Text edit on {id} committed (snapshot: {snapshot})");
        self.teardown();
        EditOutcome::Committed { id, snapshot }
    }

    /// End the edit dropping the typed value. A missing element (removed
    /// by an undo meanwhile) only tears the surface down.
    pub fn cancel<T: TextTarget + ?Sized>(&mut self, target: &mut T) -> EditOutcome {
        let Some(id) = self.state.is_editing else {
            self.teardown();
            return EditOutcome::NotEditing;
        };
        target.discard_live_text();
        if target.text_element(id).is_none() {
            log::debug!("Text edit on {id} cancelled, element is gone");
        } else {
            log::debug!("Text edit on {id} cancelled");
        }
        self.teardown();
        EditOutcome::Cancelled { id }
    }

    fn teardown(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.unmount();
        }
        self.state = TextEditingState::default();
    }
}
