//! Linear undo/redo history over committed drawing snapshots.

use crate::config::ToolConfig;
use crate::elements::{DrawingElement, ElementId, ElementPatch, Text};
use serde::{Deserialize, Serialize};

/// One committed state of the canvas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawingState {
    /// Elements in z-order (back to front).
    pub elements: Vec<DrawingElement>,
    /// Toolbar configuration at the time of the snapshot.
    pub config: ToolConfig,
}

impl DrawingState {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            elements: Vec::new(),
            config,
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&DrawingElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut DrawingElement> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }
}

/// Uncommitted content shown over one text element.
#[derive(Debug, Clone)]
struct LiveText {
    id: ElementId,
    text: String,
    /// Content the visible snapshot held before `text` was written over it.
    /// `None` while the element is absent from the visible snapshot.
    restore: Option<String>,
}

/// Snapshot history with a movable cursor.
///
/// `states[current_index]` is the visible drawing state. Committing after an
/// undo discards every snapshot past the cursor.
///
/// Live text is written over the visible snapshot only. It is lifted off
/// before every commit and cursor move and laid back on afterwards, so no
/// other snapshot ever holds uncommitted text.
#[derive(Debug, Clone)]
pub struct History {
    states: Vec<DrawingState>,
    current_index: usize,
    live: Option<LiveText>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(ToolConfig::default())
    }
}

impl History {
    /// Create a history holding a single empty snapshot.
    pub fn new(config: ToolConfig) -> Self {
        Self {
            states: vec![DrawingState::new(config)],
            current_index: 0,
            live: None,
        }
    }

    /// The visible drawing state.
    pub fn current(&self) -> &DrawingState {
        &self.states[self.current_index]
    }

    fn current_mut(&mut self) -> &mut DrawingState {
        &mut self.states[self.current_index]
    }

    pub fn elements(&self) -> &[DrawingElement] {
        &self.current().elements
    }

    pub fn element(&self, id: ElementId) -> Option<&DrawingElement> {
        self.current().element(id)
    }

    pub fn states(&self) -> &[DrawingState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.states.len()
    }

    /// Replace the toolbar configuration of the visible snapshot.
    /// Not history-tracked.
    pub fn set_config(&mut self, config: ToolConfig) {
        self.current_mut().config = config;
    }

    /// Truncate the redo branch and push `next` as the visible snapshot.
    fn commit(&mut self, next: DrawingState) {
        let discarded = self.states.len() - (self.current_index + 1);
        self.states.truncate(self.current_index + 1);
        self.states.push(next);
        self.current_index = self.states.len() - 1;
        log::debug!(
            "History commit: {} snapshots, index {} ({} redo discarded)",
            self.states.len(),
            self.current_index,
            discarded
        );
    }

    /// Append an element on top of the z-order and commit a snapshot.
    pub fn add_element(&mut self, element: DrawingElement) -> ElementId {
        let id = element.id();
        self.lift_live();
        let mut next = self.current().clone();
        next.elements.push(element);
        self.commit(next);
        self.lay_live();
        id
    }

    /// Patch one element and commit a snapshot.
    ///
    /// Returns false (and commits nothing) when the id is unknown or the
    /// patch changes nothing.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.lift_live();
        let mut next = self.current().clone();
        let changed = next
            .element_mut(id)
            .is_some_and(|element| element.apply_patch(patch));
        if changed {
            self.commit(next);
        }
        self.lay_live();
        changed
    }

    /// Commit the final text of an edit session as one snapshot. Live text
    /// on the same element is dropped.
    ///
    /// Returns false when the id is unknown or is not a text element.
    pub fn finish_text_edit(&mut self, id: ElementId, final_text: &str) -> bool {
        self.lift_live();
        if self.live.as_ref().is_some_and(|live| live.id == id) {
            self.live = None;
        }
        let mut next = self.current().clone();
        let Some(text) = next.element_mut(id).and_then(DrawingElement::as_text_mut) else {
            log::debug!("finish_text_edit: no text element {id}");
            self.lay_live();
            return false;
        };
        text.set_content(final_text);
        self.commit(next);
        self.lay_live();
        true
    }

    /// Show `text` as the content of text element `id` without creating a
    /// history entry. Used for keystroke-level live updates. The text stays
    /// on display across commits, undo and redo until it is committed with
    /// [`Self::finish_text_edit`] or dropped with [`Self::discard_live_text`].
    ///
    /// Returns false when the visible snapshot has no text element `id`.
    pub fn update_text_live(&mut self, id: ElementId, text: &str) -> bool {
        if self.text_element(id).is_none() {
            return false;
        }
        self.lift_live();
        self.live = Some(LiveText {
            id,
            text: text.to_string(),
            restore: None,
        });
        self.lay_live();
        true
    }

    /// Drop live text, putting the committed content back on display.
    /// Returns the element the live text was shown on.
    pub fn discard_live_text(&mut self) -> Option<ElementId> {
        self.lift_live();
        self.live.take().map(|live| live.id)
    }

    /// Element currently showing live text, if any.
    pub fn live_text_id(&self) -> Option<ElementId> {
        self.live.as_ref().map(|live| live.id)
    }

    /// Put the visible snapshot's committed content back under live text.
    fn lift_live(&mut self) {
        let Some(LiveText { id, restore, .. }) = self.live.as_mut() else {
            return;
        };
        let (id, Some(committed)) = (*id, restore.take()) else {
            return;
        };
        if let Some(text) = self.current_mut().element_mut(id).and_then(DrawingElement::as_text_mut) {
            text.set_content(&committed);
        }
    }

    /// Write live text over the visible snapshot, remembering what it hid.
    fn lay_live(&mut self) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        let state = &mut self.states[self.current_index];
        live.restore = state
            .element_mut(live.id)
            .and_then(DrawingElement::as_text_mut)
            .map(|text| {
                let committed = text.content().to_string();
                text.set_content(&live.text);
                committed
            });
    }

    pub fn text_element(&self, id: ElementId) -> Option<&Text> {
        self.element(id).and_then(DrawingElement::as_text)
    }

    /// Step back one snapshot. The toolbar configuration is carried over.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.move_cursor(self.current_index - 1);
        true
    }

    /// Step forward one snapshot. The toolbar configuration is carried over.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.move_cursor(self.current_index + 1);
        true
    }

    fn move_cursor(&mut self, index: usize) {
        self.lift_live();
        let config = self.current().config.clone();
        self.current_index = index;
        self.current_mut().config = config;
        self.lay_live();
        log::debug!(
            "History cursor at {}/{}",
            self.current_index,
            self.states.len() - 1
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Circle, Rectangle};
    use crate::tools::ToolKind;
    use kurbo::Point;

    fn rect() -> DrawingElement {
        DrawingElement::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0))
    }

    #[test]
    fn test_initial_state() {
        let history = History::default();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_index(), 0);
        assert!(history.elements().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_add_element_appends_snapshot() {
        let mut history = History::default();
        let id = history.add_element(rect());
        assert_eq!(history.len(), 2);
        assert_eq!(history.current_index(), 1);
        assert!(history.element(id).is_some());
        assert!(history.can_undo());
        assert!(!history.can_redo());
        // Earlier snapshot is untouched.
        assert!(history.states()[0].elements.is_empty());
    }

    #[test]
    fn test_undo_redo_boundaries() {
        let mut history = History::default();
        assert!(!history.undo());
        assert!(!history.redo());

        history.add_element(rect());
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(history.current_index(), 0);
        assert!(history.redo());
        assert!(!history.redo());
        assert_eq!(history.current_index(), 1);
    }

    #[test]
    fn test_commit_after_undo_truncates() {
        let mut history = History::default();
        history.add_element(rect());
        history.add_element(rect());
        assert!(history.undo());
        assert!(history.undo());
        assert!(history.can_redo());

        history.add_element(DrawingElement::Circle(Circle::new(Point::ZERO, 3.0)));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.elements().len(), 1);
    }

    #[test]
    fn test_update_element() {
        let mut history = History::default();
        let id = history.add_element(rect());
        let patch = ElementPatch {
            visible: Some(false),
            ..Default::default()
        };
        assert!(history.update_element(id, &patch));
        assert_eq!(history.len(), 3);
        assert!(!history.element(id).map(DrawingElement::is_visible).unwrap_or(true));

        // Unknown id and no-op patches commit nothing.
        assert!(!history.update_element(ElementId::new_v4(), &patch));
        assert!(!history.update_element(id, &patch));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_live_text_update_is_not_tracked() {
        let mut history = History::default();
        let id = history.add_element(DrawingElement::Text(Text::placeholder(Point::ZERO)));
        assert!(history.update_text_live(id, "Hel"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.text_element(id).map(Text::content), Some("Hel"));

        assert!(history.finish_text_edit(id, "Hello"));
        assert_eq!(history.len(), 3);
        assert_eq!(history.text_element(id).map(Text::content), Some("Hello"));
        assert!(history.live_text_id().is_none());
        assert!(history.states()[1].element(id).is_some_and(|e| {
            e.as_text().map(Text::content) == Some(Text::PLACEHOLDER)
        }));
    }

    fn snapshot_text(history: &History, index: usize, id: ElementId) -> Option<&str> {
        history.states()[index]
            .element(id)
            .and_then(DrawingElement::as_text)
            .map(Text::content)
    }

    #[test]
    fn test_live_text_stays_off_other_snapshots() {
        let mut history = History::default();
        let id = history.add_element(DrawingElement::Text(Text::new(Point::ZERO, "Note".to_string())));
        history.add_element(rect());
        assert!(history.update_text_live(id, "Hello"));

        // Undo moves the live text along with the cursor.
        assert!(history.undo());
        assert_eq!(history.text_element(id).map(Text::content), Some("Hello"));
        assert_eq!(snapshot_text(&history, 2, id), Some("Note"));

        assert_eq!(history.discard_live_text(), Some(id));
        assert_eq!(history.text_element(id).map(Text::content), Some("Note"));
        assert!(history.redo());
        assert_eq!(history.text_element(id).map(Text::content), Some("Note"));
    }

    #[test]
    fn test_commit_during_live_text_keeps_committed_content() {
        let mut history = History::default();
        let id = history.add_element(DrawingElement::Text(Text::new(Point::ZERO, "Note".to_string())));
        history.update_text_live(id, "Hello");
        history.add_element(rect());

        assert_eq!(snapshot_text(&history, 1, id), Some("Note"));
        assert_eq!(history.text_element(id).map(Text::content), Some("Hello"));

        history.discard_live_text();
        assert_eq!(snapshot_text(&history, 2, id), Some("Note"));
    }

    #[test]
    fn test_live_text_on_removed_element() {
        let mut history = History::default();
        let id = history.add_element(DrawingElement::Text(Text::new(Point::ZERO, "Note".to_string())));
        history.update_text_live(id, "Hello");
        assert!(history.undo());
        assert!(history.element(id).is_none());

        assert!(history.redo());
        assert_eq!(history.text_element(id).map(Text::content), Some("Hello"));
        history.discard_live_text();
        assert_eq!(history.text_element(id).map(Text::content), Some("Note"));
    }

    #[test]
    fn test_text_ops_reject_non_text() {
        let mut history = History::default();
        let id = history.add_element(rect());
        assert!(!history.update_text_live(id, "x"));
        assert!(!history.finish_text_edit(id, "x"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_undo_keeps_current_config() {
        let mut history = History::default();
        history.add_element(rect());
        history.set_config(ToolConfig::default().with_tool(ToolKind::Circle));
        assert!(history.undo());
        assert_eq!(history.current().config.tool, ToolKind::Circle);
    }
}
