//! Pointer-driven drawing session state machine.
//!
//! `Idle → Drawing → Idle`. A session id is held for the whole drag and acts
//! as the re-entrancy guard: a second pointer-down while one is held is
//! ignored. Pointer-up always returns to `Idle`, whether the element is
//! committed or discarded.

use crate::config::ToolConfig;
use crate::elements::{Arrow, Circle, DrawingElement, Pen, Rectangle};
use crate::tools::ToolKind;
use kurbo::Point;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one pointer-down..pointer-up interval.
pub type SessionId = u64;

fn next_session_id() -> SessionId {
    static SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);
    SESSION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// State of the drawing session.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A drag is creating `element`.
    Drawing {
        id: SessionId,
        /// Pointer-down position.
        anchor: Point,
        /// The transient, not yet committed element.
        element: DrawingElement,
    },
}

/// Turns a pointer stream into a single element per session.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    state: SessionState,
    pen_min_distance: f64,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new(Pen::DEFAULT_MIN_DISTANCE)
    }
}

impl DrawingSession {
    pub fn new(pen_min_distance: f64) -> Self {
        Self {
            state: SessionState::Idle,
            pen_min_distance,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, SessionState::Drawing { .. })
    }

    pub fn session_id(&self) -> Option<SessionId> {
        match &self.state {
            SessionState::Drawing { id, .. } => Some(*id),
            SessionState::Idle => None,
        }
    }

    /// The in-progress element, for live preview.
    pub fn temp_element(&self) -> Option<&DrawingElement> {
        match &self.state {
            SessionState::Drawing { element, .. } => Some(element),
            SessionState::Idle => None,
        }
    }

    /// Pointer-down. Starts a session with a zero-extent element for the
    /// configured tool. Returns false when nothing started: no position,
    /// a session already active, or a tool that does not drag.
    pub fn begin(&mut self, position: Option<Point>, config: &ToolConfig) -> bool {
        let Some(position) = position else {
            return false;
        };
        if let Some(active) = self.session_id() {
            log::debug!("Pointer-down ignored, session {active} still active");
            return false;
        }
        let Some(element) = seed_element(config, position) else {
            return false;
        };
        let id = next_session_id();
        log::debug!(
            "Session {id} started: {} at ({}, {})",
            config.tool.name(),
            position.x,
            position.y
        );
        self.state = SessionState::Drawing {
            id,
            anchor: position,
            element,
        };
        true
    }

    /// Pointer-move. Applies the tool's geometry rule to the transient
    /// element. Returns true if the element changed.
    pub fn update(&mut self, position: Option<Point>) -> bool {
        let Some(position) = position else {
            return false;
        };
        match &mut self.state {
            SessionState::Drawing {
                anchor, element, ..
            } => element.drag_to(*anchor, position, self.pen_min_distance),
            SessionState::Idle => false,
        }
    }

    /// Pointer-up. Ends the session and returns the element if it is worth
    /// committing. The session is released on every path.
    pub fn finish(&mut self) -> Option<DrawingElement> {
        match std::mem::take(&mut self.state) {
            SessionState::Drawing { id, element, .. } => {
                if element.is_degenerate() {
                    log::debug!("Session {id} discarded degenerate {}", element.kind());
                    None
                } else {
                    log::debug!("Session {id} finished with {}", element.kind());
                    Some(element)
                }
            }
            SessionState::Idle => None,
        }
    }

    /// Release the session without producing an element.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            SessionState::Drawing { id, .. } => {
                log::debug!("Session {id} cancelled");
                true
            }
            SessionState::Idle => false,
        }
    }
}

/// Zero-extent element for `config.tool` at `at`.
fn seed_element(config: &ToolConfig, at: Point) -> Option<DrawingElement> {
    let style = config.element_style();
    let element = match config.tool {
        ToolKind::Pen => DrawingElement::Pen(Pen::new(at).with_style(style)),
        ToolKind::Rectangle => {
            DrawingElement::Rectangle(Rectangle::new(at, 0.0, 0.0).with_style(style))
        }
        ToolKind::Circle => DrawingElement::Circle(Circle::new(at, 0.0).with_style(style)),
        ToolKind::Arrow => DrawingElement::Arrow(Arrow::new(at, at).with_style(style)),
        ToolKind::Select | ToolKind::Text => return None,
    };
    Some(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;

    fn config(tool: ToolKind) -> ToolConfig {
        ToolConfig::default().with_tool(tool)
    }

    #[test]
    fn test_select_tool_does_not_start() {
        let mut session = DrawingSession::default();
        assert!(!session.begin(Some(Point::ZERO), &config(ToolKind::Select)));
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_missing_position_is_noop() {
        let mut session = DrawingSession::default();
        assert!(!session.begin(None, &config(ToolKind::Rectangle)));
        assert!(session.session_id().is_none());

        assert!(session.begin(Some(Point::ZERO), &config(ToolKind::Rectangle)));
        let before = session.temp_element().cloned();
        assert!(!session.update(None));
        assert_eq!(session.temp_element().cloned(), before);
    }

    #[test]
    fn test_reentrant_begin_ignored() {
        let mut session = DrawingSession::default();
        assert!(session.begin(Some(Point::ZERO), &config(ToolKind::Rectangle)));
        let id = session.session_id();
        assert!(!session.begin(Some(Point::new(9.0, 9.0)), &config(ToolKind::Circle)));
        assert_eq!(session.session_id(), id);
        assert_eq!(
            session.temp_element().map(DrawingElement::kind),
            Some(ElementKind::Rectangle)
        );
    }

    #[test]
    fn test_seeded_elements_are_degenerate() {
        for tool in [ToolKind::Pen, ToolKind::Rectangle, ToolKind::Circle, ToolKind::Arrow] {
            let mut session = DrawingSession::default();
            assert!(session.begin(Some(Point::new(3.0, 3.0)), &config(tool)));
            assert!(session.temp_element().is_some_and(DrawingElement::is_degenerate));
            assert!(session.finish().is_none());
            assert!(!session.is_drawing());
        }
    }

    #[test]
    fn test_seed_uses_config_style() {
        let mut session = DrawingSession::default();
        let mut cfg = config(ToolKind::Arrow);
        cfg.stroke_width = 7.0;
        assert!(session.begin(Some(Point::ZERO), &cfg));
        let width = session.temp_element().map(|e| e.style().stroke_width);
        assert_eq!(width, Some(7.0));
    }

    #[test]
    fn test_finish_releases_session() {
        let mut session = DrawingSession::default();
        assert!(session.begin(Some(Point::ZERO), &config(ToolKind::Arrow)));
        assert!(session.update(Some(Point::new(10.0, 0.0))));
        let element = session.finish();
        assert!(element.is_some());
        assert!(session.session_id().is_none());
        assert!(session.temp_element().is_none());
        assert!(session.finish().is_none());
    }

    #[test]
    fn test_session_ids_are_fresh() {
        let mut session = DrawingSession::default();
        assert!(session.begin(Some(Point::ZERO), &config(ToolKind::Pen)));
        let first = session.session_id();
        assert!(session.cancel());
        assert!(!session.cancel());
        assert!(session.begin(Some(Point::ZERO), &config(ToolKind::Pen)));
        assert_ne!(session.session_id(), first);
    }
}
