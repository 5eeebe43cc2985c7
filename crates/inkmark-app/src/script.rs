//! Scripted input sessions.
//!
//! A script is a JSON list of host events, replayed against an engine with a
//! virtual clock:
//! ```json
//! { "steps": [
//!   { "type": "tool", "tool": "rectangle" },
//!   { "type": "down", "x": 10, "y": 10 },
//!   { "type": "move", "x": 60, "y": 40 },
//!   { "type": "up" }
//! ] }
//! ```

use inkmark_core::{EditKey, Engine, ToolKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// One host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Tool { tool: ToolKind },
    Color { hex: String },
    StrokeWidth { width: f64 },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    /// Pointer left the stage.
    Leave,
    Click { x: f64, y: f64 },
    /// Advance the virtual clock, running deferred work.
    Wait { ms: u64 },
    /// The edit surface's value became `text`.
    Input { text: String },
    Enter {
        #[serde(default)]
        shift: bool,
    },
    Escape,
    Blur,
    Undo,
    Redo,
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A short session touching every tool, an edit, an undo and a redo.
    pub fn demo() -> Self {
        use Step::*;
        Self {
            steps: vec![
                Tool { tool: ToolKind::Pen },
                Down { x: 20.0, y: 20.0 },
                Move { x: 24.0, y: 22.0 },
                Move { x: 25.0, y: 22.5 },
                Move { x: 30.0, y: 28.0 },
                Up,
                Tool { tool: ToolKind::Rectangle },
                Down { x: 120.0, y: 120.0 },
                Move { x: 80.0, y: 90.0 },
                Up,
                Tool { tool: ToolKind::Circle },
                Color { hex: "#1e88e5".to_string() },
                Down { x: 200.0, y: 60.0 },
                Move { x: 230.0, y: 100.0 },
                Up,
                Tool { tool: ToolKind::Arrow },
                StrokeWidth { width: 4.0 },
                Down { x: 40.0, y: 200.0 },
                Move { x: 160.0, y: 140.0 },
                Up,
                Tool { tool: ToolKind::Text },
                Click { x: 60.0, y: 240.0 },
                Wait { ms: 60 },
                Input { text: "Check".to_string() },
                Input { text: "Check this".to_string() },
                Enter { shift: false },
                Undo,
                Redo,
            ],
        }
    }

    /// Replay every step against `engine`. Returns the number of steps that
    /// changed something.
    pub fn replay(&self, engine: &mut Engine) -> usize {
        let mut clock = Instant::now();
        self.steps
            .iter()
            .filter(|step| apply(step, engine, &mut clock))
            .count()
    }
}

fn apply(step: &Step, engine: &mut Engine, clock: &mut Instant) -> bool {
    log::debug!("Replaying {step:?}");
    match step {
        Step::Tool { tool } => {
            engine.set_tool(*tool);
            true
        }
        Step::Color { hex } => match inkmark_core::SerializableColor::from_hex(hex) {
            Some(color) => {
                engine.set_color(color);
                true
            }
            None => {
                log::warn!("Ignoring invalid color '{hex}'");
                false
            }
        },
        Step::StrokeWidth { width } => {
            engine.set_stroke_width(*width);
            true
        }
        Step::Down { x, y } => engine.pointer_down(Some(Point::new(*x, *y))),
        Step::Move { x, y } => engine.pointer_move(Some(Point::new(*x, *y))),
        Step::Up => engine.pointer_up().is_some(),
        Step::Leave => engine.cancel_drawing(),
        Step::Click { x, y } => {
            engine.stage_click(Some(Point::new(*x, *y)), *clock) != inkmark_core::ClickOutcome::Ignored
        }
        Step::Wait { ms } => {
            *clock += Duration::from_millis(*ms);
            engine.poll(*clock)
        }
        Step::Input { text } => engine.text_input(text),
        Step::Enter { shift } => changed(engine.text_key(EditKey::Enter { shift: *shift })),
        Step::Escape => changed(engine.text_key(EditKey::Escape)),
        Step::Blur => changed(engine.text_blur()),
        Step::Undo => engine.undo(),
        Step::Redo => engine.redo(),
    }
}

fn changed(outcome: inkmark_core::EditOutcome) -> bool {
    use inkmark_core::EditOutcome;
    matches!(
        outcome,
        EditOutcome::Committed { .. } | EditOutcome::Cancelled { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkmark_core::{DrawingElement, HeadlessSurfaceFactory};

    fn engine() -> Engine {
        Engine::with_surfaces(Box::new(HeadlessSurfaceFactory::new()))
    }

    #[test]
    fn test_parse_script() {
        let json = r##"{ "steps": [
            { "type": "tool", "tool": "circle" },
            { "type": "down", "x": 0, "y": 0 },
            { "type": "move", "x": 3, "y": 4 },
            { "type": "up" },
            { "type": "enter" },
            { "type": "color", "hex": "#000" }
        ] }"##;
        let script = Script::from_json(json).expect("valid script");
        assert_eq!(script.steps.len(), 6);
        assert_eq!(script.steps[0], Step::Tool { tool: ToolKind::Circle });
        assert_eq!(script.steps[4], Step::Enter { shift: false });
    }

    #[test]
    fn test_reject_unknown_step() {
        assert!(Script::from_json(r#"{ "steps": [{ "type": "teleport" }] }"#).is_err());
    }

    #[test]
    fn test_demo_builds_every_kind() {
        let mut engine = engine();
        Script::demo().replay(&mut engine);

        let kinds: Vec<_> = engine.elements().iter().map(DrawingElement::kind).collect();
        assert_eq!(kinds.len(), 5);
        assert!(!engine.text_editing().has_active_edit);
        assert!(!engine.can_redo());

        let text = engine.elements()[4].as_text().expect("text last");
        assert_eq!(text.content(), "Check this");
    }

    #[test]
    fn test_wait_runs_deferred_edit() {
        let click = vec![
            Step::Tool { tool: ToolKind::Text },
            Step::Click { x: 5.0, y: 5.0 },
            Step::Wait { ms: 10 },
        ];
        let mut early = engine();
        Script { steps: click.clone() }.replay(&mut early);
        assert!(early.has_pending_edit());
        assert!(!early.text_editing().has_active_edit);

        let mut late = engine();
        let mut steps = click;
        steps.push(Step::Wait { ms: 40 });
        Script { steps }.replay(&mut late);
        assert!(!late.has_pending_edit());
        assert!(late.text_editing().has_active_edit);
    }

    #[test]
    fn test_leave_discards_drag() {
        let mut engine = engine();
        let script = Script {
            steps: vec![
                Step::Tool { tool: ToolKind::Arrow },
                Step::Down { x: 0.0, y: 0.0 },
                Step::Move { x: 10.0, y: 0.0 },
                Step::Leave,
                Step::Up,
            ],
        };
        assert_eq!(script.replay(&mut engine), 4);
        assert!(engine.elements().is_empty());
    }
}
