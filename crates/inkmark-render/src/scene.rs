//! Backend-neutral display list.

use inkmark_core::ElementId;
use kurbo::{BezPath, Point, Rect, Shape};
use peniko::Color;

/// A text run as it should be laid out by the backend.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub position: Point,
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    pub color: Color,
    pub italic: bool,
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
}

/// One drawing instruction, tagged with the element that produced it.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Stroke {
        element: ElementId,
        path: BezPath,
        color: Color,
        width: f64,
    },
    Text { element: ElementId, run: TextRun },
}

impl DrawCommand {
    pub fn element(&self) -> ElementId {
        match self {
            DrawCommand::Stroke { element, .. } | DrawCommand::Text { element, .. } => *element,
        }
    }

    /// Approximate extent (text uses the same metrics as the edit surface).
    pub fn bounds(&self) -> Rect {
        match self {
            DrawCommand::Stroke { path, width, .. } => {
                let half = width / 2.0;
                path.bounding_box().inflate(half, half)
            }
            DrawCommand::Text { run, .. } => Rect::from_origin_size(
                run.position,
                inkmark_core::elements::Text::measure(&run.content, run.font_size),
            ),
        }
    }
}

/// Ordered list of draw commands for one frame.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stroke(&mut self, element: ElementId, path: BezPath, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            element,
            path,
            color,
            width,
        });
    }

    pub fn text(&mut self, element: ElementId, run: TextRun) {
        self.commands.push(DrawCommand::Text { element, run });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands emitted for `element`, in order.
    pub fn commands_for(&self, element: ElementId) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.element() == element)
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.commands.truncate(len);
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}
