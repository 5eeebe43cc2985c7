//! Built-in renderers, one per element kind.

use crate::registry::ElementRenderer;
use crate::renderer::{RenderError, RenderResult};
use crate::scene::{Scene, TextRun};
use inkmark_core::elements::Arrow;
use inkmark_core::{DrawingElement, ElementKind};
use kurbo::{BezPath, Point, Shape};
use peniko::Color;

/// Curve flattening tolerance for circles.
const PATH_TOLERANCE: f64 = 0.1;

fn mismatch(expected: ElementKind, element: &DrawingElement) -> RenderError {
    RenderError::KindMismatch {
        expected,
        found: element.kind(),
    }
}

fn ensure_finite(element: &DrawingElement, values: &[f64]) -> RenderResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(RenderError::NonFiniteGeometry {
            id: element.id(),
            kind: element.kind(),
        })
    }
}

fn stroke_color(element: &DrawingElement) -> Color {
    element.style().color.into()
}

/// Polyline through the recorded points.
#[derive(Debug, Clone, Copy, Default)]
pub struct PenRenderer;

impl ElementRenderer for PenRenderer {
    fn render(&self, element: &DrawingElement, scene: &mut Scene) -> RenderResult<()> {
        let DrawingElement::Pen(pen) = element else {
            return Err(mismatch(ElementKind::Pen, element));
        };
        ensure_finite(element, &pen.flattened())?;
        let Some((first, rest)) = pen.points.split_first() else {
            return Ok(());
        };

        let mut path = BezPath::new();
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        scene.stroke(element.id(), path, stroke_color(element), pen.style.stroke_width);
        Ok(())
    }
}

/// Outline from the anchor corner, honoring negative extents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectangleRenderer;

impl ElementRenderer for RectangleRenderer {
    fn render(&self, element: &DrawingElement, scene: &mut Scene) -> RenderResult<()> {
        let DrawingElement::Rectangle(rect) = element else {
            return Err(mismatch(ElementKind::Rectangle, element));
        };
        let origin = rect.position;
        ensure_finite(element, &[origin.x, origin.y, rect.width, rect.height])?;

        let mut path = BezPath::new();
        path.move_to(origin);
        path.line_to((origin.x + rect.width, origin.y));
        path.line_to((origin.x + rect.width, origin.y + rect.height));
        path.line_to((origin.x, origin.y + rect.height));
        path.close_path();
        scene.stroke(element.id(), path, stroke_color(element), rect.style.stroke_width);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CircleRenderer;

impl ElementRenderer for CircleRenderer {
    fn render(&self, element: &DrawingElement, scene: &mut Scene) -> RenderResult<()> {
        let DrawingElement::Circle(circle) = element else {
            return Err(mismatch(ElementKind::Circle, element));
        };
        ensure_finite(element, &[circle.center.x, circle.center.y, circle.radius])?;
        let path = kurbo::Circle::new(circle.center, circle.radius).to_path(PATH_TOLERANCE);
        scene.stroke(element.id(), path, stroke_color(element), circle.style.stroke_width);
        Ok(())
    }
}

/// Shaft plus an open two-stroke head at `end`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrowRenderer;

impl ArrowRenderer {
    /// Head length never drops below this, however thin the stroke.
    pub const MIN_HEAD_LENGTH: f64 = 10.0;
    pub const HEAD_LENGTH_PER_WIDTH: f64 = 4.0;

    pub fn head_length(stroke_width: f64) -> f64 {
        (stroke_width * Self::HEAD_LENGTH_PER_WIDTH).max(Self::MIN_HEAD_LENGTH)
    }

    /// The two barb tips, or `None` for a zero-length arrow.
    pub fn head_points(arrow: &Arrow) -> Option<(Point, Point)> {
        let dir = arrow.direction();
        if dir == kurbo::Vec2::ZERO {
            return None;
        }
        let size = Self::head_length(arrow.style.stroke_width);
        let perp = kurbo::Vec2::new(-dir.y, dir.x);
        let back = arrow.end - dir * size;
        Some((back + perp * size * 0.5, back - perp * size * 0.5))
    }
}

impl ElementRenderer for ArrowRenderer {
    fn render(&self, element: &DrawingElement, scene: &mut Scene) -> RenderResult<()> {
        let DrawingElement::Arrow(arrow) = element else {
            return Err(mismatch(ElementKind::Arrow, element));
        };
        ensure_finite(element, &arrow.points())?;
        let color = stroke_color(element);
        let width = arrow.style.stroke_width;

        let mut shaft = BezPath::new();
        shaft.move_to(arrow.start);
        shaft.line_to(arrow.end);
        scene.stroke(element.id(), shaft, color, width);

        if let Some((left, right)) = Self::head_points(arrow) {
            for barb in [left, right] {
                let mut head = BezPath::new();
                head.move_to(barb);
                head.line_to(arrow.end);
                scene.stroke(element.id(), head, color, width);
            }
        }
        Ok(())
    }
}

/// Text runs. The placeholder is drawn muted, italic and translucent.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    pub placeholder_color: Color,
    pub placeholder_opacity: f32,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            placeholder_color: Color::from_rgba8(136, 136, 136, 255),
            placeholder_opacity: 0.6,
        }
    }
}

impl ElementRenderer for TextRenderer {
    fn render(&self, element: &DrawingElement, scene: &mut Scene) -> RenderResult<()> {
        let DrawingElement::Text(text) = element else {
            return Err(mismatch(ElementKind::Text, element));
        };
        ensure_finite(element, &[text.position.x, text.position.y, text.font_size])?;

        let placeholder = text.is_placeholder();
        let run = TextRun {
            position: text.position,
            content: text.content().to_string(),
            font_size: text.font_size,
            font_family: text.font_family.clone(),
            color: if placeholder {
                self.placeholder_color
            } else {
                text.fill.into()
            },
            italic: placeholder,
            opacity: if placeholder { self.placeholder_opacity } else { 1.0 },
        };
        scene.text(element.id(), run);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawCommand;
    use inkmark_core::elements::{Circle, Pen, Rectangle, Text};
    use inkmark_core::{ElementPatch, SerializableColor};
    use kurbo::PathEl;

    fn render(renderer: &dyn ElementRenderer, element: &DrawingElement) -> Scene {
        let mut scene = Scene::new();
        renderer.render(element, &mut scene).expect("render");
        scene
    }

    fn stroke_points(command: &DrawCommand) -> Vec<Point> {
        let DrawCommand::Stroke { path, .. } = command else {
            panic!("expected a stroke");
        };
        path.elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_pen_polyline() {
        let pen = Pen::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
        ]);
        let scene = render(&PenRenderer, &DrawingElement::Pen(pen));
        assert_eq!(scene.len(), 1);
        assert_eq!(
            stroke_points(&scene.commands()[0]),
            vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)]
        );
    }

    #[test]
    fn test_rectangle_keeps_anchor_and_sign() {
        let rect = Rectangle::new(Point::new(10.0, 10.0), -5.0, -5.0);
        let scene = render(&RectangleRenderer, &DrawingElement::Rectangle(rect));
        let points = stroke_points(&scene.commands()[0]);
        assert_eq!(points[0], Point::new(10.0, 10.0));
        assert_eq!(points[2], Point::new(5.0, 5.0));
        let bounds = scene.commands()[0].bounds();
        assert!((bounds.x0 - 4.0).abs() < 1e-9);
        assert!((bounds.x1 - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_extent() {
        let circle = Circle::new(Point::new(20.0, 20.0), 5.0);
        let scene = render(&CircleRenderer, &DrawingElement::Circle(circle));
        let bounds = scene.commands()[0].bounds();
        assert!((bounds.width() - 12.0).abs() < 1e-3);
    }

    #[test]
    fn test_arrow_head_strokes() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let element = DrawingElement::Arrow(arrow.clone());
        let scene = render(&ArrowRenderer, &element);
        assert_eq!(scene.len(), 3);

        let (left, right) = ArrowRenderer::head_points(&arrow).expect("non-degenerate");
        assert!((left.x - 90.0).abs() < 1e-9);
        assert!((left.y - 5.0).abs() < 1e-9);
        assert!((right.y + 5.0).abs() < 1e-9);
        assert_eq!(stroke_points(&scene.commands()[1]), vec![left, Point::new(100.0, 0.0)]);
    }

    #[test]
    fn test_head_scales_with_width() {
        assert!((ArrowRenderer::head_length(1.0) - 10.0).abs() < f64::EPSILON);
        assert!((ArrowRenderer::head_length(5.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_length_arrow_has_no_head() {
        let arrow = Arrow::new(Point::new(3.0, 3.0), Point::new(3.0, 3.0));
        let scene = render(&ArrowRenderer, &DrawingElement::Arrow(arrow));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_placeholder_text_is_muted() {
        let renderer = TextRenderer::default();
        let scene = render(&renderer, &DrawingElement::Text(Text::placeholder(Point::ZERO)));
        let DrawCommand::Text { run, .. } = &scene.commands()[0] else {
            panic!("expected text");
        };
        assert!(run.italic);
        assert!(run.opacity < 1.0);
        assert_eq!(run.content, Text::PLACEHOLDER);
    }

    #[test]
    fn test_committed_text_uses_fill() {
        let mut text = Text::new(Point::new(1.0, 2.0), "Done".to_string());
        text.fill = SerializableColor::black();
        let scene = render(&TextRenderer::default(), &DrawingElement::Text(text));
        let DrawCommand::Text { run, .. } = &scene.commands()[0] else {
            panic!("expected text");
        };
        assert!(!run.italic);
        assert!((run.opacity - 1.0).abs() < f32::EPSILON);
        assert_eq!(SerializableColor::from(run.color), SerializableColor::black());
    }

    #[test]
    fn test_recolored_text_draws_new_color() {
        let mut element = DrawingElement::Text(Text::new(Point::ZERO, "Done".to_string()));
        let patch = ElementPatch {
            color: Some(SerializableColor::black()),
            ..Default::default()
        };
        assert!(element.apply_patch(&patch));
        let scene = render(&TextRenderer::default(), &element);
        let DrawCommand::Text { run, .. } = &scene.commands()[0] else {
            panic!("expected text");
        };
        assert_eq!(SerializableColor::from(run.color), SerializableColor::black());
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let element = DrawingElement::Circle(Circle::new(Point::ZERO, 1.0));
        let mut scene = Scene::new();
        let err = PenRenderer.render(&element, &mut scene).unwrap_err();
        assert!(matches!(
            err,
            RenderError::KindMismatch {
                expected: ElementKind::Pen,
                found: ElementKind::Circle
            }
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_non_finite_geometry() {
        let element = DrawingElement::Circle(Circle::new(Point::new(f64::NAN, 0.0), 1.0));
        let mut scene = Scene::new();
        assert!(matches!(
            CircleRenderer.render(&element, &mut scene),
            Err(RenderError::NonFiniteGeometry { .. })
        ));
    }
}
