//! Frame building: walks the element collection and dispatches each element
//! to the renderer registered for its kind.

use crate::registry::RendererRegistry;
use crate::scene::Scene;
use inkmark_core::{DrawingElement, ElementId, ElementKind, Engine};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No renderer registered for '{0}'")]
    MissingRenderer(ElementKind),
    #[error("Renderer for '{expected}' received a '{found}' element")]
    KindMismatch {
        expected: ElementKind,
        found: ElementKind,
    },
    #[error("Element {id} ({kind}) has non-finite geometry")]
    NonFiniteGeometry { id: ElementId, kind: ElementKind },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Context for a single render frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Committed elements, back to front.
    pub elements: &'a [DrawingElement],
    /// In-progress element of an active drawing session, drawn on top.
    pub preview: Option<&'a DrawingElement>,
}

impl<'a> RenderContext<'a> {
    pub fn new(elements: &'a [DrawingElement]) -> Self {
        Self {
            elements,
            preview: None,
        }
    }

    /// Context for the engine's visible state, including its live preview.
    pub fn from_engine(engine: &'a Engine) -> Self {
        Self::new(engine.elements()).with_preview(engine.temp_element())
    }

    pub fn with_preview(mut self, preview: Option<&'a DrawingElement>) -> Self {
        self.preview = preview;
        self
    }

    fn visible(&self) -> impl Iterator<Item = &'a DrawingElement> {
        self.elements
            .iter()
            .chain(self.preview)
            .filter(|e| e.is_visible())
    }

    /// Build the frame. Elements whose kind has no renderer, or whose
    /// renderer fails, are logged and skipped.
    pub fn build_scene(&self, registry: &RendererRegistry) -> Scene {
        let mut scene = Scene::new();
        for element in self.visible() {
            if let Err(err) = render_element(registry, element, &mut scene) {
                log::warn!("Skipping element {}: {err}", element.id());
            }
        }
        scene
    }

    /// Build the frame, failing on the first element that cannot be drawn.
    pub fn try_build_scene(&self, registry: &RendererRegistry) -> RenderResult<Scene> {
        let mut scene = Scene::new();
        for element in self.visible() {
            render_element(registry, element, &mut scene)?;
        }
        Ok(scene)
    }
}

/// Dispatch one element. On failure nothing it emitted stays in `scene`.
fn render_element(
    registry: &RendererRegistry,
    element: &DrawingElement,
    scene: &mut Scene,
) -> RenderResult<()> {
    let kind = element.kind();
    let renderer = registry
        .resolve(kind)
        .ok_or(RenderError::MissingRenderer(kind))?;
    let mark = scene.len();
    renderer.render(element, scene).inspect_err(|_| scene.truncate(mark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ElementRenderer;
    use crate::scene::DrawCommand;
    use inkmark_core::elements::{Arrow, Circle, Text};
    use inkmark_core::{ElementPatch, HeadlessSurfaceFactory, ToolKind};
    use kurbo::{BezPath, Point};

    /// Emits one stroke, then fails.
    struct Failing;

    impl ElementRenderer for Failing {
        fn render(&self, element: &DrawingElement, scene: &mut Scene) -> RenderResult<()> {
            scene.stroke(element.id(), BezPath::new(), peniko::Color::BLACK, 1.0);
            Err(RenderError::NonFiniteGeometry {
                id: element.id(),
                kind: element.kind(),
            })
        }
    }

    fn sample() -> Vec<DrawingElement> {
        vec![
            DrawingElement::Circle(Circle::new(Point::new(10.0, 10.0), 5.0)),
            DrawingElement::Text(Text::new(Point::new(0.0, 0.0), "Label".to_string())),
        ]
    }

    #[test]
    fn test_empty_scene() {
        let scene = RenderContext::new(&[]).build_scene(&RendererRegistry::with_defaults());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_z_order_follows_collection() {
        let elements = sample();
        let scene = RenderContext::new(&elements).build_scene(&RendererRegistry::with_defaults());
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.commands()[0].element(), elements[0].id());
        assert!(matches!(scene.commands()[1], DrawCommand::Text { .. }));
    }

    #[test]
    fn test_missing_renderer_is_skipped() {
        let elements = sample();
        let mut registry = RendererRegistry::with_defaults();
        registry.clear();
        registry.register(ElementKind::Text, Box::new(crate::renderers::TextRenderer::default()));

        let ctx = RenderContext::new(&elements);
        let scene = ctx.build_scene(&registry);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.commands()[0].element(), elements[1].id());

        assert!(matches!(
            ctx.try_build_scene(&registry),
            Err(RenderError::MissingRenderer(ElementKind::Circle))
        ));
    }

    #[test]
    fn test_failed_render_leaves_no_partial_output() {
        let elements = sample();
        let mut registry = RendererRegistry::with_defaults();
        registry.register(ElementKind::Circle, Box::new(Failing));
        let scene = RenderContext::new(&elements).build_scene(&registry);
        assert_eq!(scene.len(), 1);
        assert!(scene.commands_for(elements[0].id()).next().is_none());
    }

    #[test]
    fn test_hidden_elements_skipped() {
        let mut elements = sample();
        elements[0].apply_patch(&ElementPatch {
            visible: Some(false),
            ..Default::default()
        });
        let scene = RenderContext::new(&elements).build_scene(&RendererRegistry::with_defaults());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_preview_drawn_last() {
        let elements = sample();
        let preview = DrawingElement::Arrow(Arrow::new(Point::ZERO, Point::new(50.0, 0.0)));
        let scene = RenderContext::new(&elements)
            .with_preview(Some(&preview))
            .build_scene(&RendererRegistry::with_defaults());
        assert_eq!(scene.len(), 5);
        assert_eq!(scene.commands()[2].element(), preview.id());
    }

    #[test]
    fn test_engine_preview_during_drag() {
        let mut engine = Engine::with_surfaces(Box::new(HeadlessSurfaceFactory::new()));
        engine.set_tool(ToolKind::Rectangle);
        engine.pointer_down(Some(Point::new(0.0, 0.0)));
        engine.pointer_move(Some(Point::new(20.0, 20.0)));

        let registry = RendererRegistry::with_defaults();
        let scene = RenderContext::from_engine(&engine).build_scene(&registry);
        assert_eq!(scene.len(), 1);

        engine.pointer_up();
        let ctx = RenderContext::from_engine(&engine);
        assert!(ctx.preview.is_none());
        assert_eq!(ctx.build_scene(&registry).len(), 1);
    }
}
