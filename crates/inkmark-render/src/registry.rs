//! Element kind → renderer lookup.

use crate::renderer::RenderResult;
use crate::renderers;
use crate::scene::Scene;
use inkmark_core::{DrawingElement, ElementKind};
use std::collections::HashMap;

/// Turns one element into draw commands.
pub trait ElementRenderer {
    fn render(&self, element: &DrawingElement, scene: &mut Scene) -> RenderResult<()>;
}

/// Maps each element kind to its renderer. Adding a kind means registering a
/// renderer here; the frame loop never changes.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<ElementKind, Box<dyn ElementRenderer>>,
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in renderer for every element kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ElementKind::Pen, Box::new(renderers::PenRenderer));
        registry.register(ElementKind::Rectangle, Box::new(renderers::RectangleRenderer));
        registry.register(ElementKind::Circle, Box::new(renderers::CircleRenderer));
        registry.register(ElementKind::Arrow, Box::new(renderers::ArrowRenderer));
        registry.register(ElementKind::Text, Box::new(renderers::TextRenderer::default()));
        registry
    }

    /// Register `renderer` for `kind`. Replacing an existing renderer is
    /// allowed (last writer wins) but logged.
    pub fn register(&mut self, kind: ElementKind, renderer: Box<dyn ElementRenderer>) {
        if self.renderers.insert(kind, renderer).is_some() {
            log::warn!("Renderer for '{kind}' replaced");
        }
    }

    pub fn resolve(&self, kind: ElementKind) -> Option<&dyn ElementRenderer> {
        self.renderers.get(&kind).map(|r| r.as_ref())
    }

    pub fn is_registered(&self, kind: ElementKind) -> bool {
        self.renderers.contains_key(&kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<ElementKind> {
        let mut kinds: Vec<_> = self.renderers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.renderers.clear();
    }
}
