//! Rectangle element.

use super::{ElementId, ElementKind, ElementStyle, ElementTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle anchored at the drag origin.
///
/// `width` and `height` keep the sign of the drag: dragging up-left from the
/// anchor yields negative extents. Renderers rely on the sign for mirroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ElementId,
    /// Drag origin.
    pub position: Point,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
    /// Style properties.
    pub style: ElementStyle,
}

impl Rectangle {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            style: ElementStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Recompute the extent from the anchor to the pointer, sign preserved.
    pub fn resize_from(&mut self, anchor: Point, pointer: Point) {
        self.position = anchor;
        self.width = pointer.x - anchor.x;
        self.height = pointer.y - anchor.y;
    }

    /// The corner opposite the origin.
    pub fn far_corner(&self) -> Point {
        Point::new(self.position.x + self.width, self.position.y + self.height)
    }
}

impl ElementTrait for Rectangle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Rectangle
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.position, self.far_corner())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Annotation rectangles are outlines, so only the border is hit.
        let reach = tolerance + self.style.stroke_width / 2.0;
        let rect = self.bounds();
        let outer = rect.inflate(reach, reach);
        let inner = rect.inflate(-reach, -reach);
        outer.contains(point) && !(inner.width() > 0.0 && inner.height() > 0.0 && inner.contains(point))
    }

    fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }
}
