//! Arrow element.

use super::{ElementId, ElementKind, ElementStyle, ElementTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight arrow from `start` to `end` (the head sits at `end`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ElementId,
    /// Start point (the drag origin).
    pub start: Point,
    /// End point, where the arrowhead points.
    pub end: Point,
    /// Style properties.
    pub style: ElementStyle,
}

impl Arrow {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ElementStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// `[start_x, start_y, end_x, end_y]`.
    pub fn points(&self) -> [f64; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }

    /// Unit direction from start to end (zero for coincident endpoints).
    pub fn direction(&self) -> Vec2 {
        let v = self.end - self.start;
        let len = v.hypot();
        if len < f64::EPSILON {
            Vec2::ZERO
        } else {
            v / len
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

impl ElementTrait for Arrow {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Arrow
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        super::point_to_segment_dist(point, self.start, self.end)
            <= tolerance + self.style.stroke_width / 2.0
    }

    fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_layout() {
        let arrow = Arrow::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0));
        assert_eq!(arrow.points(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_direction() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        let dir = arrow.direction();
        assert!((dir.x).abs() < f64::EPSILON);
        assert!((dir.y - 1.0).abs() < f64::EPSILON);
        assert_eq!(Arrow::new(Point::ZERO, Point::ZERO).direction(), Vec2::ZERO);
    }

    #[test]
    fn test_degenerate() {
        assert!(Arrow::new(Point::new(4.0, 4.0), Point::new(4.0, 4.0)).is_degenerate());
        assert!(!Arrow::new(Point::new(4.0, 4.0), Point::new(4.0, 5.0)).is_degenerate());
    }

    #[test]
    fn test_hit_test() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(arrow.hit_test(Point::new(50.0, 2.0), 2.0));
        assert!(!arrow.hit_test(Point::new(50.0, 20.0), 2.0));
    }
}
