//! Freehand pen stroke.

use super::{ElementId, ElementKind, ElementStyle, ElementTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke (polyline through recorded pointer positions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub(crate) id: ElementId,
    /// Recorded points, in pointer order.
    pub points: Vec<Point>,
    /// Style properties.
    pub style: ElementStyle,
}

impl Pen {
    /// Minimum distance between consecutive recorded points.
    pub const DEFAULT_MIN_DISTANCE: f64 = 2.0;

    /// Start a stroke at a single point.
    pub fn new(start: Point) -> Self {
        Self::from_points(vec![start])
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: ElementStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Append `point` unless it lies closer than `min_distance` to the last
    /// recorded point. Returns true if the point was recorded.
    pub fn push_decimated(&mut self, point: Point, min_distance: f64) -> bool {
        if let Some(last) = self.points.last() {
            if last.distance(point) < min_distance {
                return false;
            }
        }
        self.points.push(point);
        true
    }

    /// Points as a flat `[x0, y0, x1, y1, ...]` sequence.
    pub fn flattened(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ElementTrait for Pen {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Pen
    }

    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |acc, p| {
                acc.union_pt(*p)
            })
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.style.stroke_width / 2.0;
        match self.points.as_slice() {
            [] => false,
            [only] => only.distance(point) <= reach,
            points => points
                .windows(2)
                .any(|w| super::point_to_segment_dist(point, w[0], w[1]) <= reach),
        }
    }

    fn is_degenerate(&self) -> bool {
        // A stroke needs two distinct recorded points.
        match self.points.first() {
            Some(first) => !self.points.iter().any(|p| p != first),
            None => true,
        }
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }
}
