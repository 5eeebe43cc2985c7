//! Drawable element definitions.

mod arrow;
mod circle;
mod pen;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use circle::Circle;
pub use pen::Pen;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn red() -> Self {
        Self::new(255, 0, 0, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some(Self::new(rgb[0], rgb[1], rgb[2], 255))
            }
            6 => Some(Self::new(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
                255,
            )),
            8 => Some(Self::new(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
                channel(hex.get(6..8)?)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by every element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke width in pixels.
    pub stroke_width: f64,
    /// Hidden elements stay in the collection but are not rendered.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl ElementStyle {
    pub fn new(color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            color,
            stroke_width,
            visible: true,
        }
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self::new(SerializableColor::red(), 2.0)
    }
}

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Discriminant of a [`DrawingElement`], used as the renderer lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Pen,
    Rectangle,
    Circle,
    Arrow,
    Text,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Pen => "pen",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Arrow => "arrow",
            ElementKind::Text => "text",
        }
    }

    pub fn all() -> &'static [ElementKind] {
        &[
            ElementKind::Pen,
            ElementKind::Rectangle,
            ElementKind::Circle,
            ElementKind::Arrow,
            ElementKind::Text,
        ]
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    proj.distance(point)
}

/// Common trait for all elements.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// Get the kind discriminant.
    fn kind(&self) -> ElementKind;

    /// Get the normalized bounding box in stage coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in stage coordinates) hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Whether the element is too small to be worth committing.
    fn is_degenerate(&self) -> bool;

    fn style(&self) -> &ElementStyle;

    fn style_mut(&mut self) -> &mut ElementStyle;
}

/// Partial update applied by [`crate::history::History::update_element`].
///
/// `None` fields are left untouched. `font_size` only applies to text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    pub color: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub visible: Option<bool>,
    pub font_size: Option<f64>,
}

impl ElementPatch {
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.stroke_width.is_none()
            && self.visible.is_none()
            && self.font_size.is_none()
    }
}

/// Enum wrapper over every drawable kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawingElement {
    Pen(Pen),
    Rectangle(Rectangle),
    Circle(Circle),
    Arrow(Arrow),
    Text(Text),
}

impl DrawingElement {
    pub fn id(&self) -> ElementId {
        self.as_trait().id()
    }

    pub fn kind(&self) -> ElementKind {
        self.as_trait().kind()
    }

    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_trait().hit_test(point, tolerance)
    }

    pub fn is_degenerate(&self) -> bool {
        self.as_trait().is_degenerate()
    }

    pub fn style(&self) -> &ElementStyle {
        self.as_trait().style()
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        match self {
            DrawingElement::Pen(e) => e.style_mut(),
            DrawingElement::Rectangle(e) => e.style_mut(),
            DrawingElement::Circle(e) => e.style_mut(),
            DrawingElement::Arrow(e) => e.style_mut(),
            DrawingElement::Text(e) => e.style_mut(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.style().visible
    }

    fn as_trait(&self) -> &dyn ElementTrait {
        match self {
            DrawingElement::Pen(e) => e,
            DrawingElement::Rectangle(e) => e,
            DrawingElement::Circle(e) => e,
            DrawingElement::Arrow(e) => e,
            DrawingElement::Text(e) => e,
        }
    }

    /// Recompute in-progress geometry from the pointer position.
    ///
    /// `anchor` is where the session started. Pen points closer than
    /// `pen_min_distance` to the last recorded point are dropped. Text has
    /// no drag geometry. Returns true if the element changed.
    pub fn drag_to(&mut self, anchor: Point, pointer: Point, pen_min_distance: f64) -> bool {
        match self {
            DrawingElement::Pen(pen) => pen.push_decimated(pointer, pen_min_distance),
            DrawingElement::Rectangle(rect) => {
                rect.resize_from(anchor, pointer);
                true
            }
            DrawingElement::Circle(circle) => {
                circle.resize_from(anchor, pointer);
                true
            }
            DrawingElement::Arrow(arrow) => {
                arrow.start = anchor;
                arrow.end = pointer;
                true
            }
            DrawingElement::Text(_) => false,
        }
    }

    /// Apply a partial patch. Returns true if any field changed.
    pub fn apply_patch(&mut self, patch: &ElementPatch) -> bool {
        let before = self.clone();
        let style = self.style_mut();
        if let Some(color) = patch.color {
            style.color = color;
        }
        if let Some(width) = patch.stroke_width {
            style.stroke_width = width.max(0.0);
        }
        if let Some(visible) = patch.visible {
            style.visible = visible;
        }
        if let DrawingElement::Text(text) = self {
            if let Some(color) = patch.color {
                text.fill = color;
            }
            if let Some(size) = patch.font_size {
                text.font_size = size;
            }
        }
        *self != before
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            DrawingElement::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            DrawingElement::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DrawingElement::Text(_))
    }
}
