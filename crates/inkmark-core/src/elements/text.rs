//! Text element.

use super::{ElementId, ElementKind, ElementStyle, ElementTrait, SerializableColor};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ElementId,
    /// Top-left corner of the text box.
    pub position: Point,
    /// The text content (the placeholder sentinel until real text is committed).
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family name as understood by the host.
    pub font_family: String,
    /// Glyph fill color.
    pub fill: SerializableColor,
    /// Style properties.
    pub style: ElementStyle,
}

impl Text {
    /// Content of a text element nobody has typed into yet.
    pub const PLACEHOLDER: &'static str = "Type here";

    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";

    /// Average glyph advance as a fraction of the font size.
    const CHAR_WIDTH_FACTOR: f64 = 0.6;

    /// Line height as a multiple of the font size.
    const LINE_HEIGHT: f64 = 1.2;

    /// Create a new text element.
    pub fn new(position: Point, content: String) -> Self {
        let style = ElementStyle::default();
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            fill: style.color,
            style,
        }
    }

    /// Create a text element showing the placeholder sentinel.
    pub fn placeholder(position: Point) -> Self {
        Self::new(position, Self::PLACEHOLDER.to_string())
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set stroke style and use its color as the fill.
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.fill = style.color;
        self.style = style;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Whether the element still shows the placeholder sentinel.
    pub fn is_placeholder(&self) -> bool {
        self.content == Self::PLACEHOLDER
    }

    /// Approximate layout size of `content` at `font_size`.
    ///
    /// Widest line times an average advance, by line count times line
    /// height. Never narrower than one em so an empty box stays clickable.
    pub fn measure(content: &str, font_size: f64) -> Size {
        let widest = content
            .split('\n')
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let lines = content.split('\n').count().max(1);
        let width = (widest as f64 * font_size * Self::CHAR_WIDTH_FACTOR).max(font_size);
        let height = lines as f64 * font_size * Self::LINE_HEIGHT;
        Size::new(width, height)
    }
}

impl ElementTrait for Text {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, Self::measure(&self.content, self.font_size))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Text is committed even when it only holds the placeholder.
    fn is_degenerate(&self) -> bool {
        false
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }
}
