//! Creation tools.

use crate::elements::ElementKind;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Rectangle,
    Circle,
    Arrow,
    Text,
}

impl ToolKind {
    /// The element kind this tool creates, if any.
    pub fn element_kind(&self) -> Option<ElementKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Pen => Some(ElementKind::Pen),
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Circle => Some(ElementKind::Circle),
            ToolKind::Arrow => Some(ElementKind::Arrow),
            ToolKind::Text => Some(ElementKind::Text),
        }
    }

    /// Whether pointer-down/move/up drags out an element with this tool.
    ///
    /// Text is placed by a stage click instead.
    pub fn is_drag_tool(&self) -> bool {
        matches!(
            self,
            ToolKind::Pen | ToolKind::Rectangle | ToolKind::Circle | ToolKind::Arrow
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pen => "pen",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Arrow => "arrow",
            ToolKind::Text => "text",
        }
    }
}
