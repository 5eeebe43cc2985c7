//! InkMark Core Library
//!
//! Platform-agnostic drawing model and interaction logic for the InkMark
//! annotation engine: elements, pointer sessions, undo/redo history and
//! text edit coordination.

pub mod config;
pub mod elements;
pub mod engine;
pub mod history;
pub mod session;
pub mod text_edit;
pub mod tools;

pub use config::{ConfigError, EngineOptions, ToolConfig};
pub use elements::{DrawingElement, ElementId, ElementKind, ElementPatch, ElementStyle, SerializableColor};
pub use engine::{ClickOutcome, Engine};
pub use history::{DrawingState, History};
pub use session::{DrawingSession, SessionId, SessionState};
pub use text_edit::{
    EditKey, EditOutcome, EditSurface, HeadlessSurfaceFactory, SurfaceFactory, SurfacePlacement,
    TextEditCoordinator, TextEditingState,
};
pub use tools::ToolKind;
