//! InkMark Render Library
//!
//! Kind-indexed renderer registry and the per-frame dispatch loop that turns
//! the element collection into a backend-neutral display list.

mod registry;
mod renderer;
pub mod renderers;
mod scene;

pub use registry::{ElementRenderer, RendererRegistry};
pub use renderer::{RenderContext, RenderError, RenderResult};
pub use scene::{DrawCommand, Scene, TextRun};
