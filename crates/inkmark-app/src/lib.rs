//! InkMark Application
//!
//! Command-line shell: wires an engine to the default renderer registry,
//! replays a scripted annotation session and reports the resulting frame.

mod app;
mod script;

pub use app::{App, AppConfig, AppError, FrameReport};
pub use script::{Script, Step};
