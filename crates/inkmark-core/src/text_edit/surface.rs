//! Host-side text input surface abstraction.

use crate::elements::SerializableColor;
use kurbo::{Point, Size};

/// Where and how to show the input surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePlacement {
    /// Top-left corner in page coordinates (stage position + stage offset).
    pub position: Point,
    pub font_size: f64,
    pub font_family: String,
    pub color: SerializableColor,
}

/// An editable text input overlaid on the stage (a DOM textarea, an egui
/// text field, ...).
///
/// The coordinator drives the lifecycle: `mount` once, any number of
/// `resize` calls, then `unmount` exactly once before the surface is dropped.
pub trait EditSurface {
    /// Show the surface at `placement`, seeded with `seed` and focused.
    /// When `select_all` is set, the seed is selected so typing replaces it.
    fn mount(&mut self, placement: &SurfacePlacement, seed: &str, select_all: bool);

    /// Fit the surface to its current content.
    fn resize(&mut self, size: Size);

    /// Remove the surface from the page.
    fn unmount(&mut self);
}

/// Creates a fresh surface for each edit session.
pub trait SurfaceFactory {
    fn create(&mut self) -> Box<dyn EditSurface>;
}

