//! Canvas 2D rendering backend.
//!
//! Paints a [`Scene`](crate::render::Scene) with the HTML Canvas 2D API via
//! web-sys: rectangles, circles, text and the logo image.

mod renderer;

pub use renderer::CanvasRenderer;
