//! Rendering with pluggable backends.
//!
//! This module provides:
//! - A backend-agnostic [`Scene`] built from a chart spec and layout
//! - The [`RenderBackend`] trait and an in-memory [`RecordingBackend`]
//! - Canvas 2D backend

pub mod backend;
pub mod canvas;
pub mod scene;

pub use backend::{RecordingBackend, RenderBackend};
pub use canvas::CanvasRenderer;
pub use scene::{build_scene, Primitive, Scene, TextAlign};

use crate::chart_spec::{ChartSpec, ResolvedLayout};
use crate::error::Result;
use crate::layout::ChartLayout;

/// A spec resolved for one width, with its layout and scene.
#[derive(Debug, Clone)]
pub struct Frame {
    pub resolved: ResolvedLayout,
    pub layout: ChartLayout,
    pub scene: Scene,
}

impl Frame {
    pub fn new(spec: &ChartSpec, width: f64) -> Self {
        let resolved = spec.resolve(width);
        let layout = ChartLayout::compute(spec, &resolved);
        let scene = build_scene(spec, &resolved, &layout);
        Self {
            resolved,
            layout,
            scene,
        }
    }

    /// Size the backend for this frame and paint it.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn paint<B: RenderBackend>(&self, backend: &mut B, dpr: f32) -> Result<()> {
        let dpr_f = f64::from(dpr.max(0.1));
        // Physical size; width and height are positive and far below u32::MAX.
        let w = (self.layout.width * dpr_f).round().max(1.0) as u32;
        let h = (self.layout.height * dpr_f).round().max(1.0) as u32;
        if backend.width() != w || backend.height() != h {
            backend.resize(w, h, dpr);
        }
        backend.render(&self.scene)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chart_spec::build_chart_spec;
    use crate::types::{ChartOptions, DataPoint, DataSet, Value};

    #[test]
    fn paint_sizes_backend_in_physical_pixels() {
        let data = DataSet::new(vec![DataPoint::new(0, 0, Value::Known(1.0))]);
        let spec = build_chart_spec(&data, &ChartOptions::default());
        let frame = Frame::new(&spec, 800.0);
        let mut backend = RecordingBackend::new();
        frame.paint(&mut backend, 2.0).unwrap();
        assert_eq!(backend.width(), 1600);
        assert_eq!(backend.height(), 2000);
        assert_eq!(backend.frames, 1);
        frame.paint(&mut backend, 2.0).unwrap();
        assert_eq!(backend.frames, 2);
    }
}
