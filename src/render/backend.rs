//! Render backend trait for pluggable rendering implementations.
//!
//! This module defines the `RenderBackend` trait that abstracts painting a
//! [`Scene`], allowing the Canvas 2D backend and an in-memory recorder to be
//! used interchangeably.

use crate::error::Result;

use super::scene::Scene;

/// Trait for render backends
///
/// Implementations handle the actual drawing operations for different
/// rendering technologies (Canvas 2D, in-memory recording, ...)
pub trait RenderBackend {
    /// Resize the render surface (physical pixels)
    fn resize(&mut self, width: u32, height: u32, dpr: f32);

    /// Paint a frame
    fn render(&mut self, scene: &Scene) -> Result<()>;

    /// Get the current width
    fn width(&self) -> u32;

    /// Get the current height
    fn height(&self) -> u32;
}

/// Backend that keeps the last scene instead of drawing it.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    width: u32,
    height: u32,
    dpr: f32,
    pub frames: usize,
    pub last: Option<Scene>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }
}

impl RenderBackend for RecordingBackend {
    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        self.frames += 1;
        self.last = Some(scene.clone());
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
