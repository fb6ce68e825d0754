//! Canvas 2D rendering backend.
//!
//! Implements the RenderBackend trait using HTML Canvas 2D API via web-sys.

use std::collections::HashMap;
use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::error::{Result, TileMapError};
use crate::render::backend::RenderBackend;
use crate::render::scene::{Primitive, Scene};

/// Canvas 2D renderer implementing the RenderBackend trait
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    pub(crate) ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    dpr: f32,
    /// Cache for loaded images (key: image src)
    image_cache: HashMap<String, HtmlImageElement>,
}

impl CanvasRenderer {
    /// Create a new Canvas renderer from an HtmlCanvasElement
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| TileMapError::Render("Failed to get 2d context".into()))?
            .ok_or_else(|| TileMapError::Render("No 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| TileMapError::Render("Failed to cast to CanvasRenderingContext2d".into()))?;

        let width = canvas.width();
        let height = canvas.height();

        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
            image_cache: HashMap::new(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Start loading an image so a later frame can draw it.
    pub fn preload_image(&mut self, src: &str) -> Result<()> {
        if self.image_cache.contains_key(src) {
            return Ok(());
        }
        let image = HtmlImageElement::new()
            .map_err(|_| TileMapError::Render("Failed to create image element".into()))?;
        image.set_cross_origin(Some("anonymous"));
        image.set_src(src);
        self.image_cache.insert(src.to_string(), image);
        Ok(())
    }

    /// A previously preloaded image.
    pub fn image(&self, src: &str) -> Option<&HtmlImageElement> {
        self.image_cache.get(src)
    }

    /// Set the CSS size of the canvas element (logical pixels).
    pub fn set_canvas_css_size(&self, css_w: f64, css_h: f64) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{css_w}px"));
        let _ = style.set_property("height", &format!("{css_h}px"));
    }

    fn draw(&self, primitive: &Primitive) {
        let ctx = &self.ctx;
        match primitive {
            Primitive::Rect {
                x,
                y,
                w,
                h,
                fill,
                stroke,
            } => {
                ctx.set_fill_style_str(fill);
                ctx.fill_rect(*x, *y, *w, *h);
                if let Some(stroke) = stroke {
                    ctx.set_stroke_style_str(stroke);
                    ctx.set_line_width(1.0);
                    ctx.stroke_rect(*x, *y, *w, *h);
                }
            }
            Primitive::Circle {
                cx,
                cy,
                r,
                fill,
                stroke,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(*cx, *cy, r.max(0.0), 0.0, TAU);
                ctx.set_fill_style_str(fill);
                ctx.fill();
                if let Some(stroke) = stroke {
                    ctx.set_stroke_style_str(stroke);
                    ctx.set_line_width(1.0);
                    ctx.stroke();
                }
            }
            Primitive::Text {
                x,
                y,
                text,
                font,
                color,
                align,
                max_width,
            } => {
                ctx.set_font(font);
                ctx.set_fill_style_str(color);
                ctx.set_text_align(align.as_css());
                ctx.set_text_baseline("middle");
                let _ = match max_width {
                    Some(w) if *w > 0.0 => ctx.fill_text_with_max_width(text, *x, *y, *w),
                    _ => ctx.fill_text(text, *x, *y),
                };
            }
            Primitive::Image { src, x, y, w, h } => {
                // Not yet decoded images are skipped; the next frame picks them up.
                if let Some(image) = self.image_cache.get(src) {
                    if image.complete() && image.natural_width() > 0 {
                        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                            image, *x, *y, *w, *h,
                        );
                    }
                }
            }
        }
    }
}

impl RenderBackend for CanvasRenderer {
    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;

        // Set canvas buffer size to physical pixels
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        // Scale context for DPR (all drawing uses logical coordinates after this)
        let _ = self
            .ctx
            .set_transform(f64::from(dpr), 0.0, 0.0, f64::from(dpr), 0.0, 0.0);
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        self.ctx.clear_rect(0.0, 0.0, scene.width, scene.height);
        for primitive in &scene.primitives {
            self.draw(primitive);
        }
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
