use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

use crate::bitmap::{GlyphBitmap, GlyphRasterizer, TextStyle};
use crate::color::Rgba;
use crate::surface::{BlendMode, GradientStop, StrokeStyle, Surface};

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or("2D context not supported")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// [`Surface`] over a canvas 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// ImageData for the last blitted bitmap, keyed by revision.
    image: Option<(u32, ImageData)>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            image: None,
        })
    }

    /// Rebuild the cached ImageData when `bitmap` is not the one cached.
    fn cache_image(&mut self, bitmap: &GlyphBitmap) -> Result<(), JsValue> {
        if matches!(&self.image, Some((revision, _)) if *revision == bitmap.revision()) {
            return Ok(());
        }
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(bitmap.pixels()),
            bitmap.width(),
            bitmap.height(),
        )?;
        self.image = Some((bitmap.revision(), data));
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        if let Err(err) = self.ctx.set_global_composite_operation(mode.as_css()) {
            log::debug!("composite operation rejected: {err:?}");
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn fill(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn stroke_path(&mut self, points: &[Vec2], style: &StrokeStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.set_stroke_style_str(&style.color.to_css());
        ctx.set_line_width(style.width as f64);
        if let Some(glow) = style.glow {
            ctx.set_shadow_blur(glow.blur as f64);
            ctx.set_shadow_color(&glow.color.to_css());
        }
        ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.stroke();
        ctx.close_path();
        if style.glow.is_some() {
            ctx.set_shadow_blur(0.0);
        }
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, color: Rgba, stops: &[GradientStop]) {
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        let result = (|| -> Result<(), JsValue> {
            let gradient = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r)?;
            for stop in stops {
                gradient.add_color_stop(stop.offset, &color.with_alpha(stop.alpha).to_css())?;
            }
            self.ctx.begin_path();
            self.ctx.set_fill_style_canvas_gradient(&gradient);
            self.ctx.arc(x, y, r, 0.0, TAU)?;
            self.ctx.fill();
            self.ctx.close_path();
            Ok(())
        })();
        if let Err(err) = result {
            log::debug!("radial fill failed: {err:?}");
        }
    }

    fn blit_columns(&mut self, bitmap: &GlyphBitmap, origin: Vec2, columns: u32) {
        if columns == 0 || bitmap.height() == 0 {
            return;
        }
        let (x, y) = (origin.x as f64, origin.y as f64);
        let columns = columns.min(bitmap.width()) as f64;
        let height = bitmap.height() as f64;
        let result = self.cache_image(bitmap).and_then(|()| match &self.image {
            Some((_, data)) => self
                .ctx
                .put_image_data_with_dirty_x_and_dirty_y_and_dirty_width_and_dirty_height(
                    data, x, y, 0.0, 0.0, columns, height,
                ),
            None => Ok(()),
        });
        if let Err(err) = result {
            log::debug!("bitmap blit failed: {err:?}");
        }
    }
}

/// Rasterizes text on a scratch canvas with `strokeText` and reads it back.
pub struct CanvasRasterizer {
    document: Document,
}

impl CanvasRasterizer {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn try_rasterize(&self, style: &TextStyle, width: u32, height: u32) -> Result<GlyphBitmap, JsValue> {
        let pool = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        pool.set_width(width.max(1));
        pool.set_height(height.max(1));
        let buffer = context_2d(&pool)?;

        buffer.set_fill_style_str(&Rgba::BLACK.to_css());
        buffer.fill_rect(0.0, 0.0, pool.width() as f64, pool.height() as f64);

        buffer.set_font(&style.font());
        let copy = style.padded_text();
        let metrics = buffer.measure_text(&copy)?;
        let bound_width = metrics.width().max(0.0).ceil() as u32;
        let bound_height = style.line_height().ceil() as u32;
        if bound_width == 0 || bound_height == 0 {
            return Ok(GlyphBitmap::empty());
        }

        buffer.set_stroke_style_str(&style.color.to_css());
        buffer.stroke_text(&copy, 0.0, style.baseline() as f64)?;
        let data = buffer.get_image_data(0.0, 0.0, bound_width as f64, bound_height as f64)?;
        Ok(GlyphBitmap::new(data.width(), data.height(), data.data().0))
    }
}

impl GlyphRasterizer for CanvasRasterizer {
    fn rasterize(&self, style: &TextStyle, surface_width: u32, surface_height: u32) -> GlyphBitmap {
        if style.is_blank() {
            return GlyphBitmap::empty();
        }
        match self.try_rasterize(style, surface_width, surface_height) {
            Ok(bitmap) => bitmap,
            Err(err) => {
                log::warn!("text rasterization failed: {err:?}");
                GlyphBitmap::empty()
            }
        }
    }
}
