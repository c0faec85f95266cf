//! The 2D drawing surface the lightning stage composites onto.

use glam::Vec2;

use crate::bitmap::GlyphBitmap;
use crate::color::Rgba;
use crate::entropy::Entropy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    SourceOver,
    /// Overlapping draws brighten instead of occluding.
    Screen,
}

impl BlendMode {
    pub fn as_css(self) -> &'static str {
        match self {
            BlendMode::SourceOver => "source-over",
            BlendMode::Screen => "screen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
    pub glow: Option<Glow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub alpha: f32,
}

/// Viewport bounds handed to constructors instead of reading the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn sample<E: Entropy + ?Sized>(&self, rng: &mut E) -> Vec2 {
        Vec2::new(rng.range(0.0, self.width), rng.range(0.0, self.height))
    }
}

pub trait Surface {
    /// Resize the backing store; clears its contents.
    fn resize(&mut self, width: u32, height: u32);

    fn set_blend(&mut self, mode: BlendMode);

    fn set_alpha(&mut self, alpha: f32);

    /// Fill the whole surface.
    fn fill(&mut self, color: Rgba);

    /// Stroke a connected polyline through `points`.
    fn stroke_path(&mut self, points: &[Vec2], style: &StrokeStyle);

    /// Fill a disc with a radial gradient of `color`, alpha given per stop.
    fn fill_radial(&mut self, center: Vec2, radius: f32, color: Rgba, stops: &[GradientStop]);

    /// Copy bitmap columns `[0, columns)` to `origin`, replacing what is there.
    fn blit_columns(&mut self, bitmap: &GlyphBitmap, origin: Vec2, columns: u32);
}
