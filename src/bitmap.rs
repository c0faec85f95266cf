//! Rasterized text: an RGBA8 grid sampled column by column by the scanner.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::color::Rgba;

/// Pixels whose summed RGBA exceeds this carry ink. Opaque black sums to
/// exactly 255, so only the stroke qualifies.
pub const INK_THRESHOLD: u32 = 255;

static NEXT_REVISION: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Clone)]
pub struct GlyphBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    revision: u32,
}

impl GlyphBitmap {
    /// `pixels` is row-major RGBA; it is padded or truncated to
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, mut pixels: Vec<u8>) -> Self {
        let len = width as usize * height as usize * 4;
        if pixels.len() != len {
            log::warn!(
                "glyph bitmap {}x{} given {} bytes, expected {}",
                width,
                height,
                pixels.len(),
                len
            );
            pixels.resize(len, 0);
        }
        Self {
            width,
            height,
            pixels,
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0, Vec::new())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Distinguishes bitmaps so surfaces can cache uploads per bitmap.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Summed RGBA of one pixel; 0 outside the grid.
    pub fn intensity(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].iter().map(|&c| c as u32).sum()
    }

    /// Rows of `column`, top to bottom, that carry ink.
    pub fn ink_rows(&self, column: u32) -> impl Iterator<Item = u32> + '_ {
        (0..self.height).filter(move |&y| self.intensity(column, y) > INK_THRESHOLD)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub size: f32,
    pub color: Rgba,
    pub font_family: String,
}

impl TextStyle {
    pub fn font(&self) -> String {
        format!("{}px {}", self.size, self.font_family)
    }

    pub fn line_height(&self) -> f32 {
        self.size * 1.5
    }

    /// Baseline offset from the top of the bitmap.
    pub fn baseline(&self) -> f32 {
        self.line_height() * 0.8
    }

    /// Rendered copy; the trailing space leaves a gap before the reveal loops.
    pub fn padded_text(&self) -> String {
        format!("{} ", self.text)
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty() || !(self.size.is_finite() && self.size > 0.0)
    }
}

// Revisions only key caches; equal pixels make equal bitmaps.
impl PartialEq for GlyphBitmap {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

/// Produces a stroke-only render of a text style: opaque black background,
/// text outlined in `style.color`, baseline at [`TextStyle::baseline`].
/// Blank styles must yield [`GlyphBitmap::empty`].
pub trait GlyphRasterizer {
    /// `surface_width`/`surface_height` size the scratch surface the text is
    /// drawn on; the bitmap itself is cropped to the measured text bounds.
    fn rasterize(&self, style: &TextStyle, surface_width: u32, surface_height: u32) -> GlyphBitmap;
}
