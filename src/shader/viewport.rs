//! Canvas backing-store sizing: CSS size times a clamped device pixel ratio.

pub const MIN_PIXEL_RATIO: f64 = 1.0;
pub const MAX_PIXEL_RATIO: f64 = 2.0;

pub fn clamp_pixel_ratio(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
    } else {
        MIN_PIXEL_RATIO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

impl BackingSize {
    /// Device pixels for a CSS box; never smaller than 1×1.
    pub fn from_css(css_width: f64, css_height: f64, pixel_ratio: f64) -> Self {
        let ratio = clamp_pixel_ratio(pixel_ratio);
        let device = |css: f64| {
            let px = (css.max(0.0) * ratio).floor();
            if px.is_finite() {
                (px as u32).max(1)
            } else {
                1
            }
        };
        Self {
            width: device(css_width),
            height: device(css_height),
        }
    }
}

/// Last applied backing size, so the GPU viewport is only touched on change.
#[derive(Debug, Default, Clone)]
pub struct BackingTracker {
    current: Option<BackingSize>,
}

impl BackingTracker {
    pub fn current(&self) -> Option<BackingSize> {
        self.current
    }

    /// Returns the new size when it differs from the last one applied.
    pub fn sync(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> Option<BackingSize> {
        let next = BackingSize::from_css(css_width, css_height, pixel_ratio);
        if self.current == Some(next) {
            return None;
        }
        self.current = Some(next);
        Some(next)
    }
}
