//! Construction-time options for the lightning logo.

use crate::bitmap::TextStyle;
use crate::color::{ColorError, Rgba};

pub const DEFAULT_TEXT: &str = "WIZARDING REALMS";
pub const DEFAULT_SIZE: f32 = 60.0;
pub const DEFAULT_COLOR: Rgba = Rgba::rgb(0xcd, 0x96, 0xfe);
pub const DEFAULT_FONT: &str = "Comic Sans MS";
pub const DEFAULT_REVEAL_DELAY: i32 = 2;

/// Per-ink-pixel spawn probabilities, checked independently each scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnChance {
    pub bolt: f32,
    pub burst: f32,
}

impl SpawnChance {
    pub const ALWAYS: SpawnChance = SpawnChance { bolt: 1.0, burst: 1.0 };
    pub const NEVER: SpawnChance = SpawnChance { bolt: 0.0, burst: 0.0 };
}

impl Default for SpawnChance {
    fn default() -> Self {
        Self {
            bolt: 0.06,
            burst: 0.042,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogoConfig {
    pub text: String,
    pub size: f32,
    pub color: Rgba,
    pub font_family: String,
    /// Frames between cursor steps once the reveal is running.
    pub reveal_delay: i32,
    /// Explicit surface width; the container's measured width otherwise.
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub spawn: SpawnChance,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            size: DEFAULT_SIZE,
            color: DEFAULT_COLOR,
            font_family: DEFAULT_FONT.to_string(),
            reveal_delay: DEFAULT_REVEAL_DELAY,
            width: None,
            height: None,
            spawn: SpawnChance::default(),
        }
    }
}

impl LogoConfig {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_color_hex(self, hex: &str) -> Result<Self, ColorError> {
        Ok(self.with_color(Rgba::from_hex(hex)?))
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn with_reveal_delay(mut self, frames: i32) -> Self {
        self.reveal_delay = frames.max(0);
        self
    }

    pub fn with_dimensions(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_spawn(mut self, spawn: SpawnChance) -> Self {
        self.spawn = spawn;
        self
    }

    /// Surface size: explicit overrides win over the measured container.
    pub fn resolve_size(&self, measured_width: u32, measured_height: u32) -> (u32, u32) {
        (
            self.width.unwrap_or(measured_width),
            self.height.unwrap_or(measured_height),
        )
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            text: self.text.clone(),
            size: self.size,
            color: self.color,
            font_family: self.font_family.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_wordmark() {
        let config = LogoConfig::default();
        assert_eq!(config.text, "WIZARDING REALMS");
        assert_eq!(config.size, 60.0);
        assert_eq!(config.color.to_css(), "#cd96fe");
        assert_eq!(config.reveal_delay, 2);
        assert!(config.spawn.burst < config.spawn.bolt);
    }

    #[test]
    fn explicit_dimensions_override_measurement() {
        let config = LogoConfig::default().with_dimensions(Some(640), None);
        assert_eq!(config.resolve_size(800, 200), (640, 200));
    }

    #[test]
    fn color_hex_is_validated() {
        assert!(LogoConfig::default().with_color_hex("#12345").is_err());
        let config = LogoConfig::default().with_color_hex("#ffffff").unwrap();
        assert_eq!(config.text_style().color, Rgba::rgb(255, 255, 255));
    }
}
