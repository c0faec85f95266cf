//! Colors as the canvas expects them: parsed from `#rgb`/`#rrggbb` and
//! written back out as CSS color strings.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("expected 3 or 6 hex digits, got {0}")]
    Length(usize),
    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

/// 8-bit RGB with a floating point alpha, matching CSS `rgba()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn from_hex(raw: &str) -> Result<Self, ColorError> {
        let digits = raw
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(raw.to_string()))?;
        let bad_digit = || ColorError::Digit(raw.to_string());
        if !digits.is_ascii() {
            return Err(bad_digit());
        }

        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, c) in channels.iter_mut().zip(digits.chars()) {
                    let v = c.to_digit(16).ok_or_else(bad_digit)? as u8;
                    *slot = v * 17;
                }
                Ok(Self::rgb(channels[0], channels[1], channels[2]))
            }
            6 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| bad_digit())
                };
                Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
            }
            n => Err(ColorError::Length(n)),
        }
    }

    /// CSS form: `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                self.a.max(0.0)
            )
        }
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgba::from_hex("#cd96fe").unwrap(), Rgba::rgb(0xcd, 0x96, 0xfe));
        assert_eq!(Rgba::from_hex("#fff").unwrap(), Rgba::rgb(255, 255, 255));
        assert_eq!("#2323FE".parse::<Rgba>().unwrap(), Rgba::rgb(0x23, 0x23, 0xfe));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(Rgba::from_hex("cd96fe"), Err(ColorError::MissingHash(_))));
        assert_eq!(Rgba::from_hex("#abcd"), Err(ColorError::Length(4)));
        assert!(matches!(Rgba::from_hex("#zz0000"), Err(ColorError::Digit(_))));
    }

    #[test]
    fn css_output_switches_on_alpha() {
        let flare = Rgba::rgb(250, 200, 50);
        assert_eq!(flare.to_css(), "#fac832");
        assert_eq!(flare.with_alpha(0.5).to_css(), "rgba(250, 200, 50, 0.5)");
    }
}
