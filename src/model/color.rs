//! Straight-alpha RGBA colors for the backdrop and the sheet surface.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Error returned when a color literal is not `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}: expected #RRGGBB or #RRGGBBAA")]
pub struct InvalidColor(
    /// The rejected literal.
    pub String,
);

/// An sRGB color with a straight (non-premultiplied) alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in [0, 1].
    pub alpha: f32,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Fully transparent.
    pub const CLEAR: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        alpha: 0.0,
    };

    /// Color with alpha 1.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Same color with a different alpha, clamped to [0, 1].
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: clamp_unit(alpha),
            ..self
        }
    }

    /// Composite this color over an opaque `base`, scaling this color's
    /// alpha by `opacity` first. Returns the resulting opaque RGB triple.
    pub fn over(&self, base: (u8, u8, u8), opacity: f32) -> (u8, u8, u8) {
        let a = clamp_unit(self.alpha * opacity);
        let mix = |top: u8, bottom: u8| -> u8 {
            let value = f32::from(top) * a + f32::from(bottom) * (1.0 - a);
            value.round().clamp(0.0, 255.0) as u8
        };
        (mix(self.r, base.0), mix(self.g, base.1), mix(self.b, base.2))
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl FromStr for Rgba {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 {
            f32::from(channel(6)?) / 255.0
        } else {
            1.0
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            alpha,
        })
    }
}

impl TryFrom<String> for Rgba {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alpha = (self.alpha * 255.0).round() as u8;
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, alpha
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex_as_opaque() {
        let color: Rgba = "#1e90ff".parse().unwrap();
        assert_eq!(color, Rgba::opaque(0x1e, 0x90, 0xff));
    }

    #[test]
    fn parses_eight_digit_hex_alpha() {
        let color: Rgba = "#00000099".parse().unwrap();
        assert_eq!((color.r, color.g, color.b), (0, 0, 0));
        assert!((color.alpha - 0.6).abs() < 0.001);
    }

    #[test]
    fn rejects_missing_hash_and_bad_lengths() {
        assert!("000000".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#gg0000".parse::<Rgba>().is_err());
        assert!("#ééé".parse::<Rgba>().is_err());
    }

    #[test]
    fn over_with_zero_opacity_keeps_base() {
        let backdrop = Rgba::BLACK.with_alpha(0.6);
        assert_eq!(backdrop.over((200, 100, 50), 0.0), (200, 100, 50));
    }

    #[test]
    fn over_scales_alpha_by_opacity() {
        let backdrop = Rgba::BLACK.with_alpha(0.5);
        // Effective alpha 0.5 * 1.0 halves the base.
        assert_eq!(backdrop.over((200, 100, 50), 1.0), (100, 50, 25));
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Rgba::WHITE.with_alpha(2.0).alpha, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(-1.0).alpha, 0.0);
        assert_eq!(Rgba::WHITE.with_alpha(f32::NAN).alpha, 0.0);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let color = Rgba::opaque(10, 20, 30).with_alpha(1.0);
        assert_eq!(color.to_string(), "#0a141eff");
        assert_eq!(color.to_string().parse::<Rgba>().unwrap(), color);
    }
}
