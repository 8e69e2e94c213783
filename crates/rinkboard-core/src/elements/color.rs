use std::fmt;
use std::str::FromStr;

use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ElementError;

/// RGBA8 color stored on elements, serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RinkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RinkColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Same color with alpha scaled by `factor` (clamped to `0..=1`).
    pub fn with_alpha_factor(self, factor: f64) -> Self {
        let factor = if factor.is_finite() {
            factor.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            a: (self.a as f64 * factor).round() as u8,
            ..self
        }
    }

    /// `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for RinkColor {
    fn default() -> Self {
        Self::rgb(0x1e, 0x29, 0x3b)
    }
}

impl fmt::Display for RinkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RinkColor {
    type Err = ElementError;

    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ElementError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };

        match hex.len() {
            3 => {
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for RinkColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RinkColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Color> for RinkColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<RinkColor> for Color {
    fn from(color: RinkColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#fff".parse::<RinkColor>().unwrap(), RinkColor::white());
        assert_eq!(
            "#1e293b".parse::<RinkColor>().unwrap(),
            RinkColor::rgb(0x1e, 0x29, 0x3b)
        );
        assert_eq!(
            "#ff000080".parse::<RinkColor>().unwrap(),
            RinkColor::new(255, 0, 0, 0x80)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("red".parse::<RinkColor>().is_err());
        assert!("#12345".parse::<RinkColor>().is_err());
        assert!("#gggggg".parse::<RinkColor>().is_err());
    }

    #[test]
    fn test_hex_omits_opaque_alpha() {
        assert_eq!(RinkColor::rgb(0xdc, 0x26, 0x26).to_hex(), "#dc2626");
        assert_eq!(RinkColor::new(0, 0, 0, 0).to_hex(), "#00000000");
    }

    #[test]
    fn test_alpha_factor() {
        let c = RinkColor::black().with_alpha_factor(0.5);
        assert_eq!(c.a, 128);
        assert_eq!(RinkColor::black().with_alpha_factor(f64::NAN).a, 255);
    }

    #[test]
    fn test_peniko_conversion() {
        let c = RinkColor::new(10, 20, 30, 255);
        let back: RinkColor = Color::from(c).into();
        assert_eq!(back, c);
    }
}
