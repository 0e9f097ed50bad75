//! Linear RGB colors as written in scene descriptions.
//!
//! Scenes spell colors three ways: hex integers (`0x001020`), CSS hex strings
//! (`"#fffbe6"`) and a handful of CSS names (`"tomato"`). All of them decode
//! into the same [`Color`].

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Color {
    pub const WHITE: Color = Color(Vec3::ONE);
    pub const BLACK: Color = Color(Vec3::ZERO);

    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self(Vec3::new(r, g, b))
    }

    /// `0xRRGGBB`, each channel mapped to `0.0..=1.0`.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    #[must_use]
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.0.x) << 16) | (channel(self.0.y) << 8) | channel(self.0.z)
    }

    #[inline]
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        self.0
    }

    fn from_name(name: &str) -> Option<Self> {
        let hex = match name {
            "white" => 0xFF_FFFF,
            "black" => 0x00_0000,
            "gray" | "grey" => 0x80_8080,
            "red" => 0xFF_0000,
            "green" => 0x00_8000,
            "blue" => 0x00_00FF,
            "orange" => 0xFF_A500,
            "tomato" => 0xFF_6347,
            "yellow" => 0xFF_FF00,
            "skyblue" => 0x87_CEEB,
            "navy" => 0x00_0080,
            _ => return None,
        };
        Some(Self::from_hex(hex))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl From<Color> for Vec3 {
    fn from(c: Color) -> Self {
        c.0
    }
}

/// Error returned when a color string is neither `#rrggbb` nor a known name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized color '{}'", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex_digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"));

        if let Some(digits) = hex_digits {
            return match digits.len() {
                6 => u32::from_str_radix(digits, 16)
                    .map(Self::from_hex)
                    .map_err(|_| ParseColorError(s.to_string())),
                // #rgb shorthand
                3 => {
                    let v = u32::from_str_radix(digits, 16)
                        .map_err(|_| ParseColorError(s.to_string()))?;
                    let (r, g, b) = ((v >> 8) & 0xF, (v >> 4) & 0xF, v & 0xF);
                    Ok(Self::from_hex((r * 17) << 16 | (g * 17) << 8 | (b * 17)))
                }
                _ => Err(ParseColorError(s.to_string())),
            };
        }

        Self::from_name(&trimmed.to_ascii_lowercase()).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("#{:06x}", self.to_hex()))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(u32),
            Text(String),
            Rgb([f32; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(hex) => Ok(Color::from_hex(hex)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
            Repr::Rgb([r, g, b]) => Ok(Color::rgb(r, g, b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_string_and_integer_alike() {
        let a: Color = "#fffbe6".parse().unwrap();
        let b = Color::from_hex(0xFF_FBE6);
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), 0xFF_FBE6);
    }

    #[test]
    fn parses_css_names() {
        let tomato: Color = "tomato".parse().unwrap();
        assert_eq!(tomato.to_hex(), 0xFF_6347);
        assert!("not-a-color".parse::<Color>().is_err());
    }

    #[test]
    fn deserializes_every_representation() {
        let colors: Vec<Color> = serde_json::from_str(r##"[11184810, "#aaaaaa", "gray", [1.0, 0.5, 0.0]]"##).unwrap();
        assert_eq!(colors[0].to_hex(), 0xAA_AAAA);
        assert_eq!(colors[1].to_hex(), 0xAA_AAAA);
        assert_eq!(colors[2].to_hex(), 0x80_8080);
        assert_eq!(colors[3], Color::rgb(1.0, 0.5, 0.0));
    }
}
