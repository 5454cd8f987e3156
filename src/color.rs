use image::Rgba;

use crate::error::{QrError, QrResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLUE: Rgb = Rgb(0, 0, 255);

    /// Parses `#RRGGBB`; the leading `#` is optional.
    pub fn parse_hex(hex: &str) -> QrResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(QrError::InvalidColor(hex.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| QrError::InvalidColor(hex.to_string()))
        };

        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.0, self.1, self.2, 255])
    }

    pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(Rgb::parse_hex("#FF8000").unwrap(), Rgb(255, 128, 0));
        assert_eq!(Rgb::parse_hex("00ff7f").unwrap(), Rgb(0, 255, 127));
    }

    #[test]
    fn rejects_short_and_non_hex() {
        assert!(matches!(Rgb::parse_hex("#fff"), Err(QrError::InvalidColor(_))));
        assert!(matches!(Rgb::parse_hex("#gg0000"), Err(QrError::InvalidColor(_))));
        assert!(matches!(Rgb::parse_hex("#ééé"), Err(QrError::InvalidColor(_))));
    }

    #[test]
    fn hex_is_lowercase() {
        assert_eq!(Rgb(171, 205, 239).to_hex(), "#abcdef");
    }

    #[test]
    fn lerp_clamps() {
        assert_eq!(Rgb::lerp(Rgb::BLACK, Rgb::WHITE, 0.5), Rgb(128, 128, 128));
        assert_eq!(Rgb::lerp(Rgb::BLACK, Rgb::BLUE, 2.0), Rgb::BLUE);
        assert_eq!(Rgb::lerp(Rgb::BLACK, Rgb::BLUE, -1.0), Rgb::BLACK);
    }
}
