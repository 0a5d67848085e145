//! RGBA colors and CSS color parsing.
//!
//! Color swatches on the page report their value through computed styles
//! (`rgb(33, 150, 243)`), while the color picker reports hex (`#2196f3`).
//! Both forms parse into the same 8-bit `Color`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// RGBA color, 8 bits per channel, not premultiplied.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_rgba(px: [u8; 4]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let r = hex_val(bytes[0])? * 17;
                let g = hex_val(bytes[1])? * 17;
                let b = hex_val(bytes[2])? * 17;
                let a = match bytes.get(3) {
                    Some(&d) => hex_val(d)? * 17,
                    None => 255,
                };
                Some(Self::rgba(r, g, b, a))
            }
            6 | 8 => {
                let pair = |i: usize| -> Option<u8> {
                    Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?)
                };
                let a = if bytes.len() == 8 { pair(6)? } else { 255 };
                Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, a))
            }
            _ => None,
        }
    }

    /// Parse any color string the page can hand us: hex, `rgb(...)`,
    /// or `rgba(...)`. Surrounding whitespace is ignored.
    pub fn from_css(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        parse_rgb_function.parse(s).ok()
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_css(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}")))
    }
}

// ─── rgb() / rgba() ─────────────────────────────────────────────────────

fn parse_rgb_function(input: &mut &str) -> ModalResult<Color> {
    let _ = alt(("rgba", "rgb")).parse_next(input)?;
    let _ = (multispace0, '(', multispace0).parse_next(input)?;
    let r = parse_channel(input)?;
    let g = preceded(separator, parse_channel).parse_next(input)?;
    let b = preceded(separator, parse_channel).parse_next(input)?;
    let alpha = opt(preceded(separator, parse_number)).parse_next(input)?;
    let _ = (multispace0, ')').parse_next(input)?;

    let a = alpha.map_or(255, |v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
    Ok(Color::rgba(r, g, b, a))
}

fn separator(input: &mut &str) -> ModalResult<()> {
    (multispace0, ',', multispace0).void().parse_next(input)
}

fn parse_channel(input: &mut &str) -> ModalResult<u8> {
    let v = parse_number(input)?;
    Ok(v.clamp(0.0, 255.0).round() as u8)
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _ =
            take_while::<_, _, ContextError>(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f32>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_and_long_hex() {
        assert_eq!(Color::from_hex("#000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("2196F3"), Some(Color::rgb(0x21, 0x96, 0xF3)));
        assert_eq!(
            Color::from_hex("#11223380"),
            Some(Color::rgba(0x11, 0x22, 0x33, 0x80))
        );
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("#zzz"), None);
    }

    #[test]
    fn parse_computed_style_colors() {
        assert_eq!(
            Color::from_css("rgb(33, 150, 243)"),
            Some(Color::rgb(33, 150, 243))
        );
        assert_eq!(
            Color::from_css("  rgba(255,0,0, 0.5) "),
            Some(Color::rgba(255, 0, 0, 128))
        );
        assert_eq!(Color::from_css("rgb(300, 0, 0)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_css("rgb(1, 2)"), None);
        assert_eq!(Color::from_css("hsl(0, 0%, 0%)"), None);
    }

    #[test]
    fn hex_output() {
        assert_eq!(Color::rgb(0x21, 0x96, 0xF3).to_hex(), "#2196F3");
        assert_eq!(Color::rgba(0, 0, 0, 0).to_hex(), "#00000000");
    }
}
