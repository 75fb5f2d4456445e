//! Terminal colours and their SGR encodings.
//!
//! A colour is either one of the sixteen palette entries of the terminal,
//! the terminal's own default, or a 24-bit RGB triple. Palette entries are
//! written as a single character:
//!
//! | code | colour         | code | colour                |
//! |------|----------------|------|-----------------------|
//! | `0`  | default fg/bg  |      |                       |
//! | `k`  | black          | `K`  | bright black          |
//! | `r`  | red            | `R`  | bright red            |
//! | `g`  | green          | `G`  | bright green          |
//! | `y`  | yellow         | `Y`  | bright yellow         |
//! | `b`  | blue           | `B`  | bright blue           |
//! | `m`  | magenta        | `M`  | bright magenta        |
//! | `c`  | cyan           | `C`  | bright cyan           |
//! | `w`  | white          | `W`  | bright white          |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorError {
    #[error("unknown colour code `{0}` (expected one of 0kKrRgGyYbBmMcCwW)")]
    UnknownCode(char),
    #[error("colour component {0} is outside 0.0-1.0")]
    OutOfRange(f64),
    #[error("expected 3 colour components, found {0}")]
    Components(usize),
    #[error("invalid colour `{0}`")]
    Invalid(String),
}

/// Which half of a cell a colour paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Palette {
    pub const ALL: [Palette; 16] = [
        Palette::Black,
        Palette::Red,
        Palette::Green,
        Palette::Yellow,
        Palette::Blue,
        Palette::Magenta,
        Palette::Cyan,
        Palette::White,
        Palette::BrightBlack,
        Palette::BrightRed,
        Palette::BrightGreen,
        Palette::BrightYellow,
        Palette::BrightBlue,
        Palette::BrightMagenta,
        Palette::BrightCyan,
        Palette::BrightWhite,
    ];

    #[must_use]
    pub fn code(self) -> char {
        match self {
            Palette::Black => 'k',
            Palette::Red => 'r',
            Palette::Green => 'g',
            Palette::Yellow => 'y',
            Palette::Blue => 'b',
            Palette::Magenta => 'm',
            Palette::Cyan => 'c',
            Palette::White => 'w',
            Palette::BrightBlack => 'K',
            Palette::BrightRed => 'R',
            Palette::BrightGreen => 'G',
            Palette::BrightYellow => 'Y',
            Palette::BrightBlue => 'B',
            Palette::BrightMagenta => 'M',
            Palette::BrightCyan => 'C',
            Palette::BrightWhite => 'W',
        }
    }

    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|entry| entry.code() == code)
    }

    /// Foreground SGR code; the background code is this plus ten.
    fn foreground_sgr(self) -> u8 {
        let index = Self::ALL
            .iter()
            .position(|entry| *entry == self)
            .unwrap_or_default();
        #[allow(clippy::cast_possible_truncation)]
        let index = index as u8;
        if index < 8 {
            30 + index
        } else {
            90 + (index - 8)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "String")]
pub enum Color {
    /// Whatever the terminal is configured to use.
    #[default]
    Default,
    Palette(Palette),
    Rgb(u8, u8, u8),
}

impl Color {
    pub fn from_code(code: char) -> Result<Self, ColorError> {
        if code == '0' {
            return Ok(Color::Default);
        }
        Palette::from_code(code)
            .map(Color::Palette)
            .ok_or(ColorError::UnknownCode(code))
    }

    #[must_use]
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Color::Rgb(red, green, blue)
    }

    /// Builds an RGB colour from components in the 0.0-1.0 range.
    ///
    /// Components are scaled by 255 and truncated, so `0.5` becomes `127`.
    pub fn from_unit_rgb(red: f64, green: f64, blue: f64) -> Result<Self, ColorError> {
        Ok(Color::Rgb(
            unit_component(red)?,
            unit_component(green)?,
            unit_component(blue)?,
        ))
    }

    /// SGR parameter fragment selecting this colour on the given layer.
    #[must_use]
    pub fn sgr(&self, layer: Layer) -> String {
        let offset = match layer {
            Layer::Foreground => 0,
            Layer::Background => 10,
        };
        match self {
            Color::Default => (39 + offset).to_string(),
            Color::Palette(entry) => (entry.foreground_sgr() + offset).to_string(),
            Color::Rgb(r, g, b) => {
                let selector = match layer {
                    Layer::Foreground => 38,
                    Layer::Background => 48,
                };
                format!("{selector};2;{r};{g};{b}")
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_component(value: f64) -> Result<u8, ColorError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ColorError::OutOfRange(value));
    }
    Ok((value * 255.0) as u8)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Default => f.write_str("0"),
            Color::Palette(entry) => write!(f, "{}", entry.code()),
            Color::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        let mut chars = value.chars();
        if let (Some(code), None) = (chars.next(), chars.next()) {
            return Color::from_code(code);
        }
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorError::Invalid(raw.to_string()));
        }
        if value.contains(',') {
            return parse_components(value, raw);
        }
        Err(ColorError::Invalid(raw.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn parse_components(value: &str, raw: &str) -> Result<Color, ColorError> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ColorError::Components(parts.len()));
    }
    let invalid = || ColorError::Invalid(raw.to_string());
    if parts.iter().any(|part| part.contains('.')) {
        let mut unit = [0.0_f64; 3];
        for (slot, part) in unit.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        Color::from_unit_rgb(unit[0], unit[1], unit[2])
    } else {
        let mut bytes = [0_u8; 3];
        for (slot, part) in bytes.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        Ok(Color::Rgb(bytes[0], bytes[1], bytes[2]))
    }
}

/// Accepted serialised forms: a colour string, or three integers (0-255) or
/// three floats (0.0-1.0).
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Text(String),
    Bytes([u8; 3]),
    Unit([f64; 3]),
}

impl TryFrom<ColorRepr> for Color {
    type Error = ColorError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Text(text) => text.parse(),
            ColorRepr::Bytes([r, g, b]) => Ok(Color::Rgb(r, g, b)),
            ColorRepr::Unit([r, g, b]) => Color::from_unit_rgb(r, g, b),
        }
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl From<Palette> for Color {
    fn from(entry: Palette) -> Self {
        Color::Palette(entry)
    }
}
