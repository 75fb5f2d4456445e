//! One character cell on the screen.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{Color, Layer};

const ESC: &str = "\x1b[";
const RESET: &str = "\x1b[0m";

/// Text effects a terminal can apply to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Bold,
    Faint,
    Italic,
    Underline,
    Blink,
    Inverse,
    Cross,
    Overline,
}

impl Attribute {
    /// Rendering order of the SGR codes.
    pub const ALL: [Attribute; 8] = [
        Attribute::Bold,
        Attribute::Faint,
        Attribute::Italic,
        Attribute::Underline,
        Attribute::Blink,
        Attribute::Inverse,
        Attribute::Cross,
        Attribute::Overline,
    ];

    #[must_use]
    pub fn sgr(self) -> u8 {
        match self {
            Attribute::Bold => 1,
            Attribute::Faint => 2,
            Attribute::Italic => 3,
            Attribute::Underline => 4,
            Attribute::Blink => 5,
            Attribute::Inverse => 7,
            Attribute::Cross => 9,
            Attribute::Overline => 53,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Bold => "bold",
            Attribute::Faint => "faint",
            Attribute::Italic => "italic",
            Attribute::Underline => "underline",
            Attribute::Blink => "blink",
            Attribute::Inverse => "inverse",
            Attribute::Cross => "cross",
            Attribute::Overline => "overline",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// A set of [`Attribute`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attributes(u16);

impl Attributes {
    pub const NONE: Attributes = Attributes(0);

    #[must_use]
    pub fn contains(self, attribute: Attribute) -> bool {
        self.0 & attribute.bit() != 0
    }

    pub fn insert(&mut self, attribute: Attribute) {
        self.0 |= attribute.bit();
    }

    pub fn remove(&mut self, attribute: Attribute) {
        self.0 &= !attribute.bit();
    }

    #[must_use]
    pub fn with(mut self, attribute: Attribute) -> Self {
        self.insert(attribute);
        self
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in SGR rendering order.
    pub fn iter(self) -> impl Iterator<Item = Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(move |attribute| self.contains(*attribute))
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Attributes::NONE, |set, attribute| set.with(attribute))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Texel {
    /// `None` renders as a space.
    pub character: Option<char>,
    pub fg: Color,
    pub bg: Color,
    pub attributes: Attributes,
}

impl Texel {
    #[must_use]
    pub fn new(character: char) -> Self {
        Self {
            character: Some(character),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    #[must_use]
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    #[must_use]
    pub fn with(mut self, attribute: Attribute) -> Self {
        self.attributes.insert(attribute);
        self
    }

    #[must_use]
    pub fn glyph(&self) -> char {
        self.character.unwrap_or(' ')
    }

    /// The ANSI sequence for this texel, reset afterwards.
    #[must_use]
    pub fn render(&self) -> String {
        let mut ansi = String::with_capacity(24);
        ansi.push_str(ESC);
        ansi.push_str(&self.fg.sgr(Layer::Foreground));
        ansi.push(';');
        ansi.push_str(&self.bg.sgr(Layer::Background));
        for attribute in self.attributes.iter() {
            ansi.push(';');
            ansi.push_str(&attribute.sgr().to_string());
        }
        ansi.push('m');
        ansi.push(self.glyph());
        ansi.push_str(RESET);
        ansi
    }
}

impl fmt::Display for Texel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;

    #[test]
    fn empty_texel_renders_a_space_with_default_colours() {
        assert_eq!(Texel::blank().render(), "\x1b[39;49m \x1b[0m");
    }

    #[test]
    fn renders_palette_colours() {
        let texel = Texel::new('C')
            .fg(Palette::Red.into())
            .bg(Palette::BrightBlack.into());
        assert_eq!(texel.render(), "\x1b[31;100mC\x1b[0m");
    }

    #[test]
    fn renders_rgb_colours() {
        let texel = Texel::new('R')
            .fg(Color::rgb(0, 255, 0))
            .bg(Color::from_unit_rgb(1.0, 0.0, 1.0).unwrap());
        assert_eq!(
            texel.render(),
            "\x1b[38;2;0;255;0;48;2;255;0;255mR\x1b[0m"
        );
    }

    #[test]
    fn attributes_render_in_fixed_order() {
        let texel = Texel::new('O')
            .with(Attribute::Overline)
            .with(Attribute::Blink)
            .with(Attribute::Bold);
        assert_eq!(texel.render(), "\x1b[39;49;1;5;53mO\x1b[0m");

        let inverse = Texel::new('I').with(Attribute::Inverse);
        assert_eq!(inverse.render(), "\x1b[39;49;7mI\x1b[0m");
        let cross = Texel::new('S').with(Attribute::Cross);
        assert_eq!(cross.render(), "\x1b[39;49;9mS\x1b[0m");
    }

    #[test]
    fn attribute_set_membership() {
        let mut set: Attributes = [Attribute::Italic, Attribute::Faint].into_iter().collect();
        assert!(set.contains(Attribute::Faint));
        set.remove(Attribute::Faint);
        assert!(!set.contains(Attribute::Faint));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Attribute::Italic]);
        assert!(Attributes::NONE.is_empty());
    }
}
