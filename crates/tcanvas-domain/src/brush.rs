use crate::color::Color;
use crate::texel::{Attribute, Attributes, Texel};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrushError {
    #[error("a texel holds exactly one character, got {0:?}")]
    NotOneCharacter(String),
}

/// A partial texel update. Fields left unset keep whatever the texel
/// already holds, so a brush that only sets `bg` recolours cells without
/// touching their characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Brush {
    pub character: Option<char>,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    enable: Attributes,
    disable: Attributes,
}

impl Brush {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn character(mut self, character: char) -> Self {
        self.character = Some(character);
        self
    }

    /// Accepts a string that must hold exactly one character.
    pub fn character_str(self, text: &str) -> Result<Self, BrushError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(character), None) => Ok(self.character(character)),
            _ => Err(BrushError::NotOneCharacter(text.to_string())),
        }
    }

    #[must_use]
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Turns `attribute` on (`true`) or off (`false`) in painted texels.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute, on: bool) -> Self {
        if on {
            self.enable.insert(attribute);
            self.disable.remove(attribute);
        } else {
            self.disable.insert(attribute);
            self.enable.remove(attribute);
        }
        self
    }

    #[must_use]
    pub fn bold(self, on: bool) -> Self {
        self.attribute(Attribute::Bold, on)
    }

    #[must_use]
    pub fn blink(self, on: bool) -> Self {
        self.attribute(Attribute::Blink, on)
    }

    #[must_use]
    pub fn inverse(self, on: bool) -> Self {
        self.attribute(Attribute::Inverse, on)
    }

    pub fn apply(&self, texel: &mut Texel) {
        if let Some(character) = self.character {
            texel.character = Some(character);
        }
        if let Some(fg) = self.fg {
            texel.fg = fg;
        }
        if let Some(bg) = self.bg {
            texel.bg = bg;
        }
        for attribute in self.enable.iter() {
            texel.attributes.insert(attribute);
        }
        for attribute in self.disable.iter() {
            texel.attributes.remove(attribute);
        }
    }
}
