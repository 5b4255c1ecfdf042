use serde::{Deserialize, Serialize};
use crate::error::{LabError, Result};

/// Linear RGB in `[0, 1]`, written straight into reel instances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Border shown on every reel until a completed spin reveals its accent.
    pub const DEFAULT_BORDER: Color = Color::from_rgb8(0xea, 0xea, 0xea);

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        // from_str_radix alone would take a leading sign in each channel.
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(LabError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| LabError::InvalidColor(hex.to_string()))
        };
        Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// One face of a reel.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub glyph: String,
    pub color: Color,
}

impl Symbol {
    pub fn new(glyph: impl Into<String>, color: Color) -> Self {
        Self { glyph: glyph.into(), color }
    }
}

/// Ordered, non-empty set of reel faces. Outcomes index into it.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
}

impl SymbolSet {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(LabError::EmptySymbolSet);
        }
        Ok(Self { symbols })
    }

    /// The five fruit faces used by every spin page.
    pub fn fruits() -> Self {
        let fruit = |glyph: &str, r, g, b| Symbol::new(glyph, Color::from_rgb8(r, g, b));
        Self {
            symbols: vec![
                fruit("🍒", 0x00, 0xbc, 0x7d),
                fruit("🍌", 0x61, 0x5f, 0xff),
                fruit("🫐", 0xfe, 0x9a, 0x00),
                fruit("🍇", 0xff, 0xdf, 0x20),
                fruit("🥝", 0xfb, 0x2c, 0x36),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Never true for a constructed set; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::fruits()
    }
}
