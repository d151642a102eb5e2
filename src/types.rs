//! Core types for spark-tokenizer.
//!
//! Colors, text attributes, size variants, class lists and the per-region
//! style overrides owners pass into components.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// =============================================================================
// RGBA Color
// =============================================================================

/// RGBA color with integer components.
///
/// Negative components mean "terminal default" (let the terminal decide).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);

    /// Check if this is the terminal default color.
    pub const fn is_terminal_default(&self) -> bool {
        self.r < 0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TERMINAL_DEFAULT
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 5;
        const STRIKETHROUGH = 1 << 7;
    }
}

// =============================================================================
// Size Variant
// =============================================================================

/// Size variant of the tokenizer control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    #[default]
    Default,
    Large,
    Small,
}

/// Parse a size tag. Tags match exactly: `large`/`lg`, `small`/`sm`,
/// and `default` or the empty tag.
impl FromStr for Size {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "large" | "lg" => Ok(Self::Large),
            "small" | "sm" => Ok(Self::Small),
            "" | "default" => Ok(Self::Default),
            _ => Err(Error::UnknownSize { tag: tag.to_string() }),
        }
    }
}

impl Size {
    /// Class modifier for this size, if any.
    pub fn class(self) -> Option<&'static str> {
        match self {
            Self::Large => Some("input-lg"),
            Self::Small => Some("input-sm"),
            Self::Default => None,
        }
    }
}

// =============================================================================
// Class List
// =============================================================================

/// Ordered, de-duplicated list of class names.
///
/// Classes drive the renderer's attribute mapping and are what tests
/// assert against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(Vec<Cow<'static, str>>);

impl ClassList {
    /// Create a class list from static base classes.
    pub fn new(base: &[&'static str]) -> Self {
        let mut list = Self::default();
        for class in base {
            list.push(*class);
        }
        list
    }

    /// Add a class.
    pub fn push(&mut self, class: impl Into<Cow<'static, str>>) {
        let class = class.into();
        if !class.is_empty() && !self.contains(&class) {
            self.0.push(class);
        }
    }

    /// Add a class when `enabled` is set.
    pub fn with(mut self, class: &'static str, enabled: bool) -> Self {
        if enabled {
            self.push(class);
        }
        self
    }

    /// Append whitespace-separated caller classes.
    pub fn extend_raw(mut self, classes: Option<&str>) -> Self {
        if let Some(classes) = classes {
            for class in classes.split_whitespace() {
                self.push(class.to_string());
            }
        }
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(class)?;
        }
        Ok(())
    }
}

// =============================================================================
// Style
// =============================================================================

/// Inline style for one element. Unset fields fall back to the
/// renderer's class-based defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    #[serde(skip)]
    pub attrs: Attr,
}

impl Style {
    /// Layer `other` on top of `self`; set fields in `other` win.
    pub fn merge(self, other: Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: self.attrs | other.attrs,
        }
    }
}

/// Style overrides keyed by component region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    /// The tokenizer container.
    pub tokenizer: Style,
    /// Each token.
    pub token: Style,
    /// A token's close affordance.
    pub token_close: Style,
    /// The embedded text field.
    pub input: Style,
    /// A menu item entry.
    pub result_item: Style,
    /// The clickable part of a menu item.
    pub result_item_link: Style,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_parse() {
        assert_eq!("lg".parse::<Size>().ok(), Some(Size::Large));
        assert_eq!("large".parse::<Size>().ok(), Some(Size::Large));
        assert_eq!("sm".parse::<Size>().ok(), Some(Size::Small));
        assert_eq!("small".parse::<Size>().ok(), Some(Size::Small));
        assert_eq!("".parse::<Size>().ok(), Some(Size::Default));
    }

    #[test]
    fn test_size_parse_is_exact() {
        assert!(matches!("Large".parse::<Size>(), Err(Error::UnknownSize { tag }) if tag == "Large"));
        assert!(matches!(" lg".parse::<Size>(), Err(Error::UnknownSize { .. })));
        assert!(matches!("huge".parse::<Size>(), Err(Error::UnknownSize { .. })));
    }

    #[test]
    fn test_size_class() {
        assert_eq!(Size::Large.class(), Some("input-lg"));
        assert_eq!(Size::Small.class(), Some("input-sm"));
        assert_eq!(Size::Default.class(), None);
    }

    #[test]
    fn test_class_list_composition() {
        let classes = ClassList::new(&["token", "token-removeable"])
            .with("token-selected", true)
            .with("token-disabled", false)
            .extend_raw(Some("custom  token"));

        assert!(classes.contains("token-selected"));
        assert!(!classes.contains("token-disabled"));
        assert_eq!(classes.to_string(), "token token-removeable token-selected custom");
    }

    #[test]
    fn test_style_merge() {
        let base = Style { fg: Some(Rgba::WHITE), bg: None, attrs: Attr::BOLD };
        let over = Style { fg: Some(Rgba::RED), bg: Some(Rgba::BLACK), attrs: Attr::DIM };
        let merged = base.merge(over);
        assert_eq!(merged.fg, Some(Rgba::RED));
        assert_eq!(merged.bg, Some(Rgba::BLACK));
        assert_eq!(merged.attrs, Attr::BOLD | Attr::DIM);
    }

    #[test]
    fn test_style_overrides_deserialize() {
        let overrides: StyleOverrides =
            serde_json::from_str(r#"{"token": {"fg": {"r": 0, "g": 0, "b": 255, "a": 255}}}"#)
                .unwrap();
        assert_eq!(overrides.token.fg, Some(Rgba::BLUE));
        assert_eq!(overrides.input, Style::default());
    }
}
