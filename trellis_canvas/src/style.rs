// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colors, per-selector styles and the style sheet.

use std::collections::HashMap;

use kurbo::Insets;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::Overflow;

/// An 8-bit RGBA color.
///
/// Deserializes from `"#rrggbb"` or `"#rrggbbaa"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from components including alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| Error::Style(format!("color {s:?} must start with '#'")))?;
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(Error::Style(format!("color {s:?} must have 6 or 8 hex digits")));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::Style(format!("color {s:?} has invalid hex digits")))
        };
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

/// Padding in style documents: `{ "left": 4, "top": 2, ... }`.
#[derive(Copy, Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Padding {
    /// Same padding on all four edges.
    pub const fn uniform(v: f64) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }

    /// As kurbo insets.
    pub fn to_insets(self) -> Insets {
        Insets::new(self.left, self.top, self.right, self.bottom)
    }
}

/// Visual properties for one selector.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Fill color; `None` draws no background.
    pub background: Option<Color>,
    /// Border color; `None` draws no border.
    pub border_color: Option<Color>,
    /// Border stroke width.
    pub border_width: f64,
    /// Text color.
    pub text_color: Color,
    /// Font family; `None` uses the library fallback.
    pub font_family: Option<String>,
    /// Font size in unscaled points.
    pub font_size: f64,
    /// Padding between a control's bounds and its content area.
    pub padding: Padding,
    /// Overflow behavior for containers.
    pub overflow: Overflow,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: None,
            border_color: None,
            border_width: 0.0,
            text_color: Color::BLACK,
            font_family: None,
            font_size: 14.0,
            padding: Padding::default(),
            overflow: Overflow::Visible,
        }
    }
}

/// Styles keyed by selector.
///
/// Controls look up their widget kind (`"button"`, `"textbox"`, ...) or an explicit class.
/// Unknown selectors resolve to [`Style::default`].
///
/// ```rust
/// use trellis_canvas::{Color, StyleSheet};
///
/// let sheet = StyleSheet::from_json(r##"{ "button": { "background": "#ff0000" } }"##).unwrap();
/// assert_eq!(sheet.resolve("button").background, Some(Color::rgb(255, 0, 0)));
/// // Built-in selectors not named in the document keep their defaults.
/// assert!(sheet.get("textbox").is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSheet {
    rules: HashMap<String, Style>,
    fallback: Style,
}

impl Default for StyleSheet {
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            "canvas".into(),
            Style {
                background: Some(Color::rgb(0xf0, 0xf0, 0xf0)),
                ..Style::default()
            },
        );
        rules.insert(
            "button".into(),
            Style {
                background: Some(Color::rgb(0xdd, 0xdd, 0xdd)),
                border_color: Some(Color::rgb(0x70, 0x70, 0x70)),
                border_width: 1.0,
                padding: Padding::uniform(4.0),
                ..Style::default()
            },
        );
        rules.insert(
            "textbox".into(),
            Style {
                background: Some(Color::WHITE),
                border_color: Some(Color::rgb(0x70, 0x70, 0x70)),
                border_width: 1.0,
                padding: Padding::uniform(3.0),
                overflow: Overflow::Hidden,
                ..Style::default()
            },
        );
        rules.insert(
            "checkbox".into(),
            Style {
                border_color: Some(Color::rgb(0x40, 0x40, 0x40)),
                border_width: 1.0,
                ..Style::default()
            },
        );
        rules.insert(
            "tab".into(),
            Style {
                background: Some(Color::rgb(0xe8, 0xe8, 0xe8)),
                border_color: Some(Color::rgb(0x90, 0x90, 0x90)),
                border_width: 1.0,
                ..Style::default()
            },
        );
        Self {
            rules,
            fallback: Style::default(),
        }
    }
}

impl StyleSheet {
    /// A sheet with no rules at all.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
            fallback: Style::default(),
        }
    }

    /// Parse a JSON object of `selector -> style`, layered over the built-in rules.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: HashMap<String, Style> = serde_json::from_str(json)?;
        let mut sheet = Self::default();
        sheet.rules.extend(parsed);
        Ok(sheet)
    }

    /// Insert or replace a rule.
    pub fn insert(&mut self, selector: impl Into<String>, style: Style) {
        self.rules.insert(selector.into(), style);
    }

    /// Rule for `selector`, if present.
    pub fn get(&self, selector: &str) -> Option<&Style> {
        self.rules.get(selector)
    }

    /// Rule for `selector`, or the default style.
    pub fn resolve(&self, selector: &str) -> &Style {
        self.rules.get(selector).unwrap_or(&self.fallback)
    }
}
