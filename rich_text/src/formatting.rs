// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;

use crate::{AttributeValue, Font, ParagraphStyle, keys};

/// Supplies the formatting applied to text that does not specify its own.
///
/// The buffer asks for these values whenever an attribute map it stores lacks a font, a
/// paragraph style or a text color.
pub trait FormattingProvider {
    /// The default font.
    fn font(&self) -> Font;

    /// The default paragraph style.
    fn paragraph_style(&self) -> ParagraphStyle;

    /// The default text color.
    fn text_color(&self) -> Color;

    /// The default value for one of the [defaulted keys](keys::DEFAULTED).
    fn value_for(&self, key: &str) -> Option<AttributeValue> {
        if key == keys::FONT.as_str() {
            Some(AttributeValue::Font(self.font()))
        } else if key == keys::PARAGRAPH_STYLE.as_str() {
            Some(AttributeValue::ParagraphStyle(self.paragraph_style()))
        } else if key == keys::FOREGROUND_COLOR.as_str() {
            Some(AttributeValue::Color(self.text_color()))
        } else {
            None
        }
    }
}

/// Fixed default formatting.
///
/// This is the buffer's built-in fallback when no [`FormattingProvider`] is installed, and can
/// be used as a provider in its own right.
#[derive(Clone, Debug)]
pub struct DefaultFormatting {
    /// Font for text without one.
    pub font: Font,
    /// Paragraph style for text without one.
    pub paragraph_style: ParagraphStyle,
    /// Color for text without one.
    pub text_color: Color,
}

impl Default for DefaultFormatting {
    fn default() -> Self {
        Self {
            font: Font::default(),
            paragraph_style: ParagraphStyle::default(),
            text_color: Color::BLACK,
        }
    }
}

impl FormattingProvider for DefaultFormatting {
    fn font(&self) -> Font {
        self.font.clone()
    }

    fn paragraph_style(&self) -> ParagraphStyle {
        self.paragraph_style.clone()
    }

    fn text_color(&self) -> Color {
        self.text_color
    }
}
