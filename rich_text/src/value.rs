// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;

use peniko::Color;

use crate::{Attachment, ContentName};

/// A font description.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family name.
    pub family: Arc<str>,
    /// Size in points.
    pub size: f32,
    /// Weight on the usual `1..=1000` scale; 400 is regular.
    pub weight: u16,
    /// Whether the italic face is requested.
    pub italic: bool,
}

impl Font {
    /// Creates a regular-weight, upright font.
    pub fn new(family: impl Into<Arc<str>>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            weight: 400,
            italic: false,
        }
    }

    /// Returns this font with a bold weight.
    #[must_use]
    pub fn bold(self) -> Self {
        Self {
            weight: 700,
            ..self
        }
    }

    /// Returns this font with the italic face.
    #[must_use]
    pub fn italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    /// Returns this font at another size.
    #[must_use]
    pub fn with_size(self, size: f32) -> Self {
        Self { size, ..self }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("system-ui", 17.0)
    }
}

/// Horizontal alignment of the lines of a paragraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlignment {
    /// Follow the writing direction.
    #[default]
    Natural,
    /// Align to the left edge.
    Left,
    /// Align to the right edge.
    Right,
    /// Center lines.
    Center,
    /// Stretch lines to both edges.
    Justified,
}

/// Paragraph-level layout settings.
///
/// Zero means "unset" for every length, so the default style leaves layout to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphStyle {
    /// Line alignment.
    pub alignment: TextAlignment,
    /// Extra space between lines, in points.
    pub line_spacing: f32,
    /// Line height as a multiple of the natural height.
    pub line_height_multiple: f32,
    /// Space after the paragraph, in points.
    pub paragraph_spacing: f32,
    /// Space before the paragraph, in points.
    pub paragraph_spacing_before: f32,
    /// Indent of the first line, in points.
    pub first_line_head_indent: f32,
    /// Indent of the other lines, in points.
    pub head_indent: f32,
    /// Indent from the trailing edge, in points.
    pub tail_indent: f32,
}

/// Underline decoration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnderlineStyle {
    /// No underline.
    #[default]
    None,
    /// A single thin line.
    Single,
    /// Two thin lines.
    Double,
    /// A single thick line.
    Thick,
}

/// The value of an attribute in an [`AttributedString`](crate::AttributedString).
#[derive(Clone, Debug)]
pub enum AttributeValue {
    /// A font.
    Font(Font),
    /// Paragraph settings.
    ParagraphStyle(ParagraphStyle),
    /// A color.
    Color(Color),
    /// An underline decoration.
    Underline(UnderlineStyle),
    /// An embedded object.
    Attachment(Attachment),
    /// A boolean flag.
    Flag(bool),
    /// A content classification.
    Name(ContentName),
    /// Free-form text.
    Text(Arc<str>),
    /// A number.
    Number(f64),
}

impl AttributeValue {
    /// Returns the font, if this is a font.
    pub fn as_font(&self) -> Option<&Font> {
        match self {
            Self::Font(font) => Some(font),
            _ => None,
        }
    }

    /// Returns the paragraph style, if this is one.
    pub fn as_paragraph_style(&self) -> Option<&ParagraphStyle> {
        match self {
            Self::ParagraphStyle(style) => Some(style),
            _ => None,
        }
    }

    /// Returns the color, if this is a color.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            _ => None,
        }
    }

    /// Returns the attachment, if this is an attachment.
    pub fn as_attachment(&self) -> Option<&Attachment> {
        match self {
            Self::Attachment(attachment) => Some(attachment),
            _ => None,
        }
    }

    /// Returns the flag, if this is a flag.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the content name, if this is a name.
    pub fn as_name(&self) -> Option<&ContentName> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Interprets this value as a content name.
    ///
    /// Plain text values are accepted so names written by a layer that stores raw strings
    /// still classify.
    pub fn to_content_name(&self) -> Option<ContentName> {
        match self {
            Self::Name(name) => Some(name.clone()),
            Self::Text(text) => Some(ContentName::new(alloc::string::String::from(&**text))),
            _ => None,
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Font(a), Self::Font(b)) => a == b,
            (Self::ParagraphStyle(a), Self::ParagraphStyle(b)) => a == b,
            (Self::Color(a), Self::Color(b)) => a.components == b.components,
            (Self::Underline(a), Self::Underline(b)) => a == b,
            (Self::Attachment(a), Self::Attachment(b)) => a == b,
            (Self::Flag(a), Self::Flag(b)) => a == b,
            (Self::Name(a), Self::Name(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Font> for AttributeValue {
    fn from(value: Font) -> Self {
        Self::Font(value)
    }
}

impl From<ParagraphStyle> for AttributeValue {
    fn from(value: ParagraphStyle) -> Self {
        Self::ParagraphStyle(value)
    }
}

impl From<Color> for AttributeValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<UnderlineStyle> for AttributeValue {
    fn from(value: UnderlineStyle) -> Self {
        Self::Underline(value)
    }
}

impl From<Attachment> for AttributeValue {
    fn from(value: Attachment) -> Self {
        Self::Attachment(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<ContentName> for AttributeValue {
    fn from(value: ContentName) -> Self {
        Self::Name(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(Arc::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}
