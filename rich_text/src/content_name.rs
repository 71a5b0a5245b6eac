// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::borrow::Cow;
use alloc::string::String;
use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

/// A classification tag for a run of content, such as a paragraph or a named attachment.
///
/// Names are compared by their raw string value. The raw value is also the persisted form:
/// [`raw_value`](Self::raw_value) and [`ContentName::new`] (or [`FromStr`]) round trip.
///
/// ```
/// use rich_text::ContentName;
///
/// let name: ContentName = "_paragraph".parse().unwrap();
/// assert_eq!(name, ContentName::PARAGRAPH);
/// assert_eq!(ContentName::new(name.raw_value().to_owned()), name);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ContentName(Cow<'static, str>);

impl ContentName {
    /// Ordinary block content; the default for block-level enumeration.
    pub const PARAGRAPH: Self = Self::from_static("_paragraph");
    /// Structural, non-editable content.
    pub const VIEW_ONLY: Self = Self::from_static("_viewOnly");
    /// A line break.
    pub const NEWLINE: Self = Self::from_static("_newline");
    /// Ordinary inline text; the default for inline-level enumeration.
    pub const TEXT: Self = Self::from_static("_text");
    /// Content that could not be classified.
    pub const UNKNOWN: Self = Self::from_static("_unknown");
    /// Marker for block-level classification. Shares its raw value with [`PARAGRAPH`](Self::PARAGRAPH).
    pub const BLOCK_CONTENT_TYPE: Self = Self::from_static("_paragraph");
    /// Marker for inline-level classification.
    pub const INLINE_CONTENT_TYPE: Self = Self::from_static("_inline");
    /// Marker for block attachments.
    pub const IS_BLOCK_ATTACHMENT: Self = Self::from_static("_isBlockAttachment");
    /// Marker for inline attachments.
    pub const IS_INLINE_ATTACHMENT: Self = Self::from_static("_isInlineAttachment");

    /// Creates a name from a string with static lifetime, usable in `const` items.
    #[must_use]
    pub const fn from_static(raw_value: &'static str) -> Self {
        Self(Cow::Borrowed(raw_value))
    }

    /// Creates a name from its raw value.
    pub fn new(raw_value: impl Into<Cow<'static, str>>) -> Self {
        Self(raw_value.into())
    }

    /// The raw string value.
    pub fn raw_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ContentName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Cow::Owned(String::from(s))))
    }
}

impl From<&'static str> for ContentName {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for ContentName {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<ContentName> for String {
    fn from(value: ContentName) -> Self {
        value.0.into_owned()
    }
}
