// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::Error;

/// A `(location, length)` range of characters in an attributed text.
///
/// Offsets count Unicode scalar values (`char`s), not bytes, so a range can never split a
/// character.
///
/// A `TextRange` on its own says nothing about the text it will be used with. Use
/// [`TextRange::checked`] to validate it against a text length, or [`TextRange::clamped`] to
/// shrink it to the part that lies inside the text.
///
/// ## Example
///
/// ```
/// use attributed_text::TextRange;
///
/// let range = TextRange::new(2, 5);
/// assert_eq!(range.end(), 7);
/// assert_eq!(range.clamped(4), TextRange::new(2, 2));
/// assert!(range.checked(6).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextRange {
    location: usize,
    length: usize,
}

impl TextRange {
    /// Creates a range starting at `location` and covering `length` characters.
    #[must_use]
    #[inline]
    pub const fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    /// Creates an empty range at `location`.
    #[must_use]
    #[inline]
    pub const fn empty(location: usize) -> Self {
        Self::new(location, 0)
    }

    /// Creates a range from `start..end` offsets.
    #[inline]
    pub fn from_bounds(start: usize, end: usize) -> Result<Self, Error> {
        if start > end {
            return Err(Error::invalid_range(start, end));
        }
        Ok(Self::new(start, end - start))
    }

    /// The first offset covered by this range.
    #[must_use]
    #[inline]
    pub const fn location(self) -> usize {
        self.location
    }

    /// The number of characters covered by this range.
    #[must_use]
    #[inline]
    pub const fn len(self) -> usize {
        self.length
    }

    /// Returns `true` if the range covers no characters.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.length == 0
    }

    /// The start offset; the same as [`location`](Self::location).
    #[must_use]
    #[inline]
    pub const fn start(self) -> usize {
        self.location
    }

    /// The end offset (exclusive), saturating at `usize::MAX`.
    #[must_use]
    #[inline]
    pub const fn end(self) -> usize {
        self.location.saturating_add(self.length)
    }

    /// Returns this range as a `Range<usize>`.
    #[must_use]
    #[inline]
    pub const fn as_range(self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Returns `true` if this range lies entirely within a text of `len` characters.
    #[must_use]
    #[inline]
    pub fn is_valid_for(self, len: usize) -> bool {
        self.location
            .checked_add(self.length)
            .is_some_and(|end| end <= len)
    }

    /// Returns this range if it lies within a text of `len` characters.
    #[inline]
    pub fn checked(self, len: usize) -> Result<Self, Error> {
        if self.is_valid_for(len) {
            Ok(self)
        } else {
            Err(Error::invalid_bounds(self.location, self.end(), len))
        }
    }

    /// Shrinks this range to the part that lies within `0..upper_bound`.
    ///
    /// A range starting past the bound becomes an empty range at the bound.
    #[must_use]
    #[inline]
    pub fn clamped(self, upper_bound: usize) -> Self {
        let location = self.location.min(upper_bound);
        let length = self.length.min(upper_bound - location);
        Self::new(location, length)
    }

    /// Returns `true` if `offset` is covered by this range.
    #[must_use]
    #[inline]
    pub fn contains(self, offset: usize) -> bool {
        offset >= self.start() && offset < self.end()
    }

    /// The overlap of two ranges, if they share at least one position.
    ///
    /// Touching ranges produce an empty range at the shared boundary.
    #[must_use]
    pub fn intersection(self, other: Self) -> Option<Self> {
        let start = self.start().max(other.start());
        let end = self.end().min(other.end());
        (start <= end).then(|| Self::new(start, end - start))
    }

    /// The smallest range covering both ranges.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let start = self.start().min(other.start());
        let end = self.end().max(other.end());
        Self::new(start, end - start)
    }

    /// The one-character range at the start of this range.
    #[must_use]
    #[inline]
    pub const fn first_char(self) -> Self {
        Self::new(self.location, 1)
    }

    /// The one-character range immediately after this range.
    #[must_use]
    #[inline]
    pub const fn char_after(self) -> Self {
        Self::new(self.end(), 1)
    }
}

impl TryFrom<Range<usize>> for TextRange {
    type Error = Error;

    #[inline]
    fn try_from(value: Range<usize>) -> Result<Self, Self::Error> {
        Self::from_bounds(value.start, value.end)
    }
}

impl From<TextRange> for Range<usize> {
    #[inline]
    fn from(value: TextRange) -> Self {
        value.as_range()
    }
}
