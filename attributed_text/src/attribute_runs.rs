// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run iteration for [`AttributedText`](crate::AttributedText).
//!
//! Runs in storage never overlap and are always coalesced, so iteration is a single forward
//! walk that clips the first and last run to the requested range.

use core::iter::{FusedIterator, Peekable};

use crate::attributed_text::Run;
use crate::{Attributes, TextRange};

/// Iterator over the attribute runs overlapping a range.
///
/// Yields `(range, attributes)` pairs in document order. Ranges are non-empty, contiguous and
/// clipped to the requested range.
///
/// # Examples
///
/// ```
/// use attributed_text::{AttributedText, Attributes, TextRange};
///
/// let mut text = AttributedText::from_text("hello", Attributes::new().with("color", "red"));
/// text.add_attribute("color", "blue", TextRange::new(2, 3)).unwrap();
///
/// let colors: Vec<_> = text
///     .runs(TextRange::new(1, 4))
///     .map(|(range, attrs)| (range, *attrs.get("color").unwrap()))
///     .collect();
/// assert_eq!(
///     colors,
///     [(TextRange::new(1, 1), "red"), (TextRange::new(2, 3), "blue")]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct AttributeRuns<'a, V> {
    runs: core::slice::Iter<'a, Run<V>>,
    position: usize,
    range: TextRange,
}

impl<'a, V> AttributeRuns<'a, V> {
    pub(crate) fn new(runs: &'a [Run<V>], range: TextRange) -> Self {
        Self {
            runs: runs.iter(),
            position: 0,
            range,
        }
    }
}

impl<'a, V> Iterator for AttributeRuns<'a, V> {
    type Item = (TextRange, &'a Attributes<V>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.range.is_empty() {
            return None;
        }
        loop {
            let run = self.runs.next()?;
            let start = self.position;
            let end = start + run.len;
            self.position = end;
            if end <= self.range.start() {
                continue;
            }
            if start >= self.range.end() {
                return None;
            }
            let start = start.max(self.range.start());
            let end = end.min(self.range.end());
            return Some((TextRange::new(start, end - start), &run.attributes));
        }
    }
}

impl<V> FusedIterator for AttributeRuns<'_, V> {}

/// Iterator over stretches of a range where an attribute is present or absent.
///
/// Yields `(present, range)` pairs. Consecutive items always alternate between `true` and
/// `false`; their ranges are contiguous and together cover the requested range.
#[derive(Clone, Debug)]
pub struct PresenceRuns<'a, V> {
    runs: Peekable<AttributeRuns<'a, V>>,
    key: &'a str,
}

impl<'a, V> PresenceRuns<'a, V> {
    pub(crate) fn new(runs: AttributeRuns<'a, V>, key: &'a str) -> Self {
        Self {
            runs: runs.peekable(),
            key,
        }
    }
}

impl<V> Iterator for PresenceRuns<'_, V> {
    type Item = (bool, TextRange);

    fn next(&mut self) -> Option<Self::Item> {
        let (mut range, attributes) = self.runs.next()?;
        let present = attributes.contains_key(self.key);
        while let Some((next, _)) = self
            .runs
            .next_if(|(_, attributes)| attributes.contains_key(self.key) == present)
        {
            range = range.union(next);
        }
        Some((present, range))
    }
}

impl<V> FusedIterator for PresenceRuns<'_, V> {}
