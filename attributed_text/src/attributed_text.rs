// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use crate::{AttributeKey, AttributeRuns, Attributes, Error, PresenceRuns, TextRange};

/// A contiguous stretch of text sharing one attribute map.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Run<V> {
    pub(crate) len: usize,
    pub(crate) attributes: Attributes<V>,
}

/// A string with an attribute map attached to every character.
///
/// Storage is a list of runs. Adjacent runs with equal attribute maps are always merged, so the
/// run containing an offset is the maximal stretch around it over which *all* attributes are
/// unchanged.
///
/// Offsets and lengths are in characters. Queries clamp or return `None` for out-of-range
/// input; mutations validate their range and return an [`Error`] instead of applying a partial
/// change.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributedText<V> {
    text: String,
    len: usize,
    runs: Vec<Run<V>>,
}

impl<V> Default for AttributedText<V> {
    fn default() -> Self {
        Self {
            text: String::new(),
            len: 0,
            runs: Vec::new(),
        }
    }
}

impl<V: Clone + PartialEq> AttributedText<V> {
    /// Creates an empty text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a text with `attributes` applied to every character.
    pub fn from_text(text: impl Into<String>, attributes: Attributes<V>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        let runs = if len == 0 {
            Vec::new()
        } else {
            alloc::vec![Run { len, attributes }]
        };
        Self { text, len, runs }
    }

    /// Creates a text without attributes.
    #[expect(
        clippy::should_implement_trait,
        reason = "Construction cannot fail, so `FromStr` would only add an `Infallible` error."
    )]
    pub fn from_str(text: &str) -> Self {
        Self::from_text(text, Attributes::new())
    }

    /// Returns the length of the text, in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The full range of the text.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(0, self.len)
    }

    /// Returns the character at `offset`.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.len {
            return None;
        }
        self.text.chars().nth(offset)
    }

    /// Borrow the characters in `range`, clamped to the text.
    pub fn slice(&self, range: TextRange) -> &str {
        let range = range.clamped(self.len);
        &self.text[self.byte_range(range)]
    }

    /// Returns the attributes at `offset` and the range of the run they apply to.
    pub fn attributes_at(&self, offset: usize) -> Option<(&Attributes<V>, TextRange)> {
        let (ix, start) = self.run_index(offset)?;
        let run = &self.runs[ix];
        Some((&run.attributes, TextRange::new(start, run.len)))
    }

    /// Returns the value of `key` at `offset` and the range of the run containing `offset`.
    ///
    /// The range is not extended over neighbouring runs that share the value; use
    /// [`longest_effective_range`](Self::longest_effective_range) for that.
    pub fn attribute(&self, key: &str, offset: usize) -> Option<(&V, TextRange)> {
        let (attributes, range) = self.attributes_at(offset)?;
        attributes.get(key).map(|value| (value, range))
    }

    /// Returns the value of `key` at `offset` (or `None` when absent) together with the
    /// longest range around `offset`, within `within`, over which that value does not change.
    ///
    /// Returns `None` when `offset` is not inside `within` clamped to the text.
    pub fn longest_effective_range(
        &self,
        key: &str,
        offset: usize,
        within: TextRange,
    ) -> Option<(Option<&V>, TextRange)> {
        let within = within.clamped(self.len);
        if !within.contains(offset) {
            return None;
        }
        let (ix, run_start) = self.run_index(offset)?;
        let value = self.runs[ix].attributes.get(key);

        let mut start = run_start;
        let mut first = ix;
        while start > within.start() && first > 0 {
            let prev = &self.runs[first - 1];
            if prev.attributes.get(key) != value {
                break;
            }
            first -= 1;
            start -= prev.len;
        }

        let mut end = run_start + self.runs[ix].len;
        let mut last = ix;
        while end < within.end() && last + 1 < self.runs.len() {
            let next = &self.runs[last + 1];
            if next.attributes.get(key) != value {
                break;
            }
            last += 1;
            end += next.len;
        }

        let start = start.max(within.start());
        let end = end.min(within.end());
        Some((value, TextRange::new(start, end - start)))
    }

    /// Iterate over the runs overlapping `range`, clipped to it.
    pub fn runs(&self, range: TextRange) -> AttributeRuns<'_, V> {
        AttributeRuns::new(&self.runs, range.clamped(self.len))
    }

    /// Iterate over maximal stretches of `range` where `key` is present or absent.
    pub fn presence_runs<'a>(&'a self, key: &'a str, range: TextRange) -> PresenceRuns<'a, V> {
        PresenceRuns::new(self.runs(range), key)
    }

    /// Returns a copy of the characters and attributes in `range`, clamped to the text.
    #[must_use]
    pub fn substring(&self, range: TextRange) -> Self {
        let range = range.clamped(self.len);
        let runs = self
            .runs(range)
            .map(|(run_range, attributes)| Run {
                len: run_range.len(),
                attributes: attributes.clone(),
            })
            .collect();
        Self {
            text: String::from(self.slice(range)),
            len: range.len(),
            runs,
        }
    }

    /// Returns a copy with `attributes` added over `range` (clamped), or over the whole text
    /// when `range` is `None`.
    #[must_use]
    pub fn with_attributes(&self, attributes: &Attributes<V>, range: Option<TextRange>) -> Self {
        let range = range.map_or(self.full_range(), |range| range.clamped(self.len));
        let mut copy = self.clone();
        copy.update_runs(range, |run| run.extend_from(attributes));
        copy
    }

    /// Replaces the characters in `range` with `text`.
    ///
    /// The new characters take the attributes of the first replaced character. When `range` is
    /// empty they take the attributes of the preceding character, or of the following one at
    /// the start of the text.
    pub fn replace_str(&mut self, range: TextRange, text: &str) -> Result<(), Error> {
        let range = range.checked(self.len)?;
        let attributes = self.inherited_attributes(range);
        let len = text.chars().count();
        self.splice(range, text, core::iter::once(Run { len, attributes }));
        Ok(())
    }

    /// Replaces the characters and attributes in `range` with `replacement`.
    pub fn replace(&mut self, range: TextRange, replacement: &Self) -> Result<(), Error> {
        let range = range.checked(self.len)?;
        self.splice(range, &replacement.text, replacement.runs.iter().cloned());
        Ok(())
    }

    /// Appends `other` to the end of this text.
    pub fn append(&mut self, other: &Self) {
        let end = TextRange::empty(self.len);
        self.splice(end, &other.text, other.runs.iter().cloned());
    }

    /// Appends `text` with the given attributes.
    pub fn push_str(&mut self, text: &str, attributes: Attributes<V>) {
        let len = text.chars().count();
        let end = TextRange::empty(self.len);
        self.splice(end, text, core::iter::once(Run { len, attributes }));
    }

    /// Replaces the attributes of every character in `range`.
    pub fn set_attributes(
        &mut self,
        attributes: &Attributes<V>,
        range: TextRange,
    ) -> Result<(), Error> {
        self.map_runs(range, |run| run.clone_from(attributes))
    }

    /// Adds `attributes` to every character in `range`, overwriting existing values.
    pub fn add_attributes(
        &mut self,
        attributes: &Attributes<V>,
        range: TextRange,
    ) -> Result<(), Error> {
        self.map_runs(range, |run| run.extend_from(attributes))
    }

    /// Sets `key` to `value` on every character in `range`.
    pub fn add_attribute(
        &mut self,
        key: impl Into<AttributeKey>,
        value: V,
        range: TextRange,
    ) -> Result<(), Error> {
        let key = key.into();
        self.map_runs(range, |run| {
            run.insert(key.clone(), value.clone());
        })
    }

    /// Removes `key` from every character in `range`.
    pub fn remove_attribute(&mut self, key: &str, range: TextRange) -> Result<(), Error> {
        self.map_runs(range, |run| {
            run.remove(key);
        })
    }

    /// Calls `f` on the attribute map of every run in `range`, splitting runs at the range
    /// boundaries first and merging equal runs afterwards.
    pub fn map_runs(
        &mut self,
        range: TextRange,
        f: impl FnMut(&mut Attributes<V>),
    ) -> Result<(), Error> {
        let range = range.checked(self.len)?;
        self.update_runs(range, f);
        Ok(())
    }

    fn update_runs(&mut self, range: TextRange, mut f: impl FnMut(&mut Attributes<V>)) {
        if range.is_empty() {
            return;
        }
        let indices = self.isolate(range);
        for run in &mut self.runs[indices] {
            f(&mut run.attributes);
        }
        self.coalesce();
    }

    fn inherited_attributes(&self, range: TextRange) -> Attributes<V> {
        let source = if !range.is_empty() {
            range.start()
        } else if range.start() > 0 {
            range.start() - 1
        } else {
            range.start()
        };
        self.attributes_at(source)
            .map(|(attributes, _)| attributes.clone())
            .unwrap_or_default()
    }

    fn splice(&mut self, range: TextRange, text: &str, runs: impl IntoIterator<Item = Run<V>>) {
        let bytes = self.byte_range(range);
        self.text.replace_range(bytes, text);
        let indices = self.isolate(range);
        self.runs
            .splice(indices, runs.into_iter().filter(|run| run.len > 0));
        self.len = self.len - range.len() + text.chars().count();
        self.coalesce();
        debug_assert_eq!(
            self.runs.iter().map(|run| run.len).sum::<usize>(),
            self.len,
            "runs must cover the text exactly"
        );
    }

    /// Splits runs so that `range` starts and ends on run boundaries and returns the indices
    /// of the runs it covers.
    fn isolate(&mut self, range: TextRange) -> Range<usize> {
        let first = self.split_at(range.start());
        let last = self.split_at(range.end());
        first..last
    }

    /// Ensures a run starts at `offset`, returning its index (`runs.len()` at the end).
    fn split_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for ix in 0..self.runs.len() {
            if start == offset {
                return ix;
            }
            let end = start + self.runs[ix].len;
            if offset < end {
                let tail = Run {
                    len: end - offset,
                    attributes: self.runs[ix].attributes.clone(),
                };
                self.runs[ix].len = offset - start;
                self.runs.insert(ix + 1, tail);
                return ix + 1;
            }
            start = end;
        }
        self.runs.len()
    }

    fn coalesce(&mut self) {
        self.runs.retain(|run| run.len > 0);
        self.runs.dedup_by(|next, prev| {
            if next.attributes == prev.attributes {
                prev.len += next.len;
                true
            } else {
                false
            }
        });
    }
}

impl<V> AttributedText<V> {
    /// Returns the index and start offset of the run containing `offset`.
    fn run_index(&self, offset: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (ix, run) in self.runs.iter().enumerate() {
            if offset < start + run.len {
                return Some((ix, start));
            }
            start += run.len;
        }
        None
    }

    fn byte_offset(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    fn byte_range(&self, range: TextRange) -> Range<usize> {
        self.byte_offset(range.start())..self.byte_offset(range.end())
    }
}
