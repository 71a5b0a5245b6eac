// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::{BitOr, BitOrAssign};

use crate::{Attachment, AttributedString, AttributedTextBuffer, TextRange};

/// The kinds of change an edit made.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EditActions(u8);

impl EditActions {
    /// No change.
    pub const NONE: Self = Self(0);
    /// Characters were inserted, removed or replaced.
    pub const CHARACTERS: Self = Self(1);
    /// Attributes changed.
    pub const ATTRIBUTES: Self = Self(1 << 1);

    /// The raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every action in `other` is also in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no action is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The actions in either `self` or `other`.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for EditActions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for EditActions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Receives mutation events from an [`AttributedTextBuffer`].
///
/// All calls are synchronous and happen on the mutating thread. The buffer is passed in a
/// consistent state, so implementations may read from it.
pub trait EditSink {
    /// Called before a styled replacement changes the buffer.
    ///
    /// `deleted` is the content currently in `range`; `inserted` is the replacement after
    /// attribute migration.
    fn will_replace(
        &self,
        buffer: &AttributedTextBuffer,
        deleted: &AttributedString,
        inserted: &AttributedString,
        range: TextRange,
    );

    /// Called once for every attachment an operation removed from the buffer, after the
    /// corresponding [`edited`](Self::edited) call.
    fn attachment_deleted(&self, buffer: &AttributedTextBuffer, attachment: &Attachment);

    /// Called once per logical operation after characters or attributes changed.
    ///
    /// `range` is the affected range in the buffer as it is now (post-edit coordinates), and
    /// `delta` is the change in length. This differs from the pre-edit range passed to
    /// [`AttributedTextBuffer::edited`]: a replacement of `(location, length)` is reported as
    /// `(location, length + delta)`. Edits merged by a batch are reported as one range
    /// covering all of them.
    fn edited(
        &self,
        buffer: &AttributedTextBuffer,
        actions: EditActions,
        range: TextRange,
        delta: isize,
    );
}
