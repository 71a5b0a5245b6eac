// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich Text is the storage layer of a rich text editor.
//!
//! - [`AttributedTextBuffer`] is an attributed string that keeps its attributes consistent
//!   across edits: it backfills default formatting, keeps attachments on their object
//!   replacement character, unifies paragraph styles and carries styling over when content is
//!   replaced.
//! - [`EditSink`] receives the buffer's notifications, which can be batched with
//!   [`AttributedTextBuffer::begin_editing`] and [`AttributedTextBuffer::end_editing`].
//! - [`Attachment`] embeds non-text content, optionally shown by a [`ContentView`].
//! - [`Contents`] splits a buffer into classified [`ContentSegment`]s, named by
//!   [`ContentName`].
//!
//! Attribute values are [`AttributeValue`]s keyed by the constants in [`keys`]. Offsets count
//! characters (Unicode scalar values).
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use rich_text::{
//!     Attachment, AttributedString, AttributedTextBuffer, EditActions, EditSink, TextRange,
//! };
//!
//! #[derive(Default)]
//! struct Log(RefCell<Vec<(TextRange, isize)>>);
//!
//! impl EditSink for Log {
//!     fn will_replace(
//!         &self,
//!         _: &AttributedTextBuffer,
//!         _: &AttributedString,
//!         _: &AttributedString,
//!         _: TextRange,
//!     ) {
//!     }
//!
//!     fn attachment_deleted(&self, _: &AttributedTextBuffer, _: &Attachment) {}
//!
//!     fn edited(
//!         &self,
//!         _: &AttributedTextBuffer,
//!         _: EditActions,
//!         range: TextRange,
//!         delta: isize,
//!     ) {
//!         self.0.borrow_mut().push((range, delta));
//!     }
//! }
//!
//! let log = Rc::new(Log::default());
//! let mut buffer = AttributedTextBuffer::new();
//! buffer.set_sink(Rc::downgrade(&log));
//! buffer.replace_characters(TextRange::empty(0), "Hello\nworld");
//! assert_eq!(log.0.borrow().as_slice(), [(TextRange::new(0, 11), 11)]);
//!
//! let blocks: Vec<_> = buffer
//!     .contents(None)
//!     .filter_map(|segment| segment.enclosing_range)
//!     .collect();
//! assert_eq!(
//!     blocks,
//!     [TextRange::new(0, 5), TextRange::new(5, 1), TextRange::new(6, 5)]
//! );
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the standard library for floating point math.
//! - `libm`: Use `libm` for floating point math in `no_std` builds.
//! - `serde`: Serialize and deserialize [`ContentName`] as its raw value.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

pub mod keys;

mod attachment;
mod buffer;
mod content;
mod content_name;
mod contents;
mod fix;
mod formatting;
mod sink;
mod value;

#[cfg(test)]
mod tests;

pub use attributed_text::{AttributeKey, Error, ErrorKind, TextRange};
pub use peniko::Color;

pub use crate::attachment::{
    Attachment, AttachmentId, AttachmentKind, ContentView, OBJECT_REPLACEMENT_CHARACTER,
};
pub use crate::buffer::AttributedTextBuffer;
pub use crate::content::{ContentKind, ContentSegment};
pub use crate::content_name::ContentName;
pub use crate::contents::{Contents, RunMode};
pub use crate::formatting::{DefaultFormatting, FormattingProvider};
pub use crate::sink::{EditActions, EditSink};
pub use crate::value::{AttributeValue, Font, ParagraphStyle, TextAlignment, UnderlineStyle};

/// The attribute map stored on every character of a buffer.
pub type Attributes = attributed_text::Attributes<AttributeValue>;

/// An attributed string with [`AttributeValue`] attributes.
pub type AttributedString = attributed_text::AttributedText<AttributeValue>;
