// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attributed Text is a Rust crate for strings that carry a map of attributes on every
//! character.
//!
//! - [`AttributedText`] stores the text and a coalesced list of attribute runs.
//! - [`Attributes`] is the ordered per-run map from [`AttributeKey`] to a value type of your
//!   choosing.
//! - [`TextRange`] addresses characters as `(location, length)`.
//!
//! Offsets count characters (Unicode scalar values), not bytes.
//!
//! Queries are lenient: out-of-range offsets return `None` and ranges are clamped. Mutations
//! are strict: a range that does not fit the text is reported as an [`Error`] and nothing
//! changes.
//!
//! ## Example
//!
//! ```
//! use attributed_text::{AttributeKey, AttributedText, Attributes, TextRange};
//!
//! const WEIGHT: AttributeKey = AttributeKey::from_static("weight");
//!
//! let mut text = AttributedText::from_text("Hello world", Attributes::new());
//! text.add_attribute(WEIGHT, 700_u16, TextRange::new(6, 5)).unwrap();
//!
//! let runs: Vec<_> = text.runs(text.full_range()).map(|(range, _)| range).collect();
//! assert_eq!(runs, [TextRange::new(0, 6), TextRange::new(6, 5)]);
//! assert_eq!(text.attribute("weight", 8).map(|(w, _)| *w), Some(700));
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward compatibility.
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

mod attribute_runs;
mod attributed_text;
mod attributes;
mod error;
mod text_range;

pub use crate::attribute_runs::{AttributeRuns, PresenceRuns};
pub use crate::attributed_text::AttributedText;
pub use crate::attributes::{AttributeKey, Attributes};
pub use crate::error::{Error, ErrorKind};
pub use crate::text_range::TextRange;
