// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Well-known attribute keys.
//!
//! The content-model keys are a shared vocabulary: everything that reads or writes buffer
//! attributes must agree on them.

use attributed_text::AttributeKey;

/// Font of the text, an [`AttributeValue::Font`](crate::AttributeValue::Font).
pub const FONT: AttributeKey = AttributeKey::from_static("font");

/// Paragraph settings, an [`AttributeValue::ParagraphStyle`](crate::AttributeValue::ParagraphStyle).
pub const PARAGRAPH_STYLE: AttributeKey = AttributeKey::from_static("paragraphStyle");

/// Text color, an [`AttributeValue::Color`](crate::AttributeValue::Color).
pub const FOREGROUND_COLOR: AttributeKey = AttributeKey::from_static("foregroundColor");

/// Underline decoration. Never carried over when a styled replacement is migrated.
pub const UNDERLINE_STYLE: AttributeKey = AttributeKey::from_static("underlineStyle");

/// Block-level classification, an [`AttributeValue::Name`](crate::AttributeValue::Name).
pub const CONTENT_TYPE: AttributeKey = AttributeKey::from_static("contentType");

/// Inline-level classification, an [`AttributeValue::Name`](crate::AttributeValue::Name).
pub const INLINE_CONTENT_TYPE: AttributeKey = AttributeKey::from_static("inlineContentType");

/// Marks a run as structural and non-editable.
pub const VIEW_ONLY: AttributeKey = AttributeKey::from_static("viewOnly");

/// Flag set on the character of a block attachment.
pub const IS_BLOCK_ATTACHMENT: AttributeKey = AttributeKey::from_static("isBlockAttachment");

/// Flag set on the character of an inline attachment.
pub const IS_INLINE_ATTACHMENT: AttributeKey = AttributeKey::from_static("isInlineAttachment");

/// The embedded object, an [`AttributeValue::Attachment`](crate::AttributeValue::Attachment).
pub const ATTACHMENT: AttributeKey = AttributeKey::from_static("attachment");

/// Keys that every character should carry, backfilled from the default formatting.
pub const DEFAULTED: [AttributeKey; 3] = [FONT, PARAGRAPH_STYLE, FOREGROUND_COLOR];
