// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;

use crate::{Attachment, AttachmentKind, AttributedString, ContentName, ContentView, TextRange};

/// What a [`ContentSegment`] holds.
#[derive(Clone, Debug)]
pub enum ContentKind {
    /// A stretch of text.
    Text {
        /// The classification of the text.
        name: ContentName,
        /// The text and its attributes.
        text: AttributedString,
    },
    /// An attachment with a view.
    Attachment {
        /// The classification of the attachment's character.
        name: ContentName,
        /// The attachment.
        attachment: Attachment,
        /// The attachment's view.
        view: Arc<dyn ContentView>,
        /// Whether the attachment sits between blocks or within a line.
        placement: AttachmentKind,
    },
    /// Content that is shown but carries nothing to extract.
    ViewOnly,
}

/// One classified piece of a buffer's content.
#[derive(Clone, Debug)]
pub struct ContentSegment {
    /// The content.
    pub kind: ContentKind,
    /// Where the segment came from in the enumerated text, when known.
    pub enclosing_range: Option<TextRange>,
}

impl ContentSegment {
    /// Creates a segment with no source range.
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            enclosing_range: None,
        }
    }

    /// Creates a segment taken from `range`.
    pub fn with_range(kind: ContentKind, range: TextRange) -> Self {
        Self {
            kind,
            enclosing_range: Some(range),
        }
    }

    /// The segment's classification; `None` for view-only content.
    pub fn name(&self) -> Option<&ContentName> {
        match &self.kind {
            ContentKind::Text { name, .. } | ContentKind::Attachment { name, .. } => Some(name),
            ContentKind::ViewOnly => None,
        }
    }

    /// The text, for text segments.
    pub fn text(&self) -> Option<&AttributedString> {
        match &self.kind {
            ContentKind::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The attachment, for attachment segments.
    pub fn attachment(&self) -> Option<&Attachment> {
        match &self.kind {
            ContentKind::Attachment { attachment, .. } => Some(attachment),
            _ => None,
        }
    }

    /// Returns `true` for view-only segments.
    pub fn is_view_only(&self) -> bool {
        matches!(self.kind, ContentKind::ViewOnly)
    }
}
