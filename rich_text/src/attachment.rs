// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::{self, Debug};
use core::hash::{Hash, Hasher};

use crate::{AttributeValue, AttributedString, Attributes, ContentName, keys};

/// The character an attachment occupies in the text.
pub const OBJECT_REPLACEMENT_CHARACTER: char = '\u{FFFC}';

/// Where an attachment sits in the flow of content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Takes a whole block, between paragraphs.
    Block,
    /// Flows within a line of text.
    Inline,
}

/// A renderable view for an attachment.
///
/// The view hierarchy itself belongs to the UI layer; the buffer only needs to know whether
/// an attachment has a view and what it is called.
pub trait ContentView: Debug {
    /// The name of the content shown by this view.
    fn name(&self) -> ContentName;
}

/// Identity of an [`Attachment`], stable for as long as any clone of it is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(usize);

/// An embedded non-text object.
///
/// Clones share the same object: equality and hashing use reference identity, never the
/// content. The buffer holds clones while the attachment is part of the text and reports its
/// removal through [`EditSink::attachment_deleted`](crate::EditSink::attachment_deleted).
#[derive(Clone)]
pub struct Attachment(Arc<AttachmentData>);

struct AttachmentData {
    name: ContentName,
    kind: AttachmentKind,
    view: Option<Arc<dyn ContentView>>,
}

impl Attachment {
    /// Creates an attachment without a view.
    pub fn new(name: ContentName, kind: AttachmentKind) -> Self {
        Self(Arc::new(AttachmentData {
            name,
            kind,
            view: None,
        }))
    }

    /// Creates an attachment shown by `view`, named after the view's content.
    pub fn with_view(view: Arc<dyn ContentView>, kind: AttachmentKind) -> Self {
        Self(Arc::new(AttachmentData {
            name: view.name(),
            kind,
            view: Some(view),
        }))
    }

    /// The identity of this attachment.
    pub fn id(&self) -> AttachmentId {
        AttachmentId(Arc::as_ptr(&self.0).cast::<()>() as usize)
    }

    /// The content name.
    pub fn name(&self) -> &ContentName {
        &self.0.name
    }

    /// Block or inline placement.
    pub fn kind(&self) -> AttachmentKind {
        self.0.kind
    }

    /// The renderable view, if any.
    pub fn view(&self) -> Option<&Arc<dyn ContentView>> {
        self.0.view.as_ref()
    }

    /// The attributes carried by the attachment's character.
    pub fn attributes(&self) -> Attributes {
        let (flag, classification) = match self.kind() {
            AttachmentKind::Block => (keys::IS_BLOCK_ATTACHMENT, keys::CONTENT_TYPE),
            AttachmentKind::Inline => (keys::IS_INLINE_ATTACHMENT, keys::INLINE_CONTENT_TYPE),
        };
        Attributes::new()
            .with(keys::ATTACHMENT, AttributeValue::Attachment(self.clone()))
            .with(flag, AttributeValue::Flag(true))
            .with(classification, AttributeValue::Name(self.name().clone()))
    }

    /// A one-character string holding this attachment.
    pub fn to_attributed_string(&self) -> AttributedString {
        AttributedString::from_text(
            String::from(OBJECT_REPLACEMENT_CHARACTER),
            self.attributes(),
        )
    }
}

impl PartialEq for Attachment {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Attachment {}

impl Hash for Attachment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("id", &self.id())
            .field("name", &self.0.name)
            .field("kind", &self.0.kind)
            .field("has_view", &self.0.view.is_some())
            .finish()
    }
}
