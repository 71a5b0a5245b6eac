// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute normalization run after every mutation.
//!
//! Two rules are enforced:
//!
//! - An attachment lives on exactly one [`OBJECT_REPLACEMENT_CHARACTER`]. Characters that
//!   picked up an attachment by inheritance (typing next to it, duplicated runs) lose it,
//!   along with the block/inline placement flags. The character that keeps it carries
//!   exactly the placement flag of the attachment's kind.
//! - Every character of a paragraph shares the paragraph style of the paragraph's first
//!   character.

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::{
    AttachmentKind, AttributeKey, AttributeValue, AttributedString, Attributes,
    OBJECT_REPLACEMENT_CHARACTER, TextRange, keys,
};

pub(crate) fn fix_attributes(text: &mut AttributedString) {
    fix_attachments(text);
    fix_paragraph_styles(text);
}

fn fix_attachments(text: &mut AttributedString) {
    let mut seen = HashSet::new();
    let mut strays: Vec<TextRange> = Vec::new();
    let mut misplaced: Vec<(usize, AttachmentKind)> = Vec::new();
    for (range, attributes) in text.runs(text.full_range()) {
        let Some(attachment) = attributes
            .get(keys::ATTACHMENT.as_str())
            .and_then(|value| value.as_attachment())
        else {
            continue;
        };
        for (offset, ch) in (range.start()..).zip(text.slice(range).chars()) {
            if ch == OBJECT_REPLACEMENT_CHARACTER && seen.insert(attachment.id()) {
                if !has_placement(attributes, attachment.kind()) {
                    misplaced.push((offset, attachment.kind()));
                }
                continue;
            }
            match strays.last_mut() {
                Some(last) if last.end() == offset => {
                    *last = TextRange::new(last.start(), last.len() + 1);
                }
                _ => strays.push(TextRange::new(offset, 1)),
            }
        }
    }
    for range in strays {
        update(text, range, |attributes| {
            attributes.remove(keys::ATTACHMENT.as_str());
            attributes.remove(keys::IS_BLOCK_ATTACHMENT.as_str());
            attributes.remove(keys::IS_INLINE_ATTACHMENT.as_str());
        });
    }
    for (offset, kind) in misplaced {
        let (flag, other) = match kind {
            AttachmentKind::Block => (keys::IS_BLOCK_ATTACHMENT, keys::IS_INLINE_ATTACHMENT),
            AttachmentKind::Inline => (keys::IS_INLINE_ATTACHMENT, keys::IS_BLOCK_ATTACHMENT),
        };
        update(text, TextRange::new(offset, 1), |attributes| {
            attributes.remove(other.as_str());
            attributes.insert(flag.clone(), AttributeValue::Flag(true));
        });
    }
}

/// Returns `true` if the placement flags in `attributes` match `kind` and nothing else.
fn has_placement(attributes: &Attributes, kind: AttachmentKind) -> bool {
    let flag = |key: AttributeKey| {
        attributes
            .get(key.as_str())
            .and_then(AttributeValue::as_flag)
            .unwrap_or(false)
    };
    let block = flag(keys::IS_BLOCK_ATTACHMENT);
    let inline = flag(keys::IS_INLINE_ATTACHMENT);
    match kind {
        AttachmentKind::Block => block && !inline,
        AttachmentKind::Inline => inline && !block,
    }
}

fn fix_paragraph_styles(text: &mut AttributedString) {
    let key = keys::PARAGRAPH_STYLE;
    let key = key.as_str();
    let mut fixes = Vec::new();
    for paragraph in paragraphs(text.as_str()) {
        if paragraph.len() < 2 {
            continue;
        }
        let Some((style, _)) = text.attribute(key, paragraph.start()) else {
            continue;
        };
        if text
            .runs(paragraph)
            .any(|(_, attributes)| attributes.get(key) != Some(style))
        {
            fixes.push((paragraph, style.clone()));
        }
    }
    for (paragraph, style) in fixes {
        update(text, paragraph, |attributes| {
            attributes.insert(keys::PARAGRAPH_STYLE, style.clone());
        });
    }
}

/// Paragraph ranges, each including its terminating newline.
fn paragraphs(text: &str) -> impl Iterator<Item = TextRange> + '_ {
    let mut start = 0;
    let mut len = 0;
    let mut chars = text.chars();
    core::iter::from_fn(move || {
        for ch in chars.by_ref() {
            len += 1;
            if ch == '\n' {
                let paragraph = TextRange::new(start, len);
                start += len;
                len = 0;
                return Some(paragraph);
            }
        }
        if len == 0 {
            return None;
        }
        let paragraph = TextRange::new(start, len);
        start += len;
        len = 0;
        Some(paragraph)
    })
}

fn update(text: &mut AttributedString, range: TextRange, f: impl FnMut(&mut Attributes)) {
    if let Err(err) = text.map_runs(range, f) {
        log::debug!("skipping attribute fix over {range:?}: {err}");
    }
}
