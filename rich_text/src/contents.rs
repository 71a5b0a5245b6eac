// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting attributed text into classified [`ContentSegment`]s.

use core::iter::FusedIterator;

use crate::{
    AttachmentKind, AttributeKey, AttributeValue, AttributedString, ContentKind, ContentName,
    ContentSegment, TextRange, keys,
};

/// How [`Contents`] finds the extent of the next segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// The longest stretch over which the classifying attribute keeps its value.
    Longest,
    /// The storage run, which breaks wherever any attribute changes.
    Storage,
}

/// Iterator over the classified content of an attributed string.
///
/// Each segment covers one run of the classifying attribute, cut so that a newline is
/// always a segment of its own. Block segments are therefore line-bounded too: uniformly
/// classified text `"abc\ndef"` yields `"abc"`, `"\n"` and `"def"`. A segment is
///
/// - [`ContentKind::ViewOnly`] when its name is [`ContentName::VIEW_ONLY`],
/// - [`ContentKind::Attachment`] when it starts with an attachment that has a view, covering
///   just the attachment,
/// - [`ContentKind::Text`] otherwise.
///
/// The iterator owns a copy of the enumerated range, so the source may change while it is
/// in use. Segment ranges refer to the source as it was when the iterator was created.
#[derive(Clone, Debug)]
pub struct Contents {
    text: AttributedString,
    origin: usize,
    cursor: usize,
    key: AttributeKey,
    default_name: ContentName,
    mode: RunMode,
}

impl Contents {
    /// Enumerates `range` of `source` (clamped; all of it for `None`) by `key`, naming runs
    /// without the key `default_name`.
    pub fn new(
        source: &AttributedString,
        key: AttributeKey,
        default_name: ContentName,
        mode: RunMode,
        range: Option<TextRange>,
    ) -> Self {
        let range = range.map_or(source.full_range(), |range| range.clamped(source.len()));
        Self {
            text: source.substring(range),
            origin: range.start(),
            cursor: 0,
            key,
            default_name,
            mode,
        }
    }

    /// Block-level enumeration: classified by [`keys::CONTENT_TYPE`], paragraphs by default.
    pub fn blocks(source: &AttributedString, range: Option<TextRange>) -> Self {
        Self::new(
            source,
            keys::CONTENT_TYPE,
            ContentName::PARAGRAPH,
            RunMode::Longest,
            range,
        )
    }

    /// Inline enumeration: classified by [`keys::INLINE_CONTENT_TYPE`], text by default.
    pub fn inline(source: &AttributedString, range: Option<TextRange>) -> Self {
        Self::new(
            source,
            keys::INLINE_CONTENT_TYPE,
            ContentName::TEXT,
            RunMode::Storage,
            range,
        )
    }

    fn next_run(&self) -> Option<(Option<&AttributeValue>, TextRange)> {
        let remaining = TextRange::new(self.cursor, self.text.len() - self.cursor);
        match self.mode {
            RunMode::Longest => {
                self.text
                    .longest_effective_range(self.key.as_str(), self.cursor, remaining)
            }
            RunMode::Storage => {
                let (attributes, run) = self.text.attributes_at(self.cursor)?;
                let run = TextRange::new(self.cursor, run.end() - self.cursor);
                Some((attributes.get(self.key.as_str()), run))
            }
        }
    }

    fn split_at_newline(&self, run: TextRange) -> TextRange {
        match self.text.slice(run).chars().position(|ch| ch == '\n') {
            Some(0) => run.first_char(),
            Some(ix) => TextRange::new(run.start(), ix),
            None => run,
        }
    }

    fn classify(&self, name: ContentName, segment: TextRange) -> (ContentKind, TextRange) {
        if name == ContentName::VIEW_ONLY {
            return (ContentKind::ViewOnly, segment);
        }
        let start = segment.start();
        if let Some((value, extent)) = self.text.attribute(keys::ATTACHMENT.as_str(), start) {
            if let Some((attachment, view)) = value
                .as_attachment()
                .and_then(|attachment| Some((attachment, attachment.view()?)))
            {
                let is_block = self
                    .text
                    .attribute(keys::IS_BLOCK_ATTACHMENT.as_str(), start)
                    .and_then(|(value, _)| value.as_flag());
                let placement = if is_block == Some(true) {
                    AttachmentKind::Block
                } else {
                    AttachmentKind::Inline
                };
                let kind = ContentKind::Attachment {
                    name,
                    attachment: attachment.clone(),
                    view: view.clone(),
                    placement,
                };
                return (kind, extent.intersection(segment).unwrap_or(segment));
            }
        }
        let text = self.text.substring(segment);
        (ContentKind::Text { name, text }, segment)
    }
}

impl Iterator for Contents {
    type Item = ContentSegment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.text.len() {
            return None;
        }
        let (value, run) = self.next_run()?;
        let name = value
            .and_then(AttributeValue::to_content_name)
            .unwrap_or_else(|| self.default_name.clone());
        let (kind, segment) = self.classify(name, self.split_at_newline(run));
        self.cursor = segment.end();
        let range = TextRange::new(self.origin + segment.start(), segment.len());
        Some(ContentSegment::with_range(kind, range))
    }
}

impl FusedIterator for Contents {}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use super::Contents;
    use crate::{
        Attachment, AttachmentKind, AttributeValue, AttributedString, ContentKind, ContentName,
        ContentView, TextRange, keys,
    };

    #[derive(Debug)]
    struct Panel;

    impl ContentView for Panel {
        fn name(&self) -> ContentName {
            ContentName::from_static("panel")
        }
    }

    fn ranges(contents: Contents) -> Vec<TextRange> {
        contents.filter_map(|segment| segment.enclosing_range).collect()
    }

    fn named(text: &str, key: crate::AttributeKey, name: &'static str) -> AttributedString {
        let mut string = AttributedString::from_str(text);
        let value = AttributeValue::Name(ContentName::from_static(name));
        string.add_attribute(key, value, string.full_range()).unwrap();
        string
    }

    #[test]
    fn newlines_are_separate_segments() {
        let text = AttributedString::from_str("ab\n\ncd");
        assert_eq!(
            ranges(Contents::blocks(&text, None)),
            [
                TextRange::new(0, 2),
                TextRange::new(2, 1),
                TextRange::new(3, 1),
                TextRange::new(4, 2)
            ]
        );
        let names: Vec<_> = Contents::blocks(&text, None)
            .map(|segment| segment.name().cloned())
            .collect();
        assert!(names.iter().all(|name| name == &Some(ContentName::PARAGRAPH)));
    }

    #[test]
    fn ranges_refer_to_the_source() {
        let text = AttributedString::from_str("hello world");
        let segments: Vec<_> = Contents::blocks(&text, Some(TextRange::new(6, 50))).collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].enclosing_range, Some(TextRange::new(6, 5)));
        assert_eq!(segments[0].text().unwrap().as_str(), "world");
    }

    #[test]
    fn view_only_content() {
        let mut text = AttributedString::from_str("ab");
        text.append(&named("xyz", keys::CONTENT_TYPE, "_viewOnly"));
        let segments: Vec<_> = Contents::blocks(&text, None).collect();
        assert_eq!(segments.len(), 2);
        assert!(!segments[0].is_view_only());
        assert!(segments[1].is_view_only());
        assert_eq!(segments[1].enclosing_range, Some(TextRange::new(2, 3)));
    }

    #[test]
    fn attachment_with_view() {
        let attachment = Attachment::with_view(Arc::new(Panel), AttachmentKind::Block);
        let mut text = AttributedString::from_str("a\n");
        text.append(&attachment.to_attributed_string());
        let segments: Vec<_> = Contents::blocks(&text, None).collect();
        assert_eq!(segments.len(), 3);
        let ContentKind::Attachment {
            name, placement, ..
        } = &segments[2].kind
        else {
            panic!("expected an attachment, got {:?}", segments[2].kind);
        };
        assert_eq!(name.raw_value(), "panel");
        assert_eq!(*placement, AttachmentKind::Block);
        assert_eq!(segments[2].attachment(), Some(&attachment));
        assert_eq!(segments[2].enclosing_range, Some(TextRange::new(2, 1)));
    }

    #[test]
    fn attachment_without_view_is_text() {
        let attachment = Attachment::new(ContentName::from_static("image"), AttachmentKind::Inline);
        let text = attachment.to_attributed_string();
        let segment = Contents::inline(&text, None).next().unwrap();
        assert_eq!(segment.name(), Some(&ContentName::from_static("image")));
        assert!(segment.text().is_some());
    }

    #[test]
    fn inline_mode_breaks_at_every_storage_run() {
        let mut text = named("abcd", keys::INLINE_CONTENT_TYPE, "code");
        text.add_attribute(keys::VIEW_ONLY, AttributeValue::Flag(true), TextRange::new(2, 2))
            .unwrap();
        assert_eq!(
            ranges(Contents::inline(&text, None)),
            [TextRange::new(0, 2), TextRange::new(2, 2)]
        );
        assert_eq!(
            ranges(Contents::blocks(&text, None)),
            [TextRange::new(0, 4)]
        );
    }

    #[test]
    fn empty_source() {
        let text = AttributedString::new();
        let mut contents = Contents::blocks(&text, None);
        assert!(contents.next().is_none());
        assert!(contents.next().is_none());
    }
}
