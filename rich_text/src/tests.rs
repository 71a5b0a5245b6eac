// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::mem;

use crate::{
    Attachment, AttachmentKind, AttributeValue, AttributedString, AttributedTextBuffer,
    Attributes, ContentKind, ContentName, ContentView, DefaultFormatting, EditActions, EditSink,
    Font, FormattingProvider, OBJECT_REPLACEMENT_CHARACTER, ParagraphStyle, TextAlignment,
    TextRange, UnderlineStyle, keys,
};

const EDIT: EditActions = EditActions::CHARACTERS.union(EditActions::ATTRIBUTES);

#[derive(Clone, Debug, PartialEq)]
enum Event {
    WillReplace {
        deleted: AttributedString,
        inserted: AttributedString,
        range: TextRange,
    },
    Edited {
        actions: EditActions,
        range: TextRange,
        delta: isize,
    },
    Deleted(ContentName),
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<Event>>,
}

impl Recorder {
    fn take(&self) -> Vec<Event> {
        mem::take(&mut *self.events.borrow_mut())
    }
}

impl EditSink for Recorder {
    fn will_replace(
        &self,
        _: &AttributedTextBuffer,
        deleted: &AttributedString,
        inserted: &AttributedString,
        range: TextRange,
    ) {
        self.events.borrow_mut().push(Event::WillReplace {
            deleted: deleted.clone(),
            inserted: inserted.clone(),
            range,
        });
    }

    fn attachment_deleted(&self, buffer: &AttributedTextBuffer, attachment: &Attachment) {
        assert!(!buffer.contains_attachment(attachment));
        self.events
            .borrow_mut()
            .push(Event::Deleted(attachment.name().clone()));
    }

    fn edited(
        &self,
        _: &AttributedTextBuffer,
        actions: EditActions,
        range: TextRange,
        delta: isize,
    ) {
        self.events.borrow_mut().push(Event::Edited {
            actions,
            range,
            delta,
        });
    }
}

#[derive(Debug)]
struct Panel;

impl ContentView for Panel {
    fn name(&self) -> ContentName {
        ContentName::from_static("panel")
    }
}

fn observed(text: &str) -> (AttributedTextBuffer, Rc<Recorder>) {
    let recorder = Rc::new(Recorder::default());
    let mut buffer = AttributedTextBuffer::new();
    buffer.set_sink(Rc::downgrade(&recorder));
    buffer.replace_characters(TextRange::empty(0), text);
    recorder.take();
    (buffer, recorder)
}

fn attachment(name: &'static str, kind: AttachmentKind) -> Attachment {
    Attachment::new(ContentName::from_static(name), kind)
}

fn has_defaults(buffer: &AttributedTextBuffer, offset: usize) -> bool {
    let (attributes, _) = buffer.attributes_at(offset).unwrap();
    keys::DEFAULTED
        .iter()
        .all(|key| attributes.contains_key(key.as_str()))
}

fn centered() -> ParagraphStyle {
    ParagraphStyle {
        alignment: TextAlignment::Center,
        ..ParagraphStyle::default()
    }
}

#[test]
fn replacement_reads_back_with_defaults() {
    let (mut buffer, recorder) = observed("hello");
    buffer.replace_characters(TextRange::new(1, 3), "EY");
    assert_eq!(buffer.as_str(), "hEYo");
    assert_eq!(buffer.substring(TextRange::new(1, 2)).as_str(), "EY");
    assert!((0..buffer.len()).all(|offset| has_defaults(&buffer, offset)));
    assert_eq!(
        recorder.take(),
        [Event::Edited {
            actions: EDIT,
            range: TextRange::new(1, 2),
            delta: -1,
        }]
    );
}

#[test]
fn empty_attributes_still_get_defaults() {
    let (mut buffer, _) = observed("AB");
    buffer.set_attributes(&Attributes::new(), TextRange::new(0, 2));
    for offset in 0..2 {
        let (attributes, _) = buffer.attributes_at(offset).unwrap();
        assert_eq!(attributes.len(), 3);
    }

    let bold = buffer.default_font().bold();
    buffer.add_attribute(keys::FONT, bold, TextRange::new(0, 1));
    buffer.remove_attribute(keys::FONT, TextRange::new(0, 1));
    let (attributes, _) = buffer.attributes_at(0).unwrap();
    assert_eq!(attributes.len(), 3);
    assert_eq!(
        attributes.get("font"),
        Some(&AttributeValue::Font(buffer.default_font()))
    );

    buffer.insert_attachment(
        TextRange::empty(2),
        &attachment("image", AttachmentKind::Inline),
        &AttributedTextBuffer::default_spacer(),
    );
    assert_eq!(buffer.len(), 4);
    assert_eq!(buffer.attributed_string().char_at(2), Some(OBJECT_REPLACEMENT_CHARACTER));
    assert_eq!(buffer.attributed_string().char_at(3), Some(' '));
}

#[test]
fn no_spacer_before_horizontal_whitespace() {
    let (mut buffer, _) = observed("A B");
    buffer.insert_attachment(
        TextRange::empty(1),
        &attachment("image", AttachmentKind::Inline),
        &AttributedTextBuffer::default_spacer(),
    );
    assert_eq!(buffer.as_str(), "A\u{FFFC} B");

    let (mut buffer, _) = observed("A\nB");
    buffer.insert_attachment(
        TextRange::empty(1),
        &attachment("image", AttachmentKind::Inline),
        &AttributedTextBuffer::default_spacer(),
    );
    assert_eq!(buffer.as_str(), "A\u{FFFC} \nB");
}

#[test]
fn each_removed_attachment_is_reported_once() {
    let (mut buffer, recorder) = observed("xy");
    let spacer = AttributedTextBuffer::default_spacer();
    buffer.insert_attachment(
        TextRange::empty(1),
        &attachment("a", AttachmentKind::Inline),
        &spacer,
    );
    buffer.insert_attachment(
        TextRange::empty(4),
        &attachment("b", AttachmentKind::Block),
        &spacer,
    );
    assert_eq!(buffer.as_str(), "x\u{FFFC} y\u{FFFC} ");
    assert_eq!(buffer.attachments().count(), 2);
    recorder.take();

    buffer.replace_characters(buffer.full_range(), "");
    assert_eq!(
        recorder.take(),
        [
            Event::Edited {
                actions: EDIT,
                range: TextRange::empty(0),
                delta: -6,
            },
            Event::Deleted(ContentName::from_static("a")),
            Event::Deleted(ContentName::from_static("b")),
        ]
    );
    assert_eq!(buffer.attachments().count(), 0);
}

#[test]
fn attachment_kept_by_replacement_is_not_reported() {
    let (mut buffer, recorder) = observed("");
    let image = attachment("image", AttachmentKind::Inline);
    buffer.insert_attachment(
        TextRange::empty(0),
        &image,
        &AttributedTextBuffer::default_spacer(),
    );
    recorder.take();

    buffer.replace_characters_attributed(TextRange::new(0, 1), &image.to_attributed_string());
    let events = recorder.take();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], Event::WillReplace { .. }));
    assert!(matches!(events[1], Event::Edited { .. }));
    assert!(buffer.contains_attachment(&image));
}

#[test]
fn dropping_attachment_key_reports_deletion() {
    let (mut buffer, recorder) = observed("");
    let image = attachment("image", AttachmentKind::Inline);
    buffer.insert_attachment(
        TextRange::empty(0),
        &image,
        &AttributedTextBuffer::default_spacer(),
    );
    recorder.take();

    buffer.set_attributes(&Attributes::new(), TextRange::new(0, 1));
    assert_eq!(
        recorder.take(),
        [
            Event::Edited {
                actions: EditActions::ATTRIBUTES,
                range: TextRange::new(0, 1),
                delta: 0,
            },
            Event::Deleted(ContentName::from_static("image")),
        ]
    );
    assert!(!buffer.contains_attachment(&image));
}

#[test]
fn typing_after_attachment_does_not_copy_it() {
    let (mut buffer, _) = observed("");
    let image = attachment("image", AttachmentKind::Inline);
    buffer.insert_attachment(
        TextRange::empty(0),
        &image,
        &AttributedTextBuffer::default_spacer(),
    );
    buffer.replace_characters(TextRange::empty(1), "x");
    assert_eq!(buffer.as_str(), "\u{FFFC}x ");
    assert!(buffer.attribute("attachment", 1).is_none());
    assert_eq!(buffer.attachments().count(), 1);
}

#[test]
fn styled_replacement_migrates_trailing_attributes() {
    let (mut buffer, recorder) = observed("Hello");
    let link = AttributeValue::Text("https://example.com".into());
    buffer.add_attribute("link", link.clone(), buffer.full_range());
    buffer.add_attribute(keys::UNDERLINE_STYLE, UnderlineStyle::Single, buffer.full_range());
    recorder.take();

    buffer.replace_characters_attributed(
        TextRange::new(0, 5),
        &AttributedString::from_str("Bye"),
    );
    assert_eq!(buffer.as_str(), "Bye");
    for offset in 0..3 {
        assert_eq!(buffer.attribute("link", offset).map(|(v, _)| v), Some(&link));
        assert!(buffer.attribute("underlineStyle", offset).is_none());
    }

    let events = recorder.take();
    let Event::WillReplace {
        deleted,
        inserted,
        range,
    } = &events[0]
    else {
        panic!("expected will_replace first, got {events:?}");
    };
    assert_eq!(deleted.as_str(), "Hello");
    assert_eq!(*range, TextRange::new(0, 5));
    assert!(inserted.attribute("link", 0).is_some());
    assert_eq!(
        events[1..],
        [Event::Edited {
            actions: EDIT,
            range: TextRange::new(0, 3),
            delta: -2,
        }]
    );
}

#[test]
fn migration_stops_where_the_replacement_has_its_own_value() {
    let (mut buffer, _) = observed("Hello");
    let outgoing = AttributeValue::Text("outgoing".into());
    let incoming = AttributeValue::Text("incoming".into());
    buffer.add_attribute("link", outgoing.clone(), buffer.full_range());

    let mut replacement = AttributedString::from_str("abc");
    replacement
        .add_attribute("link", incoming.clone(), TextRange::new(1, 1))
        .unwrap();
    buffer.replace_characters_attributed(TextRange::new(0, 5), &replacement);

    assert_eq!(buffer.attribute("link", 0).map(|(v, _)| v), Some(&outgoing));
    assert_eq!(buffer.attribute("link", 1).map(|(v, _)| v), Some(&incoming));
    assert!(buffer.attribute("link", 2).is_none());
}

#[test]
fn insertion_does_not_migrate() {
    let (mut buffer, _) = observed("ab");
    buffer.add_attribute("link", AttributeValue::Flag(true), buffer.full_range());
    buffer.replace_characters_attributed(TextRange::empty(2), &AttributedString::from_str("c"));
    assert!(buffer.attribute("link", 2).is_none());
    assert!(has_defaults(&buffer, 2));
}

#[test]
fn batched_edits_notify_once() {
    let (mut buffer, recorder) = observed("");
    buffer.begin_editing();
    buffer.replace_characters(TextRange::empty(0), "ab");
    buffer.begin_editing();
    buffer.replace_characters(TextRange::empty(2), "cd");
    buffer.end_editing();
    assert!(buffer.is_editing());
    assert!(recorder.take().is_empty());

    buffer.end_editing();
    assert_eq!(
        recorder.take(),
        [Event::Edited {
            actions: EDIT,
            range: TextRange::new(0, 4),
            delta: 4,
        }]
    );
}

#[test]
fn batched_deletions_follow_the_edit() {
    let (mut buffer, recorder) = observed("");
    let image = attachment("image", AttachmentKind::Inline);
    buffer.insert_attachment(
        TextRange::empty(0),
        &image,
        &AttributedTextBuffer::default_spacer(),
    );
    recorder.take();

    buffer.begin_editing();
    buffer.replace_characters(TextRange::new(0, 1), "");
    buffer.set_attributes(&Attributes::new(), buffer.full_range());
    buffer.end_editing();
    assert_eq!(
        recorder.take(),
        [
            Event::Edited {
                actions: EDIT,
                range: TextRange::new(0, 1),
                delta: -1,
            },
            Event::Deleted(ContentName::from_static("image")),
        ]
    );
}

#[test]
fn unbalanced_end_editing_is_ignored() {
    let (mut buffer, recorder) = observed("");
    buffer.end_editing();
    assert!(!buffer.is_editing());
    buffer.replace_characters(TextRange::empty(0), "x");
    assert_eq!(recorder.take().len(), 1);
}

#[test]
fn manual_edited_outside_batch_fires_immediately() {
    let (mut buffer, recorder) = observed("abc");
    buffer.edited(EditActions::ATTRIBUTES, TextRange::new(1, 1), 0);
    assert_eq!(
        recorder.take(),
        [Event::Edited {
            actions: EditActions::ATTRIBUTES,
            range: TextRange::new(1, 1),
            delta: 0,
        }]
    );
}

#[test]
fn invalid_ranges_are_skipped() {
    let (mut buffer, recorder) = observed("ab");
    let before = buffer.attributed_string().clone();
    buffer.replace_characters(TextRange::new(5, 1), "x");
    buffer.replace_characters_attributed(TextRange::new(1, 2), &AttributedString::from_str("x"));
    buffer.set_attributes(&Attributes::new(), TextRange::new(1, 5));
    buffer.add_attribute("link", AttributeValue::Flag(true), TextRange::new(3, 0));
    buffer.remove_attribute(keys::FONT, TextRange::new(usize::MAX, 2));
    assert_eq!(buffer.attributed_string(), &before);
    assert!(recorder.take().is_empty());
    assert!(buffer.attributes_at(2).is_none());
}

#[test]
fn dead_sink_is_not_notified() {
    let recorder = Rc::new(Recorder::default());
    let mut buffer = AttributedTextBuffer::new();
    buffer.set_sink(Rc::downgrade(&recorder));
    drop(recorder);
    buffer.replace_characters(TextRange::empty(0), "still works");
    assert_eq!(buffer.len(), 11);
}

#[test]
fn cleared_sink_is_not_notified() {
    let (mut buffer, recorder) = observed("");
    buffer.clear_sink();
    buffer.replace_characters(TextRange::empty(0), "x");
    assert!(recorder.take().is_empty());
}

#[test]
fn provider_overrides_fallback() {
    let mut buffer = AttributedTextBuffer::with_defaults(DefaultFormatting {
        font: Font::new("Sans", 12.0),
        ..DefaultFormatting::default()
    });
    buffer.replace_characters(TextRange::empty(0), "a");
    assert_eq!(
        buffer.attribute("font", 0).map(|(v, _)| v),
        Some(&AttributeValue::Font(Font::new("Sans", 12.0)))
    );

    let provider: Rc<dyn FormattingProvider> = Rc::new(DefaultFormatting {
        font: Font::new("Serif", 20.0),
        ..DefaultFormatting::default()
    });
    buffer.set_formatting_provider(Some(provider));
    assert_eq!(buffer.default_font(), Font::new("Serif", 20.0));
    buffer.replace_characters(TextRange::empty(1), "b");
    // Typed text inherits the preceding font, so only a missing font is backfilled.
    assert_eq!(
        buffer.attribute("font", 1).map(|(v, _)| v),
        Some(&AttributeValue::Font(Font::new("Sans", 12.0)))
    );
    buffer.remove_attribute(keys::FONT, buffer.full_range());
    assert_eq!(
        buffer.attribute("font", 1).map(|(v, _)| v),
        Some(&AttributeValue::Font(Font::new("Serif", 20.0)))
    );
}

#[test]
fn paragraphs_share_their_first_style() {
    let (mut buffer, _) = observed("ab\ncd");
    buffer.add_attribute(keys::PARAGRAPH_STYLE, centered(), TextRange::new(0, 1));
    let (style, range) = buffer
        .longest_effective_range("paragraphStyle", 0, buffer.full_range())
        .unwrap();
    assert_eq!(style, Some(&AttributeValue::ParagraphStyle(centered())));
    assert_eq!(range, TextRange::new(0, 3));
    assert_eq!(
        buffer.attribute("paragraphStyle", 3).map(|(v, _)| v),
        Some(&AttributeValue::ParagraphStyle(ParagraphStyle::default()))
    );
}

#[test]
fn enumeration_covers_the_buffer() {
    let (mut buffer, _) = observed("Title\nbody\n");
    let panel = Attachment::with_view(Arc::new(Panel), AttachmentKind::Block);
    buffer.insert_attachment(
        TextRange::empty(11),
        &panel,
        &AttributedTextBuffer::default_spacer(),
    );

    let segments: Vec<_> = buffer.contents(None).collect();
    let mut end = 0;
    for segment in &segments {
        let range = segment.enclosing_range.unwrap();
        assert_eq!(range.start(), end);
        assert!(!range.is_empty());
        end = range.end();
    }
    assert_eq!(end, buffer.len());

    let texts: Vec<_> = segments
        .iter()
        .map(|segment| match &segment.kind {
            ContentKind::Text { text, .. } => String::from(text.as_str()),
            ContentKind::Attachment { name, .. } => String::from(name.raw_value()),
            ContentKind::ViewOnly => String::from("view only"),
        })
        .collect();
    assert_eq!(texts, ["Title", "\n", "body", "\n", "panel", " "]);
    assert_eq!(segments[4].attachment(), Some(&panel));
}

#[test]
fn enumeration_is_a_snapshot() {
    let (mut buffer, _) = observed("one\ntwo");
    let contents = buffer.inline_contents(Some(TextRange::new(4, 3)));
    buffer.replace_characters(buffer.full_range(), "");
    let segments: Vec<_> = contents.collect();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text().map(AttributedString::as_str), Some("two"));
    assert_eq!(segments[0].name(), Some(&ContentName::TEXT));
}

#[test]
fn view_only_runs() {
    let (mut buffer, _) = observed("ab\ncd");
    buffer.add_attribute(
        keys::CONTENT_TYPE,
        ContentName::VIEW_ONLY,
        TextRange::new(3, 2),
    );
    let kinds: Vec<_> = buffer
        .contents(None)
        .map(|segment| segment.is_view_only())
        .collect();
    assert_eq!(kinds, [false, false, true]);
}

#[test]
fn replacing_block_attachment_with_inline_one() {
    let (mut buffer, recorder) = observed("ab");
    let spacer = AttributedTextBuffer::default_spacer();
    let block = Attachment::with_view(Arc::new(Panel), AttachmentKind::Block);
    buffer.insert_attachment(TextRange::empty(2), &block, &spacer);
    recorder.take();

    let inline = Attachment::with_view(Arc::new(Panel), AttachmentKind::Inline);
    buffer.insert_attachment(TextRange::new(2, 1), &inline, &spacer);
    assert_eq!(buffer.as_str(), "ab\u{FFFC} ");

    let (attributes, _) = buffer.attributes_at(2).unwrap();
    assert_eq!(
        attributes.get("attachment").and_then(AttributeValue::as_attachment),
        Some(&inline)
    );
    assert!(attributes.contains_key("isInlineAttachment"));
    assert!(!attributes.contains_key("isBlockAttachment"));
    assert!(!attributes.contains_key("contentType"));
    assert!(has_defaults(&buffer, 2));

    let placements: Vec<_> = buffer
        .inline_contents(None)
        .filter_map(|segment| match segment.kind {
            ContentKind::Attachment { placement, .. } => Some(placement),
            _ => None,
        })
        .collect();
    assert_eq!(placements, [AttachmentKind::Inline]);

    let events = recorder.take();
    assert_eq!(
        events.last(),
        Some(&Event::Deleted(ContentName::from_static("panel")))
    );
}
