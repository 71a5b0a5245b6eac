// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::{Rc, Weak};
use core::fmt::{self, Debug};
use core::mem;

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::fix::fix_attributes;
use crate::{
    Attachment, AttributeKey, AttributeValue, AttributedString, Attributes, Color, Contents,
    DefaultFormatting, EditActions, EditSink, Font, FormattingProvider, ParagraphStyle,
    TextRange, keys,
};

/// The editing core: an attributed string that keeps its attributes consistent and reports
/// every mutation.
///
/// Mutations never fail. An operation given a range that does not fit the buffer is skipped
/// (and logged at debug level), leaving the buffer and the sink untouched.
///
/// After each mutation the buffer
///
/// - fills in a default font, paragraph style and text color where the affected text lacks
///   one, taking them from the [`FormattingProvider`] if one is installed, else from the
///   [`DefaultFormatting`] it was created with,
/// - keeps each attachment on a single object replacement character,
/// - gives every paragraph the paragraph style of its first character,
/// - notifies the [`EditSink`], if one is attached and still alive.
///
/// Notifications can be batched with [`begin_editing`](Self::begin_editing) and
/// [`end_editing`](Self::end_editing).
pub struct AttributedTextBuffer {
    storage: AttributedString,
    defaults: DefaultFormatting,
    provider: Option<Rc<dyn FormattingProvider>>,
    sink: Option<Weak<dyn EditSink>>,
    editing: EditingState,
}

#[derive(Default)]
struct EditingState {
    depth: usize,
    pending: Option<PendingEdit>,
    /// Attachments that were in the way of a mutation since the last flush.
    ///
    /// Only those no longer in the buffer when the batch ends are reported.
    removed: SmallVec<[Attachment; 2]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingEdit {
    actions: EditActions,
    /// Affected range in post-edit coordinates.
    range: TextRange,
    delta: isize,
}

impl PendingEdit {
    fn new(actions: EditActions, range: TextRange, delta: isize) -> Self {
        Self {
            actions,
            range: TextRange::new(range.start(), range.len().saturating_add_signed(delta)),
            delta,
        }
    }

    /// Folds a later edit of `range` (in the coordinates this edit left behind) into this one.
    fn merge(self, actions: EditActions, range: TextRange, delta: isize) -> Self {
        let current = self.range;
        let shifted = if current.end() <= range.start() {
            current
        } else if current.start() >= range.end() {
            TextRange::new(current.start().saturating_add_signed(delta), current.len())
        } else {
            let start = current.start().min(range.start());
            let end = current.end().max(range.end()).saturating_add_signed(delta);
            TextRange::new(start, end.saturating_sub(start))
        };
        let next = Self::new(actions, range, delta);
        Self {
            actions: self.actions | actions,
            range: shifted.union(next.range),
            delta: self.delta + delta,
        }
    }
}

impl Default for AttributedTextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for AttributedTextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributedTextBuffer")
            .field("storage", &self.storage)
            .field("defaults", &self.defaults)
            .field("has_provider", &self.provider.is_some())
            .field("editing_depth", &self.editing.depth)
            .finish_non_exhaustive()
    }
}

impl AttributedTextBuffer {
    /// Creates an empty buffer with the built-in default formatting.
    pub fn new() -> Self {
        Self::with_defaults(DefaultFormatting::default())
    }

    /// Creates an empty buffer that falls back to `defaults` when no provider is installed.
    pub fn with_defaults(defaults: DefaultFormatting) -> Self {
        Self {
            storage: AttributedString::new(),
            defaults,
            provider: None,
            sink: None,
            editing: EditingState::default(),
        }
    }

    /// Creates a buffer holding `text`, normalized but without default backfill.
    pub fn from_attributed(text: AttributedString) -> Self {
        let mut buffer = Self::new();
        buffer.storage = text;
        fix_attributes(&mut buffer.storage);
        buffer
    }

    /// Installs or removes the formatting provider.
    pub fn set_formatting_provider(&mut self, provider: Option<Rc<dyn FormattingProvider>>) {
        self.provider = provider;
    }

    /// The formatting used when no provider is installed.
    pub fn defaults(&self) -> &DefaultFormatting {
        &self.defaults
    }

    /// Attaches the sink that receives notifications.
    ///
    /// The buffer does not keep the sink alive: once every strong reference is dropped,
    /// notifications stop.
    pub fn set_sink<S: EditSink + 'static>(&mut self, sink: Weak<S>) {
        let sink: Weak<dyn EditSink> = sink;
        self.sink = Some(sink);
    }

    /// Detaches the sink.
    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    fn sink(&self) -> Option<Rc<dyn EditSink>> {
        self.sink.as_ref()?.upgrade()
    }

    // --- MARK: Reads ---

    /// The length in characters.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// The plain text.
    pub fn as_str(&self) -> &str {
        self.storage.as_str()
    }

    /// The whole content, characters and attributes.
    pub fn attributed_string(&self) -> &AttributedString {
        &self.storage
    }

    /// The range covering the whole buffer.
    pub fn full_range(&self) -> TextRange {
        self.storage.full_range()
    }

    /// The attributes at `offset` and the storage run they belong to.
    pub fn attributes_at(&self, offset: usize) -> Option<(&Attributes, TextRange)> {
        self.storage.attributes_at(offset)
    }

    /// The value of `key` at `offset` and the storage run it belongs to.
    pub fn attribute(&self, key: &str, offset: usize) -> Option<(&AttributeValue, TextRange)> {
        self.storage.attribute(key, offset)
    }

    /// The value of `key` at `offset` and the longest range around it, within `within`, where
    /// that value does not change.
    pub fn longest_effective_range(
        &self,
        key: &str,
        offset: usize,
        within: TextRange,
    ) -> Option<(Option<&AttributeValue>, TextRange)> {
        self.storage.longest_effective_range(key, offset, within)
    }

    /// A copy of the content in `range`, clamped to the buffer.
    pub fn substring(&self, range: TextRange) -> AttributedString {
        self.storage.substring(range)
    }

    /// The attachments currently in the buffer, in document order.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> + '_ {
        attachments_in(&self.storage, self.storage.full_range())
    }

    /// Returns `true` if `attachment` is part of the buffer.
    pub fn contains_attachment(&self, attachment: &Attachment) -> bool {
        self.attachments().any(|candidate| candidate == attachment)
    }

    /// The font given to text that has none: the provider's, else the fallback's.
    pub fn default_font(&self) -> Font {
        match &self.provider {
            Some(provider) => provider.font(),
            None => self.defaults.font(),
        }
    }

    /// The paragraph style given to text that has none.
    pub fn default_paragraph_style(&self) -> ParagraphStyle {
        match &self.provider {
            Some(provider) => provider.paragraph_style(),
            None => self.defaults.paragraph_style(),
        }
    }

    /// The color given to text that has none.
    pub fn default_text_color(&self) -> Color {
        match &self.provider {
            Some(provider) => provider.text_color(),
            None => self.defaults.text_color,
        }
    }

    /// The default font, paragraph style and text color as they would be backfilled now.
    pub fn default_attributes(&self) -> Attributes {
        keys::DEFAULTED
            .into_iter()
            .filter_map(|key| {
                let value = self.default_value(key.as_str())?;
                Some((key, value))
            })
            .collect()
    }

    fn default_value(&self, key: &str) -> Option<AttributeValue> {
        match &self.provider {
            Some(provider) => provider.value_for(key),
            None => self.defaults.value_for(key),
        }
    }

    /// The text placed after an inserted attachment: a single space.
    pub fn default_spacer() -> AttributedString {
        AttributedString::from_str(" ")
    }

    /// Block-level content of `range` (or the whole buffer), classified by
    /// [`keys::CONTENT_TYPE`].
    ///
    /// The iterator works on a snapshot, so the buffer can be edited while it is alive.
    pub fn contents(&self, range: Option<TextRange>) -> Contents {
        Contents::blocks(&self.storage, range)
    }

    /// Inline content of `range` (or the whole buffer), classified by
    /// [`keys::INLINE_CONTENT_TYPE`].
    pub fn inline_contents(&self, range: Option<TextRange>) -> Contents {
        Contents::inline(&self.storage, range)
    }

    // --- MARK: Edit batching ---

    /// Starts a batch. Notifications are held back until the matching
    /// [`end_editing`](Self::end_editing). Batches nest.
    pub fn begin_editing(&mut self) {
        self.editing.depth += 1;
    }

    /// Ends a batch. Leaving the outermost batch delivers one merged
    /// [`edited`](EditSink::edited) notification followed by any attachment deletions.
    ///
    /// An `end_editing` without a matching `begin_editing` is ignored.
    pub fn end_editing(&mut self) {
        if self.editing.depth == 0 {
            log::debug!("ignoring end_editing without begin_editing");
            return;
        }
        self.editing.depth -= 1;
        if self.editing.depth == 0 {
            self.flush();
        }
    }

    /// Returns `true` while a batch is open.
    pub fn is_editing(&self) -> bool {
        self.editing.depth > 0
    }

    /// Records that `range` (in pre-edit coordinates) changed and that the length changed by
    /// `delta`.
    ///
    /// Outside a batch this notifies the sink immediately. The sink receives the range in
    /// post-edit coordinates; see [`EditSink::edited`].
    pub fn edited(&mut self, actions: EditActions, range: TextRange, delta: isize) {
        let pending = match self.editing.pending.take() {
            Some(pending) => pending.merge(actions, range, delta),
            None => PendingEdit::new(actions, range, delta),
        };
        self.editing.pending = Some(pending);
        if self.editing.depth == 0 {
            self.flush();
        }
    }

    fn flush(&mut self) {
        let pending = self.editing.pending.take();
        let removed = mem::take(&mut self.editing.removed);
        let Some(sink) = self.sink() else {
            return;
        };
        if let Some(edit) = pending {
            log::trace!(
                "edited {:?} over {:?}, delta {}",
                edit.actions,
                edit.range,
                edit.delta
            );
            sink.edited(self, edit.actions, edit.range, edit.delta);
        }
        if removed.is_empty() {
            return;
        }
        let present: HashSet<_> = self.attachments().map(Attachment::id).collect();
        let mut reported = HashSet::new();
        for attachment in &removed {
            let id = attachment.id();
            if present.contains(&id) || !reported.insert(id) {
                continue;
            }
            log::trace!("attachment {} deleted", attachment.name());
            sink.attachment_deleted(self, attachment);
        }
    }

    // --- MARK: Mutations ---

    /// Replaces the characters in `range` with plain `text`.
    ///
    /// The new characters take the attributes of the first replaced character (or of the
    /// preceding one for an insertion), then receive default formatting where it is missing.
    pub fn replace_characters(&mut self, range: TextRange, text: &str) {
        if !self.accepts(range, "replace_characters") {
            return;
        }
        let inserted = text.chars().count();
        self.capture_attachments(range);
        self.begin_editing();
        if let Err(err) = self.storage.replace_str(range, text) {
            log::debug!("skipping replace_characters: {err}");
        } else {
            self.backfill_defaults(TextRange::new(range.start(), inserted));
            fix_attributes(&mut self.storage);
            self.edited(
                EditActions::CHARACTERS | EditActions::ATTRIBUTES,
                range,
                length_delta(inserted, range.len()),
            );
        }
        self.end_editing();
    }

    /// Replaces the characters in `range` with `replacement`, keeping its attributes.
    ///
    /// When characters are replaced by non-empty content, attributes of the last replaced
    /// character that the replacement's first character lacks (other than the underline style)
    /// carry over to the leading part of the replacement that lacks them. Attachment keys never
    /// carry over, and neither does classification when the replacement starts with an
    /// attachment. The sink's
    /// [`will_replace`](EditSink::will_replace) sees the replacement after this migration.
    pub fn replace_characters_attributed(
        &mut self,
        range: TextRange,
        replacement: &AttributedString,
    ) {
        if !self.accepts(range, "replace_characters_attributed") {
            return;
        }
        let mut replacement = replacement.clone();
        if !range.is_empty() && !replacement.is_empty() {
            self.migrate_trailing_attributes(range, &mut replacement);
        }
        if let Some(sink) = self.sink() {
            let deleted = self.storage.substring(range);
            sink.will_replace(self, &deleted, &replacement, range);
        }
        let inserted = replacement.len();
        self.capture_attachments(range);
        self.begin_editing();
        if let Err(err) = self.storage.replace(range, &replacement) {
            log::debug!("skipping replace_characters_attributed: {err}");
        } else {
            self.backfill_defaults(TextRange::new(range.start(), inserted));
            fix_attributes(&mut self.storage);
            self.edited(
                EditActions::CHARACTERS | EditActions::ATTRIBUTES,
                range,
                length_delta(inserted, range.len()),
            );
        }
        self.end_editing();
    }

    /// Replaces the attributes in `range` with `attributes`, plus default formatting for any
    /// defaulted key `attributes` lacks.
    pub fn set_attributes(&mut self, attributes: &Attributes, range: TextRange) {
        if !self.accepts(range, "set_attributes") {
            return;
        }
        let mut attributes = attributes.clone();
        for key in keys::DEFAULTED {
            if attributes.contains_key(key.as_str()) {
                continue;
            }
            if let Some(value) = self.default_value(key.as_str()) {
                attributes.insert(key, value);
            }
        }
        self.capture_attachments(range);
        self.begin_editing();
        if let Err(err) = self.storage.set_attributes(&attributes, range) {
            log::debug!("skipping set_attributes: {err}");
        } else {
            fix_attributes(&mut self.storage);
            self.edited(EditActions::ATTRIBUTES, range, 0);
        }
        self.end_editing();
    }

    /// Adds `attributes` over `range`, overwriting existing values, then backfills default
    /// formatting.
    pub fn add_attributes(&mut self, attributes: &Attributes, range: TextRange) {
        if !self.accepts(range, "add_attributes") {
            return;
        }
        self.capture_attachments(range);
        self.begin_editing();
        if let Err(err) = self.storage.add_attributes(attributes, range) {
            log::debug!("skipping add_attributes: {err}");
        } else {
            self.backfill_defaults(range);
            fix_attributes(&mut self.storage);
            self.edited(EditActions::ATTRIBUTES, range, 0);
        }
        self.end_editing();
    }

    /// Sets a single attribute over `range`.
    pub fn add_attribute(
        &mut self,
        key: impl Into<AttributeKey>,
        value: impl Into<AttributeValue>,
        range: TextRange,
    ) {
        let attributes = Attributes::new().with(key, value.into());
        self.add_attributes(&attributes, range);
    }

    /// Removes the attributes named in `names` over `range`.
    ///
    /// Removing a defaulted key (font, paragraph style, text color) resets it to the default
    /// instead of leaving the text without it.
    pub fn remove_attributes(&mut self, names: &[AttributeKey], range: TextRange) {
        if !self.accepts(range, "remove_attributes") {
            return;
        }
        let restored: SmallVec<[(AttributeKey, AttributeValue); 3]> = names
            .iter()
            .filter(|key| keys::DEFAULTED.contains(key))
            .filter_map(|key| Some((key.clone(), self.default_value(key.as_str())?)))
            .collect();
        self.capture_attachments(range);
        self.begin_editing();
        let result = self.storage.map_runs(range, |attributes| {
            for key in names {
                attributes.remove(key.as_str());
            }
            for (key, value) in &restored {
                attributes.insert(key.clone(), value.clone());
            }
        });
        if let Err(err) = result {
            log::debug!("skipping remove_attributes: {err}");
        } else {
            fix_attributes(&mut self.storage);
            self.edited(EditActions::ATTRIBUTES, range, 0);
        }
        self.end_editing();
    }

    /// Removes a single attribute over `range`.
    pub fn remove_attribute(&mut self, key: impl Into<AttributeKey>, range: TextRange) {
        self.remove_attributes(&[key.into()], range);
    }

    /// Replaces `range` with `attachment`.
    ///
    /// Unless the character after `range` is a space or a tab, `spacer` is inserted after the
    /// attachment so the caret has somewhere to go.
    pub fn insert_attachment(
        &mut self,
        range: TextRange,
        attachment: &Attachment,
        spacer: &AttributedString,
    ) {
        let has_spacer = self
            .storage
            .char_at(range.end())
            .is_some_and(is_horizontal_whitespace);
        let mut content = attachment.to_attributed_string();
        if !has_spacer {
            content.append(spacer);
        }
        self.replace_characters_attributed(range, &content);
    }

    fn accepts(&self, range: TextRange, operation: &str) -> bool {
        match range.checked(self.len()) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("skipping {operation}: {err}");
                false
            }
        }
    }

    fn capture_attachments(&mut self, range: TextRange) {
        let removed = &mut self.editing.removed;
        removed.extend(attachments_in(&self.storage, range).cloned());
    }

    fn backfill_defaults(&mut self, range: TextRange) {
        if range.is_empty() {
            return;
        }
        let defaults = self.default_attributes();
        let result = self.storage.map_runs(range, |attributes| {
            for (key, value) in &defaults {
                if !attributes.contains_key(key.as_str()) {
                    attributes.insert(key.clone(), value.clone());
                }
            }
        });
        if let Err(err) = result {
            log::debug!("skipping default backfill: {err}");
        }
    }

    fn migrate_trailing_attributes(&self, range: TextRange, replacement: &mut AttributedString) {
        let Some((outgoing, _)) = self.storage.attributes_at(range.end() - 1) else {
            return;
        };
        let incoming = replacement
            .attributes_at(0)
            .map(|(attributes, _)| attributes.clone())
            .unwrap_or_default();
        let incoming_attachment = incoming.contains_key(keys::ATTACHMENT.as_str());
        for (key, value) in outgoing {
            if *key == keys::UNDERLINE_STYLE
                || ATTACHMENT_BOUND.contains(key)
                || (incoming_attachment && CLASSIFICATION.contains(key))
                || incoming.contains_key(key.as_str())
            {
                continue;
            }
            let Some((None, leading)) =
                replacement.longest_effective_range(key.as_str(), 0, replacement.full_range())
            else {
                continue;
            };
            if let Err(err) = replacement.add_attribute(key.clone(), value.clone(), leading) {
                log::debug!("skipping migration of {key}: {err}");
            }
        }
    }
}

/// Keys that describe one particular attachment and never move to other content.
const ATTACHMENT_BOUND: [AttributeKey; 3] = [
    keys::ATTACHMENT,
    keys::IS_BLOCK_ATTACHMENT,
    keys::IS_INLINE_ATTACHMENT,
];

/// Classification keys, which an incoming attachment sets for itself.
const CLASSIFICATION: [AttributeKey; 2] = [keys::CONTENT_TYPE, keys::INLINE_CONTENT_TYPE];

fn attachments_in(
    text: &AttributedString,
    range: TextRange,
) -> impl Iterator<Item = &Attachment> + '_ {
    text.runs(range).filter_map(|(_, attributes)| {
        attributes
            .get(keys::ATTACHMENT.as_str())
            .and_then(AttributeValue::as_attachment)
    })
}

fn is_horizontal_whitespace(ch: char) -> bool {
    ch == '\t'
        || (ch.is_whitespace()
            && !matches!(
                ch,
                '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
            ))
}

fn length_delta(inserted: usize, removed: usize) -> isize {
    if inserted >= removed {
        isize::try_from(inserted - removed).unwrap_or(isize::MAX)
    } else {
        isize::try_from(removed - inserted).map_or(isize::MIN, |delta| -delta)
    }
}
