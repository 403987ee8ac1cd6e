// Structured Editor
// Provides editing operations on a StructuredDocument behind the TextSurface trait.
// Every mutating call is recorded in the undo history and announced once.

use std::str::FromStr;

use super::html_converter::{parse, parse_fragment};
use super::structured_document::*;
use crate::error::CommandParseError;
use crate::history::History;

/// Toolbar formatting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    Undo,
    Redo,
}

impl FormatCommand {
    fn emphasis(self) -> Option<Emphasis> {
        match self {
            FormatCommand::Bold => Some(Emphasis::Bold),
            FormatCommand::Italic => Some(Emphasis::Italic),
            FormatCommand::Underline => Some(Emphasis::Underline),
            _ => None,
        }
    }

    fn alignment(self) -> Option<Option<Alignment>> {
        match self {
            FormatCommand::JustifyLeft => Some(None),
            FormatCommand::JustifyCenter => Some(Some(Alignment::Center)),
            FormatCommand::JustifyRight => Some(Some(Alignment::Right)),
            _ => None,
        }
    }
}

impl FromStr for FormatCommand {
    type Err = CommandParseError;

    /// Accepts `bold`, `justifyCenter`, `justify-center`, `justify_center`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "bold" => Ok(FormatCommand::Bold),
            "italic" => Ok(FormatCommand::Italic),
            "underline" => Ok(FormatCommand::Underline),
            "justifyleft" => Ok(FormatCommand::JustifyLeft),
            "justifycenter" => Ok(FormatCommand::JustifyCenter),
            "justifyright" => Ok(FormatCommand::JustifyRight),
            "undo" => Ok(FormatCommand::Undo),
            "redo" => Ok(FormatCommand::Redo),
            _ => Err(CommandParseError(s.to_string())),
        }
    }
}

/// Notification sent after every content mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentChanged {
    pub revision: u64,
}

pub type ChangeListener = Box<dyn FnMut(&ContentChanged) + 'static>;

/// Selection-aware editing primitives over a content tree
pub trait TextSurface {
    // Content access
    fn document(&self) -> &StructuredDocument;
    fn selection_range(&self) -> Option<Range>;

    // Mutations; each fires exactly one change notification
    fn insert_at_cursor(&mut self, fragment: &str) -> Insertion;
    fn insert_blocks_at_cursor(&mut self, blocks: Vec<Block>) -> Insertion;
    fn replace_all(&mut self, markup: &str);
    fn delete_range(&mut self, range: Range);
    fn replace_range(&mut self, range: Range, blocks: Vec<Block>) -> Insertion;
    fn apply_inline_format(&mut self, command: FormatCommand, value: Option<&str>);
    fn insert_hard_break(&mut self);

    // Observation
    fn on_change(&mut self, listener: ChangeListener);

    /// Blocks with one of the given tags, in document order
    fn find_blocks_by_tag(&self, tags: &[BlockTag]) -> Vec<(&Block, usize)> {
        self.document()
            .blocks()
            .iter()
            .enumerate()
            .filter(|(_, block)| tags.contains(&block.tag()))
            .map(|(index, block)| (block, index))
            .collect()
    }
}

/// The structured editor with selection state and undo history
pub struct StructuredEditor {
    document: StructuredDocument,
    selection: Option<Range>,
    history: History<Vec<Block>>,
    revision: u64,
    listeners: Vec<ChangeListener>,
}

impl StructuredEditor {
    /// Create a new editor with an empty document
    pub fn new() -> Self {
        Self::with_document(StructuredDocument::new())
    }

    /// Create an editor with an existing document
    pub fn with_document(document: StructuredDocument) -> Self {
        let history = History::with_initial(document.snapshot());
        StructuredEditor {
            document,
            selection: None,
            history,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Create an editor over stored markup
    pub fn from_markup(markup: &str) -> Self {
        Self::with_document(parse(markup))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Set selection range (clamped to the document)
    pub fn set_selection(&mut self, start: DocumentPosition, end: DocumentPosition) {
        let start = self.document.clamp_position(start);
        let end = self.document.clamp_position(end);
        self.selection = Some(Range::new(start, end));
    }

    /// Place a collapsed caret
    pub fn set_cursor(&mut self, pos: DocumentPosition) {
        let pos = self.document.clamp_position(pos);
        self.selection = Some(Range::collapsed(pos));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn select_all(&mut self) {
        let end = self.document.end_position();
        self.selection = Some(Range::new(DocumentPosition::start(), end));
    }

    /// Record the current tree and notify observers
    fn commit(&mut self) {
        self.history.push(self.document.snapshot());
        self.notify();
    }

    fn notify(&mut self) {
        self.revision += 1;
        let event = ContentChanged {
            revision: self.revision,
        };
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// An existing selection follows the caret; no selection stays none
    fn move_caret(&mut self, caret: DocumentPosition) {
        if self.selection.is_some() {
            self.selection = Some(Range::collapsed(self.document.clamp_position(caret)));
        }
    }

    fn insert_blocks_at_selection(&mut self, blocks: Vec<Block>) -> Insertion {
        let at = match self.selection.map(Range::normalized) {
            Some(range) if !range.is_collapsed() => {
                self.document.delete_range(range.start, range.end)
            }
            Some(range) => range.start,
            None => self.document.end_position(),
        };
        self.document.insert_blocks(at, blocks)
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.go_back().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.go_forward().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    fn restore(&mut self, snapshot: Vec<Block>) {
        self.document.restore(snapshot);
        if let Some(range) = self.selection {
            self.selection = Some(Range::new(
                self.document.clamp_position(range.start),
                self.document.clamp_position(range.end),
            ));
        }
        self.notify();
    }

    /// Per-block spans [start..end) covered by a range
    fn covered_spans(&self, range: Range) -> Vec<(usize, usize, usize)> {
        let range = range.normalized();
        let mut spans = Vec::new();
        let last = range
            .end
            .block_index
            .min(self.document.block_count().saturating_sub(1));
        for index in range.start.block_index..=last {
            let Some(block) = self.document.block(index) else {
                break;
            };
            let start = if index == range.start.block_index {
                range.start.offset
            } else {
                0
            };
            let end = if index == range.end.block_index {
                range.end.offset
            } else {
                block.text_len()
            };
            if start < end {
                spans.push((index, start, end.min(block.text_len())));
            }
        }
        spans
    }

    /// Bold/italic/underline over the selection; removed only when already on everywhere
    fn toggle_emphasis(&mut self, range: Range, emphasis: Emphasis) {
        let spans = self.covered_spans(range);
        if spans.is_empty() {
            return;
        }

        let all_on = spans.iter().all(|&(index, start, end)| {
            let Some(block) = self.document.block(index) else {
                return true;
            };
            match &block.kind {
                BlockKind::Heading { content, .. } | BlockKind::Paragraph { content, .. } => {
                    has_emphasis(content, start, end, emphasis)
                }
                BlockKind::List { items, .. } => items
                    .iter()
                    .all(|item| has_emphasis(item, 0, inline_len(item), emphasis)),
                BlockKind::Table { rows } => rows.iter().flatten().all(|cell| {
                    has_emphasis(&cell.content, 0, inline_len(&cell.content), emphasis)
                }),
                BlockKind::PageBreak | BlockKind::Raw { .. } => true,
            }
        });
        let on = !all_on;

        for (index, start, end) in spans {
            let Some(block) = self.document.block_mut(index) else {
                continue;
            };
            match &mut block.kind {
                BlockKind::Heading { content, .. } | BlockKind::Paragraph { content, .. } => {
                    *content = apply_emphasis(std::mem::take(content), start, end, emphasis, on);
                }
                BlockKind::List { items, .. } => {
                    for item in items.iter_mut() {
                        let len = inline_len(item);
                        *item = apply_emphasis(std::mem::take(item), 0, len, emphasis, on);
                    }
                }
                BlockKind::Table { rows } => {
                    for cell in rows.iter_mut().flatten() {
                        let len = inline_len(&cell.content);
                        cell.content =
                            apply_emphasis(std::mem::take(&mut cell.content), 0, len, emphasis, on);
                    }
                }
                BlockKind::PageBreak | BlockKind::Raw { .. } => {}
            }
        }
    }

    fn set_alignment(&mut self, range: Range, alignment: Option<Alignment>) {
        let range = range.normalized();
        let mut last = range.end.block_index;
        // a selection ending at the very start of a block does not touch it
        if range.end.offset == 0 && last > range.start.block_index {
            last -= 1;
        }
        let last = last.min(self.document.block_count().saturating_sub(1));
        for index in range.start.block_index..=last {
            if let Some(block) = self.document.block_mut(index) {
                block.set_alignment(alignment);
            }
        }
    }
}

impl TextSurface for StructuredEditor {
    fn document(&self) -> &StructuredDocument {
        &self.document
    }

    fn selection_range(&self) -> Option<Range> {
        self.selection
    }

    fn insert_at_cursor(&mut self, fragment: &str) -> Insertion {
        self.insert_blocks_at_cursor(parse_fragment(fragment))
    }

    fn insert_blocks_at_cursor(&mut self, blocks: Vec<Block>) -> Insertion {
        let insertion = self.insert_blocks_at_selection(blocks);
        self.move_caret(insertion.caret);
        self.commit();
        insertion
    }

    fn replace_all(&mut self, markup: &str) {
        self.document.replace_blocks(parse_fragment(markup));
        let end = self.document.end_position();
        self.move_caret(end);
        self.commit();
    }

    fn delete_range(&mut self, range: Range) {
        let range = range.normalized();
        let caret = self.document.delete_range(range.start, range.end);
        self.move_caret(caret);
        self.commit();
    }

    fn replace_range(&mut self, range: Range, blocks: Vec<Block>) -> Insertion {
        let range = range.normalized();
        let at = self.document.delete_range(range.start, range.end);
        let insertion = self.document.insert_blocks(at, blocks);
        self.move_caret(insertion.caret);
        self.commit();
        insertion
    }

    fn apply_inline_format(&mut self, command: FormatCommand, _value: Option<&str>) {
        let Some(range) = self.selection else {
            return;
        };

        match command {
            FormatCommand::Undo => {
                self.undo();
            }
            FormatCommand::Redo => {
                self.redo();
            }
            _ => {
                if let Some(emphasis) = command.emphasis() {
                    if range.is_collapsed() {
                        return;
                    }
                    self.toggle_emphasis(range, emphasis);
                } else if let Some(alignment) = command.alignment() {
                    self.set_alignment(range, alignment);
                }
                self.commit();
            }
        }
    }

    fn insert_hard_break(&mut self) {
        let blocks = vec![Block::page_break(0), Block::paragraph(0)];
        let insertion = self.insert_blocks_at_selection(blocks);
        self.move_caret(insertion.caret);
        self.commit();
    }

    fn on_change(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }
}

impl Default for StructuredEditor {
    fn default() -> Self {
        Self::new()
    }
}
