// Structured Document Model
// A block tree for rich-text documents, independent of any rendering surface.
// HTML is only used as the storage/interchange format (see html_converter).

use std::cmp::min;
use std::fmt;

use super::html_parser::markup_text;

/// Unique identifier for document elements
pub type ElementId = usize;

/// Inline emphasis (semantic, rendered as nested spans)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    Bold,
    Italic,
    Underline,
}

impl Emphasis {
    /// Tag name used when serializing the span
    pub fn tag(self) -> &'static str {
        match self {
            Emphasis::Bold => "b",
            Emphasis::Italic => "i",
            Emphasis::Underline => "u",
        }
    }

    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "b" | "strong" => Some(Emphasis::Bold),
            "i" | "em" => Some(Emphasis::Italic),
            "u" => Some(Emphasis::Underline),
            _ => None,
        }
    }
}

/// Horizontal alignment of a paragraph or heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Inline content (can appear within headings, paragraphs, list items and table cells)
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Span {
        emphasis: Emphasis,
        children: Vec<Inline>,
    },
    LineBreak,
    /// Unrecognized inline wrapper (`<span>`, `<a>`, `<sup>`, ...), attributes kept verbatim
    Element {
        name: String,
        attrs: String,
        children: Vec<Inline>,
    },
    /// Unrecognized void element (`<img>`, `<wbr>`, ...)
    Void {
        name: String,
        attrs: String,
    },
    /// Comments and malformed markup found inside inline content
    Raw(String),
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(text.into())
    }

    pub fn span(emphasis: Emphasis, children: Vec<Inline>) -> Self {
        Inline::Span { emphasis, children }
    }

    /// Length in positions (characters; breaks and void elements count as one)
    pub fn len(&self) -> usize {
        match self {
            Inline::Text(text) => text.chars().count(),
            Inline::Span { children, .. } | Inline::Element { children, .. } => {
                inline_len(children)
            }
            Inline::LineBreak | Inline::Void { .. } => 1,
            Inline::Raw(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten to plain text
    pub fn to_plain_text(&self) -> String {
        match self {
            Inline::Text(text) => text.clone(),
            Inline::Span { children, .. } | Inline::Element { children, .. } => {
                inline_text(children)
            }
            Inline::LineBreak => "\n".to_string(),
            Inline::Void { .. } | Inline::Raw(_) => String::new(),
        }
    }
}

/// Total position length of an inline sequence
pub fn inline_len(content: &[Inline]) -> usize {
    content.iter().map(Inline::len).sum()
}

/// Plain text of an inline sequence
pub fn inline_text(content: &[Inline]) -> String {
    content.iter().map(Inline::to_plain_text).collect()
}

fn char_to_byte(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Split an inline sequence at a position, returning (left, right).
/// Spans and elements straddling the split point are duplicated on both sides.
pub fn split_inlines(content: Vec<Inline>, offset: usize) -> (Vec<Inline>, Vec<Inline>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut pos = 0usize;

    for item in content {
        let len = item.len();
        if pos + len <= offset {
            left.push(item);
            pos += len;
            continue;
        }
        if pos >= offset {
            right.push(item);
            pos += len;
            continue;
        }

        // offset falls strictly inside this item
        let local = offset - pos;
        match item {
            Inline::Text(text) => {
                let (l, r) = text.split_at(char_to_byte(&text, local));
                left.push(Inline::Text(l.to_string()));
                right.push(Inline::Text(r.to_string()));
            }
            Inline::Span { emphasis, children } => {
                let (l, r) = split_inlines(children, local);
                left.push(Inline::Span {
                    emphasis,
                    children: l,
                });
                right.push(Inline::Span {
                    emphasis,
                    children: r,
                });
            }
            Inline::Element {
                name,
                attrs,
                children,
            } => {
                let (l, r) = split_inlines(children, local);
                left.push(Inline::Element {
                    name: name.clone(),
                    attrs: attrs.clone(),
                    children: l,
                });
                right.push(Inline::Element {
                    name,
                    attrs,
                    children: r,
                });
            }
            // single-position items have no interior
            other => left.push(other),
        }
        pos += len;
    }

    (left, right)
}

/// Merge adjacent text runs and equal spans, drop empty runs and spans
pub fn normalize_inlines(content: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::with_capacity(content.len());

    for item in content {
        let item = match item {
            Inline::Text(text) if text.is_empty() => continue,
            Inline::Span { emphasis, children } => {
                let children = normalize_inlines(children);
                if children.is_empty() {
                    continue;
                }
                Inline::Span { emphasis, children }
            }
            Inline::Element {
                name,
                attrs,
                children,
            } => Inline::Element {
                name,
                attrs,
                children: normalize_inlines(children),
            },
            other => other,
        };

        let leftover = match (out.last_mut(), item) {
            (Some(Inline::Text(prev)), Inline::Text(next)) => {
                prev.push_str(&next);
                None
            }
            (
                Some(Inline::Span {
                    emphasis: a,
                    children: prev,
                }),
                Inline::Span {
                    emphasis: b,
                    children: next,
                },
            ) if *a == b => {
                let joined: Vec<Inline> = std::mem::take(prev).into_iter().chain(next).collect();
                *prev = normalize_inlines(joined);
                None
            }
            (_, item) => Some(item),
        };
        if let Some(item) = leftover {
            out.push(item);
        }
    }

    out
}

/// Remove the positions [start..end) from an inline sequence
pub fn delete_inline_range(content: Vec<Inline>, start: usize, end: usize) -> Vec<Inline> {
    if start >= end {
        return content;
    }
    let (mut left, rest) = split_inlines(content, start);
    let (_deleted, right) = split_inlines(rest, end - start);
    left.extend(right);
    normalize_inlines(left)
}

/// True if every character in [start..end) sits inside a span with the given emphasis
pub fn has_emphasis(content: &[Inline], start: usize, end: usize, emphasis: Emphasis) -> bool {
    fn covered(
        content: &[Inline],
        start: usize,
        end: usize,
        emphasis: Emphasis,
        inherited: bool,
    ) -> bool {
        let mut pos = 0usize;
        for item in content {
            let len = item.len();
            let (item_start, item_end) = (pos, pos + len);
            pos = item_end;
            if item_end <= start || item_start >= end {
                continue;
            }
            let local_start = start.saturating_sub(item_start);
            let local_end = min(end, item_end) - item_start;
            let ok = match item {
                Inline::Text(_) => inherited,
                Inline::Span {
                    emphasis: own,
                    children,
                } => covered(
                    children,
                    local_start,
                    local_end,
                    emphasis,
                    inherited || *own == emphasis,
                ),
                Inline::Element { children, .. } => {
                    covered(children, local_start, local_end, emphasis, inherited)
                }
                // breaks and void elements carry no emphasis of their own
                _ => true,
            };
            if !ok {
                return false;
            }
        }
        true
    }

    covered(content, start, end, emphasis, false)
}

fn strip_emphasis(content: Vec<Inline>, emphasis: Emphasis) -> Vec<Inline> {
    let mut out = Vec::with_capacity(content.len());
    for item in content {
        match item {
            Inline::Span {
                emphasis: own,
                children,
            } if own == emphasis => out.extend(strip_emphasis(children, emphasis)),
            Inline::Span {
                emphasis: own,
                children,
            } => out.push(Inline::Span {
                emphasis: own,
                children: strip_emphasis(children, emphasis),
            }),
            Inline::Element {
                name,
                attrs,
                children,
            } => out.push(Inline::Element {
                name,
                attrs,
                children: strip_emphasis(children, emphasis),
            }),
            other => out.push(other),
        }
    }
    out
}

/// Apply (`on`) or remove emphasis over [start..end)
pub fn apply_emphasis(
    content: Vec<Inline>,
    start: usize,
    end: usize,
    emphasis: Emphasis,
    on: bool,
) -> Vec<Inline> {
    if start >= end {
        return content;
    }
    let (mut out, rest) = split_inlines(content, start);
    let (middle, right) = split_inlines(rest, end - start);
    let middle = strip_emphasis(middle, emphasis);
    if on {
        out.push(Inline::Span {
            emphasis,
            children: middle,
        });
    } else {
        out.extend(middle);
    }
    out.extend(right);
    normalize_inlines(out)
}

/// A table cell
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub header: bool,
    pub content: Vec<Inline>,
}

impl TableCell {
    pub fn new(content: Vec<Inline>) -> Self {
        TableCell {
            header: false,
            content,
        }
    }
}

/// Block-level content types
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading {
        level: u8, // 1-3
        align: Option<Alignment>,
        content: Vec<Inline>,
    },
    Paragraph {
        align: Option<Alignment>,
        content: Vec<Inline>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<Inline>>,
    },
    Table {
        rows: Vec<Vec<TableCell>>,
    },
    PageBreak,
    Raw {
        markup: String,
    },
}

/// Tag-level classification of blocks, used for block lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    H1,
    H2,
    H3,
    P,
    Ul,
    Ol,
    Table,
    PageBreak,
    Raw,
}

impl BlockTag {
    pub const HEADINGS: [BlockTag; 3] = [BlockTag::H1, BlockTag::H2, BlockTag::H3];
}

/// A block of content
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: ElementId,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(id: ElementId, kind: BlockKind) -> Self {
        Block { id, kind }
    }

    pub fn paragraph(id: ElementId) -> Self {
        Self::new(
            id,
            BlockKind::Paragraph {
                align: None,
                content: Vec::new(),
            },
        )
    }

    pub fn heading(id: ElementId, level: u8) -> Self {
        Self::new(
            id,
            BlockKind::Heading {
                level: level.clamp(1, 3),
                align: None,
                content: Vec::new(),
            },
        )
    }

    pub fn page_break(id: ElementId) -> Self {
        Self::new(id, BlockKind::PageBreak)
    }

    pub fn raw(id: ElementId, markup: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockKind::Raw {
                markup: markup.into(),
            },
        )
    }

    pub fn list(id: ElementId, ordered: bool, items: Vec<Vec<Inline>>) -> Self {
        Self::new(id, BlockKind::List { ordered, items })
    }

    pub fn with_plain_text(self, text: impl Into<String>) -> Self {
        self.with_inline(Inline::Text(text.into()))
    }

    pub fn with_inline(mut self, inline: Inline) -> Self {
        if let Some(content) = self.content_mut() {
            content.push(inline);
        }
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.set_alignment(Some(alignment));
        self
    }

    pub fn tag(&self) -> BlockTag {
        match &self.kind {
            BlockKind::Heading { level: 1, .. } => BlockTag::H1,
            BlockKind::Heading { level: 2, .. } => BlockTag::H2,
            BlockKind::Heading { .. } => BlockTag::H3,
            BlockKind::Paragraph { .. } => BlockTag::P,
            BlockKind::List { ordered: false, .. } => BlockTag::Ul,
            BlockKind::List { ordered: true, .. } => BlockTag::Ol,
            BlockKind::Table { .. } => BlockTag::Table,
            BlockKind::PageBreak => BlockTag::PageBreak,
            BlockKind::Raw { .. } => BlockTag::Raw,
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match &self.kind {
            BlockKind::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Normalized heading text used to match sections: trimmed and lowercased
    pub fn heading_key(&self) -> Option<String> {
        match &self.kind {
            BlockKind::Heading { content, .. } => Some(heading_key(&inline_text(content))),
            _ => None,
        }
    }

    /// Inline content of headings and paragraphs
    pub fn content(&self) -> Option<&[Inline]> {
        match &self.kind {
            BlockKind::Heading { content, .. } | BlockKind::Paragraph { content, .. } => {
                Some(content)
            }
            _ => None,
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match &mut self.kind {
            BlockKind::Heading { content, .. } | BlockKind::Paragraph { content, .. } => {
                Some(content)
            }
            _ => None,
        }
    }

    pub fn alignment(&self) -> Option<Alignment> {
        match &self.kind {
            BlockKind::Heading { align, .. } | BlockKind::Paragraph { align, .. } => *align,
            _ => None,
        }
    }

    pub fn set_alignment(&mut self, alignment: Option<Alignment>) {
        if let BlockKind::Heading { align, .. } | BlockKind::Paragraph { align, .. } =
            &mut self.kind
        {
            *align = alignment;
        }
    }

    /// Blocks without editable inline text occupy a single position
    pub fn is_atomic(&self) -> bool {
        self.content().is_none()
    }

    /// Get the total position length of this block
    pub fn text_len(&self) -> usize {
        match self.content() {
            Some(content) => inline_len(content),
            None => 1,
        }
    }

    /// Get plain text content
    pub fn to_plain_text(&self) -> String {
        match &self.kind {
            BlockKind::Heading { content, .. } | BlockKind::Paragraph { content, .. } => {
                inline_text(content)
            }
            BlockKind::List { items, .. } => items
                .iter()
                .map(|item| inline_text(item))
                .collect::<Vec<_>>()
                .join(" "),
            BlockKind::Table { rows } => rows
                .iter()
                .flat_map(|row| row.iter().map(|cell| inline_text(&cell.content)))
                .collect::<Vec<_>>()
                .join(" "),
            BlockKind::PageBreak => String::new(),
            BlockKind::Raw { markup } => markup_text(markup),
        }
    }

    /// An empty paragraph is the placeholder that subsequent typing replaces
    pub fn is_empty_paragraph(&self) -> bool {
        match &self.kind {
            BlockKind::Paragraph { content, .. } => {
                content.is_empty() || (content.len() == 1 && content[0] == Inline::LineBreak)
            }
            _ => false,
        }
    }

    /// A block of the same kind and alignment with no content
    pub fn empty_like(&self) -> Block {
        let kind = match &self.kind {
            BlockKind::Heading { level, align, .. } => BlockKind::Heading {
                level: *level,
                align: *align,
                content: Vec::new(),
            },
            BlockKind::Paragraph { align, .. } => BlockKind::Paragraph {
                align: *align,
                content: Vec::new(),
            },
            _ => BlockKind::Paragraph {
                align: None,
                content: Vec::new(),
            },
        };
        Block::new(0, kind)
    }

    /// Delete text in [start..end) within this block's flattened content
    pub fn delete_text_range(&mut self, start: usize, end: usize) {
        let len = self.text_len();
        let (start, end) = (min(start, len), min(end, len));
        if let Some(content) = self.content_mut() {
            *content = delete_inline_range(std::mem::take(content), start, end);
        }
    }

    /// Split this block's content at a flattened text offset, returning the right part.
    /// The left part remains in self.
    pub fn split_content_at(&mut self, offset: usize) -> Vec<Inline> {
        let offset = min(offset, self.text_len());
        match self.content_mut() {
            Some(content) => {
                let (left, right) = split_inlines(std::mem::take(content), offset);
                *content = normalize_inlines(left);
                normalize_inlines(right)
            }
            None => Vec::new(),
        }
    }

    /// Splice inline content at a flattened text offset
    pub fn insert_inlines(&mut self, offset: usize, inlines: Vec<Inline>) {
        let offset = min(offset, self.text_len());
        if let Some(content) = self.content_mut() {
            let (mut left, right) = split_inlines(std::mem::take(content), offset);
            if left == [Inline::LineBreak] {
                left.clear();
            }
            left.extend(inlines);
            left.extend(right);
            *content = normalize_inlines(left);
        }
    }
}

/// Normalize heading text into a match key
pub fn heading_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Position within a document
/// This represents a logical cursor position in the structured content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentPosition {
    pub block_index: usize,
    pub offset: usize, // Character offset within the block's flattened text
}

impl DocumentPosition {
    pub fn new(block_index: usize, offset: usize) -> Self {
        DocumentPosition {
            block_index,
            offset,
        }
    }

    pub fn start() -> Self {
        DocumentPosition::new(0, 0)
    }
}

/// A contiguous span between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: DocumentPosition,
    pub end: DocumentPosition,
}

impl Range {
    pub fn new(start: DocumentPosition, end: DocumentPosition) -> Self {
        Range { start, end }
    }

    pub fn collapsed(pos: DocumentPosition) -> Self {
        Range::new(pos, pos)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Same range with start <= end
    pub fn normalized(self) -> Self {
        if self.end < self.start {
            Range::new(self.end, self.start)
        } else {
            self
        }
    }
}

/// Outcome of inserting blocks: the affected block span and the caret after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub blocks: std::ops::Range<usize>,
    pub caret: DocumentPosition,
}

/// The structured document. Always holds at least one block.
#[derive(Debug, Clone)]
pub struct StructuredDocument {
    blocks: Vec<Block>,
    next_id: ElementId,
}

impl StructuredDocument {
    /// An empty document: a single empty paragraph
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    /// Build a document from parsed blocks, assigning ids
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut doc = StructuredDocument {
            blocks: Vec::with_capacity(blocks.len()),
            next_id: 1,
        };
        for block in blocks {
            doc.add_block(block);
        }
        doc.ensure_not_empty();
        doc
    }

    /// Create a simple document with one paragraph
    pub fn with_paragraph(text: impl Into<String>) -> Self {
        Self::from_blocks(vec![Block::paragraph(0).with_plain_text(text)])
    }

    /// Get a unique element ID
    fn next_id(&mut self) -> ElementId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Get blocks
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Add a block
    pub fn add_block(&mut self, mut block: Block) {
        if block.id == 0 {
            block.id = self.next_id();
        }
        self.blocks.push(block);
    }

    /// Insert a block at a specific position
    pub fn insert_block(&mut self, index: usize, mut block: Block) {
        if block.id == 0 {
            block.id = self.next_id();
        }
        let index = min(index, self.blocks.len());
        self.blocks.insert(index, block);
    }

    /// Get block count
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn ensure_not_empty(&mut self) {
        if self.blocks.is_empty() {
            let id = self.next_id();
            self.blocks.push(Block::paragraph(id));
        }
    }

    /// Validate and clamp a position to a caret inside the document
    pub fn clamp_position(&self, pos: DocumentPosition) -> DocumentPosition {
        if pos.block_index >= self.blocks.len() {
            return self.end_position();
        }
        let block = &self.blocks[pos.block_index];
        DocumentPosition::new(pos.block_index, pos.offset.min(block.text_len()))
    }

    /// Clamp a position, allowing the boundary after the last block
    fn clamp_boundary(&self, pos: DocumentPosition) -> DocumentPosition {
        if pos.block_index >= self.blocks.len() {
            return self.end_boundary();
        }
        self.clamp_position(pos)
    }

    /// Caret at the end of the last block
    pub fn end_position(&self) -> DocumentPosition {
        let last = self.blocks.len().saturating_sub(1);
        let len = self.blocks.get(last).map(Block::text_len).unwrap_or(0);
        DocumentPosition::new(last, len)
    }

    /// The boundary after the last block
    pub fn end_boundary(&self) -> DocumentPosition {
        DocumentPosition::new(self.blocks.len(), 0)
    }

    /// Plain text with block boundaries as single spaces; blocks without
    /// text (page breaks, empty paragraphs) add no separator
    pub fn to_plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.to_plain_text())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True for the blank document (a single empty paragraph)
    pub fn is_blank(&self) -> bool {
        self.blocks.len() == 1 && self.blocks[0].is_empty_paragraph()
    }

    /// Replace every block
    pub fn replace_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks.clear();
        for block in blocks {
            self.add_block(block);
        }
        self.ensure_not_empty();
    }

    /// Copy of the block list, for history snapshots
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    /// Restore a snapshot taken with [`StructuredDocument::snapshot`]
    pub fn restore(&mut self, blocks: Vec<Block>) {
        let max_id = blocks.iter().map(|b| b.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        self.blocks = blocks;
        self.ensure_not_empty();
    }

    /// Delete content in [start..end) and return the collapsed position.
    ///
    /// Offset 0 of a block in a multi-block range means the boundary before that
    /// block: a start block at offset 0 is removed entirely, an end block at
    /// offset 0 is left untouched. When both ends keep part of their text the
    /// tail of the end block is merged into the start block.
    pub fn delete_range(
        &mut self,
        start: DocumentPosition,
        end: DocumentPosition,
    ) -> DocumentPosition {
        let (a, b) = if end < start { (end, start) } else { (start, end) };
        let a = self.clamp_boundary(a);
        let b = self.clamp_boundary(b);
        if a >= b {
            return a;
        }

        if a.block_index == b.block_index {
            if self.blocks[a.block_index].is_atomic() {
                self.blocks.remove(a.block_index);
                self.ensure_not_empty();
                return self.clamp_boundary(DocumentPosition::new(a.block_index, 0));
            }
            self.blocks[a.block_index].delete_text_range(a.offset, b.offset);
            return a;
        }

        let keep_start = a.offset > 0;
        let joinable = keep_start && !self.blocks[a.block_index].is_atomic();

        // Head of the end block
        let mut tail: Option<Vec<Inline>> = None;
        let mut remove_upto = b.block_index;
        if b.block_index < self.blocks.len() && b.offset > 0 {
            let end_block = &mut self.blocks[b.block_index];
            if b.offset >= end_block.text_len() {
                remove_upto = b.block_index + 1;
            } else {
                let right = end_block.split_content_at(b.offset);
                if joinable {
                    tail = Some(right);
                    remove_upto = b.block_index + 1;
                } else if let Some(content) = end_block.content_mut() {
                    *content = right;
                }
            }
        }

        // Tail of the start block
        if keep_start {
            let start_block = &mut self.blocks[a.block_index];
            let len = start_block.text_len();
            start_block.delete_text_range(a.offset, len);
        }

        let remove_from = if keep_start {
            a.block_index + 1
        } else {
            a.block_index
        };
        if remove_from < remove_upto {
            self.blocks.drain(remove_from..remove_upto);
        }

        if let Some(tail) = tail
            && let Some(content) = self.blocks[a.block_index].content_mut()
        {
            let mut joined = std::mem::take(content);
            joined.extend(tail);
            *content = normalize_inlines(joined);
        }

        self.ensure_not_empty();
        if keep_start {
            a
        } else {
            self.clamp_boundary(DocumentPosition::new(a.block_index, 0))
        }
    }

    /// Insert blocks at a position.
    ///
    /// A single paragraph is spliced into the inline content at the position.
    /// Otherwise the blocks land on a block boundary: an empty placeholder
    /// paragraph at the position is replaced, and a block is split when the
    /// position lies inside its text.
    pub fn insert_blocks(&mut self, at: DocumentPosition, blocks: Vec<Block>) -> Insertion {
        let at = self.clamp_boundary(at);
        if blocks.is_empty() {
            return Insertion {
                blocks: at.block_index..at.block_index,
                caret: self.clamp_position(at),
            };
        }

        let splice = blocks.len() == 1
            && matches!(blocks[0].kind, BlockKind::Paragraph { .. })
            && self
                .blocks
                .get(at.block_index)
                .is_some_and(|target| !target.is_atomic());
        if splice {
            let inlines = blocks
                .into_iter()
                .next()
                .and_then(|block| match block.kind {
                    BlockKind::Paragraph { content, .. } => Some(content),
                    _ => None,
                })
                .unwrap_or_default();
            let added = inline_len(&inlines);
            self.blocks[at.block_index].insert_inlines(at.offset, inlines);
            return Insertion {
                blocks: at.block_index..at.block_index + 1,
                caret: DocumentPosition::new(at.block_index, at.offset + added),
            };
        }

        let count = blocks.len();
        let index = if at.block_index >= self.blocks.len() {
            // appending; a blank document loses its placeholder
            if self.is_blank() {
                self.blocks.clear();
            }
            self.blocks.len()
        } else if self.blocks[at.block_index].is_empty_paragraph() {
            self.blocks.remove(at.block_index);
            at.block_index
        } else if at.offset == 0 {
            at.block_index
        } else if at.offset >= self.blocks[at.block_index].text_len() {
            at.block_index + 1
        } else {
            let target = &mut self.blocks[at.block_index];
            let right_content = target.split_content_at(at.offset);
            let mut right = target.empty_like();
            if let Some(content) = right.content_mut() {
                *content = right_content;
            }
            self.insert_block(at.block_index + 1, right);
            at.block_index + 1
        };

        for (i, block) in blocks.into_iter().enumerate() {
            self.insert_block(index + i, block);
        }

        let last = index + count - 1;
        Insertion {
            blocks: index..index + count,
            caret: DocumentPosition::new(last, self.blocks[last].text_len()),
        }
    }
}

impl Default for StructuredDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StructuredDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "StructuredDocument ({} blocks):", self.blocks.len())?;
        for (i, block) in self.blocks.iter().enumerate() {
            write!(f, "  [{}] ", i)?;
            match &block.kind {
                BlockKind::Paragraph { .. } => write!(f, "Paragraph")?,
                BlockKind::Heading { level, .. } => write!(f, "Heading(h{})", level)?,
                BlockKind::List { ordered, items } => write!(
                    f,
                    "List({}, {} items)",
                    if *ordered { "ordered" } else { "unordered" },
                    items.len()
                )?,
                BlockKind::Table { rows } => write!(f, "Table({} rows)", rows.len())?,
                BlockKind::PageBreak => write!(f, "PageBreak")?,
                BlockKind::Raw { .. } => write!(f, "Raw")?,
            }
            writeln!(f, ": {:?}", block.to_plain_text())?;
        }
        Ok(())
    }
}
