// Lenient HTML reader for the structured document model.
// Never fails: anything it does not understand is carried through verbatim
// as raw blocks or raw inline markup.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::structured_document::{
    Alignment, Block, BlockKind, Emphasis, Inline, TableCell, normalize_inlines,
};

/// Elements that start or end a block; inline parsing stops at these
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "caption",
    "col",
    "colgroup",
    "details",
    "dialog",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hgroup",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "script",
    "section",
    "style",
    "table",
    "tbody",
    "td",
    "template",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Elements without content or end tag
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Document wrappers whose tags are dropped while their content is kept
const TRANSPARENT_TAGS: &[&str] = &["html", "body"];

static TEXT_ALIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)text-align\s*:\s*(left|center|right|justify)").unwrap()
});

/// Attribute lists a paragraph or heading can carry without losing anything
static ALIGN_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^\s*style\s*=\s*(?:"\s*text-align\s*:\s*(?:left|center|right|justify)\s*;?\s*"|'\s*text-align\s*:\s*(?:left|center|right|justify)\s*;?\s*')\s*$"#,
    )
    .unwrap()
});

pub fn is_block_tag(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.contains(&name)
}

/// A lexical unit of markup. Spans are byte ranges into the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartTag {
        name: String,
        attrs: Range<usize>,
        self_closing: bool,
        span: Range<usize>,
    },
    EndTag {
        name: String,
        span: Range<usize>,
    },
    Text(Range<usize>),
    Comment(Range<usize>),
    Malformed(Range<usize>),
}

impl Token {
    pub fn span(&self) -> Range<usize> {
        match self {
            Token::StartTag { span, .. } | Token::EndTag { span, .. } => span.clone(),
            Token::Text(span) | Token::Comment(span) | Token::Malformed(span) => span.clone(),
        }
    }
}

/// Byte cursor over the markup source
struct Cursor<'a> {
    s: &'a [u8],
    i: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Cursor { s: s.as_bytes(), i: 0 }
    }

    fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.get(self.i + n).copied()
    }

    fn starts_with(&self, pat: &[u8]) -> bool {
        self.s[self.i..].starts_with(pat)
    }

    /// Index of the next occurrence of `pat` at or after `from`
    fn find(&self, from: usize, pat: &[u8]) -> Option<usize> {
        if from > self.s.len() {
            return None;
        }
        self.s[from..]
            .windows(pat.len())
            .position(|w| w == pat)
            .map(|p| p + from)
    }

    /// Index of the tag-closing `>` at or after `from`, skipping quoted attribute values
    fn find_tag_end(&self, from: usize) -> Option<usize> {
        let mut quote: Option<u8> = None;
        for (idx, &b) in self.s.iter().enumerate().skip(from) {
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b == b'>' => return Some(idx),
                None => {}
            }
        }
        None
    }

    fn name_end(&self, from: usize) -> usize {
        let mut end = from;
        while end < self.s.len() && (self.s[end].is_ascii_alphanumeric() || self.s[end] == b'-') {
            end += 1;
        }
        end
    }
}

/// Split markup into tokens
pub fn tokenize(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cur = Cursor::new(src);

    while !cur.eof() {
        let start = cur.i;

        if cur.starts_with(b"<!--") {
            match cur.find(start + 4, b"-->") {
                Some(end) => {
                    cur.i = end + 3;
                    tokens.push(Token::Comment(start..cur.i));
                }
                None => {
                    cur.i = src.len();
                    tokens.push(Token::Malformed(start..cur.i));
                }
            }
            continue;
        }

        if cur.starts_with(b"<!") || cur.starts_with(b"<?") {
            match cur.find_tag_end(start + 2) {
                Some(end) => {
                    cur.i = end + 1;
                    tokens.push(Token::Comment(start..cur.i));
                }
                None => {
                    cur.i = src.len();
                    tokens.push(Token::Malformed(start..cur.i));
                }
            }
            continue;
        }

        if cur.starts_with(b"</") && cur.peek_at(2).is_some_and(|b| b.is_ascii_alphabetic()) {
            let name_end = cur.name_end(start + 2);
            let name = src[start + 2..name_end].to_ascii_lowercase();
            match cur.find_tag_end(name_end) {
                Some(end) => {
                    cur.i = end + 1;
                    tokens.push(Token::EndTag {
                        name,
                        span: start..cur.i,
                    });
                }
                None => {
                    cur.i = src.len();
                    tokens.push(Token::Malformed(start..cur.i));
                }
            }
            continue;
        }

        if cur.starts_with(b"<") && cur.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic()) {
            let name_end = cur.name_end(start + 1);
            let name = src[start + 1..name_end].to_ascii_lowercase();
            match cur.find_tag_end(name_end) {
                Some(end) => {
                    let self_closing = end > name_end && cur.s[end - 1] == b'/';
                    let attrs_end = if self_closing { end - 1 } else { end };
                    cur.i = end + 1;
                    tokens.push(Token::StartTag {
                        name,
                        attrs: name_end..attrs_end,
                        self_closing,
                        span: start..cur.i,
                    });
                }
                None => {
                    cur.i = src.len();
                    tokens.push(Token::Malformed(start..cur.i));
                }
            }
            continue;
        }

        // Text runs up to the next '<' (a lone '<' is text)
        let end = cur.find(start + 1, b"<").unwrap_or(src.len());
        cur.i = end;
        tokens.push(Token::Text(start..end));
    }

    tokens
}

fn decode_text(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

fn alignment_from_attrs(attrs: &str) -> Option<Alignment> {
    TEXT_ALIGN
        .captures(attrs)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Alignment::from_css(m.as_str()))
}

fn no_attrs(attrs: &str) -> bool {
    attrs.trim().is_empty()
}

fn text_block_attrs(attrs: &str) -> bool {
    no_attrs(attrs) || ALIGN_ONLY.is_match(attrs)
}

/// `<p><br></p>` is how an empty paragraph is written down
fn normalize_block_content(content: Vec<Inline>) -> Vec<Inline> {
    let content = normalize_inlines(content);
    if content == [Inline::LineBreak] {
        Vec::new()
    } else {
        content
    }
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// Elements currently open; an end tag for one of them closes everything inside it
    open: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            src,
            tokens: tokenize(src),
            pos: 0,
            open: Vec::new(),
        }
    }

    fn slice(&self, span: Range<usize>) -> &'a str {
        &self.src[span]
    }

    fn has_attrs(&self, attrs: &Range<usize>) -> bool {
        !no_attrs(self.slice(attrs.clone()))
    }

    fn is_blank_text(&self, token: &Token) -> bool {
        matches!(token, Token::Text(span) if self.src[span.clone()].trim().is_empty())
    }

    fn parse_blocks(&mut self) -> Vec<Block> {
        let mut blocks = Vec::new();

        while let Some(token) = self.tokens.get(self.pos).cloned() {
            let blank = self.is_blank_text(&token);
            match token {
                Token::Text(_) if blank => self.pos += 1,
                Token::Text(_) => blocks.push(self.implicit_paragraph()),
                Token::Comment(span) | Token::Malformed(span) => {
                    blocks.push(Block::raw(0, self.slice(span)));
                    self.pos += 1;
                }
                // stray end tag
                Token::EndTag { .. } => self.pos += 1,
                Token::StartTag { name, attrs, .. } => {
                    if TRANSPARENT_TAGS.contains(&name.as_str()) {
                        self.pos += 1;
                        continue;
                    }
                    let attrs = self.slice(attrs);
                    let block = match name.as_str() {
                        "h1" | "h2" | "h3" | "p" if text_block_attrs(attrs) => {
                            self.text_block(&name, attrs)
                        }
                        "ul" | "ol" if no_attrs(attrs) => self.list(&name),
                        "table" if no_attrs(attrs) => self.table(),
                        "div" if attrs.contains("manual-page-break") => {
                            let (next, _) = self.element_end(self.pos);
                            self.pos = next;
                            Block::page_break(0)
                        }
                        _ if is_block_tag(&name) => self.raw_element(self.pos),
                        _ => self.implicit_paragraph(),
                    };
                    blocks.push(block);
                }
            }
        }

        blocks
    }

    /// Loose inline content at the top level
    fn implicit_paragraph(&mut self) -> Block {
        let content = self.inline_until("");
        Block::new(
            0,
            BlockKind::Paragraph {
                align: None,
                content: normalize_block_content(content),
            },
        )
    }

    fn text_block(&mut self, name: &str, attrs: &str) -> Block {
        self.pos += 1;
        let align = alignment_from_attrs(attrs);
        let content = normalize_block_content(self.inline_until(name));
        let kind = match name.as_bytes() {
            [b'h', level] => BlockKind::Heading {
                level: level - b'0',
                align,
                content,
            },
            _ => BlockKind::Paragraph { align, content },
        };
        Block::new(0, kind)
    }

    /// Parse inline children until `closer` ends them, an open ancestor is
    /// closed, or a block-level tag begins
    fn inline_until(&mut self, closer: &str) -> Vec<Inline> {
        self.open.push(closer.to_string());
        let mut out = Vec::new();

        while let Some(token) = self.tokens.get(self.pos).cloned() {
            match token {
                Token::Text(span) => {
                    out.push(Inline::Text(decode_text(self.slice(span))));
                    self.pos += 1;
                }
                Token::Comment(span) | Token::Malformed(span) => {
                    out.push(Inline::Raw(self.slice(span).to_string()));
                    self.pos += 1;
                }
                Token::EndTag { name, .. } => {
                    if name == closer {
                        self.pos += 1;
                        break;
                    }
                    if self.open.iter().any(|o| *o == name) {
                        break;
                    }
                    self.pos += 1;
                }
                Token::StartTag {
                    name,
                    attrs,
                    self_closing,
                    ..
                } => {
                    if is_block_tag(&name) || TRANSPARENT_TAGS.contains(&name.as_str()) {
                        break;
                    }
                    self.pos += 1;
                    let attrs = self.slice(attrs).trim().to_string();
                    if name == "br" {
                        out.push(Inline::LineBreak);
                    } else if self_closing || is_void_tag(&name) {
                        out.push(Inline::Void { name, attrs });
                    } else if let Some(emphasis) = Emphasis::from_tag(&name) {
                        let children = self.inline_until(&name);
                        out.push(Inline::Span { emphasis, children });
                    } else {
                        let children = self.inline_until(&name);
                        out.push(Inline::Element {
                            name,
                            attrs,
                            children,
                        });
                    }
                }
            }
        }

        self.open.pop();
        out
    }

    /// `<ul>`/`<ol>` made only of `<li>` items with inline content
    fn list(&mut self, name: &str) -> Block {
        let start = self.pos;
        let depth = self.open.len();
        self.pos += 1;
        self.open.push(name.to_string());

        let mut items = Vec::new();
        let parsed = loop {
            let Some(token) = self.tokens.get(self.pos).cloned() else {
                break true;
            };
            let blank = self.is_blank_text(&token);
            match token {
                Token::Text(_) if blank => self.pos += 1,
                Token::StartTag { name: tag, attrs, .. }
                    if tag == "li" && !self.has_attrs(&attrs) =>
                {
                    self.pos += 1;
                    items.push(normalize_block_content(self.inline_until("li")));
                }
                Token::EndTag { name: tag, .. } if tag == name => {
                    self.pos += 1;
                    break true;
                }
                _ => break false,
            }
        };
        self.open.truncate(depth);

        if parsed {
            Block::list(0, name == "ol", items)
        } else {
            self.raw_element(start)
        }
    }

    /// `<table>` made of rows of cells with inline content. Any attribute on
    /// the table, its sections, rows or cells keeps the whole table raw.
    fn table(&mut self) -> Block {
        let start = self.pos;
        let depth = self.open.len();
        self.pos += 1;
        self.open.push("table".to_string());

        let mut rows: Vec<Vec<TableCell>> = Vec::new();
        let parsed = loop {
            let Some(token) = self.tokens.get(self.pos).cloned() else {
                break true;
            };
            let blank = self.is_blank_text(&token);
            match token {
                Token::Text(_) if blank => self.pos += 1,
                Token::StartTag { name, attrs, .. }
                    if matches!(name.as_str(), "thead" | "tbody" | "tfoot")
                        && !self.has_attrs(&attrs) =>
                {
                    self.pos += 1
                }
                Token::EndTag { name, .. }
                    if matches!(name.as_str(), "thead" | "tbody" | "tfoot") =>
                {
                    self.pos += 1
                }
                Token::StartTag { name, attrs, .. } if name == "tr" && !self.has_attrs(&attrs) => {
                    self.pos += 1;
                    match self.table_row() {
                        Some(row) => rows.push(row),
                        None => break false,
                    }
                }
                Token::EndTag { name, .. } if name == "table" => {
                    self.pos += 1;
                    break true;
                }
                _ => break false,
            }
        };
        self.open.truncate(depth);

        if parsed {
            Block::new(0, BlockKind::Table { rows })
        } else {
            self.raw_element(start)
        }
    }

    fn table_row(&mut self) -> Option<Vec<TableCell>> {
        self.open.push("tr".to_string());
        let mut cells = Vec::new();

        let ok = loop {
            let Some(token) = self.tokens.get(self.pos).cloned() else {
                break true;
            };
            let blank = self.is_blank_text(&token);
            match token {
                Token::Text(_) if blank => self.pos += 1,
                Token::StartTag { name, attrs, .. }
                    if (name == "td" || name == "th") && !self.has_attrs(&attrs) =>
                {
                    self.pos += 1;
                    let content = normalize_block_content(self.inline_until(&name));
                    cells.push(TableCell {
                        header: name == "th",
                        content,
                    });
                }
                Token::EndTag { name, .. } if name == "tr" => {
                    self.pos += 1;
                    break true;
                }
                // implicitly closed by the next row or the end of the section
                Token::StartTag { name, .. } if name == "tr" => break true,
                Token::EndTag { name, .. }
                    if matches!(name.as_str(), "table" | "thead" | "tbody" | "tfoot") =>
                {
                    break true;
                }
                _ => break false,
            }
        };

        self.open.pop();
        ok.then_some(cells)
    }

    /// Keep the element starting at token `start` verbatim
    fn raw_element(&mut self, start: usize) -> Block {
        let from = self.tokens[start].span().start;
        let (next, to) = self.element_end(start);
        self.pos = next;
        Block::raw(0, self.slice(from..to))
    }

    /// Token index after the element starting at `start`, and its end byte
    fn element_end(&self, start: usize) -> (usize, usize) {
        let Some(Token::StartTag {
            name,
            self_closing,
            span,
            ..
        }) = self.tokens.get(start)
        else {
            return (start + 1, self.src.len());
        };
        if *self_closing || is_void_tag(name) {
            return (start + 1, span.end);
        }

        let mut depth = 1usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(start + 1) {
            match token {
                Token::StartTag {
                    name: tag,
                    self_closing: false,
                    ..
                } if tag == name => depth += 1,
                Token::EndTag { name: tag, span } if tag == name => {
                    depth -= 1;
                    if depth == 0 {
                        return (idx + 1, span.end);
                    }
                }
                _ => {}
            }
        }
        (self.tokens.len(), self.src.len())
    }
}

/// Parse markup into blocks (ids unassigned)
pub fn parse_blocks(src: &str) -> Vec<Block> {
    Parser::new(src).parse_blocks()
}

/// Plain text of a markup snippet; block boundaries and line breaks become single spaces
pub fn markup_text(src: &str) -> String {
    let mut out = String::new();
    let separate = |out: &mut String| {
        if !out.is_empty() && !out.ends_with(char::is_whitespace) {
            out.push(' ');
        }
    };

    for token in tokenize(src) {
        match token {
            Token::Text(span) => out.push_str(&decode_text(&src[span])),
            Token::StartTag { name, .. } | Token::EndTag { name, .. }
                if name == "br" || is_block_tag(&name) =>
            {
                separate(&mut out)
            }
            _ => {}
        }
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::structured_document::BlockTag;
    use pretty_assertions::assert_eq;

    fn tags(blocks: &[Block]) -> Vec<BlockTag> {
        blocks.iter().map(Block::tag).collect()
    }

    #[test]
    fn test_tokenize_basic() {
        let src = "<p class=\"x\">a &amp; b</p>";
        let tokens = tokenize(src);
        assert_eq!(tokens.len(), 3);
        match &tokens[0] {
            Token::StartTag { name, attrs, .. } => {
                assert_eq!(name, "p");
                assert_eq!(&src[attrs.clone()], " class=\"x\"");
            }
            other => panic!("unexpected token {other:?}"),
        }
        assert_eq!(tokens[1], Token::Text(13..22));
    }

    #[test]
    fn test_tokenize_quoted_gt_and_self_closing() {
        let src = "<img alt=\"a > b\"/>";
        let tokens = tokenize(src);
        assert_eq!(tokens.len(), 1);
        assert!(matches!(
            &tokens[0],
            Token::StartTag { self_closing: true, .. }
        ));
    }

    #[test]
    fn test_tokenize_unterminated_tag_is_malformed() {
        let tokens = tokenize("<p>ok</p><div class=\"x");
        assert!(matches!(tokens.last(), Some(Token::Malformed(_))));
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let blocks = parse_blocks("<p>1 < 2</p>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].to_plain_text(), "1 < 2");
    }

    #[test]
    fn test_parse_headings_and_paragraphs() {
        let blocks = parse_blocks("<h1>Giriş</h1>\n<p>Eski <b>metin</b></p><h2>Yöntem</h2>");
        assert_eq!(tags(&blocks), vec![BlockTag::H1, BlockTag::P, BlockTag::H2]);
        assert_eq!(blocks[1].to_plain_text(), "Eski metin");
        assert_eq!(
            blocks[1].content().map(|c| c.len()),
            Some(2),
            "text run and bold span"
        );
    }

    #[test]
    fn test_unclosed_paragraph_closes_at_next_block() {
        let blocks = parse_blocks("<p>one<p>two<h2>three");
        assert_eq!(tags(&blocks), vec![BlockTag::P, BlockTag::P, BlockTag::H2]);
        assert_eq!(blocks[2].to_plain_text(), "three");
    }

    #[test]
    fn test_alignment_from_style() {
        let blocks = parse_blocks("<p style=\"text-align: center;\">x</p>");
        assert_eq!(blocks[0].alignment(), Some(Alignment::Center));
    }

    #[test]
    fn test_empty_paragraph_with_br() {
        let blocks = parse_blocks("<p><br></p>");
        assert!(blocks[0].is_empty_paragraph());
        assert_eq!(blocks[0].content(), Some(&[][..]));
    }

    #[test]
    fn test_page_break_marker() {
        let blocks = parse_blocks(
            "<p>a</p><div class=\"manual-page-break\" contenteditable=\"false\"></div><p><br></p>",
        );
        assert_eq!(tags(&blocks), vec![BlockTag::P, BlockTag::PageBreak, BlockTag::P]);
    }

    #[test]
    fn test_list_and_table() {
        let blocks = parse_blocks(
            "<ul><li>bir</li><li><i>iki</i></li></ul>\
             <table><thead><tr><th>A</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>",
        );
        assert_eq!(tags(&blocks), vec![BlockTag::Ul, BlockTag::Table]);
        assert_eq!(blocks[0].to_plain_text(), "bir iki");
        match &blocks[1].kind {
            BlockKind::Table { rows } => {
                assert_eq!(rows.len(), 2);
                assert!(rows[0][0].header);
                assert!(!rows[1][0].header);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_list_degrades_to_raw() {
        let src = "<ul><li>a<ul><li>b</li></ul></li></ul>";
        let blocks = parse_blocks(src);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Raw { markup: src.to_string() });
        assert_eq!(blocks[0].to_plain_text(), "a b");
    }

    #[test]
    fn test_unknown_blocks_are_raw() {
        let src = "<blockquote><p>quoted</p></blockquote><h4>Small</h4><!-- note -->";
        let blocks = parse_blocks(src);
        assert_eq!(tags(&blocks), vec![BlockTag::Raw, BlockTag::Raw, BlockTag::Raw]);
        assert_eq!(blocks[0].to_plain_text(), "quoted");
        assert_eq!(blocks[2].kind, BlockKind::Raw { markup: "<!-- note -->".to_string() });
    }

    #[test]
    fn test_loose_text_becomes_paragraph() {
        let blocks = parse_blocks("  Merhaba <b>dünya</b>  ");
        assert_eq!(tags(&blocks), vec![BlockTag::P]);
        assert_eq!(blocks[0].to_plain_text(), "  Merhaba dünya  ");
    }

    #[test]
    fn test_unknown_inline_elements_preserved() {
        let blocks = parse_blocks("<p>x<sup class=\"n\">2</sup><img src=\"a.png\"></p>");
        let content = blocks[0].content().unwrap_or_default();
        assert_eq!(
            content[1],
            Inline::Element {
                name: "sup".to_string(),
                attrs: "class=\"n\"".to_string(),
                children: vec![Inline::text("2")],
            }
        );
        assert!(matches!(&content[2], Inline::Void { name, .. } if name == "img"));
    }

    #[test]
    fn test_entities_decoded() {
        let blocks = parse_blocks("<p>Tom &amp; Jerry &lt;3</p>");
        assert_eq!(blocks[0].to_plain_text(), "Tom & Jerry <3");
    }

    #[test]
    fn test_markup_text() {
        assert_eq!(markup_text("<div><p>a</p><p>b<br>c</p></div>"), "a b c");
        assert_eq!(markup_text(""), "");
    }

    #[test]
    fn test_attributed_table_stays_raw() {
        for src in [
            "<table><tr><td colspan=\"2\">Toplam</td></tr><tr><td>a</td><td>b</td></tr></table>",
            "<table class=\"grafik\"><tr><td>a</td></tr></table>",
            "<table><tbody id=\"veri\"><tr><td>a</td></tr></tbody></table>",
            "<table><tr style=\"color: red\"><td>a</td></tr></table>",
        ] {
            let blocks = parse_blocks(src);
            assert_eq!(blocks.len(), 1, "{src}");
            assert_eq!(blocks[0].kind, BlockKind::Raw { markup: src.to_string() });
        }
    }

    #[test]
    fn test_attributed_text_blocks() {
        let blocks = parse_blocks(
            "<p class=\"lead\">Özet</p><h2 id=\"y\">Yöntem</h2><ul class=\"x\"><li>a</li></ul>",
        );
        assert_eq!(tags(&blocks), vec![BlockTag::Raw, BlockTag::Raw, BlockTag::Raw]);
        assert_eq!(
            blocks[0].kind,
            BlockKind::Raw {
                markup: "<p class=\"lead\">Özet</p>".to_string()
            }
        );

        let aligned = parse_blocks("<h3 style='text-align:right'>Sonuç</h3>");
        assert_eq!(tags(&aligned), vec![BlockTag::H3]);
        assert_eq!(aligned[0].alignment(), Some(Alignment::Right));
    }

    #[test]
    fn test_loose_break_is_empty_paragraph() {
        let blocks = parse_blocks("a<p>x</p><br>");
        assert_eq!(tags(&blocks), vec![BlockTag::P, BlockTag::P, BlockTag::P]);
        assert!(blocks[2].is_empty_paragraph());
        assert_eq!(blocks[2].content(), Some(&[][..]));
    }

    #[test]
    fn test_stray_end_tags_dropped() {
        let blocks = parse_blocks("</div><p>a</span>b</p>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].to_plain_text(), "ab");
    }
}
