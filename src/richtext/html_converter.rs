// HTML Converter
// Converts between StructuredDocument and HTML markup.
// HTML is used purely as a storage/interchange format.

use super::html_parser::{markup_text, parse_blocks};
use super::structured_document::*;

/// Convert markup to a StructuredDocument. Never fails.
pub fn parse(markup: &str) -> StructuredDocument {
    StructuredDocument::from_blocks(parse_blocks(markup))
}

/// Parse an untrusted fragment into transient blocks (ids unassigned)
pub fn parse_fragment(markup: &str) -> Vec<Block> {
    parse_blocks(markup)
}

/// Convert a StructuredDocument to markup
pub fn serialize(doc: &StructuredDocument) -> String {
    blocks_to_html(doc.blocks())
}

/// Plain text of a document; block boundaries become single spaces
pub fn extract_text(doc: &StructuredDocument) -> String {
    doc.to_plain_text()
}

/// Plain text of stored markup without keeping the tree around
pub fn markup_to_text(markup: &str) -> String {
    markup_text(markup)
}

pub fn blocks_to_html(blocks: &[Block]) -> String {
    let mut output = String::new();
    for block in blocks {
        block_to_html(block, &mut output);
    }
    output
}

fn block_to_html(block: &Block, output: &mut String) {
    match &block.kind {
        BlockKind::Heading {
            level,
            align,
            content,
        } => {
            let tag = format!("h{}", level);
            text_block_to_html(&tag, *align, content, output);
        }
        BlockKind::Paragraph { align, content } => {
            text_block_to_html("p", *align, content, output);
        }
        BlockKind::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            output.push_str(&format!("<{}>", tag));
            for item in items {
                output.push_str("<li>");
                inline_content_to_html(item, output);
                output.push_str("</li>");
            }
            output.push_str(&format!("</{}>", tag));
        }
        BlockKind::Table { rows } => {
            output.push_str("<table><tbody>");
            for row in rows {
                output.push_str("<tr>");
                for cell in row {
                    let tag = if cell.header { "th" } else { "td" };
                    output.push_str(&format!("<{}>", tag));
                    inline_content_to_html(&cell.content, output);
                    output.push_str(&format!("</{}>", tag));
                }
                output.push_str("</tr>");
            }
            output.push_str("</tbody></table>");
        }
        BlockKind::PageBreak => {
            output.push_str(r#"<div class="manual-page-break" contenteditable="false"></div>"#);
        }
        BlockKind::Raw { markup } => output.push_str(markup),
    }
}

fn text_block_to_html(
    tag: &str,
    align: Option<Alignment>,
    content: &[Inline],
    output: &mut String,
) {
    output.push('<');
    output.push_str(tag);
    if let Some(align) = align {
        output.push_str(&format!(r#" style="text-align: {};""#, align.as_css()));
    }
    output.push('>');
    if content.is_empty() {
        output.push_str("<br>");
    } else {
        inline_content_to_html(content, output);
    }
    output.push_str(&format!("</{}>", tag));
}

fn inline_content_to_html(content: &[Inline], output: &mut String) {
    for item in content {
        match item {
            Inline::Text(text) => output.push_str(&html_escape::encode_text(text)),
            Inline::Span { emphasis, children } => {
                let tag = emphasis.tag();
                output.push_str(&format!("<{}>", tag));
                inline_content_to_html(children, output);
                output.push_str(&format!("</{}>", tag));
            }
            Inline::LineBreak => output.push_str("<br>"),
            Inline::Element {
                name,
                attrs,
                children,
            } => {
                open_tag(name, attrs, output);
                inline_content_to_html(children, output);
                output.push_str(&format!("</{}>", name));
            }
            Inline::Void { name, attrs } => open_tag(name, attrs, output),
            Inline::Raw(markup) => output.push_str(markup),
        }
    }
}

fn open_tag(name: &str, attrs: &str, output: &mut String) {
    output.push('<');
    output.push_str(name);
    if !attrs.is_empty() {
        output.push(' ');
        output.push_str(attrs);
    }
    output.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roundtrip(markup: &str) -> String {
        serialize(&parse(markup))
    }

    #[test]
    fn test_empty_markup_is_blank_document() {
        let doc = parse("");
        assert!(doc.is_blank());
        assert_eq!(serialize(&doc), "<p><br></p>");
    }

    #[test]
    fn test_basic_roundtrip() {
        let markup = "<h1>Giriş</h1><p>Eski <b>metin</b> <i>burada</i> <u>altı</u></p>";
        assert_eq!(roundtrip(markup), markup);
    }

    #[test]
    fn test_synonyms_normalized() {
        insta::assert_snapshot!(
            roundtrip("<p><strong>a</strong><em>b</em></p>"),
            @"<p><b>a</b><i>b</i></p>"
        );
    }

    #[test]
    fn test_alignment_roundtrip() {
        let markup = r#"<h2 style="text-align: right;">Başlık</h2>"#;
        assert_eq!(roundtrip(markup), markup);
    }

    #[test]
    fn test_page_break_roundtrip() {
        let markup =
            r#"<p>a</p><div class="manual-page-break" contenteditable="false"></div><p><br></p>"#;
        assert_eq!(roundtrip(markup), markup);
    }

    #[test]
    fn test_list_and_table_roundtrip() {
        let markup = "<ol><li>bir</li><li>iki</li></ol>\
                      <table><tbody><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></tbody></table>";
        assert_eq!(roundtrip(markup), markup);
    }

    #[test]
    fn test_raw_fragments_verbatim() {
        let markup = "<blockquote class=\"q\"><p>alıntı</p></blockquote><!-- x --><pre>  code  </pre>";
        assert_eq!(roundtrip(markup), markup);
    }

    #[test]
    fn test_entities_reencoded() {
        insta::assert_snapshot!(roundtrip("<p>a &amp; b &lt; c</p>"), @"<p>a &amp; b &lt; c</p>");
    }

    #[test]
    fn test_unknown_inline_roundtrip() {
        let markup = r#"<p>E = mc<sup>2</sup> <a href="https://example.org">link</a><img src="x.png"></p>"#;
        assert_eq!(roundtrip(markup), markup);
    }

    #[test]
    fn test_extract_text_joins_blocks_with_spaces() {
        let doc = parse("<h1>Giriş</h1><p>Merhaba<br>dünya</p><ul><li>a</li><li>b</li></ul>");
        assert_eq!(extract_text(&doc), "Giriş Merhaba\ndünya a b");
    }

    #[test]
    fn test_markup_to_text() {
        assert_eq!(markup_to_text("<h1>A</h1><p>b <b>c</b></p>"), "A b c");
    }
}
