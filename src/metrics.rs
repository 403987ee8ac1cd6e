use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::richtext::html_converter::extract_text;
use crate::richtext::structured_document::StructuredDocument;

/// Preview length shown in document lists
pub const PREVIEW_LENGTH: usize = 150;

/// Values derived from a document's content on every change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetrics {
    pub word_count: usize,
    pub preview: String,
}

/// Recompute word count and preview
pub fn update_metrics(doc: &StructuredDocument, preview_length: usize) -> DocumentMetrics {
    let text = extract_text(doc);
    DocumentMetrics {
        word_count: word_count(&text),
        preview: preview(&text, preview_length),
    }
}

/// Number of whitespace-separated tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First `length` grapheme clusters of the text; may cut mid-word
pub fn preview(text: &str, length: usize) -> String {
    text.graphemes(true).take(length).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::html_converter::parse;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("Merhaba dünya"), 2);
        assert_eq!(word_count("a\nb\tc"), 3);
    }

    #[test]
    fn test_word_count_across_blocks() {
        let doc = parse("<h1>Giriş</h1><p>bir<br>iki</p><ul><li>üç</li></ul>");
        assert_eq!(update_metrics(&doc, PREVIEW_LENGTH).word_count, 4);
    }

    #[test]
    fn test_preview_truncates_graphemes() {
        let text = "e\u{301}".repeat(200);
        let short = preview(&text, PREVIEW_LENGTH);
        assert_eq!(short.graphemes(true).count(), PREVIEW_LENGTH);
        assert_eq!(preview("kısa", PREVIEW_LENGTH), "kısa");
    }

    #[test]
    fn test_preview_may_cut_mid_word() {
        assert_eq!(preview("Araştırma", 5), "Araşt");
    }
}
