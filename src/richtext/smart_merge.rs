// Smart Merge
// Places generated fragments into a document by their leading heading:
// a section with the same heading is replaced, anything else is inserted at the cursor.

use serde::{Deserialize, Serialize};

use super::html_converter::parse_fragment;
use super::structured_document::*;
use super::structured_editor::TextSurface;

/// Where a replaced section ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionBoundary {
    /// The next heading of any level 1-3
    #[default]
    AnyHeading,
    /// The next heading whose level is the same as or higher than the target's
    SameOrHigher,
}

/// What a merge will do to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePlan {
    /// Replace the section spanning `range` (block boundaries)
    Replace { range: Range, anchor_key: String },
    /// No matching section: insert at the cursor
    Insert,
}

/// The region a smart update rewrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRange {
    /// Id of the inserted anchor heading, for scroll/focus cues
    pub heading_id: ElementId,
    pub heading_index: usize,
    /// Block span of the inserted fragment
    pub blocks: std::ops::Range<usize>,
}

/// Match key of a fragment: its first heading, trimmed and lowercased
pub fn anchor_key(fragment: &[Block]) -> Option<String> {
    fragment.iter().find_map(Block::heading_key)
}

/// Decide how a parsed fragment merges into the document
pub fn plan(doc: &StructuredDocument, fragment: &[Block], boundary: SectionBoundary) -> MergePlan {
    let Some(key) = anchor_key(fragment) else {
        return MergePlan::Insert;
    };

    let blocks = doc.blocks();
    let Some(target) = blocks
        .iter()
        .position(|block| block.heading_key().as_deref() == Some(key.as_str()))
    else {
        return MergePlan::Insert;
    };
    let target_level = blocks[target].heading_level().unwrap_or(1);

    let end = blocks[target + 1..]
        .iter()
        .position(|block| match (block.heading_level(), boundary) {
            (Some(_), SectionBoundary::AnyHeading) => true,
            (Some(level), SectionBoundary::SameOrHigher) => level <= target_level,
            (None, _) => false,
        })
        .map(|offset| DocumentPosition::new(target + 1 + offset, 0))
        .unwrap_or_else(|| doc.end_boundary());

    MergePlan::Replace {
        range: Range::new(DocumentPosition::new(target, 0), end),
        anchor_key: key,
    }
}

/// Merge a fragment into the surface. Returns the rewritten region when a
/// matching section was replaced, `None` when the fragment was inserted at
/// the cursor instead.
pub fn smart_update<S: TextSurface + ?Sized>(
    surface: &mut S,
    fragment: &str,
    boundary: SectionBoundary,
) -> Option<AppliedRange> {
    let blocks = parse_fragment(fragment);

    match plan(surface.document(), &blocks, boundary) {
        MergePlan::Replace { range, anchor_key } => {
            tracing::debug!(
                anchor = %anchor_key,
                from = range.start.block_index,
                to = range.end.block_index,
                "replacing matched section"
            );
            let insertion = surface.replace_range(range, blocks);
            let doc = surface.document();
            let (heading_index, heading) = doc
                .blocks()
                .iter()
                .enumerate()
                .skip(insertion.blocks.start)
                .take(insertion.blocks.len())
                .find(|(_, block)| block.heading_key().as_deref() == Some(anchor_key.as_str()))?;
            Some(AppliedRange {
                heading_id: heading.id,
                heading_index,
                blocks: insertion.blocks,
            })
        }
        MergePlan::Insert => {
            match anchor_key(&blocks) {
                Some(key) => tracing::debug!(anchor = %key, "no matching section, inserting"),
                None => tracing::debug!("fragment has no heading, inserting"),
            }
            surface.insert_blocks_at_cursor(blocks);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::html_converter::{parse, serialize};
    use crate::richtext::structured_editor::StructuredEditor;
    use pretty_assertions::assert_eq;

    const DOC: &str = "<h1>Giriş</h1><p>Eski</p><h2>Yöntem</h2><p>Y</p>";

    #[test]
    fn test_anchor_key_uses_first_heading() {
        let blocks = parse_fragment("<p>lead</p><h2>  Yöntem </h2><h1>Other</h1>");
        assert_eq!(anchor_key(&blocks).as_deref(), Some("yöntem"));
        assert_eq!(anchor_key(&parse_fragment("<p>none</p>")), None);
    }

    #[test]
    fn test_plan_any_heading_boundary() {
        let doc = parse(DOC);
        let fragment = parse_fragment("<h1>giriş</h1><p>Yeni</p>");
        assert_eq!(
            plan(&doc, &fragment, SectionBoundary::AnyHeading),
            MergePlan::Replace {
                range: Range::new(DocumentPosition::new(0, 0), DocumentPosition::new(2, 0)),
                anchor_key: "giriş".to_string(),
            }
        );
    }

    #[test]
    fn test_plan_same_or_higher_boundary() {
        let doc = parse(DOC);
        let fragment = parse_fragment("<h1>Giriş</h1>");
        assert_eq!(
            plan(&doc, &fragment, SectionBoundary::SameOrHigher),
            MergePlan::Replace {
                range: Range::new(DocumentPosition::new(0, 0), doc.end_boundary()),
                anchor_key: "giriş".to_string(),
            }
        );
    }

    #[test]
    fn test_plan_without_match_inserts() {
        let doc = parse(DOC);
        let fragment = parse_fragment("<h2>Sonuç</h2>");
        assert_eq!(plan(&doc, &fragment, SectionBoundary::AnyHeading), MergePlan::Insert);
    }

    #[test]
    fn test_replace_section() {
        let mut editor = StructuredEditor::from_markup(DOC);
        let applied = smart_update(
            &mut editor,
            "<h1>Giriş</h1><p>Yeni</p>",
            SectionBoundary::AnyHeading,
        )
        .expect("section should match");

        assert_eq!(
            serialize(editor.document()),
            "<h1>Giriş</h1><p>Yeni</p><h2>Yöntem</h2><p>Y</p>"
        );
        assert_eq!(applied.heading_index, 0);
        assert_eq!(applied.blocks, 0..2);
        assert_eq!(editor.document().blocks()[0].id, applied.heading_id);
    }

    #[test]
    fn test_replace_last_section_up_to_end() {
        let mut editor = StructuredEditor::from_markup(DOC);
        smart_update(
            &mut editor,
            "<h2>YÖNTEM</h2><ul><li>adım</li></ul>",
            SectionBoundary::AnyHeading,
        );
        assert_eq!(
            serialize(editor.document()),
            "<h1>Giriş</h1><p>Eski</p><h2>YÖNTEM</h2><ul><li>adım</li></ul>"
        );
    }

    #[test]
    fn test_duplicate_headings_first_wins() {
        let mut editor =
            StructuredEditor::from_markup("<h2>Not</h2><p>1</p><h2>Not</h2><p>2</p>");
        smart_update(&mut editor, "<h2>Not</h2><p>yeni</p>", SectionBoundary::AnyHeading);
        assert_eq!(
            serialize(editor.document()),
            "<h2>Not</h2><p>yeni</p><h2>Not</h2><p>2</p>"
        );
    }

    #[test]
    fn test_unmatched_heading_appends() {
        let mut editor = StructuredEditor::from_markup(DOC);
        let applied = smart_update(&mut editor, "<h2>Sonuç</h2>", SectionBoundary::AnyHeading);
        assert_eq!(applied, None);
        assert_eq!(
            serialize(editor.document()),
            "<h1>Giriş</h1><p>Eski</p><h2>Yöntem</h2><p>Y</p><h2>Sonuç</h2>"
        );
    }

    #[test]
    fn test_malformed_fragment_kept_raw() {
        let mut editor = StructuredEditor::from_markup("<p>a</p>");
        smart_update(&mut editor, "<div class=\"x\">unclosed", SectionBoundary::AnyHeading);
        assert_eq!(
            serialize(editor.document()),
            "<p>a</p><div class=\"x\">unclosed"
        );
    }
}
