// Smart update scenarios through the editing session

use folio::metrics::word_count;
use folio::richtext::html_converter::{extract_text, parse, serialize};
use folio::richtext::smart_merge::{SectionBoundary, smart_update};
use folio::richtext::structured_document::DocumentPosition;
use folio::richtext::structured_editor::{StructuredEditor, TextSurface};
use folio::session::{EditorSession, SessionOptions};
use pretty_assertions::assert_eq;

fn session(markup: &str) -> EditorSession {
    EditorSession::new("doc", "Tez", markup, SessionOptions::default())
}

#[test]
fn replaces_only_the_anchored_section() {
    let mut session = session("<h1>Giriş</h1><p>Eski</p><h2>Yöntem</h2><p>Y</p>");

    let applied = session.smart_update("<h1>giriş</h1><p>Yeni</p>");

    assert!(applied.is_some());
    insta::assert_snapshot!(
        session.markup(),
        @"<h1>giriş</h1><p>Yeni</p><h2>Yöntem</h2><p>Y</p>"
    );
}

#[test]
fn repeated_update_is_idempotent() {
    let mut session = session("<h1>Giriş</h1><p>Eski</p><h2>Yöntem</h2><p>Y</p>");
    let fragment = "<h2>Yöntem</h2><p>Anket</p><ul><li>n = 120</li></ul>";

    session.smart_update(fragment);
    let once = session.markup();
    session.smart_update(fragment);

    assert_eq!(session.markup(), once);
    assert_eq!(
        once,
        "<h1>Giriş</h1><p>Eski</p><h2>Yöntem</h2><p>Anket</p><ul><li>n = 120</li></ul>"
    );
}

#[test]
fn fragment_without_heading_behaves_like_insert() {
    let markup = "<h1>Giriş</h1><p>Metin</p>";
    let fragment = "<p>Ek paragraf</p><p>İkinci</p>";

    let mut merged = StructuredEditor::from_markup(markup);
    let applied = smart_update(&mut merged, fragment, SectionBoundary::AnyHeading);

    let mut inserted = StructuredEditor::from_markup(markup);
    inserted.insert_at_cursor(fragment);

    assert_eq!(applied, None);
    assert_eq!(serialize(merged.document()), serialize(inserted.document()));
}

#[test]
fn fragment_without_heading_uses_the_cursor() {
    let mut editor = StructuredEditor::from_markup("<p>Baş</p><p>Son</p>");
    editor.set_cursor(DocumentPosition::new(0, 3));

    smart_update(&mut editor, "<p> ve orta</p>", SectionBoundary::AnyHeading);

    assert_eq!(serialize(editor.document()), "<p>Baş ve orta</p><p>Son</p>");
}

#[test]
fn unmatched_anchor_appends_at_end() {
    let mut session = session("<h1>Giriş</h1><p>a</p>");
    assert_eq!(session.smart_update("<h2>Sonuç</h2><p>b</p>"), None);
    assert_eq!(session.markup(), "<h1>Giriş</h1><p>a</p><h2>Sonuç</h2><p>b</p>");
}

#[test]
fn same_or_higher_boundary_keeps_subsections_in_section() {
    let options = SessionOptions {
        boundary: SectionBoundary::SameOrHigher,
        ..SessionOptions::default()
    };
    let mut session = EditorSession::new(
        "doc",
        "Tez",
        "<h1>Giriş</h1><h2>Alt</h2><p>x</p><h1>Sonuç</h1>",
        options,
    );

    session.smart_update("<h1>Giriş</h1><p>Tümüyle yeni</p>");

    assert_eq!(session.markup(), "<h1>Giriş</h1><p>Tümüyle yeni</p><h1>Sonuç</h1>");
}

#[test]
fn generated_fence_is_stripped_before_merge() {
    let mut session = session("<h1>Özet</h1><p>eski</p>");
    session.smart_update("```html\n<h1>Özet</h1>\n<p>yeni özet</p>\n```");
    assert_eq!(session.markup(), "<h1>Özet</h1><p>yeni özet</p>");
}

#[test]
fn empty_document_insert_counts_words() {
    let mut session = session("<p><br></p>");
    session.insert_text("Merhaba dünya");
    assert_eq!(session.word_count(), 2);
}

#[test]
fn styling_does_not_change_word_count() {
    let mut session = session("<h1>Giriş</h1><p>Bu bir deneme metnidir.</p>");
    let before = session.word_count();

    session.set_selection(DocumentPosition::new(1, 0), DocumentPosition::new(1, 6));
    session.format("bold", None);
    session.format("underline", None);
    session.format("justifyCenter", None);

    assert_eq!(session.word_count(), before);
    assert_eq!(
        word_count(&extract_text(&parse(&session.markup()))),
        before
    );
}
