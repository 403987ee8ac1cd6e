// Editing session for one open document.
// Wraps the structured editor and keeps the derived telemetry (word count,
// preview, page count) in step with every content change.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::fragment::clean_fragment;
use crate::metrics::{DocumentMetrics, PREVIEW_LENGTH, update_metrics};
use crate::pagination::PageEstimator;
use crate::richtext::html_converter::serialize;
use crate::richtext::smart_merge::{AppliedRange, SectionBoundary, smart_update};
use crate::richtext::structured_document::{DocumentPosition, ElementId, Range, StructuredDocument};
use crate::richtext::structured_editor::{FormatCommand, StructuredEditor, TextSurface};
use crate::templates;

/// Presentation font of the editing surface; does not affect content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
}

impl FontFamily {
    pub fn toggled(self) -> Self {
        match self {
            FontFamily::Sans => FontFamily::Serif,
            FontFamily::Serif => FontFamily::Sans,
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFamily::Sans => write!(f, "Sans"),
            FontFamily::Serif => write!(f, "Serif"),
        }
    }
}

/// Options a session is opened with
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub boundary: SectionBoundary,
    pub estimator: PageEstimator,
    pub preview_length: usize,
    pub font: FontFamily,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            boundary: SectionBoundary::default(),
            estimator: PageEstimator::default(),
            preview_length: PREVIEW_LENGTH,
            font: FontFamily::default(),
        }
    }
}

/// An open document: the only owner of its content while editing
pub struct EditorSession {
    document_id: String,
    title: String,
    editor: StructuredEditor,
    options: SessionOptions,
    font: FontFamily,
    changed: Rc<Cell<bool>>,
    metrics: DocumentMetrics,
    page_count: u32,
    scroll_target: Option<ElementId>,
}

impl EditorSession {
    pub fn new(document_id: &str, title: &str, markup: &str, options: SessionOptions) -> Self {
        let markup = if markup.trim().is_empty() {
            templates::blank().content
        } else {
            markup
        };

        let mut editor = StructuredEditor::from_markup(markup);
        let changed = Rc::new(Cell::new(false));
        let flag = changed.clone();
        editor.on_change(Box::new(move |_| flag.set(true)));

        let mut session = EditorSession {
            document_id: document_id.to_string(),
            title: title.to_string(),
            editor,
            options,
            font: options.font,
            changed,
            metrics: DocumentMetrics::default(),
            page_count: 1,
            scroll_target: None,
        };
        session.refresh();
        session
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title; a blank title falls back to [`templates::UNTITLED`]
    pub fn rename(&mut self, title: &str) {
        let title = title.trim();
        self.title = if title.is_empty() {
            templates::UNTITLED.to_string()
        } else {
            title.to_string()
        };
    }

    pub fn document(&self) -> &StructuredDocument {
        self.editor.document()
    }

    pub fn editor(&self) -> &StructuredEditor {
        &self.editor
    }

    /// Serialized content
    pub fn markup(&self) -> String {
        serialize(self.editor.document())
    }

    /// Insert markup at the cursor (document end without a selection)
    pub fn insert_text(&mut self, markup: &str) {
        self.editor.insert_at_cursor(&clean_fragment(markup));
        self.after_edit();
    }

    /// Replace the whole content
    pub fn replace_content(&mut self, markup: &str) {
        self.editor.replace_all(&clean_fragment(markup));
        self.after_edit();
    }

    /// Reset to a single empty paragraph
    pub fn clear_content(&mut self) {
        self.editor.replace_all(templates::blank().content);
        self.after_edit();
    }

    /// Merge a generated fragment by its heading, see [`smart_update`]
    pub fn smart_update(&mut self, fragment: &str) -> Option<AppliedRange> {
        let applied = smart_update(
            &mut self.editor,
            &clean_fragment(fragment),
            self.options.boundary,
        );
        if let Some(applied) = &applied {
            self.scroll_target = Some(applied.heading_id);
        }
        self.after_edit();
        applied
    }

    pub fn insert_page_break(&mut self) {
        self.editor.insert_hard_break();
        self.after_edit();
    }

    pub fn toggle_font(&mut self) -> FontFamily {
        self.font = self.font.toggled();
        self.font
    }

    pub fn font(&self) -> FontFamily {
        self.font
    }

    /// Run a toolbar command by name; unknown names are ignored
    pub fn format(&mut self, command: &str, value: Option<&str>) {
        match command.parse::<FormatCommand>() {
            Ok(command) => {
                self.editor.apply_inline_format(command, value);
                self.after_edit();
            }
            Err(err) => tracing::debug!(%err, "ignoring formatting command"),
        }
    }

    pub fn set_selection(&mut self, start: DocumentPosition, end: DocumentPosition) {
        self.editor.set_selection(start, end);
    }

    pub fn set_cursor(&mut self, pos: DocumentPosition) {
        self.editor.set_cursor(pos);
    }

    pub fn select_all(&mut self) {
        self.editor.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.editor.clear_selection();
    }

    pub fn selection(&self) -> Option<Range> {
        self.editor.selection_range()
    }

    pub fn word_count(&self) -> usize {
        self.metrics.word_count
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn metrics(&self) -> &DocumentMetrics {
        &self.metrics
    }

    /// Content revision; bumps on every change
    pub fn revision(&self) -> u64 {
        self.editor.revision()
    }

    /// Block the view should scroll to after a smart update
    pub fn take_scroll_target(&mut self) -> Option<ElementId> {
        self.scroll_target.take()
    }

    fn after_edit(&mut self) {
        if self.changed.replace(false) {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        let doc = self.editor.document();
        self.metrics = update_metrics(doc, self.options.preview_length);
        self.page_count = self.options.estimator.page_count(doc);
        tracing::trace!(
            revision = self.editor.revision(),
            words = self.metrics.word_count,
            pages = self.page_count,
            "content changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session(markup: &str) -> EditorSession {
        EditorSession::new("doc", "Başlık", markup, SessionOptions::default())
    }

    #[test]
    fn test_empty_content_opens_blank() {
        let session = session("");
        assert_eq!(session.markup(), "<p><br></p>");
        assert_eq!(session.word_count(), 0);
        assert_eq!(session.page_count(), 1);
    }

    #[test]
    fn test_insert_updates_metrics() {
        let mut session = session("<p><br></p>");
        session.insert_text("Merhaba dünya");
        assert_eq!(session.word_count(), 2);
        assert_eq!(session.metrics().preview, "Merhaba dünya");
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn test_smart_update_sets_scroll_target() {
        let mut session = session("<h1>Giriş</h1><p>Eski</p>");
        let applied = session
            .smart_update("```html\n<h1>Giriş</h1><p>Yepyeni metin</p>\n```")
            .unwrap();
        assert_eq!(session.take_scroll_target(), Some(applied.heading_id));
        assert_eq!(session.take_scroll_target(), None);
        assert_eq!(session.word_count(), 3);
    }

    #[test]
    fn test_unknown_format_command_ignored() {
        let mut session = session("<p>a</p>");
        session.select_all();
        session.format("strikeThrough", None);
        assert_eq!(session.revision(), 0);
        session.format("bold", None);
        assert_eq!(session.markup(), "<p><b>a</b></p>");
    }

    #[test]
    fn test_toggle_font_leaves_content() {
        let mut session = session("<p>a</p>");
        assert_eq!(session.toggle_font(), FontFamily::Serif);
        assert_eq!(session.toggle_font(), FontFamily::Sans);
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn test_blank_rename_is_untitled() {
        let mut session = session("<p>a</p>");
        session.rename("  ");
        assert_eq!(session.title(), templates::UNTITLED);
        session.rename(" Tez ");
        assert_eq!(session.title(), "Tez");
    }

    #[test]
    fn test_page_break_and_clear() {
        let mut session = session("<p>a</p>");
        session.insert_page_break();
        assert_eq!(session.document().block_count(), 3);
        session.clear_content();
        assert_eq!(session.markup(), "<p><br></p>");
        assert_eq!(session.word_count(), 0);
    }
}
