// Document lifecycle: the stored collection, editing sessions and debounced saving.

use std::time::Instant;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use crate::autosave::{PendingSave, SaveScheduler};
use crate::document::{Document, DocumentRepository};
use crate::error::{LibraryError, Result};
use crate::metrics::{DocumentMetrics, update_metrics};
use crate::richtext::html_converter::parse;
use crate::session::{EditorSession, SessionOptions};
use crate::settings::Settings;
use crate::templates::{self, TEMPLATES};

/// The ordered collection of documents and its storage
pub struct DocumentLibrary<R: DocumentRepository> {
    repository: R,
    documents: Vec<Document>,
    scheduler: SaveScheduler,
    settings: Settings,
}

impl<R: DocumentRepository> DocumentLibrary<R> {
    /// Load the collection from storage
    pub fn open(repository: R, settings: Settings) -> Result<Self> {
        let documents = repository.load_all()?;
        tracing::debug!(count = documents.len(), "loaded documents");
        Ok(DocumentLibrary {
            repository,
            documents,
            scheduler: SaveScheduler::new(settings.save_debounce()),
            settings,
        })
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Documents in storage order (newest created first)
    pub fn list_documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Word count and preview for a piece of stored markup
    pub fn update_metrics(&self, content: &str) -> DocumentMetrics {
        update_metrics(&parse(content), self.settings.preview_length)
    }

    fn new_record(&self, id: String, template: &templates::Template) -> Document {
        let metrics = self.update_metrics(template.content);
        Document {
            id,
            title: template.title.to_string(),
            content: template.content.to_string(),
            last_modified: Utc::now(),
            word_count: metrics.word_count,
            preview: Some(metrics.preview),
        }
    }

    /// Create a document from a template (unknown keys give a blank one)
    /// and put it at the front of the collection
    pub fn create_document(&mut self, template_key: &str) -> Result<Document> {
        let template = templates::find(template_key);
        let document = self.new_record(Uuid::new_v4().to_string(), template);
        self.documents.insert(0, document.clone());
        self.persist()?;
        tracing::info!(id = %document.id, template = template.key, "created document");
        Ok(document)
    }

    /// Fill an empty collection with one document per template.
    /// Returns how many documents were added.
    pub fn seed_demo_documents(&mut self) -> Result<usize> {
        if !self.documents.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        for (idx, template) in TEMPLATES.iter().enumerate() {
            let mut document = self.new_record(format!("demo-{}-{}", template.key, idx), template);
            document.last_modified = now - TimeDelta::hours(idx as i64);
            self.documents.push(document);
        }
        self.persist()?;
        Ok(TEMPLATES.len())
    }

    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            boundary: self.settings.section_boundary,
            estimator: self.settings.page_estimator(),
            preview_length: self.settings.preview_length,
            font: self.settings.default_font,
        }
    }

    /// Start editing a document
    pub fn open_document(&self, id: &str) -> Result<EditorSession> {
        let document = self
            .get(id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
        Ok(EditorSession::new(
            &document.id,
            &document.title,
            &document.content,
            self.session_options(),
        ))
    }

    /// Arm the debounced save. Only the latest state within the debounce
    /// window is written.
    pub fn schedule_save(&mut self, id: &str, content: &str, title: &str, now: Instant) -> Result<()> {
        if let Some(displaced) = self.scheduler.schedule(id, title, content, now) {
            self.apply_save(displaced)?;
        }
        Ok(())
    }

    /// Schedule a save of a session's current state
    pub fn schedule_session_save(&mut self, session: &EditorSession, now: Instant) -> Result<()> {
        self.schedule_save(session.document_id(), &session.markup(), session.title(), now)
    }

    /// Run the pending save if its debounce expired. Returns true if something was written.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        match self.scheduler.poll(now) {
            Some(save) => self.apply_save(save).map(|_| true),
            None => Ok(false),
        }
    }

    /// Write the pending save right away
    pub fn flush(&mut self) -> Result<bool> {
        match self.scheduler.flush() {
            Some(save) => self.apply_save(save).map(|_| true),
            None => Ok(false),
        }
    }

    /// Release a session, persisting its final state
    pub fn close(&mut self, session: EditorSession) -> Result<()> {
        self.schedule_session_save(&session, Instant::now())?;
        self.flush()?;
        Ok(())
    }

    pub fn delete_document(&mut self, id: &str) -> Result<()> {
        let index = self
            .documents
            .iter()
            .position(|doc| doc.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
        self.scheduler.cancel(id);
        self.documents.remove(index);
        self.persist()?;
        tracing::info!(%id, "deleted document");
        Ok(())
    }

    /// True while a save is pending
    pub fn is_saving(&self) -> bool {
        self.scheduler.is_saving()
    }

    pub fn status_text(&self) -> String {
        self.scheduler.status_text(Utc::now())
    }

    fn apply_save(&mut self, save: PendingSave) -> Result<()> {
        let metrics = self.update_metrics(&save.content);
        let Some(document) = self.documents.iter_mut().find(|doc| doc.id == save.document_id) else {
            tracing::debug!(id = %save.document_id, "dropping save for removed document");
            return Ok(());
        };

        document.title = save.title;
        document.content = save.content;
        document.word_count = metrics.word_count;
        document.preview = Some(metrics.preview);
        document.last_modified = Utc::now();

        self.persist()?;
        self.scheduler.mark_saved(Utc::now());
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        self.repository.save_all(&self.documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn library() -> DocumentLibrary<MemoryStore> {
        DocumentLibrary::open(MemoryStore::new(), Settings::default()).unwrap()
    }

    #[test]
    fn test_create_prepends() {
        let mut library = library();
        let first = library.create_document("thesis").unwrap();
        let second = library.create_document("unknown").unwrap();

        let ids: Vec<&str> = library.list_documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert_eq!(second.content, "<p><br></p>");
        assert!(first.word_count > 0);
        assert_eq!(library.repository().save_count(), 2);
    }

    #[test]
    fn test_seed_only_when_empty() {
        let mut library = library();
        assert_eq!(library.seed_demo_documents().unwrap(), TEMPLATES.len());
        assert_eq!(library.seed_demo_documents().unwrap(), 0);
        assert_eq!(library.list_documents()[0].id, "demo-blank-0");
    }

    #[test]
    fn test_open_missing_document() {
        let library = library();
        assert!(matches!(
            library.open_document("nope"),
            Err(LibraryError::NotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_debounced_save_writes_latest_once() {
        let mut library = library();
        let doc = library.create_document("blank").unwrap();
        let saves_before = library.repository().save_count();
        let mut session = library.open_document(&doc.id).unwrap();

        let t0 = Instant::now();
        session.insert_text("Merhaba");
        library.schedule_session_save(&session, t0).unwrap();
        session.insert_text(" dünya");
        library.schedule_session_save(&session, t0 + Duration::from_millis(500)).unwrap();
        assert!(library.is_saving());

        assert!(!library.tick(t0 + Duration::from_millis(1000)).unwrap());
        assert!(library.tick(t0 + Duration::from_millis(1500)).unwrap());
        assert!(!library.is_saving());

        assert_eq!(library.repository().save_count(), saves_before + 1);
        let stored = library.get(&doc.id).unwrap();
        assert_eq!(stored.content, "<p>Merhaba dünya</p>");
        assert_eq!(stored.word_count, 2);
    }

    #[test]
    fn test_delete_cancels_pending_save() {
        let mut library = library();
        let doc = library.create_document("blank").unwrap();
        library
            .schedule_save(&doc.id, "<p>x</p>", "T", Instant::now())
            .unwrap();

        library.delete_document(&doc.id).unwrap();

        assert!(!library.is_saving());
        assert!(library.list_documents().is_empty());
        assert!(matches!(
            library.delete_document(&doc.id),
            Err(LibraryError::NotFound(_))
        ));
    }

    #[test]
    fn test_close_flushes() {
        let mut library = library();
        let doc = library.create_document("blank").unwrap();
        let mut session = library.open_document(&doc.id).unwrap();
        session.rename("Yeni başlık");
        session.insert_text("<h1>Bölüm</h1>");

        library.close(session).unwrap();

        let stored = library.get(&doc.id).unwrap();
        assert_eq!(stored.title, "Yeni başlık");
        assert_eq!(stored.content, "<h1>Bölüm</h1>");
        assert!(!library.is_saving());
    }
}
