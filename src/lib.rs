// Library exports for folio

pub mod autosave;
pub mod document;
pub mod error;
pub mod fragment;
pub mod history;
pub mod library;
pub mod logging;
pub mod metrics;
pub mod pagination;
pub mod richtext;
pub mod session;
pub mod settings;
pub mod templates;

pub use document::{Document, DocumentRepository, JsonFileStore, MemoryStore};
pub use error::{CommandParseError, LibraryError};
pub use library::DocumentLibrary;
pub use session::{EditorSession, FontFamily};
pub use settings::Settings;
