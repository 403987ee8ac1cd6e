use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::metrics::PREVIEW_LENGTH;
use crate::pagination::{DEFAULT_PAGE_EXTENT, LayoutMetrics, PageEstimator};
use crate::richtext::smart_merge::SectionBoundary;
use crate::session::FontFamily;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Folio";
const APPLICATION: &str = "folio";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "documents.json";

/// User configuration, read from `config.toml` in the platform config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Height of one page in pixels
    pub page_extent: f32,
    pub save_debounce_ms: u64,
    pub preview_length: usize,
    pub section_boundary: SectionBoundary,
    pub default_font: FontFamily,
    pub layout: LayoutMetrics,
    /// Document collection file; the platform data directory when unset
    pub storage_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            page_extent: DEFAULT_PAGE_EXTENT,
            save_debounce_ms: 1000,
            preview_length: PREVIEW_LENGTH,
            section_boundary: SectionBoundary::default(),
            default_font: FontFamily::default(),
            layout: LayoutMetrics::default(),
            storage_path: None,
        }
    }
}

impl Settings {
    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Settings::default(),
        }
    }

    /// Load from a file. A missing file gives the defaults; an invalid one
    /// is reported and also gives the defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Settings::default();
        };
        match toml::from_str::<Settings>(&contents) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to parse config file, using defaults"
                );
                Settings::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self).map_err(|err| {
            io::Error::new(ErrorKind::Other, format!("toml serialization error: {err}"))
        })?;

        fs::write(path, toml)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn page_estimator(&self) -> PageEstimator {
        PageEstimator::new(self.layout, self.page_extent)
    }

    /// Where the document collection lives
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .or_else(default_storage_path)
            .unwrap_or_else(|| PathBuf::from(STORE_FILE_NAME))
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn default_storage_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.data_local_dir().join(STORE_FILE_NAME))
}
