use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};

/// Debounce delay between the last edit and the save
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(1000);

/// A save waiting for its debounce to expire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub document_id: String,
    pub title: String,
    pub content: String,
    pub due: Instant,
}

/// Debounced auto-save. Holds at most one pending save; every new edit
/// re-arms the timer and replaces the pending state.
#[derive(Debug)]
pub struct SaveScheduler {
    debounce: Duration,
    pending: Option<PendingSave>,
    /// When the content was last successfully saved
    last_save_time: Option<DateTime<Utc>>,
}

impl SaveScheduler {
    pub fn new(debounce: Duration) -> Self {
        SaveScheduler {
            debounce,
            pending: None,
            last_save_time: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Arm (or re-arm) the save for a document.
    /// A pending save for a different document is handed back so the caller
    /// can persist it right away.
    pub fn schedule(
        &mut self,
        document_id: &str,
        title: &str,
        content: &str,
        now: Instant,
    ) -> Option<PendingSave> {
        let displaced = self
            .pending
            .take()
            .filter(|pending| pending.document_id != document_id);

        self.pending = Some(PendingSave {
            document_id: document_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            due: now + self.debounce,
        });
        displaced
    }

    /// Take the pending save if its debounce has expired
    pub fn poll(&mut self, now: Instant) -> Option<PendingSave> {
        if self.pending.as_ref().is_some_and(|pending| pending.due <= now) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Take the pending save regardless of its deadline
    pub fn flush(&mut self) -> Option<PendingSave> {
        self.pending.take()
    }

    /// Drop the pending save if it belongs to the given document
    pub fn cancel(&mut self, document_id: &str) -> bool {
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.document_id == document_id)
        {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<&PendingSave> {
        self.pending.as_ref()
    }

    /// True while a save is waiting to run
    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.last_save_time = Some(at);
    }

    pub fn last_save_time(&self) -> Option<DateTime<Utc>> {
        self.last_save_time
    }

    /// Get the status text for display
    pub fn status_text(&self, now: DateTime<Utc>) -> String {
        if self.is_saving() {
            return "Saving...".to_string();
        }

        match self.last_save_time {
            Some(saved) => format_time_since(saved, now),
            None => String::new(),
        }
    }
}

impl Default for SaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DEBOUNCE)
    }
}

/// Format a time duration as a human-readable string
pub fn format_time_since(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - time).num_seconds();

    // clock skew counts as "just now"
    if secs < 60 {
        "saved just now".to_string()
    } else if secs < 3600 {
        let mins = secs / 60;
        if mins == 1 {
            "saved 1 min ago".to_string()
        } else {
            format!("saved {} min ago", mins)
        }
    } else if secs < 86400 {
        let hours = secs / 3600;
        if hours == 1 {
            "saved 1 hour ago".to_string()
        } else {
            format!("saved {} hours ago", hours)
        }
    } else if secs < 604800 {
        let days = secs / 86400;
        if days == 1 {
            "saved 1 day ago".to_string()
        } else {
            format!("saved {} days ago", days)
        }
    } else {
        // A week or more - show date
        format!("saved {}", time.with_timezone(&Local).format("%Y-%m-%d"))
    }
}
