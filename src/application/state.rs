use std::sync::Arc;

use crate::domain::{AppError, DownloadRecord};

/// Snapshot of everything the front end shows for one session.
///
/// Transitions never mutate in place: each returns the next snapshot, or
/// `None` when the transition does not apply to the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub url_input: String,
    pub in_flight: bool,
    pub last_error: Option<String>,
    /// Non-fatal notice about the history list, kept apart from `last_error`.
    pub history_notice: Option<String>,
    pub history: Arc<Vec<DownloadRecord>>,
    history_revision: u64,
}

impl SessionState {
    pub fn with_url_input(&self, url_input: String) -> Self {
        Self {
            url_input,
            ..self.clone()
        }
    }

    /// Idle -> Submitting. Refused while a submission is outstanding.
    pub fn begin_submission(&self) -> Option<Self> {
        if self.in_flight {
            return None;
        }
        Some(Self {
            in_flight: true,
            last_error: None,
            ..self.clone()
        })
    }

    /// Submitting -> Idle, whatever the outcome was.
    pub fn finish_submission(&self) -> Self {
        Self {
            in_flight: false,
            ..self.clone()
        }
    }

    pub fn submission_succeeded(&self) -> Self {
        Self {
            url_input: String::new(),
            ..self.clone()
        }
    }

    pub fn submission_failed(&self, error: &AppError) -> Self {
        Self {
            last_error: Some(error.user_message()),
            ..self.clone()
        }
    }

    /// Replace the whole list, unless a newer refresh was already applied.
    pub fn history_loaded(&self, revision: u64, records: Vec<DownloadRecord>) -> Option<Self> {
        if revision <= self.history_revision {
            return None;
        }
        Some(Self {
            history: Arc::new(records),
            history_notice: None,
            history_revision: revision,
            ..self.clone()
        })
    }

    /// Keep the displayed list and raise the history notice.
    pub fn history_failed(&self, revision: u64, error: &AppError) -> Option<Self> {
        if revision <= self.history_revision {
            return None;
        }
        Some(Self {
            history_notice: Some(error.user_message()),
            history_revision: revision,
            ..self.clone()
        })
    }
}
