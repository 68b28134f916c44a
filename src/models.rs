// Data model for tasknote

use serde::{Deserialize, Serialize};

/// One persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Engine-assigned primary key, unique for the lifetime of the store.
    pub id: i64,
    /// Note body, possibly multi-line. Never empty once persisted.
    pub content: String,
    /// Seconds since the Unix epoch, set at insert and never mutated.
    pub created_at: i64,
}

impl Task {
    /// Creation time rendered for display, UTC.
    pub fn created_at_display(&self) -> String {
        use chrono::{DateTime, Utc};
        match DateTime::<Utc>::from_timestamp(self.created_at, 0) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => self.created_at.to_string(),
        }
    }
}
