// tasknote - console note-taking backed by an embedded SQLite store

pub mod capture;
pub mod models;
pub mod session;
pub mod store;

// Re-export main types for convenience
pub use capture::{CancelToken, capture_text};
pub use models::Task;
pub use store::{Store, now_secs};

// Re-export rusqlite for CLI use
pub use rusqlite;
