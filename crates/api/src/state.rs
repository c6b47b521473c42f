use std::sync::Arc;
use std::time::Duration;

use crate::autosave::{NotesAutosave, PgNotesWriter};
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: regatta_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Debounced notes autosave timers.
    pub autosave: Arc<NotesAutosave>,
}

impl AppState {
    pub fn new(pool: regatta_db::DbPool, config: ServerConfig) -> Self {
        let autosave = NotesAutosave::new(
            PgNotesWriter::new(pool.clone()),
            Duration::from_millis(config.notes_autosave_debounce_ms),
        );
        Self {
            pool,
            config: Arc::new(config),
            autosave: Arc::new(autosave),
        }
    }
}
