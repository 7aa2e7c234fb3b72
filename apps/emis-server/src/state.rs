//! Shared handler state.

use emis_db::Database;

/// State handed to every route handler.
///
/// `Database` is a cloneable pool handle, so cloning the state per request
/// is cheap and handlers share nothing else.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
