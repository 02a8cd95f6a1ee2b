use crate::error::SessionError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub mod schema;

pub struct DatabaseManager {
    conn: Arc<Mutex<Connection>>,
}

impl DatabaseManager {
    pub fn new(db_path: &Path) -> Result<Self, SessionError> {
        if let Some(dir) = db_path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("Failed to create {}: {}", dir.display(), e);
            }
        }

        let conn = Connection::open(db_path)?;
        tracing::debug!("Opened session database at {}", db_path.display());
        Self::with_schema(conn)
    }

    pub fn open_in_memory() -> Result<Self, SessionError> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(conn: Connection) -> Result<Self, SessionError> {
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, R>(&self, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<R>,
    {
        let conn = self.conn.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(f(&conn)?)
    }
}
