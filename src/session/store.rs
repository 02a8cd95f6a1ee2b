use crate::error::SessionError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[cfg(feature = "sqlite-session")]
use crate::database::DatabaseManager;

/// Holder of the single bearer token, stored under a fixed key.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, SessionError>;
    fn set(&self, token: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Tab-scoped store: lives as long as the process.
pub struct InMemorySessionStore {
    key: String,
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_token(key: impl Into<String>, token: &str) -> Self {
        let store = Self::new(key);
        store
            .values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(store.key.clone(), token.to_string());
        store
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        let values = self.values.read().map_err(|_| SessionError::Poisoned)?;
        Ok(values.get(&self.key).cloned())
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| SessionError::Poisoned)?;
        values.insert(self.key.clone(), token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| SessionError::Poisoned)?;
        values.remove(&self.key);
        Ok(())
    }
}

/// Origin-scoped store that survives restarts.
#[cfg(feature = "sqlite-session")]
pub struct SqliteSessionStore {
    db: Arc<DatabaseManager>,
    key: String,
}

#[cfg(feature = "sqlite-session")]
impl SqliteSessionStore {
    pub fn new(db: Arc<DatabaseManager>, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }
}

#[cfg(feature = "sqlite-session")]
impl SessionStore for SqliteSessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        use rusqlite::OptionalExtension;

        self.db.with_connection(|conn| {
            conn.query_row(
                "SELECT value FROM session_store WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()
        })
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO session_store (key, value, updated_at)
                 VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                rusqlite::params![&self.key, token],
            )
        })?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM session_store WHERE key = ?1", [&self.key])
        })?;
        Ok(())
    }
}
