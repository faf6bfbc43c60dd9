/*!
 * Local key/value store.
 *
 * Mirrors the small `getItem` / `setItem` / `removeItem` surface the session
 * layer needs, backed by the `local_storage` table.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, OptionalExtension};

use super::connection::StoreConnection;

/// Key of the persisted access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key of the persisted refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Key of the persisted language preference
pub const PREFERRED_LANGUAGE_KEY: &str = "preferred_language";

/// Persistent string store
#[derive(Clone)]
pub struct LocalStore {
    db: StoreConnection,
}

impl LocalStore {
    /// Create a store over the given connection
    pub fn new(db: StoreConnection) -> Self {
        Self { db }
    }

    /// Create a store at the default location
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(StoreConnection::new_default()?))
    }

    /// Create a store with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self::new(StoreConnection::new_in_memory()?))
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &StoreConnection {
        &self.db
    }

    /// Read a value
    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.db
            .execute_async(move |conn| {
                let value = conn
                    .query_row(
                        "SELECT value FROM local_storage WHERE key = ?1",
                        params![key],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await
    }

    /// Insert or overwrite a value
    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        debug!("Storing '{}'", key);
        let key = key.to_string();
        let value = value.to_string();
        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO local_storage (key, value, updated_at)
                    VALUES (?1, ?2, datetime('now'))
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                    "#,
                    params![key, value],
                )?;
                Ok(())
            })
            .await
    }

    /// Write several values atomically
    pub async fn set_items(&self, items: &[(&str, &str)]) -> Result<()> {
        let items: Vec<(String, String)> = items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.db
            .transaction_async(move |tx| {
                for (key, value) in &items {
                    tx.execute(
                        r#"
                        INSERT INTO local_storage (key, value, updated_at)
                        VALUES (?1, ?2, datetime('now'))
                        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                        "#,
                        params![key, value],
                    )?;
                }
                Ok(())
            })
            .await
    }

    /// Remove a value; removing a missing key is not an error
    pub async fn remove_item(&self, key: &str) -> Result<()> {
        debug!("Removing '{}'", key);
        let key = key.to_string();
        self.db
            .execute_async(move |conn| {
                conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
    }

    /// Remove several values atomically
    pub async fn remove_items(&self, keys: &[&str]) -> Result<()> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.db
            .transaction_async(move |tx| {
                for key in &keys {
                    tx.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
                }
                Ok(())
            })
            .await
    }

    /// All stored keys, sorted
    pub async fn keys(&self) -> Result<Vec<String>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare("SELECT key FROM local_storage ORDER BY key")?;
                let keys = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(keys)
            })
            .await
    }
}
