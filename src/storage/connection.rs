/*!
 * SQLite handle behind the session store.
 *
 * Every statement runs on tokio's blocking pool while holding the connection
 * mutex.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::schema;

const STORE_FILENAME: &str = "session.db";
const STORE_DIRNAME: &str = "panelkit";
const IN_MEMORY: &str = ":memory:";

/// Shared SQLite connection for the key/value store
#[derive(Clone)]
pub struct StoreConnection {
    location: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl StoreConnection {
    /// Open the store under the user's local data directory
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_store_path()?)
    }

    /// Open (or create) the store file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let location = path.as_ref().to_path_buf();
        if let Some(dir) = location.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create storage directory: {:?}", dir))?;
        }

        info!("Opening session store at: {:?}", location);
        let conn = Connection::open(&location)
            .with_context(|| format!("Failed to open session store: {:?}", location))?;
        Self::initialized(location, conn)
    }

    /// Store that lives only as long as the process
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory session store");
        let conn =
            Connection::open_in_memory().context("Failed to create in-memory session store")?;
        Self::initialized(PathBuf::from(IN_MEMORY), conn)
    }

    fn initialized(location: PathBuf, conn: Connection) -> Result<Self> {
        schema::initialize_schema(&conn)?;
        Ok(Self {
            location,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// `<data dir>/panelkit/session.db`
    pub fn default_store_path() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;
        Ok(base.join(STORE_DIRNAME).join(STORE_FILENAME))
    }

    /// File backing the store, `:memory:` for in-memory stores
    pub fn path(&self) -> &Path {
        &self.location
    }

    /// Run `f` against the connection on the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.blocking(move |conn| f(conn)).await
    }

    /// Run `f` inside a transaction; it commits only when `f` succeeds
    pub async fn transaction_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.blocking(move |conn| {
            let tx = conn.transaction().context("Failed to begin transaction")?;
            let value = f(&tx)?;
            tx.commit().context("Failed to commit transaction")?;
            Ok(value)
        })
        .await
    }

    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut conn = connection
                .lock()
                .map_err(|e| anyhow!("Session store lock poisoned: {}", e))?;
            f(&mut conn)
        })
        .await
        .context("Storage task panicked")?
    }
}
