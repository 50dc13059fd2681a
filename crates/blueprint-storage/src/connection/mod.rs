//! Connection management: write-serialized + read-pooled.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;

use blueprint_core::config::StorageConfig;
use blueprint_core::errors::BlueprintResult;

use self::pool::ReadPool;
use self::pragmas::apply_pragmas;
use crate::{migrations, to_storage_err};

/// Manages the single write connection and the read connection pool.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    /// `None` for in-memory databases: separate in-memory connections are
    /// isolated databases, so reads go through the writer.
    readers: Option<ReadPool>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open the database described by `config`, apply pragmas, run migrations.
    pub fn open(config: &StorageConfig) -> BlueprintResult<Self> {
        Self::open_with(
            Path::new(&config.db_path),
            config.busy_timeout_ms,
            config.read_pool_size,
        )
    }

    /// Open a database at the given path with default settings.
    pub fn open_path(path: &Path) -> BlueprintResult<Self> {
        let defaults = StorageConfig::default();
        Self::open_with(path, defaults.busy_timeout_ms, defaults.read_pool_size)
    }

    fn open_with(path: &Path, busy_timeout_ms: u32, read_pool_size: usize) -> BlueprintResult<Self> {
        let writer = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&writer, busy_timeout_ms)?;
        migrations::run_migrations(&writer)?;

        // Readers open after migrations so they see the full schema.
        let readers = ReadPool::open(path, read_pool_size, busy_timeout_ms)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> BlueprintResult<Self> {
        let writer = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&writer, StorageConfig::default().busy_timeout_ms)?;
        migrations::run_migrations(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    /// Execute a write operation with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> BlueprintResult<T>
    where
        F: FnOnce(&Connection) -> BlueprintResult<T>,
    {
        let guard = self
            .writer
            .lock()
            .map_err(|_| to_storage_err("write lock poisoned"))?;
        f(&guard)
    }

    /// Execute a read operation on the best available connection.
    /// File-backed: uses the read pool (no writer contention).
    /// In-memory: uses the writer.
    pub fn with_reader<F, T>(&self, f: F) -> BlueprintResult<T>
    where
        F: FnOnce(&Connection) -> BlueprintResult<T>,
    {
        match &self.readers {
            Some(readers) => readers.with_conn(f),
            None => self.with_writer(f),
        }
    }

    /// Get the database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
