//! Store backends: SQLite (persistent) and in-memory (session only).

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

use super::traits::{decode_snapshot, encode_snapshot, CharacterStore, SNAPSHOT_KEY};
use crate::api::Character;

/// Store that keeps the snapshot text in memory.
///
/// Used when persistence is disabled and as the fake in tests. It stores the
/// serialized form so reads go through the same decode path as SQLite.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  slot: Mutex<Option<String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start with raw snapshot text, valid or not.
  #[cfg(test)]
  pub fn with_raw(raw: &str) -> Self {
    Self {
      slot: Mutex::new(Some(raw.to_string())),
    }
  }

  /// Start with an encoded snapshot of `records`.
  #[cfg(test)]
  pub fn with_records(records: &[Character]) -> Self {
    let storage = Self::new();
    storage
      .write_all(records)
      .expect("encoding test records should not fail");
    storage
  }
}

impl CharacterStore for MemoryStorage {
  fn read_all(&self) -> Option<Vec<Character>> {
    let slot = match self.slot.lock() {
      Ok(slot) => slot,
      Err(e) => {
        warn!(error = %e, "memory cache lock poisoned");
        return None;
      }
    };
    slot.as_deref().and_then(decode_snapshot)
  }

  fn write_all(&self, records: &[Character]) -> Result<()> {
    let raw = encode_snapshot(records)?;
    let mut slot = self
      .slot
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    *slot = Some(raw);
    Ok(())
  }
}

/// SQLite-based store: one key/value row holding the snapshot text.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

/// Schema for the snapshot table.
const SNAPSHOT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS snapshots (
    key TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    written_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl SqliteStorage {
  /// Open (or create) the store at `path`, or at the default location.
  pub fn open(path: Option<&Path>) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    Self::from_connection(conn)
  }

  /// Open a private in-memory database.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self> {
    let conn =
      Connection::open_in_memory().map_err(|e| eyre!("Failed to open in-memory cache: {}", e))?;
    Self::from_connection(conn)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(SNAPSHOT_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("springfield").join("cache.db"))
  }

  fn read_raw(&self) -> Result<Option<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .query_row(
        "SELECT data FROM snapshots WHERE key = ?",
        params![SNAPSHOT_KEY],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read cached snapshot: {}", e))
  }

  /// Store raw text under the snapshot key, bypassing encoding.
  #[cfg(test)]
  fn write_raw(&self, raw: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    conn.execute(
      "INSERT OR REPLACE INTO snapshots (key, data) VALUES (?, ?)",
      params![SNAPSHOT_KEY, raw],
    )?;
    Ok(())
  }
}

impl CharacterStore for SqliteStorage {
  fn read_all(&self) -> Option<Vec<Character>> {
    match self.read_raw() {
      Ok(raw) => raw.as_deref().and_then(decode_snapshot),
      Err(e) => {
        warn!(error = %e, "cache read failed, treating it as absent");
        None
      }
    }
  }

  fn write_all(&self, records: &[Character]) -> Result<()> {
    let raw = encode_snapshot(records)?;
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO snapshots (key, data, written_at)
         VALUES (?, ?, datetime('now'))",
        params![SNAPSHOT_KEY, raw],
      )
      .map_err(|e| eyre!("Failed to store snapshot: {}", e))?;

    Ok(())
  }
}
