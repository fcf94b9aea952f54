use std::path::{Path, PathBuf};
use std::{env, fs};

use rusqlite::{Connection, OptionalExtension, params};

use dc_core::{DayRecord, Experiment, wire};

use crate::error::{Result, StoreError};
use crate::schema::{self, DAY_PREFIX, KEY_EXPERIMENT, KEY_START};

/// Default base directory for all dayclose storage.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".dayclose")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Namespaced key-value store over SQLite: one `day.<YYYY-MM-DD>` key per
/// date plus the `exp` and `start` singletons. Every read runs the wire
/// repair path, so a malformed value degrades to defaults instead of
/// failing the read.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Open `ledger.db` under `base_dir` (or the default base directory),
    /// creating directories as needed.
    pub fn open_default(base_dir: Option<&Path>) -> Result<Self> {
        let base = base_dir.map(PathBuf::from).unwrap_or_else(default_base_dir);
        fs::create_dir_all(&base)
            .map_err(|e| StoreError::Io(format!("failed to create {}: {e}", base.display())))?;
        Self::open(&base.join("ledger.db"))
    }

    // --- Raw key-value layer ---

    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM records WHERE key = ?1")?;
        let value = stmt.query_row([key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO records (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM records WHERE key = ?1", [key])?;
        Ok(())
    }

    fn day_key(date: &str) -> String {
        format!("{DAY_PREFIX}{date}")
    }

    // --- Day records ---

    /// Load the record for `date`, creating the lazy empty default when the
    /// key is absent. Malformed stored values are repaired, never rejected.
    pub fn load_day(&self, date: &str) -> Result<DayRecord> {
        match self.get(&Self::day_key(date))? {
            Some(raw) => Ok(wire::repair_day(date, &raw)),
            None => Ok(DayRecord::empty(date)),
        }
    }

    pub fn save_day(&self, day: &DayRecord) -> Result<()> {
        let json = wire::day_to_json(day)
            .map_err(|e| StoreError::Codec(format!("day serialization failed: {e}")))?;
        self.put(&Self::day_key(&day.date), &json)
    }

    /// Full scan of all day records, repaired. O(total stored days);
    /// the store is bounded by real elapsed days.
    pub fn load_days(&self) -> Result<Vec<DayRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM records WHERE key LIKE ?1 ORDER BY key")?;

        let rows: Vec<(String, String)> = stmt
            .query_map([format!("{DAY_PREFIX}%")], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<_, _>>()?;

        Ok(rows
            .into_iter()
            .map(|(key, raw)| {
                let date = key.trim_start_matches(DAY_PREFIX).to_string();
                wire::repair_day(&date, &raw)
            })
            .collect())
    }

    // --- Singletons ---

    pub fn experiment(&self) -> Result<Option<Experiment>> {
        Ok(self
            .get(KEY_EXPERIMENT)?
            .and_then(|raw| wire::repair_experiment(&raw)))
    }

    pub fn set_experiment(&self, exp: &Experiment) -> Result<()> {
        let json = wire::experiment_to_json(exp)
            .map_err(|e| StoreError::Codec(format!("experiment serialization failed: {e}")))?;
        self.put(KEY_EXPERIMENT, &json)
    }

    pub fn clear_experiment(&self) -> Result<()> {
        self.delete(KEY_EXPERIMENT)
    }

    pub fn start_date(&self) -> Result<Option<String>> {
        Ok(self.get(KEY_START)?.and_then(|raw| wire::repair_start(&raw)))
    }

    pub fn set_start_date(&self, date: &str) -> Result<()> {
        let json = wire::start_to_json(date)
            .map_err(|e| StoreError::Codec(format!("start serialization failed: {e}")))?;
        self.put(KEY_START, &json)
    }

    // --- Namespace reset ---

    /// Delete every key in the namespace, one at a time, not assumed
    /// atomic across keys, but no record stays reachable afterwards.
    /// Returns the number of keys removed.
    pub fn reset_namespace(&self) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM records WHERE key LIKE ?1 OR key IN (?2, ?3)")?;
        let keys: Vec<String> = stmt
            .query_map(
                params![format!("{DAY_PREFIX}%"), KEY_EXPERIMENT, KEY_START],
                |row| row.get(0),
            )?
            .collect::<std::result::Result<_, _>>()?;

        for key in &keys {
            self.delete(key)?;
        }
        tracing::info!("namespace reset removed {} keys", keys.len());
        Ok(keys.len())
    }
}
