use std::fmt;

/// Failures the persistence layer can actually surface. Policy denials
/// and malformed stored values never land here: reads repair in place
/// and the ledger reports outcomes. What remains is the database itself,
/// the wire codec, and the filesystem around blob export/import.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite failure on the ledger database.
    Sqlite(rusqlite::Error),
    /// Encoding or decoding a wire value failed.
    Codec(String),
    /// Filesystem failure around the data directory or a blob file.
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "sqlite error: {e}"),
            StoreError::Codec(msg) => write!(f, "wire codec error: {msg}"),
            StoreError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
