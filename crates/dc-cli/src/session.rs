//! Per-invocation context: the opened store, loaded config, the tap
//! limiter and the resolved working date.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use dc_core::{DayRecord, TapGuard, is_valid_date, now_unix_ms, today_utc};
use dc_store::{Config, Store, default_base_dir};

/// Data directory: `DC_DATA_DIR` override, else `~/.dayclose`.
pub fn base_dir() -> PathBuf {
    std::env::var("DC_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(default_base_dir)
}

pub struct Session {
    store: Store,
    guard: TapGuard,
    config: Config,
    date: String,
}

impl Session {
    pub fn open(date_flag: Option<&str>) -> Result<Self> {
        let base = base_dir();
        let config = Config::load(&base);
        let store = Store::open_default(Some(&base)).context("failed to open ledger store")?;
        let date = resolve_date(date_flag, &store)?;
        tracing::debug!("working date resolved to {date}");
        Ok(Self {
            store,
            guard: TapGuard::new(),
            config,
            date,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn day(&self) -> Result<DayRecord> {
        self.store
            .load_day(&self.date)
            .with_context(|| format!("failed to load day {}", self.date))
    }

    pub fn save(&self, day: &DayRecord) -> Result<()> {
        self.store
            .save_day(day)
            .with_context(|| format!("failed to save day {}", day.date))
    }

    /// Gate one user intent through the tap limiter. A denied tap is
    /// dropped silently, like the double-tap debounce on the original
    /// touch surface.
    pub fn tap(&mut self, key: &str) -> bool {
        let allowed = self.guard.allow_at(key, now_unix_ms());
        if !allowed {
            tracing::debug!("tap dropped: {key}");
        }
        allowed
    }
}

/// Explicit `--date` wins; otherwise a stored start date that is still in
/// the future (staged by `reset --for-tomorrow`) pre-dates the session;
/// otherwise today.
fn resolve_date(flag: Option<&str>, store: &Store) -> Result<String> {
    if let Some(date) = flag {
        if !is_valid_date(date) {
            bail!("invalid date: {date} (expected YYYY-MM-DD)");
        }
        return Ok(date.to_string());
    }
    let today = today_utc();
    if let Some(start) = store.start_date()?
        && start.as_str() > today.as_str()
    {
        return Ok(start);
    }
    Ok(today)
}
