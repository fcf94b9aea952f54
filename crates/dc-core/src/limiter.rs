//! Tap debouncing: blunts accidental rapid double-taps on a touch surface.
//! Not a security control. State is process-local liveness data, never
//! persisted, and lives in an explicit struct so instances under test do
//! not interfere.

use std::collections::HashMap;

use crate::constants::{GLOBAL_MIN_INTERVAL_MS, PER_ACTION_COOLDOWN_MS};

/// Rate limiter over action keys. A tap is allowed only when both the
/// global interval and the per-key cooldown have elapsed; both clocks
/// update on allow. Denials leave the clocks untouched.
#[derive(Debug, Default)]
pub struct TapGuard {
    min_interval_ms: u64,
    cooldown_ms: u64,
    last_any_ms: Option<u64>,
    last_by_key: HashMap<String, u64>,
}

impl TapGuard {
    pub fn new() -> Self {
        Self::with_thresholds(GLOBAL_MIN_INTERVAL_MS, PER_ACTION_COOLDOWN_MS)
    }

    pub fn with_thresholds(min_interval_ms: u64, cooldown_ms: u64) -> Self {
        Self {
            min_interval_ms,
            cooldown_ms,
            last_any_ms: None,
            last_by_key: HashMap::new(),
        }
    }

    /// Gate a tap at `now_ms`. Time is injected so the guard stays a pure
    /// function of timestamps.
    pub fn allow_at(&mut self, key: &str, now_ms: u64) -> bool {
        if let Some(last) = self.last_any_ms
            && now_ms.saturating_sub(last) < self.min_interval_ms
        {
            return false;
        }
        if let Some(&last) = self.last_by_key.get(key)
            && now_ms.saturating_sub(last) < self.cooldown_ms
        {
            return false;
        }
        self.last_any_ms = Some(now_ms);
        self.last_by_key.insert(key.to_string(), now_ms);
        true
    }
}
