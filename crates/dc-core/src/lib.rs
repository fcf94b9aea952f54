//! Daily-activity ledger core.
//!
//! A day is a small state machine: pick a quarter, log capped typed events,
//! then finalize once into a three-line close summary. On top of the stored
//! days sit two read-only diagnostics: a rolling 7-day rollup and a
//! ghost/presence gauge (observed finalize rate vs. a Monte Carlo projection).
//!
//! Zero I/O: persistence, config, and the intent surface live in dc-store
//! and dc-cli.

pub mod constants;
pub mod date;
pub mod ledger;
pub mod limiter;
pub mod presence;
pub mod rollup;
pub mod sim;
pub mod summary;
pub mod types;
pub mod wire;

pub use constants::{
    GAUGE_SLOTS, JOIN_SEP, MAX_EVENTS_PER_DAY, MAX_LINE_CHARS, MAX_PER_KIND, ROLLUP_TOP_K,
    ROLLUP_WINDOW, SENTINEL, SIM_DEFAULT_TRIALS, SIM_HORIZON_DAYS, SIM_MAX_TRIALS, SIM_MIN_TRIALS,
};
pub use date::{add_days, days_between, is_valid_date, now_unix_ms, today_utc};
pub use ledger::Outcome;
pub use limiter::TapGuard;
pub use presence::{PresenceStrategy, gauge, gauge_label, observed_presence};
pub use rollup::summarize_recent;
pub use sim::{SimModel, approx_poisson, expected_presence};
pub use summary::{clamp_line, counts_by_kind, summarize};
pub use types::{CloseSummary, DayRecord, Event, EventKind, Experiment, Quarter};
pub use wire::{WIRE_VERSION, WireStore, day_to_json, repair_day, repair_experiment, repair_start};
