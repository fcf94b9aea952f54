/// Minimum interval between any two allowed taps, in milliseconds.
pub const GLOBAL_MIN_INTERVAL_MS: u64 = 220;

/// Cooldown between allowed taps of the same action key, in milliseconds.
pub const PER_ACTION_COOLDOWN_MS: u64 = 360;

/// Hard cap on events stored for a single day.
pub const MAX_EVENTS_PER_DAY: usize = 24;

/// Hard cap on events of any one kind per day.
pub const MAX_PER_KIND: usize = 6;

/// Maximum characters in a close line; longer lines truncate to 77 + `…`.
pub const MAX_LINE_CHARS: usize = 80;

/// No-data marker for close fields and gauge legends.
pub const SENTINEL: &str = "—";

/// Separator used when joining summary tokens into a close line.
pub const JOIN_SEP: &str = " · ";

/// How many recent finalized days the rollup window covers.
pub const ROLLUP_WINDOW: usize = 7;

/// How many top tokens the rollup keeps per field.
pub const ROLLUP_TOP_K: usize = 4;

/// Discrete gauge width: marker positions run 0..=GAUGE_SLOTS.
pub const GAUGE_SLOTS: usize = 20;

/// Simulated horizon for the Monte Carlo presence projection.
pub const SIM_HORIZON_DAYS: usize = 90;

/// Trial-count clamp for the simulator. Bounds worst-case latency on a
/// single thread; there is no cancellation or partial result.
pub const SIM_MIN_TRIALS: u32 = 1_000;
pub const SIM_MAX_TRIALS: u32 = 50_000;

/// Default trial count when the caller does not pass one.
pub const SIM_DEFAULT_TRIALS: u32 = 10_000;
