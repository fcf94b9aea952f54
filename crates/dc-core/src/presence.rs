//! Ghost ↔ presence diagnostic: observed finalize rate over stored days,
//! rendered next to the simulator's expectation on a discrete gauge.

use crate::constants::{GAUGE_SLOTS, SIM_HORIZON_DAYS};
use crate::summary::counts_by_kind;
use crate::types::{DayRecord, EventKind};

/// How the observed score treats avoidance (BAD) events. The source
/// variants disagree on this, so both stay available; `Raw` is the default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PresenceStrategy {
    /// finalized / opened, nothing else.
    Raw,
    /// Shrinks the opened denominator by `factor` per BAD event across the
    /// scanned records, floored so the score stays in [0, 1].
    Penalized { factor: f64 },
}

pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Observed presence in [0, 1], or None when no day shows any open signal.
/// "Opened" means: any event, a quarter set, or finalized. Conservative;
/// ignores what was actually logged.
pub fn observed_presence(records: &[DayRecord], strategy: PresenceStrategy) -> Option<f64> {
    let mut opened = 0u32;
    let mut finalized = 0u32;
    let mut bad_total = 0u32;

    for day in records {
        if day.opened() {
            opened += 1;
        }
        if day.finalized {
            finalized += 1;
        }
        bad_total += counts_by_kind(&day.events)[EventKind::Bad.index()];
    }

    if opened == 0 {
        return None;
    }

    let denominator = match strategy {
        PresenceStrategy::Raw => opened as f64,
        PresenceStrategy::Penalized { factor } => (opened as f64 - factor * bad_total as f64)
            .max(finalized as f64)
            .max(1.0),
    };

    Some(clamp01(finalized as f64 / denominator))
}

/// Render both scores on one fixed-width gauge with a legend line.
/// Observed is `▲`, simulated is `◇`; when both land on the same slot a
/// combined `◆` is drawn so neither marker is hidden.
pub fn gauge(observed: Option<f64>, simulated: Option<f64>) -> String {
    let slot = |score: f64| (score * GAUGE_SLOTS as f64).round() as usize;
    let obs_pos = observed.map(slot);
    let sim_pos = simulated.map(slot);

    let mut line = String::from("Ghost You ");
    for i in 0..=GAUGE_SLOTS {
        let mut ch = '—';
        if obs_pos == Some(i) {
            ch = '▲';
        }
        if sim_pos == Some(i) {
            ch = if ch == '▲' { '◆' } else { '◇' };
        }
        line.push(ch);
    }
    line.push_str(" Presence You");

    let obs_legend = match observed {
        Some(score) => format!("▲ you: {:.0}% presence", score * 100.0),
        None => "▲ you: no data yet".to_string(),
    };
    let sim_legend = match simulated {
        Some(score) => format!("◇ mc({SIM_HORIZON_DAYS}d): {:.0}% expected", score * 100.0),
        None => "◇ mc: not run".to_string(),
    };

    format!("{line}\n{obs_legend} | {sim_legend}")
}

/// One-line headline for the diagnostic, mirroring the gauge legend.
pub fn gauge_label(observed: Option<f64>, simulated: Option<f64>) -> String {
    match (observed, simulated) {
        (None, None) => "No data yet.".to_string(),
        (Some(o), None) => format!("You so far: {:.0}% presence", o * 100.0),
        (None, Some(s)) => format!(
            "Monte Carlo expected: {:.0}% presence",
            s * 100.0
        ),
        (Some(o), Some(s)) => format!(
            "You: {:.0}% | MC({SIM_HORIZON_DAYS}d): {:.0}%",
            o * 100.0,
            s * 100.0
        ),
    }
}
