//! Deterministic close summarizer: events → three short text lines.
//!
//! The "next" recommendation comes from a fixed priority chain evaluated
//! top-down; the first matching rule wins. That ordering is a contract,
//! it decides the single line the user sees at close.

use crate::constants::{JOIN_SEP, MAX_LINE_CHARS, SENTINEL};
use crate::types::{CloseSummary, Event, EventKind};

/// Per-kind event counts, indexed by `EventKind::index()`.
pub fn counts_by_kind(events: &[Event]) -> [u32; 6] {
    let mut counts = [0u32; 6];
    for event in events {
        counts[event.kind.index()] += 1;
    }
    counts
}

/// Clamp a close line to MAX_LINE_CHARS characters, marking truncation
/// with an ellipsis. Counts chars, not bytes.
pub fn clamp_line(s: &str) -> String {
    if s.chars().count() <= MAX_LINE_CHARS {
        return s.to_string();
    }
    let mut out: String = s.chars().take(MAX_LINE_CHARS - 3).collect();
    out.push('…');
    out
}

/// Pure and side-effect-free: equal event sequences yield identical output.
pub fn summarize(events: &[Event]) -> CloseSummary {
    let counts = counts_by_kind(events);
    let count = |kind: EventKind| counts[kind.index()];

    let worked: Vec<&str> = EventKind::POSITIVE
        .iter()
        .filter(|kind| count(**kind) > 0)
        .map(|kind| kind.as_str())
        .collect();

    let mut hurt: Vec<&str> = Vec::new();
    if count(EventKind::Bad) > 0 {
        hurt.push("BAD");
    }
    if count(EventKind::Rest) == 0 {
        hurt.push("NO REST");
    }
    if count(EventKind::Food) == 0 {
        hurt.push("NO FOOD LOG");
    }

    // Priority chain, first match wins. Do not reorder.
    let next = if count(EventKind::Rest) == 0 {
        "Protect REST (log it once)."
    } else if count(EventKind::Bad) > 0 {
        "Remove BAD trigger path; keep taps deliberate."
    } else if worked.is_empty() {
        "Log 1 real event (not spam)."
    } else {
        "Do the minimum that repeats worked domains."
    };

    CloseSummary {
        worked: clamp_line(&join_or_sentinel(&worked)),
        hurt: clamp_line(&join_or_sentinel(&hurt)),
        next: clamp_line(next),
    }
}

fn join_or_sentinel(tokens: &[&str]) -> String {
    if tokens.is_empty() {
        SENTINEL.to_string()
    } else {
        tokens.join(JOIN_SEP)
    }
}
