//! Multi-day rollup: the most recent finalized days folded into one
//! aggregate recommendation.
//!
//! Token tally order is first-seen across the reverse-chronological window;
//! ties in frequency keep that order (stable sort). This is a documented
//! tie-break, not a guarantee across unrelated orderings.

use crate::constants::{JOIN_SEP, ROLLUP_TOP_K, SENTINEL};
use crate::types::{CloseSummary, DayRecord};

/// Aggregate the last `n` finalized records into a single close triple.
/// Empty window → all-sentinel.
pub fn summarize_recent(records: &[DayRecord], n: usize) -> CloseSummary {
    let mut recent: Vec<&DayRecord> = records.iter().filter(|d| d.finalized).collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(n);

    if recent.is_empty() {
        return CloseSummary::default();
    }

    let worked_top = top_tokens(recent.iter().map(|d| d.close.worked.as_str()));
    let hurt_top = top_tokens(recent.iter().map(|d| d.close.hurt.as_str()));

    // Mirrors the daily summarizer's precedence style: first match wins.
    let next = if hurt_top.iter().any(|t| t == "NO REST") {
        "Fix REST first."
    } else if hurt_top.iter().any(|t| t == "BAD") {
        "Remove BAD trigger path."
    } else if worked_top.is_empty() {
        "Make 1 deliberate log per day."
    } else {
        "Keep taps deliberate; do not spam."
    };

    CloseSummary {
        worked: join_or_sentinel(&worked_top),
        hurt: join_or_sentinel(&hurt_top),
        next: next.to_string(),
    }
}

/// Split close lines on the join separator, tally in first-seen order,
/// keep the top K non-sentinel tokens by descending frequency.
fn top_tokens<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut tally: Vec<(String, u32)> = Vec::new();
    for line in lines {
        for token in line.split('·') {
            let token = token.trim();
            if token.is_empty() || token == SENTINEL {
                continue;
            }
            match tally.iter_mut().find(|(t, _)| t == token) {
                Some((_, count)) => *count += 1,
                None => tally.push((token.to_string(), 1)),
            }
        }
    }
    // Stable sort keeps first-seen order on equal counts
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally.truncate(ROLLUP_TOP_K);
    tally.into_iter().map(|(t, _)| t).collect()
}

fn join_or_sentinel(tokens: &[String]) -> String {
    if tokens.is_empty() {
        SENTINEL.to_string()
    } else {
        tokens.join(JOIN_SEP)
    }
}
