//! Day Ledger state machine: Open → Locked, one way.
//!
//! Every operation reports an [`Outcome`] instead of erroring: a locked
//! day or a hit cap is user feedback, not an exceptional condition.
//! Callers persist the record after an `Applied` outcome.

use crate::constants::{MAX_EVENTS_PER_DAY, MAX_PER_KIND};
use crate::summary::{counts_by_kind, summarize};
use crate::types::{DayRecord, Event, EventKind, Quarter};

/// What a ledger operation did, with the user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The record was mutated and should be persisted.
    Applied(String),
    /// Policy denial: well-formed but currently disallowed; no mutation.
    Denied(String),
    /// Harmless no-op (undo on empty, finalize on locked); no mutation.
    NoOp(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Outcome::Applied(m) | Outcome::Denied(m) | Outcome::NoOp(m) => m,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

impl DayRecord {
    /// Set the day's quarter. Locked days reject; the quarter itself is
    /// freely re-selectable while open.
    pub fn select_quarter(&mut self, quarter: Quarter) -> Outcome {
        if self.finalized {
            return Outcome::Denied("Locked.".to_string());
        }
        self.quarter = Some(quarter);
        Outcome::Applied(format!("{} selected.", quarter.as_str()))
    }

    /// The blocking reason for logging `kind` right now, or None.
    ///
    /// Check order matters for the reported reason: the per-kind cap is
    /// checked before the daily cap, so a kind that is itself exhausted
    /// reports its own cap even on an otherwise full day.
    pub fn deny_log(&self, kind: EventKind) -> Option<String> {
        if self.finalized {
            return Some("Locked.".to_string());
        }
        if self.quarter.is_none() {
            return Some("Select quarter first.".to_string());
        }
        let per_kind = counts_by_kind(&self.events)[kind.index()] as usize;
        if per_kind >= MAX_PER_KIND {
            return Some(format!("{} cap reached.", kind.as_str()));
        }
        if self.events.len() >= MAX_EVENTS_PER_DAY {
            return Some("Daily cap reached.".to_string());
        }
        None
    }

    /// Append an event, re-checking `deny_log` first.
    pub fn log_event(&mut self, kind: EventKind, now_ms: i64) -> Outcome {
        if let Some(reason) = self.deny_log(kind) {
            return Outcome::Denied(reason);
        }
        self.events.push(Event { kind, at_ms: now_ms });
        Outcome::Applied(format!("{} logged.", kind.as_str()))
    }

    /// Remove the most recently appended event (LIFO).
    pub fn undo(&mut self) -> Outcome {
        if self.finalized {
            return Outcome::Denied("Locked.".to_string());
        }
        match self.events.pop() {
            Some(event) => Outcome::Applied(format!("Undid {}.", event.kind.as_str())),
            None => Outcome::NoOp("Nothing to undo.".to_string()),
        }
    }

    /// One-way transition to Locked: computes the close summary over the
    /// current events and fixes it. Idempotent: a second call reports a
    /// no-op and changes nothing.
    pub fn finalize(&mut self) -> Outcome {
        if self.finalized {
            return Outcome::NoOp("Already finalized (idempotent).".to_string());
        }
        self.close = summarize(&self.events);
        self.finalized = true;
        Outcome::Applied("Finalized. Locked.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SENTINEL;

    fn open_day() -> DayRecord {
        let mut day = DayRecord::empty("2026-08-29");
        day.quarter = Some(Quarter::Q2);
        day
    }

    #[test]
    fn test_select_quarter() {
        let mut day = DayRecord::empty("2026-08-29");
        let outcome = day.select_quarter(Quarter::Q3);
        assert_eq!(outcome, Outcome::Applied("Q3 selected.".to_string()));
        assert_eq!(day.quarter, Some(Quarter::Q3));

        // Re-selection while open is fine
        assert!(day.select_quarter(Quarter::Q1).is_applied());
        assert_eq!(day.quarter, Some(Quarter::Q1));
    }

    #[test]
    fn test_select_quarter_locked() {
        let mut day = open_day();
        day.finalize();
        let outcome = day.select_quarter(Quarter::Q4);
        assert_eq!(outcome, Outcome::Denied("Locked.".to_string()));
        assert_eq!(day.quarter, Some(Quarter::Q2));
    }

    #[test]
    fn test_log_requires_quarter() {
        let mut day = DayRecord::empty("2026-08-29");
        let outcome = day.log_event(EventKind::Mind, 1);
        assert_eq!(
            outcome,
            Outcome::Denied("Select quarter first.".to_string())
        );
        assert!(day.events.is_empty());
    }

    #[test]
    fn test_log_appends_in_order() {
        let mut day = open_day();
        assert!(day.log_event(EventKind::Mind, 10).is_applied());
        assert!(day.log_event(EventKind::Body, 20).is_applied());
        assert_eq!(day.events.len(), 2);
        assert_eq!(day.events[0].kind, EventKind::Mind);
        assert_eq!(day.events[1].kind, EventKind::Body);
        assert_eq!(day.events[1].at_ms, 20);
    }

    #[test]
    fn test_per_kind_cap() {
        let mut day = open_day();
        for i in 0..MAX_PER_KIND {
            assert!(day.log_event(EventKind::Rest, i as i64).is_applied());
        }
        let outcome = day.log_event(EventKind::Rest, 99);
        assert_eq!(outcome, Outcome::Denied("REST cap reached.".to_string()));
        assert_eq!(day.events.len(), MAX_PER_KIND);
        // Other kinds still loggable
        assert!(day.log_event(EventKind::Mind, 100).is_applied());
    }

    #[test]
    fn test_daily_cap() {
        let mut day = open_day();
        let mut logged = 0;
        for kind in EventKind::ALL.iter().cycle() {
            if logged == MAX_EVENTS_PER_DAY {
                break;
            }
            assert!(day.log_event(*kind, logged as i64).is_applied());
            logged += 1;
        }
        // 24 = 6 kinds × 4 each; every kind is under its per-kind cap,
        // so the daily cap is the reported reason
        let outcome = day.log_event(EventKind::Mind, 99);
        assert_eq!(outcome, Outcome::Denied("Daily cap reached.".to_string()));
        assert_eq!(day.events.len(), MAX_EVENTS_PER_DAY);
    }

    #[test]
    fn test_exhausted_kind_reports_its_own_cap() {
        let mut day = open_day();
        for i in 0..MAX_PER_KIND {
            day.log_event(EventKind::Bad, i as i64);
        }
        for i in 0..MAX_PER_KIND {
            day.log_event(EventKind::Mind, i as i64);
        }
        // BAD is exhausted; day is not full
        assert_eq!(
            day.deny_log(EventKind::Bad),
            Some("BAD cap reached.".to_string())
        );
        assert_eq!(day.deny_log(EventKind::Deep), None);
    }

    #[test]
    fn test_locked_denies_log() {
        let mut day = open_day();
        day.finalize();
        assert_eq!(day.deny_log(EventKind::Mind), Some("Locked.".to_string()));
    }

    #[test]
    fn test_undo_lifo() {
        let mut day = open_day();
        day.log_event(EventKind::Mind, 1);
        day.log_event(EventKind::Body, 2);

        let outcome = day.undo();
        assert_eq!(outcome, Outcome::Applied("Undid BODY.".to_string()));
        assert_eq!(day.events.len(), 1);
        assert_eq!(day.events[0].kind, EventKind::Mind);

        assert!(day.undo().is_applied());
        assert_eq!(day.undo(), Outcome::NoOp("Nothing to undo.".to_string()));
        assert!(day.events.is_empty());
    }

    #[test]
    fn test_undo_locked() {
        let mut day = open_day();
        day.log_event(EventKind::Mind, 1);
        day.finalize();
        assert_eq!(day.undo(), Outcome::Denied("Locked.".to_string()));
        assert_eq!(day.events.len(), 1);
    }

    #[test]
    fn test_finalize_sets_close_and_locks() {
        let mut day = open_day();
        day.log_event(EventKind::Mind, 1);
        day.log_event(EventKind::Rest, 2);

        assert_eq!(day.close.worked, SENTINEL);
        let outcome = day.finalize();
        assert_eq!(outcome, Outcome::Applied("Finalized. Locked.".to_string()));
        assert!(day.finalized);
        assert_eq!(day.close.worked, "MIND · REST");
    }

    #[test]
    fn test_finalize_idempotent() {
        let mut day = open_day();
        day.log_event(EventKind::Mind, 1);
        day.finalize();
        let first_close = day.close.clone();

        let again = day.finalize();
        assert_eq!(
            again,
            Outcome::NoOp("Already finalized (idempotent).".to_string())
        );
        assert_eq!(day.close, first_close);
        assert_eq!(day.events.len(), 1);
    }

    #[test]
    fn test_finalize_empty_day_allowed() {
        // Finalizing with nothing logged is legal; the summary says so
        let mut day = DayRecord::empty("2026-08-29");
        assert!(day.finalize().is_applied());
        assert_eq!(day.close.worked, SENTINEL);
        assert_eq!(day.close.next, "Protect REST (log it once).");
    }
}
