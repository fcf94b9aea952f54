use serde::{Deserialize, Serialize};

use crate::constants::SENTINEL;
use crate::date;

/// Typed daily event. The order is the display order and the fixed
/// iteration order for the summarizer's "worked" line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Mind,
    Deep,
    Body,
    Food,
    Rest,
    Bad,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Mind,
        EventKind::Deep,
        EventKind::Body,
        EventKind::Food,
        EventKind::Rest,
        EventKind::Bad,
    ];

    /// Kinds that count toward "what worked", in emission order.
    pub const POSITIVE: [EventKind; 5] = [
        EventKind::Mind,
        EventKind::Deep,
        EventKind::Body,
        EventKind::Food,
        EventKind::Rest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Mind => "MIND",
            EventKind::Deep => "DEEP",
            EventKind::Body => "BODY",
            EventKind::Food => "FOOD",
            EventKind::Rest => "REST",
            EventKind::Bad => "BAD",
        }
    }

    /// Parse a wire string; unknown values become None so repair can drop them.
    pub fn from_str_lossy(s: &str) -> Option<EventKind> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MIND" => Some(EventKind::Mind),
            "DEEP" => Some(EventKind::Deep),
            "BODY" => Some(EventKind::Body),
            "FOOD" => Some(EventKind::Food),
            "REST" => Some(EventKind::Rest),
            "BAD" => Some(EventKind::Bad),
            _ => None,
        }
    }

    /// Stable index into per-kind count arrays.
    pub fn index(&self) -> usize {
        match self {
            EventKind::Mind => 0,
            EventKind::Deep => 1,
            EventKind::Body => 2,
            EventKind::Food => 3,
            EventKind::Rest => 4,
            EventKind::Bad => 5,
        }
    }
}

/// The day's single-choice dimension tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }

    pub fn from_str_lossy(s: &str) -> Option<Quarter> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Q1" => Some(Quarter::Q1),
            "Q2" => Some(Quarter::Q2),
            "Q3" => Some(Quarter::Q3),
            "Q4" => Some(Quarter::Q4),
            _ => None,
        }
    }
}

/// One logged tap. Insertion order is significant: undo pops the last,
/// the rollup reads kind frequencies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub at_ms: i64,
}

/// The three derived close lines. Fixed at finalize time, sentinel before.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseSummary {
    pub worked: String,
    pub hurt: String,
    pub next: String,
}

impl Default for CloseSummary {
    fn default() -> Self {
        Self {
            worked: SENTINEL.to_string(),
            hurt: SENTINEL.to_string(),
            next: SENTINEL.to_string(),
        }
    }
}

/// Persisted state for one calendar date. Created lazily with empty
/// defaults on first read; never deleted except by a namespace reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: String,
    pub quarter: Option<Quarter>,
    pub events: Vec<Event>,
    pub finalized: bool,
    pub close: CloseSummary,
}

impl DayRecord {
    pub fn empty(date: &str) -> Self {
        Self {
            date: date.to_string(),
            quarter: None,
            events: Vec::new(),
            finalized: false,
            close: CloseSummary::default(),
        }
    }

    /// Any signal that the day was touched at all.
    pub fn opened(&self) -> bool {
        self.finalized || self.quarter.is_some() || !self.events.is_empty()
    }
}

/// Running experiment tag: a named day-count label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub name: String,
    pub start: String,
}

impl Experiment {
    /// 1-based day count relative to `current`; None before the start date
    /// or when either date is malformed.
    pub fn day_count(&self, current: &str) -> Option<i64> {
        let days = date::days_between(&self.start, current)? + 1;
        if days >= 1 { Some(days) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_str_lossy(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_kind_lossy_unknown() {
        assert_eq!(EventKind::from_str_lossy("NAP"), None);
        assert_eq!(EventKind::from_str_lossy(""), None);
    }

    #[test]
    fn test_kind_lossy_case_and_whitespace() {
        assert_eq!(EventKind::from_str_lossy(" rest "), Some(EventKind::Rest));
    }

    #[test]
    fn test_kind_index_matches_all_order() {
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_quarter_roundtrip() {
        for q in Quarter::ALL {
            assert_eq!(Quarter::from_str_lossy(q.as_str()), Some(q));
        }
        assert_eq!(Quarter::from_str_lossy("Q5"), None);
    }

    #[test]
    fn test_empty_day_defaults() {
        let day = DayRecord::empty("2026-08-29");
        assert_eq!(day.date, "2026-08-29");
        assert!(day.quarter.is_none());
        assert!(day.events.is_empty());
        assert!(!day.finalized);
        assert_eq!(day.close.worked, SENTINEL);
        assert!(!day.opened());
    }

    #[test]
    fn test_opened_signals() {
        let mut day = DayRecord::empty("2026-08-29");
        day.quarter = Some(Quarter::Q1);
        assert!(day.opened());

        let mut day = DayRecord::empty("2026-08-29");
        day.events.push(Event {
            kind: EventKind::Mind,
            at_ms: 1,
        });
        assert!(day.opened());

        let mut day = DayRecord::empty("2026-08-29");
        day.finalized = true;
        assert!(day.opened());
    }

    #[test]
    fn test_experiment_day_count() {
        let exp = Experiment {
            name: "DETOX".to_string(),
            start: "2026-08-01".to_string(),
        };
        assert_eq!(exp.day_count("2026-08-01"), Some(1));
        assert_eq!(exp.day_count("2026-08-03"), Some(3));
        // Before start → absent, not zero or negative
        assert_eq!(exp.day_count("2026-07-31"), None);
        assert_eq!(exp.day_count("not-a-date"), None);
    }
}
