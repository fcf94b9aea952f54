//! Cross-module behavior tests: ledger → summarizer → rollup → diagnostic,
//! the way the intent surface drives them.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use dc_core::{
    DayRecord, EventKind, Outcome, PresenceStrategy, Quarter, SimModel, expected_presence,
    gauge, observed_presence, summarize, summarize_recent,
};
use dc_core::{MAX_EVENTS_PER_DAY, MAX_PER_KIND, SENTINEL};

fn open_day(date: &str) -> DayRecord {
    let mut day = DayRecord::empty(date);
    day.quarter = Some(Quarter::Q1);
    day
}

#[test]
fn full_day_lifecycle() {
    let mut day = DayRecord::empty("2026-08-29");

    // Can't log before a quarter is chosen
    assert!(matches!(
        day.log_event(EventKind::Mind, 1),
        Outcome::Denied(_)
    ));

    day.select_quarter(Quarter::Q2);
    day.log_event(EventKind::Mind, 1);
    day.log_event(EventKind::Rest, 2);
    day.log_event(EventKind::Bad, 3);
    day.undo(); // take the BAD back

    assert!(day.finalize().is_applied());
    assert_eq!(day.close.worked, "MIND · REST");
    assert_eq!(day.close.hurt, "NO FOOD LOG");
    assert_eq!(day.close.next, "Do the minimum that repeats worked domains.");

    // Locked: nothing mutates anymore
    let close_before = day.close.clone();
    assert!(matches!(day.undo(), Outcome::Denied(_)));
    assert!(matches!(day.select_quarter(Quarter::Q4), Outcome::Denied(_)));
    assert!(matches!(day.finalize(), Outcome::NoOp(_)));
    assert_eq!(day.close, close_before);
}

#[test]
fn finalize_twice_equals_finalize_once() {
    let mut once = open_day("2026-08-29");
    once.log_event(EventKind::Body, 1);
    once.finalize();

    let mut twice = open_day("2026-08-29");
    twice.log_event(EventKind::Body, 1);
    twice.finalize();
    twice.finalize();

    assert_eq!(once, twice);
}

#[test]
fn undo_k_plus_one_times() {
    let mut day = open_day("2026-08-29");
    let k = 5;
    for i in 0..k {
        day.log_event(EventKind::Mind, i);
    }
    for _ in 0..k {
        assert!(day.undo().is_applied());
    }
    assert_eq!(day.undo(), Outcome::NoOp("Nothing to undo.".to_string()));
    assert!(day.events.is_empty());
}

#[test]
fn per_kind_reason_wins_when_both_caps_hit() {
    // Fill the day completely with four kinds at their per-kind cap:
    // both the daily cap and MIND's own cap now block a MIND tap, and
    // the reported reason must be MIND's cap.
    let mut day = open_day("2026-08-29");
    for kind in [
        EventKind::Mind,
        EventKind::Deep,
        EventKind::Body,
        EventKind::Food,
    ] {
        for i in 0..MAX_PER_KIND {
            assert!(day.log_event(kind, i as i64).is_applied());
        }
    }
    assert_eq!(day.events.len(), MAX_EVENTS_PER_DAY);

    assert_eq!(day.deny_log(EventKind::Mind), Some("MIND cap reached.".to_string()));
    assert_eq!(day.deny_log(EventKind::Rest), Some("Daily cap reached.".to_string()));
}

#[test]
fn summarizer_is_pure_across_clones() {
    let mut day = open_day("2026-08-29");
    day.log_event(EventKind::Deep, 1);
    day.log_event(EventKind::Rest, 2);
    let a = summarize(&day.events);
    let b = summarize(&day.events.clone());
    assert_eq!(a, b);
}

#[test]
fn rollup_example_scenario() {
    // worked lines "MIND · REST", "MIND", "BODY" → top-2 = MIND, REST
    let mk = |date: &str, worked: &str| {
        let mut day = DayRecord::empty(date);
        day.finalized = true;
        day.close.worked = worked.to_string();
        day.close.hurt = SENTINEL.to_string();
        day
    };
    let days = vec![
        mk("2026-08-27", "BODY"),
        mk("2026-08-29", "MIND · REST"),
        mk("2026-08-28", "MIND"),
    ];
    let rollup = summarize_recent(&days, 7);
    let tokens: Vec<&str> = rollup.worked.split(" · ").collect();
    assert_eq!(&tokens[..2], &["MIND", "REST"]);
}

#[test]
fn diagnostic_over_fixture_records() {
    let mut finalized = open_day("2026-08-27");
    finalized.log_event(EventKind::Mind, 1);
    finalized.finalize();

    let opened = open_day("2026-08-28"); // quarter only
    let untouched = DayRecord::empty("2026-08-29");

    let records = vec![finalized, opened, untouched];
    let observed = observed_presence(&records, PresenceStrategy::Raw).unwrap();
    assert!((observed - 0.5).abs() < 1e-12);

    let mut rng = SmallRng::seed_from_u64(99);
    let simulated = expected_presence(&SimModel::default(), 1_000, &mut rng);
    assert!(simulated.is_some());

    let text = gauge(Some(observed), simulated);
    assert!(text.contains("50% presence"));
    assert!(text.contains("expected"));
}

proptest! {
    #[test]
    fn caps_hold_for_any_tap_sequence(kinds in prop::collection::vec(0usize..6, 0..200)) {
        let mut day = open_day("2026-08-29");
        for (i, k) in kinds.iter().enumerate() {
            let kind = EventKind::ALL[*k];
            day.log_event(kind, i as i64);

            prop_assert!(day.events.len() <= MAX_EVENTS_PER_DAY);
            let mut counts = [0usize; 6];
            for e in &day.events {
                counts[e.kind.index()] += 1;
            }
            prop_assert!(counts.iter().all(|c| *c <= MAX_PER_KIND));
        }
    }

    #[test]
    fn undo_removes_exactly_the_last(kinds in prop::collection::vec(0usize..6, 1..20)) {
        let mut day = open_day("2026-08-29");
        for (i, k) in kinds.iter().enumerate() {
            day.log_event(EventKind::ALL[*k], i as i64);
        }
        let before = day.events.clone();
        if day.undo().is_applied() {
            prop_assert_eq!(&day.events[..], &before[..before.len() - 1]);
        } else {
            prop_assert!(before.is_empty());
        }
    }
}
