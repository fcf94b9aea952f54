//! JSON wire format and repair-on-read.
//!
//! The persisted shape keeps the original app's field names (`iso`, `t`,
//! `ts`, `close.tomorrow`); the v1 → v2 shape change (`tomorrow` → `next`,
//! bare start strings → objects) is absorbed with serde aliases and a
//! fallback chain rather than ad hoc patching. Repair is total and
//! field-grained: a wrong-typed field degrades to its own default without
//! touching its neighbors, and a read never fails.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::{MAX_EVENTS_PER_DAY, SENTINEL};
use crate::date;
use crate::summary::clamp_line;
use crate::types::{CloseSummary, DayRecord, Event, EventKind, Experiment, Quarter};

pub const WIRE_VERSION: &str = "2";

// --- Wire shapes ---

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct WireDay {
    #[serde(default, deserialize_with = "lenient_string")]
    pub iso: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub quarter: Option<String>,
    #[serde(default, deserialize_with = "lenient_events")]
    pub events: Vec<WireEvent>,
    #[serde(default, deserialize_with = "truthy")]
    pub finalized: bool,
    #[serde(default, deserialize_with = "lenient_close")]
    pub close: WireClose,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct WireEvent {
    #[serde(default)]
    pub t: String,
    #[serde(default)]
    pub ts: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct WireClose {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub worked: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub hurt: Option<String>,
    /// v1 name; v2 exports also land here via the alias.
    #[serde(default, alias = "next", deserialize_with = "lenient_opt_string")]
    pub tomorrow: Option<String>,
}

// --- Lenient field decoding: each wrong-typed field degrades alone ---

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Truthiness the stored blobs were written against: false, 0, "" and
/// null mean open; any other value means finalized.
fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Non-array events reset to empty; elements that are not objects or
/// carry a non-string `t` are dropped. Kind and timestamp validation
/// happens later in `repair_wire_day`.
fn lenient_events<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<WireEvent>, D::Error> {
    let Value::Array(items) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let t = obj.get("t")?.as_str()?.to_string();
            let ts = obj.get("ts").and_then(Value::as_f64);
            Some(WireEvent { t, ts })
        })
        .collect())
}

fn lenient_close<'de, D: Deserializer<'de>>(d: D) -> Result<WireClose, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug)]
pub struct WireExperiment {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "startIso")]
    pub start: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct WireStart {
    #[serde(default, alias = "startIso")]
    pub start: String,
}

/// Full-store blob for import/export.
#[derive(Serialize, Deserialize, Debug)]
pub struct WireStore {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub days: Vec<WireDay>,
    #[serde(default)]
    pub experiment: Option<WireExperiment>,
    #[serde(default, rename = "startDate", alias = "startIso")]
    pub start_date: Option<String>,
}

// --- Repair: wire → domain, total ---

/// Parse a persisted day value. Only unparsable JSON or a date mismatch
/// yields the lazy empty record; any other damage stays localized to the
/// field carrying it. Availability over strictness.
pub fn repair_day(date: &str, raw: &str) -> DayRecord {
    match serde_json::from_str::<WireDay>(raw) {
        Ok(wire) => repair_wire_day(date, wire),
        Err(_) => DayRecord::empty(date),
    }
}

pub fn repair_wire_day(date: &str, wire: WireDay) -> DayRecord {
    if wire.iso != date {
        return DayRecord::empty(date);
    }

    let quarter = wire
        .quarter
        .as_deref()
        .and_then(Quarter::from_str_lossy);

    let mut events: Vec<Event> = wire
        .events
        .into_iter()
        .filter_map(|e| {
            let kind = EventKind::from_str_lossy(&e.t)?;
            let ts = e.ts.filter(|ts| ts.is_finite())?;
            Some(Event {
                kind,
                at_ms: ts as i64,
            })
        })
        .collect();
    events.truncate(MAX_EVENTS_PER_DAY);

    let field = |v: Option<String>| clamp_line(v.as_deref().unwrap_or(SENTINEL));

    DayRecord {
        date: date.to_string(),
        quarter,
        events,
        finalized: wire.finalized,
        close: CloseSummary {
            worked: field(wire.close.worked),
            hurt: field(wire.close.hurt),
            next: field(wire.close.tomorrow),
        },
    }
}

/// Repair the experiment singleton: blank names or malformed start dates
/// mean the tag is absent, not broken.
pub fn repair_experiment(raw: &str) -> Option<Experiment> {
    let wire: WireExperiment = serde_json::from_str(raw).ok()?;
    let name = wire.name.trim();
    if name.is_empty() || !date::is_valid_date(&wire.start) {
        return None;
    }
    Some(Experiment {
        name: name.to_string(),
        start: wire.start,
    })
}

/// Repair the explicit start-date singleton. Accepts the v2 object shape,
/// a bare JSON string, or a raw date (v1 stored `{"startIso": ...}`).
pub fn repair_start(raw: &str) -> Option<String> {
    let candidate = if let Ok(wire) = serde_json::from_str::<WireStart>(raw) {
        wire.start
    } else if let Ok(s) = serde_json::from_str::<String>(raw) {
        s
    } else {
        raw.trim().to_string()
    };

    if date::is_valid_date(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

// --- Domain → wire ---

pub fn wire_day(day: &DayRecord) -> WireDay {
    WireDay {
        iso: day.date.clone(),
        quarter: day.quarter.map(|q| q.as_str().to_string()),
        events: day
            .events
            .iter()
            .map(|e| WireEvent {
                t: e.kind.as_str().to_string(),
                ts: Some(e.at_ms as f64),
            })
            .collect(),
        finalized: day.finalized,
        close: WireClose {
            worked: Some(day.close.worked.clone()),
            hurt: Some(day.close.hurt.clone()),
            tomorrow: Some(day.close.next.clone()),
        },
    }
}

pub fn day_to_json(day: &DayRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(&wire_day(day))
}

pub fn experiment_to_json(exp: &Experiment) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireExperiment {
        name: exp.name.clone(),
        start: exp.start.clone(),
    })
}

pub fn start_to_json(date: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireStart {
        start: date.to_string(),
    })
}

impl WireStore {
    pub fn from_parts(
        days: &[DayRecord],
        experiment: Option<&Experiment>,
        start_date: Option<&str>,
    ) -> Self {
        Self {
            version: WIRE_VERSION.to_string(),
            days: days.iter().map(wire_day).collect(),
            experiment: experiment.map(|e| WireExperiment {
                name: e.name.clone(),
                start: e.start.clone(),
            }),
            start_date: start_date.map(str::to_string),
        }
    }

    /// Decode an imported blob, re-validating every day through the same
    /// repair path as an ordinary load. Days with an invalid date key are
    /// dropped; imported data is never trusted structurally.
    pub fn into_parts(self) -> (Vec<DayRecord>, Option<Experiment>, Option<String>) {
        let days: Vec<DayRecord> = self
            .days
            .into_iter()
            .filter(|w| date::is_valid_date(&w.iso))
            .map(|w| {
                let iso = w.iso.clone();
                repair_wire_day(&iso, w)
            })
            .collect();

        let experiment = self.experiment.and_then(|e| {
            let name = e.name.trim();
            if name.is_empty() || !date::is_valid_date(&e.start) {
                None
            } else {
                Some(Experiment {
                    name: name.to_string(),
                    start: e.start,
                })
            }
        });

        let start_date = self.start_date.filter(|s| date::is_valid_date(s));

        (days, experiment, start_date)
    }
}

pub fn export_store(
    days: &[DayRecord],
    experiment: Option<&Experiment>,
    start_date: Option<&str>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&WireStore::from_parts(days, experiment, start_date))
}

pub fn import_store(
    json: &str,
) -> Result<(Vec<DayRecord>, Option<Experiment>, Option<String>), serde_json::Error> {
    let wire: WireStore = serde_json::from_str(json)?;
    Ok(wire.into_parts())
}
