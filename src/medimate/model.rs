use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Version written into the persisted envelope.
pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Time of day, `HH:mm`
    pub time: String,
    pub dosage: String,
    /// Epoch milliseconds of the last "taken" mark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_today_at: Option<i64>,
}

impl ScheduleEntry {
    pub fn new(time: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            dosage: dosage.into(),
            taken_today_at: None,
        }
    }

    pub fn taken_at(&self) -> Option<DateTime<Utc>> {
        self.taken_today_at
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    /// Whether the last "taken" mark falls on `day` in the given time zone.
    pub fn is_taken_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> bool {
        self.taken_at()
            .map(|at| at.with_timezone(tz).date_naive() == day)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schedules: Vec<ScheduleEntry>,
}

impl MedicationRecord {
    pub fn schedule_at(&self, time: &str) -> Option<&ScheduleEntry> {
        self.schedules.iter().find(|s| s.time == time)
    }

    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

/// A schedule as entered by the user, before it belongs to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchedule {
    pub time: String,
    pub dosage: String,
}

impl NewSchedule {
    pub fn new(time: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            dosage: dosage.into(),
        }
    }
}

/// Parses `HH:mm=dosage`. Content is not validated here, only split.
impl FromStr for NewSchedule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (time, dosage) = s
            .split_once('=')
            .ok_or_else(|| format!("expected TIME=DOSAGE, got '{}'", s))?;
        Ok(NewSchedule::new(time.trim(), dosage.trim()))
    }
}

/// The whole medication collection plus the id counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationState {
    pub next_id: u64,
    pub medications: Vec<MedicationRecord>,
}

impl Default for MedicationState {
    fn default() -> Self {
        Self {
            next_id: 1,
            medications: Vec::new(),
        }
    }
}

impl MedicationState {
    pub fn find(&self, id: &str) -> Option<&MedicationRecord> {
        self.medications.iter().find(|m| m.id == id)
    }
}

/// On-disk envelope: `{"state": {...}, "version": 0}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub state: MedicationState,
    #[serde(default)]
    pub version: u32,
}

impl PersistedSnapshot {
    pub fn new(state: MedicationState) -> Self {
        Self {
            state,
            version: SNAPSHOT_VERSION,
        }
    }
}
