//! # Medication Reducer
//!
//! Pure state transitions for the medication collection: `(state, action) -> (state, outcome)`.
//! Nothing in here touches storage or the clock; the persistence wrapper in
//! [`crate::store::medication_store`] decides when to flush and what "now" is.
//!
//! Lookups are linear scans. The collection holds a handful of records.

use crate::model::{MedicationRecord, MedicationState, NewSchedule, ScheduleEntry};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add {
        name: String,
        description: Option<String>,
        schedules: Vec<NewSchedule>,
    },
    Remove {
        id: String,
    },
    MarkDoseTaken {
        id: String,
        time: String,
        at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A record was created with this id.
    Added(String),
    Applied,
    /// The referenced record (or schedule time) does not exist. State is unchanged.
    NotFound,
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        !matches!(self, Outcome::NotFound)
    }
}

pub fn reduce(state: &MedicationState, action: Action) -> (MedicationState, Outcome) {
    match action {
        Action::Add {
            name,
            description,
            schedules,
        } => add(state, name, description, schedules),
        Action::Remove { id } => remove(state, &id),
        Action::MarkDoseTaken { id, time, at } => mark_taken(state, &id, &time, at),
    }
}

fn add(
    state: &MedicationState,
    name: String,
    description: Option<String>,
    schedules: Vec<NewSchedule>,
) -> (MedicationState, Outcome) {
    let id = state.next_id.to_string();
    let record = MedicationRecord {
        id: id.clone(),
        name,
        description: description.filter(|d| !d.trim().is_empty()),
        schedules: schedules
            .into_iter()
            .map(|s| ScheduleEntry::new(s.time, s.dosage))
            .collect(),
    };

    let mut next = state.clone();
    next.medications.push(record);
    next.next_id = state.next_id + 1;
    (next, Outcome::Added(id))
}

fn remove(state: &MedicationState, id: &str) -> (MedicationState, Outcome) {
    if state.find(id).is_none() {
        return (state.clone(), Outcome::NotFound);
    }
    let mut next = state.clone();
    next.medications.retain(|m| m.id != id);
    (next, Outcome::Applied)
}

fn mark_taken(
    state: &MedicationState,
    id: &str,
    time: &str,
    at: DateTime<Utc>,
) -> (MedicationState, Outcome) {
    let mut next = state.clone();
    let Some(record) = next.medications.iter_mut().find(|m| m.id == id) else {
        return (next, Outcome::NotFound);
    };

    let mut touched = false;
    for schedule in record.schedules.iter_mut().filter(|s| s.time == time) {
        schedule.taken_today_at = Some(at.timestamp_millis());
        touched = true;
    }

    if touched {
        (next, Outcome::Applied)
    } else {
        (state.clone(), Outcome::NotFound)
    }
}
