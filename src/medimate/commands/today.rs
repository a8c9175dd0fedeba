use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::backend::KeyValueBackend;
use crate::store::medication_store::MedicationStore;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// One scheduled dose on the day's checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseLine {
    pub medication_id: String,
    pub name: String,
    pub time: String,
    pub dosage: String,
    pub taken: bool,
    pub taken_at: Option<DateTime<Utc>>,
}

/// Every dose of every medication, ordered by time of day. A dose counts as taken
/// when its last mark falls on `day` in `tz`.
pub fn run<B: KeyValueBackend, Tz: TimeZone>(
    store: &MedicationStore<B>,
    day: NaiveDate,
    tz: &Tz,
) -> Result<CmdResult> {
    let mut doses: Vec<DoseLine> = store
        .medications()
        .into_iter()
        .flat_map(|record| {
            record
                .schedules
                .iter()
                .map(|entry| DoseLine {
                    medication_id: record.id.clone(),
                    name: record.name.clone(),
                    time: entry.time.clone(),
                    dosage: entry.dosage.clone(),
                    taken: entry.is_taken_on(day, tz),
                    taken_at: entry.taken_at(),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    // HH:mm sorts lexically; sort_by is stable so ties keep insertion order.
    doses.sort_by(|a, b| a.time.cmp(&b.time));

    Ok(CmdResult::default().with_doses(doses))
}
