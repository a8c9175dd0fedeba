use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::reducer::Outcome;
use crate::store::backend::KeyValueBackend;
use crate::store::medication_store::MedicationStore;
use chrono::{DateTime, Utc};

/// Mark the dose at `time` (already normalized) as taken at `at`.
pub fn run<B: KeyValueBackend>(
    store: &MedicationStore<B>,
    id: &str,
    time: &str,
    at: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if let Outcome::NotFound = store.mark_dose_taken_at(id, time, at)? {
        let message = match store.get(id) {
            None => format!("No medication with id {}", id),
            Some(record) => format!("{} has no dose scheduled at {}", record.name, time),
        };
        result.add_message(CmdMessage::warning(message));
        return Ok(result);
    }

    if let Some(record) = store.get(id) {
        let dosage = record
            .schedule_at(time)
            .map(|s| s.dosage.clone())
            .unwrap_or_default();
        result.add_message(CmdMessage::success(format!(
            "Taken: {} {} at {}",
            record.name, dosage, time
        )));
        result.affected_medications.push(record);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewSchedule;
    use crate::store::mem_backend::MemBackend;
    use chrono::TimeZone;

    fn store_with_aspirin() -> MedicationStore<MemBackend> {
        let store = MedicationStore::open(MemBackend::new()).unwrap();
        store
            .add_medication("Aspirin", "", vec![NewSchedule::new("08:00", "500mg")])
            .unwrap();
        store
    }

    #[test]
    fn marks_the_scheduled_dose() {
        let store = store_with_aspirin();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 5, 0).unwrap();

        let result = run(&store, "1", "08:00", at).unwrap();

        assert_eq!(result.messages[0].content, "Taken: Aspirin 500mg at 08:00");
        let entry = &result.affected_medications[0].schedules[0];
        assert_eq!(entry.taken_at(), Some(at));
    }

    #[test]
    fn unknown_time_names_the_medication() {
        let store = store_with_aspirin();
        let result = run(&store, "1", "09:00", Utc::now()).unwrap();
        assert!(result.has_warnings());
        assert_eq!(
            result.messages[0].content,
            "Aspirin has no dose scheduled at 09:00"
        );
    }

    #[test]
    fn unknown_id_warns() {
        let store = store_with_aspirin();
        let result = run(&store, "9", "08:00", Utc::now()).unwrap();
        assert_eq!(result.messages[0].content, "No medication with id 9");
    }
}
