use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MedimateError, Result};
use crate::store::backend::KeyValueBackend;
use crate::store::medication_store::MedicationStore;
use crate::validation::ValidMedication;

pub fn run<B: KeyValueBackend>(
    store: &MedicationStore<B>,
    medication: ValidMedication,
) -> Result<CmdResult> {
    let id = store.add_medication(
        medication.name,
        medication.description,
        medication.schedules,
    )?;
    let record = store
        .get(&id)
        .ok_or_else(|| MedimateError::MedicationNotFound(id.clone()))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Medication added ({}): {}",
        record.id, record.name
    )));
    Ok(result.with_affected_medications(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::NewSchedule;
    use crate::store::mem_backend::MemBackend;
    use crate::validation::validate_new_medication;

    #[test]
    fn adds_and_reports_the_new_record() {
        let store = MedicationStore::open(MemBackend::new()).unwrap();
        let valid =
            validate_new_medication("Aspirin", "", &[NewSchedule::new("8:00", "500mg")]).unwrap();

        let result = run(&store, valid).unwrap();

        assert_eq!(result.affected_medications.len(), 1);
        let record = &result.affected_medications[0];
        assert_eq!(record.id, "1");
        assert_eq!(record.schedules[0].time, "08:00");
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(result.messages[0].content, "Medication added (1): Aspirin");
    }
}
