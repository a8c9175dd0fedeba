use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::reducer::Outcome;
use crate::store::backend::KeyValueBackend;
use crate::store::medication_store::MedicationStore;

pub fn run<B: KeyValueBackend>(store: &MedicationStore<B>, id: &str) -> Result<CmdResult> {
    let existing = store.get(id);
    let mut result = CmdResult::default();

    match (store.remove_medication(id)?, existing) {
        (Outcome::NotFound, _) | (_, None) => {
            result.add_message(CmdMessage::warning(format!("No medication with id {}", id)));
        }
        (_, Some(record)) => {
            result.add_message(CmdMessage::success(format!(
                "Medication removed ({}): {}",
                record.id, record.name
            )));
            result.affected_medications.push(record);
        }
    }

    Ok(result)
}
