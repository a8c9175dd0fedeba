use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::backend::KeyValueBackend;
use crate::store::medication_store::MedicationStore;

/// All medications in insertion order.
pub fn run<B: KeyValueBackend>(store: &MedicationStore<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listed_medications(store.medications()))
}
