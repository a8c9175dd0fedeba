use crate::commands::CmdResult;
use crate::error::{MedimateError, Result};
use crate::store::backend::KeyValueBackend;
use crate::store::medication_store::MedicationStore;

pub fn run<B: KeyValueBackend>(store: &MedicationStore<B>, id: &str) -> Result<CmdResult> {
    let record = store
        .get(id)
        .ok_or_else(|| MedimateError::MedicationNotFound(id.to_string()))?;
    Ok(CmdResult::default().with_listed_medications(vec![record]))
}
