use crate::guard::Resource;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MedimateError {
    #[error("Invalid input: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Medication not found: {0}")]
    MedicationNotFound(String),

    #[error("Notification permissions not granted")]
    PermissionDenied,

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("{0} is busy: another operation is still in flight")]
    Busy(Resource),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

impl MedimateError {
    pub fn validation(message: impl Into<String>) -> Self {
        MedimateError::Validation(vec![message.into()])
    }
}

pub type Result<T> = std::result::Result<T, MedimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_joins_all_messages() {
        let err = MedimateError::Validation(vec![
            "Name is required".to_string(),
            "Schedule 1 needs a dosage".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid input: Name is required; Schedule 1 needs a dosage"
        );
    }

    #[test]
    fn busy_names_the_resource() {
        let err = MedimateError::Busy(Resource::ReminderSlot);
        assert_eq!(
            err.to_string(),
            "reminder slot is busy: another operation is still in flight"
        );
    }
}
