use crate::config::MedimateConfig;
use crate::model::MedicationRecord;

pub mod add;
pub mod config;
pub mod list;
pub mod message;
pub mod remind;
pub mod remove;
pub mod take;
pub mod today;
pub mod view;

pub use remind::ReminderStatus;
pub use today::DoseLine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Records created or changed by the command.
    pub affected_medications: Vec<MedicationRecord>,
    /// Records the command wants shown.
    pub listed_medications: Vec<MedicationRecord>,
    pub doses: Vec<DoseLine>,
    pub reminder: Option<ReminderStatus>,
    pub config: Option<MedimateConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_medications(mut self, medications: Vec<MedicationRecord>) -> Self {
        self.affected_medications = medications;
        self
    }

    pub fn with_listed_medications(mut self, medications: Vec<MedicationRecord>) -> Self {
        self.listed_medications = medications;
        self
    }

    pub fn with_doses(mut self, doses: Vec<DoseLine>) -> Self {
        self.doses = doses;
        self
    }

    pub fn with_reminder(mut self, reminder: ReminderStatus) -> Self {
        self.reminder = Some(reminder);
        self
    }

    pub fn with_config(mut self, config: MedimateConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.level, MessageLevel::Warning | MessageLevel::Error))
    }
}
