//! # API Facade
//!
//! The single entry point for every medimate operation, whatever the UI.
//!
//! The facade:
//! - **Validates** form input (names, schedule times, dosages, reminder bounds)
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no business logic of its own.
//!
//! ## Ownership
//!
//! `MedimateApi` is constructed once at startup and owns the [`MedicationStore`] and
//! the [`ReminderScheduler`]. There is no global instance. The backend is cloned into
//! both, so `B` is usually a cheap handle such as `Rc<FsBackend>`.

use crate::commands;
use crate::config::MedimateConfig;
use crate::error::{MedimateError, Result};
use crate::model::NewSchedule;
use crate::reminder::message::resolve_message;
use crate::reminder::notifier::NotificationService;
use crate::reminder::scheduler::ReminderScheduler;
use crate::store::backend::KeyValueBackend;
use crate::store::medication_store::MedicationStore;
use crate::validation::{
    normalize_time, split_time, validate_interval, validate_new_medication, validate_reminder,
};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::path::{Path, PathBuf};

pub struct MedimateApi<B: KeyValueBackend + Clone, N: NotificationService> {
    store: MedicationStore<B>,
    scheduler: ReminderScheduler<B, N>,
    backend: B,
    config: MedimateConfig,
    data_dir: PathBuf,
}

impl<B: KeyValueBackend + Clone, N: NotificationService> MedimateApi<B, N> {
    pub fn new(
        backend: B,
        notifier: N,
        config: MedimateConfig,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let store =
            MedicationStore::open(backend.clone())?.with_flush_retries(config.flush_retries);
        let scheduler = ReminderScheduler::new(backend.clone(), notifier, config.platform)?;
        Ok(Self {
            store,
            scheduler,
            backend,
            config,
            data_dir: data_dir.into(),
        })
    }

    pub fn store(&self) -> &MedicationStore<B> {
        &self.store
    }

    pub fn scheduler(&self) -> &ReminderScheduler<B, N> {
        &self.scheduler
    }

    pub fn config(&self) -> &MedimateConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // --- Medications ---

    pub fn add_medication(
        &self,
        name: &str,
        description: &str,
        schedules: &[NewSchedule],
    ) -> Result<commands::CmdResult> {
        let valid = validate_new_medication(name, description, schedules)?;
        commands::add::run(&self.store, valid)
    }

    pub fn list_medications(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn view_medication(&self, id: &str) -> Result<commands::CmdResult> {
        commands::view::run(&self.store, id.trim())
    }

    pub fn remove_medication(&self, id: &str) -> Result<commands::CmdResult> {
        commands::remove::run(&self.store, id.trim())
    }

    pub fn mark_dose_taken(&self, id: &str, time: &str) -> Result<commands::CmdResult> {
        self.mark_dose_taken_at(id, time, Utc::now())
    }

    pub fn mark_dose_taken_at(
        &self,
        id: &str,
        time: &str,
        at: DateTime<Utc>,
    ) -> Result<commands::CmdResult> {
        let time = normalize_time(time).ok_or_else(|| {
            MedimateError::validation(format!("Invalid time '{}' (expected HH:mm)", time.trim()))
        })?;
        commands::take::run(&self.store, id.trim(), &time, at)
    }

    /// Today's doses in the local time zone.
    pub fn today(&self) -> Result<commands::CmdResult> {
        let now = Local::now();
        commands::today::run(&self.store, now.date_naive(), &Local)
    }

    pub fn doses_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> Result<commands::CmdResult> {
        commands::today::run(&self.store, day, tz)
    }

    // --- Reminder ---

    /// Schedule the daily reminder at `time` (`H:mm`). Without a message the saved
    /// reminder text is used, then the configured default.
    pub fn schedule_reminder_at(
        &self,
        time: &str,
        message: Option<&str>,
    ) -> Result<commands::CmdResult> {
        let (hour, minute) = split_time(time)?;
        self.schedule_daily_reminder(hour, minute, message)
    }

    pub fn schedule_daily_reminder(
        &self,
        hour: u32,
        minute: u32,
        message: Option<&str>,
    ) -> Result<commands::CmdResult> {
        let message = self.reminder_message(message)?;
        validate_reminder(hour, minute, &message)?;
        commands::remind::set_daily(&self.scheduler, hour, minute, &message)
    }

    pub fn schedule_interval_reminder(
        &self,
        seconds: u64,
        message: Option<&str>,
    ) -> Result<commands::CmdResult> {
        let message = self.reminder_message(message)?;
        validate_interval(seconds, &message)?;
        commands::remind::set_interval(&self.scheduler, seconds, &message)
    }

    pub fn cancel_reminder(&self) -> Result<commands::CmdResult> {
        commands::remind::cancel(&self.scheduler)
    }

    pub fn reminder_status(&self) -> Result<commands::CmdResult> {
        commands::remind::status(&self.scheduler, &Local::now())
    }

    // --- Reminder text ---

    pub fn show_message(&self) -> Result<commands::CmdResult> {
        commands::message::show(&self.backend, &self.config.default_message)
    }

    pub fn save_message(&self, text: &str) -> Result<commands::CmdResult> {
        commands::message::save(&self.backend, text)
    }

    // --- Config ---

    pub fn configure(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.data_dir, action)
    }

    fn reminder_message(&self, explicit: Option<&str>) -> Result<String> {
        resolve_message(&self.backend, explicit, &self.config.default_message)
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, DoseLine, MessageLevel, ReminderStatus};
