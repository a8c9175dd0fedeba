//! # Storage Layer
//!
//! Storage is split in two:
//!
//! 1. [`backend::KeyValueBackend`]: the raw, passive string store (the "how").
//! 2. [`medication_store::MedicationStore`]: the owner of the medication collection,
//!    which reduces actions, flushes snapshots and notifies subscribers (the "what").
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: Production backend, one JSON file per key in the data
//!   directory, written atomically (temp file + rename).
//! - [`mem_backend::MemBackend`]: In-memory backend for tests, with failure simulation.
//!
//! ## Keys
//!
//! | Key | Owner | Content |
//! |-----|-------|---------|
//! | `medimate-medication-store` | `MedicationStore` | `{"state": {nextId, medications}, "version": 0}` |
//! | `userSavedText` | `reminder::message` | Reminder message text |
//! | `lastScheduledAt` | `ReminderScheduler` | RFC 3339 timestamp |
//! | `scheduledNotifications` | `LocalNotifier` | Active trigger registrations |
//! | `notificationChannels` | `LocalNotifier` | Registered channels |
//!
//! ## Storage Layout
//!
//! ```text
//! $MEDIMATE_HOME/
//! ├── config.json
//! ├── medimate-medication-store.json
//! ├── userSavedText.json
//! ├── lastScheduledAt.json
//! ├── scheduledNotifications.json
//! └── notificationChannels.json
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod medication_store;

pub const SNAPSHOT_KEY: &str = "medimate-medication-store";
pub const MESSAGE_KEY: &str = "userSavedText";
pub const LAST_SCHEDULED_KEY: &str = "lastScheduledAt";
pub const NOTIFICATIONS_KEY: &str = "scheduledNotifications";
pub const CHANNELS_KEY: &str = "notificationChannels";
