//! # MediMate Architecture
//!
//! MediMate is a **UI-agnostic medication tracking library**. The command-line binary is
//! one client of it; a mobile shell or a web service could drive the same API.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints results, installs logging       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Validates form input (names, times, dosages, messages)   │
//! │  - Dispatches to commands, returns structured results       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Turns store/scheduler outcomes into `CmdResult` values   │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                              │
//!                 ▼                              ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────────┐
//! │  Medication Store (store/)   │  │  Reminder Scheduler          │
//! │  reducer + persistence       │  │  (reminder/)                 │
//! └──────────────────────────────┘  └──────────────────────────────┘
//!                 │                              │
//!                 ▼                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  KeyValueBackend: FsBackend (production), MemBackend (tests)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The medication store and the reminder scheduler never talk to each other. Both are
//! plain objects constructed once at startup and owned by [`api::MedimateApi`].
//!
//! ## Testing Strategy
//!
//! - **Reducer and store**: exhaustive unit tests against `MemBackend`.
//! - **Scheduler**: unit tests against `MemNotifier`, which records every call.
//! - **Commands**: result shaping and not-found handling.
//! - **CLI**: integration tests in `tests/` driving the binary in a temp directory.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per user-facing operation
//! - [`store`]: Key-value backends and the medication store
//! - [`reducer`]: Pure state transitions for the medication collection
//! - [`reminder`]: Notification service seam, triggers and the scheduler
//! - [`model`]: Records, schedule entries and the persisted snapshot
//! - [`validation`]: Form-level input checks
//! - [`guard`]: Per-resource in-flight guards
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod guard;
pub mod model;
pub mod reducer;
pub mod reminder;
pub mod store;
pub mod validation;
