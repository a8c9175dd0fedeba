//! # Reminders
//!
//! A single user-visible reminder, delivered through a [`notifier::NotificationService`].
//!
//! - [`trigger`]: when a reminder fires (daily at a wall-clock time, or every N seconds)
//! - [`notifier`]: the platform call contract, plus permission, channel and request types
//! - [`scheduler`]: the one-slot scheduler (cancel-all, then schedule one)
//! - [`local`]: a notifier that keeps registrations in the key-value backend
//! - [`mem_notifier`]: a recording notifier for tests
//! - [`message`]: the user's saved reminder text

pub mod local;
pub mod mem_notifier;
pub mod message;
pub mod notifier;
pub mod scheduler;
pub mod trigger;
