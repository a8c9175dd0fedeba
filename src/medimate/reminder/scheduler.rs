//! # Reminder Scheduler
//!
//! There is exactly one reminder slot. Scheduling always replaces whatever was there:
//!
//! ```text
//! Unscheduled ──schedule──▶ Scheduled(trigger, message)
//! Scheduled   ──schedule──▶ Scheduled(new trigger, new message)
//! Scheduled   ──cancel────▶ Unscheduled
//! ```
//!
//! The platform call sequence for a schedule is: register the channel (Android, once),
//! check/request permission, cancel all, schedule one. Permission is checked before
//! anything is cancelled, so a denied prompt leaves the previous reminder and the
//! `lastScheduledAt` record untouched.

use super::notifier::{
    NotificationChannel, NotificationContent, NotificationRequest, NotificationService,
    PermissionStatus, Platform, ScheduledNotification,
};
use super::trigger::Trigger;
use crate::error::{MedimateError, Result};
use crate::guard::{InFlight, Resource};
use crate::store::backend::KeyValueBackend;
use crate::store::LAST_SCHEDULED_KEY;
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use tracing::{info, warn};

pub const REMINDER_TITLE: &str = "Reminder!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderState {
    Unscheduled,
    Scheduled { trigger: Trigger, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub notification_id: String,
    pub trigger: Trigger,
    pub message: String,
    pub scheduled_at: DateTime<Utc>,
}

pub struct ReminderScheduler<B: KeyValueBackend, N: NotificationService> {
    backend: B,
    notifier: N,
    platform: Platform,
    channel_ready: Cell<bool>,
    state: RefCell<ReminderState>,
    in_flight: InFlight,
}

impl<B: KeyValueBackend, N: NotificationService> ReminderScheduler<B, N> {
    /// Build the scheduler, deriving the slot state from the service's active registrations.
    pub fn new(backend: B, notifier: N, platform: Platform) -> Result<Self> {
        let state = match notifier.scheduled()?.into_iter().next() {
            Some(active) => ReminderState::Scheduled {
                trigger: active.trigger,
                message: active.content.body,
            },
            None => ReminderState::Unscheduled,
        };
        Ok(Self {
            backend,
            notifier,
            platform,
            channel_ready: Cell::new(false),
            state: RefCell::new(state),
            in_flight: InFlight::new(Resource::ReminderSlot),
        })
    }

    pub fn state(&self) -> ReminderState {
        self.state.borrow().clone()
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The registration currently holding the slot, as the service reports it.
    pub fn active_registration(&self) -> Result<Option<ScheduledNotification>> {
        Ok(self.notifier.scheduled()?.into_iter().next())
    }

    /// When the last reminder was scheduled, if ever.
    pub fn last_scheduled_at(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.backend.get(LAST_SCHEDULED_KEY)? else {
            return Ok(None);
        };
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(at) => Ok(Some(at.with_timezone(&Utc))),
            Err(e) => {
                warn!(value = %raw, error = %e, "ignoring unreadable lastScheduledAt");
                Ok(None)
            }
        }
    }

    /// Replace the reminder with one firing every day at `hour:minute`.
    /// Range checks are the caller's job.
    pub fn schedule_daily_reminder(
        &self,
        hour: u32,
        minute: u32,
        message: &str,
    ) -> Result<ScheduledReminder> {
        self.schedule(Trigger::daily(hour, minute), message)
    }

    /// Replace the reminder with one repeating every `seconds`.
    pub fn schedule_interval_reminder(
        &self,
        seconds: u64,
        message: &str,
    ) -> Result<ScheduledReminder> {
        self.schedule(Trigger::every(seconds), message)
    }

    /// Cancel the reminder. Returns whether one was scheduled.
    pub fn cancel_reminder(&self) -> Result<bool> {
        let _guard = self.in_flight.enter()?;
        let was_scheduled = matches!(*self.state.borrow(), ReminderState::Scheduled { .. });
        self.notifier.cancel_all()?;
        *self.state.borrow_mut() = ReminderState::Unscheduled;
        info!(was_scheduled, "reminder cancelled");
        Ok(was_scheduled)
    }

    fn schedule(&self, trigger: Trigger, message: &str) -> Result<ScheduledReminder> {
        let _guard = self.in_flight.enter()?;

        self.ensure_channel()?;
        self.ensure_permission()?;

        self.notifier.cancel_all()?;
        let request = NotificationRequest {
            content: NotificationContent {
                title: REMINDER_TITLE.to_string(),
                body: message.to_string(),
            },
            trigger: trigger.clone(),
        };
        let notification_id = match self.notifier.schedule(&request) {
            Ok(id) => id,
            Err(e) => {
                // The old trigger is already gone.
                *self.state.borrow_mut() = ReminderState::Unscheduled;
                warn!(error = %e, "registering reminder failed after cancel");
                return Err(e);
            }
        };

        *self.state.borrow_mut() = ReminderState::Scheduled {
            trigger: trigger.clone(),
            message: message.to_string(),
        };
        info!(%trigger, id = %notification_id, "reminder scheduled");

        let scheduled_at = Utc::now();
        self.backend
            .set(LAST_SCHEDULED_KEY, &scheduled_at.to_rfc3339())
            .map_err(|e| {
                warn!(error = %e, "reminder registered but lastScheduledAt was not saved");
                match e {
                    MedimateError::Persistence(_) => e,
                    other => MedimateError::Persistence(other.to_string()),
                }
            })?;

        Ok(ScheduledReminder {
            notification_id,
            trigger,
            message: message.to_string(),
            scheduled_at,
        })
    }

    fn ensure_channel(&self) -> Result<()> {
        if self.platform.requires_channel() && !self.channel_ready.get() {
            self.notifier
                .register_channel(&NotificationChannel::reminders())?;
            self.channel_ready.set(true);
        }
        Ok(())
    }

    fn ensure_permission(&self) -> Result<()> {
        let mut status = self.notifier.permission_status()?;
        if status != PermissionStatus::Granted {
            status = self.notifier.request_permission()?;
        }
        if status != PermissionStatus::Granted {
            warn!(?status, "notification permission not granted, reminder not scheduled");
            return Err(MedimateError::PermissionDenied);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::mem_notifier::{MemNotifier, NotifierCall};
    use crate::store::mem_backend::MemBackend;
    use std::rc::{Rc, Weak};

    type Hook = Box<dyn Fn() -> Result<()>>;

    /// Runs `on_cancel` from inside `cancel_all`, the way a platform callback might.
    struct CallbackNotifier {
        inner: MemNotifier,
        on_cancel: RefCell<Option<Hook>>,
        nested: RefCell<Vec<Result<()>>>,
    }

    impl NotificationService for CallbackNotifier {
        fn permission_status(&self) -> Result<PermissionStatus> {
            self.inner.permission_status()
        }

        fn request_permission(&self) -> Result<PermissionStatus> {
            self.inner.request_permission()
        }

        fn register_channel(&self, channel: &NotificationChannel) -> Result<()> {
            self.inner.register_channel(channel)
        }

        fn cancel_all(&self) -> Result<()> {
            if let Some(hook) = self.on_cancel.borrow().as_ref() {
                self.nested.borrow_mut().push(hook());
            }
            self.inner.cancel_all()
        }

        fn schedule(&self, request: &NotificationRequest) -> Result<String> {
            self.inner.schedule(request)
        }

        fn scheduled(&self) -> Result<Vec<ScheduledNotification>> {
            self.inner.scheduled()
        }
    }

    fn scheduler<'a>(
        backend: &'a MemBackend,
        notifier: &'a MemNotifier,
        platform: Platform,
    ) -> ReminderScheduler<&'a MemBackend, &'a MemNotifier> {
        ReminderScheduler::new(backend, notifier, platform).unwrap()
    }

    #[test]
    fn schedules_one_daily_trigger_with_fixed_title() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);

        let scheduled = scheduler
            .schedule_daily_reminder(7, 32, "Take pills")
            .unwrap();

        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].content.title, "Reminder!");
        assert_eq!(active[0].content.body, "Take pills");
        assert_eq!(active[0].trigger, Trigger::daily(7, 32));
        assert_eq!(active[0].id, scheduled.notification_id);
        assert_eq!(
            scheduler.state(),
            ReminderState::Scheduled {
                trigger: Trigger::daily(7, 32),
                message: "Take pills".into()
            }
        );
    }

    #[test]
    fn cancels_before_scheduling() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        notifier.set_permission(PermissionStatus::Granted);
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);

        scheduler.schedule_daily_reminder(8, 0, "x").unwrap();

        assert_eq!(
            notifier.calls(),
            vec![
                NotifierCall::PermissionStatus,
                NotifierCall::CancelAll,
                NotifierCall::Schedule(Trigger::daily(8, 0)),
            ]
        );
    }

    #[test]
    fn scheduling_twice_leaves_only_the_second_trigger() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);

        scheduler.schedule_daily_reminder(7, 32, "Take pills").unwrap();
        scheduler.schedule_daily_reminder(21, 5, "Take pills").unwrap();

        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].trigger, Trigger::daily(21, 5));
    }

    #[test]
    fn permission_denied_changes_nothing() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);
        scheduler.schedule_daily_reminder(6, 0, "old").unwrap();
        let last = scheduler.last_scheduled_at().unwrap();
        assert!(last.is_some());

        notifier.set_permission(PermissionStatus::Denied);
        notifier.clear_calls();
        let result = scheduler.schedule_daily_reminder(7, 32, "Take pills");

        assert!(matches!(result, Err(MedimateError::PermissionDenied)));
        assert!(!notifier.calls().contains(&NotifierCall::CancelAll));
        assert_eq!(notifier.active().len(), 1);
        assert_eq!(notifier.active()[0].trigger, Trigger::daily(6, 0));
        assert_eq!(scheduler.last_scheduled_at().unwrap(), last);
        assert!(matches!(
            scheduler.state(),
            ReminderState::Scheduled { ref message, .. } if message == "old"
        ));
    }

    #[test]
    fn refused_prompt_registers_nothing() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::denying();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);

        let result = scheduler.schedule_daily_reminder(7, 32, "Take pills");

        assert!(matches!(result, Err(MedimateError::PermissionDenied)));
        assert!(notifier.active().is_empty());
        assert_eq!(scheduler.last_scheduled_at().unwrap(), None);
        assert_eq!(scheduler.state(), ReminderState::Unscheduled);
        assert_eq!(
            notifier.calls(),
            vec![NotifierCall::PermissionStatus, NotifierCall::RequestPermission]
        );
    }

    #[test]
    fn android_registers_channel_once() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Android);

        scheduler.schedule_daily_reminder(7, 0, "a").unwrap();
        scheduler.schedule_daily_reminder(8, 0, "b").unwrap();

        let registrations = notifier
            .calls()
            .into_iter()
            .filter(|c| matches!(c, NotifierCall::RegisterChannel(_)))
            .count();
        assert_eq!(registrations, 1);
        assert_eq!(notifier.channels(), vec![NotificationChannel::reminders()]);
    }

    #[test]
    fn ios_never_registers_a_channel() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);
        scheduler.schedule_daily_reminder(7, 0, "a").unwrap();
        assert!(notifier.channels().is_empty());
    }

    #[test]
    fn records_last_scheduled_at() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);

        let before = Utc::now();
        let scheduled = scheduler.schedule_daily_reminder(7, 32, "x").unwrap();
        let recorded = scheduler.last_scheduled_at().unwrap().unwrap();

        assert!(recorded >= before - chrono::Duration::seconds(1));
        assert_eq!(recorded.timestamp(), scheduled.scheduled_at.timestamp());
    }

    #[test]
    fn unreadable_last_scheduled_at_reads_as_none() {
        let backend = MemBackend::new();
        backend.set(LAST_SCHEDULED_KEY, "yesterday-ish").unwrap();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);
        assert_eq!(scheduler.last_scheduled_at().unwrap(), None);
    }

    #[test]
    fn failed_registration_leaves_slot_unscheduled() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);
        scheduler.schedule_daily_reminder(7, 0, "a").unwrap();

        notifier.set_simulate_schedule_error(true);
        let result = scheduler.schedule_daily_reminder(9, 0, "b");

        assert!(matches!(result, Err(MedimateError::Notification(_))));
        assert_eq!(scheduler.state(), ReminderState::Unscheduled);
        assert!(notifier.active().is_empty());
    }

    #[test]
    fn failed_timestamp_write_is_surfaced_but_trigger_stays() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);

        backend.set_simulate_write_error(true);
        let result = scheduler.schedule_daily_reminder(7, 32, "x");

        assert!(matches!(result, Err(MedimateError::Persistence(_))));
        assert_eq!(notifier.active().len(), 1);
        assert!(matches!(scheduler.state(), ReminderState::Scheduled { .. }));
    }

    #[test]
    fn interval_reminder_replaces_daily() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);

        scheduler.schedule_daily_reminder(7, 0, "daily").unwrap();
        scheduler.schedule_interval_reminder(300, "every five").unwrap();

        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].trigger, Trigger::every(300));
    }

    #[test]
    fn cancel_reports_previous_state() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        let scheduler = scheduler(&backend, &notifier, Platform::Ios);

        assert!(!scheduler.cancel_reminder().unwrap());
        scheduler.schedule_daily_reminder(7, 0, "a").unwrap();
        assert!(scheduler.cancel_reminder().unwrap());
        assert!(notifier.active().is_empty());
        assert_eq!(scheduler.state(), ReminderState::Unscheduled);
    }

    #[test]
    fn state_is_rehydrated_from_active_registrations() {
        let backend = MemBackend::new();
        let notifier = MemNotifier::new();
        scheduler(&backend, &notifier, Platform::Ios)
            .schedule_daily_reminder(7, 32, "Take pills")
            .unwrap();

        let fresh = scheduler(&backend, &notifier, Platform::Ios);
        assert_eq!(
            fresh.state(),
            ReminderState::Scheduled {
                trigger: Trigger::daily(7, 32),
                message: "Take pills".into()
            }
        );
    }

    #[test]
    fn callback_into_scheduler_while_scheduling_is_busy() {
        let notifier = CallbackNotifier {
            inner: MemNotifier::new(),
            on_cancel: RefCell::new(None),
            nested: RefCell::new(Vec::new()),
        };
        let scheduler = Rc::new(
            ReminderScheduler::new(Rc::new(MemBackend::new()), notifier, Platform::Ios).unwrap(),
        );
        let weak: Weak<ReminderScheduler<Rc<MemBackend>, CallbackNotifier>> =
            Rc::downgrade(&scheduler);
        *scheduler.notifier().on_cancel.borrow_mut() = Some(Box::new(move || {
            match weak.upgrade() {
                Some(s) => s.schedule_daily_reminder(9, 0, "nested").map(|_| ()),
                None => Ok(()),
            }
        }));

        scheduler.schedule_daily_reminder(7, 32, "outer").unwrap();

        {
            let nested = scheduler.notifier().nested.borrow();
            assert_eq!(nested.len(), 1);
            assert!(matches!(
                nested[0],
                Err(MedimateError::Busy(Resource::ReminderSlot))
            ));
        }
        let active = scheduler.notifier().inner.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].content.body, "outer");

        // The slot is free again once the outer call returns.
        *scheduler.notifier().on_cancel.borrow_mut() = None;
        scheduler.schedule_daily_reminder(8, 0, "after").unwrap();
        assert_eq!(scheduler.notifier().inner.active()[0].trigger, Trigger::daily(8, 0));
    }
}
