use super::notifier::{
    NotificationChannel, NotificationRequest, NotificationService, PermissionStatus,
    ScheduledNotification,
};
use super::trigger::Trigger;
use crate::error::{MedimateError, Result};
use chrono::Utc;
use std::cell::{Cell, RefCell};

/// One call made into a [`MemNotifier`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    PermissionStatus,
    RequestPermission,
    RegisterChannel(String),
    CancelAll,
    Schedule(Trigger),
}

/// In-memory notification service for testing.
///
/// Starts with an undetermined permission that is granted on request. Every call is
/// recorded so tests can assert on ordering (e.g. cancel before schedule).
pub struct MemNotifier {
    permission: Cell<PermissionStatus>,
    grant_on_request: Cell<bool>,
    channels: RefCell<Vec<NotificationChannel>>,
    active: RefCell<Vec<ScheduledNotification>>,
    calls: RefCell<Vec<NotifierCall>>,
    next_id: Cell<u64>,
    simulate_schedule_error: Cell<bool>,
}

impl Default for MemNotifier {
    fn default() -> Self {
        Self {
            permission: Cell::new(PermissionStatus::Undetermined),
            grant_on_request: Cell::new(true),
            channels: RefCell::new(Vec::new()),
            active: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            simulate_schedule_error: Cell::new(false),
        }
    }
}

impl MemNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose user refuses the permission prompt.
    pub fn denying() -> Self {
        let notifier = Self::default();
        notifier.grant_on_request.set(false);
        notifier
    }

    pub fn set_permission(&self, status: PermissionStatus) {
        self.permission.set(status);
    }

    pub fn set_grant_on_request(&self, grant: bool) {
        self.grant_on_request.set(grant);
    }

    pub fn set_simulate_schedule_error(&self, simulate: bool) {
        self.simulate_schedule_error.set(simulate);
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn channels(&self) -> Vec<NotificationChannel> {
        self.channels.borrow().clone()
    }

    pub fn active(&self) -> Vec<ScheduledNotification> {
        self.active.borrow().clone()
    }

    fn record(&self, call: NotifierCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl NotificationService for MemNotifier {
    fn permission_status(&self) -> Result<PermissionStatus> {
        self.record(NotifierCall::PermissionStatus);
        Ok(self.permission.get())
    }

    fn request_permission(&self) -> Result<PermissionStatus> {
        self.record(NotifierCall::RequestPermission);
        if self.permission.get() == PermissionStatus::Undetermined {
            let status = if self.grant_on_request.get() {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
            self.permission.set(status);
        }
        Ok(self.permission.get())
    }

    fn register_channel(&self, channel: &NotificationChannel) -> Result<()> {
        self.record(NotifierCall::RegisterChannel(channel.id.clone()));
        let mut channels = self.channels.borrow_mut();
        channels.retain(|c| c.id != channel.id);
        channels.push(channel.clone());
        Ok(())
    }

    fn cancel_all(&self) -> Result<()> {
        self.record(NotifierCall::CancelAll);
        self.active.borrow_mut().clear();
        Ok(())
    }

    fn schedule(&self, request: &NotificationRequest) -> Result<String> {
        self.record(NotifierCall::Schedule(request.trigger.clone()));
        if self.simulate_schedule_error.get() {
            return Err(MedimateError::Notification(
                "Simulated schedule error".to_string(),
            ));
        }
        let id = format!("mem-{}", self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.active.borrow_mut().push(ScheduledNotification {
            id: id.clone(),
            content: request.content.clone(),
            trigger: request.trigger.clone(),
            registered_at: Utc::now(),
        });
        Ok(id)
    }

    fn scheduled(&self) -> Result<Vec<ScheduledNotification>> {
        Ok(self.active())
    }
}
