use super::notifier::{
    NotificationChannel, NotificationRequest, NotificationService, PermissionStatus,
    ScheduledNotification,
};
use crate::error::Result;
use crate::store::backend::KeyValueBackend;
use crate::store::{CHANNELS_KEY, NOTIFICATIONS_KEY};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Notification service that keeps its registrations in the key-value backend.
///
/// This is what the command-line client runs against: triggers survive between
/// invocations and can be inspected with `medimate remind status`. Whether permission
/// is granted is decided by configuration.
pub struct LocalNotifier<B: KeyValueBackend> {
    backend: B,
    notifications_enabled: bool,
}

impl<B: KeyValueBackend> LocalNotifier<B> {
    pub fn new(backend: B, notifications_enabled: bool) -> Self {
        Self {
            backend,
            notifications_enabled,
        }
    }

    pub fn channels(&self) -> Result<Vec<NotificationChannel>> {
        self.load(CHANNELS_KEY)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.backend.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string_pretty(items)?;
        self.backend.set(key, &raw)
    }

    fn current_permission(&self) -> PermissionStatus {
        if self.notifications_enabled {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

impl<B: KeyValueBackend> NotificationService for LocalNotifier<B> {
    fn permission_status(&self) -> Result<PermissionStatus> {
        Ok(self.current_permission())
    }

    fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(self.current_permission())
    }

    fn register_channel(&self, channel: &NotificationChannel) -> Result<()> {
        let mut channels: Vec<NotificationChannel> = self.load(CHANNELS_KEY)?;
        channels.retain(|c| c.id != channel.id);
        channels.push(channel.clone());
        debug!(channel = %channel.id, "registered notification channel");
        self.save(CHANNELS_KEY, &channels)
    }

    fn cancel_all(&self) -> Result<()> {
        self.save::<ScheduledNotification>(NOTIFICATIONS_KEY, &[])
    }

    fn schedule(&self, request: &NotificationRequest) -> Result<String> {
        let mut active: Vec<ScheduledNotification> = self.load(NOTIFICATIONS_KEY)?;
        let id = Uuid::new_v4().to_string();
        active.push(ScheduledNotification {
            id: id.clone(),
            content: request.content.clone(),
            trigger: request.trigger.clone(),
            registered_at: Utc::now(),
        });
        self.save(NOTIFICATIONS_KEY, &active)?;
        Ok(id)
    }

    fn scheduled(&self) -> Result<Vec<ScheduledNotification>> {
        self.load(NOTIFICATIONS_KEY)
    }
}
