use super::trigger::Trigger;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Target platform. Android needs a notification channel before anything is scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Ios,
    Android,
}

impl Platform {
    pub fn requires_channel(&self) -> bool {
        matches!(self, Platform::Android)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Ios => write!(f, "ios"),
            Platform::Android => write!(f, "android"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            other => Err(format!("unknown platform '{}' (expected ios or android)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Default,
    High,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub importance: Importance,
}

impl NotificationChannel {
    /// The channel reminders are posted to.
    pub fn reminders() -> Self {
        Self {
            id: "default".to_string(),
            name: "default".to_string(),
            importance: Importance::Max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub content: NotificationContent,
    pub trigger: Trigger,
}

/// A registration as reported back by the notification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub id: String,
    pub content: NotificationContent,
    pub trigger: Trigger,
    pub registered_at: DateTime<Utc>,
}

/// The call contract medimate makes into the platform notification API.
///
/// Implementations own the actual delivery. All methods take `&self`; implementations
/// use interior mutability.
pub trait NotificationService {
    fn permission_status(&self) -> Result<PermissionStatus>;

    /// Ask the user for permission. Returns the resulting status.
    fn request_permission(&self) -> Result<PermissionStatus>;

    /// Register (or replace) a delivery channel.
    fn register_channel(&self, channel: &NotificationChannel) -> Result<()>;

    /// Cancel every notification this app has scheduled.
    fn cancel_all(&self) -> Result<()>;

    /// Register a notification and return its identifier.
    fn schedule(&self, request: &NotificationRequest) -> Result<String>;

    /// Currently active registrations.
    fn scheduled(&self) -> Result<Vec<ScheduledNotification>>;
}

impl<T: NotificationService + ?Sized> NotificationService for &T {
    fn permission_status(&self) -> Result<PermissionStatus> {
        (**self).permission_status()
    }

    fn request_permission(&self) -> Result<PermissionStatus> {
        (**self).request_permission()
    }

    fn register_channel(&self, channel: &NotificationChannel) -> Result<()> {
        (**self).register_channel(channel)
    }

    fn cancel_all(&self) -> Result<()> {
        (**self).cancel_all()
    }

    fn schedule(&self, request: &NotificationRequest) -> Result<String> {
        (**self).schedule(request)
    }

    fn scheduled(&self) -> Result<Vec<ScheduledNotification>> {
        (**self).scheduled()
    }
}
