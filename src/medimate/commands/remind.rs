use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::reminder::notifier::{NotificationService, Platform};
use crate::reminder::scheduler::{ReminderScheduler, ReminderState};
use crate::reminder::trigger::Trigger;
use crate::store::backend::KeyValueBackend;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// What the reminder slot holds right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderStatus {
    pub state: ReminderState,
    pub platform: Platform,
    pub last_scheduled_at: Option<DateTime<Utc>>,
    pub next_fire: Option<DateTime<FixedOffset>>,
}

pub fn set_daily<B: KeyValueBackend, N: NotificationService>(
    scheduler: &ReminderScheduler<B, N>,
    hour: u32,
    minute: u32,
    message: &str,
) -> Result<CmdResult> {
    let scheduled = scheduler.schedule_daily_reminder(hour, minute, message)?;
    Ok(scheduled_result(&scheduled.trigger, &scheduled.message))
}

pub fn set_interval<B: KeyValueBackend, N: NotificationService>(
    scheduler: &ReminderScheduler<B, N>,
    seconds: u64,
    message: &str,
) -> Result<CmdResult> {
    let scheduled = scheduler.schedule_interval_reminder(seconds, message)?;
    Ok(scheduled_result(&scheduled.trigger, &scheduled.message))
}

pub fn cancel<B: KeyValueBackend, N: NotificationService>(
    scheduler: &ReminderScheduler<B, N>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if scheduler.cancel_reminder()? {
        result.add_message(CmdMessage::success("Reminder cancelled"));
    } else {
        result.add_message(CmdMessage::info("No reminder was scheduled"));
    }
    Ok(result)
}

pub fn status<B: KeyValueBackend, N: NotificationService, Tz: TimeZone>(
    scheduler: &ReminderScheduler<B, N>,
    now: &DateTime<Tz>,
) -> Result<CmdResult> {
    let next_fire = scheduler
        .active_registration()?
        .and_then(|active| active.trigger.next_fire_after(active.registered_at, now))
        .map(|at| at.fixed_offset());

    let status = ReminderStatus {
        state: scheduler.state(),
        platform: scheduler.platform(),
        last_scheduled_at: scheduler.last_scheduled_at()?,
        next_fire,
    };
    Ok(CmdResult::default().with_reminder(status))
}

fn scheduled_result(trigger: &Trigger, message: &str) -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Reminder scheduled {}: {}",
        trigger, message
    )));
    result
}
