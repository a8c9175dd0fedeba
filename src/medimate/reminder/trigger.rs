use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a registered notification fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Every day at a local wall-clock time.
    Daily { hour: u32, minute: u32 },
    /// Every `seconds` after registration.
    TimeInterval { seconds: u64, repeats: bool },
}

impl Trigger {
    pub fn daily(hour: u32, minute: u32) -> Self {
        Trigger::Daily { hour, minute }
    }

    pub fn every(seconds: u64) -> Self {
        Trigger::TimeInterval {
            seconds,
            repeats: true,
        }
    }

    /// The first firing strictly after `now`, or None if the trigger will not fire again.
    ///
    /// Daily triggers fire today at `hour:minute` unless that moment is not after `now`,
    /// in which case they fire tomorrow. Interval triggers count from `registered_at`.
    pub fn next_fire_after<Tz: TimeZone>(
        &self,
        registered_at: DateTime<Utc>,
        now: &DateTime<Tz>,
    ) -> Option<DateTime<Tz>> {
        let tz = now.timezone();
        match *self {
            Trigger::Daily { hour, minute } => {
                let today = now.date_naive();
                for day in [today, today.succ_opt()?, today.succ_opt()?.succ_opt()?] {
                    let local = day.and_hms_opt(hour, minute, 0)?;
                    // A wall-clock time skipped by a DST jump has no instant on that day.
                    if let Some(candidate) = tz.from_local_datetime(&local).earliest() {
                        if candidate > *now {
                            return Some(candidate);
                        }
                    }
                }
                None
            }
            Trigger::TimeInterval { seconds, repeats } => {
                if seconds == 0 {
                    return None;
                }
                // Out-of-range periods have no representable next firing.
                let period = Duration::try_seconds(i64::try_from(seconds).ok()?)?;
                let first = registered_at
                    .with_timezone(&tz)
                    .checked_add_signed(period)?;
                if first > *now {
                    return Some(first);
                }
                if !repeats {
                    return None;
                }
                let elapsed = now.clone().signed_duration_since(first.clone()).num_seconds();
                let periods = elapsed / period.num_seconds() + 1;
                let offset = period.checked_mul(i32::try_from(periods).ok()?)?;
                first.checked_add_signed(offset)
            }
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Trigger::Daily { hour, minute } => write!(f, "daily at {:02}:{:02}", hour, minute),
            Trigger::TimeInterval { seconds, repeats } => {
                let every = if repeats { "every" } else { "once after" };
                if seconds % 3600 == 0 {
                    write!(f, "{} {}h", every, seconds / 3600)
                } else if seconds % 60 == 0 {
                    write!(f, "{} {}min", every, seconds / 60)
                } else {
                    write!(f, "{} {}s", every, seconds)
                }
            }
        }
    }
}
