//! Form-level checks run by the API facade before anything reaches the store or the
//! scheduler. Every problem found is collected, so a form can show them all at once.

use crate::error::{MedimateError, Result};
use crate::model::NewSchedule;
use chrono::{NaiveTime, Timelike};

/// Repeating triggers shorter than this are refused.
pub const MIN_INTERVAL_SECONDS: u64 = 60;

/// Longest accepted repeat period: one year.
pub const MAX_INTERVAL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// A medication form after validation: trimmed name and normalized schedules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMedication {
    pub name: String,
    pub description: String,
    pub schedules: Vec<NewSchedule>,
}

/// Parse `H:mm` or `HH:mm` and return the zero-padded `HH:mm` form.
pub fn normalize_time(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let (hour, minute) = trimmed.split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    let time = NaiveTime::parse_from_str(trimmed, "%H:%M").ok()?;
    Some(format!("{:02}:{:02}", time.hour(), time.minute()))
}

/// Split a normalized `HH:mm` into hour and minute.
pub fn parse_hour_minute(input: &str) -> Option<(u32, u32)> {
    let normalized = normalize_time(input)?;
    let time = NaiveTime::parse_from_str(&normalized, "%H:%M").ok()?;
    Some((time.hour(), time.minute()))
}

/// Read `H:mm` into numbers without range checks, so [`validate_reminder`] can report
/// an out-of-range hour or minute by name.
pub fn split_time(input: &str) -> Result<(u32, u32)> {
    let trimmed = input.trim();
    trimmed
        .split_once(':')
        .and_then(|(h, m)| Some((h.parse().ok()?, m.parse().ok()?)))
        .ok_or_else(|| {
            MedimateError::validation(format!("Invalid time '{}' (expected HH:mm)", trimmed))
        })
}

pub fn validate_new_medication(
    name: &str,
    description: &str,
    schedules: &[NewSchedule],
) -> Result<ValidMedication> {
    let mut problems = Vec::new();

    let name = name.trim();
    if name.is_empty() {
        problems.push("Medication name is required".to_string());
    }
    if schedules.is_empty() {
        problems.push("At least one schedule is required".to_string());
    }

    let mut normalized = Vec::with_capacity(schedules.len());
    for (n, schedule) in schedules.iter().enumerate() {
        let position = n + 1;
        let time = normalize_time(&schedule.time);
        if time.is_none() {
            problems.push(format!(
                "Schedule {} has an invalid time '{}' (expected HH:mm)",
                position,
                schedule.time.trim()
            ));
        }
        let dosage = schedule.dosage.trim();
        if dosage.is_empty() {
            problems.push(format!("Schedule {} needs a dosage", position));
        }
        if let Some(time) = time {
            normalized.push(NewSchedule::new(time, dosage));
        }
    }

    if !problems.is_empty() {
        return Err(MedimateError::Validation(problems));
    }

    Ok(ValidMedication {
        name: name.to_string(),
        description: description.trim().to_string(),
        schedules: normalized,
    })
}

pub fn validate_reminder(hour: u32, minute: u32, message: &str) -> Result<()> {
    let mut problems = Vec::new();
    if hour > 23 {
        problems.push(format!("Hour must be between 0 and 23, got {}", hour));
    }
    if minute > 59 {
        problems.push(format!("Minute must be between 0 and 59, got {}", minute));
    }
    if message.trim().is_empty() {
        problems.push("Reminder message cannot be empty".to_string());
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(MedimateError::Validation(problems))
    }
}

pub fn validate_interval(seconds: u64, message: &str) -> Result<()> {
    let mut problems = Vec::new();
    if seconds < MIN_INTERVAL_SECONDS {
        problems.push(format!(
            "Interval must be at least {} seconds, got {}",
            MIN_INTERVAL_SECONDS, seconds
        ));
    }
    if seconds > MAX_INTERVAL_SECONDS {
        problems.push(format!(
            "Interval must be at most {} seconds (one year), got {}",
            MAX_INTERVAL_SECONDS, seconds
        ));
    }
    if message.trim().is_empty() {
        problems.push("Reminder message cannot be empty".to_string());
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(MedimateError::Validation(problems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problems(err: MedimateError) -> Vec<String> {
        match err {
            MedimateError::Validation(problems) => problems,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn normalizes_short_hours() {
        assert_eq!(normalize_time("8:00").as_deref(), Some("08:00"));
        assert_eq!(normalize_time(" 21:05 ").as_deref(), Some("21:05"));
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["", "8", "8:0", "24:00", "12:60", "ab:cd", "123:00", "08:00:00"] {
            assert_eq!(normalize_time(bad), None, "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn parse_hour_minute_splits() {
        assert_eq!(parse_hour_minute("7:32"), Some((7, 32)));
        assert_eq!(parse_hour_minute("25:00"), None);
    }

    #[test]
    fn split_time_leaves_ranges_to_the_validator() {
        assert_eq!(split_time("7:32").unwrap(), (7, 32));
        assert_eq!(split_time("25:61").unwrap(), (25, 61));
        assert!(split_time("seven").is_err());
        assert!(split_time("7:").is_err());
    }

    #[test]
    fn valid_medication_is_trimmed_and_normalized() {
        let valid = validate_new_medication(
            "  Aspirin ",
            " after food ",
            &[NewSchedule::new("8:00", " 500mg ")],
        )
        .unwrap();
        assert_eq!(valid.name, "Aspirin");
        assert_eq!(valid.description, "after food");
        assert_eq!(valid.schedules, vec![NewSchedule::new("08:00", "500mg")]);
    }

    #[test]
    fn collects_every_problem() {
        let err = validate_new_medication(
            " ",
            "",
            &[NewSchedule::new("08:00", "1 tab"), NewSchedule::new("9", "")],
        )
        .unwrap_err();
        let problems = problems(err);
        assert_eq!(problems.len(), 3);
        assert_eq!(problems[0], "Medication name is required");
        assert!(problems[1].starts_with("Schedule 2 has an invalid time"));
        assert_eq!(problems[2], "Schedule 2 needs a dosage");
    }

    #[test]
    fn requires_a_schedule() {
        let err = validate_new_medication("Aspirin", "", &[]).unwrap_err();
        assert_eq!(problems(err), vec!["At least one schedule is required"]);
    }

    #[test]
    fn reminder_bounds() {
        assert!(validate_reminder(23, 59, "x").is_ok());
        assert!(validate_reminder(0, 0, "x").is_ok());
        assert_eq!(problems(validate_reminder(24, 60, " ").unwrap_err()).len(), 3);
    }

    #[test]
    fn interval_floor_is_one_minute() {
        assert!(validate_interval(60, "x").is_ok());
        assert!(validate_interval(300, "x").is_ok());
        assert!(validate_interval(59, "x").is_err());
    }

    #[test]
    fn interval_ceiling_is_one_year() {
        assert!(validate_interval(MAX_INTERVAL_SECONDS, "x").is_ok());
        let err = validate_interval(10_000_000_000_000, "x").unwrap_err();
        assert!(problems(err)[0].starts_with("Interval must be at most"));
    }
}
