use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use medimate::api::{CmdMessage, DoseLine, MessageLevel, ReminderStatus};
use medimate::config::MedimateConfig;
use medimate::model::MedicationRecord;
use medimate::reminder::scheduler::ReminderState;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 6;
const NAME_WIDTH: usize = 28;
const TAKEN_MARKER: &str = "✓";
const PENDING_MARKER: &str = "·";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_medications(medications: &[MedicationRecord]) {
    if medications.is_empty() {
        println!("No medications yet.");
        return;
    }

    for record in medications {
        let id = pad_to_width(&format!("{}.", record.id), ID_WIDTH);
        let name = pad_to_width(&truncate_to_width(&record.name, NAME_WIDTH), NAME_WIDTH);
        let doses = record
            .schedules
            .iter()
            .map(|s| format!("{} {}", s.time, s.dosage))
            .collect::<Vec<_>>()
            .join(", ");
        let available = LINE_WIDTH.saturating_sub(ID_WIDTH + NAME_WIDTH + 2);
        println!(
            "  {}{}{}",
            id.yellow(),
            name.bold(),
            truncate_to_width(&doses, available).dimmed()
        );
    }
}

pub(super) fn print_full_medications(medications: &[MedicationRecord]) {
    let now = Utc::now();
    for (i, record) in medications.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!("{} {}", record.id.yellow(), record.name.bold());
        if let Some(description) = record.description() {
            println!("{}", description.italic());
        }
        println!("--------------------------------");
        for entry in &record.schedules {
            let taken = entry
                .taken_at()
                .map(|at| format!("taken {}", format_time_ago(at, now)))
                .unwrap_or_default();
            println!("  {}  {}  {}", entry.time.cyan(), entry.dosage, taken.dimmed());
        }
    }
}

pub(super) fn print_doses(doses: &[DoseLine]) {
    if doses.is_empty() {
        println!("Nothing scheduled today.");
        return;
    }

    for dose in doses {
        let marker = if dose.taken {
            TAKEN_MARKER.green()
        } else {
            PENDING_MARKER.dimmed()
        };
        let name = pad_to_width(&truncate_to_width(&dose.name, NAME_WIDTH), NAME_WIDTH);
        let line = format!("{}  {}{}", dose.time, name, dose.dosage);
        if dose.taken {
            println!("  {} {}", marker, line.dimmed());
        } else {
            println!("  {} {}", marker, line);
        }
    }
}

pub(super) fn print_reminder_status(status: &ReminderStatus) {
    let now = Utc::now();
    match &status.state {
        ReminderState::Unscheduled => println!("{}", "No reminder scheduled.".dimmed()),
        ReminderState::Scheduled { trigger, message } => {
            println!("{} {}", "Reminder".bold(), trigger.to_string().cyan());
            println!("  {}", message);
        }
    }
    if let Some(next) = status.next_fire {
        println!(
            "  next: {}",
            next.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
    if let Some(at) = status.last_scheduled_at {
        println!(
            "  {}",
            format!("last scheduled {}", format_time_ago(at, now)).dimmed()
        );
    }
    println!("  {}", format!("platform: {}", status.platform).dimmed());
}

pub(super) fn print_config(config: &MedimateConfig) {
    for key in MedimateConfig::KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key.bold(), value);
        }
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_to_width("Aspirin", 10), "Aspirin");
    }

    #[test]
    fn truncate_marks_cut_strings() {
        let cut = truncate_to_width("Acetylsalicylic acid", 8);
        assert!(cut.ends_with('…'));
        assert!(cut.width() <= 8);
    }

    #[test]
    fn pad_counts_display_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }

    #[test]
    fn time_ago_reads_naturally() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now - Duration::hours(2), now), "2 hours ago");
    }
}
