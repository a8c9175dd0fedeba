use clap::{Parser, Subcommand};
use medimate::model::NewSchedule;

#[derive(Parser, Debug)]
#[command(name = "medimate", bin_name = "medimate", version)]
#[command(about = "Track medications, doses and a daily reminder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a medication
    #[command(alias = "n")]
    Add {
        /// Name of the medication
        name: String,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,

        /// A daily dose as TIME=DOSAGE (e.g. 08:00=500mg); repeat for more
        #[arg(short, long = "schedule", value_name = "HH:mm=DOSAGE")]
        schedules: Vec<NewSchedule>,
    },

    /// List medications
    #[command(alias = "ls")]
    List,

    /// Show one medication with all its doses
    #[command(alias = "v")]
    View {
        /// Medication id
        id: String,
    },

    /// Remove a medication
    #[command(alias = "rm")]
    Remove {
        /// Medication id
        id: String,
    },

    /// Mark a scheduled dose as taken now
    Take {
        /// Medication id
        id: String,

        /// Scheduled time of the dose (HH:mm)
        time: String,
    },

    /// Today's doses, in time order
    Today,

    /// Manage the reminder notification
    #[command(subcommand)]
    Remind(RemindCommands),

    /// Show or save the reminder text
    Message {
        /// New text (if omitted, prints the current text)
        #[arg(num_args = 0..)]
        text: Vec<String>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., platform)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RemindCommands {
    /// Remind every day at a time of day
    Set {
        /// Time of day (HH:mm)
        time: String,

        /// Reminder text (defaults to the saved message)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Remind repeatedly, every N seconds (at least 60)
    Every {
        seconds: u64,

        /// Reminder text (defaults to the saved message)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Cancel the reminder
    Cancel,

    /// Show the reminder and when it fires next
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_collects_repeated_schedules() {
        let cli = Cli::try_parse_from([
            "medimate", "add", "Aspirin", "-s", "08:00=500mg", "-s", "20:00=250mg",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add {
                name, schedules, ..
            }) => {
                assert_eq!(name, "Aspirin");
                assert_eq!(
                    schedules,
                    vec![
                        NewSchedule::new("08:00", "500mg"),
                        NewSchedule::new("20:00", "250mg")
                    ]
                );
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn remind_set_takes_a_message() {
        let cli =
            Cli::try_parse_from(["medimate", "remind", "set", "7:32", "-m", "Take pills"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Remind(RemindCommands::Set { ref time, message: Some(ref m) }))
                if time == "7:32" && m == "Take pills"
        ));
    }

    #[test]
    fn aliases_resolve() {
        assert!(matches!(
            Cli::try_parse_from(["medimate", "ls"]).unwrap().command,
            Some(Commands::List)
        ));
        assert!(matches!(
            Cli::try_parse_from(["medimate", "rm", "3"]).unwrap().command,
            Some(Commands::Remove { .. })
        ));
    }
}
