//! # CLI Layer
//!
//! One possible UI client for medimate, not the application itself.
//!
//! This is the only place that knows about terminal I/O, argument parsing, the data
//! directory location and the logging subscriber. Every handler calls exactly one
//! `MedimateApi` method and prints the `CmdResult` it gets back.

use super::print::{
    print_config, print_doses, print_full_medications, print_medications, print_messages,
    print_reminder_status,
};
use super::setup::{Cli, Commands, RemindCommands};
use clap::Parser;
use directories::ProjectDirs;
use medimate::api::{CmdResult, ConfigAction, MedimateApi};
use medimate::config::MedimateConfig;
use medimate::error::{MedimateError, Result};
use medimate::model::NewSchedule;
use medimate::reminder::local::LocalNotifier;
use medimate::store::fs_backend::FsBackend;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const HOME_ENV: &str = "MEDIMATE_HOME";

type Backend = Rc<FsBackend>;

struct AppContext {
    api: MedimateApi<Backend, LocalNotifier<Backend>>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = init_context()?;

    match cli.command {
        Some(Commands::Add {
            name,
            description,
            schedules,
        }) => handle_add(&ctx, name, description, schedules),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::View { id }) => handle_view(&ctx, id),
        Some(Commands::Remove { id }) => handle_remove(&ctx, id),
        Some(Commands::Take { id, time }) => handle_take(&ctx, id, time),
        Some(Commands::Today) => handle_today(&ctx),
        Some(Commands::Remind(cmd)) => match cmd {
            RemindCommands::Set { time, message } => handle_remind_set(&ctx, time, message),
            RemindCommands::Every { seconds, message } => {
                handle_remind_every(&ctx, seconds, message)
            }
            RemindCommands::Cancel => handle_remind_cancel(&ctx),
            RemindCommands::Status => handle_remind_status(&ctx),
        },
        Some(Commands::Message { text }) => handle_message(&ctx, text),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "medimate", "medimate")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MedimateError::Api("Could not determine data directory".to_string()))
}

fn init_context() -> Result<AppContext> {
    let dir = data_dir()?;
    debug!(dir = %dir.display(), "using data directory");

    let config = MedimateConfig::load(&dir)?;
    let backend: Backend = Rc::new(FsBackend::new(dir.clone()));
    let notifier = LocalNotifier::new(Rc::clone(&backend), config.notifications_enabled);
    let api = MedimateApi::new(backend, notifier, config, dir)?;

    Ok(AppContext { api })
}

fn finish(result: CmdResult) -> Result<()> {
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(
    ctx: &AppContext,
    name: String,
    description: String,
    schedules: Vec<NewSchedule>,
) -> Result<()> {
    let result = ctx.api.add_medication(&name, &description, &schedules)?;
    finish(result)
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_medications()?;
    print_medications(&result.listed_medications);
    finish(result)
}

fn handle_view(ctx: &AppContext, id: String) -> Result<()> {
    let result = ctx.api.view_medication(&id)?;
    print_full_medications(&result.listed_medications);
    finish(result)
}

fn handle_remove(ctx: &AppContext, id: String) -> Result<()> {
    let result = ctx.api.remove_medication(&id)?;
    finish(result)
}

fn handle_take(ctx: &AppContext, id: String, time: String) -> Result<()> {
    let result = ctx.api.mark_dose_taken(&id, &time)?;
    finish(result)
}

fn handle_today(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.today()?;
    print_doses(&result.doses);
    finish(result)
}

fn handle_remind_set(ctx: &AppContext, time: String, message: Option<String>) -> Result<()> {
    let result = ctx.api.schedule_reminder_at(&time, message.as_deref())?;
    finish(result)
}

fn handle_remind_every(ctx: &AppContext, seconds: u64, message: Option<String>) -> Result<()> {
    let result = ctx
        .api
        .schedule_interval_reminder(seconds, message.as_deref())?;
    finish(result)
}

fn handle_remind_cancel(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.cancel_reminder()?;
    finish(result)
}

fn handle_remind_status(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.reminder_status()?;
    if let Some(status) = &result.reminder {
        print_reminder_status(status);
    }
    finish(result)
}

fn handle_message(ctx: &AppContext, text: Vec<String>) -> Result<()> {
    let result = if text.is_empty() {
        ctx.api.show_message()?
    } else {
        ctx.api.save_message(&text.join(" "))?
    };
    finish(result)
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let result = ctx.api.configure(action)?;
    if let (Some(config), true) = (&result.config, result.messages.is_empty()) {
        print_config(config);
    }
    finish(result)
}
