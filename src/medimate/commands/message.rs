use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MedimateError, Result};
use crate::reminder::message::{load_message, save_message};
use crate::store::backend::KeyValueBackend;

pub fn show<B: KeyValueBackend>(backend: &B, default: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match load_message(backend)? {
        Some(text) => result.add_message(CmdMessage::info(text)),
        None => result.add_message(CmdMessage::info(format!("{} (default)", default))),
    }
    Ok(result)
}

pub fn save<B: KeyValueBackend>(backend: &B, text: &str) -> Result<CmdResult> {
    if text.trim().is_empty() {
        return Err(MedimateError::validation("Reminder message cannot be empty"));
    }
    let stored = save_message(backend, text)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Reminder message saved: {}", stored)));
    Ok(result)
}
