//! The user-editable reminder text, kept under its own key.

use crate::error::Result;
use crate::store::backend::KeyValueBackend;
use crate::store::MESSAGE_KEY;
use tracing::debug;

pub fn load_message<B: KeyValueBackend>(backend: &B) -> Result<Option<String>> {
    Ok(backend
        .get(MESSAGE_KEY)?
        .filter(|text| !text.trim().is_empty()))
}

/// Store the message trimmed and return what was stored.
pub fn save_message<B: KeyValueBackend>(backend: &B, text: &str) -> Result<String> {
    let trimmed = text.trim().to_string();
    backend.set(MESSAGE_KEY, &trimmed)?;
    debug!(chars = trimmed.chars().count(), "saved reminder message");
    Ok(trimmed)
}

/// The text a reminder should carry: the explicit one, else the saved one, else `default`.
pub fn resolve_message<B: KeyValueBackend>(
    backend: &B,
    explicit: Option<&str>,
    default: &str,
) -> Result<String> {
    if let Some(text) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(text.to_string());
    }
    Ok(load_message(backend)?.unwrap_or_else(|| default.to_string()))
}
