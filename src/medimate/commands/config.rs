use crate::commands::{CmdMessage, CmdResult};
use crate::config::MedimateConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = MedimateConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = MedimateConfig::load(dir)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = MedimateConfig::load(dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e.to_string()));
                return Ok(res);
            }
            config.save(dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::reminder::notifier::Platform;
    use tempfile::tempdir;

    #[test]
    fn set_persists_and_show_reads_back() {
        let dir = tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("platform".into(), "Android".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "platform set to android");

        let shown = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(shown.config.unwrap().platform, Platform::Android);

        let key = run(dir.path(), ConfigAction::ShowKey("platform".into())).unwrap();
        assert_eq!(key.messages[0].content, "android");
    }

    #[test]
    fn bad_value_is_reported_and_not_saved() {
        let dir = tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("flush_retries".into(), "lots".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn unknown_key_is_reported() {
        let dir = tempdir().unwrap();
        let result = run(dir.path(), ConfigAction::ShowKey("colour".into())).unwrap();
        assert_eq!(result.messages[0].content, "Unknown config key: colour");
    }
}
