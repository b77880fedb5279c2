use crate::commands::{CmdMessage, CmdResult};
use crate::config::StudyConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(root: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = StudyConfig::load(root)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = StudyConfig::load(root)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => {
                    result.add_message(CmdMessage::info(val));
                    Ok(result)
                }
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)));
                    Ok(result)
                }
            }
        }
        ConfigAction::Set(key, value) => {
            let mut config = StudyConfig::load(root)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e));
                return Ok(res);
            }
            config.save(root)?;
            let display_val = config.get(&key).unwrap_or_else(|| value.clone());
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

    #[test]
    fn set_then_show() {
        let temp_dir = tempfile::tempdir().unwrap();

        run(
            temp_dir.path(),
            ConfigAction::Set("default_user".into(), "ada".into()),
        )
        .unwrap();

        let result = run(temp_dir.path(), ConfigAction::ShowKey("default_user".into())).unwrap();
        assert_eq!(result.messages[0].content, "ada");
    }

    #[test]
    fn unknown_key_is_an_error_message() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = run(temp_dir.path(), ConfigAction::ShowKey("nope".into())).unwrap();
        assert!(matches!(result.messages[0].level, MessageLevel::Error));
    }

    #[test]
    fn show_all_returns_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = run(temp_dir.path(), ConfigAction::ShowAll).unwrap();
        assert!(result.config.is_some());
    }
}
