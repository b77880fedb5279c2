use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StudyError};
use std::fs;
use std::path::Path;

pub fn run(root: &Path) -> Result<CmdResult> {
    fs::create_dir_all(root).map_err(StudyError::Io)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Initialized studyhall store at {}",
        root.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_the_root_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("studyhall");
        run(&root).unwrap();
        assert!(root.is_dir());
    }
}
