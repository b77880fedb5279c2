use crate::error::{Result, StudyError};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Content parsed from an editor buffer.
/// Format: title\n\nbody
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContent {
    pub title: String,
    pub body: String,
}

impl EditorContent {
    pub fn new(title: String, body: String) -> Self {
        Self { title, body }
    }

    /// Formats the content for the editor buffer.
    pub fn to_buffer(&self) -> String {
        if self.body.is_empty() {
            format!("{}\n\n", self.title)
        } else {
            format!("{}\n\n{}", self.title, self.body)
        }
    }

    /// Parses an editor buffer: first line is the title, the rest (after any
    /// blank lines) is the body.
    pub fn from_buffer(buffer: &str) -> Self {
        let mut lines = buffer.lines();
        let title = lines.next().unwrap_or("").trim().to_string();
        let body = lines.collect::<Vec<&str>>().join("\n").trim().to_string();
        Self { title, body }
    }
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    if let Ok(editor) = env::var("VISUAL") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(StudyError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|e| StudyError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(StudyError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    fs::read_to_string(path).map_err(StudyError::Io)
}

/// Opens an editor with initial content and returns the edited content.
pub fn edit_content(initial: &EditorContent, file_extension: &str) -> Result<EditorContent> {
    let temp_dir = env::temp_dir();
    let temp_file = temp_dir.join(format!("studyhall_edit{}", file_extension));

    fs::write(&temp_file, initial.to_buffer()).map_err(StudyError::Io)?;

    let result = open_in_editor(&temp_file)?;

    let _ = fs::remove_file(&temp_file);

    Ok(EditorContent::from_buffer(&result))
}
