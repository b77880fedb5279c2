use crate::catalog::DisplayModule;
use crate::config::StudyConfig;
use crate::model::{JournalEntry, Module, Step};

pub mod config;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod export;
pub mod get;
pub mod helpers;
pub mod import;
pub mod init;
pub mod journal;
pub mod progress;
pub mod publish;
pub mod purge;
pub mod step;
pub mod update;
pub mod view;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_modules: Vec<Module>,
    pub listed_modules: Vec<DisplayModule>,
    pub steps: Vec<Step>,
    pub entries: Vec<JournalEntry>,
    pub summary: Option<progress::ProgressSummary>,
    pub config: Option<StudyConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_modules(mut self, modules: Vec<Module>) -> Self {
        self.affected_modules = modules;
        self
    }

    pub fn with_listed_modules(mut self, modules: Vec<DisplayModule>) -> Self {
        self.listed_modules = modules;
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_entries(mut self, entries: Vec<JournalEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_config(mut self, config: StudyConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Field edits for one module. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ModuleUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub add_collaborators: Vec<String>,
    pub remove_collaborators: Vec<String>,
}

impl ModuleUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.add_collaborators.is_empty()
            && self.remove_collaborators.is_empty()
    }
}
