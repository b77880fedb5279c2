use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Module not found: {0}")]
    ModuleNotFound(Uuid),

    #[error("Step not found: {0}")]
    StepNotFound(Uuid),

    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, StudyError>;
