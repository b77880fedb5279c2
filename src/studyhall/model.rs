use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A unit of learning content composed of ordered steps.
///
/// `step_count` is denormalized from the module's steps collection and is
/// maintained by the storage layer on every step write. Commands must not
/// touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub owner: String,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub step_count: usize,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Module {
    pub fn new(title: String, description: String, owner: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            owner,
            collaborators: Vec::new(),
            tags: Vec::new(),
            published: false,
            published_at: None,
            step_count: 0,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One content unit within a module.
///
/// The payload lives in [`StepBody`] behind a `kind` discriminant; all steps
/// of a module share one collection regardless of kind. `position` is the
/// 1-based order within the module, kept dense by the command layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub position: usize,
    #[serde(default)]
    pub optional: bool,
    pub estimated_minutes: Option<u32>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: StepBody,
}

impl Step {
    pub fn new(module_id: Uuid, title: String, author: String, body: StepBody) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            module_id,
            title,
            position: 0,
            optional: false,
            estimated_minutes: None,
            author,
            created_at: now,
            updated_at: now,
            body,
        }
    }

    pub fn kind(&self) -> StepKind {
        self.body.kind()
    }
}

/// Step payload, discriminated by `kind` in the serialized document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepBody {
    Video {
        url: String,
        duration_minutes: Option<u32>,
    },
    Quiz {
        questions: Vec<QuizQuestion>,
    },
    Flashcards {
        cards: Vec<Flashcard>,
    },
    FreeResponse {
        prompt: String,
        sample_answer: Option<String>,
        max_length: Option<u32>,
    },
    Poll {
        prompt: String,
        options: Vec<PollOption>,
    },
    Resource {
        link: Option<String>,
        pdf: Option<String>,
    },
}

impl StepBody {
    pub fn kind(&self) -> StepKind {
        match self {
            StepBody::Video { .. } => StepKind::Video,
            StepBody::Quiz { .. } => StepKind::Quiz,
            StepBody::Flashcards { .. } => StepKind::Flashcards,
            StepBody::FreeResponse { .. } => StepKind::FreeResponse,
            StepBody::Poll { .. } => StepKind::Poll,
            StepBody::Resource { .. } => StepKind::Resource,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Video,
    Quiz,
    Flashcards,
    FreeResponse,
    Poll,
    Resource,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepKind::Video => "video",
            StepKind::Quiz => "quiz",
            StepKind::Flashcards => "flashcards",
            StepKind::FreeResponse => "free response",
            StepKind::Poll => "poll",
            StepKind::Resource => "resource",
        };
        write!(f, "{}", s)
    }
}

/// A multiple-choice quiz question. `correct` indexes into `choices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct: usize,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    pub label: String,
    #[serde(default)]
    pub votes: u32,
}

/// A quiz result: `correct` out of `total` questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    pub correct: u32,
    pub total: u32,
}

/// Study state for one user in one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub user: String,
    pub module_id: Uuid,
    #[serde(default)]
    pub completed_steps: HashSet<Uuid>,
    #[serde(default)]
    pub quiz_scores: HashMap<Uuid, QuizScore>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Progress {
    pub fn new(user: String, module_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user,
            module_id,
            completed_steps: HashSet::new(),
            quiz_scores: HashMap::new(),
            started_at: now,
            updated_at: now,
        }
    }
}

/// A reflective note, free-form or linked to a module.
///
/// Module-linked entries are read-only after creation; the journal command
/// refuses to edit them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user: String,
    pub module_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(user: String, module_id: Option<Uuid>, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user,
            module_id,
            body,
            created_at: now,
            updated_at: now,
        }
    }
}
