//! # Storage Layer
//!
//! This module defines the storage abstraction for studyhall. The
//! [`ContentStore`] trait allows the application to work with different
//! storage backends.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Allow **future backends** (database, hosted document store) without
//!   changing core logic
//! - Keep business logic **decoupled** from persistence details
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - Modules in `modules.json`, one steps collection per module in
//!     `steps-{uuid}.json`, progress in `progress.json`, journal entries in
//!     `journal.json`
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Fast, isolated test execution
//!
//! ## The Step Collection
//!
//! All steps of a module live in a **single collection** with a `kind`
//! discriminant on each document. Earlier generations of this data model
//! fanned steps out into one collection per step type and had the
//! application increment/decrement the module's `step_count` on each call,
//! which drifted whenever a write failed midway. Here the counter is owned
//! by the store: every step write or removal refreshes `step_count` from the
//! collection itself, and [`ContentStore::doctor`] reconciles documents
//! written by older tooling.
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <root>/
//! ├── modules.json           # Module documents, keyed by id
//! ├── steps-{uuid}.json      # Steps collection for one module
//! ├── progress.json          # Progress records, keyed by "user/module-id"
//! ├── journal.json           # Journal entries, keyed by id
//! └── config.json            # Configuration
//! ```
//!
//! Steps are stored separately from modules so listing the catalog doesn't
//! require reading every steps collection.

use crate::error::Result;
use crate::model::{JournalEntry, Module, Progress, Step};
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// Report from the `doctor` operation.
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Modules whose `step_count` disagreed with their steps collection.
    pub fixed_step_counts: usize,
    /// Steps collections whose parent module no longer exists.
    pub orphaned_step_collections: usize,
}

/// Abstract interface for module content storage.
///
/// Implementations must keep each module's `step_count` equal to the size of
/// its steps collection across [`save_step`](Self::save_step) and
/// [`remove_step`](Self::remove_step).
pub trait ContentStore {
    /// Save a module (create or update)
    fn save_module(&mut self, module: &Module) -> Result<()>;

    /// Get a module by ID
    fn get_module(&self, id: &Uuid) -> Result<Module>;

    /// List all modules
    fn list_modules(&self) -> Result<Vec<Module>>;

    /// Remove a module permanently, along with its steps collection and any
    /// progress records pointing at it
    fn remove_module(&mut self, id: &Uuid) -> Result<()>;

    /// Save a step (create or update) and refresh the parent's step count
    fn save_step(&mut self, step: &Step) -> Result<()>;

    /// Get a step by ID within a module
    fn get_step(&self, module_id: &Uuid, step_id: &Uuid) -> Result<Step>;

    /// List a module's steps, ordered by position
    fn list_steps(&self, module_id: &Uuid) -> Result<Vec<Step>>;

    /// Remove a step permanently and refresh the parent's step count
    fn remove_step(&mut self, module_id: &Uuid, step_id: &Uuid) -> Result<()>;

    /// Save a progress record (keyed by user and module)
    fn save_progress(&mut self, record: &Progress) -> Result<()>;

    /// Get the progress record for a user in a module, if any
    fn get_progress(&self, user: &str, module_id: &Uuid) -> Result<Option<Progress>>;

    /// Remove all progress records for a module
    fn remove_progress(&mut self, module_id: &Uuid) -> Result<()>;

    /// Save a journal entry (create or update)
    fn save_entry(&mut self, entry: &JournalEntry) -> Result<()>;

    /// Get a journal entry by ID
    fn get_entry(&self, id: &Uuid) -> Result<JournalEntry>;

    /// List a user's journal entries
    fn list_entries(&self, user: &str) -> Result<Vec<JournalEntry>>;

    /// Remove a journal entry permanently
    fn remove_entry(&mut self, id: &Uuid) -> Result<()>;

    /// Verify and fix consistency issues
    fn doctor(&mut self) -> Result<DoctorReport>;
}

/// Canonical ordering for a steps collection: position, then age for ties.
pub(crate) fn sort_steps(steps: &mut [Step]) {
    steps.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
