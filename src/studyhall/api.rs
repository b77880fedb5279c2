//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the
//! single entry point for all studyhall operations, regardless of the UI being
//! used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (e.g., converting display indexes to UUIDs)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! The API explicitly avoids:
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or file formatting
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Generic Over ContentStore
//!
//! `StudyApi<S: ContentStore>` is generic over the storage backend:
//! - Production: `StudyApi<FileStore>`
//! - Testing: `StudyApi<InMemoryStore>`
//!
//! This enables testing the API layer without touching the filesystem.

use crate::catalog::{parse_index_or_range, DisplayIndex, ModuleSelector};
use crate::commands;
use crate::commands::helpers::selectors_to_indexes;
use crate::error::{Result, StudyError};
use crate::model::QuizScore;
use crate::store::ContentStore;
use std::path::PathBuf;

/// The main API facade for studyhall operations.
///
/// Generic over `ContentStore` to allow different storage backends.
/// All UI clients should interact through this API.
pub struct StudyApi<S: ContentStore> {
    store: S,
    root: PathBuf,
}

impl<S: ContentStore> StudyApi<S> {
    pub fn new(store: S, root: PathBuf) -> Self {
        Self { store, root }
    }

    pub fn create_module(
        &mut self,
        title: String,
        description: String,
        owner: String,
        tags: Vec<String>,
    ) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.store, title, description, owner, tags)
    }

    pub fn get_modules(&self, filter: ModuleFilter) -> Result<commands::CmdResult> {
        commands::get::run(&self.store, filter)
    }

    pub fn view_modules<I: AsRef<str>>(&self, indexes: &[I]) -> Result<commands::CmdResult> {
        let indexes = self.resolve(indexes)?;
        commands::view::run(&self.store, &indexes)
    }

    pub fn update_module<I: AsRef<str>>(
        &mut self,
        index: I,
        update: &commands::ModuleUpdate,
    ) -> Result<commands::CmdResult> {
        let index = self.resolve_one(index)?;
        commands::update::run(&mut self.store, &index, update)
    }

    pub fn delete_modules<I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<commands::CmdResult> {
        let indexes = self.resolve(indexes)?;
        commands::delete::run(&mut self.store, &indexes)
    }

    pub fn restore_modules<I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<commands::CmdResult> {
        let indexes = self.resolve(indexes)?;
        commands::delete::restore(&mut self.store, &indexes)
    }

    pub fn publish_modules<I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<commands::CmdResult> {
        let indexes = self.resolve(indexes)?;
        commands::publish::publish(&mut self.store, &indexes)
    }

    pub fn unpublish_modules<I: AsRef<str>>(
        &mut self,
        indexes: &[I],
    ) -> Result<commands::CmdResult> {
        let indexes = self.resolve(indexes)?;
        commands::publish::unpublish(&mut self.store, &indexes)
    }

    pub fn purge_modules<I: AsRef<str>>(
        &mut self,
        indexes: &[I],
        skip_confirm: bool,
    ) -> Result<commands::CmdResult> {
        let indexes = self.resolve(indexes)?;
        commands::purge::run(&mut self.store, &indexes, skip_confirm)
    }

    pub fn export_modules<I: AsRef<str>>(&self, indexes: &[I]) -> Result<commands::CmdResult> {
        let indexes = self.resolve(indexes)?;
        commands::export::run(&self.store, &indexes)
    }

    pub fn import_decks<I: AsRef<str>>(
        &mut self,
        index: I,
        author: &str,
        paths: Vec<PathBuf>,
        import_exts: &[String],
    ) -> Result<commands::CmdResult> {
        let index = self.resolve_one(index)?;
        commands::import::run(&mut self.store, &index, author, paths, import_exts)
    }

    pub fn add_step<I: AsRef<str>>(
        &mut self,
        index: I,
        draft: commands::step::StepDraft,
    ) -> Result<commands::CmdResult> {
        let index = self.resolve_one(index)?;
        commands::step::add(&mut self.store, &index, draft)
    }

    pub fn edit_step<I: AsRef<str>>(
        &mut self,
        index: I,
        position: usize,
        edit: commands::step::StepEdit,
    ) -> Result<commands::CmdResult> {
        let index = self.resolve_one(index)?;
        commands::step::edit(&mut self.store, &index, position, edit)
    }

    pub fn remove_step<I: AsRef<str>>(
        &mut self,
        index: I,
        position: usize,
    ) -> Result<commands::CmdResult> {
        let index = self.resolve_one(index)?;
        commands::step::remove(&mut self.store, &index, position)
    }

    pub fn move_step<I: AsRef<str>>(
        &mut self,
        index: I,
        from: usize,
        to: usize,
    ) -> Result<commands::CmdResult> {
        let index = self.resolve_one(index)?;
        commands::step::move_to(&mut self.store, &index, from, to)
    }

    pub fn vote_poll<I: AsRef<str>>(
        &mut self,
        index: I,
        position: usize,
        option: usize,
    ) -> Result<commands::CmdResult> {
        let index = self.resolve_one(index)?;
        commands::step::vote(&mut self.store, &index, position, option)
    }

    pub fn complete_step<I: AsRef<str>>(
        &mut self,
        user: &str,
        index: I,
        position: usize,
        score: Option<QuizScore>,
    ) -> Result<commands::CmdResult> {
        let index = self.resolve_one(index)?;
        commands::progress::complete(&mut self.store, user, &index, position, score)
    }

    pub fn show_progress<I: AsRef<str>>(
        &self,
        user: &str,
        index: I,
    ) -> Result<commands::CmdResult> {
        let index = self.resolve_one(index)?;
        commands::progress::show(&self.store, user, &index)
    }

    pub fn add_journal_entry<I: AsRef<str>>(
        &mut self,
        user: &str,
        body: String,
        module_index: Option<I>,
    ) -> Result<commands::CmdResult> {
        let index = match module_index {
            Some(i) => Some(self.resolve_one(i)?),
            None => None,
        };
        commands::journal::add(&mut self.store, user, body, index.as_ref())
    }

    pub fn list_journal(&self, user: &str) -> Result<commands::CmdResult> {
        commands::journal::list(&self.store, user)
    }

    pub fn edit_journal_entry(
        &mut self,
        user: &str,
        number: usize,
        body: String,
    ) -> Result<commands::CmdResult> {
        commands::journal::edit(&mut self.store, user, number, body)
    }

    pub fn remove_journal_entry(&mut self, user: &str, number: usize) -> Result<commands::CmdResult> {
        commands::journal::remove(&mut self.store, user, number)
    }

    pub fn doctor(&mut self) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.store)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.root, action)
    }

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.root)
    }

    fn resolve<I: AsRef<str>>(&self, inputs: &[I]) -> Result<Vec<DisplayIndex>> {
        let selectors = parse_selectors(inputs);
        selectors_to_indexes(&self.store, &selectors)
    }

    fn resolve_one<I: AsRef<str>>(&self, input: I) -> Result<DisplayIndex> {
        let indexes = self.resolve(std::slice::from_ref(&input))?;
        indexes
            .into_iter()
            .next()
            .ok_or_else(|| StudyError::Api(format!("No module matching {}", input.as_ref())))
    }
}

/// Interpret raw CLI arguments as module selectors.
///
/// If every argument parses as a display index (or index range like `2-4`),
/// they select by index. Otherwise the arguments are joined into a single
/// title search term.
fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Vec<ModuleSelector> {
    let all_indexes: std::result::Result<Vec<Vec<DisplayIndex>>, _> = inputs
        .iter()
        .map(|s| parse_index_or_range(s.as_ref()))
        .collect();

    if let Ok(index_groups) = all_indexes {
        return index_groups
            .into_iter()
            .flatten()
            .map(ModuleSelector::Index)
            .collect();
    }

    let search_term = inputs
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");

    vec![ModuleSelector::Title(search_term)]
}

pub use crate::commands::config::ConfigAction;
pub use commands::get::{ModuleFilter, ModuleStatusFilter};
pub use commands::step::{StepDraft, StepEdit};
pub use commands::{CmdMessage, CmdResult, MessageLevel, ModuleUpdate};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StepBody;
    use crate::store::memory::InMemoryStore;

    fn api() -> StudyApi<InMemoryStore> {
        StudyApi::new(InMemoryStore::new(), PathBuf::from("/tmp/unused"))
    }

    #[test]
    fn test_parse_selectors_all_indexes() {
        let selectors = parse_selectors(&["1", "p2", "d3"]);
        assert_eq!(selectors.len(), 3);
        assert!(matches!(
            selectors[0],
            ModuleSelector::Index(DisplayIndex::Regular(1))
        ));
        assert!(matches!(
            selectors[1],
            ModuleSelector::Index(DisplayIndex::Published(2))
        ));
        assert!(matches!(
            selectors[2],
            ModuleSelector::Index(DisplayIndex::Deleted(3))
        ));
    }

    #[test]
    fn test_parse_selectors_range() {
        let selectors = parse_selectors(&["1-3"]);
        assert_eq!(selectors.len(), 3);
    }

    #[test]
    fn test_parse_selectors_falls_back_to_title() {
        let selectors = parse_selectors(&["intro", "to", "rust"]);
        assert_eq!(selectors.len(), 1);
        assert!(matches!(
            &selectors[0],
            ModuleSelector::Title(t) if t == "intro to rust"
        ));
    }

    #[test]
    fn test_create_and_view_by_title() {
        let mut api = api();
        api.create_module("Intro to Rust".into(), "".into(), "ada".into(), vec![])
            .unwrap();

        let result = api.view_modules(&["rust"]).unwrap();
        assert_eq!(result.listed_modules.len(), 1);
        assert_eq!(result.listed_modules[0].module.title, "Intro to Rust");
    }

    #[test]
    fn test_step_lifecycle_through_api() {
        let mut api = api();
        api.create_module("Course".into(), "".into(), "ada".into(), vec![])
            .unwrap();
        api.add_step(
            "1",
            StepDraft {
                title: "Watch".into(),
                author: "ada".into(),
                body: StepBody::Video {
                    url: "https://example.com/v".into(),
                    duration_minutes: Some(12),
                },
                optional: false,
                estimated_minutes: None,
            },
        )
        .unwrap();

        let result = api.view_modules(&["1"]).unwrap();
        assert_eq!(result.steps.len(), 1);

        api.complete_step("sam", "1", 1, None).unwrap();
        let summary = api.show_progress("sam", "1").unwrap().summary.unwrap();
        assert_eq!(summary.percent, 100);
    }
}
