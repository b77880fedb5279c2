use crate::catalog::DisplayIndex;
use crate::commands::{CmdMessage, CmdResult, ModuleUpdate};
use crate::error::{Result, StudyError};
use crate::store::ContentStore;

use super::helpers::resolve_index;

pub fn run<S: ContentStore>(
    store: &mut S,
    index: &DisplayIndex,
    update: &ModuleUpdate,
) -> Result<CmdResult> {
    if update.is_empty() {
        return Err(StudyError::Api("Nothing to update".into()));
    }

    let (display_index, id) = resolve_index(store, index)?;

    let mut module = store.get_module(&id)?;

    if let Some(title) = &update.title {
        if title.trim().is_empty() {
            return Err(StudyError::Api("Title cannot be empty".into()));
        }
        module.title = title.clone();
    }
    if let Some(description) = &update.description {
        module.description = description.clone();
    }
    if let Some(tags) = &update.tags {
        module.tags = tags.clone();
    }
    for collaborator in &update.add_collaborators {
        if !module.collaborators.contains(collaborator) {
            module.collaborators.push(collaborator.clone());
        }
    }
    module
        .collaborators
        .retain(|c| !update.remove_collaborators.contains(c));

    module.touch();
    store.save_module(&module)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Module updated ({}): {}",
        display_index, module.title
    )));
    result.affected_modules.push(module);
    Ok(result)
}
