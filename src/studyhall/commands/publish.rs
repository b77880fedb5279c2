use crate::catalog::DisplayIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::ContentStore;
use chrono::Utc;

use super::helpers::resolve_indexes;

pub fn publish<S: ContentStore>(store: &mut S, indexes: &[DisplayIndex]) -> Result<CmdResult> {
    set_published(store, indexes, true)
}

pub fn unpublish<S: ContentStore>(store: &mut S, indexes: &[DisplayIndex]) -> Result<CmdResult> {
    set_published(store, indexes, false)
}

fn set_published<S: ContentStore>(
    store: &mut S,
    indexes: &[DisplayIndex],
    published: bool,
) -> Result<CmdResult> {
    let resolved = resolve_indexes(store, indexes)?;
    let mut result = CmdResult::default();

    for (display_index, id) in resolved {
        let mut module = store.get_module(&id)?;

        if published && module.step_count == 0 {
            result.add_message(CmdMessage::warning(format!(
                "Publishing empty module ({}): {}",
                display_index, module.title
            )));
        }

        module.published = published;
        module.published_at = if published { Some(Utc::now()) } else { None };
        store.save_module(&module)?;

        let verb = if published { "published" } else { "unpublished" };
        result.add_message(CmdMessage::success(format!(
            "Module {} ({}): {}",
            verb, display_index, module.title
        )));
        result.affected_modules.push(module);
    }

    Ok(result)
}
