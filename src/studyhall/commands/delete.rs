use crate::catalog::DisplayIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::ContentStore;
use chrono::Utc;

use super::helpers::resolve_indexes;

/// Soft-delete: the module drops out of active and published listings but
/// keeps its steps until purged.
pub fn run<S: ContentStore>(store: &mut S, indexes: &[DisplayIndex]) -> Result<CmdResult> {
    let resolved = resolve_indexes(store, indexes)?;
    let mut result = CmdResult::default();

    for (display_index, id) in resolved {
        let mut module = store.get_module(&id)?;
        module.is_deleted = true;
        module.deleted_at = Some(Utc::now());
        module.published = false;
        module.published_at = None;
        store.save_module(&module)?;
        result.add_message(CmdMessage::success(format!(
            "Module deleted ({}): {}",
            display_index, module.title
        )));
        result.affected_modules.push(module);
    }

    Ok(result)
}

/// Bring a soft-deleted module back as a draft.
pub fn restore<S: ContentStore>(store: &mut S, indexes: &[DisplayIndex]) -> Result<CmdResult> {
    let resolved = resolve_indexes(store, indexes)?;
    let mut result = CmdResult::default();

    for (display_index, id) in resolved {
        let mut module = store.get_module(&id)?;
        module.is_deleted = false;
        module.deleted_at = None;
        store.save_module(&module)?;
        result.add_message(CmdMessage::success(format!(
            "Module restored ({}): {}",
            display_index, module.title
        )));
        result.affected_modules.push(module);
    }

    Ok(result)
}
