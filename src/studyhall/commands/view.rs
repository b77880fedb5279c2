use crate::catalog::DisplayIndex;
use crate::commands::helpers::modules_by_indexes;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::ContentStore;

/// Fetch modules together with their ordered steps.
pub fn run<S: ContentStore>(store: &S, indexes: &[DisplayIndex]) -> Result<CmdResult> {
    let listed = modules_by_indexes(store, indexes)?;
    let mut result = CmdResult::default();

    for dm in &listed {
        let steps = store.list_steps(&dm.module.id)?;
        if steps.is_empty() {
            result.add_message(CmdMessage::info(format!(
                "{} has no steps yet",
                dm.module.title
            )));
        }
        result.steps.extend(steps);
    }
    result.listed_modules = listed;

    Ok(result)
}
