use crate::catalog::DisplayIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::ContentStore;

use super::helpers::resolve_indexes;

/// Permanently remove modules, their steps collections and progress records.
/// Refuses to act unless `skip_confirm` is set; the CLI passes it from a
/// `--yes` flag after prompting.
pub fn run<S: ContentStore>(
    store: &mut S,
    indexes: &[DisplayIndex],
    skip_confirm: bool,
) -> Result<CmdResult> {
    let resolved = resolve_indexes(store, indexes)?;
    let mut result = CmdResult::default();

    if !skip_confirm {
        result.add_message(CmdMessage::warning(format!(
            "Purge permanently removes {} module(s) and their study data. Re-run with --yes to confirm.",
            resolved.len()
        )));
        return Ok(result);
    }

    for (display_index, id) in resolved {
        let module = store.get_module(&id)?;
        store.remove_module(&id)?;
        result.add_message(CmdMessage::success(format!(
            "Module purged ({}): {}",
            display_index, module.title
        )));
        result.affected_modules.push(module);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::get::{ModuleFilter, ModuleStatusFilter};
    use crate::commands::{create, get, progress, step};
    use crate::model::StepBody;
    use crate::store::memory::InMemoryStore;
    use crate::store::ContentStore;

    #[test]
    fn purge_without_confirm_is_a_noop() {
        let mut store = InMemoryStore::new();
        create::run(&mut store, "Keep".into(), "".into(), "ada".into(), vec![]).unwrap();

        let result = run(&mut store, &[DisplayIndex::Regular(1)], false).unwrap();
        assert!(result.affected_modules.is_empty());
        assert_eq!(store.list_modules().unwrap().len(), 1);
    }

    #[test]
    fn purge_removes_module_steps_and_progress() {
        let mut store = InMemoryStore::new();
        create::run(&mut store, "Gone".into(), "".into(), "ada".into(), vec![]).unwrap();
        step::add(
            &mut store,
            &DisplayIndex::Regular(1),
            step::StepDraft {
                title: "Watch".into(),
                author: "ada".into(),
                body: StepBody::Video {
                    url: "https://example.com/v".into(),
                    duration_minutes: None,
                },
                optional: false,
                estimated_minutes: None,
            },
        )
        .unwrap();
        progress::complete(&mut store, "sam", &DisplayIndex::Regular(1), 1, None).unwrap();

        let module_id = store.list_modules().unwrap()[0].id;
        run(&mut store, &[DisplayIndex::Regular(1)], true).unwrap();

        assert!(store.list_modules().unwrap().is_empty());
        assert!(store.list_steps(&module_id).unwrap().is_empty());
        assert!(store.get_progress("sam", &module_id).unwrap().is_none());

        let all = get::run(
            &store,
            ModuleFilter {
                status: ModuleStatusFilter::All,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(all.listed_modules.is_empty());
    }
}
