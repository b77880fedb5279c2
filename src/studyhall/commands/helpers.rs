use crate::catalog::{index_modules, DisplayIndex, DisplayModule, ModuleSelector};
use crate::error::{Result, StudyError};
use crate::model::Step;
use crate::store::ContentStore;
use uuid::Uuid;

pub fn indexed_modules<S: ContentStore>(store: &S) -> Result<Vec<DisplayModule>> {
    let modules = store.list_modules()?;
    Ok(index_modules(modules))
}

pub fn resolve_indexes<S: ContentStore>(
    store: &S,
    indexes: &[DisplayIndex],
) -> Result<Vec<(DisplayIndex, Uuid)>> {
    let indexed = indexed_modules(store)?;

    indexes
        .iter()
        .map(|idx| {
            indexed
                .iter()
                .find(|dm| &dm.index == idx)
                .map(|dm| (idx.clone(), dm.module.id))
                .ok_or_else(|| StudyError::Api(format!("Index {} not found", idx)))
        })
        .collect()
}

/// Resolve a single display index to its module id.
pub fn resolve_index<S: ContentStore>(
    store: &S,
    index: &DisplayIndex,
) -> Result<(DisplayIndex, Uuid)> {
    let mut resolved = resolve_indexes(store, std::slice::from_ref(index))?;
    resolved
        .pop()
        .ok_or_else(|| StudyError::Api(format!("Index {} not found", index)))
}

pub fn modules_by_indexes<S: ContentStore>(
    store: &S,
    indexes: &[DisplayIndex],
) -> Result<Vec<DisplayModule>> {
    let resolved = resolve_indexes(store, indexes)?;
    let mut modules = Vec::with_capacity(resolved.len());
    for (index, id) in resolved {
        let module = store.get_module(&id)?;
        modules.push(DisplayModule { module, index });
    }
    Ok(modules)
}

/// Resolve selectors to concrete display indexes. Title selectors must match
/// exactly one module by case-insensitive substring.
pub fn selectors_to_indexes<S: ContentStore>(
    store: &S,
    selectors: &[ModuleSelector],
) -> Result<Vec<DisplayIndex>> {
    let mut indexes = Vec::with_capacity(selectors.len());
    for selector in selectors {
        match selector {
            ModuleSelector::Index(idx) => indexes.push(idx.clone()),
            ModuleSelector::Title(term) => {
                let term_lower = term.to_lowercase();
                let matched: Vec<_> = indexed_modules(store)?
                    .into_iter()
                    .filter(|dm| {
                        !matches!(dm.index, DisplayIndex::Published(_))
                            && dm.module.title.to_lowercase().contains(&term_lower)
                    })
                    .collect();
                match matched.len() {
                    0 => {
                        return Err(StudyError::Api(format!("No module matching \"{}\"", term)))
                    }
                    1 => indexes.push(matched[0].index.clone()),
                    n => {
                        return Err(StudyError::Api(format!(
                            "\"{}\" matches {} modules, pick an index",
                            term, n
                        )))
                    }
                }
            }
        }
    }
    Ok(indexes)
}

/// Resolve a 1-based step position within a module to the step itself.
pub fn step_at_position<S: ContentStore>(
    store: &S,
    module_id: &Uuid,
    position: usize,
) -> Result<Step> {
    let steps = store.list_steps(module_id)?;
    steps
        .into_iter()
        .find(|s| s.position == position)
        .ok_or_else(|| StudyError::Api(format!("No step at position {}", position)))
}

/// Rewrite a module's step positions to be dense (1..n), preserving order.
pub fn renumber_steps<S: ContentStore>(store: &mut S, module_id: &Uuid) -> Result<()> {
    let steps = store.list_steps(module_id)?;
    for (i, mut step) in steps.into_iter().enumerate() {
        let wanted = i + 1;
        if step.position != wanted {
            step.position = wanted;
            store.save_step(&step)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn resolve_index_errors_on_unknown_index() {
        let store = InMemoryStore::new();
        let err = resolve_index(&store, &DisplayIndex::Regular(1));
        assert!(err.is_err());
    }

    #[test]
    fn resolve_index_finds_module() {
        let mut store = InMemoryStore::new();
        create::run(&mut store, "Course".into(), "".into(), "ada".into(), vec![]).unwrap();

        let (index, id) = resolve_index(&store, &DisplayIndex::Regular(1)).unwrap();
        assert_eq!(index, DisplayIndex::Regular(1));
        assert_eq!(id, store.list_modules().unwrap()[0].id);
    }
}
