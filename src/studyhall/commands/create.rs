use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StudyError};
use crate::model::Module;
use crate::store::ContentStore;

pub fn run<S: ContentStore>(
    store: &mut S,
    title: String,
    description: String,
    owner: String,
    tags: Vec<String>,
) -> Result<CmdResult> {
    if title.trim().is_empty() {
        return Err(StudyError::Api("Title cannot be empty".into()));
    }

    let mut module = Module::new(title, description, owner);
    module.tags = tags;
    store.save_module(&module)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Module created: {}",
        module.title
    )));
    result.affected_modules.push(module);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn creates_a_draft_module() {
        let mut store = InMemoryStore::new();
        let result = run(
            &mut store,
            "Intro to Soil".into(),
            "Dirt, but scientific".into(),
            "ada".into(),
            vec!["biology".into()],
        )
        .unwrap();

        assert_eq!(result.affected_modules.len(), 1);
        let module = &result.affected_modules[0];
        assert!(!module.published);
        assert_eq!(module.owner, "ada");
        assert_eq!(module.step_count, 0);

        let stored = store.get_module(&module.id).unwrap();
        assert_eq!(stored.title, "Intro to Soil");
        assert_eq!(stored.tags, vec!["biology".to_string()]);
    }

    #[test]
    fn rejects_empty_title() {
        let mut store = InMemoryStore::new();
        let err = run(&mut store, "  ".into(), "".into(), "ada".into(), vec![]);
        assert!(err.is_err());
    }
}
