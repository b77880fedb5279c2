use crate::catalog::DisplayIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StudyError};
use crate::model::JournalEntry;
use crate::store::ContentStore;
use chrono::Utc;

use super::helpers::resolve_indexes;

/// Add a journal entry, optionally linked to a module. Module-linked entries
/// become read-only once written.
pub fn add<S: ContentStore>(
    store: &mut S,
    user: &str,
    body: String,
    module_index: Option<&DisplayIndex>,
) -> Result<CmdResult> {
    if body.trim().is_empty() {
        return Err(StudyError::Api("Journal entry cannot be empty".into()));
    }

    let module_id = match module_index {
        Some(idx) => {
            let resolved = resolve_indexes(store, std::slice::from_ref(idx))?;
            Some(resolved[0].1)
        }
        None => None,
    };

    let entry = JournalEntry::new(user.to_string(), module_id, body);
    store.save_entry(&entry)?;

    let mut result = CmdResult::default();
    let note = if module_id.is_some() {
        "Journal entry added (module-linked, read-only)"
    } else {
        "Journal entry added"
    };
    result.add_message(CmdMessage::success(note));
    result.entries.push(entry);
    Ok(result)
}

/// List a user's entries, newest first.
pub fn list<S: ContentStore>(store: &S, user: &str) -> Result<CmdResult> {
    let mut entries = store.list_entries(user)?;
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(CmdResult::default().with_entries(entries))
}

fn entry_at<S: ContentStore>(store: &S, user: &str, number: usize) -> Result<JournalEntry> {
    let mut entries = store.list_entries(user)?;
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    entries
        .into_iter()
        .nth(number.wrapping_sub(1))
        .ok_or_else(|| StudyError::Api(format!("No journal entry {}", number)))
}

/// Rewrite the body of entry `number` (1-based, newest first). Module-linked
/// entries are read-only and refused here.
pub fn edit<S: ContentStore>(
    store: &mut S,
    user: &str,
    number: usize,
    body: String,
) -> Result<CmdResult> {
    if body.trim().is_empty() {
        return Err(StudyError::Api("Journal entry cannot be empty".into()));
    }

    let mut entry = entry_at(store, user, number)?;
    if entry.module_id.is_some() {
        return Err(StudyError::Api(
            "Module-linked journal entries are read-only".into(),
        ));
    }

    entry.body = body;
    entry.updated_at = Utc::now();
    store.save_entry(&entry)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Journal entry {} updated", number)));
    result.entries.push(entry);
    Ok(result)
}

pub fn remove<S: ContentStore>(store: &mut S, user: &str, number: usize) -> Result<CmdResult> {
    let entry = entry_at(store, user, number)?;
    store.remove_entry(&entry.id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Journal entry {} removed", number)));
    result.entries.push(entry);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn add_and_list_newest_first() {
        let mut store = InMemoryStore::new();
        add(&mut store, "sam", "first thought".into(), None).unwrap();
        add(&mut store, "sam", "second thought".into(), None).unwrap();

        let result = list(&store, "sam").unwrap();
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].body, "second thought");
    }

    #[test]
    fn entries_are_per_user() {
        let mut store = InMemoryStore::new();
        add(&mut store, "sam", "mine".into(), None).unwrap();

        let result = list(&store, "kim").unwrap();
        assert!(result.entries.is_empty());
    }

    #[test]
    fn free_form_entries_can_be_edited() {
        let mut store = InMemoryStore::new();
        add(&mut store, "sam", "draft".into(), None).unwrap();
        edit(&mut store, "sam", 1, "revised".into()).unwrap();

        let result = list(&store, "sam").unwrap();
        assert_eq!(result.entries[0].body, "revised");
    }

    #[test]
    fn module_linked_entries_are_read_only() {
        let mut store = InMemoryStore::new();
        create::run(&mut store, "Course".into(), "".into(), "ada".into(), vec![]).unwrap();
        add(
            &mut store,
            "sam",
            "reflection".into(),
            Some(&DisplayIndex::Regular(1)),
        )
        .unwrap();

        let err = edit(&mut store, "sam", 1, "rewrite".into());
        assert!(err.is_err());

        // but they can still be removed
        remove(&mut store, "sam", 1).unwrap();
        assert!(list(&store, "sam").unwrap().entries.is_empty());
    }

    #[test]
    fn empty_body_is_an_error() {
        let mut store = InMemoryStore::new();
        assert!(add(&mut store, "sam", "  ".into(), None).is_err());
    }
}
