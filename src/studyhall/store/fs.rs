use super::{sort_steps, ContentStore, DoctorReport};
use crate::error::{Result, StudyError};
use crate::model::{JournalEntry, Module, Progress, Step};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const MODULES_FILE: &str = "modules.json";
const PROGRESS_FILE: &str = "progress.json";
const JOURNAL_FILE: &str = "journal.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn steps_filename(id: &Uuid) -> String {
        format!("steps-{}.json", id)
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(StudyError::Io)?;
        }
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned + Default>(&self, filename: &str) -> Result<T> {
        let path = self.root.join(filename);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(path).map_err(StudyError::Io)?;
        serde_json::from_str(&content).map_err(StudyError::Serialization)
    }

    fn write_json<T: serde::Serialize>(&self, filename: &str, value: &T) -> Result<()> {
        self.ensure_root()?;
        let content = serde_json::to_string_pretty(value).map_err(StudyError::Serialization)?;
        fs::write(self.root.join(filename), content).map_err(StudyError::Io)?;
        Ok(())
    }

    fn load_modules(&self) -> Result<HashMap<Uuid, Module>> {
        self.read_json(MODULES_FILE)
    }

    fn save_modules(&self, modules: &HashMap<Uuid, Module>) -> Result<()> {
        self.write_json(MODULES_FILE, modules)
    }

    fn load_steps(&self, module_id: &Uuid) -> Result<Vec<Step>> {
        self.read_json(&Self::steps_filename(module_id))
    }

    fn save_steps(&self, module_id: &Uuid, steps: &[Step]) -> Result<()> {
        self.write_json(&Self::steps_filename(module_id), &steps)
    }

    fn load_progress(&self) -> Result<HashMap<String, Progress>> {
        self.read_json(PROGRESS_FILE)
    }

    fn save_progress_map(&self, records: &HashMap<String, Progress>) -> Result<()> {
        self.write_json(PROGRESS_FILE, records)
    }

    fn load_journal(&self) -> Result<HashMap<Uuid, JournalEntry>> {
        self.read_json(JOURNAL_FILE)
    }

    fn save_journal(&self, entries: &HashMap<Uuid, JournalEntry>) -> Result<()> {
        self.write_json(JOURNAL_FILE, entries)
    }

    /// Re-derive the parent module's step count from its steps collection.
    /// Called after every step mutation so the counter cannot drift.
    fn refresh_step_count(&self, module_id: &Uuid, count: usize) -> Result<()> {
        let mut modules = self.load_modules()?;
        let module = modules
            .get_mut(module_id)
            .ok_or(StudyError::ModuleNotFound(*module_id))?;
        if module.step_count != count {
            module.step_count = count;
            self.save_modules(&modules)?;
        }
        Ok(())
    }
}

pub(crate) fn progress_key(user: &str, module_id: &Uuid) -> String {
    format!("{}/{}", user, module_id)
}

impl ContentStore for FileStore {
    fn save_module(&mut self, module: &Module) -> Result<()> {
        let mut modules = self.load_modules()?;
        modules.insert(module.id, module.clone());
        self.save_modules(&modules)
    }

    fn get_module(&self, id: &Uuid) -> Result<Module> {
        let modules = self.load_modules()?;
        modules
            .get(id)
            .cloned()
            .ok_or(StudyError::ModuleNotFound(*id))
    }

    fn list_modules(&self) -> Result<Vec<Module>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        Ok(self.load_modules()?.into_values().collect())
    }

    fn remove_module(&mut self, id: &Uuid) -> Result<()> {
        let mut modules = self.load_modules()?;
        if modules.remove(id).is_none() {
            return Err(StudyError::ModuleNotFound(*id));
        }
        self.save_modules(&modules)?;

        // One steps collection per module, so the whole thing goes at once.
        let steps_path = self.root.join(Self::steps_filename(id));
        if steps_path.exists() {
            fs::remove_file(steps_path).map_err(StudyError::Io)?;
        }

        self.remove_progress(id)
    }

    fn save_step(&mut self, step: &Step) -> Result<()> {
        // Refuse writes against a missing parent rather than creating an
        // orphaned collection.
        self.get_module(&step.module_id)?;

        let mut steps = self.load_steps(&step.module_id)?;
        if let Some(existing) = steps.iter_mut().find(|s| s.id == step.id) {
            *existing = step.clone();
        } else {
            steps.push(step.clone());
        }
        sort_steps(&mut steps);
        self.save_steps(&step.module_id, &steps)?;
        self.refresh_step_count(&step.module_id, steps.len())
    }

    fn get_step(&self, module_id: &Uuid, step_id: &Uuid) -> Result<Step> {
        let steps = self.load_steps(module_id)?;
        steps
            .into_iter()
            .find(|s| s.id == *step_id)
            .ok_or(StudyError::StepNotFound(*step_id))
    }

    fn list_steps(&self, module_id: &Uuid) -> Result<Vec<Step>> {
        let mut steps = self.load_steps(module_id)?;
        sort_steps(&mut steps);
        Ok(steps)
    }

    fn remove_step(&mut self, module_id: &Uuid, step_id: &Uuid) -> Result<()> {
        let mut steps = self.load_steps(module_id)?;
        let before = steps.len();
        steps.retain(|s| s.id != *step_id);
        if steps.len() == before {
            return Err(StudyError::StepNotFound(*step_id));
        }
        self.save_steps(module_id, &steps)?;
        self.refresh_step_count(module_id, steps.len())
    }

    fn save_progress(&mut self, record: &Progress) -> Result<()> {
        let mut records = self.load_progress()?;
        records.insert(
            progress_key(&record.user, &record.module_id),
            record.clone(),
        );
        self.save_progress_map(&records)
    }

    fn get_progress(&self, user: &str, module_id: &Uuid) -> Result<Option<Progress>> {
        let records = self.load_progress()?;
        Ok(records.get(&progress_key(user, module_id)).cloned())
    }

    fn remove_progress(&mut self, module_id: &Uuid) -> Result<()> {
        let mut records = self.load_progress()?;
        let before = records.len();
        records.retain(|_, r| r.module_id != *module_id);
        if records.len() != before {
            self.save_progress_map(&records)?;
        }
        Ok(())
    }

    fn save_entry(&mut self, entry: &JournalEntry) -> Result<()> {
        let mut entries = self.load_journal()?;
        entries.insert(entry.id, entry.clone());
        self.save_journal(&entries)
    }

    fn get_entry(&self, id: &Uuid) -> Result<JournalEntry> {
        let entries = self.load_journal()?;
        entries
            .get(id)
            .cloned()
            .ok_or(StudyError::EntryNotFound(*id))
    }

    fn list_entries(&self, user: &str) -> Result<Vec<JournalEntry>> {
        let entries = self.load_journal()?;
        Ok(entries
            .into_values()
            .filter(|e| e.user == user)
            .collect())
    }

    fn remove_entry(&mut self, id: &Uuid) -> Result<()> {
        let mut entries = self.load_journal()?;
        if entries.remove(id).is_none() {
            return Err(StudyError::EntryNotFound(*id));
        }
        self.save_journal(&entries)
    }

    fn doctor(&mut self) -> Result<DoctorReport> {
        let mut report = DoctorReport::default();
        if !self.root.exists() {
            return Ok(report);
        }

        // 1. Reconcile step counts written by older tooling
        let mut modules = self.load_modules()?;
        let mut dirty = false;
        for module in modules.values_mut() {
            let actual = self.read_json::<Vec<Step>>(&Self::steps_filename(&module.id))?.len();
            if module.step_count != actual {
                module.step_count = actual;
                report.fixed_step_counts += 1;
                dirty = true;
            }
        }
        if dirty {
            self.save_modules(&modules)?;
        }

        // 2. Drop steps collections whose parent module is gone
        for entry in fs::read_dir(&self.root).map_err(StudyError::Io)? {
            let entry = entry.map_err(StudyError::Io)?;
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(id_str) = name
                .strip_prefix("steps-")
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };
            let Ok(id) = Uuid::parse_str(id_str) else {
                continue;
            };
            if !modules.contains_key(&id) {
                fs::remove_file(entry.path()).map_err(StudyError::Io)?;
                report.orphaned_step_collections += 1;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StepBody;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn video_step(module_id: Uuid, title: &str, position: usize) -> Step {
        let mut step = Step::new(
            module_id,
            title.to_string(),
            "teacher".to_string(),
            StepBody::Video {
                url: "https://example.com/v".to_string(),
                duration_minutes: None,
            },
        );
        step.position = position;
        step
    }

    #[test]
    fn test_module_roundtrip_persists() {
        let (dir, mut store) = store();
        let module = Module::new("Course".into(), "About".into(), "ada".into());
        store.save_module(&module).unwrap();

        // A fresh store over the same root sees the same data
        let reopened = FileStore::new(dir.path().to_path_buf());
        let loaded = reopened.get_module(&module.id).unwrap();
        assert_eq!(loaded.title, "Course");
        assert_eq!(loaded.description, "About");
    }

    #[test]
    fn test_step_count_tracks_collection() {
        let (_dir, mut store) = store();
        let module = Module::new("Course".into(), String::new(), "ada".into());
        store.save_module(&module).unwrap();

        let a = video_step(module.id, "A", 1);
        let b = video_step(module.id, "B", 2);
        store.save_step(&a).unwrap();
        store.save_step(&b).unwrap();
        assert_eq!(store.get_module(&module.id).unwrap().step_count, 2);

        // Updating an existing step must not bump the count
        store.save_step(&a).unwrap();
        assert_eq!(store.get_module(&module.id).unwrap().step_count, 2);

        store.remove_step(&module.id, &a.id).unwrap();
        assert_eq!(store.get_module(&module.id).unwrap().step_count, 1);
    }

    #[test]
    fn test_save_step_requires_parent_module() {
        let (_dir, mut store) = store();
        let orphan = video_step(Uuid::new_v4(), "A", 1);
        assert!(store.save_step(&orphan).is_err());
    }

    #[test]
    fn test_remove_module_drops_steps_and_progress() {
        let (dir, mut store) = store();
        let module = Module::new("Course".into(), String::new(), "ada".into());
        store.save_module(&module).unwrap();
        store.save_step(&video_step(module.id, "A", 1)).unwrap();
        store
            .save_progress(&Progress::new("sam".into(), module.id))
            .unwrap();

        store.remove_module(&module.id).unwrap();

        assert!(!dir
            .path()
            .join(FileStore::steps_filename(&module.id))
            .exists());
        assert!(store.get_progress("sam", &module.id).unwrap().is_none());
    }

    #[test]
    fn test_doctor_fixes_stale_count_and_orphans() {
        let (dir, mut store) = store();
        let mut module = Module::new("Course".into(), String::new(), "ada".into());
        module.step_count = 7; // stale value from older tooling
        store.save_module(&module).unwrap();
        store.save_step(&video_step(module.id, "A", 1)).unwrap();

        // Force the stale count back in behind the store's back
        let mut modules = store.load_modules().unwrap();
        modules.get_mut(&module.id).unwrap().step_count = 7;
        store.save_modules(&modules).unwrap();

        // Orphaned collection with no parent module
        let ghost = Uuid::new_v4();
        std::fs::write(
            dir.path().join(FileStore::steps_filename(&ghost)),
            "[]",
        )
        .unwrap();

        let report = store.doctor().unwrap();
        assert_eq!(report.fixed_step_counts, 1);
        assert_eq!(report.orphaned_step_collections, 1);

        assert_eq!(store.get_module(&module.id).unwrap().step_count, 1);
        assert!(!dir.path().join(FileStore::steps_filename(&ghost)).exists());
    }

    #[test]
    fn test_progress_keyed_per_user() {
        let (_dir, mut store) = store();
        let module = Module::new("Course".into(), String::new(), "ada".into());
        store.save_module(&module).unwrap();

        store
            .save_progress(&Progress::new("sam".into(), module.id))
            .unwrap();

        assert!(store.get_progress("sam", &module.id).unwrap().is_some());
        assert!(store.get_progress("kim", &module.id).unwrap().is_none());
    }
}
