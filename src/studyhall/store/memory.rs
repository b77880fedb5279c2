use super::{sort_steps, ContentStore, DoctorReport};
use crate::error::{Result, StudyError};
use crate::model::{JournalEntry, Module, Progress, Step};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    modules: HashMap<Uuid, Module>,
    steps: HashMap<Uuid, Vec<Step>>,
    progress: HashMap<(String, Uuid), Progress>,
    entries: HashMap<Uuid, JournalEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn refresh_step_count(&mut self, module_id: &Uuid) -> Result<()> {
        let count = self.steps.get(module_id).map_or(0, Vec::len);
        let module = self
            .modules
            .get_mut(module_id)
            .ok_or(StudyError::ModuleNotFound(*module_id))?;
        module.step_count = count;
        Ok(())
    }
}

impl ContentStore for InMemoryStore {
    fn save_module(&mut self, module: &Module) -> Result<()> {
        self.modules.insert(module.id, module.clone());
        Ok(())
    }

    fn get_module(&self, id: &Uuid) -> Result<Module> {
        self.modules
            .get(id)
            .cloned()
            .ok_or(StudyError::ModuleNotFound(*id))
    }

    fn list_modules(&self) -> Result<Vec<Module>> {
        Ok(self.modules.values().cloned().collect())
    }

    fn remove_module(&mut self, id: &Uuid) -> Result<()> {
        if self.modules.remove(id).is_none() {
            return Err(StudyError::ModuleNotFound(*id));
        }
        self.steps.remove(id);
        self.progress.retain(|_, r| r.module_id != *id);
        Ok(())
    }

    fn save_step(&mut self, step: &Step) -> Result<()> {
        if !self.modules.contains_key(&step.module_id) {
            return Err(StudyError::ModuleNotFound(step.module_id));
        }
        let steps = self.steps.entry(step.module_id).or_default();
        if let Some(existing) = steps.iter_mut().find(|s| s.id == step.id) {
            *existing = step.clone();
        } else {
            steps.push(step.clone());
        }
        sort_steps(steps);
        self.refresh_step_count(&step.module_id)
    }

    fn get_step(&self, module_id: &Uuid, step_id: &Uuid) -> Result<Step> {
        self.steps
            .get(module_id)
            .and_then(|steps| steps.iter().find(|s| s.id == *step_id))
            .cloned()
            .ok_or(StudyError::StepNotFound(*step_id))
    }

    fn list_steps(&self, module_id: &Uuid) -> Result<Vec<Step>> {
        let mut steps = self.steps.get(module_id).cloned().unwrap_or_default();
        sort_steps(&mut steps);
        Ok(steps)
    }

    fn remove_step(&mut self, module_id: &Uuid, step_id: &Uuid) -> Result<()> {
        let steps = self
            .steps
            .get_mut(module_id)
            .ok_or(StudyError::StepNotFound(*step_id))?;
        let before = steps.len();
        steps.retain(|s| s.id != *step_id);
        if steps.len() == before {
            return Err(StudyError::StepNotFound(*step_id));
        }
        self.refresh_step_count(module_id)
    }

    fn save_progress(&mut self, record: &Progress) -> Result<()> {
        self.progress
            .insert((record.user.clone(), record.module_id), record.clone());
        Ok(())
    }

    fn get_progress(&self, user: &str, module_id: &Uuid) -> Result<Option<Progress>> {
        Ok(self.progress.get(&(user.to_string(), *module_id)).cloned())
    }

    fn remove_progress(&mut self, module_id: &Uuid) -> Result<()> {
        self.progress.retain(|_, r| r.module_id != *module_id);
        Ok(())
    }

    fn save_entry(&mut self, entry: &JournalEntry) -> Result<()> {
        self.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    fn get_entry(&self, id: &Uuid) -> Result<JournalEntry> {
        self.entries
            .get(id)
            .cloned()
            .ok_or(StudyError::EntryNotFound(*id))
    }

    fn list_entries(&self, user: &str) -> Result<Vec<JournalEntry>> {
        Ok(self
            .entries
            .values()
            .filter(|e| e.user == user)
            .cloned()
            .collect())
    }

    fn remove_entry(&mut self, id: &Uuid) -> Result<()> {
        if self.entries.remove(id).is_none() {
            return Err(StudyError::EntryNotFound(*id));
        }
        Ok(())
    }

    fn doctor(&mut self) -> Result<DoctorReport> {
        let mut report = DoctorReport::default();

        for (id, module) in self.modules.iter_mut() {
            let actual = self.steps.get(id).map_or(0, Vec::len);
            if module.step_count != actual {
                module.step_count = actual;
                report.fixed_step_counts += 1;
            }
        }

        let module_ids: Vec<Uuid> = self
            .steps
            .keys()
            .filter(|id| !self.modules.contains_key(id))
            .copied()
            .collect();
        for id in module_ids {
            self.steps.remove(&id);
            report.orphaned_step_collections += 1;
        }

        Ok(report)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::StepBody;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_modules(mut self, count: usize) -> Self {
            for i in 0..count {
                let module = Module::new(
                    format!("Test Module {}", i + 1),
                    format!("Description for module {}", i + 1),
                    "teacher".to_string(),
                );
                self.store.save_module(&module).unwrap();
            }
            self
        }

        pub fn with_published_module(mut self, title: &str) -> Self {
            let mut module =
                Module::new(title.to_string(), String::new(), "teacher".to_string());
            module.published = true;
            module.published_at = Some(chrono::Utc::now());
            self.store.save_module(&module).unwrap();
            self
        }

        pub fn with_deleted_module(mut self, title: &str) -> Self {
            let mut module =
                Module::new(title.to_string(), String::new(), "teacher".to_string());
            module.is_deleted = true;
            module.deleted_at = Some(chrono::Utc::now());
            self.store.save_module(&module).unwrap();
            self
        }

        pub fn with_video_step(mut self, module_id: Uuid, title: &str, position: usize) -> Self {
            let mut step = Step::new(
                module_id,
                title.to_string(),
                "teacher".to_string(),
                StepBody::Video {
                    url: "https://example.com/video".to_string(),
                    duration_minutes: Some(5),
                },
            );
            step.position = position;
            self.store.save_step(&step).unwrap();
            self
        }
    }
}
