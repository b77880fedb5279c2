use crate::catalog::DisplayIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StudyError};
use crate::model::{Progress, QuizScore, StepBody};
use crate::store::ContentStore;
use chrono::Utc;

use super::helpers::{resolve_index, step_at_position};

/// What a student sees after `study progress`: counts over the module's
/// current steps, not over historical completions.
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    pub user: String,
    pub module_title: String,
    pub completed_required: usize,
    pub required_total: usize,
    pub completed_optional: usize,
    pub optional_total: usize,
    /// Percent of required steps completed, 100 when there are none.
    pub percent: u8,
    /// (step title, score) for every recorded quiz result
    pub quiz_results: Vec<(String, QuizScore)>,
}

/// Mark a step complete for a user, recording a quiz score where one applies.
pub fn complete<S: ContentStore>(
    store: &mut S,
    user: &str,
    module_index: &DisplayIndex,
    position: usize,
    score: Option<QuizScore>,
) -> Result<CmdResult> {
    let (display_index, module_id) = resolve_index(store, module_index)?;

    let step = step_at_position(store, &module_id, position)?;

    if let Some(score) = score {
        let StepBody::Quiz { questions } = &step.body else {
            return Err(StudyError::Api(format!(
                "Step {} is a {} step; scores only apply to quizzes",
                position,
                step.body.kind()
            )));
        };
        if score.correct > score.total {
            return Err(StudyError::Api(format!(
                "Score {}/{} has more correct answers than questions",
                score.correct, score.total
            )));
        }
        if score.total as usize != questions.len() {
            return Err(StudyError::Api(format!(
                "Quiz has {} questions but score is out of {}",
                questions.len(),
                score.total
            )));
        }
    }

    let mut record = store
        .get_progress(user, &module_id)?
        .unwrap_or_else(|| Progress::new(user.to_string(), module_id));

    let first_time = record.completed_steps.insert(step.id);
    if let Some(score) = score {
        record.quiz_scores.insert(step.id, score);
    }
    record.updated_at = Utc::now();
    store.save_progress(&record)?;

    let mut result = CmdResult::default();
    if first_time {
        result.add_message(CmdMessage::success(format!(
            "Completed step {} of module {}: {}",
            position, display_index, step.title
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "Step {} was already complete: {}",
            position, step.title
        )));
    }
    if let Some(score) = score {
        result.add_message(CmdMessage::info(format!(
            "Quiz score recorded: {}/{}",
            score.correct, score.total
        )));
    }
    Ok(result)
}

/// Summarize a user's progress through a module.
pub fn show<S: ContentStore>(
    store: &S,
    user: &str,
    module_index: &DisplayIndex,
) -> Result<CmdResult> {
    let (_, module_id) = resolve_index(store, module_index)?;

    let module = store.get_module(&module_id)?;
    let steps = store.list_steps(&module_id)?;
    let record = store.get_progress(user, &module_id)?;

    let completed: std::collections::HashSet<_> = record
        .as_ref()
        .map(|r| r.completed_steps.clone())
        .unwrap_or_default();

    let mut summary = ProgressSummary {
        user: user.to_string(),
        module_title: module.title.clone(),
        completed_required: 0,
        required_total: 0,
        completed_optional: 0,
        optional_total: 0,
        percent: 0,
        quiz_results: Vec::new(),
    };

    for step in &steps {
        if step.optional {
            summary.optional_total += 1;
            if completed.contains(&step.id) {
                summary.completed_optional += 1;
            }
        } else {
            summary.required_total += 1;
            if completed.contains(&step.id) {
                summary.completed_required += 1;
            }
        }
        if let Some(record) = &record {
            if let Some(score) = record.quiz_scores.get(&step.id) {
                summary.quiz_results.push((step.title.clone(), *score));
            }
        }
    }

    summary.percent = if summary.required_total == 0 {
        100
    } else {
        (summary.completed_required * 100 / summary.required_total) as u8
    };

    let mut result = CmdResult::default();
    if record.is_none() {
        result.add_message(CmdMessage::info(format!(
            "{} has not started {}",
            user, module.title
        )));
    }
    result.summary = Some(summary);
    Ok(result)
}
