use crate::catalog::DisplayIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StudyError};
use crate::model::{Flashcard, PollOption, QuizQuestion, Step, StepBody};
use crate::store::ContentStore;

use super::helpers::{renumber_steps, resolve_index, step_at_position};

/// Author input for a new step. Position is assigned on insert.
#[derive(Debug, Clone)]
pub struct StepDraft {
    pub title: String,
    pub author: String,
    pub body: StepBody,
    pub optional: bool,
    pub estimated_minutes: Option<u32>,
}

/// Field edits for one step. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct StepEdit {
    pub title: Option<String>,
    pub optional: Option<bool>,
    pub estimated_minutes: Option<u32>,
    pub body: Option<StepBody>,
}

/// Append a step to the end of a module.
pub fn add<S: ContentStore>(
    store: &mut S,
    module_index: &DisplayIndex,
    draft: StepDraft,
) -> Result<CmdResult> {
    if draft.title.trim().is_empty() {
        return Err(StudyError::Api("Step title cannot be empty".into()));
    }
    validate_body(&draft.body)?;

    let (display_index, module_id) = resolve_index(store, module_index)?;
    let existing = store.list_steps(&module_id)?;

    let mut step = Step::new(module_id, draft.title, draft.author, draft.body);
    step.position = existing.len() + 1;
    step.optional = draft.optional;
    step.estimated_minutes = draft.estimated_minutes;
    store.save_step(&step)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added {} step at position {} of module {}: {}",
        step.kind(),
        step.position,
        display_index,
        step.title
    )));
    result.steps.push(step);
    Ok(result)
}

/// Edit a step addressed by its position.
pub fn edit<S: ContentStore>(
    store: &mut S,
    module_index: &DisplayIndex,
    position: usize,
    edit: StepEdit,
) -> Result<CmdResult> {
    let (display_index, module_id) = resolve_index(store, module_index)?;
    let mut step = step_at_position(store, &module_id, position)?;

    if let Some(title) = edit.title {
        if title.trim().is_empty() {
            return Err(StudyError::Api("Step title cannot be empty".into()));
        }
        step.title = title;
    }
    if let Some(optional) = edit.optional {
        step.optional = optional;
    }
    if let Some(minutes) = edit.estimated_minutes {
        step.estimated_minutes = Some(minutes);
    }
    if let Some(body) = edit.body {
        validate_body(&body)?;
        if body.kind() != step.body.kind() {
            return Err(StudyError::Api(format!(
                "Cannot change step kind from {} to {}",
                step.body.kind(),
                body.kind()
            )));
        }
        step.body = body;
    }

    step.updated_at = chrono::Utc::now();
    store.save_step(&step)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated step {} of module {}: {}",
        position, display_index, step.title
    )));
    result.steps.push(step);
    Ok(result)
}

/// Remove a step and close the gap in positions.
pub fn remove<S: ContentStore>(
    store: &mut S,
    module_index: &DisplayIndex,
    position: usize,
) -> Result<CmdResult> {
    let (display_index, module_id) = resolve_index(store, module_index)?;
    let step = step_at_position(store, &module_id, position)?;

    store.remove_step(&module_id, &step.id)?;
    renumber_steps(store, &module_id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Removed step {} of module {}: {}",
        position, display_index, step.title
    )));
    result.steps.push(step);
    Ok(result)
}

/// Move a step to a new 1-based position, shifting its neighbors.
pub fn move_to<S: ContentStore>(
    store: &mut S,
    module_index: &DisplayIndex,
    from: usize,
    to: usize,
) -> Result<CmdResult> {
    let (display_index, module_id) = resolve_index(store, module_index)?;
    let mut steps = store.list_steps(&module_id)?;

    if from == 0 || from > steps.len() {
        return Err(StudyError::Api(format!("No step at position {}", from)));
    }
    if to == 0 || to > steps.len() {
        return Err(StudyError::Api(format!(
            "Target position {} out of range (1-{})",
            to,
            steps.len()
        )));
    }

    let moved = steps.remove(from - 1);
    let title = moved.title.clone();
    steps.insert(to - 1, moved);

    for (i, step) in steps.iter_mut().enumerate() {
        let wanted = i + 1;
        if step.position != wanted {
            step.position = wanted;
            store.save_step(step)?;
        }
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Moved step {} -> {} in module {}: {}",
        from, to, display_index, title
    )));
    Ok(result)
}

/// Record one vote for a poll step option (1-based).
pub fn vote<S: ContentStore>(
    store: &mut S,
    module_index: &DisplayIndex,
    position: usize,
    option: usize,
) -> Result<CmdResult> {
    let (_, module_id) = resolve_index(store, module_index)?;
    let mut step = step_at_position(store, &module_id, position)?;

    let StepBody::Poll { options, .. } = &mut step.body else {
        return Err(StudyError::Api(format!(
            "Step {} is a {} step, not a poll",
            position,
            step.body.kind()
        )));
    };

    let opt = options.get_mut(option.wrapping_sub(1)).ok_or_else(|| {
        StudyError::Api(format!("Poll has no option {}", option))
    })?;
    opt.votes += 1;
    let label = opt.label.clone();
    let votes = opt.votes;

    store.save_step(&step)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Voted for \"{}\" ({} votes)",
        label, votes
    )));
    result.steps.push(step);
    Ok(result)
}

fn validate_body(body: &StepBody) -> Result<()> {
    match body {
        StepBody::Video { url, .. } => {
            if url.trim().is_empty() {
                return Err(StudyError::Api("Video step needs a url".into()));
            }
        }
        StepBody::Quiz { questions } => {
            if questions.is_empty() {
                return Err(StudyError::Api("Quiz step needs at least one question".into()));
            }
            for q in questions {
                if q.choices.len() < 2 {
                    return Err(StudyError::Api(format!(
                        "Question \"{}\" needs at least two choices",
                        q.prompt
                    )));
                }
                if q.correct >= q.choices.len() {
                    return Err(StudyError::Api(format!(
                        "Question \"{}\" marks choice {} correct but has only {} choices",
                        q.prompt,
                        q.correct + 1,
                        q.choices.len()
                    )));
                }
            }
        }
        StepBody::Flashcards { cards } => {
            if cards.is_empty() {
                return Err(StudyError::Api("Flashcards step needs at least one card".into()));
            }
        }
        StepBody::FreeResponse { prompt, .. } => {
            if prompt.trim().is_empty() {
                return Err(StudyError::Api("Free response step needs a prompt".into()));
            }
        }
        StepBody::Poll { options, .. } => {
            if options.len() < 2 {
                return Err(StudyError::Api("Poll step needs at least two options".into()));
            }
        }
        StepBody::Resource { link, pdf } => {
            if link.is_none() && pdf.is_none() {
                return Err(StudyError::Api(
                    "Resource step needs a link or a pdf".into(),
                ));
            }
        }
    }
    Ok(())
}

/// Parses a quiz question spec string: `prompt|choice|choice[|choice...]|N`
/// where N is the 1-based number of the correct choice.
pub fn parse_question_spec(spec: &str) -> Result<QuizQuestion> {
    let parts: Vec<&str> = spec.split('|').map(str::trim).collect();
    if parts.len() < 4 {
        return Err(StudyError::Api(format!(
            "Question spec needs prompt, two choices and the correct number: {}",
            spec
        )));
    }

    let prompt = parts[0].to_string();
    let correct_str = parts[parts.len() - 1];
    let choices: Vec<String> = parts[1..parts.len() - 1]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let correct: usize = correct_str.parse().map_err(|_| {
        StudyError::Api(format!("Correct choice must be a number: {}", correct_str))
    })?;
    if correct == 0 || correct > choices.len() {
        return Err(StudyError::Api(format!(
            "Correct choice {} out of range (1-{})",
            correct,
            choices.len()
        )));
    }

    Ok(QuizQuestion {
        prompt,
        choices,
        correct: correct - 1,
        explanation: None,
    })
}

/// Parses a flashcard spec string: `front|back`.
pub fn parse_card_spec(spec: &str) -> Result<Flashcard> {
    let Some((front, back)) = spec.split_once('|') else {
        return Err(StudyError::Api(format!(
            "Card spec needs front and back separated by |: {}",
            spec
        )));
    };
    let front = front.trim();
    let back = back.trim();
    if front.is_empty() || back.is_empty() {
        return Err(StudyError::Api(
            "Card front and back cannot be empty".into(),
        ));
    }
    Ok(Flashcard {
        front: front.to_string(),
        back: back.to_string(),
    })
}

/// Builds poll options from labels.
pub fn poll_options(labels: &[String]) -> Vec<PollOption> {
    labels
        .iter()
        .map(|label| PollOption {
            label: label.clone(),
            votes: 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::store::memory::InMemoryStore;

    fn seeded_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        create::run(&mut store, "Course".into(), "".into(), "ada".into(), vec![]).unwrap();
        store
    }

    fn video_draft(title: &str) -> StepDraft {
        StepDraft {
            title: title.into(),
            author: "ada".into(),
            body: StepBody::Video {
                url: "https://example.com/v".into(),
                duration_minutes: Some(3),
            },
            optional: false,
            estimated_minutes: Some(5),
        }
    }

    #[test]
    fn add_appends_and_counts() {
        let mut store = seeded_store();
        add(&mut store, &DisplayIndex::Regular(1), video_draft("A")).unwrap();
        add(&mut store, &DisplayIndex::Regular(1), video_draft("B")).unwrap();

        let module = &store.list_modules().unwrap()[0];
        assert_eq!(module.step_count, 2);

        let steps = store.list_steps(&module.id).unwrap();
        assert_eq!(steps[0].title, "A");
        assert_eq!(steps[0].position, 1);
        assert_eq!(steps[1].title, "B");
        assert_eq!(steps[1].position, 2);
    }

    #[test]
    fn remove_renumbers_and_counts() {
        let mut store = seeded_store();
        for t in ["A", "B", "C"] {
            add(&mut store, &DisplayIndex::Regular(1), video_draft(t)).unwrap();
        }

        remove(&mut store, &DisplayIndex::Regular(1), 2).unwrap();

        let module = &store.list_modules().unwrap()[0];
        assert_eq!(module.step_count, 2);

        let steps = store.list_steps(&module.id).unwrap();
        let titles: Vec<_> = steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        let positions: Vec<_> = steps.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn move_shifts_neighbors() {
        let mut store = seeded_store();
        for t in ["A", "B", "C"] {
            add(&mut store, &DisplayIndex::Regular(1), video_draft(t)).unwrap();
        }

        move_to(&mut store, &DisplayIndex::Regular(1), 3, 1).unwrap();

        let module_id = store.list_modules().unwrap()[0].id;
        let titles: Vec<_> = store
            .list_steps(&module_id)
            .unwrap()
            .iter()
            .map(|s| s.title.clone())
            .collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn move_out_of_range_is_an_error() {
        let mut store = seeded_store();
        add(&mut store, &DisplayIndex::Regular(1), video_draft("A")).unwrap();

        assert!(move_to(&mut store, &DisplayIndex::Regular(1), 1, 2).is_err());
        assert!(move_to(&mut store, &DisplayIndex::Regular(1), 0, 1).is_err());
    }

    #[test]
    fn edit_cannot_change_kind() {
        let mut store = seeded_store();
        add(&mut store, &DisplayIndex::Regular(1), video_draft("A")).unwrap();

        let err = edit(
            &mut store,
            &DisplayIndex::Regular(1),
            1,
            StepEdit {
                body: Some(StepBody::Poll {
                    prompt: "?".into(),
                    options: poll_options(&["a".into(), "b".into()]),
                }),
                ..Default::default()
            },
        );
        assert!(err.is_err());
    }

    #[test]
    fn vote_increments_option() {
        let mut store = seeded_store();
        add(
            &mut store,
            &DisplayIndex::Regular(1),
            StepDraft {
                title: "Favorite".into(),
                author: "ada".into(),
                body: StepBody::Poll {
                    prompt: "Pick one".into(),
                    options: poll_options(&["tabs".into(), "spaces".into()]),
                },
                optional: true,
                estimated_minutes: None,
            },
        )
        .unwrap();

        vote(&mut store, &DisplayIndex::Regular(1), 1, 2).unwrap();
        vote(&mut store, &DisplayIndex::Regular(1), 1, 2).unwrap();

        let module_id = store.list_modules().unwrap()[0].id;
        let steps = store.list_steps(&module_id).unwrap();
        let StepBody::Poll { options, .. } = &steps[0].body else {
            panic!("expected poll");
        };
        assert_eq!(options[0].votes, 0);
        assert_eq!(options[1].votes, 2);
    }

    #[test]
    fn vote_on_non_poll_is_an_error() {
        let mut store = seeded_store();
        add(&mut store, &DisplayIndex::Regular(1), video_draft("A")).unwrap();
        assert!(vote(&mut store, &DisplayIndex::Regular(1), 1, 1).is_err());
    }

    #[test]
    fn quiz_validation_rejects_bad_correct_index() {
        let mut store = seeded_store();
        let err = add(
            &mut store,
            &DisplayIndex::Regular(1),
            StepDraft {
                title: "Quiz".into(),
                author: "ada".into(),
                body: StepBody::Quiz {
                    questions: vec![QuizQuestion {
                        prompt: "?".into(),
                        choices: vec!["a".into(), "b".into()],
                        correct: 2,
                        explanation: None,
                    }],
                },
                optional: false,
                estimated_minutes: None,
            },
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_question_spec() {
        let q = parse_question_spec("What is 2+2?|3|4|5|2").unwrap();
        assert_eq!(q.prompt, "What is 2+2?");
        assert_eq!(q.choices, vec!["3", "4", "5"]);
        assert_eq!(q.correct, 1);

        assert!(parse_question_spec("too|short|1").is_err());
        assert!(parse_question_spec("p|a|b|nope").is_err());
        assert!(parse_question_spec("p|a|b|0").is_err());
        assert!(parse_question_spec("p|a|b|3").is_err());
    }

    #[test]
    fn test_parse_card_spec() {
        let card = parse_card_spec("photosynthesis | light to sugar").unwrap();
        assert_eq!(card.front, "photosynthesis");
        assert_eq!(card.back, "light to sugar");

        assert!(parse_card_spec("no separator").is_err());
        assert!(parse_card_spec("front|").is_err());
    }
}
