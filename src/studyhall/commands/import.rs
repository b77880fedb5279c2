use crate::catalog::DisplayIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StudyError};
use crate::model::{Flashcard, StepBody};
use crate::store::ContentStore;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use std::fs;
use std::path::{Path, PathBuf};

use super::step::{self, StepDraft};

/// Import Markdown flashcard decks as flashcards steps of a module.
///
/// Deck format: an optional `#` heading names the deck; every `##` heading is
/// a card front and the text below it (until the next heading) is the back.
pub fn run<S: ContentStore>(
    store: &mut S,
    module_index: &DisplayIndex,
    author: &str,
    paths: Vec<PathBuf>,
    import_exts: &[String],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut imported_count = 0;

    for path in paths {
        if path.is_dir() {
            let entries = fs::read_dir(&path).map_err(StudyError::Io)?;
            for entry in entries {
                let entry = entry.map_err(StudyError::Io)?;
                let sub_path = entry.path();
                if sub_path.is_file() {
                    if let Some(ext) = sub_path.extension() {
                        let ext_str = format!(".{}", ext.to_string_lossy());
                        if import_exts.contains(&ext_str) {
                            imported_count +=
                                import_file(store, module_index, author, &sub_path, &mut result)?;
                        }
                    }
                }
            }
        } else if path.is_file() {
            imported_count += import_file(store, module_index, author, &path, &mut result)?;
        } else {
            result.add_message(CmdMessage::warning(format!(
                "Path not found: {}",
                path.display()
            )));
        }
    }

    result.add_message(CmdMessage::success(format!(
        "Imported {} deck(s)",
        imported_count
    )));
    Ok(result)
}

fn import_file<S: ContentStore>(
    store: &mut S,
    module_index: &DisplayIndex,
    author: &str,
    path: &Path,
    result: &mut CmdResult,
) -> Result<usize> {
    let content = fs::read_to_string(path).map_err(StudyError::Io)?;
    let (deck_title, cards) = parse_deck(&content);

    if cards.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No cards found in {}",
            path.display()
        )));
        return Ok(0);
    }

    let title = deck_title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Imported deck".to_string())
    });

    let card_count = cards.len();
    let added = step::add(
        store,
        module_index,
        StepDraft {
            title,
            author: author.to_string(),
            body: StepBody::Flashcards { cards },
            optional: false,
            estimated_minutes: None,
        },
    )?;
    result.steps.extend(added.steps);
    result.add_message(CmdMessage::info(format!(
        "Imported {} card(s) from {}",
        card_count,
        path.display()
    )));
    Ok(1)
}

/// Parse a Markdown deck into (deck title, cards).
pub fn parse_deck(content: &str) -> (Option<String>, Vec<Flashcard>) {
    let mut title: Option<String> = None;
    let mut cards = Vec::new();

    let mut in_heading = false;
    let mut heading_level = HeadingLevel::H2;
    let mut heading_text = String::new();
    let mut front: Option<String> = None;
    let mut back = String::new();

    let mut flush = |front: &mut Option<String>, back: &mut String, cards: &mut Vec<Flashcard>| {
        if let Some(f) = front.take() {
            let b = back.trim().to_string();
            if !f.is_empty() && !b.is_empty() {
                cards.push(Flashcard { front: f, back: b });
            }
        }
        back.clear();
    };

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = true;
                heading_level = level;
                heading_text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                in_heading = false;
                let text = heading_text.trim().to_string();
                if heading_level == HeadingLevel::H1 && title.is_none() && front.is_none() {
                    title = Some(text);
                } else {
                    flush(&mut front, &mut back, &mut cards);
                    front = Some(text);
                }
            }
            Event::Text(t) | Event::Code(t) => {
                if in_heading {
                    heading_text.push_str(&t);
                } else if front.is_some() {
                    back.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if !in_heading && front.is_some() {
                    back.push(' ');
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if front.is_some() {
                    back.push('\n');
                }
            }
            _ => {}
        }
    }
    flush(&mut front, &mut back, &mut cards);

    (title, cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::store::memory::InMemoryStore;

    const DECK: &str = "\
# Plant Biology

## photosynthesis

Light energy to chemical energy.

## xylem

Water transport tissue.
";

    #[test]
    fn test_parse_deck() {
        let (title, cards) = parse_deck(DECK);
        assert_eq!(title.as_deref(), Some("Plant Biology"));
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "photosynthesis");
        assert_eq!(cards[0].back, "Light energy to chemical energy.");
        assert_eq!(cards[1].front, "xylem");
    }

    #[test]
    fn test_parse_deck_without_title() {
        let (title, cards) = parse_deck("## one\n\ntwo\n");
        assert!(title.is_none());
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_parse_deck_skips_empty_backs() {
        let (_, cards) = parse_deck("## front only\n\n## real\n\nback\n");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "real");
    }

    #[test]
    fn test_import_creates_flashcards_step() {
        let mut store = InMemoryStore::new();
        create::run(&mut store, "Course".into(), "".into(), "ada".into(), vec![]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let deck_path = dir.path().join("plants.md");
        fs::write(&deck_path, DECK).unwrap();

        let result = run(
            &mut store,
            &DisplayIndex::Regular(1),
            "ada",
            vec![deck_path],
            &[".md".to_string()],
        )
        .unwrap();

        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].title, "Plant Biology");

        let module = &store.list_modules().unwrap()[0];
        assert_eq!(module.step_count, 1);
    }

    #[test]
    fn test_import_directory_honors_extensions() {
        let mut store = InMemoryStore::new();
        create::run(&mut store, "Course".into(), "".into(), "ada".into(), vec![]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("deck.md"), DECK).unwrap();
        fs::write(dir.path().join("notes.txt"), "## not\n\na deck\n").unwrap();

        run(
            &mut store,
            &DisplayIndex::Regular(1),
            "ada",
            vec![dir.path().to_path_buf()],
            &[".md".to_string()],
        )
        .unwrap();

        let module = &store.list_modules().unwrap()[0];
        assert_eq!(module.step_count, 1);
    }
}
