use clap::Parser;
use directories::ProjectDirs;
use studyhall::api::{
    ConfigAction, ModuleFilter, ModuleStatusFilter, ModuleUpdate, StepDraft, StepEdit, StudyApi,
};
use studyhall::config::StudyConfig;
use studyhall::editor::{edit_content, EditorContent};
use studyhall::error::{Result, StudyError};
use studyhall::model::{QuizQuestion, QuizScore, StepBody};
use studyhall::store::fs::FileStore;
use std::path::PathBuf;

mod args;
mod cli;

use args::{Cli, Commands, JournalCommands, StepCommands};
use cli::print::{
    print_entries, print_full_modules, print_messages, print_modules, print_summary,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: StudyApi<FileStore>,
    user: String,
    import_extensions: Vec<String>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Create {
            title,
            description,
            tag,
            no_editor,
        }) => handle_create(&mut ctx, title, description, tag, no_editor),
        Some(Commands::List {
            search,
            tag,
            deleted,
            published,
            all,
        }) => handle_list(&ctx, search, tag, deleted, published, all),
        Some(Commands::View { indexes }) => handle_view(&ctx, indexes),
        Some(Commands::Update {
            index,
            title,
            description,
            tag,
            add_collaborator,
            remove_collaborator,
        }) => {
            let update = ModuleUpdate {
                title,
                description,
                tags: if tag.is_empty() { None } else { Some(tag) },
                add_collaborators: add_collaborator,
                remove_collaborators: remove_collaborator,
            };
            let result = ctx.api.update_module(&index, &update)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Delete { indexes }) => {
            let result = ctx.api.delete_modules(&indexes)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Restore { indexes }) => {
            let result = ctx.api.restore_modules(&indexes)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Publish { indexes }) => {
            let result = ctx.api.publish_modules(&indexes)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Unpublish { indexes }) => {
            let result = ctx.api.unpublish_modules(&indexes)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Purge { indexes, yes }) => {
            let result = ctx.api.purge_modules(&indexes, yes)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Step(step_cmd)) => handle_step(&mut ctx, step_cmd),
        Some(Commands::Complete {
            index,
            position,
            score,
        }) => {
            let score = score.as_deref().map(parse_score).transpose()?;
            let user = ctx.user.clone();
            let result = ctx.api.complete_step(&user, &index, position, score)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Progress { index }) => {
            let result = ctx.api.show_progress(&ctx.user, &index)?;
            print_messages(&result.messages);
            if let Some(summary) = &result.summary {
                print_summary(summary);
            }
            Ok(())
        }
        Some(Commands::Journal(journal_cmd)) => handle_journal(&mut ctx, journal_cmd),
        Some(Commands::Import { index, paths }) => {
            let user = ctx.user.clone();
            let exts = ctx.import_extensions.clone();
            let result = ctx.api.import_decks(&index, &user, paths, &exts)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Export { indexes }) => {
            let result = ctx.api.export_modules(&indexes)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Doctor) => {
            let result = ctx.api.doctor()?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Init) => {
            let result = ctx.api.init()?;
            print_messages(&result.messages);
            Ok(())
        }
        None => handle_list(&ctx, None, None, false, false, false),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let root = match std::env::var("STUDYHALL_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let proj_dirs = ProjectDirs::from("com", "studyhall", "studyhall")
                .ok_or_else(|| StudyError::Api("Could not determine data dir".into()))?;
            proj_dirs.data_dir().to_path_buf()
        }
    };

    let config = StudyConfig::load(&root).unwrap_or_default();
    let user = cli.user.clone().unwrap_or_else(|| config.default_user.clone());

    let store = FileStore::new(root.clone());
    let api = StudyApi::new(store, root);

    Ok(AppContext {
        api,
        user,
        import_extensions: config.import_extensions,
    })
}

fn handle_create(
    ctx: &mut AppContext,
    title: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    no_editor: bool,
) -> Result<()> {
    let (final_title, final_description) = if no_editor || title.is_some() {
        (title.unwrap_or_default(), description.unwrap_or_default())
    } else {
        let initial = EditorContent::new(title.unwrap_or_default(), description.unwrap_or_default());
        let edited = edit_content(&initial, ".md")?;
        (edited.title, edited.body)
    };

    if final_title.is_empty() {
        return Err(StudyError::Api("Title cannot be empty".into()));
    }

    let user = ctx.user.clone();
    let result = ctx
        .api
        .create_module(final_title, final_description, user, tags)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &AppContext,
    search: Option<String>,
    tag: Option<String>,
    deleted: bool,
    published: bool,
    all: bool,
) -> Result<()> {
    let status = if all {
        ModuleStatusFilter::All
    } else if deleted {
        ModuleStatusFilter::Deleted
    } else if published {
        ModuleStatusFilter::Published
    } else {
        ModuleStatusFilter::Active
    };

    let filter = ModuleFilter {
        status,
        search_term: search,
        tag,
    };

    let result = ctx.api.get_modules(filter)?;
    print_modules(&result.listed_modules);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, indexes: Vec<String>) -> Result<()> {
    let result = ctx.api.view_modules(&indexes)?;
    print_full_modules(&result.listed_modules, &result.steps);
    print_messages(&result.messages);
    Ok(())
}

fn handle_step(ctx: &mut AppContext, cmd: StepCommands) -> Result<()> {
    let user = ctx.user.clone();
    let result = match cmd {
        StepCommands::Video {
            index,
            title,
            url,
            duration,
            common,
        } => ctx.api.add_step(
            &index,
            StepDraft {
                title,
                author: user,
                body: StepBody::Video {
                    url,
                    duration_minutes: duration,
                },
                optional: common.optional,
                estimated_minutes: common.minutes,
            },
        )?,
        StepCommands::Quiz {
            index,
            title,
            question,
            common,
        } => {
            let questions: Result<Vec<QuizQuestion>> = question
                .iter()
                .map(|spec| studyhall::commands::step::parse_question_spec(spec))
                .collect();
            ctx.api.add_step(
                &index,
                StepDraft {
                    title,
                    author: user,
                    body: StepBody::Quiz {
                        questions: questions?,
                    },
                    optional: common.optional,
                    estimated_minutes: common.minutes,
                },
            )?
        }
        StepCommands::Cards {
            index,
            title,
            card,
            common,
        } => {
            let cards: Result<Vec<_>> = card
                .iter()
                .map(|spec| studyhall::commands::step::parse_card_spec(spec))
                .collect();
            ctx.api.add_step(
                &index,
                StepDraft {
                    title,
                    author: user,
                    body: StepBody::Flashcards { cards: cards? },
                    optional: common.optional,
                    estimated_minutes: common.minutes,
                },
            )?
        }
        StepCommands::Free {
            index,
            title,
            prompt,
            sample,
            max_length,
            common,
        } => ctx.api.add_step(
            &index,
            StepDraft {
                title,
                author: user,
                body: StepBody::FreeResponse {
                    prompt,
                    sample_answer: sample,
                    max_length,
                },
                optional: common.optional,
                estimated_minutes: common.minutes,
            },
        )?,
        StepCommands::Poll {
            index,
            title,
            prompt,
            option,
            common,
        } => ctx.api.add_step(
            &index,
            StepDraft {
                title,
                author: user,
                body: StepBody::Poll {
                    prompt,
                    options: studyhall::commands::step::poll_options(&option),
                },
                optional: common.optional,
                estimated_minutes: common.minutes,
            },
        )?,
        StepCommands::Resource {
            index,
            title,
            link,
            pdf,
            common,
        } => ctx.api.add_step(
            &index,
            StepDraft {
                title,
                author: user,
                body: StepBody::Resource { link, pdf },
                optional: common.optional,
                estimated_minutes: common.minutes,
            },
        )?,
        StepCommands::Edit {
            index,
            position,
            title,
            optional,
            required,
            minutes,
        } => {
            let optional = if optional {
                Some(true)
            } else if required {
                Some(false)
            } else {
                None
            };
            ctx.api.edit_step(
                &index,
                position,
                StepEdit {
                    title,
                    optional,
                    estimated_minutes: minutes,
                    body: None,
                },
            )?
        }
        StepCommands::Remove { index, position } => ctx.api.remove_step(&index, position)?,
        StepCommands::Move { index, from, to } => ctx.api.move_step(&index, from, to)?,
        StepCommands::Vote {
            index,
            position,
            option,
        } => ctx.api.vote_poll(&index, position, option)?,
    };

    print_messages(&result.messages);
    Ok(())
}

fn handle_journal(ctx: &mut AppContext, cmd: JournalCommands) -> Result<()> {
    let user = ctx.user.clone();
    match cmd {
        JournalCommands::Add { body, module } => {
            let body = match body {
                Some(body) => body,
                None => {
                    let edited = edit_content(&EditorContent::new(String::new(), String::new()), ".md")?;
                    let mut text = edited.title;
                    if !edited.body.is_empty() {
                        text.push_str("\n\n");
                        text.push_str(&edited.body);
                    }
                    text
                }
            };
            let result = ctx.api.add_journal_entry(&user, body, module.as_deref())?;
            print_messages(&result.messages);
        }
        JournalCommands::List => {
            let result = ctx.api.list_journal(&user)?;
            print_entries(&result.entries);
            print_messages(&result.messages);
        }
        JournalCommands::Edit { number, body } => {
            let body = match body {
                Some(body) => body,
                None => {
                    let entries = ctx.api.list_journal(&user)?.entries;
                    let current = entries
                        .get(number.wrapping_sub(1))
                        .map(|e| e.body.clone())
                        .unwrap_or_default();
                    let edited = edit_content(&EditorContent::new(String::new(), current), ".md")?;
                    let mut text = edited.title;
                    if !edited.body.is_empty() {
                        if !text.is_empty() {
                            text.push_str("\n\n");
                        }
                        text.push_str(&edited.body);
                    }
                    text
                }
            };
            let result = ctx.api.edit_journal_entry(&user, number, body)?;
            print_messages(&result.messages);
        }
        JournalCommands::Remove { number } => {
            let result = ctx.api.remove_journal_entry(&user, number)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        println!("default_user = {}", config.default_user);
        println!("import_extensions = {}", config.import_extensions.join(","));
    }
    print_messages(&result.messages);
    Ok(())
}

/// Parses a quiz score of the form "correct/total", e.g. "3/4".
fn parse_score(s: &str) -> Result<QuizScore> {
    let Some((correct, total)) = s.split_once('/') else {
        return Err(StudyError::Api(format!(
            "Score must be correct/total, e.g. 3/4: {}",
            s
        )));
    };
    let correct = correct
        .trim()
        .parse()
        .map_err(|_| StudyError::Api(format!("Invalid score: {}", s)))?;
    let total = total
        .trim()
        .parse()
        .map_err(|_| StudyError::Api(format!("Invalid score: {}", s)))?;
    Ok(QuizScore { correct, total })
}
