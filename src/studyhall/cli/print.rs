use chrono::{DateTime, Utc};
use colored::Colorize;
use studyhall::api::{CmdMessage, MessageLevel};
use studyhall::catalog::{DisplayIndex, DisplayModule};
use studyhall::commands::progress::ProgressSummary;
use studyhall::model::{JournalEntry, Step, StepBody};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::styles;

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const PUBLISHED_MARKER: &str = "◉";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_modules(modules: &[DisplayModule]) {
    if modules.is_empty() {
        println!("No modules found.");
        return;
    }

    let has_published = modules
        .iter()
        .any(|dm| matches!(dm.index, DisplayIndex::Published(_)));
    if has_published {
        println!();
    }

    let mut last_was_published = false;
    for dm in modules {
        let is_published_entry = matches!(dm.index, DisplayIndex::Published(_));

        if last_was_published && !is_published_entry {
            println!();
        }
        last_was_published = is_published_entry;

        let idx_str = format!("{}. ", dm.index);

        let left_prefix = if is_published_entry {
            format!("  {} ", PUBLISHED_MARKER)
        } else {
            "    ".to_string()
        };
        let left_prefix_width = left_prefix.width();

        let right_suffix = if dm.module.published && !is_published_entry {
            format!("{} ", PUBLISHED_MARKER)
        } else {
            "  ".to_string()
        };
        let right_suffix_width = right_suffix.width();

        let time_ago = format_time_ago(dm.module.created_at);

        let steps_note = match dm.module.step_count {
            0 => String::new(),
            1 => " (1 step)".to_string(),
            n => format!(" ({} steps)", n),
        };
        let description_preview: String = dm
            .module
            .description
            .chars()
            .take(50)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let title_content = if description_preview.is_empty() {
            format!("{}{}", dm.module.title, steps_note)
        } else {
            format!("{}{} {}", dm.module.title, steps_note, description_preview)
        };

        let idx_width = idx_str.width();
        let fixed_width = left_prefix_width + idx_width + right_suffix_width + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);

        let title_display = truncate_to_width(&title_content, available);

        let content_width = title_display.width();
        let padding = available.saturating_sub(content_width);

        let idx_style = match dm.index {
            DisplayIndex::Published(_) => &styles::INDEX_PUBLISHED,
            DisplayIndex::Deleted(_) => &styles::INDEX_DELETED,
            DisplayIndex::Regular(_) => &styles::INDEX_REGULAR,
        };

        println!(
            "{}{}{}{}{}{}",
            left_prefix,
            idx_style.apply_to(idx_str),
            title_display,
            " ".repeat(padding),
            right_suffix,
            styles::TIME.apply_to(time_ago)
        );
    }
}

pub fn print_full_modules(modules: &[DisplayModule], steps: &[Step]) {
    for (i, dm) in modules.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {}",
            styles::INDEX_PUBLISHED.apply_to(dm.index.to_string()),
            styles::TITLE.apply_to(&dm.module.title)
        );
        if !dm.module.description.is_empty() {
            println!("{}", dm.module.description);
        }
        if !dm.module.tags.is_empty() {
            println!("{}", format!("tags: {}", dm.module.tags.join(", ")).dimmed());
        }
        println!("--------------------------------");

        for step in steps.iter().filter(|s| s.module_id == dm.module.id) {
            print_step(step);
        }
    }
}

fn print_step(step: &Step) {
    let optional_note = if step.optional {
        styles::OPTIONAL.apply_to(" [optional]").to_string()
    } else {
        String::new()
    };
    let minutes_note = match step.estimated_minutes {
        Some(m) => styles::OPTIONAL.apply_to(format!(" ~{}min", m)).to_string(),
        None => String::new(),
    };
    println!(
        "{:>3}. {} {}{}{}",
        step.position,
        styles::STEP_KIND.apply_to(format!("[{}]", step.kind())),
        step.title,
        optional_note,
        minutes_note
    );

    match &step.body {
        StepBody::Video { url, duration_minutes } => {
            match duration_minutes {
                Some(d) => println!("     {} ({} min)", url, d),
                None => println!("     {}", url),
            };
        }
        StepBody::Quiz { questions } => {
            println!(
                "     {} question(s)",
                questions.len()
            );
        }
        StepBody::Flashcards { cards } => {
            println!("     {} card(s)", cards.len());
        }
        StepBody::FreeResponse { prompt, .. } => {
            println!("     {}", prompt);
        }
        StepBody::Poll { prompt, options } => {
            println!("     {}", prompt);
            for (i, opt) in options.iter().enumerate() {
                println!("       {}. {} ({} votes)", i + 1, opt.label, opt.votes);
            }
        }
        StepBody::Resource { link, pdf } => {
            if let Some(link) = link {
                println!("     link: {}", link);
            }
            if let Some(pdf) = pdf {
                println!("     pdf: {}", pdf);
            }
        }
    }
}

pub fn print_summary(summary: &ProgressSummary) {
    println!(
        "{} {}",
        styles::TITLE.apply_to(&summary.module_title),
        format!("({})", summary.user).dimmed()
    );
    println!(
        "  required: {}/{} ({}%)",
        summary.completed_required, summary.required_total, summary.percent
    );
    if summary.optional_total > 0 {
        println!(
            "  optional: {}/{}",
            summary.completed_optional, summary.optional_total
        );
    }
    for (title, score) in &summary.quiz_results {
        println!("  quiz {}: {}/{}", title, score.correct, score.total);
    }
}

pub fn print_entries(entries: &[JournalEntry]) {
    if entries.is_empty() {
        println!("No journal entries.");
        return;
    }

    for (i, entry) in entries.iter().enumerate() {
        let link_note = if entry.module_id.is_some() {
            styles::OPTIONAL.apply_to(" [module]").to_string()
        } else {
            String::new()
        };
        let preview: String = entry
            .body
            .chars()
            .take(60)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        println!(
            "{:>3}. {}{} {}",
            i + 1,
            preview,
            link_note,
            styles::TIME.apply_to(format_time_ago(entry.created_at))
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    let time_str = time_str
        .replace("hour ago", "hour  ago")
        .replace("minute ago", "minute  ago")
        .replace("second ago", "second  ago")
        .replace("day ago", "day  ago")
        .replace("week ago", "week  ago")
        .replace("month ago", "month  ago")
        .replace("year ago", "year  ago");

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
