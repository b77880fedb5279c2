//! Display indexing for modules.
//!
//! Storage identifies modules by UUID; the CLI addresses them with short
//! display indexes assigned over the current catalog:
//!
//! - `p1, p2, ...` — the published subset (what students browse)
//! - `1, 2, ...`   — all active modules, drafts included (the authoring view)
//! - `d1, d2, ...` — soft-deleted modules
//!
//! Published modules appear **twice**: once with a `Published` index and once
//! with a `Regular` index, so the authoring view keeps stable numbering no
//! matter what gets published.

use crate::model::Module;
use std::str::FromStr;

/// A user-facing index for a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DisplayIndex {
    Published(usize),
    Regular(usize),
    Deleted(usize),
}

impl std::fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayIndex::Published(i) => write!(f, "p{}", i),
            DisplayIndex::Regular(i) => write!(f, "{}", i),
            DisplayIndex::Deleted(i) => write!(f, "d{}", i),
        }
    }
}

/// A user input to select a module, either by its index or a search term for
/// its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSelector {
    Index(DisplayIndex),
    Title(String),
}

impl std::fmt::Display for ModuleSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleSelector::Index(idx) => write!(f, "{}", idx),
            ModuleSelector::Title(t) => write!(f, "\"{}\"", t),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayModule {
    pub module: Module,
    pub index: DisplayIndex,
}

/// Assigns canonical display indexes to a list of modules.
///
/// Returns a flat list of [`DisplayModule`] entries, ordered: published
/// entries first, then regular, then deleted. Published modules appear twice
/// (see module documentation).
pub fn index_modules(mut modules: Vec<Module>) -> Vec<DisplayModule> {
    // Sort by created_at descending (newest first) for stable ordering
    modules.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut results = Vec::new();

    let mut published_idx = 1;
    for module in &modules {
        if module.published && !module.is_deleted {
            results.push(DisplayModule {
                module: module.clone(),
                index: DisplayIndex::Published(published_idx),
            });
            published_idx += 1;
        }
    }

    // Regular indexes cover ALL non-deleted modules, published ones included,
    // so canonical numbering is stable across publish/unpublish.
    let mut regular_idx = 1;
    for module in &modules {
        if !module.is_deleted {
            results.push(DisplayModule {
                module: module.clone(),
                index: DisplayIndex::Regular(regular_idx),
            });
            regular_idx += 1;
        }
    }

    let mut deleted_idx = 1;
    for module in &modules {
        if module.is_deleted {
            results.push(DisplayModule {
                module: module.clone(),
                index: DisplayIndex::Deleted(deleted_idx),
            });
            deleted_idx += 1;
        }
    }

    results
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix('p') {
            if let Ok(n) = rest.parse() {
                return Ok(DisplayIndex::Published(n));
            }
        }
        if let Some(rest) = s.strip_prefix('d') {
            if let Ok(n) = rest.parse() {
                return Ok(DisplayIndex::Deleted(n));
            }
        }
        if let Ok(n) = s.parse() {
            return Ok(DisplayIndex::Regular(n));
        }
        Err(format!("Invalid index format: {}", s))
    }
}

/// Parses a single input string that may be either a single index or a range.
///
/// Supports formats:
/// - Single index: "3", "p1", "d2"
/// - Range: "3-5" (expands to 3, 4, 5), "p1-p3" (expands to p1, p2, p3)
///
/// Range rules:
/// - Both endpoints must be the same type (Regular, Published, or Deleted)
/// - Start must be <= end
/// - Validation that the indexes actually exist happens later during resolution
pub fn parse_index_or_range(s: &str) -> Result<Vec<DisplayIndex>, String> {
    if let Some(dash_pos) = s.find('-') {
        // A leading '-' is not a range separator
        if dash_pos > 0 {
            let start = DisplayIndex::from_str(&s[..dash_pos])?;
            let end = DisplayIndex::from_str(&s[dash_pos + 1..])?;
            return expand_range(start, end);
        }
    }

    DisplayIndex::from_str(s).map(|idx| vec![idx])
}

fn expand_range(start: DisplayIndex, end: DisplayIndex) -> Result<Vec<DisplayIndex>, String> {
    match (&start, &end) {
        (DisplayIndex::Regular(s), DisplayIndex::Regular(e)) => {
            if s > e {
                return Err(format!(
                    "Invalid range: start ({}) must be <= end ({})",
                    s, e
                ));
            }
            Ok((*s..=*e).map(DisplayIndex::Regular).collect())
        }
        (DisplayIndex::Published(s), DisplayIndex::Published(e)) => {
            if s > e {
                return Err(format!(
                    "Invalid range: start (p{}) must be <= end (p{})",
                    s, e
                ));
            }
            Ok((*s..=*e).map(DisplayIndex::Published).collect())
        }
        (DisplayIndex::Deleted(s), DisplayIndex::Deleted(e)) => {
            if s > e {
                return Err(format!(
                    "Invalid range: start (d{}) must be <= end (d{})",
                    s, e
                ));
            }
            Ok((*s..=*e).map(DisplayIndex::Deleted).collect())
        }
        _ => Err(format!(
            "Invalid range: cannot mix index types ({} and {})",
            start, end
        )),
    }
}
