use crate::catalog::{index_modules, DisplayIndex, DisplayModule};
use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::ContentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatusFilter {
    All,
    Active,
    Published,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct ModuleFilter {
    pub status: ModuleStatusFilter,
    pub search_term: Option<String>,
    pub tag: Option<String>,
}

impl Default for ModuleFilter {
    fn default() -> Self {
        Self {
            status: ModuleStatusFilter::Active,
            search_term: None,
            tag: None,
        }
    }
}

pub fn run<S: ContentStore>(store: &S, filter: ModuleFilter) -> Result<CmdResult> {
    let modules = store.list_modules()?;
    let indexed = index_modules(modules);

    let mut filtered: Vec<DisplayModule> = indexed
        .into_iter()
        .filter(|dm| match filter.status {
            ModuleStatusFilter::All => true,
            ModuleStatusFilter::Active => !matches!(dm.index, DisplayIndex::Deleted(_)),
            ModuleStatusFilter::Published => matches!(dm.index, DisplayIndex::Published(_)),
            ModuleStatusFilter::Deleted => matches!(dm.index, DisplayIndex::Deleted(_)),
        })
        .collect();

    if let Some(tag) = &filter.tag {
        filtered.retain(|dm| dm.module.tags.iter().any(|t| t == tag));
    }

    if let Some(term) = &filter.search_term {
        let term_lower = term.to_lowercase();
        let mut matches: Vec<(DisplayModule, u8)> = filtered
            .into_iter()
            .filter_map(|dm| {
                let title_lower = dm.module.title.to_lowercase();
                let desc_lower = dm.module.description.to_lowercase();

                let score = if title_lower == term_lower {
                    1
                } else if title_lower.contains(&term_lower) {
                    2
                } else if desc_lower.contains(&term_lower) {
                    3
                } else {
                    return None;
                };

                Some((dm, score))
            })
            .collect();

        // Sort by score, then shorter title, then age
        matches.sort_by(|(a, score_a), (b, score_b)| match score_a.cmp(score_b) {
            std::cmp::Ordering::Equal => {
                let len_a = a.module.title.len();
                let len_b = b.module.title.len();
                match len_a.cmp(&len_b) {
                    std::cmp::Ordering::Equal => a.module.created_at.cmp(&b.module.created_at),
                    ord => ord,
                }
            }
            ord => ord,
        });

        filtered = matches.into_iter().map(|(dm, _)| dm).collect();
    }

    Ok(CmdResult::default().with_listed_modules(filtered))
}
