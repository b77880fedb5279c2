use console::Style;
use once_cell::sync::Lazy;

pub static INDEX_PUBLISHED: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static INDEX_DELETED: Lazy<Style> = Lazy::new(|| Style::new().red());
pub static INDEX_REGULAR: Lazy<Style> = Lazy::new(Style::new);
pub static TIME: Lazy<Style> = Lazy::new(|| Style::new().color256(245).italic());
pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static STEP_KIND: Lazy<Style> = Lazy::new(|| Style::new().cyan());
pub static OPTIONAL: Lazy<Style> = Lazy::new(|| Style::new().dim());
