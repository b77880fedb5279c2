use crate::catalog::{DisplayIndex, DisplayModule};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StudyError};
use crate::model::{Module, Step};
use crate::store::ContentStore;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::fs::File;
use std::io::Write;

use super::helpers::{indexed_modules, modules_by_indexes};

/// One archive entry: the module document plus its full steps collection.
#[derive(Serialize)]
struct ModuleExport<'a> {
    module: &'a Module,
    steps: Vec<Step>,
}

pub fn run<S: ContentStore>(store: &S, indexes: &[DisplayIndex]) -> Result<CmdResult> {
    let modules = resolve_modules(store, indexes)?;

    if modules.is_empty() {
        let mut res = CmdResult::default();
        res.add_message(CmdMessage::info("No modules to export."));
        return Ok(res);
    }

    let now = Utc::now();
    let filename = format!("studyhall-{}.tar.gz", now.format("%Y-%m-%d_%H:%M:%S"));
    let file = File::create(&filename).map_err(StudyError::Io)?;

    write_archive(file, store, &modules)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} module(s) to {}",
        modules.len(),
        filename
    )));
    Ok(result)
}

fn resolve_modules<S: ContentStore>(
    store: &S,
    indexes: &[DisplayIndex],
) -> Result<Vec<DisplayModule>> {
    if indexes.is_empty() {
        Ok(indexed_modules(store)?
            .into_iter()
            .filter(|dm| matches!(dm.index, DisplayIndex::Regular(_)))
            .collect())
    } else {
        modules_by_indexes(store, indexes)
    }
}

fn write_archive<W: Write, S: ContentStore>(
    writer: W,
    store: &S,
    modules: &[DisplayModule],
) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for dm in modules {
        let export = ModuleExport {
            module: &dm.module,
            steps: store.list_steps(&dm.module.id)?,
        };
        let content =
            serde_json::to_string_pretty(&export).map_err(StudyError::Serialization)?;

        let safe_title = sanitize_filename(&dm.module.title);
        let entry_name = format!(
            "studyhall/{}-{}.json",
            safe_title,
            &dm.module.id.to_string()[..8]
        );

        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        tar.append_data(&mut header, entry_name, content.as_bytes())
            .map_err(StudyError::Io)?;
    }

    tar.finish().map_err(StudyError::Io)?;
    Ok(())
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}
