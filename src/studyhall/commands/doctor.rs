use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::ContentStore;

pub fn run<S: ContentStore>(store: &mut S) -> Result<CmdResult> {
    let report = store.doctor()?;
    let mut result = CmdResult::default();

    if report.fixed_step_counts == 0 && report.orphaned_step_collections == 0 {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
        if report.fixed_step_counts > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Corrected step counts on {} module(s).",
                report.fixed_step_counts
            )));
        }
        if report.orphaned_step_collections > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} step collection(s) with no parent module.",
                report.orphaned_step_collections
            )));
        }
    }

    Ok(result)
}
