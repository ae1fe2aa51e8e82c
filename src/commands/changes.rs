//! Command: report deployed files that differ from the repository.
use anyhow::Result;

use super::{CommandSetup, report_line_errors};
use crate::changes::Changes;
use crate::cli::{GlobalOpts, ModuleOpts};
use crate::logging::Log;
use crate::operations::SystemFileSystemOps;

/// Run the changes command.
///
/// # Errors
///
/// Returns an error if setup fails or any module failed to load.
pub fn run(global: &GlobalOpts, opts: &ModuleOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, opts.filter.as_deref(), log)?;
    let total = changes(&setup, log);
    let failed = setup.modules.errors().len();
    if failed > 0 {
        anyhow::bail!("{failed} module(s) failed to load");
    }
    log.debug(&format!("{total} change(s)"));
    Ok(())
}

/// Log changed targets grouped by module and return how many were found.
///
/// A module header is only logged when the module has at least one change.
pub fn changes(setup: &CommandSetup, log: &dyn Log) -> usize {
    setup.report_module_errors(log);
    let mut total = 0;
    for module in setup.modules.modules() {
        report_line_errors(module, log);
        let set = module.map.instructions(&SystemFileSystemOps);
        for unresolved in &set.unresolved {
            log.warn(&format!("{}: {unresolved}", module.name));
        }
        let mut found = Changes::new(set).peekable();
        if found.peek().is_none() {
            continue;
        }
        log.stage(&module.name);
        for change in found {
            log.info(&change.to_string());
            total += 1;
        }
    }
    if total == 0 {
        log.info("no changes");
    }
    total
}
