//! Command: list modules and their entries.
use anyhow::Result;

use super::{CommandSetup, report_line_errors};
use crate::cli::{GlobalOpts, ModuleOpts};
use crate::logging::Log;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if setup fails or any module failed to load.
pub fn run(global: &GlobalOpts, opts: &ModuleOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, opts.filter.as_deref(), log)?;
    list(&setup, log)
}

/// Log each module with its entry count; entries themselves at debug level.
///
/// # Errors
///
/// Returns an error if any module failed to load.
pub fn list(setup: &CommandSetup, log: &dyn Log) -> Result<()> {
    let failed = setup.report_module_errors(log);
    log.stage(&format!("Modules in {}", setup.root.display()));
    if setup.modules.is_empty() {
        log.info("no modules found");
    }
    for module in setup.modules.modules() {
        let count = module.map.len();
        let noun = if count == 1 { "entry" } else { "entries" };
        log.info(&format!("{} ({count} {noun})", module.name));
        for entry in module.map.entries() {
            log.debug(&format!("  {:>3}: {entry}", entry.line()));
        }
        report_line_errors(module, log);
    }
    if failed > 0 {
        anyhow::bail!("{failed} module(s) failed to load");
    }
    Ok(())
}
