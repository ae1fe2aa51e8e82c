//! Command: copy targets back into the repository.
use anyhow::Result;

use super::{CommandSetup, Direction, finish, sync_modules};
use crate::cli::{GlobalOpts, ModuleOpts};
use crate::logging::Logger;

/// Run the import command.
///
/// Every module's map is reversed, so wildcard and pattern entries are
/// enumerated on the target side.
///
/// # Errors
///
/// Returns an error if setup fails or any module fails to import.
pub fn run(global: &GlobalOpts, opts: &ModuleOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, opts.filter.as_deref(), log)?;
    sync_modules(&setup, Direction::Import, global.dry_run, log);
    finish(log)
}
