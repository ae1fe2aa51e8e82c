//! Command: copy managed files out to their targets.
use anyhow::Result;

use super::{CommandSetup, Direction, finish, sync_modules};
use crate::cli::{GlobalOpts, ModuleOpts};
use crate::logging::Logger;

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if setup fails or any module fails to deploy.
pub fn run(global: &GlobalOpts, opts: &ModuleOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, opts.filter.as_deref(), log)?;
    sync_modules(&setup, Direction::Deploy, global.dry_run, log);
    finish(log)
}
