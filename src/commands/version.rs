//! Command: print version information.
use anyhow::Result;
use std::io::Write as _;

/// Version string embedded at build time, or the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DOTMAN_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the dotman version to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run() -> Result<()> {
    writeln!(std::io::stdout(), "dotman {}", version())?;
    Ok(())
}
