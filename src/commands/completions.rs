//! Command: generate shell completions.
use anyhow::{Result, bail};
use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

/// Write completions for `shell` (or the shell named by `$SHELL`) to stdout.
///
/// # Errors
///
/// Returns an error if no shell was given and none can be detected.
pub fn run(shell: Option<Shell>) -> Result<()> {
    let Some(shell) = shell.or_else(Shell::from_env) else {
        bail!("Could not automatically detect shell");
    };

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bash_completions_mention_subcommands() {
        let mut cmd = Cli::command();
        let mut out = Vec::new();
        clap_complete::generate(Shell::Bash, &mut cmd, "dotman", &mut out);
        let script = String::from_utf8(out).unwrap();
        for sub in ["deploy", "import", "changes", "list"] {
            assert!(script.contains(sub), "missing {sub}");
        }
    }
}
