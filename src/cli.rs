//! Command-line interface definition.
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Top-level CLI entry point for dotman.
#[derive(Parser, Debug)]
#[command(
    name = "dotman",
    about = "Deploy and import dotfiles described by mapping files",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the repository root directory
    #[arg(long, global = true, env = "DOTMAN_ROOT")]
    pub root: Option<PathBuf>,
}

/// Module selection shared by the mapping subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ModuleOpts {
    /// Regular expression selecting modules by name
    #[arg(value_name = "FILTER")]
    pub filter: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List modules and their mapping entries
    List(ModuleOpts),
    /// Copy managed files to their targets
    Deploy(ModuleOpts),
    /// Copy targets back into the repository
    Import(ModuleOpts),
    /// Show targets that differ from the repository
    Changes(ModuleOpts),
    /// Generate shell completions
    Completions {
        /// Shell to generate for (detected from $SHELL when omitted)
        #[arg(value_enum)]
        shell: Option<Shell>,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Deploy(_) => "deploy",
            Self::Import(_) => "import",
            Self::Changes(_) => "changes",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}
