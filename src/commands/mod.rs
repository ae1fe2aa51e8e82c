//! Top-level subcommand orchestration.
pub mod changes;
pub mod completions;
pub mod deploy;
pub mod import;
pub mod list;
pub mod version;

use anyhow::{Context as _, Result};
use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::error::{LineErrors, ModuleError};
use crate::logging::{Log, Logger, ModuleStatus};
use crate::mapping::{PathMap, PathResolver};
use crate::modules::{Module, ModuleCollection};
use crate::operations::SystemFileSystemOps;
use crate::resources::copy::CopyResource;
use crate::resources::{Applicable, Resource, ResourceChange, ResourceState};

/// Shared state produced by the common command setup sequence.
///
/// Resolves the repository root, reads `.dotman.toml`, discovers modules
/// and applies the module filter so that each command does not have to
/// repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Repository root.
    pub root: PathBuf,
    /// Repository settings.
    pub settings: Settings,
    /// Discovered (and filtered) modules.
    pub modules: ModuleCollection,
}

impl CommandSetup {
    /// Resolve the root from the global options and load its modules.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be resolved, the settings cannot
    /// be loaded, the filter is not a valid regular expression, or the root
    /// cannot be scanned.
    pub fn init(global: &GlobalOpts, filter: Option<&str>, log: &dyn Log) -> Result<Self> {
        let root = resolve_root(global)?;
        let resolver = PathResolver::new().context("compiling path patterns")?;
        Self::load(&root, filter, &resolver, log)
    }

    /// Load settings and modules for `root`.
    ///
    /// # Errors
    ///
    /// Same as [`init`](Self::init), minus root resolution.
    pub fn load(
        root: &Path,
        filter: Option<&str>,
        resolver: &PathResolver,
        log: &dyn Log,
    ) -> Result<Self> {
        let filter = filter
            .map(|f| Regex::new(f).with_context(|| format!("invalid module filter {f:?}")))
            .transpose()?;
        let settings = Settings::load(root)?;
        log.debug(&format!("root: {}", root.display()));
        log.debug(&format!("mapping file name: {}", settings.mapping_file));

        let mut modules =
            ModuleCollection::discover(root, &settings, resolver, &SystemFileSystemOps)
                .with_context(|| format!("discovering modules in {}", root.display()))?;
        if let Some(filter) = &filter {
            modules = modules.filter(filter);
        }
        log.debug(&format!("{} module(s) selected", modules.modules().len()));

        Ok(Self {
            root: root.to_path_buf(),
            settings,
            modules,
        })
    }

    /// Log every module that failed to load, returning how many there were.
    pub fn report_module_errors(&self, log: &dyn Log) -> usize {
        for error in self.modules.errors() {
            log.error(&error.to_string());
            if let ModuleError::Load { name, .. } = error {
                log.record_module(name, ModuleStatus::Failed, Some("mapping file unreadable"));
            }
        }
        self.modules.errors().len()
    }
}

/// Resolve the repository root directory.
///
/// Uses `--root` (or `DOTMAN_ROOT`, which clap folds into the same option),
/// falling back to the current directory.
///
/// # Errors
///
/// Returns an error if the directory does not exist or cannot be resolved.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let root = match &global.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("reading current directory")?,
    };
    dunce::canonicalize(&root)
        .with_context(|| format!("repository root {} does not exist", root.display()))
}

/// Warn about the rejected lines of a module's mapping file.
pub(crate) fn report_line_errors(module: &Module, log: &dyn Log) {
    if module.line_errors.is_empty() {
        return;
    }
    log.warn(&format!(
        "{}: {} line(s) ignored in {}",
        module.name,
        module.line_errors.len(),
        module.mapping_file.display()
    ));
    for line in LineErrors(&module.line_errors).to_string().lines() {
        log.warn(&format!("  {line}"));
    }
}

/// Direction in which module instructions are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Repository → targets.
    Deploy,
    /// Targets → repository.
    Import,
}

impl Direction {
    const fn verb(self) -> &'static str {
        match self {
            Self::Deploy => "Deploying",
            Self::Import => "Importing",
        }
    }

    fn map(self, map: &PathMap) -> Cow<'_, PathMap> {
        match self {
            Self::Deploy => Cow::Borrowed(map),
            Self::Import => Cow::Owned(map.reversed()),
        }
    }
}

/// Copy every instruction of every selected module in `direction`.
///
/// Each module's outcome is recorded through [`Log::record_module`].
pub fn sync_modules(setup: &CommandSetup, direction: Direction, dry_run: bool, log: &dyn Log) {
    setup.report_module_errors(log);
    if setup.modules.is_empty() {
        log.warn(&format!("no modules found in {}", setup.root.display()));
    }
    for module in setup.modules.modules() {
        sync_module(module, direction, dry_run, log);
    }
}

fn sync_module(module: &Module, direction: Direction, dry_run: bool, log: &dyn Log) {
    log.stage(&format!("{} {}", direction.verb(), module.name));
    report_line_errors(module, log);

    let set = direction
        .map(&module.map)
        .instructions(&SystemFileSystemOps);
    for unresolved in &set.unresolved {
        log.warn(&format!("{}: {unresolved}", module.name));
    }
    if set.instructions.is_empty() {
        log.info("nothing to copy");
        log.record_module(&module.name, ModuleStatus::Skipped, Some("no instructions"));
        return;
    }

    let mut copied = 0usize;
    let mut pending = 0usize;
    let mut failed = 0usize;
    for instruction in &set.instructions {
        let resource = CopyResource::from_instruction(instruction);
        if dry_run {
            match resource.current_state() {
                Ok(ResourceState::Missing | ResourceState::Incorrect { .. }) => {
                    log.dry_run(&format!("would copy {}", resource.description()));
                    pending += 1;
                }
                Ok(ResourceState::Correct) => {
                    log.debug(&format!("up to date: {}", resource.description()));
                }
                Ok(ResourceState::Invalid { reason }) => log.warn(&reason),
                Err(e) => {
                    log.error(&format!("{}: {e:#}", resource.description()));
                    failed += 1;
                }
            }
            continue;
        }
        match resource.reconcile() {
            Ok(ResourceChange::Applied) => {
                log.info(&format!("copied {}", resource.description()));
                copied += 1;
            }
            Ok(ResourceChange::AlreadyCorrect) => {
                log.debug(&format!("up to date: {}", resource.description()));
            }
            Ok(ResourceChange::Skipped { reason }) => log.warn(&reason),
            Err(e) => {
                log.error(&format!("{}: {e:#}", resource.description()));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        log.record_module(
            &module.name,
            ModuleStatus::Failed,
            Some(&format!("{failed} failed")),
        );
    } else if dry_run {
        log.record_module(
            &module.name,
            ModuleStatus::DryRun,
            Some(&format!("{pending} to copy")),
        );
    } else {
        log.record_module(
            &module.name,
            ModuleStatus::Ok,
            Some(&format!("{copied} copied")),
        );
    }
}

/// Print the summary and bail if any module failed.
///
/// # Errors
///
/// Returns an error if one or more modules recorded a failure.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} module(s) failed");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn resolve_root_uses_explicit_root() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            root: Some(dir.path().to_path_buf()),
            dry_run: false,
        };
        let root = resolve_root(&global).unwrap();
        assert_eq!(root, dunce::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn resolve_root_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            root: Some(dir.path().join("missing")),
            dry_run: false,
        };
        let err = resolve_root(&global).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn direction_import_reverses_map() {
        let resolver = PathResolver::new().unwrap();
        let map = PathMap::parse("/repo", "a  /t/a\n", &resolver).map;
        assert!(!Direction::Deploy.map(&map).is_reversed());
        assert!(Direction::Import.map(&map).is_reversed());
    }
}
