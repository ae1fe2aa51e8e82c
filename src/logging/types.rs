//! Core logging types: module entries, status, and the [`Log`] trait.

/// Per-module outcome for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    /// Module name.
    pub name: String,
    /// Final status of the module.
    pub status: ModuleStatus,
    /// Optional detail message (e.g., copy count or error description).
    pub message: Option<String>,
}

/// Status of a processed module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Every instruction of the module was handled.
    Ok,
    /// The module had nothing to do.
    Skipped,
    /// The module ran in dry-run mode; no changes were applied.
    DryRun,
    /// At least one instruction of the module failed.
    Failed,
}

/// Abstraction over logging backends.
///
/// Command code logs through this trait so tests can capture output without
/// installing a global subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a module result for the summary.
    fn record_module(&self, name: &str, status: ModuleStatus, message: Option<&str>);
}
