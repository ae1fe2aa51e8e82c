// Shared helpers for integration tests.
//
// Provides a temporary repository with a separate fake home directory, a
// fluent builder for modules and files, and a `Log` implementation that
// records messages so command output can be snapshotted.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dotman_cli::commands::CommandSetup;
use dotman_cli::logging::{Log, ModuleStatus};
use dotman_cli::mapping::{Environment, PathResolver};

/// An isolated repository and home directory backed by a [`tempfile::TempDir`].
#[derive(Debug)]
pub struct TestRepo {
    _dir: tempfile::TempDir,
    /// Canonical repository root.
    pub root: PathBuf,
    /// Canonical fake home directory.
    pub home: PathBuf,
}

impl TestRepo {
    /// Create an empty repository and home directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().join("repo");
        let home = dir.path().join("home");
        std::fs::create_dir_all(&root).expect("create repo dir");
        std::fs::create_dir_all(&home).expect("create home dir");
        Self {
            root: dunce::canonicalize(&root).expect("canonical repo"),
            home: dunce::canonicalize(&home).expect("canonical home"),
            _dir: dir,
        }
    }

    /// Resolver expanding `~`, `$HOME` and `$XDG_CONFIG_HOME` into the fake home.
    pub fn resolver(&self) -> PathResolver {
        let home = self.home.display().to_string();
        let config = self.home.join(".config").display().to_string();
        PathResolver::new()
            .expect("compile resolver patterns")
            .with_home(Some(self.home.clone()))
            .with_env(Environment::fixed([
                ("HOME", home),
                ("XDG_CONFIG_HOME", config),
            ]))
    }

    /// Discover modules, optionally filtered, logging setup to `log`.
    pub fn setup(&self, filter: Option<&str>, log: &dyn Log) -> CommandSetup {
        CommandSetup::load(&self.root, filter, &self.resolver(), log).expect("command setup")
    }

    /// Read a file relative to the home directory.
    pub fn read_home(&self, rel: &str) -> String {
        std::fs::read_to_string(self.home.join(rel)).expect("read home file")
    }

    /// Read a file relative to the repository root.
    pub fn read_repo(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root.join(rel)).expect("read repo file")
    }

    /// Replace the repository and home paths in `text` with placeholders.
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.root.display().to_string(), "<repo>")
            .replace(&self.home.display().to_string(), "<home>")
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
}

/// Fluent builder for [`TestRepo`].
#[derive(Debug)]
pub struct TestRepoBuilder {
    repo: TestRepo,
}

impl TestRepoBuilder {
    /// Begin building an empty repository.
    pub fn new() -> Self {
        Self {
            repo: TestRepo::new(),
        }
    }

    /// Create module `name` with the given mapping file content.
    pub fn with_module(self, name: &str, mapping: &str) -> Self {
        write(&self.repo.root.join(name).join("dotman"), mapping);
        self
    }

    /// Write a file relative to the repository root.
    pub fn with_repo_file(self, rel: &str, content: &str) -> Self {
        write(&self.repo.root.join(rel), content);
        self
    }

    /// Write a file relative to the home directory.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write(&self.repo.home.join(rel), content);
        self
    }

    /// Finish building and return the repository.
    pub fn build(self) -> TestRepo {
        self.repo
    }
}

/// A [`Log`] that records every message as one line of plain text.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
}

impl RecordingLog {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: String) {
        self.lines.lock().expect("log lock").push(line);
    }

    /// All recorded lines joined with newlines.
    pub fn output(&self) -> String {
        self.lines.lock().expect("log lock").join("\n")
    }

    /// Recorded lines without `[debug]` entries.
    pub fn output_without_debug(&self) -> String {
        self.lines
            .lock()
            .expect("log lock")
            .iter()
            .filter(|l| !l.starts_with("[debug]"))
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push(format!("==> {msg}"));
    }

    fn info(&self, msg: &str) {
        self.push(msg.to_string());
    }

    fn debug(&self, msg: &str) {
        self.push(format!("[debug] {msg}"));
    }

    fn warn(&self, msg: &str) {
        self.push(format!("[warn] {msg}"));
    }

    fn error(&self, msg: &str) {
        self.push(format!("[error] {msg}"));
    }

    fn dry_run(&self, msg: &str) {
        self.push(format!("[dry run] {msg}"));
    }

    fn record_module(&self, name: &str, status: ModuleStatus, message: Option<&str>) {
        let suffix = message.map_or_else(String::new, |m| format!(" ({m})"));
        self.push(format!("[module] {name}: {status:?}{suffix}"));
    }
}
