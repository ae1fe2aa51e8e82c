//! Domain-specific error types for the mapping engine.
//!
//! This module provides structured error types built with [`thiserror`].
//! The engine returns typed errors (e.g., [`LoadError`], [`LineError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error kinds
//!
//! ```text
//! LoadError     mapping file missing or unreadable (fatal for that map)
//! LineError     one malformed mapping line (recoverable)
//! ResolveError  entry directory could not be listed (recoverable)
//! ModuleError   module discovery failures
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading of a whole mapping file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The mapping file does not exist.
    #[error("mapping file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The path exists but is not a regular file.
    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),

    /// An I/O error occurred while reading the mapping file.
    #[error("IO error reading mapping file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Why a mapping line was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineErrorKind {
    /// The line does not split into two or three fields.
    #[error("expected a source, a target and an optional pattern, found {fields} field(s)")]
    Malformed {
        /// Number of fields found on the line.
        fields: usize,
    },

    /// A field is empty after normalization.
    #[error("empty path specification")]
    EmptyField,

    /// The target does not resolve to an absolute path.
    #[error("target path {0:?} is not absolute")]
    TargetNotAbsolute(String),

    /// The third field is not a valid regular expression.
    #[error("{pattern:?} is not a valid regular expression: {message}")]
    InvalidPattern {
        /// The pattern text as written.
        pattern: String,
        /// Compiler message from the regex engine.
        message: String,
    },
}

/// A rejected mapping line, reported alongside the partially loaded map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct LineError {
    /// 1-based line number in the mapping file.
    pub line: usize,
    /// The raw line text.
    pub text: String,
    /// Reason the line was rejected.
    pub kind: LineErrorKind,
}

/// An entry whose directory could not be enumerated; it yields no instructions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: cannot list {}: {reason}", .directory.display())]
pub struct ResolveError {
    /// Line number of the entry that failed to resolve.
    pub line: usize,
    /// Directory that could not be listed.
    pub directory: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// Errors raised while discovering modules under a base directory.
#[derive(Error, Debug)]
pub enum ModuleError {
    /// The base directory does not exist or is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The base directory could not be scanned.
    #[error("cannot scan {} for modules: {source}", .path.display())]
    Scan {
        /// Directory being scanned.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A module's mapping file could not be loaded.
    #[error("module '{name}': {source}")]
    Load {
        /// Module name.
        name: String,
        /// Underlying load failure.
        source: LoadError,
    },
}

/// Formats a list of line errors one per line, for log output.
#[derive(Debug)]
pub struct LineErrors<'a>(pub &'a [LineError]);

impl fmt::Display for LineErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}: {}", e.text.trim())?;
        }
        Ok(())
    }
}
