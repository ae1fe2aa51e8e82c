//! Lazy detection of targets whose contents differ from their source.
//!
//! [`Changes`] walks a list of [`Instruction`]s and yields one [`Change`]
//! per file whose deployed copy is missing or stale. Directory instructions
//! expand into file-level comparisons only as the iterator advances, so
//! callers that stop at the first change never walk the rest of the tree.
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::mapping::Instruction;
use crate::resources::helpers::fs::same_contents;

/// How a target differs from its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// Both exist but their contents (or kinds) differ.
    Modified,
    /// The source exists but the target does not.
    TargetMissing,
    /// The source does not exist.
    SourceMissing,
    /// One side could not be read.
    Unreadable(String),
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modified => f.write_str("modified"),
            Self::TargetMissing => f.write_str("missing"),
            Self::SourceMissing => f.write_str("source missing"),
            Self::Unreadable(reason) => write!(f, "unreadable ({reason})"),
        }
    }
}

/// A single differing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Source path.
    pub source: PathBuf,
    /// Target path.
    pub target: PathBuf,
    /// What differs.
    pub kind: ChangeKind,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.target.display())
    }
}

enum Step {
    Same,
    Differs(ChangeKind),
    Descend(Vec<(PathBuf, PathBuf)>),
}

/// Iterator over the changes between instruction sources and targets.
///
/// Finite and single-pass. Results follow instruction order; files inside a
/// directory are visited in name order.
#[derive(Debug)]
pub struct Changes {
    pending: Vec<(PathBuf, PathBuf)>,
}

impl Changes {
    /// Create an iterator over the given instructions.
    pub fn new(instructions: impl IntoIterator<Item = Instruction>) -> Self {
        let mut pending: Vec<_> = instructions
            .into_iter()
            .map(|i| (i.source().to_path_buf(), i.target().to_path_buf()))
            .collect();
        pending.reverse();
        Self { pending }
    }

    /// Compare a single source and target.
    #[must_use]
    pub fn between(source: &Path, target: &Path) -> Self {
        Self {
            pending: vec![(source.to_path_buf(), target.to_path_buf())],
        }
    }
}

fn compare(source: &Path, target: &Path) -> Step {
    let Ok(source_meta) = source.metadata() else {
        return Step::Differs(ChangeKind::SourceMissing);
    };
    let Ok(target_meta) = target.metadata() else {
        return Step::Differs(ChangeKind::TargetMissing);
    };

    if source_meta.is_dir() {
        if !target_meta.is_dir() {
            return Step::Differs(ChangeKind::Modified);
        }
        return descend(source, target);
    }

    if target_meta.is_dir() {
        return Step::Differs(ChangeKind::Modified);
    }
    match same_contents(source, target) {
        Ok(true) => Step::Same,
        Ok(false) => Step::Differs(ChangeKind::Modified),
        Err(e) => Step::Differs(ChangeKind::Unreadable(e.to_string())),
    }
}

/// Queue the children of `source` in reverse name order so they pop sorted.
fn descend(source: &Path, target: &Path) -> Step {
    let names: io::Result<Vec<OsString>> = std::fs::read_dir(source)
        .and_then(|entries| entries.map(|e| e.map(|entry| entry.file_name())).collect());
    match names {
        Ok(mut names) => {
            names.sort();
            Step::Descend(
                names
                    .into_iter()
                    .rev()
                    .map(|name| (source.join(&name), target.join(&name)))
                    .collect(),
            )
        }
        Err(e) => Step::Differs(ChangeKind::Unreadable(e.to_string())),
    }
}

impl Iterator for Changes {
    type Item = Change;

    fn next(&mut self) -> Option<Change> {
        while let Some((source, target)) = self.pending.pop() {
            match compare(&source, &target) {
                Step::Same => {}
                Step::Differs(kind) => {
                    return Some(Change {
                        source,
                        target,
                        kind,
                    });
                }
                Step::Descend(children) => self.pending.extend(children),
            }
        }
        None
    }
}
