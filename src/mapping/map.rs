use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use super::{Instruction, PathMapEntry, PathResolver};
use crate::error::{LineError, LoadError, ResolveError};
use crate::operations::FileSystemOps;

/// An ordered set of mapping entries loaded from one mapping file.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMap {
    directory: PathBuf,
    entries: Vec<PathMapEntry>,
    reversed: bool,
}

/// Result of loading a mapping file.
///
/// Loading is partial-success: valid lines become entries and every
/// rejected line is collected in `errors`.
#[derive(Debug)]
pub struct LoadedMap {
    /// The map built from all valid lines, in file order.
    pub map: PathMap,
    /// One error per rejected line, in file order.
    pub errors: Vec<LineError>,
}

/// Instructions generated from a map, plus the entries that could not be
/// resolved.
#[derive(Debug, Default)]
pub struct InstructionSet {
    /// Instructions in entry order, then enumeration order.
    pub instructions: Vec<Instruction>,
    /// Entries whose directory could not be listed.
    pub unresolved: Vec<ResolveError>,
}

impl InstructionSet {
    /// `true` if every entry resolved.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl IntoIterator for InstructionSet {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}

fn is_ignored(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

impl PathMap {
    /// Load a mapping file from disk.
    ///
    /// Relative source paths are resolved against the absolute directory
    /// containing `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file does not exist, is not a regular
    /// file, or cannot be read. Malformed lines are not errors here; they
    /// are reported in [`LoadedMap::errors`]. Bytes that are not valid UTF-8
    /// are replaced with `U+FFFD` rather than failing the load.
    pub fn load(path: &Path, resolver: &PathResolver) -> Result<LoadedMap, LoadError> {
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(io_err(e)),
        };
        if !metadata.is_file() {
            return Err(LoadError::NotAFile(path.to_path_buf()));
        }

        let absolute = std::path::absolute(path).map_err(io_err)?;
        let directory = absolute
            .parent()
            .map_or_else(|| absolute.clone(), Path::to_path_buf);
        let bytes = std::fs::read(path).map_err(io_err)?;
        let content = String::from_utf8_lossy(&bytes);

        tracing::debug!("loading mapping file {}", path.display());
        Ok(Self::parse(directory, &content, resolver))
    }

    /// Parse mapping file content whose sources are relative to `directory`.
    #[must_use]
    pub fn parse(directory: impl Into<PathBuf>, content: &str, resolver: &PathResolver) -> LoadedMap {
        let directory = directory.into();
        let mut entries = Vec::new();
        let mut errors = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if is_ignored(line) {
                continue;
            }
            match PathMapEntry::parse(index + 1, line, &directory, resolver) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::debug!("skipping {e}");
                    errors.push(e);
                }
            }
        }

        LoadedMap {
            map: Self {
                directory,
                entries,
                reversed: false,
            },
            errors,
        }
    }

    /// Directory containing the mapping file.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[PathMapEntry] {
        &self.entries
    }

    /// Whether every entry is swapped relative to the file.
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the map has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return a copy with every entry reversed, preserving order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            entries: self.entries.iter().map(PathMapEntry::reversed).collect(),
            reversed: !self.reversed,
        }
    }

    /// Generate instructions for every entry in order.
    ///
    /// An entry whose directory cannot be listed contributes no
    /// instructions and is recorded in [`InstructionSet::unresolved`].
    #[must_use]
    pub fn instructions(&self, fs: &dyn FileSystemOps) -> InstructionSet {
        let mut set = InstructionSet::default();
        for entry in &self.entries {
            match entry.instructions(fs) {
                Ok(mut instructions) => set.instructions.append(&mut instructions),
                Err(e) => {
                    tracing::debug!("unresolved entry {e}");
                    set.unresolved.push(e);
                }
            }
        }
        set
    }
}

impl fmt::Display for PathMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
