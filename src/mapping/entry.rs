use std::fmt;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use regex::Regex;

use super::Instruction;
use super::resolver::PathResolver;
use crate::error::{LineError, LineErrorKind, ResolveError};
use crate::operations::FileSystemOps;

/// One parsed line of a mapping file.
///
/// A plain entry maps exactly one source to one target. A *wildcard* entry
/// (source ending in `/*`) and a *pattern* entry (third field present) map
/// every matching child of the source directory into the target directory.
#[derive(Debug, Clone)]
pub struct PathMapEntry {
    source: PathBuf,
    target: PathBuf,
    pattern: Option<Regex>,
    wildcard: bool,
    reversed: bool,
    line: usize,
    declared_source: String,
    declared_target: String,
}

impl PathMapEntry {
    /// Parse a single mapping line.
    ///
    /// `line` is the 1-based line number, `directory` the absolute
    /// directory containing the mapping file. Comment and blank lines must
    /// be filtered out by the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`] if the line does not have two or three fields,
    /// a field is empty, the target is not absolute after expansion, or the
    /// pattern is not a valid regular expression.
    pub fn parse(
        line: usize,
        text: &str,
        directory: &Path,
        resolver: &PathResolver,
    ) -> Result<Self, LineError> {
        let reject = |kind| LineError {
            line,
            text: text.to_string(),
            kind,
        };

        let fields = resolver.split_fields(text);
        let (source, target, pattern) = match fields.as_slice() {
            [source, target] => (*source, *target, None),
            [source, target, pattern] => (*source, *target, Some(*pattern)),
            other => return Err(reject(LineErrorKind::Malformed { fields: other.len() })),
        };

        let source = resolver.resolve_source(directory, source).map_err(reject)?;
        let target = resolver.resolve_target(target).map_err(reject)?;
        let pattern = pattern
            .map(|p| {
                let p = p.trim();
                Regex::new(p).map_err(|e| {
                    reject(LineErrorKind::InvalidPattern {
                        pattern: p.to_string(),
                        message: e.to_string(),
                    })
                })
            })
            .transpose()?;

        Ok(Self {
            source: source.path,
            target: target.path,
            pattern,
            wildcard: source.wildcard,
            reversed: false,
            line,
            declared_source: source.text,
            declared_target: target.text,
        })
    }

    /// Current source path. For wildcard entries this is the directory being
    /// enumerated.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Current target path.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Name filter applied to the source directory's children, if any.
    #[must_use]
    pub const fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Whether the declared source ended in a `*` component.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Whether source and target are swapped relative to the declaration.
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// 1-based line number in the mapping file.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Return a copy with source and target swapped.
    ///
    /// Reversing twice yields an entry equal to the original.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
            reversed: !self.reversed,
            ..self.clone()
        }
    }

    /// Expand this entry into concrete instructions.
    ///
    /// Plain entries yield exactly one instruction. Wildcard and pattern
    /// entries list the current source directory and map each (matching)
    /// child to the same base name under the current target.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] if the source directory cannot be listed.
    pub fn instructions(&self, fs: &dyn FileSystemOps) -> Result<Vec<Instruction>, ResolveError> {
        if !self.wildcard && self.pattern.is_none() {
            return Ok(vec![Instruction::new(
                self.source.clone(),
                self.target.clone(),
            )]);
        }

        let children = PathResolver::matching_entries(fs, &self.source, self.pattern.as_ref())
            .map_err(|e| ResolveError {
                line: self.line,
                directory: self.source.clone(),
                reason: e.to_string(),
            })?;

        Ok(children
            .into_iter()
            .filter_map(|child| {
                let name = child.file_name()?.to_owned();
                Some(Instruction::new(child, self.target.join(name)))
            })
            .collect())
    }

    /// Serialize back to mapping-file syntax, in declared direction.
    ///
    /// Parsing the result against the same directory yields an equal entry.
    #[must_use]
    pub fn to_line(&self) -> String {
        let mut line = format!("{}  {}", self.declared_source, self.declared_target);
        if let Some(pattern) = &self.pattern {
            line.push_str("  ");
            line.push_str(pattern.as_str());
        }
        line
    }
}

impl PartialEq for PathMapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.pattern.as_ref().map(Regex::as_str) == other.pattern.as_ref().map(Regex::as_str)
            && self.wildcard == other.wildcard
            && self.reversed == other.reversed
            && self.line == other.line
            && self.declared_source == other.declared_source
            && self.declared_target == other.declared_target
    }
}

impl fmt::Display for PathMapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source.display())?;
        if self.wildcard {
            write!(f, "{MAIN_SEPARATOR}*")?;
        }
        write!(f, " → {}", self.target.display())?;
        if let Some(pattern) = &self.pattern {
            write!(f, " ({pattern})")?;
        }
        Ok(())
    }
}
