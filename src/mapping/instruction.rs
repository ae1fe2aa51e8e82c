use std::fmt;
use std::path::{Path, PathBuf};

/// A concrete `source → target` pair produced from a mapping entry.
///
/// Instructions carry no behavior; deploy, import and change detection
/// interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    source: PathBuf,
    target: PathBuf,
}

impl Instruction {
    /// Create an instruction from two absolute paths.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Path the content is taken from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Path the content is placed at.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source.display(), self.target.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_arrow() {
        let i = Instruction::new(PathBuf::from("/repo/a"), PathBuf::from("/home/u/a"));
        assert_eq!(i.to_string(), "/repo/a → /home/u/a");
    }
}
