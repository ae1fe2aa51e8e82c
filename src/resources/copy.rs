//! Copy resource: places a file or directory tree at a target path.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::error::ResourceError;
use super::helpers::fs::{copy_dir_recursive, copy_file, ensure_parent_dir};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::changes::{ChangeKind, Changes};
use crate::mapping::Instruction;

/// A copy of `source` at `target` that can be checked and applied.
#[derive(Debug, Clone)]
pub struct CopyResource {
    /// The file or directory to copy.
    pub source: PathBuf,
    /// Where the copy is placed.
    pub target: PathBuf,
}

impl CopyResource {
    /// Create a new copy resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Create a copy resource from a mapping instruction.
    #[must_use]
    pub fn from_instruction(instruction: &Instruction) -> Self {
        Self::new(
            instruction.source().to_path_buf(),
            instruction.target().to_path_buf(),
        )
    }
}

impl Applicable for CopyResource {
    fn description(&self) -> String {
        format!("{} → {}", self.source.display(), self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.source.exists() {
            return Err(ResourceError::NotFound {
                resource: self.source.display().to_string(),
            }
            .into());
        }
        ensure_parent_dir(&self.target)?;

        if self.source.is_dir() {
            if self.target.is_file() {
                return Err(ResourceError::InvalidState {
                    resource: self.target.display().to_string(),
                    reason: "target is a file but source is a directory".to_string(),
                }
                .into());
            }
            let written = copy_dir_recursive(&self.source, &self.target)
                .with_context(|| format!("copy {}", self.description()))?;
            if written == 0 {
                return Ok(ResourceChange::AlreadyCorrect);
            }
            tracing::debug!("{written} file(s) written under {}", self.target.display());
            return Ok(ResourceChange::Applied);
        }

        if self.target.is_dir() {
            return Err(ResourceError::InvalidState {
                resource: self.target.display().to_string(),
                reason: "target is a directory but source is a file".to_string(),
            }
            .into());
        }
        if copy_file(&self.source, &self.target)? {
            Ok(ResourceChange::Applied)
        } else {
            Ok(ResourceChange::AlreadyCorrect)
        }
    }
}

impl Resource for CopyResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }
        if !self.target.exists() {
            return Ok(ResourceState::Missing);
        }

        match Changes::between(&self.source, &self.target).next() {
            None => Ok(ResourceState::Correct),
            Some(change) => match change.kind {
                ChangeKind::Unreadable(reason) => {
                    anyhow::bail!("cannot compare {}: {reason}", change.target.display())
                }
                _ => Ok(ResourceState::Incorrect {
                    current: change.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("repo");
        let dst = dir.path().join("home");
        std::fs::create_dir_all(&src).unwrap();
        (dir, src, dst)
    }

    #[test]
    fn missing_source_is_invalid() {
        let (_dir, src, dst) = setup();
        let r = CopyResource::new(src.join("none"), dst.join("none"));
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
        assert!(r.apply().is_err());
    }

    #[test]
    fn missing_target_then_applied_then_correct() {
        let (_dir, src, dst) = setup();
        std::fs::write(src.join("vimrc"), "set nu").unwrap();
        let r = CopyResource::new(src.join("vimrc"), dst.join("nested/.vimrc"));

        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        assert!(r.needs_change().unwrap());
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(r.apply().unwrap(), ResourceChange::AlreadyCorrect);
    }

    #[test]
    fn differing_contents_are_incorrect() {
        let (_dir, src, dst) = setup();
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::write(src.join("a"), "new").unwrap();
        std::fs::write(dst.join("a"), "old").unwrap();
        let r = CopyResource::new(src.join("a"), dst.join("a"));
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
        r.apply().unwrap();
        assert_eq!(std::fs::read_to_string(dst.join("a")).unwrap(), "new");
    }

    #[test]
    fn directory_copy_is_recursive() {
        let (_dir, src, dst) = setup();
        std::fs::create_dir_all(src.join("nvim/lua")).unwrap();
        std::fs::write(src.join("nvim/init.lua"), "-- init").unwrap();
        std::fs::write(src.join("nvim/lua/plugins.lua"), "return {}").unwrap();
        let r = CopyResource::new(src.join("nvim"), dst.join(".config/nvim"));

        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
        assert!(dst.join(".config/nvim/lua/plugins.lua").is_file());
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(r.apply().unwrap(), ResourceChange::AlreadyCorrect);
    }

    #[test]
    fn directory_onto_file_is_rejected() {
        let (_dir, src, dst) = setup();
        std::fs::create_dir_all(src.join("d")).unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::write(dst.join("d"), "file").unwrap();
        let err = CopyResource::new(src.join("d"), dst.join("d"))
            .apply()
            .unwrap_err();
        assert!(err.to_string().contains("target is a file"));
    }

    #[test]
    fn description_uses_arrow() {
        let r = CopyResource::from_instruction(&Instruction::new(
            PathBuf::from("/repo/a"),
            PathBuf::from("/home/u/a"),
        ));
        assert_eq!(r.description(), "/repo/a → /home/u/a");
    }
}
