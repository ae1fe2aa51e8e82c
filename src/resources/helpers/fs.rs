//! File-system resource helpers.
use anyhow::{Context as _, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::path::Path;

use crate::resources::error::ResourceError;

/// SHA-256 digest of a file's contents.
pub type FileDigest = [u8; 32];

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove a symlink at `path`, including broken symlinks, so that a copy
/// writes a real file instead of following the link.
///
/// Does nothing if `path` is absent or is not a symlink.
///
/// # Errors
///
/// Returns an error if the link exists but cannot be removed.
pub fn remove_symlink(path: &Path) -> Result<()> {
    if path.symlink_metadata().is_ok_and(|m| m.is_symlink()) {
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing link: {}", path.display()))?;
    }
    Ok(())
}

/// Compute the SHA-256 digest of a file, streaming its contents.
///
/// # Errors
///
/// Returns [`ResourceError::Io`] if the file cannot be opened or read.
pub fn file_digest(path: &Path) -> Result<FileDigest, ResourceError> {
    let io_err = |source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(io_err)?;
    Ok(hasher.finalize().into())
}

/// Returns `true` if both files have identical contents.
///
/// # Errors
///
/// Returns [`ResourceError::Io`] if either file cannot be read.
pub fn same_contents(a: &Path, b: &Path) -> Result<bool, ResourceError> {
    let len = |p: &Path| {
        p.metadata()
            .map(|m| m.len())
            .map_err(|source| ResourceError::Io {
                path: p.to_path_buf(),
                source,
            })
    };
    if len(a)? != len(b)? {
        return Ok(false);
    }
    Ok(file_digest(a)? == file_digest(b)?)
}

/// Copy a file, replacing a symlink at `dst` rather than writing through it.
///
/// Returns `false` without writing when `dst` already has the same contents.
///
/// # Errors
///
/// Returns an error if the contents cannot be compared or the copy fails.
pub fn copy_file(src: &Path, dst: &Path) -> Result<bool> {
    remove_symlink(dst)?;
    if dst.is_file() && same_contents(src, dst)? {
        return Ok(false);
    }
    std::fs::copy(src, dst)
        .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
    Ok(true)
}

/// Recursively copy a directory tree, merging into `dst`.
///
/// Files already present in `dst` with identical contents are left
/// untouched. Files in `dst` with no counterpart in `src` are kept. Symlinks
/// within the source tree are followed. Returns the number of files written.
///
/// # Errors
///
/// Returns an error if a destination directory cannot be created, a source
/// entry cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    let mut written = 0;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            written += copy_dir_recursive(&src_path, &dst_path)?;
        } else if copy_file(&src_path, &dst_path)? {
            written += 1;
        }
    }
    Ok(written)
}
