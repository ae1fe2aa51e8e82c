//! Typed error variants for resource operations.
//!
//! Resource code returns these variants directly; callers convert to
//! [`anyhow::Error`] via `?`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A required file or directory was not found.
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// A resource exists but is in an unexpected or inconsistent state.
    #[error("invalid state for '{resource}': {reason}")]
    InvalidState {
        /// Name or description of the resource in the invalid state.
        resource: String,
        /// Human-readable explanation of why the state is invalid.
        reason: String,
    },

    /// A file could not be read while inspecting a resource.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let e = ResourceError::NotFound {
            resource: "/repo/vim/vimrc".to_string(),
        };
        assert_eq!(e.to_string(), "resource not found: /repo/vim/vimrc");
    }

    #[test]
    fn invalid_state_display() {
        let e = ResourceError::InvalidState {
            resource: "~/.bashrc".to_string(),
            reason: "target is a directory".to_string(),
        };
        assert!(e.to_string().contains("~/.bashrc"));
        assert!(e.to_string().contains("target is a directory"));
    }

    #[test]
    fn io_display_names_path() {
        let e = ResourceError::Io {
            path: PathBuf::from("/home/u/.vimrc"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(e.to_string(), "cannot read /home/u/.vimrc: denied");
    }

    #[test]
    fn resource_error_converts_to_anyhow() {
        let e = ResourceError::NotFound {
            resource: "vim".to_string(),
        };
        let _anyhow_err: anyhow::Error = e.into();
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn resource_error_is_send_sync() {
        assert_send_sync::<ResourceError>();
    }
}
