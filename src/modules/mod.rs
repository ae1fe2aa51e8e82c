//! Module discovery.
//!
//! A *module* is a directory holding a mapping file. The repository root
//! may itself be a module, and every immediate subdirectory that holds a
//! mapping file is one.
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{LineError, ModuleError};
use crate::mapping::{PathMap, PathResolver};
use crate::operations::FileSystemOps;

/// A named directory with one loaded mapping file.
#[derive(Debug, Clone)]
pub struct Module {
    /// Directory name (the root module is named after the root directory).
    pub name: String,
    /// Absolute module directory.
    pub directory: PathBuf,
    /// Path to the module's mapping file.
    pub mapping_file: PathBuf,
    /// The loaded map.
    pub map: PathMap,
    /// Lines of the mapping file that were rejected.
    pub line_errors: Vec<LineError>,
}

impl Module {
    /// Load the module whose mapping file is `mapping_file`.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError::Load`] if the mapping file cannot be loaded.
    pub fn load(
        name: impl Into<String>,
        mapping_file: PathBuf,
        resolver: &PathResolver,
    ) -> Result<Self, ModuleError> {
        let name = name.into();
        let loaded = PathMap::load(&mapping_file, resolver).map_err(|source| {
            ModuleError::Load {
                name: name.clone(),
                source,
            }
        })?;
        Ok(Self {
            name,
            directory: loaded.map.directory().to_path_buf(),
            mapping_file,
            map: loaded.map,
            line_errors: loaded.errors,
        })
    }
}

/// The modules found under a base directory, sorted by name.
#[derive(Debug, Default)]
pub struct ModuleCollection {
    modules: Vec<Module>,
    errors: Vec<ModuleError>,
}

impl ModuleCollection {
    /// Discover modules under `base`.
    ///
    /// Modules whose name is listed in `settings.ignore` are skipped. A
    /// module whose mapping file fails to load is recorded in
    /// [`errors`](Self::errors) and does not prevent the others from
    /// loading.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not a directory or cannot be listed.
    pub fn discover(
        base: &Path,
        settings: &Settings,
        resolver: &PathResolver,
        fs: &dyn FileSystemOps,
    ) -> Result<Self, ModuleError> {
        if !fs.is_dir(base) {
            return Err(ModuleError::NotADirectory(base.to_path_buf()));
        }
        let children = fs.read_dir(base).map_err(|source| ModuleError::Scan {
            path: base.to_path_buf(),
            source,
        })?;

        let mut candidates: Vec<(String, PathBuf)> = Vec::new();
        let root_file = base.join(&settings.mapping_file);
        if fs.is_file(&root_file) {
            candidates.push((display_name(base), root_file));
        }
        for child in children.into_iter().filter(|c| fs.is_dir(c)) {
            let file = child.join(&settings.mapping_file);
            if fs.is_file(&file) {
                candidates.push((display_name(&child), file));
            }
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut collection = Self::default();
        for (name, file) in candidates {
            if settings.is_ignored(&name) {
                tracing::debug!("ignoring module {name}");
                continue;
            }
            match Module::load(name, file, resolver) {
                Ok(module) => collection.modules.push(module),
                Err(e) => collection.errors.push(e),
            }
        }
        Ok(collection)
    }

    /// Keep only modules whose name matches `filter`.
    #[must_use]
    pub fn filter(self, filter: &Regex) -> Self {
        Self {
            modules: self
                .modules
                .into_iter()
                .filter(|m| filter.is_match(&m.name))
                .collect(),
            errors: self.errors,
        }
    }

    /// Loaded modules in name order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Modules that failed to load.
    #[must_use]
    pub fn errors(&self) -> &[ModuleError] {
        &self.errors
    }

    /// `true` if no module was loaded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn display_name(dir: &Path) -> String {
    dir.file_name().map_or_else(
        || dir.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}
