//! Path specification normalization, expansion and directory matching.
use std::collections::HashMap;
use std::io;
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

use regex::{Captures, Regex};

use crate::error::LineErrorKind;
use crate::operations::FileSystemOps;

/// Separator characters accepted in mapping files for the current platform.
const SEPARATOR_PATTERN: &str = if cfg!(windows) { r"[/\\]+" } else { "/+" };

/// Field separator: two or more whitespace characters, or a run of tabs.
const FIELD_SEPARATOR_PATTERN: &str = r"(?:\s{2,}|\t+)";

const UNIX_VARIABLE_PATTERN: &str = r"\$(\w+)";
const WINDOWS_VARIABLE_PATTERN: &str = r"%(\w+)%";

/// Source of environment variable values used during expansion.
///
/// # Examples
///
/// ```
/// use dotman_cli::mapping::Environment;
///
/// let env = Environment::fixed([("XDG_CONFIG_HOME", "/home/u/.config")]);
/// assert!(matches!(env, Environment::Fixed(_)));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Environment {
    /// Read values from the process environment.
    #[default]
    Process,
    /// Use a fixed table; names missing from it are treated as unset.
    Fixed(HashMap<String, String>),
}

impl Environment {
    /// Build a fixed environment from name/value pairs.
    pub fn fixed<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn get(&self, name: &str) -> Option<String> {
        match self {
            Self::Process => std::env::var(name).ok(),
            Self::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

/// A resolved source field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Absolute path; for wildcard specs, the directory being enumerated.
    pub path: PathBuf,
    /// Whether the spec ended in a `*` component.
    pub wildcard: bool,
    /// Normalized text as written.
    pub text: String,
}

/// A resolved target field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    /// Absolute, expanded path.
    pub path: PathBuf,
    /// Normalized text as written, before expansion.
    pub text: String,
}

/// Turns raw path specifications into normalized, expanded paths.
///
/// All regular expressions are compiled once in [`PathResolver::new`] and
/// owned by the value, so a resolver can be shared freely between loads.
#[derive(Debug, Clone)]
pub struct PathResolver {
    separators: Regex,
    fields: Regex,
    unix_variable: Regex,
    windows_variable: Regex,
    home: Option<PathBuf>,
    env: Environment,
}

impl PathResolver {
    /// Create a resolver using the current user's home directory and the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the built-in patterns fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            separators: Regex::new(SEPARATOR_PATTERN)?,
            fields: Regex::new(FIELD_SEPARATOR_PATTERN)?,
            unix_variable: Regex::new(UNIX_VARIABLE_PATTERN)?,
            windows_variable: Regex::new(WINDOWS_VARIABLE_PATTERN)?,
            home: dirs::home_dir(),
            env: Environment::Process,
        })
    }

    /// Override the home directory used for `~` expansion.
    ///
    /// `None` leaves `~` unexpanded.
    #[must_use]
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Override the environment variable source.
    #[must_use]
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Normalize a path specification.
    ///
    /// Trims surrounding whitespace, collapses every run of separators into
    /// the platform separator and strips a trailing separator. A lone root
    /// separator is preserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotman_cli::mapping::PathResolver;
    ///
    /// let resolver = PathResolver::new().unwrap();
    /// # #[cfg(unix)]
    /// assert_eq!(resolver.normalize("  config//git/ "), "config/git");
    /// ```
    #[must_use]
    pub fn normalize(&self, spec: &str) -> String {
        let collapsed = self.separators.replace_all(spec.trim(), MAIN_SEPARATOR_STR);
        let stripped =
            collapsed.trim_end_matches(|c: char| c == MAIN_SEPARATOR || c.is_whitespace());
        if stripped.is_empty() && collapsed.starts_with(MAIN_SEPARATOR) {
            MAIN_SEPARATOR_STR.to_string()
        } else {
            stripped.to_string()
        }
    }

    /// Expand a leading `~` and every `$NAME` / `%NAME%` reference.
    ///
    /// Unset variables expand to the empty string. When no home directory
    /// is known, `~` is left as is.
    #[must_use]
    pub fn expand_variables(&self, path: &str) -> String {
        let path = self.expand_home(path);
        let lookup = |caps: &Captures<'_>| {
            caps.get(1)
                .and_then(|name| self.env.get(name.as_str()))
                .unwrap_or_default()
        };
        let path = self.unix_variable.replace_all(&path, lookup);
        self.windows_variable.replace_all(&path, lookup).into_owned()
    }

    fn expand_home(&self, path: &str) -> String {
        let Some(home) = &self.home else {
            return path.to_string();
        };
        path.strip_prefix('~').map_or_else(
            || path.to_string(),
            |rest| format!("{}{rest}", home.display()),
        )
    }

    /// Return the directory portion of a wildcard specification.
    ///
    /// A specification is a wildcard iff its last component is exactly `*`.
    /// Partial-name globs such as `*.conf` are not wildcards.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotman_cli::mapping::PathResolver;
    ///
    /// # #[cfg(unix)]
    /// # {
    /// assert_eq!(PathResolver::wildcard_base("config/*"), Some("config"));
    /// assert_eq!(PathResolver::wildcard_base("*"), Some(""));
    /// assert_eq!(PathResolver::wildcard_base("config/*.conf"), None);
    /// # }
    /// ```
    #[must_use]
    pub fn wildcard_base(path: &str) -> Option<&str> {
        match path.rsplit_once(MAIN_SEPARATOR) {
            Some((base, "*")) if base.is_empty() => Some(MAIN_SEPARATOR_STR),
            Some((base, "*")) => Some(base),
            None if path == "*" => Some(""),
            _ => None,
        }
    }

    /// List the immediate entries of `directory` whose base name matches
    /// `pattern` (every entry when `pattern` is `None`).
    ///
    /// Order is the filesystem's native listing order.
    ///
    /// # Errors
    ///
    /// Returns an error if `directory` cannot be listed.
    pub fn matching_entries(
        fs: &dyn FileSystemOps,
        directory: &Path,
        pattern: Option<&Regex>,
    ) -> io::Result<Vec<PathBuf>> {
        Ok(fs
            .read_dir(directory)?
            .into_iter()
            .filter(|entry| {
                pattern.is_none_or(|re| {
                    entry
                        .file_name()
                        .is_some_and(|name| re.is_match(&name.to_string_lossy()))
                })
            })
            .collect())
    }

    /// Split a mapping line into its fields.
    ///
    /// The line is trimmed first so indentation never yields an empty
    /// leading field.
    #[must_use]
    pub fn split_fields<'a>(&self, line: &'a str) -> Vec<&'a str> {
        self.fields.split(line.trim()).collect()
    }

    /// Resolve a source field against the mapping file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`LineErrorKind::EmptyField`] if the spec is blank.
    pub fn resolve_source(&self, base: &Path, spec: &str) -> Result<SourceSpec, LineErrorKind> {
        let text = self.normalize(spec);
        if text.is_empty() {
            return Err(LineErrorKind::EmptyField);
        }
        let (path, wildcard) = match Self::wildcard_base(&text) {
            Some(dir) => (base.join(dir), true),
            None => (base.join(&text), false),
        };
        Ok(SourceSpec {
            path,
            wildcard,
            text,
        })
    }

    /// Normalize and expand a target field; the result must be absolute.
    ///
    /// # Errors
    ///
    /// Returns [`LineErrorKind::EmptyField`] for a blank spec and
    /// [`LineErrorKind::TargetNotAbsolute`] if expansion does not produce an
    /// absolute path.
    pub fn resolve_target(&self, spec: &str) -> Result<TargetSpec, LineErrorKind> {
        let text = self.normalize(spec);
        if text.is_empty() {
            return Err(LineErrorKind::EmptyField);
        }
        let expanded = self.normalize(&self.expand_variables(&text));
        let path = PathBuf::from(&expanded);
        if !path.is_absolute() {
            return Err(LineErrorKind::TargetNotAbsolute(expanded));
        }
        Ok(TargetSpec { path, text })
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;

    fn resolver() -> PathResolver {
        PathResolver::new()
            .unwrap()
            .with_home(Some(PathBuf::from("/home/u")))
            .with_env(Environment::fixed([("HOME", "/home/u"), ("APP", "nvim")]))
    }

    // -----------------------------------------------------------------------
    // normalize
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_collapses_separator_runs() {
        assert_eq!(resolver().normalize("a//b///c"), "a/b/c");
    }

    #[test]
    fn normalize_trims_whitespace_and_trailing_separator() {
        assert_eq!(resolver().normalize("  config/git/  "), "config/git");
        assert_eq!(resolver().normalize("config/git//"), "config/git");
    }

    #[test]
    fn normalize_preserves_inner_spaces() {
        assert_eq!(
            resolver().normalize("Application Support/Code"),
            "Application Support/Code"
        );
    }

    #[test]
    fn normalize_keeps_root() {
        assert_eq!(resolver().normalize("/"), "/");
        assert_eq!(resolver().normalize("///"), "/");
    }

    #[test]
    fn normalize_is_idempotent() {
        let r = resolver();
        for input in ["a//b/", " x / ", "/", "", "a/ /", "~/.config//nvim/", "dir/*"] {
            let once = r.normalize(input);
            assert_eq!(r.normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    // -----------------------------------------------------------------------
    // expand_variables
    // -----------------------------------------------------------------------

    #[test]
    fn expands_leading_tilde() {
        assert_eq!(resolver().expand_variables("~/.bashrc"), "/home/u/.bashrc");
        assert_eq!(resolver().expand_variables("~"), "/home/u");
    }

    #[test]
    fn only_a_leading_tilde_is_expanded() {
        assert_eq!(resolver().expand_variables("~foo/x"), "/home/ufoo/x");
        assert_eq!(resolver().expand_variables("/a/~/b"), "/a/~/b");
        assert_eq!(resolver().expand_variables("~~"), "/home/u~");
    }

    #[test]
    fn tilde_left_alone_without_home() {
        let r = resolver().with_home(None);
        assert_eq!(r.expand_variables("~/.bashrc"), "~/.bashrc");
    }

    #[test]
    fn expands_unix_variables() {
        assert_eq!(resolver().expand_variables("$HOME/config"), "/home/u/config");
    }

    #[test]
    fn expands_windows_variables() {
        assert_eq!(
            resolver().expand_variables("%HOME%/.config/%APP%"),
            "/home/u/.config/nvim"
        );
    }

    #[test]
    fn expands_every_reference() {
        assert_eq!(
            resolver().expand_variables("$HOME/$APP/$APP"),
            "/home/u/nvim/nvim"
        );
    }

    #[test]
    fn unset_variable_expands_to_empty() {
        assert_eq!(resolver().expand_variables("/x/$NOPE/y"), "/x//y");
    }

    #[test]
    fn malformed_references_are_untouched() {
        assert_eq!(resolver().expand_variables("/a/$/b"), "/a/$/b");
        assert_eq!(resolver().expand_variables("/a/%HOME/b"), "/a/%HOME/b");
        assert_eq!(resolver().expand_variables("/a/%-x%/b"), "/a/%-x%/b");
    }

    // -----------------------------------------------------------------------
    // wildcard_base
    // -----------------------------------------------------------------------

    #[test]
    fn wildcard_requires_full_segment() {
        assert_eq!(PathResolver::wildcard_base("dir/*"), Some("dir"));
        assert_eq!(PathResolver::wildcard_base("a/b/*"), Some("a/b"));
        assert_eq!(PathResolver::wildcard_base("/*"), Some("/"));
        assert_eq!(PathResolver::wildcard_base("*"), Some(""));
        assert_eq!(PathResolver::wildcard_base("dir/*.txt"), None);
        assert_eq!(PathResolver::wildcard_base("dir/a*"), None);
        assert_eq!(PathResolver::wildcard_base("dir"), None);
    }

    // -----------------------------------------------------------------------
    // split_fields
    // -----------------------------------------------------------------------

    #[test]
    fn split_on_two_spaces_or_tabs() {
        let r = resolver();
        assert_eq!(r.split_fields("a b  /c d"), vec!["a b", "/c d"]);
        assert_eq!(r.split_fields("a\t/b"), vec!["a", "/b"]);
        assert_eq!(r.split_fields("a\t\t/b   x$"), vec!["a", "/b", "x$"]);
        assert_eq!(r.split_fields("   a  /b"), vec!["a", "/b"]);
        assert_eq!(r.split_fields("a /b"), vec!["a /b"]);
    }

    // -----------------------------------------------------------------------
    // resolve_source / resolve_target
    // -----------------------------------------------------------------------

    #[test]
    fn source_is_joined_to_base() {
        let spec = resolver()
            .resolve_source(Path::new("/repo/bash"), "bashrc")
            .unwrap();
        assert_eq!(spec.path, PathBuf::from("/repo/bash/bashrc"));
        assert!(!spec.wildcard);
    }

    #[test]
    fn absolute_source_is_kept() {
        let spec = resolver()
            .resolve_source(Path::new("/repo/bash"), "/etc/hosts")
            .unwrap();
        assert_eq!(spec.path, PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn wildcard_source_resolves_to_base_directory() {
        let spec = resolver()
            .resolve_source(Path::new("/repo/nvim"), "config//*")
            .unwrap();
        assert_eq!(spec.path, PathBuf::from("/repo/nvim/config"));
        assert!(spec.wildcard);
        assert_eq!(spec.text, "config/*");
    }

    #[test]
    fn bare_wildcard_enumerates_map_directory() {
        let spec = resolver()
            .resolve_source(Path::new("/repo/nvim"), "*")
            .unwrap();
        assert_eq!(spec.path, PathBuf::from("/repo/nvim"));
        assert!(spec.wildcard);
    }

    #[test]
    fn target_is_expanded_and_renormalized() {
        let r = resolver().with_env(Environment::fixed([("CFG", "/home/u/.config/")]));
        let spec = r.resolve_target("$CFG/nvim/").unwrap();
        assert_eq!(spec.path, PathBuf::from("/home/u/.config/nvim"));
        assert_eq!(spec.text, "$CFG/nvim");
    }

    #[test]
    fn relative_target_is_rejected() {
        let err = resolver().resolve_target("config/git").unwrap_err();
        assert_eq!(err, LineErrorKind::TargetNotAbsolute("config/git".to_string()));
    }

    #[test]
    fn target_relative_after_unset_variable_is_rejected() {
        let err = resolver().resolve_target("$NOPE").unwrap_err();
        assert_eq!(err, LineErrorKind::TargetNotAbsolute(String::new()));
    }

    // -----------------------------------------------------------------------
    // matching_entries
    // -----------------------------------------------------------------------

    #[test]
    fn matching_entries_filters_by_base_name() {
        let fs = MockFileSystemOps::new().with_dir_entries(
            "/d",
            vec![
                PathBuf::from("/d/x.txt"),
                PathBuf::from("/d/y.log"),
                PathBuf::from("/d/z.txt"),
            ],
        );
        let re = Regex::new(r"\.txt$").unwrap();
        let found = PathResolver::matching_entries(&fs, Path::new("/d"), Some(&re)).unwrap();
        assert_eq!(found, vec![PathBuf::from("/d/x.txt"), PathBuf::from("/d/z.txt")]);
    }

    #[test]
    fn matching_entries_pattern_sees_only_base_name() {
        let fs = MockFileSystemOps::new()
            .with_dir_entries("/dir", vec![PathBuf::from("/dir/file")]);
        let re = Regex::new("^dir").unwrap();
        let found = PathResolver::matching_entries(&fs, Path::new("/dir"), Some(&re)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn matching_entries_missing_directory_errors() {
        let fs = MockFileSystemOps::new();
        assert!(PathResolver::matching_entries(&fs, Path::new("/none"), None).is_err());
    }
}
