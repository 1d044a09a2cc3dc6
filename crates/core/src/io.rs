//! Shared file I/O utilities.

use std::{
    collections::BTreeSet,
    fs::{create_dir_all, read, write},
    path::{Component, Path, PathBuf},
};

use glob::{MatchOptions, Pattern, glob_with};

use crate::error::{Error, Result};

/// A file handle for pipeline I/O operations.
#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the file's bytes.
    pub fn read(&self) -> Result<Vec<u8>> {
        read(&self.path).map_err(|e| Error::io(&self.path, e))
    }

    /// Write data to the file, creating parent directories first.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;
        write(&self.path, data).map_err(|e| Error::io(&self.path, e))
    }

    /// Create parent directory if it doesn't exist.
    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        Ok(())
    }
}

impl AsRef<Path> for FontFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Find files matching any of `patterns` under `root`.
///
/// Patterns may use `{a,b}` alternatives. Wildcards also match hidden
/// files. The result is de-duplicated and sorted.
pub fn glob_files(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    // The root is matched literally, even if it contains `[`, `*` or `?`.
    let root_str = root.to_str().ok_or_else(|| Error::Glob(root.display().to_string()))?;
    let prefix = Pattern::escape(root_str.trim_end_matches('/'));

    let mut files = BTreeSet::new();
    for pattern in patterns {
        for expanded in expand_braces(pattern) {
            let full = if Path::new(&expanded).is_absolute() || root_str.is_empty() {
                expanded
            } else {
                format!("{prefix}/{expanded}")
            };
            let paths = glob_with(&full, options).map_err(|e| Error::Glob(format!("{pattern}: {e}")))?;
            files.extend(paths.filter_map(|entry| entry.ok()));
        }
    }
    Ok(files.into_iter().collect())
}

/// Expand `{a,b}` alternatives into one pattern per combination.
///
/// Nested groups are expanded recursively. An unmatched `{` is kept literally.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }

    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(&splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| expand_braces(&format!("{prefix}{}{suffix}", &pattern[w[0] + 1..w[1]])))
        .collect()
}

/// Path of `target` relative to the directory `base`, using `/` separators.
///
/// Both paths are expected to be absolute (or both relative to the same root).
pub fn relative_path(base: &Path, target: &Path) -> String {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();
    let common = base.iter().zip(&target).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); base.len() - common];
    parts.extend(
        target[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Lexically drops `.` components and folds `dir/..` pairs.
///
/// The file system is not consulted, so symlinks are not resolved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(out.components().next_back(), Some(Component::Normal(_))) => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve(root: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() { path.to_path_buf() } else { root.join(path) }
}
