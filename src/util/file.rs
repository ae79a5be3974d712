use crate::error::{MixError, Result};
use crate::util::glob::{expand_glob, is_glob};
use crate::util::sort::sort_paths;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// A path argument as written by the caller, plus its location on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRef {
    /// Normalized path as given (relative paths stay relative)
    pub path: PathBuf,
    /// Path resolved against the project root
    #[serde(skip)]
    pub absolute: PathBuf,
}

impl FileRef {
    pub fn new(root: &Path, path: impl AsRef<Path>) -> Self {
        let path = normalize_path(path);
        let absolute = resolve(root, &path);
        Self { path, absolute }
    }

    /// File name without its extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Whether the path names a file (has an extension) rather than a directory
    pub fn is_file(&self) -> bool {
        self.path.extension().is_some()
    }

    pub fn display(&self) -> String {
        to_slash(&self.path)
    }
}

/// Drop `.` components and trailing separators
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let normalized: PathBuf = path
        .as_ref()
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Resolve a path against the project root unless it is already absolute
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Render a path with forward slashes
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Strip a base directory from a path, keeping the path when it is outside the base
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// List the top-level files of a directory, in lexicographic order
///
/// Returned paths are `dir` joined with each file name, so a relative
/// directory yields relative paths.
pub fn list_directory(root: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(resolve(root, dir))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(dir.join(entry.file_name()));
        }
    }

    sort_paths(&mut files);
    debug!("Directory {:?} contains {} files", dir, files.len());
    Ok(files)
}

/// Expand caller path arguments into a concrete file list
///
/// Globs are matched against the filesystem, directories are replaced by
/// their top-level files, and anything else is kept as given.
pub fn expand_paths(root: &Path, paths: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for raw in paths {
        if is_glob(raw) {
            files.extend(expand_glob(root, raw)?);
            continue;
        }

        let path = normalize_path(raw);
        if resolve(root, &path).is_dir() {
            files.extend(list_directory(root, &path)?);
        } else {
            files.push(path);
        }
    }
    Ok(files)
}

/// SHA-256 of a file's content, hex encoded
pub fn hash_file(path: &Path) -> Result<String> {
    let content = std::fs::read(path)
        .map_err(|e| MixError::other(format!("Cannot read {}: {}", path.display(), e)))?;
    Ok(hex::encode(Sha256::digest(&content)))
}
