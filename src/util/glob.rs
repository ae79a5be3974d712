//! Wildcard path patterns expanded against the filesystem

use crate::error::{MixError, Result};
use crate::util::sort::sort_paths;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Check if a path argument contains wildcard syntax
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '{', '['])
}

/// Translate a glob pattern into an anchored regular expression
///
/// Supports `*`, `**`, `?`, `{a,b}` and `[...]` character classes. Separators
/// are always `/`.
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let pattern = pattern.replace('\\', "/");
    let mut out = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    let mut in_group = false;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '{' => {
                in_group = true;
                out.push_str("(?:");
            }
            '}' if in_group => {
                in_group = false;
                out.push(')');
            }
            ',' if in_group => out.push('|'),
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .ok_or_else(|| MixError::pattern(&pattern, "unclosed character class"))?;
                let class: String = chars[i + 1..i + 1 + close].iter().collect();
                let class = class.strip_prefix('!').map_or(class.clone(), |rest| format!("^{rest}"));
                out.push('[');
                out.push_str(&class);
                out.push(']');
                i += close + 2;
                continue;
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
        i += 1;
    }

    if in_group {
        return Err(MixError::pattern(&pattern, "unclosed brace group"));
    }

    out.push('$');
    Regex::new(&out).map_err(|e| MixError::pattern(&pattern, e.to_string()))
}

/// Literal directory prefix of a pattern, where walking can start
///
/// Root and drive prefixes are kept, so absolute patterns yield absolute bases.
fn literal_base(pattern: &str) -> PathBuf {
    let pattern = pattern.replace('\\', "/");
    let components: Vec<Component<'_>> = Path::new(&pattern).components().collect();
    let mut base = PathBuf::new();

    for (i, component) in components.iter().enumerate() {
        match component {
            Component::Prefix(_) | Component::RootDir => base.push(component.as_os_str()),
            Component::Normal(segment) => {
                // The last segment is a file name, never a base directory
                if i + 1 == components.len() || is_glob(&segment.to_string_lossy()) {
                    break;
                }
                base.push(segment);
            }
            Component::CurDir => {}
            Component::ParentDir => base.push(".."),
        }
    }
    base
}

/// Expand a glob pattern relative to `root` into the matching files
///
/// Returned paths keep the shape of the pattern: relative patterns yield
/// paths relative to `root`, absolute patterns yield absolute paths.
pub fn expand_glob(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let regex = glob_to_regex(pattern)?;
    let base = literal_base(pattern);
    let absolute = Path::new(pattern).is_absolute();
    let walk_root = if absolute { base.clone() } else { root.join(&base) };

    debug!("Expanding pattern '{}' from {:?}", pattern, walk_root);

    if !walk_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for entry in WalkDir::new(&walk_root).follow_links(true) {
        let entry = entry.map_err(|e| MixError::other(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let candidate = if absolute {
            entry.path().to_path_buf()
        } else {
            match entry.path().strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            }
        };

        let text = candidate.to_string_lossy().replace('\\', "/");
        if regex.is_match(&text) {
            matches.push(candidate);
        }
    }

    sort_paths(&mut matches);
    debug!("Pattern '{}' matched {} files", pattern, matches.len());
    Ok(matches)
}
