use std::path::{Path, PathBuf};

/// One path or an ordered list of paths passed to a builder method
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources(Vec<String>);

impl Sources {
    pub fn paths(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for Sources {
    fn from(path: &str) -> Self {
        Self(vec![path.to_string()])
    }
}

impl From<String> for Sources {
    fn from(path: String) -> Self {
        Self(vec![path])
    }
}

impl From<&String> for Sources {
    fn from(path: &String) -> Self {
        Self(vec![path.clone()])
    }
}

impl From<&Path> for Sources {
    fn from(path: &Path) -> Self {
        Self(vec![path.to_string_lossy().to_string()])
    }
}

impl From<PathBuf> for Sources {
    fn from(path: PathBuf) -> Self {
        Self::from(path.as_path())
    }
}

impl From<Vec<String>> for Sources {
    fn from(paths: Vec<String>) -> Self {
        Self(paths)
    }
}

impl From<Vec<&str>> for Sources {
    fn from(paths: Vec<&str>) -> Self {
        Self(paths.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Sources {
    fn from(paths: &[&str]) -> Self {
        Self(paths.iter().map(|p| p.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Sources {
    fn from(paths: [&str; N]) -> Self {
        Self(paths.iter().map(|p| p.to_string()).collect())
    }
}
