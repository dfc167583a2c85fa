//! Normalized path handling for reports and cross-platform trees

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Statistics trees are produced on Windows laptops and processed elsewhere,
/// so every path that ends up in a report or a manifest goes through this
/// type. Conversion back to a platform path happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Canonicalize an existing path without the `\\?\` prefix on Windows.
    pub fn canonical(path: impl AsRef<Path>) -> std::io::Result<Self> {
        dunce::canonicalize(path.as_ref()).map(Self::new)
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let inner = if self.inner.is_empty() {
            segment
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner }
    }

    /// Get the final component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present. Dot-files have no extension.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

/// Names that extraction tools and file managers leave behind
/// (`__MACOSX`, `.DS_Store`, `_old`) are not part of a statistics tree.
pub fn is_visible_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.starts_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_become_forward_slashes() {
        let path = NormalizedPath::new(r"C:\Users\loader\collected-data");
        assert_eq!(path.as_str(), "C:/Users/loader/collected-data");
        assert_eq!(path.file_name(), Some("collected-data"));
        assert_eq!(path.join("2014-1").as_str(), "C:/Users/loader/collected-data/2014-1");
    }

    #[test]
    fn test_canonical_path_of_existing_dir_is_absolute() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = NormalizedPath::canonical(temp.path()).unwrap();
        assert!(path.is_dir());
        assert!(NormalizedPath::canonical(temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_hidden_and_underscore_names_are_not_visible() {
        assert!(is_visible_name("2014-1"));
        assert!(!is_visible_name("__MACOSX"));
        assert!(!is_visible_name(".DS_Store"));
        assert!(!is_visible_name(""));
    }
}
