//! Where unit contents come from.
//!
//! The graph builder and the assembler both read units through
//! [`UnitSource`]. [`FsSource`] resolves ids against a root directory (the
//! working directory by default, never the including file's directory);
//! [`MemorySource`] keeps everything in a map.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::trace;

use crate::core::error::MergeError;
use crate::infra::io::read_file_smart;

/// Read access to units by id.
pub trait UnitSource {
    /// Full content of a unit split into lines, terminators removed.
    fn read_lines(&self, unit: &Utf8Path) -> Result<Vec<String>, MergeError>;

    /// Whether `unit` names an existing regular file.
    fn is_file(&self, unit: &Utf8Path) -> bool;
}

impl<S: UnitSource + ?Sized> UnitSource for &S {
    fn read_lines(&self, unit: &Utf8Path) -> Result<Vec<String>, MergeError> {
        (**self).read_lines(unit)
    }

    fn is_file(&self, unit: &Utf8Path) -> bool {
        (**self).is_file(unit)
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}

/// Filesystem-backed source.
#[derive(Debug, Clone, Default)]
pub struct FsSource {
    root: Utf8PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Source rooted at the process working directory.
    pub fn current_dir() -> Self {
        Self::default()
    }

    pub fn resolve(&self, unit: &Utf8Path) -> Utf8PathBuf {
        self.root.join(unit)
    }
}

impl UnitSource for FsSource {
    fn read_lines(&self, unit: &Utf8Path) -> Result<Vec<String>, MergeError> {
        let path = self.resolve(unit);
        trace!(%path, "reading unit");

        let unreadable = |source: std::io::Error| MergeError::UnreadableUnit {
            unit: unit.to_owned(),
            source,
        };

        let content = read_file_smart(&path).map_err(unreadable)?;
        let text = content.text().map_err(unreadable)?;

        Ok(split_lines(text))
    }

    fn is_file(&self, unit: &Utf8Path) -> bool {
        self.resolve(unit).is_file()
    }
}

/// In-memory source keyed by unit id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<Utf8PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, unit: impl Into<Utf8PathBuf>, content: impl Into<String>) -> Self {
        self.insert(unit, content);
        self
    }

    pub fn insert(&mut self, unit: impl Into<Utf8PathBuf>, content: impl Into<String>) {
        self.files.insert(unit.into(), content.into());
    }
}

impl UnitSource for MemorySource {
    fn read_lines(&self, unit: &Utf8Path) -> Result<Vec<String>, MergeError> {
        self.files
            .get(unit)
            .map(|text| split_lines(text))
            .ok_or_else(|| MergeError::UnreadableUnit {
                unit: unit.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such unit"),
            })
    }

    fn is_file(&self, unit: &Utf8Path) -> bool {
        self.files.contains_key(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_lines() {
        let src = MemorySource::new().with("a.hpp", "one\r\ntwo\nthree");
        let lines = src.read_lines(Utf8Path::new("a.hpp")).unwrap();
        assert_eq!(lines, vec!["one", "two", "three"]);
        assert!(src.is_file(Utf8Path::new("a.hpp")));
        assert!(!src.is_file(Utf8Path::new("b.hpp")));
    }

    #[test]
    fn test_memory_source_missing_unit() {
        let err = MemorySource::new()
            .read_lines(Utf8Path::new("gone.hpp"))
            .unwrap_err();
        assert!(matches!(err, MergeError::UnreadableUnit { ref unit, .. } if unit == "gone.hpp"));
    }

    #[test]
    fn test_fs_source_resolves_against_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("src/a.hpp"), "int a;\n").unwrap();

        let src = FsSource::new(root);
        assert!(src.is_file(Utf8Path::new("src/a.hpp")));
        assert!(!src.is_file(Utf8Path::new("src")));
        assert_eq!(src.read_lines(Utf8Path::new("src/a.hpp")).unwrap(), vec!["int a;"]);

        let err = src.read_lines(Utf8Path::new("src/missing.hpp")).unwrap_err();
        assert!(matches!(err, MergeError::UnreadableUnit { .. }));
    }
}
