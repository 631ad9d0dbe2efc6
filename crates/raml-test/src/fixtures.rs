//! Shared fixtures and throwaway include trees.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;

use raml_parser::{Raml, RamlError};

/// Errors from fixture helpers.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse failed: {0}")]
    Parse(#[from] RamlError),
}

/// Absolute path to the shared `tests/fixtures` directory.
pub fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR = .../crates/raml-test
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures")
}

/// Absolute path to one fixture file.
pub fn fixture(relative: &str) -> PathBuf {
    fixtures_dir().join(relative)
}

/// A set of RAML files written to a temporary directory.
///
/// The directory lives as long as the tree does.
pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    /// Create an empty tree.
    pub fn new() -> Result<Self, TestError> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Write `contents` at `relative`, creating parent directories.
    pub fn with_file(self, relative: &str, contents: &str) -> Result<Self, TestError> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(self)
    }

    /// Absolute path of a file in the tree.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Parse the document at `relative`.
    pub fn parse(&self, relative: &str) -> Result<Raml, TestError> {
        Ok(Raml::from_file(self.path(relative))?)
    }
}
