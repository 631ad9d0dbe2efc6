//! Test harnesses for the `raml` tool.
//!
//! Provides [`fixtures`] for locating the shared RAML fixture tree and
//! [`FixtureTree`] for building throwaway include trees on disk.

#[cfg(test)]
pub mod cli;
pub mod fixtures;

pub use fixtures::{fixture, fixtures_dir, FixtureTree, TestError};
