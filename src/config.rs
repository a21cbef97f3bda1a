//! Analyzer and reporter settings.
//!
//! Defaults live in code; a JSON config file may override any subset of
//! them, and CLI flags override the file.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// Nesting ceiling used when nothing else is configured.
///
/// Above serde_json's own parse limit (128), so anything the loader accepts
/// can be analyzed with the default.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How many duplicates the full text report lists before truncating.
pub const DEFAULT_DUPLICATE_LIMIT: usize = 5;

/// Same, for the `duplicates` command listing.
pub const DEFAULT_LISTING_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Deepest node depth (root = 0) a traversal may visit.
    pub max_depth: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub duplicate_limit: usize,
    pub listing_limit: usize,
    pub color: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            duplicate_limit: DEFAULT_DUPLICATE_LIMIT,
            listing_limit: DEFAULT_LISTING_LIMIT,
            color: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub report: ReportConfig,
}

impl Config {
    pub fn parse(src: &str) -> Result<Self> {
        from_str_with_path(src).map_err(anyhow::Error::msg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&src)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> std::result::Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}
