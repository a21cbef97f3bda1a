//! Reads input files into parsed documents.
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

/// One parsed input file.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<SystemTime>,
    pub value: Value,
}

impl Document {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

/// Read and parse `path`, then optionally narrow to the node at the RFC 6901
/// `pointer` (e.g. `/data/items/0`).
pub fn load_document(path: &Path, pointer: Option<&str>) -> Result<Document> {
    let path_str = path.to_string_lossy().to_string();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file {path_str}"))?;
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("failed to stat source file {path_str}"))?;

    let value = parse_source(&source)
        .with_context(|| format!("failed to parse JSON source file ({path_str})"))?;
    let value = match pointer {
        None => value,
        Some(ptr) => select_pointer(value, ptr)
            .with_context(|| format!("in source file ({path_str})"))?,
    };
    tracing::info!(path = %path_str, bytes = metadata.len(), "loaded document");

    Ok(Document {
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
        modified: metadata.modified().ok(),
        value,
    })
}

/// Parse JSON text, naming line and column on syntax errors.
pub fn parse_source(source: &str) -> Result<Value> {
    serde_json::from_str::<Value>(source).map_err(|error| {
        anyhow!(
            "JSON syntax error at line {}, col {}: {error}",
            error.line(),
            error.column()
        )
    })
}

fn select_pointer(mut value: Value, pointer: &str) -> Result<Value> {
    if !pointer.is_empty() && !pointer.starts_with('/') {
        bail!("JSON pointer must be empty or start with '/': {pointer}");
    }
    match value.pointer_mut(pointer) {
        Some(node) => Ok(node.take()),
        None => bail!("JSON pointer {pointer} matched nothing"),
    }
}

/// Expand literal paths and glob patterns, in argument order.
///
/// A pattern with glob syntax that matches no file is an error.
pub fn resolve_inputs<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }
    Ok(out)
}
