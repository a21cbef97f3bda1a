use thiserror::Error;

/// Failure of a core traversal.
///
/// Well-formed values only fail when their nesting exceeds the configured
/// ceiling; validation against a non-object root is reported through
/// [`crate::analysis::ValidationResult::error`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("nesting deeper than {limit} levels at {path}")]
    NestingTooDeep { limit: usize, path: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
