//! Traversal and aggregation engine.
//!
//! Three independent passes over an already-parsed value:
//! - structural statistics (type distribution, depth, key and null counts)
//! - duplicate elements inside arrays
//! - required-key validation of the top-level object
//!
//! Every pass is pure and keeps its accumulators local to the call. The two
//! recursive passes stop with [`crate::error::AnalysisError::NestingTooDeep`] instead of
//! descending past [`AnalyzerConfig::max_depth`].
pub mod structure;
pub mod duplicates;
pub mod schema;
mod path;

use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::value::{label_of, TypeLabel, Value};

pub use structure::StructuralStats;
pub use duplicates::DuplicateRecord;
pub use schema::ValidationResult;

// ------------------------------- Report ----------------------------------- //

/// Results of whichever passes were run over one value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub root_type: TypeLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StructuralStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<DuplicateRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

impl AnalysisReport {
    pub fn empty(root: &Value) -> Self {
        Self { root_type: label_of(root), stats: None, duplicates: None, validation: None }
    }

    /// False only when a validation ran and failed.
    pub fn is_valid(&self) -> bool {
        self.validation.as_ref().is_none_or(|v| v.valid)
    }
}

// ------------------------------- Front API -------------------------------- //

#[derive(Clone, Debug, Default)]
pub struct Analyzer { config: AnalyzerConfig }

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self { Self { config } }

    pub fn config(&self) -> &AnalyzerConfig { &self.config }

    pub fn analyze(&self, v: &Value) -> Result<StructuralStats> {
        let stats = structure::analyze_structure(v, self.config.max_depth)?;
        tracing::debug!(
            objects = stats.objects,
            arrays = stats.arrays,
            max_depth = stats.max_depth,
            "structure analyzed"
        );
        Ok(stats)
    }

    pub fn find_duplicates(&self, v: &Value) -> Result<Vec<DuplicateRecord>> {
        let dups = duplicates::find_duplicates_in(v, self.config.max_depth)?;
        tracing::debug!(count = dups.len(), "duplicate scan finished");
        Ok(dups)
    }

    pub fn validate<S: AsRef<str>>(&self, v: &Value, required_keys: &[S]) -> ValidationResult {
        let result = schema::validate_required_keys(v, required_keys);
        tracing::debug!(valid = result.valid, missing = result.missing_keys.len(), "keys validated");
        result
    }

    /// Structure and duplicates, plus validation when keys are given.
    pub fn full_report<S: AsRef<str>>(
        &self,
        v: &Value,
        required_keys: Option<&[S]>,
    ) -> Result<AnalysisReport> {
        let mut report = AnalysisReport::empty(v);
        report.stats = Some(self.analyze(v)?);
        report.duplicates = Some(self.find_duplicates(v)?);
        report.validation = required_keys.map(|keys| self.validate(v, keys));
        Ok(report)
    }
}

pub fn analyze(v: &Value) -> Result<StructuralStats> {
    Analyzer::default().analyze(v)
}

pub fn find_duplicates(v: &Value) -> Result<Vec<DuplicateRecord>> {
    Analyzer::default().find_duplicates(v)
}

pub fn validate<S: AsRef<str>>(v: &Value, required_keys: &[S]) -> ValidationResult {
    schema::validate_required_keys(v, required_keys)
}

// ------------------------------- Tests ------------------------------------ //
