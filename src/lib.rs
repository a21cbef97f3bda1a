//! Structural statistics, duplicate detection and required-key validation
//! for parsed JSON values.
//!
//! The core ([`value`], [`analysis`]) takes an already-parsed
//! [`serde_json::Value`] and returns plain result records; it does no I/O.
//! [`loader`] and [`report`] sit around it for the command-line tool.
//!
//! ```
//! use json_analyzer::analysis::{analyze, find_duplicates, validate};
//! use serde_json::json;
//!
//! let doc = json!({"tags": ["a", "b", "a"], "owner": null});
//! let stats = analyze(&doc).unwrap();
//! assert_eq!(stats.null_values, 1);
//!
//! let dups = find_duplicates(&doc).unwrap();
//! assert_eq!(dups[0].path, "root.tags");
//! assert_eq!(dups[0].indices, (0, 2));
//!
//! assert!(!validate(&doc, &["tags", "id"]).valid);
//! ```
pub mod value;
pub mod analysis;
pub mod error;
pub mod config;
pub mod loader;
pub mod report;
pub mod cli;

pub use analysis::{
    AnalysisReport, Analyzer, DuplicateRecord, StructuralStats, ValidationResult,
    analyze, find_duplicates, validate,
};
pub use config::AnalyzerConfig;
pub use error::AnalysisError;
pub use value::{TypeLabel, Value};
