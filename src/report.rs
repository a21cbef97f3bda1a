//! Renders analysis results for people (text) and for tools (JSON).
//!
//! Nothing in here computes anything; it only lays out records produced by
//! [`crate::analysis`]. Colors come from `colored` and follow its global
//! override, which the CLI switches off for `--no-color`.
use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Local};
use colored::Colorize;
use serde::Serialize;

use crate::analysis::{AnalysisReport, DuplicateRecord, StructuralStats, ValidationResult};
use crate::config::ReportConfig;
use crate::loader::Document;

const WIDTH: usize = 60;

// ------------------------------- Text ------------------------------------- //

/// Full human-readable report for one document.
pub fn render_text(doc: &Document, report: &AnalysisReport, settings: &ReportConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", banner(" JSON Analysis Report ", '=').as_str().bold());
    let _ = writeln!(out, "File: {}", doc.file_name().as_str().cyan());
    let _ = writeln!(out, "Size: {:.2} KB", doc.size_bytes as f64 / 1024.0);
    if let Some(modified) = doc.modified {
        let modified: DateTime<Local> = modified.into();
        let _ = writeln!(out, "Modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(stats) = &report.stats {
        write_structure(&mut out, report, stats);
    }
    if let Some(dups) = &report.duplicates {
        write_duplicates_section(&mut out, dups, settings.duplicate_limit);
    }
    if let Some(validation) = &report.validation {
        write_validation(&mut out, validation);
    }
    let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    out
}

fn write_structure(out: &mut String, report: &AnalysisReport, stats: &StructuralStats) {
    let _ = writeln!(out, "\n{}", banner("Structure Analysis ", '-'));
    let _ = writeln!(out, "├─ Root Type: {}", report.root_type);
    let _ = writeln!(out, "├─ Max Depth: {} levels", stats.max_depth);
    let _ = writeln!(out, "├─ Total Keys: {}", stats.total_keys);
    let _ = writeln!(out, "├─ Objects: {}", stats.objects);
    let _ = writeln!(out, "├─ Arrays: {}", stats.arrays);
    let _ = writeln!(out, "└─ Null Values: {}", stats.null_values);

    let _ = writeln!(out, "\n{}", banner("Type Distribution ", '-'));
    for (label, count) in stats.most_common() {
        let _ = writeln!(out, "  • {label}: {count}");
    }
}

fn write_duplicates_section(out: &mut String, dups: &[DuplicateRecord], limit: usize) {
    if dups.is_empty() {
        let _ = writeln!(out, "\n{}", "No duplicates detected".green());
        return;
    }
    let _ = writeln!(out, "\n{}", banner("Duplicates Found ", '-').as_str().yellow());
    for dup in dups.iter().take(limit) {
        let _ = writeln!(out, "  • Path: {}", dup.path);
        let _ = writeln!(out, "    Indices: [{}, {}]", dup.indices.0, dup.indices.1);
    }
    write_truncation(out, dups.len(), limit);
}

fn write_validation(out: &mut String, validation: &ValidationResult) {
    let _ = writeln!(out, "\n{}", banner("Schema Validation ", '-'));
    let status = if validation.valid { "VALID".green() } else { "INVALID".red() };
    let _ = writeln!(out, "Status: {status}");
    if let Some(error) = &validation.error {
        let _ = writeln!(out, "Error: {error}");
    }
    if !validation.found_keys.is_empty() {
        let _ = writeln!(out, "Found: {}", validation.found_keys.join(", "));
    }
    if !validation.missing_keys.is_empty() {
        let _ = writeln!(out, "Missing: {}", validation.missing_keys.join(", "));
    }
}

/// Short listing used by the `duplicates` command.
pub fn render_duplicates(doc: &Document, dups: &[DuplicateRecord], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: found {} duplicate entries", doc.file_name().as_str().cyan(), dups.len());
    for dup in dups.iter().take(limit) {
        let _ = writeln!(out, "  • {}: {}", dup.path, dup.value);
    }
    write_truncation(&mut out, dups.len(), limit);
    out
}

fn write_truncation(out: &mut String, total: usize, limit: usize) {
    if total > limit {
        let _ = writeln!(out, "  … and {} more", total - limit);
    }
}

/// `text` centered in a `WIDTH`-wide line of `fill`.
fn banner(text: &str, fill: char) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return text.to_string();
    }
    let left = (WIDTH - len) / 2;
    let right = WIDTH - len - left;
    format!("{}{}{}", fill.to_string().repeat(left), text, fill.to_string().repeat(right))
}

// ------------------------------- JSON ------------------------------------- //

#[derive(Serialize)]
struct DocumentReport<'a> {
    file: String,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

/// Machine-readable reports, one entry per document, in input order.
pub fn render_json(results: &[(Document, AnalysisReport)]) -> Result<String> {
    let entries: Vec<DocumentReport<'_>> = results
        .iter()
        .map(|(doc, report)| DocumentReport { file: doc.path.to_string_lossy().to_string(), report })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// The document itself, indented, with key order and non-ASCII text kept.
pub fn render_pretty(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(&doc.value)?)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use serde_json::{json, Value};
    use std::path::PathBuf;

    fn doc(value: Value) -> Document {
        Document { path: PathBuf::from("dir/sample.json"), size_bytes: 2048, modified: None, value }
    }

    #[test]
    fn banner_is_centered() {
        let b = banner("ab", '-');
        assert_eq!(b.chars().count(), WIDTH);
        assert!(b.starts_with("-----"));
        assert!(b.contains("ab"));
    }

    #[test]
    fn text_report_sections() {
        colored::control::set_override(false);
        let d = doc(json!({"a": [1, 1], "b": null}));
        let report = Analyzer::default().full_report(&d.value, Some(&["a", "c"][..])).unwrap();
        let text = render_text(&d, &report, &ReportConfig::default());

        assert!(text.contains("File: sample.json"), "{text}");
        assert!(text.contains("Size: 2.00 KB"));
        assert!(text.contains("├─ Root Type: object"));
        assert!(text.contains("├─ Max Depth: 2 levels"));
        assert!(text.contains("└─ Null Values: 1"));
        assert!(text.contains("  • number: 2"));
        assert!(text.contains("  • Path: root.a"));
        assert!(text.contains("    Indices: [0, 1]"));
        assert!(text.contains("Status: INVALID"));
        assert!(text.contains("Missing: c"));
    }

    #[test]
    fn duplicate_listing_truncates() {
        colored::control::set_override(false);
        let d = doc(json!([[1, 1], [2, 2], [3, 3]]));
        let dups = Analyzer::default().find_duplicates(&d.value).unwrap();
        assert_eq!(dups.len(), 3);
        let text = render_duplicates(&d, &dups, 2);
        assert!(text.contains("found 3 duplicate entries"));
        assert!(text.contains("  • root[0]: 1"));
        assert!(!text.contains("root[2]"));
        assert!(text.contains("and 1 more"));
    }

    #[test]
    fn json_report_flattens_file_name() {
        let d = doc(json!([1, 1]));
        let report = Analyzer::default().full_report::<&str>(&d.value, None).unwrap();
        let out: Value = serde_json::from_str(&render_json(&[(d, report)]).unwrap()).unwrap();
        assert_eq!(out[0]["file"], "dir/sample.json");
        assert_eq!(out[0]["root_type"], "array");
        assert_eq!(out[0]["duplicates"][0], json!({"path": "root", "value": 1, "indices": [0, 1]}));
    }

    #[test]
    fn pretty_keeps_order_and_unicode() {
        let d = doc(json!({"z": "ü", "a": 1}));
        let text = render_pretty(&d).unwrap();
        assert!(text.find("\"z\"").unwrap() < text.find("\"a\"").unwrap());
        assert!(text.contains("ü"));
    }
}
