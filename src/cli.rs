//! CLI: load → analyze → (text | json)
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;

use crate::analysis::{AnalysisReport, Analyzer};
use crate::config::Config;
use crate::loader::{self, Document};
use crate::report;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// analyze, deduplicate-check and validate JSON documents
#[derive(Parser, Debug)]
#[command(name = "json-analyzer", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// disable colored output
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// full report: structure, type distribution, duplicates (and keys with --keys)
    Analyze(AnalyzeOut),
    /// list duplicate values found inside arrays
    Duplicates(DuplicatesOut),
    /// check that the top-level object has the required keys
    Validate(ValidateOut),
    /// pretty-print the documents
    Pretty(PrettyOut),
}

#[derive(Args, Debug, Clone)]
struct SourceSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0)
    #[arg(long)]
    json_pointer: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    #[command(flatten)]
    source: SourceSettings,

    /// deepest nesting level analyses may descend to
    #[arg(long)]
    max_depth: Option<usize>,

    /// JSON config file with `analyzer` and `report` sections
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(clap::Parser, Debug)]
struct AnalyzeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// also validate these required keys (comma-separated)
    #[arg(long)]
    keys: Option<String>,

    /// duplicates to list before truncating
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(clap::Parser, Debug)]
struct DuplicatesOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// duplicates to list before truncating
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(clap::Parser, Debug)]
struct ValidateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// required keys (comma-separated), e.g. api_key,version
    #[arg(long, required = true)]
    keys: String,
}

#[derive(clap::Parser, Debug)]
struct PrettyOut {
    #[command(flatten)]
    source: SourceSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// File config with CLI overrides applied.
    fn config(&self) -> Result<Config> {
        let mut config = match self.config.as_ref() {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(max_depth) = self.max_depth {
            config.analyzer.max_depth = max_depth;
        }
        tracing::debug!(?config, "effective config");
        Ok(config)
    }
}

impl SourceSettings {
    /// Load every input and run `apply` on each, in parallel. Results keep
    /// input order; any failure fails the whole batch.
    fn load_process<T, F>(&self, apply: F) -> Result<Vec<(Document, T)>>
    where
        T: Send,
        F: Fn(&Document) -> Result<T> + Sync,
    {
        let source_paths = loader::resolve_inputs(&self.input)
            .context("failed to resolve input file paths")?;
        source_paths
            .par_iter()
            .map(|path| {
                let doc = loader::load_document(path, self.json_pointer.as_deref())?;
                let out = apply(&doc)
                    .with_context(|| format!("failed to analyze {}", path.display()))?;
                Ok((doc, out))
            })
            .collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Run the selected command. `Ok(false)` means some validation failed.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Analyze(target) => {
                let mut config = target.input_settings.config()?;
                apply_color_setting(&config);
                if let Some(limit) = target.limit {
                    config.report.duplicate_limit = limit;
                }
                let keys = target.keys.as_deref().map(split_keys);
                let analyzer = Analyzer::new(config.analyzer);
                let results = target.input_settings.source.load_process(|doc| {
                    Ok(analyzer.full_report(&doc.value, keys.as_deref())?)
                })?;

                let rendered = match target.output_settings.format {
                    Format::Json => report::render_json(&results)?,
                    Format::Text => results
                        .iter()
                        .map(|(doc, r)| report::render_text(doc, r, &config.report))
                        .collect::<Vec<_>>()
                        .join("\n"),
                };
                write_output(target.output_settings.out.as_ref(), &rendered)?;
                Ok(all_valid(&results))
            }
            Command::Duplicates(target) => {
                let config = target.input_settings.config()?;
                apply_color_setting(&config);
                let limit = target.limit.unwrap_or(config.report.listing_limit);
                let analyzer = Analyzer::new(config.analyzer);
                let results = target.input_settings.source.load_process(|doc| {
                    let mut r = AnalysisReport::empty(&doc.value);
                    r.duplicates = Some(analyzer.find_duplicates(&doc.value)?);
                    Ok(r)
                })?;

                let rendered = match target.output_settings.format {
                    Format::Json => report::render_json(&results)?,
                    Format::Text => results
                        .iter()
                        .map(|(doc, r)| {
                            report::render_duplicates(doc, r.duplicates.as_deref().unwrap_or_default(), limit)
                        })
                        .collect::<String>(),
                };
                write_output(target.output_settings.out.as_ref(), &rendered)?;
                Ok(true)
            }
            Command::Validate(target) => {
                let config = target.input_settings.config()?;
                apply_color_setting(&config);
                let keys = split_keys(&target.keys);
                let analyzer = Analyzer::new(config.analyzer);
                let results = target.input_settings.source.load_process(|doc| {
                    let mut r = AnalysisReport::empty(&doc.value);
                    r.validation = Some(analyzer.validate(&doc.value, &keys));
                    Ok(r)
                })?;

                let rendered = match target.output_settings.format {
                    Format::Json => report::render_json(&results)?,
                    Format::Text => results
                        .iter()
                        .map(|(doc, r)| report::render_text(doc, r, &config.report))
                        .collect::<Vec<_>>()
                        .join("\n"),
                };
                write_output(target.output_settings.out.as_ref(), &rendered)?;
                let valid = all_valid(&results);
                if !valid {
                    tracing::warn!("schema validation failed");
                }
                Ok(valid)
            }
            Command::Pretty(target) => {
                let results = target.source.load_process(report::render_pretty)?;
                let rendered = results
                    .into_iter()
                    .map(|(_, text)| text)
                    .collect::<Vec<_>>()
                    .join("\n");
                write_output(target.out.as_ref(), &rendered)?;
                Ok(true)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// `"a, b,c"` → `["a", "b", "c"]`; keeps order and repeats.
fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',').map(|k| k.trim().to_string()).collect()
}

fn apply_color_setting(config: &Config) {
    if !config.report.color {
        colored::control::set_override(false);
    }
}

fn all_valid(results: &[(Document, AnalysisReport)]) -> bool {
    results.iter().all(|(_, r)| r.is_valid())
}

fn write_output(out: Option<&PathBuf>, src: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(path = %out.display(), "wrote output");
        }
        None => println!("{src}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        CommandLineInterface::command().debug_assert();
    }

    #[test]
    fn keys_are_trimmed_in_order() {
        assert_eq!(split_keys("api_key, version ,api_key"), vec!["api_key", "version", "api_key"]);
    }

    #[test]
    fn parses_validate_command() {
        let cli = CommandLineInterface::try_parse_from([
            "json-analyzer", "validate", "-i", "a.json", "b.json", "--keys", "x,y", "--format", "json",
        ])
        .unwrap();
        match cli.cmd {
            Command::Validate(v) => {
                assert_eq!(v.input_settings.source.input, vec!["a.json", "b.json"]);
                assert_eq!(v.keys, "x,y");
                assert_eq!(v.output_settings.format, Format::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn max_depth_flag_overrides_config() {
        let cli = CommandLineInterface::try_parse_from([
            "json-analyzer", "analyze", "-i", "a.json", "--max-depth", "7",
        ])
        .unwrap();
        let Command::Analyze(a) = cli.cmd else { panic!("expected analyze") };
        assert_eq!(a.input_settings.config().unwrap().analyzer.max_depth, 7);
    }

    fn run_args(args: &[&str]) -> Result<bool> {
        let argv = std::iter::once("json-analyzer").chain(args.iter().copied());
        CommandLineInterface::try_parse_from(argv).unwrap().run()
    }

    fn write_input(dir: &std::path::Path, name: &str, src: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, src).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn validate_reports_missing_keys_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.json", r#"{"a": 1}"#);
        let out = dir.path().join("sub").join("out.json");
        let out_str = out.to_string_lossy().to_string();

        let valid = run_args(&[
            "validate", "-i", &input, "--keys", "a,b", "--format", "json", "-o", &out_str,
        ])
        .unwrap();
        assert!(!valid);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written[0]["root_type"], "object");
        assert_eq!(
            written[0]["validation"],
            serde_json::json!({"valid": false, "found_keys": ["a"], "missing_keys": ["b"]})
        );
    }

    #[test]
    fn validate_passes_when_every_key_is_present() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "a.json", r#"{"a": 1, "b": null}"#);
        let out = dir.path().join("report.txt").to_string_lossy().to_string();
        assert!(run_args(&["validate", "-i", &input, "--keys", "a, b", "-o", &out]).unwrap());
    }

    #[test]
    fn analyze_fails_on_any_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_input(dir.path(), "good.json", r#"{"id": 1}"#);
        let bad = write_input(dir.path(), "bad.json", r#"[1, 2]"#);
        let out = dir.path().join("out.json").to_string_lossy().to_string();
        let valid = run_args(&[
            "analyze", "-i", &good, &bad, "--keys", "id", "--format", "json", "-o", &out,
        ])
        .unwrap();
        assert!(!valid);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written.as_array().unwrap().len(), 2);
        assert_eq!(written[0]["validation"]["valid"], true);
        assert_eq!(written[1]["validation"]["error"], "root must be an object");
    }

    #[test]
    fn malformed_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "broken.json", "{\"a\": }");
        let out = dir.path().join("out.json").to_string_lossy().to_string();
        let err = run_args(&["validate", "-i", &input, "--keys", "a", "-o", &out]).unwrap_err();
        assert!(format!("{err:#}").contains("line 1"), "{err:#}");
        assert!(!std::path::Path::new(&out).exists());
    }

    #[test]
    fn duplicates_limit_truncates_listing() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "d.json", r#"[[1, 1], [2, 2], [3, 3]]"#);
        let out = dir.path().join("dups.txt");
        let out_str = out.to_string_lossy().to_string();
        assert!(run_args(&["duplicates", "-i", &input, "--limit", "1", "-o", &out_str]).unwrap());

        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("found 3 duplicate entries"), "{text}");
        assert!(text.contains("root[0]: 1"));
        assert!(!text.contains("root[1]"));
        assert!(text.contains("and 2 more"));
    }

    #[test]
    fn pretty_writes_selected_subnode() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "p.json", r#"{"data": {"z": 1, "a": 2}}"#);
        let out = dir.path().join("pretty.json");
        let out_str = out.to_string_lossy().to_string();
        assert!(run_args(&["pretty", "-i", &input, "--json-pointer", "/data", "-o", &out_str]).unwrap());

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text, "{\n  \"z\": 1,\n  \"a\": 2\n}");
    }

    #[test]
    fn pretty_rejects_analysis_flags() {
        for flag in [["--max-depth", "0"], ["--config", "c.json"]] {
            let parsed = CommandLineInterface::try_parse_from(
                ["json-analyzer", "pretty", "-i", "a.json"].into_iter().chain(flag),
            );
            assert!(parsed.is_err(), "{flag:?} should not be accepted");
        }
    }
}
