use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::value::{label_of, TypeLabel, Value};
use super::path::{PathStack, Segment};

/// Aggregated shape of a value tree.
///
/// Arrays are counted twice: in `arrays` and in `type_counts["array"]`.
/// Objects only ever appear in `objects`. `null_values` only counts nulls
/// that are the value of an object key; nulls inside arrays show up in
/// `type_counts["null"]` alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StructuralStats {
    pub type_counts: IndexMap<TypeLabel, u64>,
    pub max_depth: usize,
    pub total_keys: u64,
    pub null_values: u64,
    pub arrays: u64,
    pub objects: u64,
}

impl StructuralStats {
    fn at_depth(depth: usize) -> Self {
        Self { max_depth: depth, ..Self::default() }
    }

    fn count(&mut self, label: TypeLabel) {
        *self.type_counts.entry(label).or_insert(0) += 1;
    }

    pub fn type_count(&self, label: TypeLabel) -> u64 {
        self.type_counts.get(&label).copied().unwrap_or(0)
    }

    /// Type distribution by descending count; ties keep first-seen order.
    pub fn most_common(&self) -> Vec<(TypeLabel, u64)> {
        let mut out: Vec<(TypeLabel, u64)> =
            self.type_counts.iter().map(|(k, v)| (*k, *v)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1)); // stable
        out
    }

    /// Fold `other` into `self`. Per field the fold is a sum, except
    /// `max_depth` which takes the maximum.
    pub fn absorb(&mut self, other: StructuralStats) {
        for (label, n) in other.type_counts {
            *self.type_counts.entry(label).or_insert(0) += n;
        }
        self.max_depth = self.max_depth.max(other.max_depth);
        self.total_keys += other.total_keys;
        self.null_values += other.null_values;
        self.arrays += other.arrays;
        self.objects += other.objects;
    }

    pub fn join(a: &Self, b: &Self) -> Self {
        let mut out = a.clone();
        out.absorb(b.clone());
        out
    }
}

// ------------------------------- Walk ------------------------------------- //

/// Walk `root`, refusing to visit nodes deeper than `max_depth`.
pub fn analyze_structure(root: &Value, max_depth: usize) -> Result<StructuralStats> {
    let mut walker = Walker { limit: max_depth, path: PathStack::new() };
    walker.visit(root)
}

struct Walker<'a> {
    limit: usize,
    path: PathStack<'a>,
}

impl<'a> Walker<'a> {
    fn visit(&mut self, v: &'a Value) -> Result<StructuralStats> {
        let depth = self.path.depth();
        if depth > self.limit {
            return Err(AnalysisError::NestingTooDeep { limit: self.limit, path: self.path.render() });
        }

        let mut stats = StructuralStats::at_depth(depth);
        match v {
            Value::Object(m) => {
                stats.objects += 1;
                stats.total_keys += m.len() as u64;
                for (k, child) in m {
                    if child.is_null() {
                        stats.null_values += 1;
                    }
                    self.path.push(Segment::Key(k.as_str()));
                    let sub = self.visit(child)?;
                    self.path.pop();
                    stats.absorb(sub);
                }
            }
            Value::Array(xs) => {
                stats.arrays += 1;
                stats.count(TypeLabel::Array);
                for (i, child) in xs.iter().enumerate() {
                    self.path.push(Segment::Index(i));
                    let sub = self.visit(child)?;
                    self.path.pop();
                    stats.absorb(sub);
                }
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {
                stats.count(label_of(v));
            }
        }
        Ok(stats)
    }
}

// ------------------------------- Tests ------------------------------------ //
