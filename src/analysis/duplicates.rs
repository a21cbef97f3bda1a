use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::value::{canonicalize, CanonicalKey, Value};
use super::path::{PathStack, Segment};

/// Two value-equal elements of one array.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuplicateRecord {
    /// Location of the array, e.g. `root.items[2].tags`.
    pub path: String,
    pub value: Value,
    /// First occurrence, then the first repeat of it.
    pub indices: (usize, usize),
}

/// Report value-equal elements of every array under `root`.
///
/// Arrays are visited in pre-order. Within an array each distinct value is
/// reported at most once, pairing its first index with its first repeat, in
/// the order the repeats are met. Equality is by [`CanonicalKey`].
pub fn find_duplicates_in(root: &Value, max_depth: usize) -> Result<Vec<DuplicateRecord>> {
    let mut finder = Finder { limit: max_depth, path: PathStack::new(), out: Vec::new() };
    finder.visit(root)?;
    Ok(finder.out)
}

struct Finder<'a> {
    limit: usize,
    path: PathStack<'a>,
    out: Vec<DuplicateRecord>,
}

#[derive(Clone, Copy)]
struct Seen {
    first: usize,
    reported: bool,
}

impl<'a> Finder<'a> {
    fn too_deep(&self, path: String) -> AnalysisError {
        AnalysisError::NestingTooDeep { limit: self.limit, path }
    }

    fn visit(&mut self, v: &'a Value) -> Result<()> {
        if self.path.depth() > self.limit {
            return Err(self.too_deep(self.path.render()));
        }
        match v {
            Value::Array(xs) => {
                self.scan_array(xs)?;
                for (i, x) in xs.iter().enumerate() {
                    self.path.push(Segment::Index(i));
                    self.visit(x)?;
                    self.path.pop();
                }
            }
            Value::Object(m) => {
                for (k, x) in m {
                    self.path.push(Segment::Key(k.as_str()));
                    self.visit(x)?;
                    self.path.pop();
                }
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
        Ok(())
    }

    /// Within-array pass over the elements of the array at the current path.
    ///
    /// Keys are rebuilt for every array on the way down, so a node nested in
    /// `k` arrays is canonicalized `k` times. `limit` bounds `k`.
    fn scan_array(&mut self, xs: &'a [Value]) -> Result<()> {
        // elements sit one level below the array
        let levels = self.limit.checked_sub(self.path.depth() + 1);
        let mut seen: HashMap<CanonicalKey, Seen> = HashMap::with_capacity(xs.len());

        for (i, x) in xs.iter().enumerate() {
            let key = levels
                .and_then(|levels| canonicalize(x, levels))
                .ok_or_else(|| self.too_deep(self.path.render_with(Segment::Index(i))))?;

            match seen.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(Seen { first: i, reported: false });
                }
                Entry::Occupied(mut slot) => {
                    let s = slot.get_mut();
                    if !s.reported {
                        s.reported = true;
                        self.out.push(DuplicateRecord {
                            path: self.path.render(),
                            value: x.clone(),
                            indices: (s.first, i),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
