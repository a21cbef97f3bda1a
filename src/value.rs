//! Value model shared by every analysis.
//!
//! The tree itself is `serde_json::Value` built with `preserve_order`, so
//! objects keep insertion order. This module adds the closed set of type
//! labels and the canonical form used to compare values for equality.
use std::collections::BTreeMap;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::Serialize;

pub use serde_json::{Map, Value};

// ------------------------------ Labels ----------------------------------- //

/// Type label of a node, as reported in the type distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeLabel {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl TypeLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeLabel::Object => "object",
            TypeLabel::Array => "array",
            TypeLabel::String => "string",
            TypeLabel::Number => "number",
            TypeLabel::Bool => "bool",
            TypeLabel::Null => "null",
        }
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn label_of(v: &Value) -> TypeLabel {
    match v {
        Value::Null => TypeLabel::Null,
        Value::Bool(_) => TypeLabel::Bool,
        Value::Number(_) => TypeLabel::Number,
        Value::String(_) => TypeLabel::String,
        Value::Array(_) => TypeLabel::Array,
        Value::Object(_) => TypeLabel::Object,
    }
}

// ---------------------------- Canonical form ------------------------------ //

/// Canonical form of a value.
///
/// Two values are duplicates iff their canonical keys are equal:
/// - scalars compare by type and value (`1`, `1.0` and `"1"` are all distinct)
/// - numbers are equal iff they serialize back to the same text, so `0.0`
///   and `-0.0` differ; serde_json reads the literal `-0` as the float
///   `-0.0`, which makes `-0` equal to `-0.0` and distinct from `0`
/// - arrays compare element-wise, in order
/// - objects compare by their entries with keys sorted, so insertion order
///   does not matter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalKey {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(OrderedFloat<f64>),
    /// `OrderedFloat` treats `-0.0 == 0.0`; kept apart here.
    NegativeZero,
    String(String),
    Array(Vec<CanonicalKey>),
    Object(BTreeMap<String, CanonicalKey>),
}

/// Build the canonical key of `v`, descending at most `levels` container
/// levels below it. Returns `None` when `v` nests deeper than that.
pub fn canonicalize(v: &Value, levels: usize) -> Option<CanonicalKey> {
    let key = match v {
        Value::Null => CanonicalKey::Null,
        Value::Bool(b) => CanonicalKey::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                CanonicalKey::Int(i)
            } else if let Some(u) = n.as_u64() {
                CanonicalKey::UInt(u)
            } else {
                // without arbitrary_precision every Number fits one of the three
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f == 0.0 && f.is_sign_negative() {
                    CanonicalKey::NegativeZero
                } else {
                    CanonicalKey::Float(OrderedFloat(f))
                }
            }
        }
        Value::String(s) => CanonicalKey::String(s.clone()),
        Value::Array(xs) => {
            if !xs.is_empty() && levels == 0 { return None; }
            let items = xs.iter()
                .map(|x| canonicalize(x, levels.saturating_sub(1)))
                .collect::<Option<Vec<_>>>()?;
            CanonicalKey::Array(items)
        }
        Value::Object(m) => {
            if !m.is_empty() && levels == 0 { return None; }
            let entries = m.iter()
                .map(|(k, x)| canonicalize(x, levels.saturating_sub(1)).map(|c| (k.clone(), c)))
                .collect::<Option<BTreeMap<_, _>>>()?;
            CanonicalKey::Object(entries)
        }
    };
    Some(key)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn labels_cover_every_case() {
        assert_eq!(label_of(&json!(null)), TypeLabel::Null);
        assert_eq!(label_of(&json!(true)), TypeLabel::Bool);
        assert_eq!(label_of(&json!(1.5)), TypeLabel::Number);
        assert_eq!(label_of(&json!("x")), TypeLabel::String);
        assert_eq!(label_of(&json!([])), TypeLabel::Array);
        assert_eq!(label_of(&json!({})), TypeLabel::Object);
        assert_eq!(TypeLabel::Bool.to_string(), "bool");
        assert_eq!(serde_json::to_string(&TypeLabel::Array).unwrap(), "\"array\"");
    }

    #[test]
    fn object_key_order_is_ignored() {
        let a = json!({"x": 1, "y": [1, {"p": null, "q": true}]});
        let b = json!({"y": [1, {"q": true, "p": null}], "x": 1});
        assert_eq!(canonicalize(&a, 8), canonicalize(&b, 8));
    }

    #[test]
    fn array_order_is_kept() {
        assert_ne!(canonicalize(&json!([1, 2]), 8), canonicalize(&json!([2, 1]), 8));
    }

    #[test]
    fn scalars_keep_their_type() {
        assert_ne!(canonicalize(&json!(1), 8), canonicalize(&json!(1.0), 8));
        assert_ne!(canonicalize(&json!(1), 8), canonicalize(&json!("1"), 8));
        assert_ne!(canonicalize(&json!(false), 8), canonicalize(&json!(0), 8));
        assert_ne!(canonicalize(&json!(null), 8), canonicalize(&json!("null"), 8));
        assert_eq!(canonicalize(&json!(2.5), 8), canonicalize(&json!(2.5), 8));
        assert_eq!(canonicalize(&json!(u64::MAX), 8), Some(CanonicalKey::UInt(u64::MAX)));
    }

    #[test]
    fn signed_zeros_follow_their_serialized_text() {
        let key = |src: &str| canonicalize(&serde_json::from_str(src).unwrap(), 0);
        assert_eq!(key("0"), Some(CanonicalKey::Int(0)));
        assert_eq!(key("-0"), Some(CanonicalKey::NegativeZero));
        assert_eq!(key("-0"), key("-0.0"));
        assert_ne!(key("0.0"), key("-0.0"));
        assert_ne!(key("0"), key("-0"));
        assert_eq!(serde_json::to_string(&serde_json::from_str::<Value>("-0").unwrap()).unwrap(), "-0.0");
    }

    #[test]
    fn canonicalize_respects_level_budget() {
        let v = json!({"a": [[1]]});
        assert!(canonicalize(&v, 3).is_some());
        assert!(canonicalize(&v, 2).is_none());
        // empty containers and scalars need no budget
        assert!(canonicalize(&json!([]), 0).is_some());
        assert!(canonicalize(&json!("x"), 0).is_some());
    }
}
