use serde::Serialize;

use crate::value::Value;

pub const ROOT_NOT_OBJECT: &str = "root must be an object";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub found_keys: Vec<String>,
    pub missing_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check that the top-level object carries every key in `required_keys`.
///
/// Keys keep their input order in both output lists and repeated keys are
/// checked (and listed) once per occurrence. A non-object root is invalid
/// without looking at any key.
pub fn validate_required_keys<S: AsRef<str>>(root: &Value, required_keys: &[S]) -> ValidationResult {
    let Value::Object(map) = root else {
        return ValidationResult {
            valid: false,
            error: Some(ROOT_NOT_OBJECT.to_string()),
            ..ValidationResult::default()
        };
    };

    let mut out = ValidationResult::default();
    for key in required_keys {
        let key = key.as_ref();
        if map.contains_key(key) {
            out.found_keys.push(key.to_string());
        } else {
            out.missing_keys.push(key.to_string());
        }
    }
    out.valid = out.missing_keys.is_empty();
    out
}
