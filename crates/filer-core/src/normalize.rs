use crate::document::{FieldValue, Milestone};

/// Separator used by comma-delimited overrides.
pub const OVERRIDE_SEPARATOR: &str = ", ";

/// Normalize an attribute value into an ordered list.
///
/// Attribute strings are already structured and are never split.
pub fn normalize(value: Option<&FieldValue>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(FieldValue::One(s)) => vec![s.clone()],
        Some(FieldValue::Many(items)) => items.clone(),
    }
}

/// Split an externally supplied override on the literal `", "`.
pub fn split_override(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(OVERRIDE_SEPARATOR).map(str::to_string).collect()
}

/// Assignees for a create call: a non-empty override wins over the attribute.
pub fn assignees(override_value: Option<&str>, attribute: Option<&FieldValue>) -> Vec<String> {
    match override_value.filter(|s| !s.is_empty()) {
        Some(raw) => split_override(raw),
        None => normalize(attribute),
    }
}

/// Milestone number for a create call.
///
/// A non-empty override wins over the attribute. The value must be a
/// positive whole number; anything else leaves the milestone unset.
pub fn milestone(override_value: Option<&str>, attribute: Option<&Milestone>) -> Option<u64> {
    let raw = match override_value.filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => attribute?.as_input(),
    };
    let n: f64 = raw.trim().parse().ok()?;
    if n.is_finite() && n >= 1.0 && n.fract() == 0.0 && n <= u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}
