//! Literal formatting helpers.

use crate::descriptor::{FieldType, ScalarKind};

/// Escape a string for proto syntax
pub(crate) fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ if c.is_ascii_control() => {
                result.push_str(&format!("\\x{:02x}", c as u8));
            }
            _ => result.push(c),
        }
    }
    result
}

/// Formats a stored default value for a field of the given type.
///
/// Bytes defaults are stored already escaped; string defaults are stored raw.
pub(crate) fn default_value(ty: &FieldType, value: &str) -> String {
    match ty {
        FieldType::Scalar(ScalarKind::String) => format!("\"{}\"", escape_string(value)),
        FieldType::Scalar(ScalarKind::Bytes) => format!("\"{}\"", value),
        _ => value.to_string(),
    }
}

/// Type name as written in a field declaration
pub(crate) fn type_name(ty: &FieldType) -> String {
    match ty {
        FieldType::Scalar(kind) => kind.as_str().to_string(),
        FieldType::Message(name) | FieldType::Enum(name) => format!(".{}", name),
        FieldType::Map { key, value } => format!("map<{}, {}>", key.as_str(), type_name(value)),
        FieldType::Group(body) => body.name.clone(),
    }
}

/// Formats an inclusive number range; `max` names the largest legal value
pub(crate) fn range(start: i32, end: i32, max: i32) -> String {
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    if start == end {
        start.to_string()
    } else if end == max {
        format!("{} to max", start)
    } else {
        format!("{} to {}", start, end)
    }
}
