use serde_json::Value;

const TRUTHY: [&str; 3] = ["true", "yes", "1"];

/// Interprets an opt-in cell from a CSV export. Only `true`, `yes` and `1` count as consent.
pub fn parse_flag(raw: &str) -> bool {
    let raw = raw.trim();
    TRUTHY.iter().any(|t| raw.eq_ignore_ascii_case(t))
}

/// Interprets a loosely-typed `optIn` value from an import row.
///
/// An absent value means consent; an explicit `null` does not.
pub fn from_json(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |n| n != 0.0),
        Some(Value::String(s)) => parse_flag(s),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
