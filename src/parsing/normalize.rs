//! Message normalization.
//!
//! Archived message records come in several shapes depending on the client
//! version that produced them:
//!
//! ```json
//! {"author": {"role": "user"}, "content": {"parts": ["a", "b"]}, "create_time": 1700000000.5}
//! {"role": "assistant", "content": "plain text", "metadata": {"timestamp_": 1700000000000}}
//! {"content": {"text": "single text field"}}
//! ```
//!
//! Normalization is total: every irregularity degrades to a default (empty
//! content, role `"assistant"`, timestamp `0`) instead of failing.

use serde_json::Value;

use crate::Message;

/// Role used when a record carries none.
pub const DEFAULT_ROLE: &str = "assistant";

/// Values above this are treated as epoch milliseconds.
const MILLIS_THRESHOLD: f64 = 1e12;

/// Normalizes one raw message record.
///
/// Returns `None` when the content trims to nothing.
///
/// # Example
///
/// ```
/// use chatfold::parsing::normalize_message;
/// use serde_json::json;
///
/// let raw = json!({
///     "author": {"role": "user"},
///     "content": {"parts": ["a", "b"]},
///     "create_time": 1700000000123u64
/// });
/// let msg = normalize_message(&raw).unwrap();
/// assert_eq!(msg.content, "a\nb");
/// assert_eq!(msg.ts, 1700000000);
/// ```
pub fn normalize_message(raw: &Value) -> Option<Message> {
    let content = extract_content(raw);
    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    Some(Message::new(
        extract_role(raw),
        content,
        message_timestamp(raw),
    ))
}

/// Resolves the role: `author.role`, then `role`, then [`DEFAULT_ROLE`].
pub fn extract_role(raw: &Value) -> &str {
    let nested = raw
        .get("author")
        .and_then(|author| author.get("role"))
        .and_then(Value::as_str);
    let direct = raw.get("role").and_then(Value::as_str);

    nested
        .filter(|r| !r.is_empty())
        .or(direct.filter(|r| !r.is_empty()))
        .unwrap_or(DEFAULT_ROLE)
}

/// Extracts the untrimmed text content.
///
/// Checked in order: `content.parts` (string parts joined with `\n`), a
/// string `content`, then `content.text`.
pub fn extract_content(raw: &Value) -> String {
    match raw.get("content") {
        Some(Value::Object(obj)) if obj.contains_key("parts") => match obj.get("parts") {
            Some(Value::Array(parts)) => parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => obj
            .get("text")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Resolves the record's timestamp in epoch seconds.
///
/// `create_time` is used unless it is missing, null, zero or empty; then
/// `metadata.timestamp`, then `metadata.timestamp_`.
pub fn message_timestamp(raw: &Value) -> i64 {
    let direct = raw.get("create_time").filter(|v| is_truthy(v));
    let candidate = direct.or_else(|| {
        let meta = raw.get("metadata")?;
        meta.get("timestamp")
            .filter(|v| is_truthy(v))
            .or_else(|| meta.get("timestamp_"))
    });

    candidate.map(normalize_timestamp).unwrap_or(0)
}

/// Converts a raw timestamp value to integer epoch seconds.
///
/// Non-numeric values become `0`. Values above 10^12 are milliseconds.
/// The result is truncated toward zero.
///
/// ```
/// use chatfold::parsing::normalize_timestamp;
/// use serde_json::json;
///
/// assert_eq!(normalize_timestamp(&json!(1700000000000u64)), 1700000000);
/// assert_eq!(normalize_timestamp(&json!("1700000000.9")), 1700000000);
/// assert_eq!(normalize_timestamp(&json!("soon")), 0);
/// ```
pub fn normalize_timestamp(value: &Value) -> i64 {
    let seconds = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match seconds {
        Some(t) if t.is_finite() => {
            let t = if t > MILLIS_THRESHOLD { t / 1000.0 } else { t };
            t.trunc() as i64
        }
        _ => 0,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
