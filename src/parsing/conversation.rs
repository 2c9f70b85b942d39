//! Conversation extraction from archive documents.
//!
//! Accepted shapes:
//!
//! ```json
//! [ {conversation}, {conversation}, ... ]
//! {"conversations": [ {conversation}, ... ]}
//! {"title": "...", "current_node": "...", "mapping": { ... }}
//! {"title": "...", "messages": [ {rawMessage}, ... ]}
//! ```
//!
//! A conversation with a non-empty `mapping` object is linearized; otherwise
//! its flat `messages` list is normalized in order.

use serde_json::{Map, Value};
use tracing::debug;

use super::linearize::linearize;
use super::normalize::normalize_message;
use crate::{Conversation, Message};

/// Extracts every conversation contained in a document or array element.
///
/// Arrays are expanded element by element, objects carrying a
/// `conversations` array are expanded, and any other object is treated as a
/// single conversation. Conversations without retained messages are skipped.
///
/// # Example
///
/// ```
/// use chatfold::parsing::extract_conversations;
/// use serde_json::json;
///
/// let doc = json!({"conversations": [
///     {"title": "Flat", "messages": [{"role": "user", "content": "hi"}]},
///     {"title": "Empty", "messages": []}
/// ]});
/// let conversations = extract_conversations(&doc);
/// assert_eq!(conversations.len(), 1);
/// assert_eq!(conversations[0].title, "Flat");
/// ```
pub fn extract_conversations(value: &Value) -> Vec<Conversation> {
    let mut out = Vec::new();
    collect_into(value, &mut out);
    out
}

fn collect_into(value: &Value, out: &mut Vec<Conversation>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_into(item, out);
            }
        }
        Value::Object(obj) => match obj.get("conversations") {
            Some(Value::Array(items)) => {
                for item in items {
                    if let Value::Object(conv) = item {
                        out.extend(conversation_from_object(conv));
                    }
                }
            }
            _ => out.extend(conversation_from_object(obj)),
        },
        _ => {}
    }
}

/// Builds one conversation from its object, or `None` if no message survives.
pub fn conversation_from_object(obj: &Map<String, Value>) -> Option<Conversation> {
    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(Conversation::DEFAULT_TITLE);

    let messages: Vec<Message> = match obj.get("mapping") {
        Some(Value::Object(mapping)) if !mapping.is_empty() => {
            let current = obj.get("current_node").and_then(Value::as_str);
            linearize(mapping, current)
        }
        _ => obj
            .get("messages")
            .and_then(Value::as_array)
            .map(|raw| raw.iter().filter_map(normalize_message).collect())
            .unwrap_or_default(),
    };

    if messages.is_empty() {
        debug!(title, "skipping conversation without messages");
        return None;
    }
    Some(Conversation::new(title, messages))
}
