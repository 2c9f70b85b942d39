//! Archive record parsing.
//!
//! - [`normalize`] - raw message record -> [`Message`](crate::Message)
//! - [`linearize`](mod@linearize) - branching mapping -> one transcript
//! - [`conversation`] - document shapes -> [`Conversation`](crate::Conversation)s

pub mod conversation;
pub mod linearize;
pub mod normalize;

pub use conversation::{conversation_from_object, extract_conversations};
pub use linearize::{Linearizer, NodeArena, RawNode, linearize, reconcile};
pub use normalize::{
    extract_content, extract_role, message_timestamp, normalize_message, normalize_timestamp,
};
