//! Conversation linearization.
//!
//! A branching conversation is stored as a mapping of node id to
//! `{message, parent, children}`. Edits and regenerations create sibling
//! branches, and damaged exports can even contain parent/child cycles. The
//! linearizer reduces such a mapping to one transcript.
//!
//! Two candidate paths are computed:
//!
//! - **active path**: follow `current_node` up through its parents, then
//!   reverse to root-to-leaf order;
//! - **latest branch**: from the root, repeatedly descend into the child whose
//!   subtree holds the most recent message.
//!
//! The active path wins unless it yields no messages or the latest branch
//! yields strictly more.
//!
//! Nodes live in a [`NodeArena`] and refer to each other by index, so cycles
//! never create ownership problems; walks guard against them with visited
//! sets.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::trace;

use super::normalize::{message_timestamp, normalize_message};
use crate::Message;

/// One entry of a conversation mapping, borrowed from the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode<'a> {
    /// Node identifier (the mapping key).
    pub id: &'a str,
    /// Raw message payload, if present and non-empty.
    pub message: Option<&'a Value>,
    /// Parent identifier, if any.
    pub parent: Option<&'a str>,
    /// Child identifiers in document order.
    pub children: Vec<&'a str>,
}

impl<'a> RawNode<'a> {
    fn from_value(id: &'a str, value: &'a Value) -> Self {
        let message = value
            .get("message")
            .filter(|m| m.as_object().is_some_and(|o| !o.is_empty()));
        let parent = value.get("parent").and_then(Value::as_str);
        let children = value
            .get("children")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        Self {
            id,
            message,
            parent,
            children,
        }
    }

    /// Timestamp of this node's own message, `0` without one.
    pub fn timestamp(&self) -> i64 {
        self.message.map(message_timestamp).unwrap_or(0)
    }
}

/// Arena of mapping nodes addressed by index, in document order.
#[derive(Debug, Clone, Default)]
pub struct NodeArena<'a> {
    nodes: Vec<RawNode<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> NodeArena<'a> {
    /// Builds the arena from a `mapping` object.
    pub fn from_mapping(mapping: &'a Map<String, Value>) -> Self {
        let mut nodes = Vec::with_capacity(mapping.len());
        let mut index = HashMap::with_capacity(mapping.len());

        for (id, value) in mapping {
            index.insert(id.as_str(), nodes.len());
            nodes.push(RawNode::from_value(id, value));
        }

        Self { nodes, index }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node index by identifier.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns the node at `idx`.
    pub fn node(&self, idx: usize) -> &RawNode<'a> {
        &self.nodes[idx]
    }

    fn parent_of(&self, idx: usize) -> Option<usize> {
        self.nodes[idx].parent.and_then(|p| self.position(p))
    }

    /// First node (in document order) whose parent is missing or dangling.
    ///
    /// Falls back to the first node when every node has a resolvable parent
    /// (a fully cyclic mapping).
    pub fn root(&self) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        let root = (0..self.nodes.len()).find(|&idx| self.parent_of(idx).is_none());
        if root.is_none() {
            trace!("no parentless node in mapping, falling back to first node as root");
        }
        Some(root.unwrap_or(0))
    }
}

/// One subtree-timestamp evaluation in progress.
struct Frame {
    node: usize,
    next_child: usize,
    best: i64,
}

/// Linearizer for one conversation.
///
/// The memo table and the in-progress set live only as long as this value;
/// nothing is shared across conversations.
pub struct Linearizer<'m, 'a> {
    arena: &'m NodeArena<'a>,
    memo: Vec<Option<i64>>,
    in_progress: HashSet<usize>,
}

impl<'m, 'a> Linearizer<'m, 'a> {
    /// Creates a linearizer over an arena.
    pub fn new(arena: &'m NodeArena<'a>) -> Self {
        Self {
            arena,
            memo: vec![None; arena.len()],
            in_progress: HashSet::new(),
        }
    }

    /// Walks from `current_node` up to the root. Returns identifiers in
    /// root-to-leaf order.
    ///
    /// Stops at a parentless node, a dangling parent, or a node already
    /// visited in this walk.
    pub fn active_path(&self, current_node: Option<&str>) -> Vec<&'a str> {
        let Some(mut idx) = current_node.and_then(|id| self.arena.position(id)) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        loop {
            if !seen.insert(idx) {
                trace!(node = self.arena.node(idx).id, "cycle on active path");
                break;
            }
            ids.push(self.arena.node(idx).id);
            match self.arena.parent_of(idx) {
                Some(parent) => idx = parent,
                None => break,
            }
        }

        ids.reverse();
        ids
    }

    /// Descends from the root, always into the child whose subtree holds
    /// the latest message. Ties keep the first child in document order.
    pub fn latest_branch_path(&mut self) -> Vec<&'a str> {
        let Some(mut idx) = self.arena.root() else {
            return Vec::new();
        };

        let mut visited = HashSet::new();
        let mut ids = Vec::new();
        while visited.insert(idx) {
            let node = self.arena.node(idx);
            ids.push(node.id);

            let mut next: Option<(usize, i64)> = None;
            for child in node.children.iter().filter_map(|c| self.arena.position(c)) {
                let ts = self.latest_subtree_timestamp(child);
                if next.is_none_or(|(_, best)| ts > best) {
                    next = Some((child, ts));
                }
            }

            match next {
                Some((child, _)) => idx = child,
                None => break,
            }
        }

        ids
    }

    /// Latest message timestamp in the subtree rooted at `start`.
    ///
    /// Results are memoized per node. A child that is still being evaluated
    /// (a cycle) contributes only its own timestamp.
    pub fn latest_subtree_timestamp(&mut self, start: usize) -> i64 {
        if let Some(ts) = self.memo[start] {
            return ts;
        }

        let arena = self.arena;
        self.in_progress.insert(start);
        let mut stack = vec![Frame {
            node: start,
            next_child: 0,
            best: arena.node(start).timestamp(),
        }];

        loop {
            let Some(top) = stack.last_mut() else {
                unreachable!("the stack empties only on return");
            };
            let children = &arena.node(top.node).children;

            if top.next_child < children.len() {
                let child_id = children[top.next_child];
                top.next_child += 1;

                let ts = match arena.position(child_id) {
                    None => 0,
                    Some(child) => {
                        if let Some(ts) = self.memo[child] {
                            ts
                        } else if self.in_progress.contains(&child) {
                            arena.node(child).timestamp()
                        } else {
                            self.in_progress.insert(child);
                            stack.push(Frame {
                                node: child,
                                next_child: 0,
                                best: arena.node(child).timestamp(),
                            });
                            continue;
                        }
                    }
                };
                top.best = top.best.max(ts);
                continue;
            }

            let Some(Frame { node, best, .. }) = stack.pop() else {
                unreachable!("a frame was inspected above");
            };
            self.in_progress.remove(&node);
            self.memo[node] = Some(best);

            match stack.last_mut() {
                Some(parent) => parent.best = parent.best.max(best),
                None => return best,
            }
        }
    }

    /// Normalizes the messages along a path, dropping empty ones.
    pub fn path_messages(&self, path: &[&str]) -> Vec<Message> {
        path.iter()
            .filter_map(|id| self.arena.position(id))
            .filter_map(|idx| self.arena.node(idx).message)
            .filter_map(normalize_message)
            .collect()
    }

    /// Computes both candidates and reconciles them.
    pub fn linearize(&mut self, current_node: Option<&str>) -> Vec<Message> {
        let active_ids = self.active_path(current_node);
        let active = self.path_messages(&active_ids);
        let latest_ids = self.latest_branch_path();
        let latest = self.path_messages(&latest_ids);

        trace!(
            active = active.len(),
            latest = latest.len(),
            "linearization candidates"
        );
        reconcile(active, latest)
    }
}

/// Picks between the active-path and latest-branch transcripts.
///
/// The latest branch is used when the active path is empty or strictly
/// shorter; ties favor the active path.
pub fn reconcile(active: Vec<Message>, latest: Vec<Message>) -> Vec<Message> {
    if active.is_empty() || active.len() < latest.len() {
        latest
    } else {
        active
    }
}

/// Linearizes a conversation mapping.
///
/// # Example
///
/// ```
/// use chatfold::parsing::linearize;
/// use serde_json::json;
///
/// let mapping = json!({
///     "root": {"message": null, "parent": null, "children": ["q"]},
///     "q": {"message": {"author": {"role": "user"}, "content": {"parts": ["hi"]}}, "parent": "root", "children": ["a"]},
///     "a": {"message": {"author": {"role": "assistant"}, "content": {"parts": ["hello"]}}, "parent": "q", "children": []}
/// });
/// let messages = linearize(mapping.as_object().unwrap(), Some("a"));
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[1].content, "hello");
/// ```
pub fn linearize(mapping: &Map<String, Value>, current_node: Option<&str>) -> Vec<Message> {
    if mapping.is_empty() {
        return Vec::new();
    }
    let arena = NodeArena::from_mapping(mapping);
    Linearizer::new(&arena).linearize(current_node)
}
