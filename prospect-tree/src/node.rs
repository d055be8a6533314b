//! Arena nodes and their tagged payload.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Index of a node inside a [`Tree`](crate::Tree) arena.
///
/// Ids are only meaningful for the tree that issued them; they are plain
/// indices, never invalidated because nodes are soft-deleted, not removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Payload of one unit of work in the research tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeData {
    /// A research sub-question awaiting a search.
    Query(String),
    /// A discovered document awaiting analysis.
    Document(Document),
}

impl NodeData {
    pub fn is_document(&self) -> bool {
        matches!(self, NodeData::Document(_))
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            NodeData::Document(doc) => Some(doc),
            NodeData::Query(_) => None,
        }
    }

    /// Short label for logging; document payloads are identified by source.
    pub fn label(&self) -> &str {
        match self {
            NodeData::Query(q) => q,
            NodeData::Document(doc) => &doc.source,
        }
    }
}

/// One node in the arena. Parent/child links are arena indices; the parent
/// link is informational (results carry the originating query) and never
/// owns anything.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub deleted: bool,
}

impl Node {
    pub(crate) fn new(data: NodeData, parent: Option<NodeId>) -> Self {
        Self {
            data,
            parent,
            children: Vec::new(),
            deleted: false,
        }
    }
}
