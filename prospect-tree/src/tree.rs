//! The aggregate root: arena, frontier queue, and budget accounting.

use std::collections::VecDeque;

use prospect_common::{normalize_topic, Result};
use serde::Serialize;

use crate::document::Document;
use crate::node::{Node, NodeData, NodeId};
use crate::tokens::TokenCounter;

/// Tokenizer used when the configuration names no model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Running counters exposed to callers during and after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunMetrics {
    /// Tokens consumed by document content added so far.
    pub tokens: usize,
    /// Document nodes ever added (soft-deleted ones included).
    pub documents: usize,
}

/// The research tree.
///
/// Nodes live in an index arena and are never physically removed; deletion
/// is a flag filtered out at read time. The frontier (`leaf_nodes`) holds
/// nodes that have not yet been expanded, in processing order: the front is
/// the pop end, document-bearing expansions are inserted there so freshly
/// fetched content is mined for follow-ups before breadth-first search
/// continues, and pure-query expansions queue at the back.
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    leaf_nodes: VecDeque<NodeId>,
    doc_node_num: usize,
    tokens: usize,
    counter: TokenCounter,
}

impl Tree {
    /// Seed a tree with a root query for `topic`, counting tokens the way
    /// `model` does. Fails fast when no tokenizer exists for `model`.
    pub fn new(topic: &str, model: &str) -> Result<Self> {
        let counter = TokenCounter::for_model(model)?;
        let topic = normalize_topic(topic);
        let root = NodeId(0);
        let mut leaf_nodes = VecDeque::new();
        leaf_nodes.push_back(root);
        tracing::debug!(target: "tree", %topic, model = counter.model(), "tree.seeded");
        Ok(Self {
            nodes: vec![Node::new(NodeData::Query(topic), None)],
            root,
            leaf_nodes,
            doc_node_num: 0,
            tokens: 0,
            counter,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn doc_node_num(&self) -> usize {
        self.doc_node_num
    }

    pub fn tokens(&self) -> usize {
        self.tokens
    }

    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            tokens: self.tokens,
            documents: self.doc_node_num,
        }
    }

    pub fn frontier_len(&self) -> usize {
        self.leaf_nodes.len()
    }

    /// Take the next node to expand, from the priority end of the frontier.
    pub fn pop_frontier(&mut self) -> Option<NodeId> {
        self.leaf_nodes.pop_front()
    }

    /// Mark a node deleted. Children stay in the tree and keep their own
    /// flags; deletion deliberately does not cascade.
    pub fn delete(&mut self, id: NodeId) {
        self.nodes[id.0].deleted = true;
        tracing::debug!(target: "tree", node = id.0, "tree.node_deleted");
    }

    /// Append `dataset` as children of `parent`, in order. Accepts an empty
    /// dataset (no-op returning no ids); callers decide what that means.
    pub fn add_child_nodes(&mut self, parent: NodeId, dataset: Vec<NodeData>) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(dataset.len());
        for data in dataset {
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node::new(data, Some(parent)));
            self.nodes[parent.0].children.push(id);
            ids.push(id);
        }
        ids
    }

    /// Record an expansion: attach children, update the document/token
    /// accounting incrementally, and enqueue the new leaves.
    ///
    /// Placement rule: an expansion containing at least one document goes to
    /// the front of the frontier (its items pop in creation order, ahead of
    /// everything queued so far); a pure-query expansion goes to the back.
    pub fn add_nodes(&mut self, parent: NodeId, dataset: Vec<NodeData>) -> Vec<NodeId> {
        let ids = self.add_child_nodes(parent, dataset);

        let doc_text: String = ids
            .iter()
            .filter_map(|id| self.nodes[id.0].data.as_document())
            .map(Document::page_content)
            .collect();
        let doc_count = ids
            .iter()
            .filter(|id| self.nodes[id.0].data.is_document())
            .count();

        if doc_count > 0 {
            self.doc_node_num += doc_count;
            self.tokens += self.counter.count(&doc_text);
            for id in ids.iter().rev() {
                self.leaf_nodes.push_front(*id);
            }
        } else {
            self.leaf_nodes.extend(ids.iter().copied());
        }

        tracing::debug!(
            target: "tree",
            parent = parent.0,
            added = ids.len(),
            documents = doc_count,
            total_documents = self.doc_node_num,
            total_tokens = self.tokens,
            frontier = self.leaf_nodes.len(),
            "tree.expanded"
        );
        ids
    }

    /// Every node reachable from `start`, depth-first pre-order: the node
    /// itself, then each child's subtree in order. No mutation, restartable.
    pub fn all_nodes_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev());
        }
        out
    }

    /// Every node reachable from the root.
    pub fn all_nodes(&self) -> Vec<NodeId> {
        self.all_nodes_from(self.root)
    }

    /// Non-deleted documents in pre-order traversal order. A live document
    /// under a deleted ancestor still surfaces.
    pub fn all_documents(&self) -> Vec<&Document> {
        self.all_nodes()
            .into_iter()
            .filter_map(|id| {
                let node = &self.nodes[id.0];
                if node.deleted {
                    return None;
                }
                node.data.as_document()
            })
            .collect()
    }
}
