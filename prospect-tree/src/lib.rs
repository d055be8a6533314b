//! Research-tree data model and budget accounting.
//!
//! This crate is the heart of Prospect: an index-arena tree of queries and
//! discovered documents, a frontier queue of not-yet-expanded nodes, and the
//! incremental token/document accounting the session loop uses to decide
//! when to stop.
//!
//! - [`Document`]: a discovered content unit with resolved page content
//! - [`NodeData`]: tagged payload of a tree node (query or document)
//! - [`Tree`]: the aggregate root owning the arena and the frontier

mod document;
mod node;
mod tokens;
mod tree;

pub use document::{Document, DocumentMeta, SourceKind};
pub use node::{Node, NodeData, NodeId};
pub use tokens::TokenCounter;
pub use tree::{RunMetrics, Tree, DEFAULT_MODEL};
