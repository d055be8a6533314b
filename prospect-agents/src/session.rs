//! The frontier scheduler: one tree, one loop, strict budgets.

use std::sync::Arc;

use prospect_common::Result;
use prospect_tree::{Document, NodeData, RunMetrics, Tree};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::capability::Capability;

/// Budgets bounding total work. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionLimits {
    pub max_documents: Option<usize>,
    pub max_tokens: Option<usize>,
}

impl SessionLimits {
    fn reached(&self, metrics: RunMetrics) -> bool {
        self.max_documents.is_some_and(|m| metrics.documents >= m)
            || self.max_tokens.is_some_and(|m| metrics.tokens >= m)
    }
}

/// Why a run stopped. None of these are errors; the collected documents are
/// returned in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    FrontierExhausted,
    BudgetExceeded,
    Cancelled,
}

/// Outcome of [`Session::run`].
#[derive(Debug)]
pub struct RunSummary {
    pub documents: Vec<Document>,
    pub metrics: RunMetrics,
    pub stopped: StopReason,
}

/// A single research run over one tree.
///
/// The loop is strictly sequential: exactly one frontier node is in flight
/// at any time, so the tree needs no locking and the stopping point is
/// deterministic given the same capability responses. Cancellation is
/// cooperative and observed between steps, never by interrupting an
/// in-flight capability call.
pub struct Session {
    tree: Tree,
    searcher: Arc<dyn Capability>,
    reader: Arc<dyn Capability>,
    limits: SessionLimits,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(
        topic: &str,
        model: &str,
        searcher: Arc<dyn Capability>,
        reader: Arc<dyn Capability>,
        limits: SessionLimits,
    ) -> Result<Self> {
        Ok(Self {
            tree: Tree::new(topic, model)?,
            searcher,
            reader,
            limits,
            cancel: CancellationToken::new(),
        })
    }

    /// Token callers can use to request a stop from outside the loop.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Counters are queryable at any time, also mid-run from a snapshot.
    pub fn metrics(&self) -> RunMetrics {
        self.tree.metrics()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Drive the frontier to completion.
    pub async fn run(&mut self) -> RunSummary {
        let stopped = loop {
            if self.cancel.is_cancelled() {
                tracing::info!(target: "session", "session.cancelled");
                break StopReason::Cancelled;
            }
            let Some(id) = self.tree.pop_frontier() else {
                tracing::info!(target: "session", "session.frontier_exhausted");
                break StopReason::FrontierExhausted;
            };

            let data = self.tree.node(id).data.clone();
            let capability = match &data {
                NodeData::Document(_) => &self.reader,
                NodeData::Query(_) => &self.searcher,
            };

            tracing::debug!(
                target: "session",
                node = id.index(),
                kind = if data.is_document() { "document" } else { "query" },
                context = %data.label(),
                "session.step"
            );

            match capability.invoke(&data).await {
                Err(e) => {
                    // recoverable by policy: failed nodes are pruned, the
                    // run keeps going
                    tracing::warn!(
                        target: "session",
                        node = id.index(),
                        error = %e,
                        "session.capability_failed"
                    );
                    self.tree.delete(id);
                }
                Ok(None) => {
                    self.tree.delete(id);
                }
                Ok(Some(dataset)) => {
                    if dataset.is_empty() {
                        // not a stop signal: the node stays, it just has
                        // nothing to contribute
                        continue;
                    }
                    self.tree.add_nodes(id, dataset);
                    if self.limits.reached(self.tree.metrics()) {
                        tracing::info!(
                            target: "session",
                            metrics = ?self.tree.metrics(),
                            "session.budget_reached"
                        );
                        break StopReason::BudgetExceeded;
                    }
                }
            }
        };

        RunSummary {
            documents: self.tree.all_documents().into_iter().cloned().collect(),
            metrics: self.tree.metrics(),
            stopped,
        }
    }
}
