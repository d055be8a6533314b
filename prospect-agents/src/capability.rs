use async_trait::async_trait;
use prospect_common::Result;
use prospect_tree::NodeData;

/// The boundary between the scheduler and the opaque agents feeding it.
///
/// Contract: `Ok(None)` is the single sanctioned "discard this branch"
/// signal — the scheduler deletes the node and moves on. `Ok(Some(items))`
/// means "expand with this data"; an empty vec leaves the node alive with
/// no new children. Errors are the capability's failure to answer at all;
/// the scheduler downgrades them to the stop signal rather than aborting
/// the run.
///
/// Calls are synchronous from the scheduler's point of view; anything slow
/// (network, model inference) happens inside `invoke`.
#[async_trait]
pub trait Capability: Send + Sync {
    async fn invoke(&self, context: &NodeData) -> Result<Option<Vec<NodeData>>>;
}
