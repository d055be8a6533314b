//! Capabilities and the frontier scheduler.
//!
//! A [`Capability`] turns one frontier node into new work (or a stop
//! signal); [`Session`] owns the tree and drives the expand/account/check
//! loop until the frontier drains, a budget trips, or the caller cancels.

mod capability;
pub mod prompts;
mod reader;
mod searcher;
mod session;

pub use capability::Capability;
pub use reader::ReaderCapability;
pub use searcher::SearcherCapability;
pub use session::{RunSummary, Session, SessionLimits, StopReason};
