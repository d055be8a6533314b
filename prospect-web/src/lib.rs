//! Web discovery and acquisition.
//!
//! - [`SearchEngine`] trait plus concrete adapters (Brave, DuckDuckGo)
//!   normalizing provider responses into [`SearchHit`]s
//! - [`extract`]: page fetch + light HTML extraction into document metadata
//!
//! Extraction is intentionally minimal: title, meta description, and a
//! tag-stripped body snippet are enough to seed the research tree; deep
//! readability-style cleaning is out of scope.

mod brave;
mod duckduckgo;
pub mod extract;
mod search;

pub use brave::BraveSearch;
pub use duckduckgo::DuckDuckGoSearch;
pub use search::{build_engine, SearchEngine, SearchHit, SUPPORTED_ENGINES};
