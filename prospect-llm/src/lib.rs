//! LLM provider clients behind a single trait.
//!
//! The searcher and reader capabilities only ever see [`LlmClient`]; the
//! concrete providers (OpenAI, Ollama) live here and stay swappable through
//! configuration.

mod ollama;
mod openai;
mod parse;
mod traits;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use parse::{extract_json_block, parse_string_list};
pub use traits::{LlmClient, LlmResponse};
