//! All model-facing functionality: prompt construction, invocation and
//! translation of the provider's response envelope.

pub mod client;
pub mod prompt;
pub mod response;
pub mod summarizer;

// Re-export main types for convenience
pub use client::{BedrockTextGenerator, ModelRequest, TextGenerator};
pub use response::parse_generation;
pub use summarizer::{SUMMARY_PLACEHOLDER, Summarizer};
