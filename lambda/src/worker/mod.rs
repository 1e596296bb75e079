//! Digest Lambda: context construction, the run loop and the entry point

pub mod context;
pub mod handler;
pub mod run;

// Re-export the main handler for convenience
pub use context::DigestContext;
pub use handler::handler;
pub use run::{collect_digest, run_digest};
