//! news-digest - a scheduled AI news digest and its deployment hook.
//!
//! This crate implements two independent AWS Lambda functions:
//! 1. A digest Lambda that polls a fixed list of news feeds, scrapes each
//!    linked article, summarizes it with a Bedrock-hosted model and emails
//!    the aggregated digest through SES
//! 2. A deploy Lambda that repoints a function's code at a package uploaded
//!    to S3
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for scheduled and event-driven execution
//! - SSM Parameter Store for the model id and email addresses
//! - feed-rs and scraper for feed parsing and article extraction
//! - Bedrock Runtime for summarization and SES for delivery
//! - Tokio for async runtime
//!
//! Every external collaborator sits behind a trait and is carried in an
//! explicit [`worker::DigestContext`], so a run can be driven entirely by
//! in-memory fakes.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use news_digest::core::config::AppConfig;
//! use news_digest::worker::{DigestContext, run_digest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     news_digest::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let ctx = DigestContext::from_aws(config).await?;
//!     let report = run_digest(&ctx, Utc::now().date_naive()).await?;
//!     println!("Sent digest {}", report.message_id);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod core;
pub mod deploy;
pub mod digest;
pub mod errors;
pub mod feeds;
pub mod notify;
pub mod scrape;
pub mod worker;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. The level comes from `RUST_LOG` and defaults
/// to `info`. Calling it more than once is harmless; only the first call
/// installs a subscriber.
///
/// # Example
///
/// ```
/// // Initialize structured logging at the start of your Lambda handler
/// news_digest::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
