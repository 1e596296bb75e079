use chrono::Utc;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error, info};

use super::context::DigestContext;
use super::run::run_digest;
use crate::core::config::AppConfig;

/// Lambda handler for the digest entrypoint. The event payload (typically a
/// scheduled event) carries no parameters and is only logged.
///
/// # Errors
///
/// Returns an error when configuration is missing or invalid, or when the run
/// fails in a way the failure policy does not isolate.
#[tracing::instrument(level = "info", skip(event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<(), Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    info!(feeds = config.feeds.len(), "Digest Lambda invoked");
    debug!("Digest Lambda event payload: {:?}", event.payload);

    let ctx = DigestContext::from_aws(config).await.map_err(|e| {
        error!("Failed to initialize clients: {}", e);
        Error::from(e)
    })?;

    let report = run_digest(&ctx, Utc::now().date_naive())
        .await
        .map_err(|e| {
            error!("Digest run failed: {}", e);
            Error::from(e)
        })?;

    info!(message_id = %report.message_id, "Digest delivered");
    Ok(())
}

pub use self::function_handler as handler;
