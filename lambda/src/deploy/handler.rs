use lambda_runtime::{Error, LambdaEvent};
use serde::Deserialize;
use serde_json::Value;
use std::env;
use tracing::{error, info};

use super::updater::{FunctionCodeUpdater, LambdaCodeUpdater};
use crate::core::models::{DeployResponse, StorageEvent};
use crate::errors::DigestError;

pub const FUNCTION_NAME_VAR: &str = "LAMBDA_FUNCTION_NAME";
pub const SUCCESS_MESSAGE: &str = "Lambda function code updated successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLocation {
    pub bucket: String,
    pub key: String,
}

/// Reads the bucket and object key from the first record of an S3
/// object-created event. Keys arrive URL-encoded and are decoded here.
///
/// # Errors
///
/// Returns `EventShapeInvalid` if the event has no records or the first
/// record lacks a bucket name or object key.
pub fn parse_upload_event(payload: &Value) -> Result<UploadLocation, DigestError> {
    let event = StorageEvent::deserialize(payload)
        .map_err(|e| DigestError::EventShapeInvalid(format!("not an S3 event: {e}")))?;

    let entity = event
        .records
        .into_iter()
        .next()
        .ok_or_else(|| DigestError::EventShapeInvalid("event has no Records".to_string()))?
        .s3
        .ok_or_else(|| DigestError::EventShapeInvalid("record has no s3 entity".to_string()))?;

    let bucket = entity
        .bucket
        .and_then(|b| b.name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DigestError::EventShapeInvalid("missing s3.bucket.name".to_string()))?;

    let raw_key = entity
        .object
        .and_then(|o| o.key)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| DigestError::EventShapeInvalid("missing s3.object.key".to_string()))?;

    let key = decode_object_key(&raw_key)?;
    Ok(UploadLocation { bucket, key })
}

fn decode_object_key(raw: &str) -> Result<String, DigestError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| DigestError::EventShapeInvalid(format!("object key is not valid UTF-8: {e}")))
}

/// Points `function_name` at the uploaded package.
///
/// # Errors
///
/// Returns an error if the event is malformed or the update call fails.
pub async fn handle_upload(
    updater: &dyn FunctionCodeUpdater,
    function_name: &str,
    payload: &Value,
) -> Result<DeployResponse, DigestError> {
    let location = parse_upload_event(payload)?;
    info!(
        function_name,
        bucket = %location.bucket,
        key = %location.key,
        "Updating function code from upload"
    );

    updater
        .update_code(function_name, &location.bucket, &location.key)
        .await?;

    Ok(DeployResponse {
        status_code: 200,
        body: Value::String(SUCCESS_MESSAGE.to_string()).to_string(),
    })
}

/// Lambda handler for the deploy entrypoint.
///
/// # Errors
///
/// Returns an error if `LAMBDA_FUNCTION_NAME` is unset, the event is not a
/// well-formed S3 event, or the update call fails.
#[tracing::instrument(level = "info", skip(event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<DeployResponse, Error> {
    let function_name = env::var(FUNCTION_NAME_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            error!("Config error: {} is not set", FUNCTION_NAME_VAR);
            Error::from(DigestError::ConfigurationMissing(FUNCTION_NAME_VAR.to_string()))
        })?;

    let shared = aws_config::from_env().load().await;
    let updater = LambdaCodeUpdater::new(aws_sdk_lambda::Client::new(&shared));

    handle_upload(&updater, &function_name, &event.payload)
        .await
        .map_err(|e| {
            error!("Deploy from upload failed: {}", e);
            Error::from(e)
        })
}

pub use self::function_handler as handler;
