use async_trait::async_trait;
use aws_sdk_lambda::Client as LambdaClient;
use tracing::info;

use crate::errors::DigestError;

/// Compute-function management API, reduced to the one call the deploy
/// handler makes.
#[async_trait]
pub trait FunctionCodeUpdater: Send + Sync {
    async fn update_code(
        &self,
        function_name: &str,
        bucket: &str,
        key: &str,
    ) -> Result<(), DigestError>;
}

pub struct LambdaCodeUpdater {
    client: LambdaClient,
}

impl LambdaCodeUpdater {
    #[must_use]
    pub fn new(client: LambdaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionCodeUpdater for LambdaCodeUpdater {
    async fn update_code(
        &self,
        function_name: &str,
        bucket: &str,
        key: &str,
    ) -> Result<(), DigestError> {
        let output = self
            .client
            .update_function_code()
            .function_name(function_name)
            .s3_bucket(bucket)
            .s3_key(key)
            .send()
            .await
            .map_err(|e| {
                DigestError::AwsError(format!("lambda update_function_code: {e}"))
            })?;

        info!(
            function_name,
            code_sha256 = output.code_sha256().unwrap_or_default(),
            "Function code updated"
        );
        Ok(())
    }
}
