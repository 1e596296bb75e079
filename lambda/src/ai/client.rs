//! Bedrock Runtime client for text generation
//!
//! The client only moves bytes: it serializes the request for the Anthropic
//! messages protocol and hands back the raw JSON envelope. Interpreting the
//! envelope is left to [`super::response`].

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::primitives::Blob;
use serde_json::{Value, json};
use tracing::info;
#[cfg(feature = "debug-logs")]
use tracing::debug;

use crate::errors::DigestError;

/// Protocol version tag required by Anthropic models on Bedrock.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub model_id: String,
    pub prompt: String,
    pub max_tokens: u32,
}

impl ModelRequest {
    #[must_use]
    pub fn body(&self) -> Value {
        json!({
            "anthropic_version": ANTHROPIC_VERSION,
            "max_tokens": self.max_tokens,
            "messages": [
                {
                    "role": "user",
                    "content": self.prompt,
                }
            ]
        })
    }
}

/// A hosted text-generation endpoint. Implementations return the provider's
/// response envelope untouched.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<Value, DigestError>;
}

pub struct BedrockTextGenerator {
    client: BedrockClient,
}

impl BedrockTextGenerator {
    #[must_use]
    pub fn new(client: BedrockClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextGenerator for BedrockTextGenerator {
    async fn generate(&self, request: &ModelRequest) -> Result<Value, DigestError> {
        #[cfg(feature = "debug-logs")]
        debug!("Using model prompt:\n{}", request.prompt);

        info!(
            model_id = %request.model_id,
            prompt_chars = request.prompt.chars().count(),
            "Invoking model"
        );

        let body = serde_json::to_vec(&request.body()).map_err(|e| {
            DigestError::ModelInvocation(format!("Failed to serialize request: {e}"))
        })?;

        let output = self
            .client
            .invoke_model()
            .model_id(&request.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| DigestError::ModelInvocation(format!("bedrock invoke_model: {e}")))?;

        let envelope: Value = serde_json::from_slice(output.body().as_ref()).map_err(|e| {
            DigestError::ModelResponseMalformed(format!("response body is not JSON: {e}"))
        })?;

        #[cfg(feature = "debug-logs")]
        debug!("Model response envelope: {}", envelope);

        Ok(envelope)
    }
}
