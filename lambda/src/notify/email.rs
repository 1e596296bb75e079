use async_trait::async_trait;
use aws_sdk_ses::Client as SesClient;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use tracing::info;

use crate::core::config::BodyFormat;
use crate::errors::DigestError;

const CHARSET: &str = "UTF-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub format: BodyFormat,
}

/// Sends one email and returns the provider's message id.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, DigestError>;
}

pub struct SesMailer {
    client: SesClient,
}

impl SesMailer {
    #[must_use]
    pub fn new(client: SesClient) -> Self {
        Self { client }
    }
}

fn content(data: &str) -> Result<Content, DigestError> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| DigestError::Delivery(format!("Failed to build email content: {e}")))
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, DigestError> {
        let body_content = content(&email.body)?;
        let body = match email.format {
            BodyFormat::Html => Body::builder().html(body_content).build(),
            BodyFormat::Text => Body::builder().text(body_content).build(),
        };
        let message = Message::builder()
            .subject(content(&email.subject)?)
            .body(body)
            .build();

        let output = self
            .client
            .send_email()
            .source(&email.sender)
            .destination(
                Destination::builder()
                    .to_addresses(&email.recipient)
                    .build(),
            )
            .message(message)
            .send()
            .await
            .map_err(|e| DigestError::Delivery(format!("ses send_email: {e}")))?;

        let message_id = output.message_id().to_string();
        info!(%message_id, recipient = %email.recipient, "Digest email sent");
        Ok(message_id)
    }
}
