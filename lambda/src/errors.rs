use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Missing required configuration: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to send HTTP request: {0}")]
    NetworkError(String),

    #[error("Failed to parse feed: {0}")]
    FeedParse(String),

    #[error("Failed to invoke model: {0}")]
    ModelInvocation(String),

    #[error("Unexpected model response: {0}")]
    ModelResponseMalformed(String),

    #[error("Failed to deliver email: {0}")]
    Delivery(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Invalid event payload: {0}")]
    EventShapeInvalid(String),
}

impl DigestError {
    /// Whether the error comes from fetching or parsing remote content, which
    /// the `isolate` failure policy contains to a single feed or article.
    #[must_use]
    pub fn is_isolatable(&self) -> bool {
        matches!(
            self,
            DigestError::NetworkError(_) | DigestError::FeedParse(_)
        )
    }
}

impl From<reqwest::Error> for DigestError {
    fn from(error: reqwest::Error) -> Self {
        DigestError::NetworkError(error.to_string())
    }
}
