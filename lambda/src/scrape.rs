//! Article body extraction from linked pages

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use crate::errors::DigestError;
use crate::feeds::fetch::USER_AGENT;

static PARAGRAPH_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("p").ok());

#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    /// Returns the article body text for `link`.
    async fn extract(&self, link: &str) -> Result<String, DigestError>;
}

pub struct HttpArticleExtractor {
    client: Client,
}

impl HttpArticleExtractor {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, DigestError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .map_err(|e| DigestError::NetworkError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArticleExtractor for HttpArticleExtractor {
    async fn extract(&self, link: &str) -> Result<String, DigestError> {
        let response = self.client.get(link).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(DigestError::NetworkError(format!(
                "article {link} returned status {status}"
            )));
        }

        let html = response.text().await?;
        let text = extract_paragraph_text(&html);
        debug!(%link, chars = text.len(), "Extracted article text");
        Ok(text)
    }
}

/// Concatenates the text of every `<p>` element in document order, separated
/// by single spaces.
#[must_use]
pub fn extract_paragraph_text(html: &str) -> String {
    let Some(selector) = PARAGRAPH_SELECTOR.as_ref() else {
        return String::new();
    };
    let document = Html::parse_document(html);
    document
        .select(selector)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
