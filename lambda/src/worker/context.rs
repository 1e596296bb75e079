use std::sync::Arc;

use crate::ai::{BedrockTextGenerator, TextGenerator};
use crate::core::config::AppConfig;
use crate::core::params::{ParameterStore, SsmParameterStore};
use crate::errors::DigestError;
use crate::feeds::{FeedFetcher, HttpFeedFetcher};
use crate::notify::{Mailer, SesMailer};
use crate::scrape::{ArticleExtractor, HttpArticleExtractor};

/// Everything one digest invocation talks to. Built once per invocation and
/// passed down explicitly.
#[derive(Clone)]
pub struct DigestContext {
    pub config: AppConfig,
    pub parameters: Arc<dyn ParameterStore>,
    pub feeds: Arc<dyn FeedFetcher>,
    pub articles: Arc<dyn ArticleExtractor>,
    pub generator: Arc<dyn TextGenerator>,
    pub mailer: Arc<dyn Mailer>,
}

impl DigestContext {
    /// Builds the production context from the ambient AWS configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub async fn from_aws(config: AppConfig) -> Result<Self, DigestError> {
        let shared = aws_config::from_env().load().await;

        let feeds = HttpFeedFetcher::new(config.http_timeout)?;
        let articles = HttpArticleExtractor::new(config.http_timeout)?;

        Ok(Self {
            parameters: Arc::new(SsmParameterStore::new(aws_sdk_ssm::Client::new(&shared))),
            feeds: Arc::new(feeds),
            articles: Arc::new(articles),
            generator: Arc::new(BedrockTextGenerator::new(
                aws_sdk_bedrockruntime::Client::new(&shared),
            )),
            mailer: Arc::new(SesMailer::new(aws_sdk_ses::Client::new(&shared))),
            config,
        })
    }
}
