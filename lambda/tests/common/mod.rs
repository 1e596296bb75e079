//! In-memory collaborators for driving digest runs in tests.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use news_digest::ai::{ModelRequest, TextGenerator};
use news_digest::core::config::AppConfig;
use news_digest::core::models::{FeedEntry, FeedSource, FetchedFeed};
use news_digest::core::params::ParameterStore;
use news_digest::errors::DigestError;
use news_digest::feeds::FeedFetcher;
use news_digest::notify::{Mailer, OutgoingEmail};
use news_digest::scrape::ArticleExtractor;
use news_digest::worker::DigestContext;

/// Every call made to a network-facing fake, in order.
#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
}

impl CallLog {
    pub fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub struct FakeParameters {
    pub values: HashMap<String, String>,
}

impl FakeParameters {
    pub fn complete() -> Self {
        let values = [
            ("/BEDROCK_MODEL_ID", "anthropic.claude-3-haiku-20240307-v1:0"),
            ("/SENDER_EMAIL", "digest@example.com"),
            ("/RECIPIENT_EMAIL", "reader@example.com"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { values }
    }

    pub fn without(name: &str) -> Self {
        let mut params = Self::complete();
        params.values.remove(name);
        params
    }
}

#[async_trait]
impl ParameterStore for FakeParameters {
    async fn get(&self, name: &str) -> Result<Option<String>, DigestError> {
        Ok(self.values.get(name).cloned())
    }
}

pub struct FakeFeeds {
    pub feeds: HashMap<String, FetchedFeed>,
    pub failing: HashSet<String>,
    pub log: Arc<CallLog>,
}

#[async_trait]
impl FeedFetcher for FakeFeeds {
    async fn fetch(&self, source: &FeedSource) -> Result<FetchedFeed, DigestError> {
        self.log.record(format!("feed {}", source.url));
        if self.failing.contains(&source.url) {
            return Err(DigestError::NetworkError(format!("{} unreachable", source.url)));
        }
        Ok(self.feeds.get(&source.url).cloned().unwrap_or_default())
    }
}

pub struct FakeArticles {
    pub failing: HashSet<String>,
    pub log: Arc<CallLog>,
}

#[async_trait]
impl ArticleExtractor for FakeArticles {
    async fn extract(&self, link: &str) -> Result<String, DigestError> {
        self.log.record(format!("article {link}"));
        if self.failing.contains(link) {
            return Err(DigestError::NetworkError(format!("{link} returned status 404")));
        }
        Ok(format!("Body of {link}"))
    }
}

/// Echoes the article text back as the summary. Articles whose body mentions
/// a link in `malformed` get an envelope without any text field.
pub struct FakeGenerator {
    pub malformed: HashSet<String>,
    pub log: Arc<CallLog>,
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &ModelRequest) -> Result<Value, DigestError> {
        let article = request
            .prompt
            .rsplit("Article:\n")
            .next()
            .unwrap_or_default()
            .to_string();
        self.log.record(format!("model {article}"));

        if self.malformed.iter().any(|link| article.contains(link.as_str())) {
            return Ok(json!({"type": "error", "message": "overloaded"}));
        }
        Ok(json!({
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": format!("Summary: {article}")}]
        }))
    }
}

#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub log: Arc<CallLog>,
    pub fail: bool,
}

impl FakeMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, DigestError> {
        self.log.record(format!("email {}", email.recipient));
        if self.fail {
            return Err(DigestError::Delivery("ses send_email: throttled".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(format!("msg-{}", self.sent.lock().unwrap().len()))
    }
}

pub fn entries(prefix: &str, count: usize) -> Vec<FeedEntry> {
    (0..count)
        .map(|i| FeedEntry {
            title: format!("{prefix} story {i}"),
            link: format!("https://{prefix}.test/{i}"),
            published: None,
        })
        .collect()
}

pub fn feed(title: Option<&str>, entries: Vec<FeedEntry>) -> FetchedFeed {
    FetchedFeed {
        title: title.map(str::to_string),
        entries,
    }
}

/// Builder for a [`DigestContext`] backed by the fakes above.
pub struct Harness {
    pub config: AppConfig,
    pub parameters: FakeParameters,
    pub feeds: HashMap<String, FetchedFeed>,
    pub failing_feeds: HashSet<String>,
    pub failing_articles: HashSet<String>,
    pub malformed: HashSet<String>,
    pub mailer_fails: bool,
    pub log: Arc<CallLog>,
}

impl Harness {
    pub fn new(sources: &[(&str, &str)]) -> Self {
        let config = AppConfig {
            feeds: sources
                .iter()
                .map(|(name, url)| FeedSource::new(name, url))
                .collect(),
            ..AppConfig::default()
        };
        Self {
            config,
            parameters: FakeParameters::complete(),
            feeds: HashMap::new(),
            failing_feeds: HashSet::new(),
            failing_articles: HashSet::new(),
            malformed: HashSet::new(),
            mailer_fails: false,
            log: Arc::new(CallLog::default()),
        }
    }

    pub fn with_feed(mut self, url: &str, fetched: FetchedFeed) -> Self {
        self.feeds.insert(url.to_string(), fetched);
        self
    }

    /// Returns the context plus a handle on the mailer to inspect sent mail.
    pub fn build(self) -> (DigestContext, Arc<FakeMailer>) {
        let mailer = Arc::new(FakeMailer {
            sent: Mutex::new(Vec::new()),
            log: self.log.clone(),
            fail: self.mailer_fails,
        });
        let ctx = DigestContext {
            config: self.config,
            parameters: Arc::new(self.parameters),
            feeds: Arc::new(FakeFeeds {
                feeds: self.feeds,
                failing: self.failing_feeds,
                log: self.log.clone(),
            }),
            articles: Arc::new(FakeArticles {
                failing: self.failing_articles,
                log: self.log.clone(),
            }),
            generator: Arc::new(FakeGenerator {
                malformed: self.malformed,
                log: self.log.clone(),
            }),
            mailer: mailer.clone(),
        };
        (ctx, mailer)
    }
}
