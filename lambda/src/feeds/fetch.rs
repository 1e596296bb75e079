use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::core::models::{FeedEntry, FeedSource, FetchedFeed};
use crate::errors::DigestError;

pub const USER_AGENT: &str = concat!("news-digest/", env!("CARGO_PKG_VERSION"));

const MAX_FEED_BYTES: usize = 5 * 1024 * 1024;

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, source: &FeedSource) -> Result<FetchedFeed, DigestError>;
}

pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
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
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, source: &FeedSource) -> Result<FetchedFeed, DigestError> {
        info!(feed = %source.url, "Fetching feed");
        let response = self.client.get(&source.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::NetworkError(format!(
                "feed {} returned status {status}",
                source.url
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.len() > MAX_FEED_BYTES {
            return Err(DigestError::FeedParse(format!(
                "feed {} too large ({} bytes)",
                source.url,
                bytes.len()
            )));
        }

        let base = Url::parse(&source.url).ok();
        let feed = parse_feed(&bytes, base.as_ref())?;
        debug!(feed = %source.url, entries = feed.entries.len(), "Parsed feed");
        Ok(feed)
    }
}

/// Converts raw RSS/Atom bytes into a [`FetchedFeed`], keeping the feed's own
/// entry order. Entries without a usable http(s) link are dropped; relative
/// links are resolved against `base`.
///
/// # Errors
///
/// Returns `FeedParse` if the document is not a recognizable feed.
pub fn parse_feed(bytes: &[u8], base: Option<&Url>) -> Result<FetchedFeed, DigestError> {
    let feed = parser::parse(bytes).map_err(|e| DigestError::FeedParse(e.to_string()))?;

    let title = feed
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty());

    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let raw_link = entry
                .links
                .iter()
                .find(|l| l.rel.as_deref() == Some("alternate"))
                .or_else(|| entry.links.first())
                .map(|l| l.href.clone())?;
            let link = normalize_link(&raw_link, base)?;
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "(untitled)".to_string());
            Some(FeedEntry {
                title,
                link,
                published: entry.published.or(entry.updated),
            })
        })
        .collect();

    Ok(FetchedFeed { title, entries })
}

fn normalize_link(candidate: &str, base: Option<&Url>) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }
    let resolved = match Url::parse(candidate) {
        Ok(u) => u,
        Err(_) => base?.join(candidate).ok()?,
    };
    match resolved.scheme() {
        "http" | "https" => Some(resolved.into()),
        _ => None,
    }
}

/// Keeps the first `limit` entries in feed order.
#[must_use]
pub fn select_entries(mut entries: Vec<FeedEntry>, limit: usize) -> Vec<FeedEntry> {
    entries.truncate(limit);
    entries
}

/// Drops entries whose link was already seen earlier in the run. `seen` is
/// shared across feeds so duplicates between overlapping feeds are removed
/// from the later feed.
#[must_use]
pub fn dedupe_links(entries: Vec<FeedEntry>, seen: &mut HashSet<String>) -> Vec<FeedEntry> {
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.link.clone()))
        .collect()
}
