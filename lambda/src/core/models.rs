use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    #[must_use]
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedFeed {
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source_name: String,
    pub body_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub title: String,
    pub link: String,
    pub summary_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestSection {
    pub heading: String,
    pub summaries: Vec<Summary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub sections: Vec<DigestSection>,
}

impl Digest {
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.sections.iter().map(|s| s.summaries.len()).sum()
    }
}

/// Values resolved from Parameter Store once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub model_id: String,
    pub sender_email: String,
    pub recipient_email: String,
}

/// Outcome of one digest invocation, logged at the end of the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub sections: usize,
    pub articles_summarized: usize,
    pub articles_skipped: usize,
    pub feeds_failed: usize,
    pub placeholder_summaries: usize,
    pub message_id: String,
}

/// S3 object-created notification, reduced to the fields the deploy handler reads.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageEventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEventRecord {
    pub s3: Option<StorageEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEntity {
    pub bucket: Option<StorageBucket>,
    pub object: Option<StorageObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageBucket {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageObject {
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}
