use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::models::FeedSource;
use crate::errors::DigestError;

pub const DEFAULT_MODEL_ID_PARAM: &str = "/BEDROCK_MODEL_ID";
pub const DEFAULT_SENDER_EMAIL_PARAM: &str = "/SENDER_EMAIL";
pub const DEFAULT_RECIPIENT_EMAIL_PARAM: &str = "/RECIPIENT_EMAIL";
pub const DEFAULT_SUBJECT: &str = "Daily AI News Summary";

/// Feeds polled when `DIGEST_FEEDS` is not set, in digest order.
pub const DEFAULT_FEEDS: [(&str, &str); 3] = [
    (
        "MIT Technology Review",
        "https://www.technologyreview.com/feed/",
    ),
    ("VentureBeat AI", "https://venturebeat.com/category/ai/feed/"),
    ("Forbes AI", "https://www.forbes.com/ai/feed/"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Html,
    Text,
}

impl FromStr for BodyFormat {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(BodyFormat::Html),
            "text" | "plain" => Ok(BodyFormat::Text),
            other => Err(DigestError::InvalidConfiguration(format!(
                "DIGEST_BODY_FORMAT: unknown format `{other}`"
            ))),
        }
    }
}

/// What to do when a single feed or article cannot be fetched or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and continue with the remaining work.
    Isolate,
    /// Fail the whole invocation.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolate" => Ok(FailurePolicy::Isolate),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(DigestError::InvalidConfiguration(format!(
                "DIGEST_FAILURE_POLICY: unknown policy `{other}`"
            ))),
        }
    }
}

/// Names of the Parameter Store entries resolved at the start of every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNames {
    pub model_id: String,
    pub sender_email: String,
    pub recipient_email: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub parameters: ParameterNames,
    pub feeds: Vec<FeedSource>,
    pub entries_per_feed: usize,
    pub top_per_source: usize,
    pub summary_words: usize,
    pub max_tokens: u32,
    pub body_format: BodyFormat,
    pub subject: String,
    pub failure_policy: FailurePolicy,
    pub dedupe_links: bool,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            parameters: ParameterNames {
                model_id: DEFAULT_MODEL_ID_PARAM.to_string(),
                sender_email: DEFAULT_SENDER_EMAIL_PARAM.to_string(),
                recipient_email: DEFAULT_RECIPIENT_EMAIL_PARAM.to_string(),
            },
            feeds: DEFAULT_FEEDS
                .iter()
                .map(|(name, url)| FeedSource::new(name, url))
                .collect(),
            entries_per_feed: 10,
            top_per_source: 3,
            summary_words: 150,
            max_tokens: 1000,
            body_format: BodyFormat::Html,
            subject: DEFAULT_SUBJECT.to_string(),
            failure_policy: FailurePolicy::Isolate,
            dedupe_links: false,
            http_timeout: Duration::from_secs(20),
        }
    }
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, DigestError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup, falling back
    /// to the defaults for every unset or empty variable.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DigestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let feeds = match get("DIGEST_FEEDS") {
            Some(raw) => parse_feed_list(&raw)?,
            None => defaults.feeds,
        };

        Ok(Self {
            parameters: ParameterNames {
                model_id: get("MODEL_ID_PARAM").unwrap_or(defaults.parameters.model_id),
                sender_email: get("SENDER_EMAIL_PARAM")
                    .unwrap_or(defaults.parameters.sender_email),
                recipient_email: get("RECIPIENT_EMAIL_PARAM")
                    .unwrap_or(defaults.parameters.recipient_email),
            },
            feeds,
            entries_per_feed: parse_var(
                "DIGEST_ENTRIES_PER_FEED",
                get("DIGEST_ENTRIES_PER_FEED"),
                defaults.entries_per_feed,
            )?,
            top_per_source: parse_var(
                "DIGEST_TOP_PER_SOURCE",
                get("DIGEST_TOP_PER_SOURCE"),
                defaults.top_per_source,
            )?,
            summary_words: parse_var(
                "DIGEST_SUMMARY_WORDS",
                get("DIGEST_SUMMARY_WORDS"),
                defaults.summary_words,
            )?,
            max_tokens: parse_var(
                "DIGEST_MAX_TOKENS",
                get("DIGEST_MAX_TOKENS"),
                defaults.max_tokens,
            )?,
            body_format: get("DIGEST_BODY_FORMAT")
                .map(|v| v.parse::<BodyFormat>())
                .transpose()?
                .unwrap_or(defaults.body_format),
            subject: get("DIGEST_SUBJECT").unwrap_or(defaults.subject),
            failure_policy: get("DIGEST_FAILURE_POLICY")
                .map(|v| v.parse::<FailurePolicy>())
                .transpose()?
                .unwrap_or(defaults.failure_policy),
            dedupe_links: parse_var(
                "DIGEST_DEDUPE_LINKS",
                get("DIGEST_DEDUPE_LINKS"),
                defaults.dedupe_links,
            )?,
            http_timeout: Duration::from_secs(parse_var(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                defaults.http_timeout.as_secs(),
            )?),
        })
    }
}

fn is_http_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T, DigestError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| DigestError::InvalidConfiguration(format!("{name}: {e}"))),
    }
}

/// Parses `name=url,url,...`. Bare URLs use the URL itself as the name.
///
/// # Errors
///
/// Returns an error if the list contains no usable feed.
pub fn parse_feed_list(raw: &str) -> Result<Vec<FeedSource>, DigestError> {
    let feeds: Vec<FeedSource> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once('=') {
            Some((name, url)) if is_http_url(url.trim()) && !is_http_url(name) => {
                FeedSource::new(name.trim(), url.trim())
            }
            _ => FeedSource::new(item, item),
        })
        .collect();

    if feeds.is_empty() {
        return Err(DigestError::InvalidConfiguration(
            "DIGEST_FEEDS: no feeds configured".to_string(),
        ));
    }
    Ok(feeds)
}
