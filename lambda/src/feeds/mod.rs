//! Feed acquisition: fetching, parsing and entry selection

pub mod fetch;

pub use fetch::{FeedFetcher, HttpFeedFetcher, dedupe_links, parse_feed, select_entries};
