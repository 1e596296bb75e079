use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{info, warn};

use super::context::DigestContext;
use crate::ai::Summarizer;
use crate::core::config::FailurePolicy;
use crate::core::models::{Article, Digest, DigestSection, FeedEntry, RunReport, Summary};
use crate::core::params::resolve_settings;
use crate::digest::render;
use crate::errors::DigestError;
use crate::feeds::{dedupe_links, select_entries};
use crate::notify::OutgoingEmail;

/// Runs one digest invocation: resolve settings, build the digest, render it
/// and send exactly one email.
///
/// Settings are resolved before any feed, article, model or email call, so a
/// missing parameter aborts the run without touching the network.
///
/// # Errors
///
/// Returns the first fatal error. Under [`FailurePolicy::Isolate`] feed and
/// article fetch failures are logged and skipped instead.
pub async fn run_digest(ctx: &DigestContext, date: NaiveDate) -> Result<RunReport, DigestError> {
    let config = &ctx.config;
    let settings = resolve_settings(ctx.parameters.as_ref(), config).await?;

    let summarizer = Summarizer::new(
        ctx.generator.clone(),
        settings.model_id.clone(),
        config.max_tokens,
        config.summary_words,
    );

    let mut report = RunReport::default();
    let digest = collect_digest(ctx, &summarizer, &mut report).await?;
    report.sections = digest.sections.len();

    let email = OutgoingEmail {
        sender: settings.sender_email,
        recipient: settings.recipient_email,
        subject: config.subject.clone(),
        body: render(&digest, config.body_format, &config.subject, date),
        format: config.body_format,
    };
    report.message_id = ctx.mailer.send(&email).await?;

    info!(
        sections = report.sections,
        articles_summarized = report.articles_summarized,
        articles_skipped = report.articles_skipped,
        feeds_failed = report.feeds_failed,
        placeholder_summaries = report.placeholder_summaries,
        "Digest run complete"
    );
    Ok(report)
}

/// Builds the digest with one section per configured feed, in configured order.
///
/// # Errors
///
/// Returns the first error that the failure policy does not isolate.
pub async fn collect_digest(
    ctx: &DigestContext,
    summarizer: &Summarizer,
    report: &mut RunReport,
) -> Result<Digest, DigestError> {
    let config = &ctx.config;
    let mut seen_links = HashSet::new();
    let mut sections = Vec::with_capacity(config.feeds.len());

    for source in &config.feeds {
        let feed = match ctx.feeds.fetch(source).await {
            Ok(feed) => feed,
            Err(e) if isolates(config.failure_policy, &e) => {
                warn!(feed = %source.url, error = %e, "Skipping feed");
                report.feeds_failed += 1;
                sections.push(DigestSection {
                    heading: source.name.clone(),
                    summaries: Vec::new(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let heading = feed.title.unwrap_or_else(|| source.name.clone());
        let mut entries = select_entries(feed.entries, config.entries_per_feed);
        if config.dedupe_links {
            entries = dedupe_links(entries, &mut seen_links);
        }

        let summaries = summarize_entries(ctx, summarizer, &heading, entries, report).await?;
        info!(feed = %source.url, summaries = summaries.len(), "Feed summarized");
        sections.push(DigestSection { heading, summaries });
    }

    Ok(Digest { sections })
}

/// Walks the entries in feed order and stops once `top_per_source` summaries
/// have been produced.
async fn summarize_entries(
    ctx: &DigestContext,
    summarizer: &Summarizer,
    source_name: &str,
    entries: Vec<FeedEntry>,
    report: &mut RunReport,
) -> Result<Vec<Summary>, DigestError> {
    let limit = ctx.config.top_per_source;
    let mut summaries = Vec::with_capacity(limit);

    for entry in entries {
        if summaries.len() >= limit {
            break;
        }

        let body_text = match ctx.articles.extract(&entry.link).await {
            Ok(text) => text,
            Err(e) if isolates(ctx.config.failure_policy, &e) => {
                warn!(link = %entry.link, error = %e, "Skipping article");
                report.articles_skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let article = Article {
            title: entry.title,
            link: entry.link,
            published_at: entry.published,
            source_name: source_name.to_string(),
            body_text,
        };
        let summary = summarizer.summarize(&article).await?;
        if summary.is_placeholder() {
            report.placeholder_summaries += 1;
        }
        report.articles_summarized += 1;
        summaries.push(summary);
    }

    Ok(summaries)
}

fn isolates(policy: FailurePolicy, error: &DigestError) -> bool {
    policy == FailurePolicy::Isolate && error.is_isolatable()
}
