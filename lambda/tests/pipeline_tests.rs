mod common;

use chrono::NaiveDate;
use common::{Harness, entries, feed};
use news_digest::ai::SUMMARY_PLACEHOLDER;
use news_digest::core::config::{BodyFormat, FailurePolicy};
use news_digest::errors::DigestError;
use news_digest::worker::run_digest;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in digest"))
}

#[tokio::test]
async fn sections_follow_configured_feed_order() {
    let (ctx, mailer) = Harness::new(&[
        ("Zeta", "https://zeta.test/rss"),
        ("Alpha", "https://alpha.test/rss"),
        ("Mid", "https://mid.test/rss"),
    ])
    .with_feed("https://zeta.test/rss", feed(Some("Zeta Feed"), entries("zeta", 2)))
    .with_feed("https://alpha.test/rss", feed(Some("Alpha Feed"), entries("alpha", 2)))
    .with_feed("https://mid.test/rss", feed(None, entries("mid", 2)))
    .build();

    let report = run_digest(&ctx, date()).await.unwrap();
    assert_eq!(report.sections, 3);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let body = &sent[0].body;
    let zeta = position(body, "<h2>Zeta Feed</h2>");
    let alpha = position(body, "<h2>Alpha Feed</h2>");
    // No feed title: the configured name is the heading.
    let mid = position(body, "<h2>Mid</h2>");
    assert!(zeta < alpha && alpha < mid);
}

#[tokio::test]
async fn keeps_first_three_summaries_per_feed() {
    let mut harness = Harness::new(&[("Alpha", "https://alpha.test/rss")])
        .with_feed("https://alpha.test/rss", feed(Some("Alpha"), entries("alpha", 15)));
    harness.config.body_format = BodyFormat::Text;
    let log = harness.log.clone();
    let (ctx, mailer) = harness.build();

    let report = run_digest(&ctx, date()).await.unwrap();
    assert_eq!(report.articles_summarized, 3);

    let body = &mailer.sent()[0].body;
    for i in 0..3 {
        assert!(body.contains(&format!("alpha story {i}\n")));
    }
    assert!(!body.contains("alpha story 3\n"));

    let scraped: Vec<String> = log
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("article "))
        .collect();
    assert_eq!(
        scraped,
        vec![
            "article https://alpha.test/0",
            "article https://alpha.test/1",
            "article https://alpha.test/2",
        ]
    );
}

#[tokio::test]
async fn only_first_ten_entries_are_considered() {
    let mut harness = Harness::new(&[("Alpha", "https://alpha.test/rss")])
        .with_feed("https://alpha.test/rss", feed(Some("Alpha"), entries("alpha", 12)));
    // Entries 0..=8 all fail, so only entry 9 can be summarized; 10 and 11 are
    // beyond the window and must never be fetched.
    for i in 0..9 {
        harness
            .failing_articles
            .insert(format!("https://alpha.test/{i}"));
    }
    let log = harness.log.clone();
    let (ctx, mailer) = harness.build();

    let report = run_digest(&ctx, date()).await.unwrap();
    assert_eq!(report.articles_summarized, 1);
    assert_eq!(report.articles_skipped, 9);

    let calls = log.calls();
    assert!(calls.contains(&"article https://alpha.test/9".to_string()));
    assert!(!calls.iter().any(|c| c.ends_with("/10") || c.ends_with("/11")));
    assert!(mailer.sent()[0].body.contains("alpha story 9"));
}

#[tokio::test]
async fn malformed_model_response_uses_placeholder_and_still_sends() {
    let mut harness = Harness::new(&[("Alpha", "https://alpha.test/rss")])
        .with_feed("https://alpha.test/rss", feed(Some("Alpha"), entries("alpha", 3)));
    harness.malformed.insert("https://alpha.test/1".to_string());
    let (ctx, mailer) = harness.build();

    let report = run_digest(&ctx, date()).await.unwrap();
    assert_eq!(report.placeholder_summaries, 1);
    assert_eq!(report.articles_summarized, 3);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let body = &sent[0].body;
    assert!(body.contains(&format!("<p>{SUMMARY_PLACEHOLDER}</p>")));
    assert!(body.contains("Summary: Body of https://alpha.test/0"));
    assert!(body.contains("Summary: Body of https://alpha.test/2"));
}

#[tokio::test]
async fn repeated_runs_render_identical_digests() {
    let build = || {
        Harness::new(&[
            ("Alpha", "https://alpha.test/rss"),
            ("Beta", "https://beta.test/rss"),
        ])
        .with_feed("https://alpha.test/rss", feed(Some("Alpha"), entries("alpha", 5)))
        .with_feed("https://beta.test/rss", feed(Some("Beta"), entries("beta", 1)))
        .build()
    };

    let (ctx, mailer) = build();
    run_digest(&ctx, date()).await.unwrap();
    run_digest(&ctx, date()).await.unwrap();
    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].body, sent[1].body);

    let (fresh_ctx, fresh_mailer) = build();
    run_digest(&fresh_ctx, date()).await.unwrap();
    assert_eq!(fresh_mailer.sent()[0].body, sent[0].body);
}

#[tokio::test]
async fn empty_feed_keeps_its_heading() {
    let (ctx, mailer) = Harness::new(&[
        ("Quiet", "https://quiet.test/rss"),
        ("Busy", "https://busy.test/rss"),
    ])
    .with_feed("https://quiet.test/rss", feed(Some("Quiet Feed"), Vec::new()))
    .with_feed("https://busy.test/rss", feed(Some("Busy Feed"), entries("busy", 1)))
    .build();

    let report = run_digest(&ctx, date()).await.unwrap();
    assert_eq!(report.sections, 2);

    let body = &mailer.sent()[0].body;
    let quiet = position(body, "<h2>Quiet Feed</h2>");
    let busy = position(body, "<h2>Busy Feed</h2>");
    let quiet_section = &body[quiet..busy];
    assert!(quiet_section.contains("No articles available."));
    assert!(!quiet_section.contains("class=\"article\""));
}

#[tokio::test]
async fn missing_parameter_aborts_before_network() {
    let mut harness = Harness::new(&[("Alpha", "https://alpha.test/rss")])
        .with_feed("https://alpha.test/rss", feed(Some("Alpha"), entries("alpha", 3)));
    harness.parameters = common::FakeParameters::without("/RECIPIENT_EMAIL");
    let log = harness.log.clone();
    let (ctx, mailer) = harness.build();

    let err = run_digest(&ctx, date()).await.unwrap_err();
    match err {
        DigestError::ConfigurationMissing(name) => assert_eq!(name, "/RECIPIENT_EMAIL"),
        other => panic!("expected ConfigurationMissing, got {other:?}"),
    }
    assert!(log.calls().is_empty());
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn isolated_feed_failure_keeps_other_feeds() {
    let mut harness = Harness::new(&[
        ("Down", "https://down.test/rss"),
        ("Up", "https://up.test/rss"),
    ])
    .with_feed("https://up.test/rss", feed(Some("Up"), entries("up", 2)));
    harness.failing_feeds.insert("https://down.test/rss".to_string());
    let (ctx, mailer) = harness.build();

    let report = run_digest(&ctx, date()).await.unwrap();
    assert_eq!(report.feeds_failed, 1);
    assert_eq!(report.articles_summarized, 2);

    let body = &mailer.sent()[0].body;
    assert!(position(body, "<h2>Down</h2>") < position(body, "<h2>Up</h2>"));
}

#[tokio::test]
async fn abort_policy_fails_the_run() {
    let mut harness = Harness::new(&[
        ("Up", "https://up.test/rss"),
        ("Down", "https://down.test/rss"),
    ])
    .with_feed("https://up.test/rss", feed(Some("Up"), entries("up", 1)));
    harness.failing_feeds.insert("https://down.test/rss".to_string());
    harness.config.failure_policy = FailurePolicy::Abort;
    let (ctx, mailer) = harness.build();

    let err = run_digest(&ctx, date()).await.unwrap_err();
    assert!(matches!(err, DigestError::NetworkError(_)));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn duplicate_links_are_dropped_when_enabled() {
    let shared = entries("shared", 2);
    let mut harness = Harness::new(&[
        ("First", "https://first.test/rss"),
        ("Second", "https://second.test/rss"),
    ])
    .with_feed("https://first.test/rss", feed(Some("First"), shared.clone()))
    .with_feed("https://second.test/rss", feed(Some("Second"), shared));
    harness.config.dedupe_links = true;
    let (ctx, _mailer) = harness.build();

    let report = run_digest(&ctx, date()).await.unwrap();
    assert_eq!(report.articles_summarized, 2);
}

#[tokio::test]
async fn duplicate_links_are_kept_by_default() {
    let shared = entries("shared", 2);
    let (ctx, _mailer) = Harness::new(&[
        ("First", "https://first.test/rss"),
        ("Second", "https://second.test/rss"),
    ])
    .with_feed("https://first.test/rss", feed(Some("First"), shared.clone()))
    .with_feed("https://second.test/rss", feed(Some("Second"), shared))
    .build();

    let report = run_digest(&ctx, date()).await.unwrap();
    assert_eq!(report.articles_summarized, 4);
}

#[tokio::test]
async fn delivery_failure_is_fatal() {
    let mut harness = Harness::new(&[("Alpha", "https://alpha.test/rss")])
        .with_feed("https://alpha.test/rss", feed(Some("Alpha"), entries("alpha", 1)));
    harness.mailer_fails = true;
    let (ctx, _mailer) = harness.build();

    let err = run_digest(&ctx, date()).await.unwrap_err();
    assert!(matches!(err, DigestError::Delivery(_)));
}

#[tokio::test]
async fn email_uses_resolved_addresses_and_subject() {
    let (ctx, mailer) = Harness::new(&[("Alpha", "https://alpha.test/rss")])
        .with_feed("https://alpha.test/rss", feed(Some("Alpha"), entries("alpha", 1)))
        .build();

    let report = run_digest(&ctx, date()).await.unwrap();
    assert_eq!(report.message_id, "msg-1");

    let email = &mailer.sent()[0];
    assert_eq!(email.sender, "digest@example.com");
    assert_eq!(email.recipient, "reader@example.com");
    assert_eq!(email.subject, "Daily AI News Summary");
    assert_eq!(email.format, BodyFormat::Html);
}
