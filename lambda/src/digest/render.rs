use chrono::NaiveDate;
use std::fmt::Write;

use crate::core::config::BodyFormat;
use crate::core::models::{Digest, DigestSection, Summary};

/// Shown under a section heading when the feed yielded no summaries.
pub const EMPTY_SECTION_NOTE: &str = "No articles available.";

#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Renders the digest in the requested body format.
#[must_use]
pub fn render(digest: &Digest, format: BodyFormat, title: &str, date: NaiveDate) -> String {
    match format {
        BodyFormat::Html => render_html(digest, title, date),
        BodyFormat::Text => render_text(digest, title, date),
    }
}

/// Renders a complete HTML document: one `<h2>` per section in digest order
/// and one block per summary.
#[must_use]
pub fn render_html(digest: &Digest, title: &str, date: NaiveDate) -> String {
    let title = escape_html(title);
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{title}</h1>");
    let _ = writeln!(html, "<p><em>{}</em></p>", date.format("%A, %B %-d, %Y"));

    for section in &digest.sections {
        write_html_section(&mut html, section);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn write_html_section(html: &mut String, section: &DigestSection) {
    let _ = writeln!(html, "<h2>{}</h2>", escape_html(&section.heading));
    if section.summaries.is_empty() {
        let _ = writeln!(html, "<p>{EMPTY_SECTION_NOTE}</p>");
        return;
    }
    for summary in &section.summaries {
        write_html_article(html, summary);
    }
}

fn write_html_article(html: &mut String, summary: &Summary) {
    let body = summary
        .summary_text
        .lines()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join("<br>\n");
    html.push_str("<div class=\"article\">\n");
    let _ = writeln!(html, "<h3>{}</h3>", escape_html(&summary.title));
    let _ = writeln!(html, "<p>{body}</p>");
    let _ = writeln!(
        html,
        "<p><a href=\"{}\">Read more</a></p>",
        escape_html(&summary.link)
    );
    html.push_str("</div>\n");
}

/// Plain-text rendering with underlined headings.
#[must_use]
pub fn render_text(digest: &Digest, title: &str, date: NaiveDate) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{title}");
    let _ = writeln!(text, "{}", date.format("%A, %B %-d, %Y"));

    for section in &digest.sections {
        let _ = writeln!(text);
        let _ = writeln!(text, "{}", section.heading);
        let _ = writeln!(text, "{}", "=".repeat(section.heading.chars().count()));
        if section.summaries.is_empty() {
            let _ = writeln!(text);
            let _ = writeln!(text, "{EMPTY_SECTION_NOTE}");
            continue;
        }
        for summary in &section.summaries {
            let _ = writeln!(text);
            let _ = writeln!(text, "{}", summary.title);
            let _ = writeln!(text, "{}", summary.summary_text);
            let _ = writeln!(text, "Read more: {}", summary.link);
        }
    }
    text
}
