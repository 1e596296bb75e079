use chrono::{DateTime, Utc};

/// Article text beyond this many characters is not sent to the model.
pub const MAX_ARTICLE_CHARS: usize = 20_000;

/// Metadata and body of one article as presented to the model.
#[derive(Debug, Clone, Copy)]
pub struct ArticlePrompt<'a> {
    pub title: Option<&'a str>,
    pub source_name: Option<&'a str>,
    pub published: Option<DateTime<Utc>>,
    pub body: &'a str,
}

/// Remove control characters (keeping newlines) and hard-truncate to `max_chars`.
#[must_use]
pub fn sanitize_article_text(raw: &str, max_chars: usize) -> String {
    raw.chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .take(max_chars)
        .collect()
}

fn sanitize_field(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Builds the single user instruction asking for a summary of about
/// `target_words` words.
#[must_use]
pub fn build_summary_prompt(article: &ArticlePrompt<'_>, target_words: usize) -> String {
    let mut header = String::from("Summarize the following news article");
    if let Some(source) = article.source_name.map(sanitize_field).filter(|s| !s.is_empty()) {
        header.push_str(&format!(" from {source}"));
    }
    if let Some(title) = article.title.map(sanitize_field).filter(|s| !s.is_empty()) {
        header.push_str(&format!(", titled \"{title}\""));
    }
    if let Some(published) = article.published {
        header.push_str(&format!(", published {}", published.format("%B %-d, %Y")));
    }
    header.push('.');

    format!(
        "{header} Write about {target_words} words, roughly three sentences, in plain prose. \
         Cover the main news and why it matters. Respond with the summary only, without a \
         preamble or headings.\n\nArticle:\n{}",
        sanitize_article_text(article.body, MAX_ARTICLE_CHARS).trim()
    )
}
