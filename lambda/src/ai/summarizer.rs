use std::sync::Arc;
use tracing::{info, warn};

use super::client::{ModelRequest, TextGenerator};
use super::prompt::{ArticlePrompt, build_summary_prompt};
use super::response::parse_generation;
use crate::core::models::{Article, Summary};
use crate::errors::DigestError;

/// Substituted for the summary text when the model response carries no usable text.
pub const SUMMARY_PLACEHOLDER: &str = "Summary not available.";

pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    model_id: String,
    max_tokens: u32,
    target_words: usize,
}

impl Summarizer {
    #[must_use]
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        model_id: String,
        max_tokens: u32,
        target_words: usize,
    ) -> Self {
        Self {
            generator,
            model_id,
            max_tokens,
            target_words,
        }
    }

    /// Summarizes one article. A malformed response envelope is recovered here
    /// by substituting [`SUMMARY_PLACEHOLDER`].
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be invoked at all.
    pub async fn summarize(&self, article: &Article) -> Result<Summary, DigestError> {
        let prompt = build_summary_prompt(
            &ArticlePrompt {
                title: Some(&article.title),
                source_name: Some(&article.source_name),
                published: article.published_at,
                body: &article.body_text,
            },
            self.target_words,
        );

        let request = ModelRequest {
            model_id: self.model_id.clone(),
            prompt,
            max_tokens: self.max_tokens,
        };

        let summary_text = match self
            .generator
            .generate(&request)
            .await
            .and_then(|envelope| parse_generation(&envelope))
        {
            Ok(text) => text,
            Err(DigestError::ModelResponseMalformed(reason)) => {
                warn!(link = %article.link, %reason, "Using placeholder summary");
                SUMMARY_PLACEHOLDER.to_string()
            }
            Err(e) => return Err(e),
        };

        info!(link = %article.link, chars = summary_text.len(), "Summarized article");
        Ok(Summary {
            title: article.title.clone(),
            link: article.link.clone(),
            summary_text,
        })
    }
}

impl Summary {
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.summary_text == SUMMARY_PLACEHOLDER
    }
}
