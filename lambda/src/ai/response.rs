//! Translation of the model provider's response envelope into plain text.
//!
//! This is the only place that knows the envelope's shape. Two shapes are
//! understood:
//! - messages API: `{"content": [{"type": "text", "text": "..."}, ...]}`
//! - legacy text completions: `{"completion": "..."}`

use serde::Deserialize;
use serde_json::Value;

use crate::errors::DigestError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationEnvelope {
    Messages { content: Vec<ContentBlock> },
    Completion { completion: String },
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<String>,
}

/// Extracts the generated text from a response envelope.
///
/// # Errors
///
/// Returns `ModelResponseMalformed` when the envelope matches neither known
/// shape or carries no non-empty text.
pub fn parse_generation(envelope: &Value) -> Result<String, DigestError> {
    let parsed = GenerationEnvelope::deserialize(envelope).map_err(|_| {
        DigestError::ModelResponseMalformed(format!(
            "no generated text field in response: {}",
            describe_keys(envelope)
        ))
    })?;

    let text = match parsed {
        GenerationEnvelope::Messages { content } => content
            .into_iter()
            .filter(|block| block.kind.as_deref().is_none_or(|k| k == "text"))
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n"),
        GenerationEnvelope::Completion { completion } => completion,
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(DigestError::ModelResponseMalformed(
            "response contained no text".to_string(),
        ));
    }
    Ok(text.to_string())
}

fn describe_keys(envelope: &Value) -> String {
    match envelope.as_object() {
        Some(map) => format!("keys [{}]", map.keys().cloned().collect::<Vec<_>>().join(", ")),
        None => "not an object".to_string(),
    }
}
