//! LLM interaction: send the copywriting prompt and parse the candidates.
//!
//! Prompt text lives in [`crate::prompts`] and every length rule lives in
//! [`crate::pipeline::normalize`]. This module only makes the call and
//! parses whatever JSON the model sends back.
//!
//! There is no retry: a failed call becomes a [`GenerationError`] and the
//! ad group is reported with an empty asset set.

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Raw model reply plus token accounting.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub content: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// Produces raw copy candidates from a prompt pair.
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    /// Run one generation. The reply should be `{"headlines": [...], "descriptions": [...]}` JSON.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Completion, GenerationError>;

    /// Human-readable label of the model behind this generator.
    fn model_label(&self) -> String;
}

/// [`CopyGenerator`] backed by an `edgequake-llm` provider.
pub struct LlmCopyGenerator {
    provider: Arc<dyn LLMProvider>,
    label: String,
    options: CompletionOptions,
    api_timeout_secs: Option<u64>,
}

impl LlmCopyGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, label: impl Into<String>, config: &GenerationConfig) -> Self {
        Self {
            provider,
            label: label.into(),
            options: build_options(config),
            api_timeout_secs: config.api_timeout_secs,
        }
    }
}

#[async_trait]
impl CopyGenerator for LlmCopyGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Completion, GenerationError> {
        let messages = vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)];
        let call = self.provider.chat(&messages, Some(&self.options));

        let result = match self.api_timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), call)
                .await
                .map_err(|_| GenerationError::Timeout { secs })?,
            None => call.await,
        };

        let response = result.map_err(|e| GenerationError::LlmFailed {
            detail: e.to_string(),
        })?;

        debug!(
            "{}: {} input tokens, {} output tokens",
            self.label, response.prompt_tokens, response.completion_tokens
        );

        Ok(Completion {
            content: response.content,
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
        })
    }

    fn model_label(&self) -> String {
        self.label.clone()
    }
}

/// Build `CompletionOptions` from the generation config.
///
/// Providers that support a JSON response mode are asked for it; the parser
/// below still tolerates fenced or prose-wrapped replies from those that don't.
fn build_options(config: &GenerationConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        response_format: Some(JSON_RESPONSE_FORMAT.to_string()),
        ..Default::default()
    }
}

const JSON_RESPONSE_FORMAT: &str = "json_object";

// ── Candidate parsing ────────────────────────────────────────────────────────

/// Unvalidated headline and description strings from one model reply.
///
/// Either list may be short or empty; nothing about arity is assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidates {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
}

#[derive(Deserialize)]
struct CandidatePayload {
    #[serde(default)]
    headlines: Vec<Value>,
    #[serde(default)]
    descriptions: Vec<Value>,
}

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json|JSON)?\s*\n(.*)\n```\s*$").unwrap());

/// Parse a model reply into [`RawCandidates`].
///
/// Accepts bare JSON, JSON wrapped in a Markdown code fence, or a single JSON
/// object surrounded by prose. Non-string list items are stringified
/// (numbers, booleans) or dropped (null, nested values).
pub fn parse_candidates(reply: &str) -> Result<RawCandidates, GenerationError> {
    let body = strip_code_fences(reply);

    let payload: CandidatePayload = serde_json::from_str(&body)
        .or_else(|first_err| match outer_object(&body) {
            Some(obj) if obj.len() < body.len() => serde_json::from_str(obj),
            _ => Err(first_err),
        })
        .map_err(|e| GenerationError::MalformedResponse {
            detail: e.to_string(),
        })?;

    Ok(RawCandidates {
        headlines: coerce_strings(payload.headlines),
        descriptions: coerce_strings(payload.descriptions),
    })
}

fn strip_code_fences(input: &str) -> String {
    let trimmed = input.trim();
    match RE_OUTER_FENCES.captures(trimmed) {
        Some(caps) => caps[1].to_string(),
        None => trimmed.to_string(),
    }
}

fn outer_object(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    (start < end).then(|| &input[start..=end])
}

fn coerce_strings(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}
