//! Configuration types for ad copy generation.
//!
//! All generation behaviour is controlled through [`GenerationConfig`], built
//! via its [`GenerationConfigBuilder`]. One struct covers the model call, the
//! landing-page fetch and the bulk pacing, so a run can be reproduced from a
//! single logged value.

use crate::error::AdCopyError;
use crate::progress::BatchProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Configuration for generating search-ad assets.
///
/// Built via [`GenerationConfig::builder()`] or using
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use adcopy::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .provider_name("gemini")
///     .model("gemini-2.5-pro")
///     .bulk_delay_ms(2000)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// LLM model identifier, e.g. "gemini-2.5-pro", "gpt-4.1-mini".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai", "anthropic").
    /// If None along with `provider`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Default: 0.5.
    ///
    /// Ad copy needs some variety across the nine free-form hooks; at 0.1 the
    /// model tends to repeat the same phrase and the fallback catalog ends up
    /// writing most of the ad.
    pub temperature: f32,

    /// Maximum tokens the model may generate per ad group. Default: 2048.
    pub max_tokens: usize,

    /// Custom system prompt. If None, uses the built-in copywriting protocol.
    pub system_prompt: Option<String>,

    /// Landing-page fetch timeout in seconds. Default: 5.
    pub fetch_timeout_secs: u64,

    /// Maximum characters of landing-page text sent to the model. Default: 1800.
    pub context_char_budget: usize,

    /// Optional timeout for the model call in seconds. Default: None
    /// (the transport's own default applies).
    pub api_timeout_secs: Option<u64>,

    /// Pause between model calls in bulk mode, in milliseconds. Default: 1500.
    pub bulk_delay_ms: u64,

    /// Optional progress callback for bulk runs.
    pub progress_callback: Option<Arc<dyn BatchProgressCallback>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.5,
            max_tokens: 2048,
            system_prompt: None,
            fetch_timeout_secs: 5,
            context_char_budget: 1800,
            api_timeout_secs: None,
            bulk_delay_ms: 1500,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("context_char_budget", &self.context_char_budget)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("bulk_delay_ms", &self.bulk_delay_ms)
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs.max(1);
        self
    }

    pub fn context_char_budget(mut self, chars: usize) -> Self {
        self.config.context_char_budget = chars;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    pub fn bulk_delay_ms(mut self, ms: u64) -> Self {
        self.config.bulk_delay_ms = ms;
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn BatchProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, AdCopyError> {
        let c = &self.config;
        if c.context_char_budget == 0 {
            return Err(AdCopyError::InvalidConfig(
                "Context character budget must be ≥ 1".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(AdCopyError::InvalidConfig("Max tokens must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documentation() {
        let c = GenerationConfig::default();
        assert_eq!(c.temperature, 0.5);
        assert_eq!(c.fetch_timeout_secs, 5);
        assert_eq!(c.context_char_budget, 1800);
        assert_eq!(c.bulk_delay_ms, 1500);
        assert!(c.api_timeout_secs.is_none());
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = GenerationConfig::builder().temperature(7.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn builder_rejects_zero_budget() {
        let err = GenerationConfig::builder()
            .context_char_budget(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, AdCopyError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_zero_max_tokens() {
        assert!(GenerationConfig::builder().max_tokens(0).build().is_err());
    }

    #[test]
    fn debug_hides_provider() {
        let c = GenerationConfig::builder().model("gpt-4.1-mini").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("gpt-4.1-mini"));
        assert!(!dbg.contains("progress_callback"));
    }
}
