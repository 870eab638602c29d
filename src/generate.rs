//! Generation entry points: one ad group, or a whole bulk file.
//!
//! Every entry point has a `*_with` twin that takes the two collaborators
//! (landing-page fetcher and copy generator) explicitly, which is how tests
//! and embedding applications swap in their own implementations. The plain
//! versions build the HTTP fetcher and resolve an LLM provider from config.

use crate::config::GenerationConfig;
use crate::error::AdCopyError;
use crate::output::{AdGroupResult, BatchOutput, BatchStats};
use crate::pipeline::fetch::{ContextFetcher, HttpContextFetcher};
use crate::pipeline::llm::{parse_candidates, CopyGenerator, LlmCopyGenerator};
use crate::pipeline::assets;
use crate::prompts::{build_user_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::tabular::{self, AdGroupRequest};
use edgequake_llm::{LLMProvider, ProviderFactory};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Default model when the Gemini provider is auto-selected.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";

/// Default model when the OpenAI provider is auto-selected.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";

/// Generate assets for a single ad group.
///
/// # Errors
/// Returns `Err(AdCopyError)` only when no LLM provider can be configured.
/// Model failures are reported in `AdGroupResult::error` with an empty
/// asset set.
pub async fn generate(
    request: &AdGroupRequest,
    config: &GenerationConfig,
) -> Result<AdGroupResult, AdCopyError> {
    let (fetcher, generator) = default_collaborators(config)?;
    Ok(generate_with(request, fetcher.as_ref(), generator.as_ref(), config).await)
}

/// Generate assets for a single ad group with explicit collaborators.
///
/// Never fails: fetch problems fall back to placeholder context and model
/// problems are recorded in the returned result.
pub async fn generate_with(
    request: &AdGroupRequest,
    fetcher: &dyn ContextFetcher,
    generator: &dyn CopyGenerator,
    config: &GenerationConfig,
) -> AdGroupResult {
    let start = Instant::now();
    info!("Generating assets for ad group '{}'", request.ad_group);

    // ── Step 1: Landing-page context ─────────────────────────────────────
    let context = fetcher.fetch(&request.url).await;

    // ── Step 2: Model call ───────────────────────────────────────────────
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let user_prompt = build_user_prompt(&context, &request.category, &request.ad_group);
    let completion = generator.generate(system_prompt, &user_prompt).await;

    // ── Step 3: Parse + assemble ─────────────────────────────────────────
    let (input_tokens, output_tokens) = completion
        .as_ref()
        .map_or((0, 0), |c| (c.input_tokens, c.output_tokens));
    let outcome = completion.and_then(|c| parse_candidates(&c.content));

    if let Err(ref e) = outcome {
        warn!("Ad group '{}': {}", request.ad_group, e);
    }
    let (assets, error) = assets::build_from_outcome(outcome, &request.category);

    AdGroupResult {
        campaign: request.campaign.clone(),
        ad_group: request.ad_group.clone(),
        category: request.category.clone(),
        url: request.url.clone(),
        assets,
        model: generator.model_label(),
        input_tokens,
        output_tokens,
        duration_ms: start.elapsed().as_millis() as u64,
        error,
    }
}

/// Generate assets for every request, one at a time.
///
/// # Errors
/// Returns `Err(AdCopyError)` when no provider can be configured, or
/// [`AdCopyError::AllRowsFailed`] when not a single row succeeded.
pub async fn generate_bulk(
    requests: &[AdGroupRequest],
    config: &GenerationConfig,
) -> Result<BatchOutput, AdCopyError> {
    let (fetcher, generator) = default_collaborators(config)?;
    generate_bulk_with(requests, fetcher, generator, config).await
}

/// Bulk generation with explicit collaborators.
pub async fn generate_bulk_with(
    requests: &[AdGroupRequest],
    fetcher: Arc<dyn ContextFetcher>,
    generator: Arc<dyn CopyGenerator>,
    config: &GenerationConfig,
) -> Result<BatchOutput, AdCopyError> {
    let total_start = Instant::now();
    let total = requests.len();
    info!("Starting bulk generation: {} rows", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let results: Vec<AdGroupResult> =
        crate::stream::bulk_stream(requests.to_vec(), fetcher, generator, config.clone())
            .collect()
            .await;

    let generated = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.len() - generated;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, generated);
    }

    if total > 0 && generated == 0 {
        let first_error = results
            .iter()
            .find_map(|r| r.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(AdCopyError::AllRowsFailed { total, first_error });
    }

    let stats = BatchStats {
        total_rows: total,
        generated_rows: generated,
        failed_rows: failed,
        skipped_rows: 0,
        total_input_tokens: results.iter().map(|r| r.input_tokens as u64).sum(),
        total_output_tokens: results.iter().map(|r| r.output_tokens as u64).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Bulk generation complete: {}/{} rows, {}ms total",
        generated, total, stats.total_duration_ms
    );

    Ok(BatchOutput { results, stats })
}

/// Read a bulk CSV, generate every row, and write the export CSV.
///
/// Rows without a URL are skipped; failed rows are left out of the export.
pub async fn generate_bulk_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<BatchStats, AdCopyError> {
    let input = tabular::read_bulk_file(input_path)?;
    let mut output = generate_bulk(&input.requests, config).await?;
    output.stats.total_rows += input.skipped;
    output.stats.skipped_rows = input.skipped;

    tabular::write_rows_to_file(output_path, &output.export_rows())?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    request: &AdGroupRequest,
    config: &GenerationConfig,
) -> Result<AdGroupResult, AdCopyError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AdCopyError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(request, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

pub(crate) fn default_collaborators(
    config: &GenerationConfig,
) -> Result<(Arc<dyn ContextFetcher>, Arc<dyn CopyGenerator>), AdCopyError> {
    let fetcher = HttpContextFetcher::new(config.fetch_timeout_secs, config.context_char_budget)
        .map_err(|e| AdCopyError::Internal(format!("HTTP client: {e}")))?;
    let (provider, label) = resolve_provider(config)?;
    let generator = LlmCopyGenerator::new(provider, label, config);
    Ok((Arc::new(fetcher), Arc::new(generator)))
}

/// Instantiate a named provider with the given model.
fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<(Arc<dyn LLMProvider>, String), AdCopyError> {
    let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        AdCopyError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })?;
    Ok((provider, format!("{provider_name}/{model}")))
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`)
/// 2. **Named provider + model** (`config.provider_name`)
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`)
/// 4. **`GEMINI_API_KEY`** (Gemini)
/// 5. **`OPENAI_API_KEY`** (OpenAI)
/// 6. **Full auto-detection** (`ProviderFactory::from_env`)
///
/// Returns the provider and a `provider/model` label for reporting.
fn resolve_provider(
    config: &GenerationConfig,
) -> Result<(Arc<dyn LLMProvider>, String), AdCopyError> {
    if let Some(ref provider) = config.provider {
        let label = config.model.clone().unwrap_or_else(|| "custom".to_string());
        return Ok((Arc::clone(provider), label));
    }

    if let Some(ref name) = config.provider_name {
        let default_model = if name == "openai" {
            DEFAULT_OPENAI_MODEL
        } else {
            DEFAULT_GEMINI_MODEL
        };
        let model = config.model.as_deref().unwrap_or(default_model);
        return create_provider(name, model);
    }

    if let (Some(prov), Some(model)) = (
        env_non_empty("EDGEQUAKE_LLM_PROVIDER"),
        env_non_empty("EDGEQUAKE_MODEL"),
    ) {
        return create_provider(&prov, &model);
    }

    if env_non_empty("GEMINI_API_KEY").is_some() {
        let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
        return create_provider("gemini", model);
    }

    if env_non_empty("OPENAI_API_KEY").is_some() {
        let model = config.model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL);
        return create_provider("openai", model);
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| AdCopyError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok((llm_provider, "auto".to_string()))
}
