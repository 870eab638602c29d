//! # adcopy
//!
//! Generate responsive search-ad assets (15 headlines, 4 descriptions) for an
//! ad group from its landing page, using an LLM for the copy and a
//! deterministic post-processor for every length and structure rule.
//!
//! Models are unreliable at counting characters. They overshoot the 30/90
//! character limits, stop mid-phrase ("Get the best deal for"), repeat
//! themselves, or return fewer items than asked. Everything after the model
//! call in this crate exists to turn that output into assets an ad platform
//! will accept without manual editing.
//!
//! ## Pipeline Overview
//!
//! ```text
//! AdGroupRequest (campaign, ad group, category, URL)
//!  │
//!  ├─ 1. Fetch      landing-page text (scripts/nav/footer stripped, 1800 chars)
//!  ├─ 2. Prompt     copywriting protocol + page context + category
//!  ├─ 3. Generate   one LLM call, JSON reply parsed leniently
//!  ├─ 4. Normalize  truncate, drop hanging words, complete, pad
//!  ├─ 5. Assemble   15 unique headlines, category fallbacks, bypass slot
//!  └─ 6. Output     AdGroupResult → export CSV row
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use adcopy::{generate, AdGroupRequest, GenerationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / ...
//!     let config = GenerationConfig::default();
//!     let request = AdGroupRequest {
//!         campaign: "Search_Campaign_2026".into(),
//!         ad_group: "Semaglutide".into(),
//!         category: "Semaglutide".into(),
//!         url: "https://example.com".into(),
//!     };
//!     let result = generate(&request, &config).await?;
//!     for h in &result.assets.headlines {
//!         println!("{h}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `adcopy` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! adcopy = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod stream;
pub mod tabular;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder};
pub use error::{AdCopyError, GenerationError};
pub use generate::{
    generate, generate_bulk, generate_bulk_file, generate_bulk_with, generate_sync, generate_with,
};
pub use output::{
    resolve_customizer, AdAssetSet, AdGroupResult, AssetWarning, BatchOutput, BatchStats,
    ExportRow, BYPASS_HEADLINE,
};
pub use pipeline::fetch::{ContextFetcher, HttpContextFetcher};
pub use pipeline::llm::{Completion, CopyGenerator, LlmCopyGenerator, RawCandidates};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{bulk_stream, generate_bulk_stream, AdGroupStream};
pub use tabular::{
    read_bulk, read_bulk_file, read_bulk_spreadsheet, write_rows, write_rows_to_file, write_template,
    write_template_to_file, AdGroupRequest, BulkInput,
};
