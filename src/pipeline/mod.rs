//! Pipeline stages for search-ad copy generation.
//!
//! Each submodule implements exactly one step. Only [`fetch`] and [`llm`]
//! touch the network; everything downstream of the model reply is a pure,
//! deterministic function of its inputs.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ llm ──▶ assets ──┬─▶ normalize   (every string)
//! (page)   (model)  (orch.)  └─▶ headlines ──▶ fallback
//! ```
//!
//! 1. [`fetch`]: landing-page text, or a placeholder on any failure
//! 2. [`llm`]: prompt the model and parse its JSON into raw candidates
//! 3. [`assets`]: orchestrate the rules below and force the bypass headline
//! 4. [`normalize`]: length window, hanging words, sentence completion, padding
//! 5. [`headlines`]: fifteen de-duplicated headlines
//! 6. [`fallback`]: category hooks used to fill headline gaps

pub mod assets;
pub mod fallback;
pub mod fetch;
pub mod headlines;
pub mod llm;
pub mod normalize;
