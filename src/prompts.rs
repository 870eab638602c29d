//! Prompts for LLM-based search-ad copy generation.
//!
//! The system prompt carries the full copywriting protocol (asset structure,
//! character limits, polishing rules); the user prompt carries one ad group's
//! inputs and scanned landing-page context. The model is asked for limits it
//! will not always honour, which is why [`crate::pipeline::normalize`] exists.
//!
//! Callers can override the system prompt via
//! [`crate::config::GenerationConfig::system_prompt`].

use crate::output::BYPASS_HEADLINE;

/// Default system prompt for generating responsive search ad assets.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"Role: Senior PPC Copywriter expert in Direct Response for Search Ads (RSA). You generate ad assets optimized for High CTR and Quality Score.

Step 1: Analysis & Extraction
- Scan URL context for the strongest offers and promotions. Extract the primary value proposition (e.g., "50% Off", "Money Back Guarantee", "Get $30 Free").
- Strip brand names: Use generic category terms only to ensure broad quality score relevance and avoid policy issues with competitors.

Step 2: Asset Structure & Character Limits
Headlines (Max 30 chars):
- HL1: "10 Best [AG Topic] [Noun]" (Must be Plural). Example: "10 Best Semaglutide Providers".
- HL2: "Top 10 [AG Topic] [Noun]" (Mirror HL1).
  *MIRROR RULE*: HL2 must use the exact same noun and topic as HL1, but switch "10 Best" to "Top 10".
  *AUTHORITY RULE*: Match the noun to the category. Use "Sites" for Casino, "Services" for Tax/Legal, "Apps" for VPN, "Providers", "Systems", or "Treatments".
  STRICT: Ensure the noun is PLURAL (e.g., Systems instead of System). AVOID generic words like "Options" or "Programs" for medical niches.
- HL3 (Bypass): MUST BE EXACTLY: Last Updated: {CUSTOMIZER.Month:2026}
- HL4: The strongest generic promotion found.
  *STRICT RULE*: ALWAYS use full words (e.g., "Months" instead of "Mo.", "First" instead of "1st", "Off" instead of "Disc") if the total length remains under 30 characters.
- HL5-6: [AG Name] + core benefit.
  *CRITICAL*: If [AG Name] is long (over 15 chars), shorten it and use a high-impact verb (e.g., "Resolve Debt Now", "Lose Weight Fast").
  NEVER end HL5-6 with a hyphen (-) or a hanging word.
- HL7-15: 9 UNIQUE high-conversion marketing hooks. No repetition. Examples: "Verified Results", "100% Satisfaction", "Start In Minutes", "Expert Advisors".

Descriptions (Strictly 80-90 characters):
- Description 1: MUST start with "Find the best".
  Template: "Find the best [AG Name]. Get [Offer found in HL4]. [Short CTA]." (Total 80-90 chars).
- Description 2: MUST start with "Compare the best".
  Template: "Compare the best [AG Name]. [Offer details]. [Short CTA]." (Total 80-90 chars).
- Description 3 (Contextual Feature List): A punchy list of 3-4 features separated by dots.
  Example: "A+ BBB Rating. 24/7 Expert Support. No Credit Impact. Fast Online Application."
- Description 4 (Hard-Sale Closing): A high-urgency, aggressive closing statement.
  Example: "Stop IRS collections today. Resolve your tax debt now. Call for a free consultation!"

Step 3: Final Polishing Rules
- NO BRAND NAMES. FULL WORDS ONLY. COMPLETE THOUGHTS ONLY.
- Every asset must make sense on its own. Every description must finish its last sentence completely with a period, exclamation mark, or question mark.
- Ensure NO hanging words or symbols at the end (like "for", "the", "on", "of", "to", "with", "&", "+", "Secure", "Start", "Find", "Compare").
- Output MUST be in JSON format."#;

/// Build the per-ad-group user prompt.
///
/// `context` is the scanned landing-page text; the bypass headline is
/// embedded verbatim so the model reproduces it in slot three.
pub fn build_user_prompt(context: &str, category: &str, ad_group: &str) -> String {
    format!(
        r#"SCAN CONTEXT: {context}

INPUTS:
Category: {category}
Ad Group: {ad_group}

STRICT TASK INSTRUCTIONS:
- HL1: "10 Best {ad_group} [Noun]" (MUST be Plural: Providers/Systems/Sites/Treatments).
- HL2: "Top 10 {ad_group} [Noun]" (Mirror HL1 - Use exact same topic and plural noun).
- HL3: MUST be "{BYPASS_HEADLINE}" (DO NOT TRIM, DO NOT CHANGE).
- HL4: Extract the strongest offer. ALWAYS USE FULL WORDS (e.g., "Months" instead of "Mo.", "First" instead of "1st").
- HL5-6: AG Name + Benefit. No hanging words.
- Description 1: MUST start with "Find the best".
- Description 2: MUST start with "Compare the best".
- Description 3: MUST be a dot-separated list of features.
- Description 4: MUST be a high-urgency, aggressive hard-sale closing statement.
- ALL DESCRIPTIONS: Strictly 80-90 characters. Every sentence must be COMPLETE and end with punctuation.

JSON Output format: {{"headlines": [], "descriptions": []}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_names_bypass_headline() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains(BYPASS_HEADLINE));
    }

    #[test]
    fn user_prompt_embeds_inputs() {
        let p = build_user_prompt("Get 50% off today", "Semaglutide", "GLP-1 Shots");
        assert!(p.contains("SCAN CONTEXT: Get 50% off today"));
        assert!(p.contains("Category: Semaglutide"));
        assert!(p.contains("\"10 Best GLP-1 Shots [Noun]\""));
        assert!(p.contains(BYPASS_HEADLINE));
        assert!(p.contains(r#"{"headlines": [], "descriptions": []}"#));
    }
}
