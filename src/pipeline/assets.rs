//! Asset assembly: raw model candidates → a finished [`AdAssetSet`].
//!
//! Descriptions are normalised into the 80–90 character window, headlines go
//! through [`headlines::assemble`], and the bypass headline is forced into
//! slot three afterwards. The bypass headline is longer than 30 characters
//! (the customizer expands at serve time), so it must never pass through the
//! normaliser.

use crate::error::GenerationError;
use crate::output::{AdAssetSet, AssetWarning, BYPASS_HEADLINE, BYPASS_SLOT, DESCRIPTION_COUNT};
use crate::pipeline::headlines;
use crate::pipeline::llm::RawCandidates;
use crate::pipeline::normalize::{char_len, normalize};
use tracing::warn;

/// Maximum description length in characters.
pub const DESCRIPTION_LIMIT: usize = 90;

/// Target minimum description length in characters.
pub const DESCRIPTION_MIN: usize = 80;

/// Build the final asset set for one ad group.
pub fn build(raw: &RawCandidates, category: &str) -> AdAssetSet {
    let mut warnings = Vec::new();

    let mut descriptions: Vec<String> = raw
        .descriptions
        .iter()
        .take(DESCRIPTION_COUNT)
        .map(|d| normalize(d, DESCRIPTION_LIMIT, DESCRIPTION_MIN))
        .collect();

    for (index, d) in descriptions.iter().enumerate() {
        let len = char_len(d);
        if len < DESCRIPTION_MIN {
            warn!("Description {} is {} chars after padding (min {})", index + 1, len, DESCRIPTION_MIN);
            warnings.push(AssetWarning::UnderLengthDescription { index, len });
        }
    }

    while descriptions.len() < DESCRIPTION_COUNT {
        let index = descriptions.len();
        warn!("Model returned no description {}; leaving it empty", index + 1);
        warnings.push(AssetWarning::MissingDescription { index });
        descriptions.push(String::new());
    }

    let mut headlines = headlines::assemble(&raw.headlines, category);
    if headlines.len() > BYPASS_SLOT {
        headlines[BYPASS_SLOT] = BYPASS_HEADLINE.to_string();
    }

    AdAssetSet {
        headlines,
        descriptions,
        warnings,
    }
}

/// Build from the outcome of a model call.
///
/// A failed call yields an empty asset set plus the error.
pub fn build_from_outcome(
    outcome: Result<RawCandidates, GenerationError>,
    category: &str,
) -> (AdAssetSet, Option<GenerationError>) {
    match outcome {
        Ok(raw) => (build(&raw, category), None),
        Err(e) => (AdAssetSet::empty(), Some(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::headlines::{HEADLINE_COUNT, HEADLINE_LIMIT};

    fn raw(headlines: &[&str], descriptions: &[&str]) -> RawCandidates {
        RawCandidates {
            headlines: headlines.iter().map(|s| s.to_string()).collect(),
            descriptions: descriptions.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn full_candidates() -> RawCandidates {
        raw(
            &[
                "10 Best Semaglutide Providers",
                "Top 10 Semaglutide Providers",
                "Last Updated",
                "Get Your First Month Free",
                "Semaglutide Made Simple",
                "Lose Weight Fast Online",
                "Verified Results",
                "100% Satisfaction",
                "Start In Minutes",
                "Expert Advisors",
                "Licensed Physicians",
                "Discreet Delivery",
                "Affordable Monthly Plans",
                "No Insurance Needed",
                "Real Patient Results",
            ],
            &[
                "Find the best Semaglutide providers. Get your first month free. Start your plan today.",
                "Compare the best Semaglutide providers. Affordable plans and fast approval. Apply now.",
                "Licensed Doctors. Online Consultations. Free Shipping. Cancel Anytime Online.",
                "Stop waiting for results. Start your weight loss journey now. Get approved today!",
            ],
        )
    }

    #[test]
    fn test_build_full_set() {
        let assets = build(&full_candidates(), "Semaglutide");
        assert_eq!(assets.headlines.len(), HEADLINE_COUNT);
        assert_eq!(assets.descriptions.len(), DESCRIPTION_COUNT);
        assert_eq!(assets.headlines[0], "10 Best Semaglutide Providers");
        assert_eq!(assets.headlines[BYPASS_SLOT], BYPASS_HEADLINE);
    }

    #[test]
    fn test_headline_limits_except_bypass() {
        let assets = build(&full_candidates(), "Semaglutide");
        for (i, h) in assets.headlines.iter().enumerate() {
            if i != BYPASS_SLOT {
                assert!(char_len(h) <= HEADLINE_LIMIT, "{h}");
            }
        }
    }

    #[test]
    fn test_description_limits() {
        let assets = build(&full_candidates(), "Semaglutide");
        for d in &assets.descriptions {
            assert!(char_len(d) <= DESCRIPTION_LIMIT, "{d}");
        }
    }

    #[test]
    fn test_bypass_overrides_model_headline() {
        let assets = build(&raw(&["A", "B", "Something Else Entirely"], &[]), "casino");
        assert_eq!(assets.headlines[BYPASS_SLOT], BYPASS_HEADLINE);
    }

    #[test]
    fn test_bypass_present_even_with_no_headlines() {
        let assets = build(&raw(&[], &[]), "casino");
        assert_eq!(assets.headlines.len(), HEADLINE_COUNT);
        assert_eq!(assets.headlines[BYPASS_SLOT], BYPASS_HEADLINE);
    }

    #[test]
    fn test_missing_descriptions_padded_empty() {
        let assets = build(&raw(&[], &["Short text"]), "generic");
        assert_eq!(assets.descriptions.len(), DESCRIPTION_COUNT);
        assert!(char_len(&assets.descriptions[0]) >= DESCRIPTION_MIN);
        assert_eq!(assets.descriptions[1], "");
        assert!(assets
            .warnings
            .contains(&AssetWarning::MissingDescription { index: 3 }));
        assert_eq!(
            assets
                .warnings
                .iter()
                .filter(|w| matches!(w, AssetWarning::MissingDescription { .. }))
                .count(),
            3
        );
    }

    #[test]
    fn test_under_length_description_flagged() {
        let text = "A+ BBB Rating. 24/7 Expert Support. No Credit Impact. Apply Online Now.";
        let assets = build(&raw(&[], &[text, text, text, text]), "generic");
        assert_eq!(assets.descriptions[0], text);
        assert!(assets
            .warnings
            .contains(&AssetWarning::UnderLengthDescription { index: 0, len: 71 }));
    }

    #[test]
    fn test_extra_descriptions_ignored() {
        let d = "Find the best plans. Compare offers and pick the right one for your needs. Apply now.";
        let assets = build(&raw(&[], &[d, d, d, d, d, d]), "generic");
        assert_eq!(assets.descriptions.len(), DESCRIPTION_COUNT);
    }

    #[test]
    fn test_failed_outcome_is_empty_with_message() {
        let (assets, err) = build_from_outcome(
            Err(GenerationError::LlmFailed {
                detail: "quota exceeded".into(),
            }),
            "casino",
        );
        assert!(assets.is_empty());
        assert!(err.unwrap().to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_successful_outcome_has_no_message() {
        let (assets, err) = build_from_outcome(Ok(full_candidates()), "Semaglutide");
        assert!(err.is_none());
        assert_eq!(assets.headlines.len(), HEADLINE_COUNT);
    }
}
