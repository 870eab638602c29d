//! Headline assembly: exactly fifteen normalised, de-duplicated headlines.
//!
//! A responsive search ad takes up to fifteen headlines. The first six slots
//! are structural (mirrored "10 Best" / "Top 10" pair, the bypass slot, the
//! offer, two ad-group benefits) and are kept as the model wrote them after
//! normalisation. Slots seven to fifteen are free-form hooks; here the model
//! often repeats itself, so any hook already seen (case-insensitively) is
//! swapped for a category fallback. Missing slots are backfilled the same way.

use crate::pipeline::fallback::{fallbacks_for, HOOKS_PER_CATEGORY};
use crate::pipeline::normalize::normalize;
use std::collections::HashSet;
use tracing::debug;

/// Number of headlines in a finished asset set.
pub const HEADLINE_COUNT: usize = 15;

/// Maximum headline length in characters.
pub const HEADLINE_LIMIT: usize = 30;

/// Leading slots kept verbatim (after normalisation) regardless of duplication.
pub const STRUCTURAL_SLOTS: usize = 6;

/// Build exactly [`HEADLINE_COUNT`] headlines from raw model candidates.
///
/// Candidates beyond the fifteenth are ignored.
pub fn assemble<S: AsRef<str>>(candidates: &[S], category: &str) -> Vec<String> {
    let hooks = fallbacks_for(category);
    let mut seen: HashSet<String> = HashSet::new();
    let mut headlines = Vec::with_capacity(HEADLINE_COUNT);

    for (idx, raw) in candidates.iter().take(HEADLINE_COUNT).enumerate() {
        let headline = normalize(raw.as_ref(), HEADLINE_LIMIT, 0);
        let key = headline.to_lowercase();

        if idx < STRUCTURAL_SLOTS || (!headline.is_empty() && !seen.contains(&key)) {
            seen.insert(key);
            headlines.push(headline);
        } else {
            let replacement = pick_fallback(idx, hooks, &seen);
            debug!("Headline {}: {:?} replaced by {:?}", idx + 1, headline, replacement);
            seen.insert(replacement.to_lowercase());
            headlines.push(replacement);
        }
    }

    while headlines.len() < HEADLINE_COUNT {
        let replacement = pick_fallback(headlines.len(), hooks, &seen);
        seen.insert(replacement.to_lowercase());
        headlines.push(replacement);
    }

    headlines
}

/// Choose the fallback hook for slot `idx`.
///
/// Starts at `idx mod 9` and walks forward to the first hook not yet used.
/// Once all nine hooks are taken the `idx mod 9` hook is reused.
fn pick_fallback(
    idx: usize,
    hooks: &[&str; HOOKS_PER_CATEGORY],
    seen: &HashSet<String>,
) -> String {
    (0..HOOKS_PER_CATEGORY)
        .map(|offset| normalize(hooks[(idx + offset) % HOOKS_PER_CATEGORY], HEADLINE_LIMIT, 0))
        .find(|hook| !seen.contains(&hook.to_lowercase()))
        .unwrap_or_else(|| normalize(hooks[idx % HOOKS_PER_CATEGORY], HEADLINE_LIMIT, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fallback::FallbackCategory;
    use crate::pipeline::normalize::char_len;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_always_fifteen() {
        let many: Vec<String> = (0..20).map(|i| format!("Hook number {i}")).collect();
        let dupes = vec!["Same".to_string(); 15];
        for input in [Vec::new(), strings(&["A", "B", "C", "D", "E"]), many, dupes] {
            let out = assemble(&input, "casino");
            assert_eq!(out.len(), HEADLINE_COUNT);
            assert!(out.iter().all(|h| char_len(h) <= HEADLINE_LIMIT));
        }
    }

    #[test]
    fn test_duplicates_after_structural_slots_replaced() {
        let input = strings(&["A", "A", "B", "C", "D", "E", "A", "A"]);
        let out = assemble(&input, "casino");
        let hooks = FallbackCategory::Gambling.hooks();

        // Structural slots kept even though index 1 duplicates index 0.
        assert_eq!(&out[..6], &["A", "A", "B", "C", "D", "E"]);
        assert_eq!(out[6], hooks[6]);
        assert_eq!(out[7], hooks[7]);
        assert_ne!(out[6], out[7]);
    }

    #[test]
    fn test_duplicate_check_is_case_insensitive() {
        let input = strings(&["A", "B", "C", "D", "E", "F", "Fast Payouts", "FAST PAYOUTS"]);
        let out = assemble(&input, "generic");
        assert_eq!(out[6], "Fast Payouts");
        assert_ne!(out[7].to_lowercase(), "fast payouts");
    }

    #[test]
    fn test_empty_input_cycles_generic_hooks() {
        let out = assemble::<String>(&[], "unknown-category");
        let hooks = FallbackCategory::Generic.hooks();
        for (i, h) in out.iter().enumerate() {
            assert_eq!(h, hooks[i % HOOKS_PER_CATEGORY], "slot {i}");
        }
    }

    #[test]
    fn test_free_slots_unique_while_hooks_last() {
        let input = strings(&[
            "10 Best VoIP Services",
            "Top 10 VoIP Services",
            "Last Updated",
            "Get 3 Months Free Service",
            "Business VoIP Made Easy",
            "Business VoIP Saves Money",
            "Crystal Clear HD Voice",
            "Crystal Clear HD Voice",
            "Crystal Clear HD Voice",
        ]);
        let out = assemble(&input, "Business VoIP");
        let mut seen = HashSet::new();
        for h in &out {
            assert!(seen.insert(h.to_lowercase()), "duplicate {h}: {out:?}");
        }
    }

    #[test]
    fn test_fallback_skips_hook_already_written_by_model() {
        // Slot 6 duplicates slot 0; its default hook (index 6) was already
        // produced by the model at slot 0, so the next unused hook is chosen.
        let hooks = FallbackCategory::Gambling.hooks();
        let input = strings(&[hooks[6], "B", "C", "D", "E", "F", hooks[6]]);
        let out = assemble(&input, "casino");
        assert_eq!(out[6], hooks[7]);
    }

    #[test]
    fn test_candidates_are_normalised() {
        let input = strings(&["10 Best Semaglutide Providers Online Today", "Plans for"]);
        let out = assemble(&input, "Semaglutide");
        assert_eq!(out[0], "10 Best Semaglutide Providers");
        assert_eq!(out[1], "Plans");
    }

    #[test]
    fn test_empty_free_slot_replaced() {
        let input = strings(&["A", "B", "C", "D", "E", "F", "for the"]);
        let out = assemble(&input, "casino");
        assert_eq!(out[6], FallbackCategory::Gambling.hooks()[6]);
    }

    #[test]
    fn test_extra_candidates_ignored() {
        let input: Vec<String> = (0..25).map(|i| format!("Unique Hook {i}")).collect();
        let out = assemble(&input, "generic");
        assert_eq!(out.last().map(String::as_str), Some("Unique Hook 14"));
    }
}
