//! Category fallback catalog: generic hooks used to fill headline gaps.
//!
//! When the model repeats itself or returns too few headlines, the gaps are
//! filled from a fixed list of nine category-appropriate marketing hooks.
//! The category is matched by keyword against the free-text label the user
//! typed ("Semaglutide", "Business VoIP", "Online Casino MI", …); anything
//! unrecognised gets the generic list.

/// Number of hooks in every fallback list.
pub const HOOKS_PER_CATEGORY: usize = 9;

const WEIGHT_LOSS_HOOKS: [&str; HOOKS_PER_CATEGORY] = [
    "Expert Medical Providers",
    "Doctor-Approved Treatments",
    "Fast Online Approval",
    "No Hidden Fees Ever",
    "Personalized Treatment Plans",
    "Cancel Anytime Options",
    "HSA/FSA Eligible Plans",
    "Free Shipping Available",
    "Online Prescriptions Now",
];

const TELEPHONY_HOOKS: [&str; HOOKS_PER_CATEGORY] = [
    "Award-Winning Service",
    "Unlimited Calling Plans",
    "AI-Powered Business Tools",
    "Seamless CRM Integration",
    "Scalable For Any Size",
    "Voice, Video & Text",
    "No Long-Term Contracts",
    "Crystal Clear HD Voice",
    "24/7 Enterprise Support",
];

const GAMBLING_HOOKS: [&str; HOOKS_PER_CATEGORY] = [
    "MI Licensed & Regulated",
    "Fast Payouts Guaranteed",
    "Exclusive Casino Bonuses",
    "Secure & Confidential Play",
    "24/7 Player Support",
    "Huge Game Selection",
    "Top Rated Casino Apps",
    "Mobile Gaming Available",
    "Join Thousands Of Players",
];

const GENERIC_HOOKS: [&str; HOOKS_PER_CATEGORY] = [
    "Verified & Secure Results",
    "100% Satisfaction Guaranteed",
    "Expert Support 24/7",
    "Best Rated In Category",
    "Get Started In Minutes",
    "Trusted By Thousands Daily",
    "Professional Expert Help",
    "Compare Top Rated Options",
    "Secure & Confidential",
];

/// A category family with its own fallback hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCategory {
    /// Weight loss and GLP-1 medical treatments.
    WeightLoss,
    /// VoIP and business phone systems.
    Telephony,
    /// Online casinos and gambling.
    Gambling,
    /// Anything else.
    Generic,
}

impl FallbackCategory {
    /// Match a free-text category label by keyword, case-insensitively.
    ///
    /// Checks run in a fixed order, so a label matching several families
    /// ("weight loss phone coaching") resolves to the first.
    pub fn detect(label: &str) -> Self {
        let label = label.to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| label.contains(k));

        if has(&["semaglutide", "weight"]) {
            FallbackCategory::WeightLoss
        } else if has(&["voip", "phone"]) {
            FallbackCategory::Telephony
        } else if has(&["casino", "gambling"]) {
            FallbackCategory::Gambling
        } else {
            FallbackCategory::Generic
        }
    }

    /// The ordered hooks for this family.
    pub fn hooks(self) -> &'static [&'static str; HOOKS_PER_CATEGORY] {
        match self {
            FallbackCategory::WeightLoss => &WEIGHT_LOSS_HOOKS,
            FallbackCategory::Telephony => &TELEPHONY_HOOKS,
            FallbackCategory::Gambling => &GAMBLING_HOOKS,
            FallbackCategory::Generic => &GENERIC_HOOKS,
        }
    }
}

/// Ordered fallback hooks for a free-text category label.
pub fn fallbacks_for(category: &str) -> &'static [&'static str; HOOKS_PER_CATEGORY] {
    FallbackCategory::detect(category).hooks()
}
