//! Output types: finished asset sets, per-ad-group results, export rows.

use crate::error::GenerationError;
use crate::pipeline::headlines::HEADLINE_COUNT;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Number of descriptions in a finished asset set.
pub const DESCRIPTION_COUNT: usize = 4;

/// Headline slot reserved for the date customizer (third headline).
pub const BYPASS_SLOT: usize = 2;

/// The fixed third headline. The customizer is resolved by the ad platform
/// (or [`resolve_customizer`] for previews) to the current month and year.
pub const BYPASS_HEADLINE: &str = "Last Updated: {CUSTOMIZER.Month:2026}";

/// Headlines and descriptions for one ad group.
///
/// A successful generation always has [`HEADLINE_COUNT`] headlines and
/// [`DESCRIPTION_COUNT`] descriptions; a failed one has both empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdAssetSet {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    /// Best-effort constraints that could not be met.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AssetWarning>,
}

impl AdAssetSet {
    /// An empty set, returned when generation fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty() && self.descriptions.is_empty()
    }

    /// Headlines with the date customizer resolved for display on `date`.
    pub fn display_headlines(&self, date: NaiveDate) -> Vec<String> {
        self.headlines
            .iter()
            .map(|h| resolve_customizer(h, date))
            .collect()
    }
}

/// A length or arity constraint that could only be met on a best-effort basis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetWarning {
    /// Padding could not bring the description up to the minimum length.
    UnderLengthDescription { index: usize, len: usize },
    /// The model returned fewer descriptions than needed; slot left empty.
    MissingDescription { index: usize },
}

static RE_CUSTOMIZER_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{CUSTOMIZER\.Month:\d{4}\}").unwrap());

/// Replace every `{CUSTOMIZER.Month:YYYY}` marker with e.g. `October 2026`.
pub fn resolve_customizer(headline: &str, date: NaiveDate) -> String {
    let month_year = date.format("%B %Y").to_string();
    RE_CUSTOMIZER_MONTH
        .replace_all(headline, month_year.as_str())
        .into_owned()
}

/// Result of generating assets for one ad group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdGroupResult {
    pub campaign: String,
    pub ad_group: String,
    pub category: String,
    pub url: String,
    /// Empty when `error` is set.
    pub assets: AdAssetSet,
    /// Label of the model that produced the copy.
    pub model: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
    /// Set when the model call failed or returned unusable output.
    pub error: Option<GenerationError>,
}

impl AdGroupResult {
    /// Flatten into an export row. `None` for failed results.
    pub fn to_export_row(&self) -> Option<ExportRow> {
        if self.error.is_some() || self.assets.is_empty() {
            return None;
        }
        Some(ExportRow::new(&self.campaign, &self.ad_group, &self.assets))
    }
}

/// Aggregate statistics for a bulk run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Rows in the input file, including skipped ones.
    pub total_rows: usize,
    pub generated_rows: usize,
    pub failed_rows: usize,
    /// Rows without a URL.
    pub skipped_rows: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_duration_ms: u64,
}

/// Complete output of a bulk run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// Every attempted row, failures included, in input order.
    pub results: Vec<AdGroupResult>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Export rows for the successful results only.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.results
            .iter()
            .filter_map(AdGroupResult::to_export_row)
            .collect()
    }
}

/// One exported ad group: `Campaign, Ad Group, Headline 1..15, Description 1..4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub campaign: String,
    pub ad_group: String,
    pub headlines: [String; HEADLINE_COUNT],
    pub descriptions: [String; DESCRIPTION_COUNT],
}

impl ExportRow {
    /// Build a row, leaving cells empty where the asset set is short.
    pub fn new(campaign: &str, ad_group: &str, assets: &AdAssetSet) -> Self {
        let cell = |items: &[String], i: usize| items.get(i).cloned().unwrap_or_default();
        Self {
            campaign: campaign.to_string(),
            ad_group: ad_group.to_string(),
            headlines: std::array::from_fn(|i| cell(&assets.headlines, i)),
            descriptions: std::array::from_fn(|i| cell(&assets.descriptions, i)),
        }
    }

    /// Column names in export order.
    pub fn header() -> Vec<String> {
        let mut cols = vec!["Campaign".to_string(), "Ad Group".to_string()];
        cols.extend((1..=HEADLINE_COUNT).map(|n| format!("Headline {n}")));
        cols.extend((1..=DESCRIPTION_COUNT).map(|n| format!("Description {n}")));
        cols
    }

    /// Cell values in the same order as [`ExportRow::header`].
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.campaign.as_str(), self.ad_group.as_str()];
        fields.extend(self.headlines.iter().map(String::as_str));
        fields.extend(self.descriptions.iter().map(String::as_str));
        fields
    }
}
