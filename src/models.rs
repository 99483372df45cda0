use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A freelancer profile as it leaves the ingestion boundary.
///
/// Numeric fields are already parsed; records are never patched after
/// creation, every derived view is recomputed from the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerRecord {
    pub id: String,
    pub name: String,
    pub company: String,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub rating: f64,
    pub ranking: u32,
    pub total_reviews: u32,
    pub days_ago: u32,
    pub completion_rate: f64,
    pub response_time: String,
    pub skills: Vec<String>,
    pub keyword: String,
    #[serde(default)]
    pub review: ReviewSummary,
}

impl FreelancerRecord {
    pub fn has_skill_containing(&self, needle_lower: &str) -> bool {
        self.skills
            .iter()
            .any(|skill| skill.to_lowercase().contains(needle_lower))
    }
}

/// Descriptive review metadata. Not used by any metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub text: String,
    pub date: Option<NaiveDate>,
    pub length: u32,
    pub average_days_between: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Ranking,
    Rating,
    Reviews,
}

impl FromStr for SortKey {
    type Err = Infallible;

    /// Anything unrecognized sorts by ranking.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "rating" => SortKey::Rating,
            "reviews" => SortKey::Reviews,
            _ => SortKey::Ranking,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::Ranking => "ranking",
            SortKey::Rating => "rating",
            SortKey::Reviews => "reviews",
        };
        f.write_str(label)
    }
}

/// Response-time bucket selected in the filter panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseTimeFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "1h")]
    Within1h,
    #[serde(rename = "3h")]
    Within3h,
    #[serde(rename = "24h")]
    Within24h,
}

impl FromStr for ResponseTimeFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(ResponseTimeFilter::All),
            "1h" => Ok(ResponseTimeFilter::Within1h),
            "3h" => Ok(ResponseTimeFilter::Within3h),
            "24h" => Ok(ResponseTimeFilter::Within24h),
            other => Err(format!(
                "unknown response time bucket '{other}' (expected all, 1h, 3h or 24h)"
            )),
        }
    }
}

impl fmt::Display for ResponseTimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResponseTimeFilter::All => "all",
            ResponseTimeFilter::Within1h => "1h",
            ResponseTimeFilter::Within3h => "3h",
            ResponseTimeFilter::Within24h => "24h",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    pub min_rating: f64,
    pub skills: Vec<String>,
    pub response_time: ResponseTimeFilter,
}

/// Caller-owned query state. The pipeline reads it and never keeps it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryState {
    pub search_term: String,
    pub filters: Filters,
    pub sort_by: SortKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSaturation {
    Low,
    Medium,
    High,
}

impl MarketSaturation {
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            MarketSaturation::High => Some("Saturated market: hard to stand out"),
            MarketSaturation::Low => Some("Opportunity: little competition in this market"),
            MarketSaturation::Medium => None,
        }
    }
}

impl fmt::Display for MarketSaturation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MarketSaturation::Low => "low",
            MarketSaturation::Medium => "medium",
            MarketSaturation::High => "high",
        };
        f.write_str(label)
    }
}

/// Aggregate statistics for one keyword cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMetrics {
    pub keyword: String,
    pub cohort_size: usize,
    pub average_rating: f64,
    pub median_tjm: i64,
    pub average_days_to_first_missions: i64,
    pub active_profiles: usize,
    pub top_performers_threshold: f64,
    pub market_saturation: MarketSaturation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
    Above,
    Below,
    Average,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Standing::Above => "above",
            Standing::Below => "below",
            Standing::Average => "average",
        };
        f.write_str(label)
    }
}

/// Display labels kept as-is for consumers; they are not percentiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketPosition {
    #[serde(rename = "top-10")]
    Top10,
    #[serde(rename = "top-25")]
    Top25,
    #[serde(rename = "average")]
    Average,
    #[serde(rename = "below-average")]
    BelowAverage,
}

impl fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MarketPosition::Top10 => "top-10",
            MarketPosition::Top25 => "top-25",
            MarketPosition::Average => "average",
            MarketPosition::BelowAverage => "below-average",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerComparison {
    pub estimated_tjm: i64,
    pub rating_vs_market: Standing,
    pub tjm_vs_market: Standing,
    pub is_top_performer: bool,
    pub market_position: MarketPosition,
}

/// Headline numbers for a whole roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStats {
    pub total: usize,
    pub average_rating: Option<f64>,
    pub total_reviews: u64,
    pub top_performers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsights {
    pub top_earner_rate: i64,
    pub active_share_percent: i64,
    pub estimated_response_hours: i64,
    pub recommended_entry_rate: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingTier {
    Leader,
    Podium,
    Field,
}

impl RankingTier {
    pub fn from_ranking(ranking: u32) -> Self {
        match ranking {
            1 => RankingTier::Leader,
            0..=3 => RankingTier::Podium,
            _ => RankingTier::Field,
        }
    }
}

/// Per-skill headcount and average rating across a roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub skill: String,
    pub freelancers: usize,
    pub average_rating: f64,
}
