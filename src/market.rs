use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    FreelancerComparison, FreelancerRecord, MarketInsights, MarketMetrics, MarketPosition,
    MarketSaturation, RosterStats, Standing,
};

pub const BASE_RATE: f64 = 400.0;
pub const RATING_DIVISOR: f64 = 4.0;
pub const RANKING_BONUS_CUTOFF: i64 = 10;
pub const RANKING_BONUS_STEP: i64 = 50;
pub const ACTIVE_WINDOW_DAYS: u32 = 30;
pub const TOP_PERFORMER_MARGIN: f64 = 0.3;
pub const TOP_PERFORMER_RATING: f64 = 4.8;
pub const RATING_TOLERANCE: f64 = 0.1;
pub const TJM_TOLERANCE: i64 = 50;

/// Synthetic daily rate from rating and ranking. Rankings past the cutoff
/// earn no bonus; there is no upper clamp.
pub fn estimated_rate(record: &FreelancerRecord) -> i64 {
    let rating_multiplier = record.rating / RATING_DIVISOR;
    let ranking_bonus =
        ((RANKING_BONUS_CUTOFF - i64::from(record.ranking)) * RANKING_BONUS_STEP).max(0);
    (BASE_RATE * rating_multiplier + ranking_bonus as f64).round() as i64
}

/// Records tagged with `keyword`, or carrying a skill that contains it
/// (case-insensitive).
pub fn select_cohort<'a>(
    records: &'a [FreelancerRecord],
    keyword: &str,
) -> Vec<&'a FreelancerRecord> {
    let needle = keyword.to_lowercase();
    records
        .iter()
        .filter(|record| record.keyword == keyword || record.has_skill_containing(&needle))
        .collect()
}

pub fn calculate_market_metrics(
    records: &[FreelancerRecord],
    keyword: &str,
) -> Result<MarketMetrics> {
    let cohort = select_cohort(records, keyword);
    if cohort.is_empty() {
        return Err(Error::EmptyCohort {
            keyword: keyword.to_string(),
        });
    }

    let size = cohort.len() as f64;
    let average_rating = cohort.iter().map(|record| record.rating).sum::<f64>() / size;

    let mut rates: Vec<i64> = cohort.iter().map(|record| estimated_rate(record)).collect();
    rates.sort_unstable();
    // Upper median for even cohorts.
    let median_tjm = rates[rates.len() / 2];

    let total_days: f64 = cohort
        .iter()
        .map(|record| simulated_days_to_first_missions(record.rating))
        .sum();
    let average_days_to_first_missions = (total_days / size).round() as i64;

    let active_profiles = cohort
        .iter()
        .filter(|record| record.days_ago < ACTIVE_WINDOW_DAYS)
        .count();

    let market_saturation = saturation_for(active_profiles as f64 / size);

    debug!(
        keyword,
        cohort_size = cohort.len(),
        active_profiles,
        median_tjm,
        "computed market metrics"
    );

    Ok(MarketMetrics {
        keyword: keyword.to_string(),
        cohort_size: cohort.len(),
        average_rating,
        median_tjm,
        average_days_to_first_missions,
        active_profiles,
        top_performers_threshold: average_rating + TOP_PERFORMER_MARGIN,
        market_saturation,
    })
}

fn simulated_days_to_first_missions(rating: f64) -> f64 {
    (30.0 - (rating - 4.0) * 50.0).max(5.0)
}

pub fn saturation_for(active_ratio: f64) -> MarketSaturation {
    if active_ratio > 0.7 {
        MarketSaturation::High
    } else if active_ratio > 0.4 {
        MarketSaturation::Medium
    } else {
        MarketSaturation::Low
    }
}

pub fn compare_to_market(
    record: &FreelancerRecord,
    metrics: &MarketMetrics,
) -> FreelancerComparison {
    let estimated_tjm = estimated_rate(record);

    let rating_diff = record.rating - metrics.average_rating;
    let rating_vs_market = if rating_diff.abs() < RATING_TOLERANCE {
        Standing::Average
    } else if rating_diff > 0.0 {
        Standing::Above
    } else {
        Standing::Below
    };

    let tjm_diff = estimated_tjm - metrics.median_tjm;
    let tjm_vs_market = if tjm_diff.abs() < TJM_TOLERANCE {
        Standing::Average
    } else if tjm_diff > 0 {
        Standing::Above
    } else {
        Standing::Below
    };

    FreelancerComparison {
        estimated_tjm,
        rating_vs_market,
        tjm_vs_market,
        is_top_performer: record.rating >= metrics.top_performers_threshold,
        market_position: market_position(record.ranking),
    }
}

pub fn market_position(ranking: u32) -> MarketPosition {
    match ranking {
        0..=3 => MarketPosition::Top10,
        4..=10 => MarketPosition::Top25,
        11..=20 => MarketPosition::Average,
        _ => MarketPosition::BelowAverage,
    }
}

pub fn performance_score(record: &FreelancerRecord) -> u32 {
    let score = record.rating * 20.0 + record.completion_rate * 0.8;
    score.round().clamp(0.0, 100.0) as u32
}

pub fn roster_stats(records: &[FreelancerRecord]) -> RosterStats {
    let total = records.len();
    let average_rating = if total == 0 {
        None
    } else {
        Some(records.iter().map(|record| record.rating).sum::<f64>() / total as f64)
    };

    RosterStats {
        total,
        average_rating,
        total_reviews: records
            .iter()
            .map(|record| u64::from(record.total_reviews))
            .sum(),
        top_performers: records
            .iter()
            .filter(|record| record.rating >= TOP_PERFORMER_RATING)
            .count(),
    }
}

/// Headline insights for a cohort. The active share is measured against
/// the whole roster, not the cohort.
pub fn market_insights(metrics: &MarketMetrics, roster_len: usize) -> MarketInsights {
    let active_share_percent = if roster_len == 0 {
        0
    } else {
        (metrics.active_profiles as f64 / roster_len as f64 * 100.0).round() as i64
    };

    MarketInsights {
        top_earner_rate: (metrics.median_tjm as f64 * 1.4).round() as i64,
        active_share_percent,
        estimated_response_hours: (metrics.average_days_to_first_missions as f64 / 5.0).round()
            as i64,
        recommended_entry_rate: (metrics.median_tjm as f64 * 0.8).round() as i64,
    }
}
