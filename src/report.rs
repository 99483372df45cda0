use std::fmt::Write;

use chrono::NaiveDate;

use crate::error::Error;
use crate::market;
use crate::models::{FreelancerRecord, QueryState, SkillSummary};
use crate::view;

pub fn summarize_by_skill(records: &[FreelancerRecord]) -> Vec<SkillSummary> {
    // (display name, headcount, rating total), in first-seen order
    let mut totals: Vec<(String, usize, f64)> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for record in records {
        for skill in &record.skills {
            let slot = *index.entry(skill.to_lowercase()).or_insert_with(|| {
                totals.push((skill.clone(), 0, 0.0));
                totals.len() - 1
            });
            let entry = &mut totals[slot];
            entry.1 += 1;
            entry.2 += record.rating;
        }
    }

    let mut summaries: Vec<SkillSummary> = totals
        .into_iter()
        .map(|(skill, freelancers, total_rating)| SkillSummary {
            skill,
            freelancers,
            average_rating: total_rating / freelancers as f64,
        })
        .collect();

    summaries.sort_by(|a, b| b.freelancers.cmp(&a.freelancers));
    summaries
}

pub fn build_report(
    records: &[FreelancerRecord],
    keyword: &str,
    query: &QueryState,
    generated_on: NaiveDate,
) -> String {
    let stats = market::roster_stats(records);
    let skills = summarize_by_skill(records);
    let metrics = market::calculate_market_metrics(records, keyword);
    let freelancers = view::derive_view(records, query);

    let mut output = String::new();

    let _ = writeln!(output, "# Freelance Market Report");
    let _ = writeln!(
        output,
        "Generated for keyword \"{}\" on {}",
        keyword, generated_on
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Roster");
    let _ = writeln!(output, "- Freelancers tracked: {}", stats.total);
    match stats.average_rating {
        Some(rating) => {
            let _ = writeln!(output, "- Average rating: {:.1}", rating);
        }
        None => {
            let _ = writeln!(output, "- Average rating: n/a");
        }
    }
    let _ = writeln!(output, "- Total reviews: {}", stats.total_reviews);
    let _ = writeln!(output, "- Top performers (4.8+): {}", stats.top_performers);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Skill Mix");
    let catalogue = view::skill_catalogue(records);
    if !catalogue.is_empty() {
        let _ = writeln!(output, "Skills tracked: {}", catalogue.join(", "));
    }
    if skills.is_empty() {
        let _ = writeln!(output, "No skills recorded.");
    } else {
        for summary in skills.iter().take(5) {
            let _ = writeln!(
                output,
                "- {}: {} freelancers (avg rating {:.1})",
                summary.skill, summary.freelancers, summary.average_rating
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Market: {}", keyword);
    let metrics = match metrics {
        Ok(metrics) => {
            let insights = market::market_insights(&metrics, records.len());
            let _ = writeln!(output, "- Cohort size: {}", metrics.cohort_size);
            let _ = writeln!(output, "- Median daily rate: {}", metrics.median_tjm);
            let _ = writeln!(
                output,
                "- Average rating: {:.1} (top performer threshold {:.1})",
                metrics.average_rating, metrics.top_performers_threshold
            );
            let _ = writeln!(
                output,
                "- Days before first missions: {}",
                metrics.average_days_to_first_missions
            );
            let _ = writeln!(
                output,
                "- Active in the last {} days: {}",
                market::ACTIVE_WINDOW_DAYS,
                metrics.active_profiles
            );
            let _ = writeln!(output, "- Saturation: {}", metrics.market_saturation);
            let _ = writeln!(output);
            let _ = writeln!(output, "### Insights");
            let _ = writeln!(
                output,
                "- Top earners average {}/day",
                insights.top_earner_rate
            );
            let _ = writeln!(
                output,
                "- {}% of profiles are active",
                insights.active_share_percent
            );
            let _ = writeln!(
                output,
                "- Estimated response time: {}h",
                insights.estimated_response_hours
            );
            let _ = writeln!(
                output,
                "- Recommended entry rate: {}/day",
                insights.recommended_entry_rate
            );
            if let Some(advice) = metrics.market_saturation.advice() {
                let _ = writeln!(output, "- {}", advice);
            }
            Some(metrics)
        }
        Err(Error::EmptyCohort { .. }) => {
            let _ = writeln!(output, "No freelancer matches this keyword.");
            None
        }
        Err(err) => {
            let _ = writeln!(output, "Market metrics unavailable: {}", err);
            None
        }
    };

    let _ = writeln!(output);
    let _ = writeln!(output, "## Freelancers (sorted by {})", query.sort_by);
    if freelancers.is_empty() {
        let _ = writeln!(output, "No freelancer matches the current filters.");
    } else {
        for record in freelancers.iter() {
            let _ = write!(
                output,
                "- #{} {} ({}) rating {:.1}, score {}",
                record.ranking,
                record.name,
                record.company,
                record.rating,
                market::performance_score(record)
            );
            match &metrics {
                Some(metrics) => {
                    let comparison = market::compare_to_market(record, metrics);
                    let _ = write!(
                        output,
                        ", est. rate {}/day, {}, rating {} market, rate {} market",
                        comparison.estimated_tjm,
                        comparison.market_position,
                        comparison.rating_vs_market,
                        comparison.tjm_vs_market
                    );
                    if comparison.is_top_performer {
                        let _ = write!(output, ", top performer");
                    }
                }
                None => {
                    let _ = write!(output, ", est. rate {}/day", market::estimated_rate(record));
                }
            }
            let _ = writeln!(output);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn report_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn skill_summary_counts_and_averages() {
        let mut roster = seed::sample_roster();
        roster[1].skills.push("python".to_string());
        let summaries = summarize_by_skill(&roster);
        assert_eq!(summaries[0].skill, "Python");
        assert_eq!(summaries[0].freelancers, 2);
        assert!((summaries[0].average_rating - 4.85).abs() < 1e-9);
        assert_eq!(summaries.len(), 9);
    }

    #[test]
    fn report_includes_market_section() {
        let roster = seed::sample_roster();
        let report = build_report(&roster, "scraping", &QueryState::default(), report_date());
        assert!(report.contains("Generated for keyword \"scraping\" on 2026-10-19"));
        assert!(report.contains("- Median daily rate: 930"));
        assert!(report.contains("- Saturation: low"));
        assert!(report.contains(
            "Skills tracked: Python, Scraping, Automation, React, TypeScript, Node.js, UI/UX, Figma, Photoshop"
        ));
        assert!(report.contains("Opportunity"));
        assert!(report.contains("- #1 Nina (Nina ALEM SEBBAGH) rating 4.8, score 100, est. rate 930/day, top-10"));
    }

    #[test]
    fn report_handles_empty_cohort() {
        let roster = seed::sample_roster();
        let report = build_report(&roster, "cobol", &QueryState::default(), report_date());
        assert!(report.contains("No freelancer matches this keyword."));
        assert!(report.contains("- #2 Alexandre Dubois"));
    }

    #[test]
    fn report_handles_empty_view() {
        let roster = seed::sample_roster();
        let query = QueryState {
            search_term: "haskell".to_string(),
            ..QueryState::default()
        };
        let report = build_report(&roster, "react", &query, report_date());
        assert!(report.contains("No freelancer matches the current filters."));
    }
}
