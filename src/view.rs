use std::cmp::Ordering;

use tracing::debug;

use crate::models::{Filters, FreelancerRecord, QueryState, ResponseTimeFilter, SortKey};

/// Filtered and ordered copy of `records` for the current query.
///
/// All predicates are ANDed. The sort is stable, so ties keep roster order.
pub fn derive_view(records: &[FreelancerRecord], query: &QueryState) -> Vec<FreelancerRecord> {
    let search = query.search_term.to_lowercase();

    if query.filters.response_time != ResponseTimeFilter::All {
        debug!(
            response_time = %query.filters.response_time,
            "response time filter is not applied to the view"
        );
    }

    let mut view: Vec<FreelancerRecord> = records
        .iter()
        .filter(|record| matches_search(record, &search))
        .filter(|record| matches_filters(record, &query.filters))
        .cloned()
        .collect();

    view.sort_by(|a, b| compare_by(a, b, query.sort_by));

    debug!(
        total = records.len(),
        shown = view.len(),
        sort_by = %query.sort_by,
        "derived freelancer view"
    );
    view
}

/// Case-insensitive match against the name or any skill. `search_lower`
/// must already be lowercased; empty passes everything.
pub fn matches_search(record: &FreelancerRecord, search_lower: &str) -> bool {
    search_lower.is_empty()
        || record.name.to_lowercase().contains(search_lower)
        || record.has_skill_containing(search_lower)
}

/// Minimum rating, plus a selected-skill restriction the original dashboard never applied.
pub fn matches_filters(record: &FreelancerRecord, filters: &Filters) -> bool {
    if record.rating < filters.min_rating {
        return false;
    }

    filters.skills.is_empty()
        || filters.skills.iter().any(|wanted| {
            let wanted = wanted.to_lowercase();
            record
                .skills
                .iter()
                .any(|skill| skill.to_lowercase() == wanted)
        })
}

fn compare_by(a: &FreelancerRecord, b: &FreelancerRecord, sort_by: SortKey) -> Ordering {
    match sort_by {
        SortKey::Rating => b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal),
        SortKey::Reviews => b.total_reviews.cmp(&a.total_reviews),
        SortKey::Ranking => a.ranking.cmp(&b.ranking),
    }
}

/// Distinct skills in first-seen order.
pub fn skill_catalogue(records: &[FreelancerRecord]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut catalogue = Vec::new();

    for skill in records.iter().flat_map(|record| record.skills.iter()) {
        if seen.insert(skill.to_lowercase()) {
            catalogue.push(skill.clone());
        }
    }

    catalogue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn names(view: &[FreelancerRecord]) -> Vec<&str> {
        view.iter().map(|record| record.name.as_str()).collect()
    }

    #[test]
    fn search_matches_skill_case_insensitively() {
        let roster = seed::sample_roster();
        let query = QueryState {
            search_term: "react".to_string(),
            ..QueryState::default()
        };
        let view = derive_view(&roster, &query);
        assert_eq!(names(&view), vec!["Alexandre Dubois"]);
    }

    #[test]
    fn search_matches_name() {
        let roster = seed::sample_roster();
        let query = QueryState {
            search_term: "PETIT".to_string(),
            ..QueryState::default()
        };
        assert_eq!(names(&derive_view(&roster, &query)), vec!["Marie Petit"]);
    }

    #[test]
    fn min_rating_is_inclusive() {
        let roster = seed::sample_roster();
        let mut query = QueryState::default();
        query.filters.min_rating = 4.8;
        assert_eq!(
            names(&derive_view(&roster, &query)),
            vec!["Nina", "Alexandre Dubois"]
        );
    }

    #[test]
    fn sorts_by_rating_descending() {
        let roster = seed::sample_roster();
        let query = QueryState {
            sort_by: SortKey::Rating,
            ..QueryState::default()
        };
        assert_eq!(
            names(&derive_view(&roster, &query)),
            vec!["Alexandre Dubois", "Nina", "Marie Petit"]
        );
    }

    #[test]
    fn sorts_by_reviews_descending() {
        let roster = seed::sample_roster();
        let query = QueryState {
            sort_by: SortKey::Reviews,
            ..QueryState::default()
        };
        assert_eq!(
            names(&derive_view(&roster, &query)),
            vec!["Alexandre Dubois", "Marie Petit", "Nina"]
        );
    }

    #[test]
    fn review_sort_keeps_roster_order_on_ties() {
        let mut roster = seed::sample_roster();
        for record in roster.iter_mut() {
            record.total_reviews = 4;
        }
        roster.swap(0, 2);
        let query = QueryState {
            sort_by: SortKey::Reviews,
            ..QueryState::default()
        };
        assert_eq!(
            names(&derive_view(&roster, &query)),
            vec!["Marie Petit", "Alexandre Dubois", "Nina"]
        );
    }

    #[test]
    fn unknown_sort_key_falls_back_to_ranking() {
        let key: SortKey = "popularity".parse().unwrap();
        assert_eq!(key, SortKey::Ranking);

        let mut roster = seed::sample_roster();
        roster.reverse();
        let query = QueryState {
            sort_by: key,
            ..QueryState::default()
        };
        assert_eq!(
            names(&derive_view(&roster, &query)),
            vec!["Nina", "Alexandre Dubois", "Marie Petit"]
        );
    }

    #[test]
    fn skill_filter_requires_any_selected_skill() {
        let roster = seed::sample_roster();
        let mut query = QueryState::default();
        query.filters.skills = vec!["figma".to_string(), "Python".to_string()];
        assert_eq!(
            names(&derive_view(&roster, &query)),
            vec!["Nina", "Marie Petit"]
        );
    }

    #[test]
    fn response_time_filter_is_inert() {
        let roster = seed::sample_roster();
        let mut query = QueryState::default();
        query.filters.response_time = ResponseTimeFilter::Within1h;
        assert_eq!(derive_view(&roster, &query).len(), roster.len());
    }

    #[test]
    fn view_leaves_roster_untouched() {
        let roster = seed::sample_roster();
        let before = roster.clone();
        let query = QueryState {
            sort_by: SortKey::Rating,
            ..QueryState::default()
        };
        let _ = derive_view(&roster, &query);
        assert_eq!(roster, before);
    }

    #[test]
    fn catalogue_dedupes_skills() {
        let mut roster = seed::sample_roster();
        roster[1].skills.push("python".to_string());
        let catalogue = skill_catalogue(&roster);
        assert_eq!(catalogue.len(), 9);
        assert_eq!(catalogue[0], "Python");
    }
}
