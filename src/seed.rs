use chrono::NaiveDate;

use crate::models::{FreelancerRecord, ReviewSummary};

/// Built-in roster used when no data file is given.
pub fn sample_roster() -> Vec<FreelancerRecord> {
    vec![
        FreelancerRecord {
            id: "1".to_string(),
            name: "Nina".to_string(),
            company: "Nina ALEM SEBBAGH".to_string(),
            profile_url: Some("https://www.malt.fr/profile/romaindufourt".to_string()),
            avatar: Some("/placeholder.svg".to_string()),
            rating: 4.8,
            ranking: 1,
            total_reviews: 1,
            days_ago: 297,
            completion_rate: 98.0,
            response_time: "2h".to_string(),
            skills: skills(&["Python", "Scraping", "Automation"]),
            keyword: "scraping".to_string(),
            review: ReviewSummary {
                text: "Great collaboration: understood our needs right away, very responsive, \
                       and delivered a clear, well documented automation."
                    .to_string(),
                date: NaiveDate::from_ymd_opt(2024, 8, 12),
                length: 223,
                average_days_between: 0,
            },
        },
        FreelancerRecord {
            id: "2".to_string(),
            name: "Alexandre Dubois".to_string(),
            company: "Tech Solutions SARL".to_string(),
            profile_url: Some("https://www.malt.fr/profile/alexandre".to_string()),
            avatar: Some("/placeholder.svg".to_string()),
            rating: 4.9,
            ranking: 2,
            total_reviews: 15,
            days_ago: 263,
            completion_rate: 100.0,
            response_time: "1h".to_string(),
            skills: skills(&["React", "TypeScript", "Node.js"]),
            keyword: "react".to_string(),
            review: ReviewSummary {
                text: "Excellent developer, very professional and delivered on time.".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 9, 15),
                length: 87,
                average_days_between: 18,
            },
        },
        FreelancerRecord {
            id: "3".to_string(),
            name: "Marie Petit".to_string(),
            company: "Design Studio".to_string(),
            profile_url: Some("https://www.malt.fr/profile/marie".to_string()),
            avatar: Some("/placeholder.svg".to_string()),
            rating: 4.7,
            ranking: 3,
            total_reviews: 8,
            days_ago: 245,
            completion_rate: 95.0,
            response_time: "3h".to_string(),
            skills: skills(&["UI/UX", "Figma", "Photoshop"]),
            keyword: "design".to_string(),
            review: ReviewSummary {
                text: "Exceptional creativity and attentive to the brief. Very happy with the result."
                    .to_string(),
                date: NaiveDate::from_ymd_opt(2024, 10, 3),
                length: 94,
                average_days_between: 31,
            },
        },
    ]
}

fn skills(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
