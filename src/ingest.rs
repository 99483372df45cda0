use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{FreelancerRecord, ReviewSummary};

const REVIEW_DATE_FORMAT: &str = "%d/%m/%Y";
const CSV_SKILL_SEPARATOR: char = '|';

/// A numeric field that fell back to zero because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFallback {
    pub record_id: String,
    pub field: &'static str,
    pub raw: String,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub records: Vec<FreelancerRecord>,
    pub fallbacks: Vec<ParseFallback>,
}

/// Values that may arrive as numbers or numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Loose {
    fn raw(&self) -> String {
        match self {
            Loose::Int(value) => value.to_string(),
            Loose::Float(value) => value.to_string(),
            Loose::Text(value) => value.clone(),
        }
    }

    fn as_count(&self) -> Option<u32> {
        match self {
            Loose::Int(value) => u32::try_from(*value).ok(),
            Loose::Float(value) => float_to_count(*value),
            Loose::Text(value) => {
                let trimmed = value.trim();
                trimmed
                    .parse::<u32>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_count))
            }
        }
    }

    fn as_real(&self) -> Option<f64> {
        match self {
            Loose::Int(value) => Some(*value as f64),
            Loose::Float(value) => Some(*value),
            Loose::Text(value) => value.trim().parse::<f64>().ok(),
        }
    }
}

fn float_to_count(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value < f64::from(u32::MAX) {
        Some(value.trunc() as u32)
    } else {
        None
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    id: Loose,
    name: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    profile_url: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    rating: Loose,
    ranking: Option<Loose>,
    total_reviews: Option<Loose>,
    days_ago: Option<Loose>,
    completion_rate: Option<Loose>,
    #[serde(default)]
    response_time: String,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    review: String,
    #[serde(default)]
    review_date: Option<String>,
    review_length: Option<Loose>,
    average_days_between_reviews: Option<Loose>,
}

/// CSV rows carry skills as one `|`-separated column.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    id: Loose,
    name: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    profile_url: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    rating: Loose,
    ranking: Option<Loose>,
    total_reviews: Option<Loose>,
    days_ago: Option<Loose>,
    completion_rate: Option<Loose>,
    #[serde(default)]
    response_time: String,
    #[serde(default)]
    skills: String,
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    review: String,
    #[serde(default)]
    review_date: Option<String>,
    review_length: Option<Loose>,
    average_days_between_reviews: Option<Loose>,
}

impl From<CsvRow> for RawRecord {
    fn from(row: CsvRow) -> Self {
        let skills = row
            .skills
            .split(CSV_SKILL_SEPARATOR)
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect();

        RawRecord {
            id: row.id,
            name: row.name,
            company: row.company,
            profile_url: row.profile_url.filter(|value| !value.is_empty()),
            avatar: row.avatar.filter(|value| !value.is_empty()),
            rating: row.rating,
            ranking: row.ranking,
            total_reviews: row.total_reviews,
            days_ago: row.days_ago,
            completion_rate: row.completion_rate,
            response_time: row.response_time,
            skills,
            keyword: row.keyword,
            review: row.review,
            review_date: row.review_date,
            review_length: row.review_length,
            average_days_between_reviews: row.average_days_between_reviews,
        }
    }
}

/// Loads a roster, picking the format from the file extension.
pub fn load_roster(path: &Path) -> Result<Roster> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let roster = match extension.as_deref() {
        Some("json") => roster_from_json(&std::fs::read_to_string(path)?)?,
        Some("csv") => roster_from_csv(csv::Reader::from_path(path)?)?,
        _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
    };

    info!(
        path = %path.display(),
        records = roster.records.len(),
        fallbacks = roster.fallbacks.len(),
        "loaded roster"
    );
    Ok(roster)
}

pub fn roster_from_json(input: &str) -> Result<Roster> {
    let rows: Vec<RawRecord> = serde_json::from_str(input)?;
    build_roster(rows)
}

pub fn roster_from_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Roster> {
    let mut rows = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        rows.push(RawRecord::from(result?));
    }
    build_roster(rows)
}

fn build_roster(rows: Vec<RawRecord>) -> Result<Roster> {
    let mut roster = Roster::default();
    for row in rows {
        let record = normalize(row, &mut roster.fallbacks)?;
        roster.records.push(record);
    }
    Ok(roster)
}

fn normalize(row: RawRecord, fallbacks: &mut Vec<ParseFallback>) -> Result<FreelancerRecord> {
    let id = row.id.raw();

    if row.name.trim().is_empty() {
        return Err(invalid(&id, "name is empty"));
    }

    let rating = row
        .rating
        .as_real()
        .ok_or_else(|| invalid(&id, format!("rating '{}' is not a number", row.rating.raw())))?;
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(invalid(&id, format!("rating {rating} is outside 0..=5")));
    }

    let completion_rate = match &row.completion_rate {
        Some(value) => value.as_real().ok_or_else(|| {
            invalid(&id, format!("completion rate '{}' is not a number", value.raw()))
        })?,
        None => 0.0,
    };
    if !completion_rate.is_finite() || !(0.0..=100.0).contains(&completion_rate) {
        return Err(invalid(
            &id,
            format!("completion rate {completion_rate} is outside 0..=100"),
        ));
    }

    let mut count = |field: &'static str, value: &Option<Loose>| -> u32 {
        match value {
            None => 0,
            Some(loose) => loose.as_count().unwrap_or_else(|| {
                let raw = loose.raw();
                warn!(record = %id, field, raw = %raw, "unparseable number, using 0");
                fallbacks.push(ParseFallback {
                    record_id: id.clone(),
                    field,
                    raw,
                });
                0
            }),
        }
    };

    let ranking = count("ranking", &row.ranking);
    let total_reviews = count("totalReviews", &row.total_reviews);
    let days_ago = count("daysAgo", &row.days_ago);
    let review_length = count("reviewLength", &row.review_length);
    let average_days_between = count(
        "averageDaysBetweenReviews",
        &row.average_days_between_reviews,
    );

    let review_date = row
        .review_date
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| match NaiveDate::parse_from_str(value, REVIEW_DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                warn!(record = %id, raw = value, "unparseable review date, ignoring");
                None
            }
        });

    Ok(FreelancerRecord {
        id,
        name: row.name,
        company: row.company,
        profile_url: row.profile_url,
        avatar: row.avatar,
        rating,
        ranking,
        total_reviews,
        days_ago,
        completion_rate,
        response_time: row.response_time,
        skills: row.skills,
        keyword: row.keyword,
        review: ReviewSummary {
            text: row.review,
            date: review_date,
            length: review_length,
            average_days_between,
        },
    })
}

fn invalid(id: &str, reason: impl Into<String>) -> Error {
    Error::InvalidRecord {
        id: id.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RECORDS: &str = r#"[
        {
            "id": 1,
            "name": "Nina",
            "company": "Nina ALEM SEBBAGH",
            "rating": 4.8,
            "ranking": "1",
            "totalReviews": "1",
            "daysAgo": "297",
            "completionRate": 98,
            "responseTime": "2h",
            "skills": ["Python", "Scraping", "Automation"],
            "keyword": "scraping",
            "reviewDate": "12/08/2024",
            "reviewLength": "223"
        },
        {
            "id": "b-2",
            "name": "Sam",
            "rating": "4.1",
            "ranking": 12,
            "totalReviews": "lots",
            "daysAgo": 3,
            "skills": ["Rust"],
            "keyword": "rust"
        }
    ]"#;

    #[test]
    fn parses_numeric_strings() {
        let roster = roster_from_json(TWO_RECORDS).unwrap();
        let nina = &roster.records[0];
        assert_eq!(nina.id, "1");
        assert_eq!(nina.ranking, 1);
        assert_eq!(nina.days_ago, 297);
        assert_eq!(nina.total_reviews, 1);
        assert_eq!(nina.review.length, 223);
        assert_eq!(nina.review.date, NaiveDate::from_ymd_opt(2024, 8, 12));
        assert_eq!(nina.completion_rate, 98.0);
    }

    #[test]
    fn unparseable_counts_fall_back_to_zero() {
        let roster = roster_from_json(TWO_RECORDS).unwrap();
        let sam = &roster.records[1];
        assert_eq!(sam.total_reviews, 0);
        assert_eq!(sam.rating, 4.1);
        assert_eq!(
            roster.fallbacks,
            vec![ParseFallback {
                record_id: "b-2".to_string(),
                field: "totalReviews",
                raw: "lots".to_string(),
            }]
        );
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let input = r#"[{"id": 9, "name": "Too Good", "rating": 5.5}]"#;
        let err = roster_from_json(input).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { ref id, .. } if id == "9"));
    }

    #[test]
    fn rejects_empty_name() {
        let input = r#"[{"id": 3, "name": "  ", "rating": 4.0}]"#;
        assert!(matches!(
            roster_from_json(input),
            Err(Error::InvalidRecord { .. })
        ));
    }

    #[test]
    fn reads_csv_with_piped_skills() {
        let data = "\
id,name,company,rating,ranking,totalReviews,daysAgo,completionRate,responseTime,skills,keyword
7,Lea Martin,Studio Lea,4.6,4,12,10,97,1h,React | TypeScript,react
8,Tom Roux,Roux SAS,4.2,x,3,45,90,24h,Python,scraping
";
        let reader = csv::Reader::from_reader(data.as_bytes());
        let roster = roster_from_csv(reader).unwrap();
        assert_eq!(roster.records.len(), 2);
        assert_eq!(roster.records[0].skills, vec!["React", "TypeScript"]);
        assert_eq!(roster.records[0].ranking, 4);
        assert_eq!(roster.records[1].ranking, 0);
        assert_eq!(roster.fallbacks.len(), 1);
        assert_eq!(roster.fallbacks[0].field, "ranking");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_roster(Path::new("roster.xml")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
