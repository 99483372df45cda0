use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use freelance_tracker::models::{Filters, QueryState, RankingTier, ResponseTimeFilter, SortKey};
use freelance_tracker::{ingest, market, report, seed, view, Error, FreelancerRecord};

#[derive(Parser)]
#[command(name = "freelance-tracker")]
#[command(about = "Freelancer roster views and market metrics", long_about = None)]
struct Cli {
    /// Roster file (.json or .csv); the built-in sample roster is used when omitted
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct QueryArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value_t = 0.0)]
    min_rating: f64,
    /// Keep freelancers with any of these skills
    #[arg(long = "skill")]
    skills: Vec<String>,
    #[arg(long, default_value = "all")]
    response_time: ResponseTimeFilter,
    /// ranking, rating or reviews
    #[arg(long, default_value = "ranking")]
    sort_by: SortKey,
}

impl QueryArgs {
    fn into_query(self) -> QueryState {
        QueryState {
            search_term: self.search,
            filters: Filters {
                min_rating: self.min_rating,
                skills: self.skills,
                response_time: self.response_time,
            },
            sort_by: self.sort_by,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List freelancers matching a search and filters
    View {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long)]
        json: bool,
    },
    /// Show market metrics for a keyword cohort
    Market {
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        json: bool,
    },
    /// Compare one freelancer to a keyword cohort
    Compare {
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        id: String,
    },
    /// Roster headline numbers and skill mix
    Stats,
    /// Generate a markdown report
    Report {
        #[arg(long)]
        keyword: String,
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let records = load_records(cli.data.as_deref())?;

    match cli.command {
        Commands::View { query, json } => {
            let freelancers = view::derive_view(&records, &query.into_query());
            if json {
                println!("{}", serde_json::to_string_pretty(&freelancers)?);
                return Ok(());
            }
            if freelancers.is_empty() {
                println!("No freelancer matches these criteria.");
                return Ok(());
            }
            for record in freelancers.iter() {
                println!(
                    "- #{} {} ({}) rating {:.1}, {} reviews, score {}, skills {}{}",
                    record.ranking,
                    record.name,
                    record.company,
                    record.rating,
                    record.total_reviews,
                    market::performance_score(record),
                    record.skills.join(", "),
                    match RankingTier::from_ranking(record.ranking) {
                        RankingTier::Leader => " [leader]",
                        RankingTier::Podium => " [podium]",
                        RankingTier::Field => "",
                    }
                );
            }
        }
        Commands::Market { keyword, json } => {
            let metrics = match market::calculate_market_metrics(&records, &keyword) {
                Ok(metrics) => metrics,
                Err(Error::EmptyCohort { .. }) => {
                    println!("No freelancer matches keyword \"{keyword}\".");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };
            let insights = market::market_insights(&metrics, records.len());
            if json {
                let payload = serde_json::json!({ "metrics": metrics, "insights": insights });
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }
            println!("Market for \"{}\" ({} profiles):", keyword, metrics.cohort_size);
            println!("- median daily rate {}", metrics.median_tjm);
            println!(
                "- average rating {:.1}, top performer threshold {:.1}",
                metrics.average_rating, metrics.top_performers_threshold
            );
            println!(
                "- {} days before first missions",
                metrics.average_days_to_first_missions
            );
            println!(
                "- {} active profiles, saturation {}",
                metrics.active_profiles, metrics.market_saturation
            );
            println!(
                "- top earners {}/day, recommended entry rate {}/day",
                insights.top_earner_rate, insights.recommended_entry_rate
            );
            if let Some(advice) = metrics.market_saturation.advice() {
                println!("- {advice}");
            }
        }
        Commands::Compare { keyword, id } => {
            let record = records
                .iter()
                .find(|record| record.id == id)
                .ok_or_else(|| Error::UnknownFreelancer(id.clone()))?;
            let metrics = match market::calculate_market_metrics(&records, &keyword) {
                Ok(metrics) => metrics,
                Err(Error::EmptyCohort { .. }) => {
                    println!("No freelancer matches keyword \"{keyword}\".");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };
            let comparison = market::compare_to_market(record, &metrics);
            println!("{} against the \"{}\" market:", record.name, keyword);
            println!(
                "- estimated rate {}/day ({} median)",
                comparison.estimated_tjm, comparison.tjm_vs_market
            );
            println!("- rating {} market average", comparison.rating_vs_market);
            println!("- position {}", comparison.market_position);
            if comparison.is_top_performer {
                println!("- top performer");
            }
        }
        Commands::Stats => {
            let stats = market::roster_stats(&records);
            println!("Freelancers: {}", stats.total);
            match stats.average_rating {
                Some(rating) => println!("Average rating: {rating:.1}"),
                None => println!("Average rating: n/a"),
            }
            println!("Total reviews: {}", stats.total_reviews);
            println!("Top performers: {}", stats.top_performers);
            println!("Skills: {}", view::skill_catalogue(&records).join(", "));
            for summary in report::summarize_by_skill(&records) {
                println!(
                    "- {}: {} freelancers (avg rating {:.1})",
                    summary.skill, summary.freelancers, summary.average_rating
                );
            }
        }
        Commands::Report {
            keyword,
            query,
            out,
        } => {
            let output = report::build_report(
                &records,
                &keyword,
                &query.into_query(),
                Local::now().date_naive(),
            );
            std::fs::write(&out, output)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn load_records(path: Option<&Path>) -> anyhow::Result<Vec<FreelancerRecord>> {
    match path {
        Some(path) => {
            let roster = ingest::load_roster(path)
                .with_context(|| format!("failed to load roster from {}", path.display()))?;
            if !roster.fallbacks.is_empty() {
                eprintln!(
                    "{} numeric field(s) could not be parsed and were set to 0.",
                    roster.fallbacks.len()
                );
            }
            Ok(roster.records)
        }
        None => Ok(seed::sample_roster()),
    }
}
