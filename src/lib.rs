//! Market analytics and list views over a roster of freelancer profiles.

pub mod error;
pub mod ingest;
pub mod market;
pub mod models;
pub mod report;
pub mod seed;
pub mod view;

pub use error::{Error, Result};
pub use ingest::{load_roster, ParseFallback, Roster};
pub use market::{calculate_market_metrics, compare_to_market, estimated_rate};
pub use models::{
    Filters, FreelancerComparison, FreelancerRecord, MarketMetrics, QueryState, SortKey,
};
pub use view::derive_view;
