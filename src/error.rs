use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no freelancer matches keyword '{keyword}'")]
    EmptyCohort { keyword: String },

    #[error("invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("unsupported data format: {0}")]
    UnsupportedFormat(String),

    #[error("unknown freelancer id: {0}")]
    UnknownFreelancer(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
