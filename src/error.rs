use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("congestion model or scaler is not loaded")]
    ModelUnavailable,
    #[error("dataset not found at {0}")]
    DataUnavailable(PathBuf),
    #[error("invalid feature {name}: {value}")]
    InvalidFeature { name: &'static str, value: i64 },
    #[error("computation failed: {0}")]
    Computation(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
