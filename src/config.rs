//! Runtime configuration.

use std::env;
use std::path::PathBuf;

use crate::congestion::category::CategoryPolicy;
use crate::global_variables::{
    FLAT_RANGE_SCORE, MODEL_PATH, SCALER_PATH, SUSTAINABILITY_DATA_PATH, TRAFFIC_DATA_PATH,
};

#[derive(Debug, Clone)]
pub struct Config {
    /// Historical traffic records (CSV).
    pub traffic_data_path: PathBuf,

    /// Sustainability sample history (CSV, appended to).
    pub sustainability_data_path: PathBuf,

    /// Serialized regression forest.
    pub model_path: PathBuf,

    /// Serialized standard scaler.
    pub scaler_path: PathBuf,

    pub category_policy: CategoryPolicy,

    /// Normalized score reported when a metric's bounds have zero width.
    pub flat_range_score: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            traffic_data_path: PathBuf::from(TRAFFIC_DATA_PATH),
            sustainability_data_path: PathBuf::from(SUSTAINABILITY_DATA_PATH),
            model_path: PathBuf::from(MODEL_PATH),
            scaler_path: PathBuf::from(SCALER_PATH),
            category_policy: CategoryPolicy::default(),
            flat_range_score: FLAT_RANGE_SCORE,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            traffic_data_path: env::var("TRAFFIC_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.traffic_data_path),

            sustainability_data_path: env::var("SUSTAINABILITY_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.sustainability_data_path),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            scaler_path: env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.scaler_path),

            category_policy: env::var("CONGESTION_THRESHOLDS")
                .ok()
                .and_then(|p| CategoryPolicy::parse(&p))
                .unwrap_or(defaults.category_policy),

            flat_range_score: env::var("FLAT_RANGE_SCORE")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|s| (0.0..=1.0).contains(s))
                .unwrap_or(defaults.flat_range_score),
        }
    }
}
