//! Presentation analytics that accompany a prediction. These are not model
//! outputs; any provider that yields the right shapes can be plugged in.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared_data::FeatureVector;

pub const ZONES: [&str; 4] = ["residential", "commercial", "industrial", "downtown"];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskFactors {
    pub weather_impact: f64,
    pub event_impact: f64,
    pub construction_impact: f64,
    pub accident_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisDetails {
    /// One entry per hour, 0-23.
    pub hourly_pattern: Vec<f64>,
    /// Last seven days, oldest first.
    pub historical_trend: Vec<f64>,
    pub zone_impacts: BTreeMap<String, f64>,
    pub risk_factors: RiskFactors,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictiveMetrics {
    pub model_confidence: f64,
    pub prediction_stability: f64,
    pub data_coverage: f64,
}

pub trait AnalyticsProvider: Send + Sync {
    fn analysis_details(&self, features: &FeatureVector) -> AnalysisDetails;

    fn predictive_metrics(&self) -> PredictiveMetrics;
}

/// Dashboard placeholder values: elevated rush-hour pattern, random elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAnalytics;

impl RandomAnalytics {
    pub fn hourly_pattern<R: Rng>(rng: &mut R) -> Vec<f64> {
        (0..24u8)
            .map(|hour| match hour {
                7..=9 => 0.8,
                16..=18 => 0.85,
                _ => rng.random_range(0.2..0.5),
            })
            .collect()
    }
}

impl AnalyticsProvider for RandomAnalytics {
    fn analysis_details(&self, _features: &FeatureVector) -> AnalysisDetails {
        let mut rng = rand::rng();
        AnalysisDetails {
            hourly_pattern: Self::hourly_pattern(&mut rng),
            historical_trend: (0..7).map(|_| rng.random_range(0.3..0.8)).collect(),
            zone_impacts: ZONES
                .iter()
                .map(|z| (z.to_string(), rng.random_range(0.2..0.9)))
                .collect(),
            risk_factors: RiskFactors {
                weather_impact: rng.random_range(0.0..0.6),
                event_impact: rng.random_range(0.0..0.6),
                construction_impact: rng.random_range(0.0..0.6),
                accident_probability: rng.random_range(0.0..0.6),
            },
        }
    }

    fn predictive_metrics(&self) -> PredictiveMetrics {
        let mut rng = rand::rng();
        PredictiveMetrics {
            model_confidence: rng.random_range(0.75..0.95),
            prediction_stability: rng.random_range(0.75..0.95),
            data_coverage: rng.random_range(0.75..0.95),
        }
    }
}
