// analyzer.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::congestion::analytics::{
    AnalysisDetails, AnalyticsProvider, PredictiveMetrics, RandomAnalytics,
};
use crate::congestion::category::{CategoryPolicy, CongestionCategory};
use crate::congestion::dataset::{HistoricalSummary, TrafficDataset};
use crate::congestion::model::{CongestionModel, RegressionForest};
use crate::congestion::scaler::StandardScaler;
use crate::error::{AnalyticsError, Result};
use crate::global_variables::FEATURE_NAMES;
use crate::recommendations::congestion_recommendations;
use crate::shared_data::FeatureVector;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CongestionResult {
    pub congestion_level: f64,
    pub feature_importance: BTreeMap<String, f64>,
    /// `None` only on the error response.
    pub congestion_category: Option<CongestionCategory>,
    pub analysis_details: AnalysisDetails,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CongestionResult {
    /// Zero-valued, empty response carrying the failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            congestion_level: 0.0,
            feature_importance: BTreeMap::new(),
            congestion_category: None,
            analysis_details: AnalysisDetails::default(),
            recommendations: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePatterns {
    /// Mean congestion per hour of day.
    pub hourly: BTreeMap<u8, f64>,
    /// Mean congestion per weekday name.
    pub daily: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalImpact {
    pub weather: BTreeMap<String, f64>,
    pub road_type: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficTrends {
    pub time_patterns: TimePatterns,
    pub environmental_impact: EnvironmentalImpact,
    pub historical_trends: HistoricalSummary,
    pub predictive_metrics: PredictiveMetrics,
}

/// Owns the fitted scaler and model plus the location of the historical
/// traffic store. The model and scaler never change after construction.
pub struct CongestionAnalyzer {
    model: Option<Box<dyn CongestionModel>>,
    scaler: Option<StandardScaler>,
    data_path: PathBuf,
    policy: CategoryPolicy,
    analytics: Box<dyn AnalyticsProvider>,
}

impl CongestionAnalyzer {
    /// Load artifacts from the configured paths. Missing or unreadable
    /// artifacts leave the analyzer unready instead of failing.
    pub fn load(config: &Config) -> Self {
        let model = match RegressionForest::load(&config.model_path) {
            Ok(forest) => {
                log::info!("Loaded congestion model from {}", config.model_path.display());
                Some(Box::new(forest) as Box<dyn CongestionModel>)
            }
            Err(e) => {
                log::warn!(
                    "Congestion model unavailable at {}: {}",
                    config.model_path.display(),
                    e
                );
                None
            }
        };
        let scaler = match StandardScaler::load(&config.scaler_path) {
            Ok(scaler) => {
                log::info!("Loaded scaler from {}", config.scaler_path.display());
                Some(scaler)
            }
            Err(e) => {
                log::warn!("Scaler unavailable at {}: {}", config.scaler_path.display(), e);
                None
            }
        };

        Self {
            model,
            scaler,
            data_path: config.traffic_data_path.clone(),
            policy: config.category_policy,
            analytics: Box::new(RandomAnalytics),
        }
    }

    pub fn new(
        model: Box<dyn CongestionModel>,
        scaler: StandardScaler,
        data_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model: Some(model),
            scaler: Some(scaler),
            data_path: data_path.into(),
            policy: CategoryPolicy::default(),
            analytics: Box::new(RandomAnalytics),
        }
    }

    /// An analyzer with no model; predictions report `ModelUnavailable`.
    pub fn unready(data_path: impl Into<PathBuf>) -> Self {
        Self {
            model: None,
            scaler: None,
            data_path: data_path.into(),
            policy: CategoryPolicy::default(),
            analytics: Box::new(RandomAnalytics),
        }
    }

    pub fn with_policy(mut self, policy: CategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_analytics(mut self, analytics: Box<dyn AnalyticsProvider>) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some() && self.scaler.is_some()
    }

    /// Predict congestion for one feature vector.
    ///
    /// Fails only with `ModelUnavailable`; every other failure is logged and
    /// returned as a zero-valued response with `error` set.
    pub fn predict_congestion(&self, features: &FeatureVector) -> Result<CongestionResult> {
        let (Some(model), Some(scaler)) = (self.model.as_deref(), self.scaler.as_ref()) else {
            return Err(AnalyticsError::ModelUnavailable);
        };

        match self.infer(model, scaler, features) {
            Ok(result) => Ok(result),
            Err(e) => {
                log::error!("Congestion prediction failed for {:?}: {}", features, e);
                Ok(CongestionResult::failed(e.to_string()))
            }
        }
    }

    fn infer(
        &self,
        model: &dyn CongestionModel,
        scaler: &StandardScaler,
        features: &FeatureVector,
    ) -> Result<CongestionResult> {
        features.validate()?;

        let scaled = scaler.transform(&features.as_row());
        let level = model.predict(&scaled);
        if !level.is_finite() {
            return Err(AnalyticsError::Computation(format!(
                "model produced non-finite score {}",
                level
            )));
        }
        let level = level.clamp(0.0, 1.0);

        let feature_importance = FEATURE_NAMES
            .iter()
            .map(|name| name.to_string())
            .zip(model.feature_importances())
            .collect();

        log::info!(
            "[Prediction] hour {} day {} vehicles {}: congestion {:.3}",
            features.time_of_day,
            features.day_of_week,
            features.vehicle_count,
            level
        );

        Ok(CongestionResult {
            congestion_level: level,
            feature_importance,
            congestion_category: Some(self.policy.categorize(level)),
            analysis_details: self.analytics.analysis_details(features),
            recommendations: congestion_recommendations(level, features),
            error: None,
        })
    }

    fn dataset(&self) -> Result<TrafficDataset> {
        TrafficDataset::load(&self.data_path)
    }

    /// Mean vehicle count per hour from the historical store.
    pub fn hourly_distribution(&self) -> Result<BTreeMap<u8, f64>> {
        Ok(self.dataset()?.hourly_distribution())
    }

    /// Within-slot consistency per `"{day} {hour:02}:00"` slot.
    pub fn historical_accuracy(&self) -> Result<BTreeMap<String, f64>> {
        Ok(self.dataset()?.historical_accuracy())
    }

    pub fn trend_analysis(&self) -> Result<TrafficTrends> {
        let dataset = self.dataset()?;
        Ok(TrafficTrends {
            time_patterns: TimePatterns {
                hourly: dataset.congestion_by_hour(),
                daily: dataset.congestion_by_day(),
            },
            environmental_impact: EnvironmentalImpact {
                weather: dataset.congestion_by_weather(),
                road_type: dataset.congestion_by_road_type(),
            },
            historical_trends: dataset.summary(),
            predictive_metrics: self.analytics.predictive_metrics(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::congestion::model::{RegressionTree, TreeNode};

    // Splits on the scaled vehicle count: light traffic low, heavy traffic high.
    fn rush_hour_model() -> RegressionForest {
        RegressionForest {
            trees: vec![RegressionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 2,
                        threshold: 0.0,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { value: 0.25 },
                    TreeNode::Leaf { value: 0.75 },
                ],
            }],
            feature_importances: [0.1, 0.1, 0.6, 0.1, 0.1],
        }
    }

    fn scaler() -> StandardScaler {
        StandardScaler::fit(&[
            [0.0, 1.0, 0.0, 1.0, 1.0],
            [23.0, 7.0, 400.0, 4.0, 4.0],
        ])
        .unwrap()
    }

    fn features(vehicles: u32) -> FeatureVector {
        FeatureVector {
            time_of_day: 8,
            day_of_week: 2,
            vehicle_count: vehicles,
            weather_condition: 1,
            road_type: 2,
        }
    }

    fn analyzer() -> CongestionAnalyzer {
        CongestionAnalyzer::new(Box::new(rush_hour_model()), scaler(), "missing.csv")
    }

    #[test]
    fn prediction_uses_scaled_features() {
        let a = analyzer();
        let low = a.predict_congestion(&features(100)).unwrap();
        let high = a.predict_congestion(&features(350)).unwrap();
        assert_eq!(low.congestion_level, 0.25);
        assert_eq!(low.congestion_category, Some(CongestionCategory::Low));
        assert_eq!(high.congestion_level, 0.75);
        assert_eq!(high.congestion_category, Some(CongestionCategory::Severe));
        assert!(high.error.is_none());
    }

    #[test]
    fn feature_importance_is_keyed_by_feature_name() {
        let result = analyzer().predict_congestion(&features(100)).unwrap();
        let keys: Vec<_> = result.feature_importance.keys().cloned().collect();
        let mut expected: Vec<_> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(keys, expected);
        assert_eq!(result.feature_importance["vehicle_count"], 0.6);
        let total: f64 = result.feature_importance.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_model_is_a_hard_failure() {
        let a = CongestionAnalyzer::unready("missing.csv");
        assert!(!a.is_ready());
        assert!(matches!(
            a.predict_congestion(&features(100)),
            Err(AnalyticsError::ModelUnavailable)
        ));
    }

    #[test]
    fn invalid_features_become_an_error_response() {
        let mut f = features(100);
        f.weather_condition = 9;
        let result = analyzer().predict_congestion(&f).unwrap();
        assert!(result.is_error());
        assert_eq!(result.congestion_level, 0.0);
        assert!(result.feature_importance.is_empty());
        assert!(result.recommendations.is_empty());
        assert!(result.analysis_details.hourly_pattern.is_empty());
        assert_eq!(result.congestion_category, None);
    }

    #[test]
    fn error_field_is_omitted_from_successful_json() {
        let result = analyzer().predict_congestion(&features(100)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["congestion_category"], "Low");

        let failed = serde_json::to_value(CongestionResult::failed("boom")).unwrap();
        assert_eq!(failed["error"], "boom");
    }

    #[test]
    fn malformed_model_becomes_an_error_response() {
        let mut forest = rush_hour_model();
        forest.trees[0].nodes[0] = TreeNode::Split {
            feature: 7,
            threshold: 0.0,
            left: 1,
            right: 2,
        };
        let a = CongestionAnalyzer::new(Box::new(forest), scaler(), "missing.csv");
        let result = a.predict_congestion(&features(100)).unwrap();
        assert!(result.is_error());
        assert_eq!(result.congestion_level, 0.0);
        assert_eq!(result.congestion_category, None);
    }

    #[test]
    fn three_level_policy_caps_at_high() {
        let a = analyzer().with_policy(CategoryPolicy::ThreeLevel);
        let result = a.predict_congestion(&features(350)).unwrap();
        assert_eq!(result.congestion_category, Some(CongestionCategory::High));
    }

    #[test]
    fn dataset_queries_need_the_store() {
        let a = analyzer();
        assert!(matches!(
            a.hourly_distribution(),
            Err(AnalyticsError::DataUnavailable(_))
        ));
        assert!(matches!(
            a.historical_accuracy(),
            Err(AnalyticsError::DataUnavailable(_))
        ));
        assert!(a.trend_analysis().is_err());
    }
}
