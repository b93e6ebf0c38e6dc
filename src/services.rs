//! Composition root: the process-wide analyzer and normalizer.

use std::sync::Arc;

use crate::config::Config;
use crate::congestion::CongestionAnalyzer;
use crate::sustainability::{MetricSource, RandomMetricSource, SustainabilityNormalizer};

/// Constructed once at startup and shared by reference with every caller.
pub struct AnalyticsServices {
    pub config: Config,
    pub congestion: CongestionAnalyzer,
    pub sustainability: SustainabilityNormalizer,
}

impl AnalyticsServices {
    pub fn from_config(config: Config) -> Arc<Self> {
        Self::with_source(config, Box::new(RandomMetricSource))
    }

    pub fn with_source(config: Config, source: Box<dyn MetricSource>) -> Arc<Self> {
        let congestion = CongestionAnalyzer::load(&config);
        if !congestion.is_ready() {
            log::warn!("Congestion predictions disabled until model artifacts are present");
        }
        let sustainability = SustainabilityNormalizer::open(
            &config.sustainability_data_path,
            source,
            config.flat_range_score,
        );
        Arc::new(Self {
            config,
            congestion,
            sustainability,
        })
    }
}
