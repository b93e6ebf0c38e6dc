use rand::Rng;

use crate::error::Result;
use crate::sustainability::metrics::{Metric, RawMetrics};

/// Supplier of fresh raw sustainability readings (sensors, city APIs).
pub trait MetricSource: Send + Sync {
    fn current_metrics(&self) -> Result<RawMetrics>;
}

/// Uniform random readings until a real sensor feed is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMetricSource;

impl RandomMetricSource {
    pub fn range(metric: Metric) -> (f64, f64) {
        match metric {
            Metric::Emissions => (20.0, 80.0),
            Metric::Energy => (40.0, 90.0),
            Metric::GreenInfra => (30.0, 70.0),
            Metric::PublicTransport => (20.0, 60.0),
            Metric::WalkingCycling => (30.0, 80.0),
        }
    }
}

impl MetricSource for RandomMetricSource {
    fn current_metrics(&self) -> Result<RawMetrics> {
        let mut rng = rand::rng();
        let mut raw = RawMetrics::default();
        for metric in Metric::ALL {
            let (lo, hi) = Self::range(metric);
            raw.set(metric, rng.random_range(lo..hi));
        }
        Ok(raw)
    }
}
