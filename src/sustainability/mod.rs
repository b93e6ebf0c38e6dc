pub mod history;
pub mod metrics;
pub mod normalizer;
pub mod source;

pub use history::SustainabilityHistory;
pub use metrics::{Metric, MetricTrend, RawMetrics, SustainabilityMetrics, TrendDirection};
pub use normalizer::{normalize_value, SustainabilityNormalizer};
pub use source::{MetricSource, RandomMetricSource};
