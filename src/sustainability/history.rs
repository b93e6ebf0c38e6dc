use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{AnalyticsError, Result};
use crate::storage::{append_csv, read_csv_lenient, write_csv};
use crate::sustainability::metrics::{
    Metric, MetricTrend, SustainabilitySample, TrendDirection,
};

/// Growing sustainability time series, mirrored to a CSV file when a path
/// is configured.
#[derive(Debug, Clone, Default)]
pub struct SustainabilityHistory {
    path: Option<PathBuf>,
    pub samples: Vec<SustainabilitySample>,
}

impl SustainabilityHistory {
    pub fn in_memory(samples: Vec<SustainabilitySample>) -> Self {
        Self {
            path: None,
            samples,
        }
    }

    /// Load the history at `path`. A missing file starts an empty history.
    /// Unreadable or non-finite rows are dropped, and the file is rewritten
    /// from the surviving samples so later appends land on a clean store.
    pub fn open(path: &Path) -> Self {
        let (mut samples, mut dropped) = match read_csv_lenient::<SustainabilitySample>(path) {
            Ok(loaded) => loaded,
            Err(AnalyticsError::DataUnavailable(_)) => (Vec::new(), 0),
            Err(e) => {
                log::warn!(
                    "Could not load sustainability history from {}: {}",
                    path.display(),
                    e
                );
                (Vec::new(), 0)
            }
        };
        let before = samples.len();
        samples.retain(|s| s.raw().first_non_finite().is_none());
        dropped += before - samples.len();

        if dropped > 0 {
            log::warn!(
                "Dropped {} bad rows from {}, rewriting it",
                dropped,
                path.display()
            );
            if let Err(e) = write_csv(path, &samples) {
                log::warn!("Could not rewrite {}: {}", path.display(), e);
            }
        }
        log::info!("Sustainability history holds {} samples", samples.len());
        Self {
            path: Some(path.to_path_buf()),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&SustainabilitySample> {
        self.samples.last()
    }

    /// Append in memory, then persist. Callers hold the history's lock, so
    /// writes to the file are serialized.
    pub fn append(&mut self, sample: SustainabilitySample) -> Result<()> {
        self.samples.push(sample);
        match (&self.path, self.samples.last()) {
            (Some(path), Some(stored)) => append_csv(path, stored),
            _ => Ok(()),
        }
    }

    /// Observed `(min, max)` of a metric, `None` for an empty history.
    pub fn bounds(&self, metric: Metric) -> Option<(f64, f64)> {
        let mut values = self.samples.iter().map(|s| s.raw().get(metric));
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Least-squares slope of each metric over the last `window` samples.
    /// Empty until at least two samples exist.
    pub fn trends(&self, window: usize) -> BTreeMap<String, MetricTrend> {
        let mut trends = BTreeMap::new();
        if self.samples.len() < 2 {
            return trends;
        }
        let start = self.samples.len().saturating_sub(window.max(2));
        let recent = &self.samples[start..];
        for metric in Metric::ALL {
            let series: Vec<f64> = recent.iter().map(|s| s.raw().get(metric)).collect();
            let slope = linear_slope(&series);
            trends.insert(
                metric.key().to_string(),
                MetricTrend {
                    direction: if slope > 0.0 {
                        TrendDirection::Improving
                    } else {
                        TrendDirection::Declining
                    },
                    rate: slope.abs(),
                },
            );
        }
        trends
    }
}

/// Ordinary least squares slope of `values` against their index.
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }
    num / den
}
