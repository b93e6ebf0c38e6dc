use chrono::Local;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{AnalyticsError, Result};
use crate::global_variables::TREND_WINDOW;
use crate::recommendations::{recommendations_for, Recommendation};
use crate::sustainability::history::SustainabilityHistory;
use crate::sustainability::metrics::{
    Metric, RawMetrics, SustainabilityMetrics, SustainabilitySample,
};
use crate::sustainability::source::MetricSource;

/// Scale `value` into [0, 1] against the reference range widened by the
/// observed historical bounds. A zero-width or unbounded range yields
/// `flat_score`.
pub fn normalize_value(
    value: f64,
    observed: Option<(f64, f64)>,
    reference: (f64, f64),
    flat_score: f64,
) -> f64 {
    let (low, high) = match observed {
        Some((min, max)) => (min.min(reference.0), max.max(reference.1)),
        None => reference,
    };
    let width = high - low;
    if !width.is_finite() || width <= 0.0 || value.is_nan() {
        return flat_score;
    }
    ((value - low) / width).clamp(0.0, 1.0)
}

/// Owns the sustainability history. Every ingest appends under the history
/// lock, so concurrent callers never lose each other's samples.
pub struct SustainabilityNormalizer {
    history: Mutex<SustainabilityHistory>,
    source: Box<dyn MetricSource>,
    flat_range_score: f64,
    trend_window: usize,
}

impl SustainabilityNormalizer {
    pub fn new(
        history: SustainabilityHistory,
        source: Box<dyn MetricSource>,
        flat_range_score: f64,
    ) -> Self {
        Self {
            history: Mutex::new(history),
            source,
            flat_range_score,
            trend_window: TREND_WINDOW,
        }
    }

    pub fn open(path: &Path, source: Box<dyn MetricSource>, flat_range_score: f64) -> Self {
        Self::new(SustainabilityHistory::open(path), source, flat_range_score)
    }

    fn history(&self) -> Result<MutexGuard<'_, SustainabilityHistory>> {
        self.history.lock().map_err(|_| {
            AnalyticsError::Computation("sustainability history lock poisoned".to_string())
        })
    }

    pub fn history_len(&self) -> Result<usize> {
        Ok(self.history()?.len())
    }

    /// Pull a reading from the metric source and ingest it.
    pub fn calculate_metrics(&self) -> Result<SustainabilityMetrics> {
        let raw = self.source.current_metrics().map_err(|e| {
            AnalyticsError::Computation(format!("error getting current metrics: {}", e))
        })?;
        self.ingest_sample(raw)
    }

    /// Store `raw` with the current timestamp, then score it against the
    /// history that now includes it. Non-finite readings are rejected and
    /// never reach the history.
    pub fn ingest_sample(&self, raw: RawMetrics) -> Result<SustainabilityMetrics> {
        if let Some(metric) = raw.first_non_finite() {
            return Err(AnalyticsError::Computation(format!(
                "non-finite {} reading: {}",
                metric.key(),
                raw.get(metric)
            )));
        }
        let mut history = self.history()?;
        if let Err(e) = history.append(SustainabilitySample::new(Local::now(), raw)) {
            log::warn!("Could not persist sustainability sample: {}", e);
        }
        Ok(self.score(&history, &raw))
    }

    /// Score `raw` against the current history without storing it.
    pub fn score_sample(&self, raw: &RawMetrics) -> Result<SustainabilityMetrics> {
        let history = self.history()?;
        Ok(self.score(&history, raw))
    }

    /// Scores of the most recently stored sample, if any.
    pub fn current_scores(&self) -> Result<Option<SustainabilityMetrics>> {
        let history = self.history()?;
        Ok(history
            .latest()
            .map(|s| s.raw())
            .map(|raw| self.score(&history, &raw)))
    }

    /// Ingests a fresh reading, then recommends on it. Each call grows the
    /// history; use `current_scores` with `recommendations_for` to query
    /// without side effects.
    pub fn get_recommendations(&self) -> Result<Vec<Recommendation>> {
        let metrics = self.calculate_metrics()?;
        Ok(recommendations_for(&metrics))
    }

    fn score(&self, history: &SustainabilityHistory, raw: &RawMetrics) -> SustainabilityMetrics {
        let mut scores = RawMetrics::default();
        for metric in Metric::ALL {
            scores.set(
                metric,
                normalize_value(
                    raw.get(metric),
                    history.bounds(metric),
                    metric.reference_range(),
                    self.flat_range_score,
                ),
            );
        }
        SustainabilityMetrics::from_scores(scores, history.trends(self.trend_window))
    }
}
