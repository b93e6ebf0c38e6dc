use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The five tracked sustainability metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Emissions,
    Energy,
    GreenInfra,
    PublicTransport,
    WalkingCycling,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Emissions,
        Metric::Energy,
        Metric::GreenInfra,
        Metric::PublicTransport,
        Metric::WalkingCycling,
    ];

    /// Column name in the history store.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Emissions => "emissions",
            Metric::Energy => "energy",
            Metric::GreenInfra => "green_infra",
            Metric::PublicTransport => "public_transport",
            Metric::WalkingCycling => "walking_cycling",
        }
    }

    /// Reference range that historical bounds may only widen.
    pub fn reference_range(&self) -> (f64, f64) {
        (0.0, 100.0)
    }

    /// Normalized scores below this trigger recommendations.
    pub fn threshold(&self) -> f64 {
        match self {
            Metric::Emissions => 0.6,
            Metric::Energy => 0.7,
            Metric::GreenInfra => 0.65,
            Metric::PublicTransport => 0.5,
            Metric::WalkingCycling => 0.6,
        }
    }
}

/// One raw reading of every metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMetrics {
    pub emissions: f64,
    pub energy: f64,
    pub green_infra: f64,
    pub public_transport: f64,
    pub walking_cycling: f64,
}

impl RawMetrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Emissions => self.emissions,
            Metric::Energy => self.energy,
            Metric::GreenInfra => self.green_infra,
            Metric::PublicTransport => self.public_transport,
            Metric::WalkingCycling => self.walking_cycling,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Emissions => self.emissions = value,
            Metric::Energy => self.energy = value,
            Metric::GreenInfra => self.green_infra = value,
            Metric::PublicTransport => self.public_transport = value,
            Metric::WalkingCycling => self.walking_cycling = value,
        }
    }

    /// First metric holding a NaN or infinite reading.
    pub fn first_non_finite(&self) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| !self.get(*m).is_finite())
    }
}

/// A stored row of the sustainability history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilitySample {
    pub timestamp: DateTime<Local>,
    pub emissions: f64,
    pub energy: f64,
    pub green_infra: f64,
    pub public_transport: f64,
    pub walking_cycling: f64,
}

impl SustainabilitySample {
    pub fn new(timestamp: DateTime<Local>, raw: RawMetrics) -> Self {
        Self {
            timestamp,
            emissions: raw.emissions,
            energy: raw.energy,
            green_infra: raw.green_infra,
            public_transport: raw.public_transport,
            walking_cycling: raw.walking_cycling,
        }
    }

    pub fn raw(&self) -> RawMetrics {
        RawMetrics {
            emissions: self.emissions,
            energy: self.energy,
            green_infra: self.green_infra,
            public_transport: self.public_transport,
            walking_cycling: self.walking_cycling,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricTrend {
    pub direction: TrendDirection,
    /// Absolute slope per sample.
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SustainabilityMetrics {
    pub emissions_score: f64,
    pub energy_efficiency: f64,
    pub green_infrastructure: f64,
    pub public_transport_usage: f64,
    pub walking_cycling_score: f64,
    /// Keyed by metric column name; empty until two samples exist.
    pub trend_analysis: BTreeMap<String, MetricTrend>,
}

impl SustainabilityMetrics {
    pub fn from_scores(scores: RawMetrics, trend_analysis: BTreeMap<String, MetricTrend>) -> Self {
        Self {
            emissions_score: scores.emissions,
            energy_efficiency: scores.energy,
            green_infrastructure: scores.green_infra,
            public_transport_usage: scores.public_transport,
            walking_cycling_score: scores.walking_cycling,
            trend_analysis,
        }
    }

    pub fn score(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Emissions => self.emissions_score,
            Metric::Energy => self.energy_efficiency,
            Metric::GreenInfra => self.green_infrastructure,
            Metric::PublicTransport => self.public_transport_usage,
            Metric::WalkingCycling => self.walking_cycling_score,
        }
    }
}
