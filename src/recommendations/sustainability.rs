use serde::{Deserialize, Serialize};

use crate::sustainability::metrics::{Metric, SustainabilityMetrics};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub score: f64,
    pub suggestions: Vec<String>,
}

fn category(metric: Metric) -> &'static str {
    match metric {
        Metric::Emissions => "Emissions",
        Metric::Energy => "Energy",
        Metric::GreenInfra => "Green Infrastructure",
        Metric::PublicTransport => "Public Transport",
        Metric::WalkingCycling => "Active Transport",
    }
}

fn suggestions(metric: Metric) -> [&'static str; 3] {
    match metric {
        Metric::Emissions => [
            "Implement low emission zones",
            "Promote electric vehicle adoption",
            "Optimize traffic signal timing to reduce idling",
        ],
        Metric::Energy => [
            "Upgrade to LED street lighting",
            "Install smart energy management systems",
            "Implement energy-efficient traffic signals",
        ],
        Metric::GreenInfra => [
            "Increase urban green spaces",
            "Implement green corridors",
            "Develop urban forests and parks",
        ],
        Metric::PublicTransport => [
            "Expand bus and rail networks",
            "Improve service frequency",
            "Implement integrated ticketing systems",
        ],
        Metric::WalkingCycling => [
            "Expand dedicated cycling lanes",
            "Improve pedestrian infrastructure",
            "Create car-free zones in city centers",
        ],
    }
}

/// One entry per metric scoring below its threshold, in metric order.
pub fn recommendations_for(metrics: &SustainabilityMetrics) -> Vec<Recommendation> {
    Metric::ALL
        .iter()
        .filter(|m| metrics.score(**m) < m.threshold())
        .map(|&m| Recommendation {
            category: category(m).to_string(),
            score: metrics.score(m),
            suggestions: suggestions(m).iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}
