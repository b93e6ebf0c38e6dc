//! Aggregations over the historical traffic store.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::Result;
use crate::shared_data::{day_name, road_label, weather_label, TrafficRecord};
use crate::storage::read_csv;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoricalSummary {
    pub record_count: usize,
    pub mean_congestion: f64,
    pub min_congestion: f64,
    pub max_congestion: f64,
}

#[derive(Debug, Clone)]
pub struct TrafficDataset {
    pub records: Vec<TrafficRecord>,
}

impl TrafficDataset {
    pub fn new(records: Vec<TrafficRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let records: Vec<TrafficRecord> = read_csv(path)?;
        log::info!("Loaded {} traffic records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    /// Mean vehicle count per hour of day.
    pub fn hourly_distribution(&self) -> BTreeMap<u8, f64> {
        mean_by(&self.records, |r| r.time_of_day, |r| r.vehicle_count as f64)
    }

    /// Within-slot consistency per `"{day} {hour:02}:00"` slot:
    /// `1 - min(mean |x - slot mean|, 1)`.
    pub fn historical_accuracy(&self) -> BTreeMap<String, f64> {
        let mut slots: HashMap<String, Vec<f64>> = HashMap::new();
        for record in &self.records {
            slots
                .entry(record.slot_label())
                .or_default()
                .push(record.congestion_level);
        }

        let mut accuracy = BTreeMap::new();
        for (label, values) in slots {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let mad = values.iter().map(|v| (v - mean).abs()).sum::<f64>() / values.len() as f64;
            accuracy.insert(label, (1.0 - mad.min(1.0)).clamp(0.0, 1.0));
        }
        accuracy
    }

    pub fn congestion_by_hour(&self) -> BTreeMap<u8, f64> {
        mean_by(&self.records, |r| r.time_of_day, |r| r.congestion_level)
    }

    /// Keyed by day name; iteration order is alphabetical.
    pub fn congestion_by_day(&self) -> BTreeMap<String, f64> {
        relabel(
            mean_by(&self.records, |r| r.day_of_week, |r| r.congestion_level),
            day_name,
        )
    }

    pub fn congestion_by_weather(&self) -> BTreeMap<String, f64> {
        relabel(
            mean_by(&self.records, |r| r.weather_condition, |r| r.congestion_level),
            weather_label,
        )
    }

    pub fn congestion_by_road_type(&self) -> BTreeMap<String, f64> {
        relabel(
            mean_by(&self.records, |r| r.road_type, |r| r.congestion_level),
            road_label,
        )
    }

    pub fn summary(&self) -> HistoricalSummary {
        if self.records.is_empty() {
            return HistoricalSummary::default();
        }
        let levels = self.records.iter().map(|r| r.congestion_level);
        let (sum, min, max) = levels.fold((0.0, f64::MAX, f64::MIN), |(s, lo, hi), v| {
            (s + v, lo.min(v), hi.max(v))
        });
        HistoricalSummary {
            record_count: self.records.len(),
            mean_congestion: sum / self.records.len() as f64,
            min_congestion: min,
            max_congestion: max,
        }
    }
}

fn mean_by<K, FK, FV>(records: &[TrafficRecord], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&TrafficRecord) -> K,
    FV: Fn(&TrafficRecord) -> f64,
{
    let mut acc: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = acc.entry(key(record)).or_insert((0.0, 0));
        entry.0 += value(record);
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, count))| (k, sum / count as f64))
        .collect()
}

fn relabel(means: BTreeMap<u8, f64>, label: fn(u8) -> &'static str) -> BTreeMap<String, f64> {
    means
        .into_iter()
        .map(|(code, v)| (label(code).to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hour: u8, day: u8, vehicles: u32, level: f64) -> TrafficRecord {
        TrafficRecord {
            time_of_day: hour,
            day_of_week: day,
            vehicle_count: vehicles,
            weather_condition: 1,
            road_type: 2,
            congestion_level: level,
        }
    }

    #[test]
    fn hourly_distribution_averages_vehicle_counts() {
        let ds = TrafficDataset::new(vec![
            record(8, 1, 100, 0.5),
            record(8, 2, 300, 0.5),
            record(14, 1, 50, 0.2),
        ]);
        let hourly = ds.hourly_distribution();
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[&8], 200.0);
        assert_eq!(hourly[&14], 50.0);
    }

    #[test]
    fn identical_slot_levels_give_perfect_accuracy() {
        let ds = TrafficDataset::new(vec![
            record(8, 2, 100, 0.6),
            record(8, 2, 250, 0.6),
            record(8, 2, 400, 0.6),
        ]);
        assert_eq!(ds.historical_accuracy()["Tue 08:00"], 1.0);
    }

    #[test]
    fn spread_slot_levels_reduce_accuracy() {
        let ds = TrafficDataset::new(vec![record(17, 5, 100, 0.2), record(17, 5, 100, 0.8)]);
        let acc = ds.historical_accuracy()["Fri 17:00"];
        assert!((acc - 0.7).abs() < 1e-12);
    }

    #[test]
    fn grouped_congestion_uses_labels() {
        let mut rows = vec![record(8, 1, 100, 0.4), record(9, 1, 100, 0.6)];
        rows[1].weather_condition = 3;
        let ds = TrafficDataset::new(rows);
        assert_eq!(ds.congestion_by_day()["Mon"], 0.5);
        assert_eq!(ds.congestion_by_weather()["Snow"], 0.6);
        assert_eq!(ds.congestion_by_road_type()["Main Street"], 0.5);
    }

    #[test]
    fn summary_of_empty_dataset_is_zeroed() {
        assert_eq!(TrafficDataset::new(Vec::new()).summary(), HistoricalSummary::default());
    }
}
