// src/shared_data.rs

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::global_variables::{DAY_NAMES, PEAK_HOURS, ROAD_LABELS, WEATHER_LABELS};

/// The five predictive inputs of a congestion prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Hour of the day, 0-23.
    pub time_of_day: u8,
    /// 1 = Monday .. 7 = Sunday.
    pub day_of_week: u8,
    pub vehicle_count: u32,
    /// 1 Clear, 2 Rain, 3 Snow, 4 Fog.
    pub weather_condition: u8,
    /// 1 Highway, 2 Main Street, 3 Residential, 4 Downtown.
    pub road_type: u8,
}

impl FeatureVector {
    pub fn validate(&self) -> Result<()> {
        let checks: [(&'static str, i64, bool); 4] = [
            ("time_of_day", self.time_of_day as i64, self.time_of_day <= 23),
            (
                "day_of_week",
                self.day_of_week as i64,
                (1..=7).contains(&self.day_of_week),
            ),
            (
                "weather_condition",
                self.weather_condition as i64,
                (1..=4).contains(&self.weather_condition),
            ),
            (
                "road_type",
                self.road_type as i64,
                (1..=4).contains(&self.road_type),
            ),
        ];
        for (name, value, ok) in checks {
            if !ok {
                return Err(AnalyticsError::InvalidFeature { name, value });
            }
        }
        Ok(())
    }

    /// Feature values in `FEATURE_NAMES` order.
    pub fn as_row(&self) -> [f64; 5] {
        [
            self.time_of_day as f64,
            self.day_of_week as f64,
            self.vehicle_count as f64,
            self.weather_condition as f64,
            self.road_type as f64,
        ]
    }

    pub fn is_peak_hour(&self) -> bool {
        PEAK_HOURS.contains(&self.time_of_day)
    }

    /// Snow or fog.
    pub fn is_severe_weather(&self) -> bool {
        self.weather_condition > 2
    }
}

/// One row of the historical traffic store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub time_of_day: u8,
    pub day_of_week: u8,
    pub vehicle_count: u32,
    pub weather_condition: u8,
    pub road_type: u8,
    pub congestion_level: f64,
}

impl TrafficRecord {
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            time_of_day: self.time_of_day,
            day_of_week: self.day_of_week,
            vehicle_count: self.vehicle_count,
            weather_condition: self.weather_condition,
            road_type: self.road_type,
        }
    }

    /// Bucket label such as `"Tue 08:00"`.
    pub fn slot_label(&self) -> String {
        format!("{} {:02}:00", day_name(self.day_of_week), self.time_of_day)
    }
}

pub fn day_name(day_of_week: u8) -> &'static str {
    label_for(&DAY_NAMES, day_of_week).unwrap_or("Unknown")
}

pub fn weather_label(code: u8) -> &'static str {
    label_for(&WEATHER_LABELS, code).unwrap_or("Unknown")
}

pub fn road_label(code: u8) -> &'static str {
    label_for(&ROAD_LABELS, code).unwrap_or("Unknown")
}

// Codes are 1-based.
fn label_for<'a>(labels: &[&'a str], code: u8) -> Option<&'a str> {
    (code as usize)
        .checked_sub(1)
        .and_then(|i| labels.get(i))
        .copied()
}
