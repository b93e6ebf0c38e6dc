#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

use smart_city_analytics::config::Config;
use smart_city_analytics::shared_data::TrafficRecord;
use smart_city_analytics::storage::write_csv;

/// Synthetic traffic history: peak hours, weekdays, volume, weather and road
/// type each add a fixed contribution, plus N(0, 0.05) noise, clipped to [0, 1].
pub fn synthetic_traffic(samples: usize, seed: u64) -> Vec<TrafficRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..samples)
        .map(|_| {
            let time_of_day: u8 = rng.random_range(0..24);
            let day_of_week: u8 = rng.random_range(1..8);
            let vehicle_count = (300.0 + 100.0 * normal(&mut rng)).clamp(0.0, 1000.0) as u32;
            let weather_condition: u8 = rng.random_range(1..5);
            let road_type: u8 = rng.random_range(1..5);

            let mut level = 0.0;
            if (7..=9).contains(&time_of_day) || (16..=18).contains(&time_of_day) {
                level += 0.3;
            }
            if day_of_week <= 5 {
                level += 0.2;
            }
            level += 0.3 * vehicle_count as f64 / 1000.0;
            level += [0.0, 0.15, 0.3, 0.2][weather_condition as usize - 1];
            level += [0.1, 0.2, 0.15, 0.25][road_type as usize - 1];
            let level: f64 = level.clamp(0.0, 1.0);
            let congestion_level = (level + 0.05 * normal(&mut rng)).clamp(0.0, 1.0);

            TrafficRecord {
                time_of_day,
                day_of_week,
                vehicle_count,
                weather_condition,
                road_type,
                congestion_level,
            }
        })
        .collect()
}

// Box-Muller standard normal draw.
fn normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.random_range(f64::EPSILON..1.0);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Config whose every path lives under `dir`.
pub fn config_in(dir: &Path) -> Config {
    Config {
        traffic_data_path: dir.join("traffic_data.csv"),
        sustainability_data_path: dir.join("sustainability_data.csv"),
        model_path: dir.join("model.json"),
        scaler_path: dir.join("scaler.json"),
        ..Config::default()
    }
}

pub fn write_traffic(dir: &Path, records: &[TrafficRecord]) -> Config {
    let config = config_in(dir);
    write_csv(&config.traffic_data_path, records).unwrap();
    config
}
