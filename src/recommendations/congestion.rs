use crate::global_variables::{HEAVY_VOLUME_VEHICLES, MAX_CONGESTION_RECOMMENDATIONS};
use crate::shared_data::FeatureVector;

const PEAK_HOUR: [&str; 2] = [
    "Consider staggered work hours to spread peak demand",
    "Extend green phases on arterial signals during rush hour",
];

const SEVERE_WEATHER: [&str; 2] = [
    "Issue reduced-speed advisories for affected corridors",
    "Pre-position road maintenance crews for snow and fog response",
];

const HEAVY_VOLUME: [&str; 2] = [
    "Divert through traffic to parallel routes",
    "Increase public transport frequency on this corridor",
];

const GENERAL: [&str; 3] = [
    "Monitor real-time traffic conditions",
    "Keep variable message signs updated with travel times",
    "Encourage carpooling and public transport use",
];

/// Context-aware suggestions, most specific first, capped at five.
///
/// Order of precedence: peak hour, severe weather, heavy volume, general.
/// The general suggestions are always appended, so the result is never empty.
pub fn congestion_recommendations(_congestion_level: f64, features: &FeatureVector) -> Vec<String> {
    let mut suggestions: Vec<&str> = Vec::new();
    if features.is_peak_hour() {
        suggestions.extend(PEAK_HOUR);
    }
    if features.is_severe_weather() {
        suggestions.extend(SEVERE_WEATHER);
    }
    if features.vehicle_count > HEAVY_VOLUME_VEHICLES {
        suggestions.extend(HEAVY_VOLUME);
    }
    suggestions.extend(GENERAL);

    suggestions
        .into_iter()
        .take(MAX_CONGESTION_RECOMMENDATIONS)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(hour: u8, weather: u8, vehicles: u32) -> FeatureVector {
        FeatureVector {
            time_of_day: hour,
            day_of_week: 3,
            vehicle_count: vehicles,
            weather_condition: weather,
            road_type: 1,
        }
    }

    #[test]
    fn quiet_conditions_get_general_advice_only() {
        let recs = congestion_recommendations(0.1, &features(3, 1, 50));
        assert_eq!(recs, GENERAL.map(String::from).to_vec());
    }

    #[test]
    fn every_trigger_truncates_to_five_in_priority_order() {
        let recs = congestion_recommendations(0.9, &features(17, 4, 500));
        assert_eq!(recs.len(), 5);
        assert_eq!(&recs[0..2], &PEAK_HOUR.map(String::from));
        assert_eq!(&recs[2..4], &SEVERE_WEATHER.map(String::from));
        assert_eq!(recs[4], HEAVY_VOLUME[0]);
    }

    #[test]
    fn rain_is_not_severe_weather() {
        let recs = congestion_recommendations(0.5, &features(12, 2, 201));
        assert_eq!(&recs[0..2], &HEAVY_VOLUME.map(String::from));
        assert_eq!(recs.len(), 5);
    }

    #[test]
    fn volume_threshold_is_strict() {
        let recs = congestion_recommendations(0.5, &features(12, 1, 200));
        assert_eq!(recs.len(), 3);
    }

    #[test]
    fn length_is_bounded_for_all_combinations() {
        for hour in 0..24 {
            for weather in 1..=4 {
                for vehicles in [0, 200, 201, 1000] {
                    let recs = congestion_recommendations(0.5, &features(hour, weather, vehicles));
                    assert!(!recs.is_empty() && recs.len() <= 5);
                }
            }
        }
    }
}
