// analytics_main.rs
use smart_city_analytics::config::Config;
use smart_city_analytics::services::AnalyticsServices;
use smart_city_analytics::shared_data::FeatureVector;

#[tokio::main]
async fn main() {
    env_logger::init();

    let services = AnalyticsServices::from_config(Config::from_env());

    // Concurrent ingests share the normalizer; its history lock serializes the appends.
    let mut ingests = Vec::new();
    for _ in 0..3 {
        let services = services.clone();
        ingests.push(tokio::task::spawn_blocking(move || {
            services.sustainability.calculate_metrics()
        }));
    }
    for handle in ingests {
        match handle.await {
            Ok(Ok(metrics)) => print_json("sustainability_metrics", &metrics),
            Ok(Err(e)) => eprintln!("Sustainability error: {}", e),
            Err(e) => eprintln!("Sustainability task failed: {}", e),
        }
    }

    let features = FeatureVector {
        time_of_day: 8,
        day_of_week: 2,
        vehicle_count: 400,
        weather_condition: 1,
        road_type: 2,
    };
    let congestion = services.clone();
    let prediction =
        tokio::task::spawn_blocking(move || congestion.congestion.predict_congestion(&features))
            .await;
    match prediction {
        Ok(Ok(result)) => print_json("congestion", &result),
        Ok(Err(e)) => eprintln!("Service not ready: {}", e),
        Err(e) => eprintln!("Prediction task failed: {}", e),
    }

    match services.congestion.hourly_distribution() {
        Ok(hourly) => print_json("hourly_distribution", &hourly),
        Err(e) => eprintln!("Service not ready: {}", e),
    }
}

fn print_json<T: serde::Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}: {}", label, json),
        Err(e) => eprintln!("Could not serialize {}: {}", label, e),
    }
}
