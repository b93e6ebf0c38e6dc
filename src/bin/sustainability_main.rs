use smart_city_analytics::config::Config;
use smart_city_analytics::recommendations::recommendations_for;
use smart_city_analytics::services::AnalyticsServices;

fn main() {
    env_logger::init();
    println!("Ingesting sustainability sample...");

    let services = AnalyticsServices::from_config(Config::from_env());
    let metrics = match services.sustainability.calculate_metrics() {
        Ok(metrics) => metrics,
        Err(e) => {
            eprintln!("Sustainability error: {}", e);
            std::process::exit(1);
        }
    };

    let report = serde_json::json!({
        "metrics": metrics,
        "recommendations": recommendations_for(&metrics),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Could not serialize report: {}", e),
    }
}
