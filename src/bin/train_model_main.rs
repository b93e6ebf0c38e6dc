use smart_city_analytics::config::Config;
use smart_city_analytics::congestion::dataset::TrafficDataset;
use smart_city_analytics::congestion::training::{train_and_persist, ForestParams};

fn main() {
    env_logger::init();
    let config = Config::from_env();

    let dataset = match TrafficDataset::load(&config.traffic_data_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Cannot train: {}", e);
            std::process::exit(1);
        }
    };

    match train_and_persist(
        &dataset.records,
        ForestParams::default(),
        &config.model_path,
        &config.scaler_path,
    ) {
        Ok(report) => {
            println!("Train R2 score: {:.4}", report.train_score);
            println!("Test R2 score: {:.4}", report.test_score);
            println!("Feature importance:");
            let mut ranked: Vec<_> = report.feature_importance.iter().collect();
            ranked.sort_by(|a, b| b.1.total_cmp(a.1));
            for (feature, importance) in ranked {
                println!("  {}: {:.4}", feature, importance);
            }
        }
        Err(e) => {
            eprintln!("Training failed: {}", e);
            std::process::exit(1);
        }
    }
}
