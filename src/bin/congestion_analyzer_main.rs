use smart_city_analytics::config::Config;
use smart_city_analytics::congestion::CongestionAnalyzer;
use smart_city_analytics::shared_data::FeatureVector;
use std::process::exit;

const USAGE: &str = "\
usage: congestion_analyzer_main predict <hour> <day> <vehicles> <weather> <road>
       congestion_analyzer_main hourly|accuracy|trends";

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let analyzer = CongestionAnalyzer::load(&Config::from_env());

    let output = match args.first().map(String::as_str) {
        Some("predict") => match parse_features(&args[1..]) {
            Some(features) => analyzer
                .predict_congestion(&features)
                .and_then(|r| Ok(serde_json::to_string_pretty(&r)?)),
            None => {
                eprintln!("{}", USAGE);
                exit(2);
            }
        },
        Some("hourly") => analyzer
            .hourly_distribution()
            .and_then(|r| Ok(serde_json::to_string_pretty(&r)?)),
        Some("accuracy") => analyzer
            .historical_accuracy()
            .and_then(|r| Ok(serde_json::to_string_pretty(&r)?)),
        Some("trends") => analyzer
            .trend_analysis()
            .and_then(|r| Ok(serde_json::to_string_pretty(&r)?)),
        _ => {
            eprintln!("{}", USAGE);
            exit(2);
        }
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Analyzer error: {}", e);
            exit(1);
        }
    }
}

fn parse_features(args: &[String]) -> Option<FeatureVector> {
    if args.len() != 5 {
        return None;
    }
    Some(FeatureVector {
        time_of_day: args[0].parse().ok()?,
        day_of_week: args[1].parse().ok()?,
        vehicle_count: args[2].parse().ok()?,
        weather_condition: args[3].parse().ok()?,
        road_type: args[4].parse().ok()?,
    })
}
