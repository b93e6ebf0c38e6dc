// Default file locations
pub const TRAFFIC_DATA_PATH: &str = "traffic_data.csv";
pub const SUSTAINABILITY_DATA_PATH: &str = "sustainability_data.csv";
pub const MODEL_PATH: &str = "traffic_congestion_model.json";
pub const SCALER_PATH: &str = "scaler.json";

// Feature columns, in the order the scaler and model were fit with.
pub const FEATURE_NAMES: [&str; 5] = [
    "time_of_day",
    "day_of_week",
    "vehicle_count",
    "weather_condition",
    "road_type",
];

pub const PEAK_HOURS: [u8; 6] = [7, 8, 9, 16, 17, 18];
pub const HEAVY_VOLUME_VEHICLES: u32 = 200;
pub const MAX_CONGESTION_RECOMMENDATIONS: usize = 5;

// Sustainability trend window (most recent samples).
pub const TREND_WINDOW: usize = 30;

// Score returned when a normalization range has zero width.
pub const FLAT_RANGE_SCORE: f64 = 0.5;

pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const WEATHER_LABELS: [&str; 4] = ["Clear", "Rain", "Snow", "Fog"];
pub const ROAD_LABELS: [&str; 4] = ["Highway", "Main Street", "Residential", "Downtown"];
