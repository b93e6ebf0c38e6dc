pub mod analytics;
pub mod analyzer;
pub mod category;
pub mod dataset;
pub mod model;
pub mod scaler;
pub mod training;

pub use analyzer::{CongestionAnalyzer, CongestionResult, TrafficTrends};
pub use category::{CategoryPolicy, CongestionCategory};
pub use model::{CongestionModel, RegressionForest};
pub use scaler::StandardScaler;
