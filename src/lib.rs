pub mod config;
pub mod congestion;
pub mod error;
pub mod global_variables;
pub mod recommendations;
pub mod services;
pub mod shared_data;
pub mod storage;
pub mod sustainability;

pub use error::{AnalyticsError, Result};
