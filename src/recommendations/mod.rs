pub mod congestion;
pub mod sustainability;

pub use congestion::congestion_recommendations;
pub use sustainability::{recommendations_for, Recommendation};
