use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative label for a congestion score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CongestionCategory {
    Low,
    Moderate,
    High,
    Severe,
}

impl fmt::Display for CongestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            CongestionCategory::Low => "Low",
            CongestionCategory::Moderate => "Moderate",
            CongestionCategory::High => "High",
            CongestionCategory::Severe => "Severe",
        };
        write!(f, "{}", label)
    }
}

/// Threshold scheme used to bucket scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryPolicy {
    /// `<0.3` Low, `<0.5` Moderate, `<0.7` High, otherwise Severe.
    #[default]
    FourLevel,
    /// `<0.3` Low, `<0.6` Moderate, otherwise High.
    ThreeLevel,
}

impl CategoryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "four-level" | "four_level" | "4" => Some(CategoryPolicy::FourLevel),
            "three-level" | "three_level" | "3" => Some(CategoryPolicy::ThreeLevel),
            _ => None,
        }
    }

    pub fn categorize(&self, score: f64) -> CongestionCategory {
        match self {
            CategoryPolicy::FourLevel => {
                if score < 0.3 {
                    CongestionCategory::Low
                } else if score < 0.5 {
                    CongestionCategory::Moderate
                } else if score < 0.7 {
                    CongestionCategory::High
                } else {
                    CongestionCategory::Severe
                }
            }
            CategoryPolicy::ThreeLevel => {
                if score < 0.3 {
                    CongestionCategory::Low
                } else if score < 0.6 {
                    CongestionCategory::Moderate
                } else {
                    CongestionCategory::High
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CongestionCategory::*;

    #[test]
    fn four_level_boundaries_are_exact() {
        let policy = CategoryPolicy::FourLevel;
        let cases = [
            (0.0, Low),
            (0.29999, Low),
            (0.3, Moderate),
            (0.49999, Moderate),
            (0.5, High),
            (0.69999, High),
            (0.7, Severe),
            (1.0, Severe),
        ];
        for (score, expected) in cases {
            assert_eq!(policy.categorize(score), expected, "score {}", score);
        }
    }

    #[test]
    fn three_level_never_reports_severe() {
        let policy = CategoryPolicy::ThreeLevel;
        assert_eq!(policy.categorize(0.29), Low);
        assert_eq!(policy.categorize(0.59), Moderate);
        assert_eq!(policy.categorize(0.6), High);
        assert_eq!(policy.categorize(0.99), High);
    }

    #[test]
    fn parse_accepts_known_names() {
        assert_eq!(CategoryPolicy::parse("Four-Level"), Some(CategoryPolicy::FourLevel));
        assert_eq!(CategoryPolicy::parse("3"), Some(CategoryPolicy::ThreeLevel));
        assert_eq!(CategoryPolicy::parse("bogus"), None);
    }
}
