use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::congestion::scaler::FeatureRow;
use crate::error::{AnalyticsError, Result};

/// A fitted regressor over scaled feature rows.
pub trait CongestionModel: Send + Sync {
    /// Congestion score for one scaled row, clamped to [0, 1].
    fn predict(&self, scaled: &FeatureRow) -> f64;

    /// Importance weights in `FEATURE_NAMES` order.
    fn feature_importances(&self) -> FeatureRow;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flat binary tree; node 0 is the root. Rows with
/// `row[feature] <= threshold` go left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Leaf value reached by `row`. A malformed tree (unknown feature,
    /// dangling or cyclic child link) yields NaN instead of panicking.
    pub fn predict(&self, row: &FeatureRow) -> f64 {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let Some(value) = row.get(*feature) else {
                        return f64::NAN;
                    };
                    idx = if *value <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => return *value,
                None => return f64::NAN,
            }
        }
        f64::NAN
    }

    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(AnalyticsError::Computation("empty regression tree".to_string()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                // Children always follow their parent, so traversal terminates.
                let in_bounds = *left < self.nodes.len() && *right < self.nodes.len();
                if *feature >= 5 || !in_bounds || *left <= i || *right <= i {
                    return Err(AnalyticsError::Computation(format!(
                        "malformed split at node {}",
                        i
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Averaging ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionForest {
    pub trees: Vec<RegressionTree>,
    pub feature_importances: FeatureRow,
}

impl RegressionForest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let forest: RegressionForest = serde_json::from_str(&text)?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(AnalyticsError::Computation("forest has no trees".to_string()));
        }
        for tree in &self.trees {
            tree.validate()?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }
}

impl CongestionModel for RegressionForest {
    fn predict(&self, scaled: &FeatureRow) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict(scaled)).sum();
        (sum / self.trees.len() as f64).clamp(0.0, 1.0)
    }

    fn feature_importances(&self) -> FeatureRow {
        self.feature_importances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn forest_averages_and_clamps() {
        let forest = RegressionForest {
            trees: vec![stump(0.0, 0.2, 0.9), stump(0.0, 0.4, 1.5)],
            feature_importances: [1.0, 0.0, 0.0, 0.0, 0.0],
        };
        let left = forest.predict(&[-1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((left - 0.3).abs() < 1e-12);
        let right = forest.predict(&[1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(right, 1.0);
    }

    #[test]
    fn load_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let forest = RegressionForest {
            trees: vec![stump(0.5, 0.1, 0.6)],
            feature_importances: [0.2; 5],
        };
        forest.save(&path).unwrap();
        assert_eq!(RegressionForest::load(&path).unwrap(), forest);
    }

    #[test]
    fn load_rejects_backward_child_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let forest = RegressionForest {
            trees: vec![RegressionTree {
                nodes: vec![TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 0,
                }],
            }],
            feature_importances: [0.2; 5],
        };
        forest.save(&path).unwrap();
        assert!(RegressionForest::load(&path).is_err());
    }

    #[test]
    fn malformed_trees_predict_nan_instead_of_panicking() {
        let unknown_feature = RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 7,
                    threshold: 0.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: 0.1 },
                TreeNode::Leaf { value: 0.9 },
            ],
        };
        let cycle = RegressionTree {
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 0,
            }],
        };
        let dangling = RegressionTree {
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 4,
                right: 5,
            }],
        };
        for tree in [unknown_feature, cycle, dangling] {
            assert!(tree.validate().is_err());
            assert!(tree.predict(&[0.0; 5]).is_nan());
        }
        assert!(stump(0.0, 0.1, 0.9).validate().is_ok());
    }
}
