//! Offline fitting of the scaler and regression forest.
//!
//! Bagged CART trees split on squared-error reduction; feature importances
//! are the accumulated impurity decrease per feature, normalized per tree and
//! then averaged so the forest's weights sum to one.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::congestion::model::{CongestionModel, RegressionForest, RegressionTree, TreeNode};
use crate::congestion::scaler::{FeatureRow, StandardScaler};
use crate::error::{AnalyticsError, Result};
use crate::global_variables::FEATURE_NAMES;
use crate::shared_data::TrafficRecord;

#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub train_samples: usize,
    pub test_samples: usize,
    pub train_score: f64,
    pub test_score: f64,
    pub feature_importance: BTreeMap<String, f64>,
}

pub struct ForestTrainer {
    params: ForestParams,
    rng: StdRng,
}

impl ForestTrainer {
    pub fn new(params: ForestParams) -> Self {
        let rng = StdRng::seed_from_u64(params.seed);
        Self { params, rng }
    }

    /// Fit a forest on already-scaled rows.
    pub fn fit(&mut self, x: &[FeatureRow], y: &[f64]) -> Result<RegressionForest> {
        if x.is_empty() || x.len() != y.len() {
            return Err(AnalyticsError::Computation(format!(
                "training set has {} rows and {} targets",
                x.len(),
                y.len()
            )));
        }
        let n = x.len();
        let mut trees = Vec::with_capacity(self.params.n_estimators);
        let mut importance_sum = [0.0; 5];

        for _ in 0..self.params.n_estimators.max(1) {
            let mut sample: Vec<usize> = (0..n).map(|_| self.rng.random_range(0..n)).collect();
            let mut nodes = Vec::new();
            let mut gains = [0.0; 5];
            self.grow(x, y, &mut sample, 0, &mut nodes, &mut gains);

            let total: f64 = gains.iter().sum();
            if total > 0.0 {
                for (acc, g) in importance_sum.iter_mut().zip(gains) {
                    *acc += g / total;
                }
            }
            trees.push(RegressionTree { nodes });
        }

        let total: f64 = importance_sum.iter().sum();
        let feature_importances = if total > 0.0 {
            importance_sum.map(|v| v / total)
        } else {
            [0.2; 5]
        };

        Ok(RegressionForest {
            trees,
            feature_importances,
        })
    }

    fn grow(
        &self,
        x: &[FeatureRow],
        y: &[f64],
        indices: &mut [usize],
        depth: usize,
        nodes: &mut Vec<TreeNode>,
        gains: &mut [f64; 5],
    ) -> usize {
        let n = indices.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n as f64;
        let node_idx = nodes.len();
        nodes.push(TreeNode::Leaf { value: mean });

        if depth >= self.params.max_depth || n < self.params.min_samples_split.max(2) {
            return node_idx;
        }

        let Some(split) = self.best_split(x, y, indices) else {
            return node_idx;
        };

        indices.sort_by(|&a, &b| x[a][split.feature].total_cmp(&x[b][split.feature]));
        gains[split.feature] += split.gain;
        let (left_rows, right_rows) = indices.split_at_mut(split.left_count);
        let left = self.grow(x, y, left_rows, depth + 1, nodes, gains);
        let right = self.grow(x, y, right_rows, depth + 1, nodes, gains);
        nodes[node_idx] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    fn best_split(&self, x: &[FeatureRow], y: &[f64], indices: &[usize]) -> Option<Split> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        if n < 2 * min_leaf {
            return None;
        }
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;
        if parent_sse <= 1e-12 {
            return None;
        }

        let mut best: Option<Split> = None;
        let mut sorted = indices.to_vec();
        for feature in 0..5 {
            sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));
            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let yi = y[sorted[k - 1]];
                left_sum += yi;
                left_sq += yi * yi;
                if k < min_leaf || n - k < min_leaf {
                    continue;
                }
                let lo = x[sorted[k - 1]][feature];
                let hi = x[sorted[k]][feature];
                if lo == hi {
                    continue;
                }
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let left_sse = left_sq - left_sum * left_sum / k as f64;
                let right_sse = right_sq - right_sum * right_sum / (n - k) as f64;
                let gain = parent_sse - left_sse - right_sse;
                if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(Split {
                        feature,
                        threshold: (lo + hi) / 2.0,
                        left_count: k,
                        gain,
                    });
                }
            }
        }
        best
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    left_count: usize,
    gain: f64,
}

/// Coefficient of determination of `model` on scaled rows.
pub fn r2_score(model: &dyn CongestionModel, x: &[FeatureRow], y: &[f64]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(row, v)| (v - model.predict(row)).powi(2))
        .sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// 80/20 split, fit scaler and forest on the training part, score both
/// parts and persist the artifacts.
pub fn train_and_persist(
    records: &[TrafficRecord],
    params: ForestParams,
    model_path: &Path,
    scaler_path: &Path,
) -> Result<TrainingReport> {
    let (scaler, forest, report) = train(records, params)?;
    forest.save(model_path)?;
    scaler.save(scaler_path)?;
    log::info!(
        "Saved model to {} and scaler to {}",
        model_path.display(),
        scaler_path.display()
    );
    Ok(report)
}

pub fn train(
    records: &[TrafficRecord],
    params: ForestParams,
) -> Result<(StandardScaler, RegressionForest, TrainingReport)> {
    if records.len() < 2 {
        return Err(AnalyticsError::Computation(
            "need at least two records to train".to_string(),
        ));
    }
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(params.seed));
    let test_len = (records.len() / 5).max(1);
    let (test_idx, train_idx) = order.split_at(test_len);

    let raw = |idx: &[usize]| -> Vec<FeatureRow> {
        idx.iter().map(|&i| records[i].features().as_row()).collect()
    };
    let targets = |idx: &[usize]| -> Vec<f64> {
        idx.iter().map(|&i| records[i].congestion_level).collect()
    };

    let scaler = StandardScaler::fit(&raw(train_idx))?;
    let x_train: Vec<FeatureRow> = raw(train_idx).iter().map(|r| scaler.transform(r)).collect();
    let x_test: Vec<FeatureRow> = raw(test_idx).iter().map(|r| scaler.transform(r)).collect();
    let y_train = targets(train_idx);
    let y_test = targets(test_idx);

    log::info!("Training regression forest on {} rows", x_train.len());
    let forest = ForestTrainer::new(params).fit(&x_train, &y_train)?;

    let report = TrainingReport {
        train_samples: x_train.len(),
        test_samples: x_test.len(),
        train_score: r2_score(&forest, &x_train, &y_train),
        test_score: r2_score(&forest, &x_test, &y_test),
        feature_importance: FEATURE_NAMES
            .iter()
            .map(|s| s.to_string())
            .zip(forest.feature_importances)
            .collect(),
    };
    log::info!(
        "Train R2 {:.4}, test R2 {:.4}",
        report.train_score,
        report.test_score
    );
    Ok((scaler, forest, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<FeatureRow>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..60 {
            let v = i as f64 / 10.0;
            x.push([v, 0.0, 0.0, 0.0, 0.0]);
            y.push(if v < 3.0 { 0.2 } else { 0.8 });
        }
        (x, y)
    }

    #[test]
    fn forest_learns_a_step_function() {
        let (x, y) = step_data();
        let params = ForestParams {
            n_estimators: 10,
            ..ForestParams::default()
        };
        let forest = ForestTrainer::new(params).fit(&x, &y).unwrap();
        assert!((forest.predict(&[1.0, 0.0, 0.0, 0.0, 0.0]) - 0.2).abs() < 0.05);
        assert!((forest.predict(&[5.0, 0.0, 0.0, 0.0, 0.0]) - 0.8).abs() < 0.05);
        assert!(r2_score(&forest, &x, &y) > 0.9);
    }

    #[test]
    fn importances_concentrate_on_the_informative_feature() {
        let (x, y) = step_data();
        let forest = ForestTrainer::new(ForestParams {
            n_estimators: 5,
            ..ForestParams::default()
        })
        .fit(&x, &y)
        .unwrap();
        let total: f64 = forest.feature_importances.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((forest.feature_importances[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn child_indices_always_follow_parents() {
        let (x, y) = step_data();
        let forest = ForestTrainer::new(ForestParams {
            n_estimators: 3,
            ..ForestParams::default()
        })
        .fit(&x, &y)
        .unwrap();
        for tree in &forest.trees {
            for (i, node) in tree.nodes.iter().enumerate() {
                if let TreeNode::Split { left, right, .. } = node {
                    assert!(*left > i && *right > i);
                }
            }
        }
    }

    #[test]
    fn mismatched_targets_are_rejected() {
        let mut trainer = ForestTrainer::new(ForestParams::default());
        assert!(trainer.fit(&[[0.0; 5]], &[]).is_err());
    }
}
