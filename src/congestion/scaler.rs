//! Per-feature standardization, fit once on training rows and reused as-is
//! at inference time.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AnalyticsError, Result};
use crate::global_variables::FEATURE_NAMES;

pub type FeatureRow = [f64; 5];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column order the scaler was fit with.
    pub feature_names: Vec<String>,
    pub mean: FeatureRow,
    /// Population standard deviation; zero-variance columns store 1.0.
    pub scale: FeatureRow,
}

impl StandardScaler {
    pub fn fit(rows: &[FeatureRow]) -> Result<Self> {
        if rows.is_empty() {
            return Err(AnalyticsError::Computation(
                "cannot fit scaler on an empty training set".to_string(),
            ));
        }
        let n = rows.len() as f64;
        let mut mean = [0.0; 5];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x / n;
            }
        }
        let mut scale = [0.0; 5];
        for row in rows {
            for i in 0..5 {
                scale[i] += (row[i] - mean[i]).powi(2) / n;
            }
        }
        for s in scale.iter_mut() {
            *s = s.sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }
        Ok(Self {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            mean,
            scale,
        })
    }

    pub fn transform(&self, row: &FeatureRow) -> FeatureRow {
        let mut out = [0.0; 5];
        for i in 0..5 {
            out[i] = (row[i] - self.mean[i]) / self.scale[i];
        }
        out
    }

    pub fn inverse_transform(&self, row: &FeatureRow) -> FeatureRow {
        let mut out = [0.0; 5];
        for i in 0..5 {
            out[i] = row[i] * self.scale[i] + self.mean[i];
        }
        out
    }

    /// Load a persisted scaler, refusing one whose column order differs
    /// from the inference order.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let scaler: StandardScaler = serde_json::from_str(&text)?;
        if scaler.feature_names != FEATURE_NAMES {
            return Err(AnalyticsError::Computation(format!(
                "scaler feature order {:?} does not match {:?}",
                scaler.feature_names, FEATURE_NAMES
            )));
        }
        Ok(scaler)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
