//! Serialisable model artifacts the host loads once and injects into the
//! scorer.
//!
//! The artifact document carries a standardisation scaler and a logistic
//! model over the nine shot features:
//!
//! ```json
//! {
//!   "scaler": { "mean": [..9..], "scale": [..9..] },
//!   "model":  { "weights": [..9..], "intercept": -1.2 }
//! }
//! ```
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AnalyticsError, Result};
use crate::xg::features::MODEL_INPUT_ORDER;
use crate::xg::scorer::{FeatureScaler, ShotModel, ShotQualityScorer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.mean.len() || row.len() != self.scale.len() {
            return Err(AnalyticsError::scoring(format!(
                "scaler fitted on {} columns, got {}",
                self.mean.len(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(v, (m, s))| {
                // Constant columns are fitted with a zero scale.
                if *s == 0.0 {
                    v - m
                } else {
                    (v - m) / s
                }
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticShotModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl ShotModel for LogisticShotModel {
    fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<f64>> {
        batch
            .iter()
            .map(|row| {
                if row.len() != self.weights.len() {
                    return Err(AnalyticsError::scoring(format!(
                        "model expects {} inputs, got {}",
                        self.weights.len(),
                        row.len()
                    )));
                }
                let z: f64 = self
                    .weights
                    .iter()
                    .zip(row.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + self.intercept;
                Ok(sigmoid(z))
            })
            .collect()
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifacts {
    pub scaler: StandardScaler,
    pub model: LogisticShotModel,
}

impl ModelArtifacts {
    pub fn from_json(raw: &str) -> Result<Self> {
        let artifacts: ModelArtifacts = serde_json::from_str(raw)?;
        artifacts.validate()?;
        Ok(artifacts)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let artifacts = Self::from_json(&raw)?;
        info!(
            "Loaded shot model artifacts from {} ({} features)",
            path.display(),
            artifacts.model.weights.len()
        );
        Ok(artifacts)
    }

    fn validate(&self) -> Result<()> {
        let n = MODEL_INPUT_ORDER.len();
        if self.scaler.mean.len() != n || self.scaler.scale.len() != n {
            return Err(AnalyticsError::config(format!(
                "scaler must have {} mean/scale entries",
                n
            )));
        }
        if self.model.weights.len() != n {
            return Err(AnalyticsError::config(format!(
                "model must have {} weights, found {}",
                n,
                self.model.weights.len()
            )));
        }
        let all_finite = self
            .scaler
            .mean
            .iter()
            .chain(&self.scaler.scale)
            .chain(&self.model.weights)
            .all(|v| v.is_finite())
            && self.model.intercept.is_finite();
        if !all_finite {
            return Err(AnalyticsError::config("model artifacts contain non-finite values"));
        }
        Ok(())
    }

    pub fn into_scorer(self) -> ShotQualityScorer {
        ShotQualityScorer::new(Arc::new(self.scaler), Arc::new(self.model))
    }
}
