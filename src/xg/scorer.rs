//! Shot-quality scoring through an injected scaler and model.

use std::sync::Arc;

use crate::error::{AnalyticsError, Result};
use crate::xg::features::{ShotFeatureVector, MODEL_INPUT_ORDER};

/// Normalisation applied to a raw feature row before it reaches the model.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>>;
}

/// Pre-trained scoring model. Takes a batch of normalised rows and returns
/// one prediction per row.
pub trait ShotModel: Send + Sync {
    fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<f64>>;
}

/// Scores feature vectors with dependencies constructed by the host.
#[derive(Clone, Default)]
pub struct ShotQualityScorer {
    scaler: Option<Arc<dyn FeatureScaler>>,
    model: Option<Arc<dyn ShotModel>>,
}

impl ShotQualityScorer {
    pub fn new(scaler: Arc<dyn FeatureScaler>, model: Arc<dyn ShotModel>) -> Self {
        ShotQualityScorer {
            scaler: Some(scaler),
            model: Some(model),
        }
    }

    /// A scorer with no model behind it; every call fails with
    /// `ScoringUnavailable`.
    pub fn unavailable() -> Self {
        ShotQualityScorer::default()
    }

    pub fn is_available(&self) -> bool {
        self.scaler.is_some() && self.model.is_some()
    }

    pub fn score(&self, features: &ShotFeatureVector) -> Result<f64> {
        let scaler = self
            .scaler
            .as_ref()
            .ok_or_else(|| AnalyticsError::scoring("no feature scaler loaded"))?;
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| AnalyticsError::scoring("no shot model loaded"))?;

        let row = features.model_input();
        let scaled = scaler
            .transform(&row)
            .map_err(|e| AnalyticsError::scoring(format!("scaler rejected input: {}", e)))?;
        if scaled.len() != MODEL_INPUT_ORDER.len() {
            return Err(AnalyticsError::scoring(format!(
                "scaler returned {} columns, expected {}",
                scaled.len(),
                MODEL_INPUT_ORDER.len()
            )));
        }

        let predictions = model
            .predict(&[scaled])
            .map_err(|e| AnalyticsError::scoring(format!("model rejected input: {}", e)))?;
        match predictions.as_slice() {
            [p] if p.is_finite() => Ok(*p),
            [p] => Err(AnalyticsError::scoring(format!(
                "model returned non-finite prediction {}",
                p
            ))),
            other => Err(AnalyticsError::scoring(format!(
                "model returned {} predictions for a batch of one",
                other.len()
            ))),
        }
    }
}

impl std::fmt::Debug for ShotQualityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShotQualityScorer")
            .field("available", &self.is_available())
            .finish()
    }
}
