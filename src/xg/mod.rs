//! Expected-goals: shot features and scoring.

pub mod features;
pub mod model;
pub mod scorer;

pub use features::{
    extract_features, BodyPart, DefenderTrack, OpponentRole, ShotFeatureVector, ShotSituation,
    TrackedOpponent, MODEL_INPUT_ORDER,
};
pub use model::{LogisticShotModel, ModelArtifacts, StandardScaler};
pub use scorer::{FeatureScaler, ShotModel, ShotQualityScorer};
