//! Directional prediction module
//!
//! Scores momentum, crowd odds and volume into an advisory UP/DOWN call

mod engine;
mod types;

pub use engine::{label_score, PredictionEngine, VolumePolicy};
pub use types::{Confidence, Direction, Prediction, PredictionError, VolumeTier};
