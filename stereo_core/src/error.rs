//! Errors raised by the stereo pipeline.

use stereo_env::{EnvError, Modality, Resolution};
use thiserror::Error;

/// Errors from rig construction, sessions, composition and the display loop.
///
/// None of these are retried; they propagate to the caller.
#[derive(Debug, Error)]
pub enum StereoError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Scene load error: {0}")]
    SceneLoad(String),

    #[error("Simulation step {step} failed: {reason}")]
    SimulationStep { step: u64, reason: String },

    #[error("Shape mismatch: left is {left}, right is {right}")]
    ShapeMismatch { left: Resolution, right: Resolution },

    #[error("Unsupported modality: {0}")]
    UnsupportedModality(String),

    #[error("Session already closed")]
    SessionClosed,

    #[error("No observation for sensor '{0}'")]
    MissingObservation(String),

    #[error("Display error: {0}")]
    Display(String),
}

impl StereoError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Maps a backend error raised while loading a scene.
    pub(crate) fn from_load(err: EnvError) -> Self {
        match err {
            EnvError::SceneNotFound(scene) => Self::SceneLoad(scene),
            EnvError::InvalidConfiguration(msg) => Self::Configuration(msg),
            other => Self::SceneLoad(other.to_string()),
        }
    }

    /// Maps a backend error raised by `step`.
    pub(crate) fn from_step(step: u64, err: EnvError) -> Self {
        match err {
            EnvError::Closed => Self::SessionClosed,
            other => Self::SimulationStep {
                step,
                reason: other.to_string(),
            },
        }
    }

    pub(crate) fn unsupported(modality: Modality, detail: &str) -> Self {
        Self::UnsupportedModality(format!("{} ({})", modality, detail))
    }
}

/// Conversion for errors raised outside `load` and `step`, i.e. by display
/// sinks. A step fault here has no step index, so it is reported as a
/// display error.
impl From<EnvError> for StereoError {
    fn from(err: EnvError) -> Self {
        match err {
            EnvError::Display(msg) => Self::Display(msg),
            EnvError::SceneNotFound(scene) => Self::SceneLoad(scene),
            EnvError::InvalidConfiguration(msg) => Self::Configuration(msg),
            EnvError::Closed => Self::SessionClosed,
            other @ EnvError::StepFault(_) => Self::Display(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_mapping() {
        let err = StereoError::from_load(EnvError::SceneNotFound("castle".into()));
        assert!(matches!(err, StereoError::SceneLoad(ref s) if s == "castle"));

        let err = StereoError::from_load(EnvError::InvalidConfiguration("bad".into()));
        assert!(matches!(err, StereoError::Configuration(_)));
    }

    #[test]
    fn test_step_error_mapping() {
        let err = StereoError::from_step(7, EnvError::step_fault("gpu lost"));
        assert_eq!(err.to_string(), "Simulation step 7 failed: Step fault: gpu lost");

        let err = StereoError::from_step(7, EnvError::Closed);
        assert!(matches!(err, StereoError::SessionClosed));
    }

    #[test]
    fn test_sink_error_conversion() {
        let err: StereoError = EnvError::display("window closed").into();
        assert!(matches!(err, StereoError::Display(ref s) if s == "window closed"));

        let err: StereoError = EnvError::step_fault("frame dropped").into();
        assert!(matches!(err, StereoError::Display(ref s) if s.contains("frame dropped")));
    }
}
