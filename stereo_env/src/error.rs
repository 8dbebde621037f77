//! Error types for the simulator and display collaborators.

use thiserror::Error;

/// Errors reported by a simulator backend or a display sink.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The requested scene is not known to the backend
    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    /// The backend rejected the agent configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The simulator reported an internal fault while stepping
    #[error("Step fault: {0}")]
    StepFault(String),

    /// The simulator was used after `close()`
    #[error("Simulator already closed")]
    Closed,

    /// Rendering or input polling failed in the display backend
    #[error("Display error: {0}")]
    Display(String),
}

impl EnvError {
    /// Creates a step fault error.
    pub fn step_fault(msg: impl Into<String>) -> Self {
        Self::StepFault(msg.into())
    }

    /// Creates a display error.
    pub fn display(msg: impl std::fmt::Display) -> Self {
        Self::Display(msg.to_string())
    }
}
