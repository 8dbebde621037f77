//! Agent configuration and the discrete action vocabulary.

use crate::sensor::SensorSpec;
use serde::{Deserialize, Serialize};

/// Discrete agent actions understood by every simulator backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Translate along the heading by `ActionSpace::forward_step`
    MoveForward,

    /// Rotate counter-clockwise about the up axis by `ActionSpace::turn_angle_deg`
    TurnLeft,

    /// Rotate clockwise about the up axis by `ActionSpace::turn_angle_deg`
    TurnRight,
}

impl Action {
    /// Returns the action name.
    pub fn name(&self) -> &'static str {
        match self {
            Action::MoveForward => "move_forward",
            Action::TurnLeft => "turn_left",
            Action::TurnRight => "turn_right",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "move_forward" | "forward" => Ok(Action::MoveForward),
            "turn_left" | "left" => Ok(Action::TurnLeft),
            "turn_right" | "right" => Ok(Action::TurnRight),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// Actuation amounts for the discrete actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionSpace {
    /// Distance covered by `MoveForward` (meters)
    pub forward_step: f64,

    /// Rotation applied by `TurnLeft` / `TurnRight` (degrees)
    pub turn_angle_deg: f64,
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self {
            forward_step: 0.25,
            turn_angle_deg: 10.0,
        }
    }
}

/// Everything a simulator needs to instantiate one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfiguration {
    /// Sensors mounted on the agent, in declaration order
    pub sensor_specifications: Vec<SensorSpec>,

    /// Actuation amounts
    pub action_space: ActionSpace,
}

impl AgentConfiguration {
    /// Creates a configuration with the default action space.
    pub fn new(sensor_specifications: Vec<SensorSpec>) -> Self {
        Self {
            sensor_specifications,
            action_space: ActionSpace::default(),
        }
    }

    /// Looks up a sensor by uuid.
    pub fn sensor(&self, uuid: &str) -> Option<&SensorSpec> {
        self.sensor_specifications.iter().find(|s| s.uuid == uuid)
    }
}
