//! Stereo rig construction.
//!
//! A stereo rig is two sensors of the same kind mounted at the same height
//! and mirrored across the agent's vertical plane:
//!
//! ```text
//!        left_sensor        right_sensor
//!            o<---- sep/2 ---|--- sep/2 ---->o      height h above origin
//!                            |
//!                          agent
//! ```
//!
//! Sensors are named so the display stage can fetch each eye by uuid,
//! independent of the order the simulator stores them in.

use crate::error::StereoError;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use stereo_env::{geo, AgentConfiguration, Modality, Resolution, SensorSpec};

/// Observation key of the left eye.
pub const LEFT_SENSOR_UUID: &str = "left_sensor";

/// Observation key of the right eye.
pub const RIGHT_SENSOR_UUID: &str = "right_sensor";

/// Mount height above the agent origin (meters).
pub const DEFAULT_SENSOR_HEIGHT: f64 = 1.5;

/// Distance between the two sensors (meters).
pub const DEFAULT_SEPARATION: f64 = 0.5;

/// Two matched sensors, left first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRig {
    sensors: [SensorSpec; 2],
}

impl AgentRig {
    pub fn left(&self) -> &SensorSpec {
        &self.sensors[0]
    }

    pub fn right(&self) -> &SensorSpec {
        &self.sensors[1]
    }

    /// Shared modality of both sensors.
    pub fn modality(&self) -> Modality {
        self.sensors[0].modality
    }

    /// Shared resolution of both sensors.
    pub fn resolution(&self) -> Resolution {
        self.sensors[0].resolution
    }

    /// Distance between the two mount points.
    pub fn baseline(&self) -> f64 {
        (self.right().offset - self.left().offset).norm()
    }

    /// Attaches the rig to a fresh agent configuration.
    pub fn into_agent_config(self) -> AgentConfiguration {
        AgentConfiguration::new(self.sensors.into())
    }
}

/// Builder for [`AgentRig`].
///
/// # Example
///
/// ```ignore
/// let rig = StereoRigBuilder::new(Modality::Depth, Resolution::square(256))
///     .separation(0.12)
///     .height(1.2)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct StereoRigBuilder {
    modality: Modality,
    resolution: Resolution,
    separation: f64,
    height: f64,
    left_uuid: String,
    right_uuid: String,
}

impl StereoRigBuilder {
    pub fn new(modality: Modality, resolution: Resolution) -> Self {
        Self {
            modality,
            resolution,
            separation: DEFAULT_SEPARATION,
            height: DEFAULT_SENSOR_HEIGHT,
            left_uuid: LEFT_SENSOR_UUID.to_string(),
            right_uuid: RIGHT_SENSOR_UUID.to_string(),
        }
    }

    pub fn separation(mut self, separation: f64) -> Self {
        self.separation = separation;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Overrides the observation keys.
    pub fn uuids(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_uuid = left.into();
        self.right_uuid = right.into();
        self
    }

    /// Validates the parameters and produces the rig.
    pub fn build(self) -> Result<AgentRig, StereoError> {
        if !(self.separation.is_finite() && self.separation > 0.0) {
            return Err(StereoError::config(format!(
                "separation must be positive, got {}",
                self.separation
            )));
        }
        if !self.resolution.is_valid() {
            return Err(StereoError::config(format!(
                "resolution must be non-zero, got {}",
                self.resolution
            )));
        }
        if !self.height.is_finite() {
            return Err(StereoError::config("sensor height must be finite"));
        }
        if self.left_uuid == self.right_uuid {
            return Err(StereoError::config(format!(
                "sensor uuids must differ, both are '{}'",
                self.left_uuid
            )));
        }

        let half = self.separation / 2.0;
        let mount = |side: Vector3<f64>| self.height * geo::up() + half * side;

        let left = SensorSpec::new(
            self.left_uuid.clone(),
            self.resolution,
            mount(geo::left()),
            self.modality,
        );
        let right = SensorSpec::new(
            self.right_uuid.clone(),
            self.resolution,
            mount(geo::right()),
            self.modality,
        );

        Ok(AgentRig {
            sensors: [left, right],
        })
    }
}

/// Builds the standard `left_sensor` / `right_sensor` pair at the default height.
pub fn build_stereo_rig(
    modality: Modality,
    resolution: Resolution,
    separation: f64,
) -> Result<AgentRig, StereoError> {
    StereoRigBuilder::new(modality, resolution)
        .separation(separation)
        .build()
}
