//! Sensor descriptions shared by rig builders and simulators.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Geometry axes of the agent frame.
///
/// Right-handed with +Y up and the agent looking down -Z.
pub mod geo {
    use nalgebra::Vector3;

    /// Up axis.
    pub fn up() -> Vector3<f64> {
        Vector3::new(0.0, 1.0, 0.0)
    }

    /// Left axis.
    pub fn left() -> Vector3<f64> {
        Vector3::new(-1.0, 0.0, 0.0)
    }

    /// Right axis.
    pub fn right() -> Vector3<f64> {
        Vector3::new(1.0, 0.0, 0.0)
    }

    /// Forward (viewing) axis.
    pub fn front() -> Vector3<f64> {
        Vector3::new(0.0, 0.0, -1.0)
    }
}

/// Kind of data a sensor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// 3-channel RGB intensity
    Color,

    /// Single-channel distance along the optical axis
    Depth,

    /// Per-pixel instance ids
    Semantic,
}

impl Modality {
    /// Returns the modality name.
    pub fn name(&self) -> &'static str {
        match self {
            Modality::Color => "color",
            Modality::Depth => "depth",
            Modality::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Square resolution, e.g. `Resolution::square(512)`.
    pub fn square(side: usize) -> Self {
        Self::new(side, side)
    }

    /// Returns true if both dimensions are non-zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Description of one sensor mounted on an agent.
///
/// The `uuid` is the key under which the simulator reports this sensor's
/// observation, so it must be unique among an agent's sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    /// Observation lookup key
    pub uuid: String,

    /// Image size
    pub resolution: Resolution,

    /// Mount point relative to the agent origin (meters)
    pub offset: Vector3<f64>,

    /// Data kind
    pub modality: Modality,
}

impl SensorSpec {
    /// Creates a sensor spec.
    pub fn new(
        uuid: impl Into<String>,
        resolution: Resolution,
        offset: Vector3<f64>,
        modality: Modality,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            resolution,
            offset,
            modality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_are_orthonormal() {
        assert_eq!(geo::up().dot(&geo::right()), 0.0);
        assert_eq!(geo::front().dot(&geo::right()), 0.0);
        assert_eq!(geo::left(), -geo::right());
        assert_eq!(geo::right().cross(&geo::up()), -geo::front());
    }

    #[test]
    fn test_resolution_validity() {
        assert!(Resolution::square(512).is_valid());
        assert!(!Resolution::new(0, 512).is_valid());
        assert_eq!(Resolution::new(640, 480).to_string(), "640x480");
    }

    #[test]
    fn test_sensor_spec_serde() {
        let spec = SensorSpec::new(
            "left_sensor",
            Resolution::square(64),
            Vector3::new(-0.25, 1.5, 0.0),
            Modality::Depth,
        );

        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"depth\""));

        let back: SensorSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
