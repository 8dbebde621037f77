//! Per-step sensor outputs and the composite frames built from them.
//!
//! All grids are `nalgebra::DMatrix` with `nrows = height` and
//! `ncols = width`, so pixel `(row, col)` is `matrix[(row, col)]`.

use crate::sensor::{Modality, Resolution};
use nalgebra::DMatrix;
use std::collections::HashMap;

/// One RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }
}

/// A single sensor reading for one simulation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Color(DMatrix<Rgb>),
    Depth(DMatrix<f32>),
    Semantic(DMatrix<u32>),
}

impl Observation {
    /// The modality this observation was produced by.
    pub fn modality(&self) -> Modality {
        match self {
            Observation::Color(_) => Modality::Color,
            Observation::Depth(_) => Modality::Depth,
            Observation::Semantic(_) => Modality::Semantic,
        }
    }

    /// Grid shape as a resolution.
    pub fn resolution(&self) -> Resolution {
        let (rows, cols) = match self {
            Observation::Color(m) => m.shape(),
            Observation::Depth(m) => m.shape(),
            Observation::Semantic(m) => m.shape(),
        };
        Resolution::new(cols, rows)
    }
}

/// Observations returned by one `step`, keyed by sensor uuid.
#[derive(Debug, Clone, Default)]
pub struct ObservationSet {
    /// Step index that produced these observations (1-based)
    pub step: u64,

    observations: HashMap<String, Observation>,
}

impl ObservationSet {
    /// Creates an empty set for the given step.
    pub fn new(step: u64) -> Self {
        Self {
            step,
            observations: HashMap::new(),
        }
    }

    /// Adds or replaces the observation for `uuid`.
    pub fn insert(&mut self, uuid: impl Into<String>, observation: Observation) {
        self.observations.insert(uuid.into(), observation);
    }

    /// Borrows the observation for `uuid`.
    pub fn get(&self, uuid: &str) -> Option<&Observation> {
        self.observations.get(uuid)
    }

    /// Removes and returns the observation for `uuid`.
    pub fn take(&mut self, uuid: &str) -> Option<Observation> {
        self.observations.remove(uuid)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Two observations placed side by side, ready for display.
///
/// Depth frames hold values normalized to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeFrame {
    Color(DMatrix<Rgb>),
    Depth(DMatrix<f32>),
}

impl CompositeFrame {
    pub fn width(&self) -> usize {
        match self {
            CompositeFrame::Color(m) => m.ncols(),
            CompositeFrame::Depth(m) => m.ncols(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            CompositeFrame::Color(m) => m.nrows(),
            CompositeFrame::Depth(m) => m.nrows(),
        }
    }

    pub fn modality(&self) -> Modality {
        match self {
            CompositeFrame::Color(_) => Modality::Color,
            CompositeFrame::Depth(_) => Modality::Depth,
        }
    }

    /// Row-major interleaved RGB bytes (color frames only).
    pub fn to_rgb_bytes(&self) -> Option<Vec<u8>> {
        match self {
            CompositeFrame::Color(m) => {
                let mut bytes = Vec::with_capacity(m.nrows() * m.ncols() * 3);
                for row in 0..m.nrows() {
                    for col in 0..m.ncols() {
                        bytes.extend_from_slice(&m[(row, col)].0);
                    }
                }
                Some(bytes)
            }
            CompositeFrame::Depth(_) => None,
        }
    }

    /// Row-major depth values (depth frames only).
    pub fn to_depth_row_major(&self) -> Option<Vec<f32>> {
        match self {
            CompositeFrame::Depth(m) => Some(m.transpose().as_slice().to_vec()),
            CompositeFrame::Color(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_resolution() {
        let obs = Observation::Depth(DMatrix::zeros(3, 5));
        assert_eq!(obs.resolution(), Resolution::new(5, 3));
        assert_eq!(obs.modality(), Modality::Depth);
    }

    #[test]
    fn test_observation_set_lookup() {
        let mut set = ObservationSet::new(1);
        set.insert("left_sensor", Observation::Semantic(DMatrix::zeros(2, 2)));

        assert_eq!(set.len(), 1);
        assert!(set.get("left_sensor").is_some());
        assert!(set.get("right_sensor").is_none());
        assert!(set.take("left_sensor").is_some());
        assert!(set.is_empty());
    }

    #[test]
    fn test_row_major_export() {
        // 2 rows x 3 cols, value = 10*row + col
        let m = DMatrix::from_fn(2, 3, |r, c| (10 * r + c) as f32);
        let frame = CompositeFrame::Depth(m);

        assert_eq!(
            frame.to_depth_row_major().unwrap(),
            vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]
        );
        assert!(frame.to_rgb_bytes().is_none());

        let color = CompositeFrame::Color(DMatrix::from_fn(1, 2, |_, c| {
            Rgb::new(c as u8, 0, 255)
        }));
        assert_eq!(color.to_rgb_bytes().unwrap(), vec![0, 0, 255, 1, 0, 255]);
    }
}
