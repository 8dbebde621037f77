//! Side-by-side composition of stereo observations.
//!
//! Color pairs are concatenated as-is. Depth pairs are concatenated and then
//! mapped into `[0, 1]`:
//!
//! ```text
//! value' = clamp(value, 0, DEPTH_MAX) / DEPTH_MAX
//! ```
//!
//! Raw depth is an unbounded distance; without the mapping a depth frame would
//! display as a flat white or black image.

use crate::error::StereoError;
use nalgebra::{DMatrix, Scalar};
use stereo_env::{CompositeFrame, Modality, Observation};

/// Reference maximum distance for depth normalization (meters).
pub const DEPTH_MAX: f32 = 10.0;

/// Concatenates two observations horizontally.
///
/// Both inputs must have the same shape and must match `modality`.
/// Pure: the same inputs always give a bit-identical frame.
pub fn compose(
    left: &Observation,
    right: &Observation,
    modality: Modality,
) -> Result<CompositeFrame, StereoError> {
    let (l_res, r_res) = (left.resolution(), right.resolution());
    if l_res != r_res {
        return Err(StereoError::ShapeMismatch {
            left: l_res,
            right: r_res,
        });
    }

    match (modality, left, right) {
        (Modality::Color, Observation::Color(l), Observation::Color(r)) => {
            Ok(CompositeFrame::Color(hconcat(l, r)))
        }
        (Modality::Depth, Observation::Depth(l), Observation::Depth(r)) => {
            let mut frame = hconcat(l, r);
            frame.apply(|v| *v = normalize_depth(*v));
            Ok(CompositeFrame::Depth(frame))
        }
        (Modality::Semantic, _, _) => Err(StereoError::unsupported(
            Modality::Semantic,
            "no composite representation",
        )),
        (expected, l, r) => Err(StereoError::unsupported(
            expected,
            &format!(
                "observations are {} and {}",
                l.modality(),
                r.modality()
            ),
        )),
    }
}

/// Maps a raw distance into `[0, 1]`.
///
/// NaN (no return) maps to 0.0.
pub fn normalize_depth(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, DEPTH_MAX) / DEPTH_MAX
}

/// `[left | right]` for two grids of equal height.
fn hconcat<T: Scalar + Copy>(left: &DMatrix<T>, right: &DMatrix<T>) -> DMatrix<T> {
    let split = left.ncols();
    DMatrix::from_fn(left.nrows(), split + right.ncols(), |row, col| {
        if col < split {
            left[(row, col)]
        } else {
            right[(row, col - split)]
        }
    })
}
