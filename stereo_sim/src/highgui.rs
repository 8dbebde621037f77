//! OpenCV HighGUI display sink.
//!
//! Shows composite frames in a native window and blocks on `wait_key`
//! until a key is pressed (or `wait_ms` elapses when non-zero).
//!
//! Only available with the `highgui` feature (needs a system OpenCV).

use opencv::core::{Mat, Scalar, CV_32FC1, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;
use std::collections::HashSet;
use stereo_env::{CompositeFrame, DisplaySink, EnvError};

/// Native-window sink backed by `cv::imshow` / `cv::waitKey`.
pub struct HighGuiSink {
    /// Windows created so far
    windows: HashSet<String>,

    /// `waitKey` delay in ms (0 = wait forever)
    wait_ms: i32,
}

impl HighGuiSink {
    /// Sink that waits indefinitely for a key after each frame.
    pub fn new() -> Self {
        Self::with_wait(0)
    }

    /// Sink that waits at most `wait_ms` per frame.
    pub fn with_wait(wait_ms: i32) -> Self {
        Self {
            windows: HashSet::new(),
            wait_ms,
        }
    }
}

impl Default for HighGuiSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for HighGuiSink {
    fn show(&mut self, window: &str, frame: &CompositeFrame) -> Result<(), EnvError> {
        if !self.windows.contains(window) {
            highgui::named_window(window, highgui::WINDOW_AUTOSIZE).map_err(EnvError::display)?;
            self.windows.insert(window.to_string());
        }

        let mat = to_mat(frame)?;
        highgui::imshow(window, &mat).map_err(EnvError::display)
    }

    fn wait_key(&mut self) -> Result<Option<char>, EnvError> {
        let key = highgui::wait_key(self.wait_ms).map_err(EnvError::display)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(char::from_u32((key & 0xff) as u32))
    }
}

impl Drop for HighGuiSink {
    fn drop(&mut self) {
        if !self.windows.is_empty() {
            let _ = highgui::destroy_all_windows();
        }
    }
}

/// Copies a composite frame into a new `Mat`.
///
/// Color frames become `CV_8UC3` in BGR order; depth frames `CV_32FC1`,
/// which `imshow` maps from `[0, 1]` to black..white.
fn to_mat(frame: &CompositeFrame) -> Result<Mat, EnvError> {
    let (rows, cols) = (frame.height() as i32, frame.width() as i32);

    let (typ, bytes) = match frame {
        CompositeFrame::Color(_) => {
            let mut bytes = frame.to_rgb_bytes().unwrap_or_default();
            for px in bytes.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            (CV_8UC3, bytes)
        }
        CompositeFrame::Depth(_) => {
            let bytes = frame
                .to_depth_row_major()
                .unwrap_or_default()
                .into_iter()
                .flat_map(f32::to_ne_bytes)
                .collect();
            (CV_32FC1, bytes)
        }
    };

    let mut mat = Mat::new_rows_cols_with_default(rows, cols, typ, Scalar::all(0.0))
        .map_err(EnvError::display)?;
    let data = mat.data_bytes_mut().map_err(EnvError::display)?;
    if data.len() != bytes.len() {
        return Err(EnvError::Display(format!(
            "frame buffer is {} bytes, Mat expects {}",
            bytes.len(),
            data.len()
        )));
    }
    data.copy_from_slice(&bytes);
    Ok(mat)
}
