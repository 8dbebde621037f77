//! Rerun display sink.
//!
//! Streams every composite frame to the Rerun viewer under
//! `<window>/frame`, indexed on a `step` timeline. The viewer has no key
//! channel back to the loop, so this sink never requests quit.
//!
//! Enable with the `visualization` feature flag.

use rerun::{RecordingStream, RecordingStreamBuilder};
use stereo_env::{CompositeFrame, DisplaySink, EnvError};

/// Rerun-based sink for stereo composite frames.
pub struct RerunSink {
    rec: RecordingStream,
    step: i64,
}

impl RerunSink {
    /// Create a sink that spawns the Rerun viewer
    pub fn new(app_id: &str) -> Result<Self, EnvError> {
        let rec = RecordingStreamBuilder::new(app_id)
            .spawn()
            .map_err(EnvError::display)?;
        tracing::info!("Rerun visualization enabled - open Rerun Viewer to see frames");

        Ok(Self { rec, step: 0 })
    }
}

impl DisplaySink for RerunSink {
    fn show(&mut self, window: &str, frame: &CompositeFrame) -> Result<(), EnvError> {
        self.step += 1;
        self.rec.set_time_sequence("step", self.step);

        let resolution = [frame.width() as u32, frame.height() as u32];
        let bytes = display_bytes(frame);

        self.rec
            .log(
                format!("{}/frame", window),
                &rerun::Image::from_rgb24(bytes, resolution),
            )
            .map_err(EnvError::display)
    }

    fn wait_key(&mut self) -> Result<Option<char>, EnvError> {
        Ok(None)
    }
}

/// Row-major RGB bytes; normalized depth becomes a grayscale ramp.
fn display_bytes(frame: &CompositeFrame) -> Vec<u8> {
    match frame {
        CompositeFrame::Color(_) => frame.to_rgb_bytes().unwrap_or_default(),
        CompositeFrame::Depth(_) => frame
            .to_depth_row_major()
            .unwrap_or_default()
            .into_iter()
            .flat_map(|v| {
                let g = (v * 255.0).round() as u8;
                [g, g, g]
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn test_depth_display_bytes() {
        let frame = CompositeFrame::Depth(DMatrix::from_row_slice(1, 3, &[0.0, 0.5, 1.0]));
        assert_eq!(
            display_bytes(&frame),
            vec![0, 0, 0, 128, 128, 128, 255, 255, 255]
        );
    }
}
