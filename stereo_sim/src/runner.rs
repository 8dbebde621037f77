//! Two-pass stereo demo runner.
//!
//! Runs the display loop once with a color rig and once with a depth rig.
//! Each pass opens its own session and releases it before the next pass
//! starts, so the two simulators never coexist.

use serde::{Deserialize, Serialize};
use stereo_core::display_loop::{self, StopReason};
use stereo_core::rig::{DEFAULT_SENSOR_HEIGHT, DEFAULT_SEPARATION};
use stereo_core::{SessionId, SimulationSession, StereoError, StereoRigBuilder};
use stereo_env::{Action, DisplaySink, Modality, Resolution, SimulatorBackend};
use tracing::info;

/// Parameters shared by both passes.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Scene to load for each pass
    pub scene_id: String,

    /// Per-sensor resolution
    pub resolution: Resolution,

    /// Distance between the two sensors (meters)
    pub separation: f64,

    /// Sensor mount height (meters)
    pub sensor_height: f64,

    /// Iterations per pass
    pub step_limit: u64,

    /// Action repeated every iteration
    pub action: Action,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scene_id: "rotunda".to_string(),
            resolution: Resolution::square(512),
            separation: DEFAULT_SEPARATION,
            sensor_height: DEFAULT_SENSOR_HEIGHT,
            step_limit: 100,
            action: Action::TurnRight,
        }
    }
}

/// Result of one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassReport {
    pub modality: Modality,
    pub session: SessionId,
    pub frames_composed: u64,
    pub stop_reason: StopReason,
}

/// Result of a full demo run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoReport {
    pub scene_id: String,
    pub resolution: Resolution,
    pub step_limit: u64,
    pub passes: Vec<PassReport>,
}

impl DemoReport {
    /// Frames composed across all passes.
    pub fn total_frames(&self) -> u64 {
        self.passes.iter().map(|p| p.frames_composed).sum()
    }
}

/// Runs the color pass, then the depth pass.
///
/// A quit key ends only the current pass. Any error ends the run; the
/// failing pass's session is released before the error is returned.
pub fn run_stereo_demo<B: SimulatorBackend>(
    backend: &B,
    config: &DemoConfig,
    mut sink: Option<&mut dyn DisplaySink>,
) -> Result<DemoReport, StereoError> {
    let mut passes = Vec::with_capacity(2);

    for modality in [Modality::Color, Modality::Depth] {
        let pass_sink = sink.as_mut().map(|s| &mut **s as &mut dyn DisplaySink);
        passes.push(run_pass(backend, config, modality, pass_sink)?);
    }

    Ok(DemoReport {
        scene_id: config.scene_id.clone(),
        resolution: config.resolution,
        step_limit: config.step_limit,
        passes,
    })
}

fn run_pass<B: SimulatorBackend>(
    backend: &B,
    config: &DemoConfig,
    modality: Modality,
    sink: Option<&mut dyn DisplaySink>,
) -> Result<PassReport, StereoError> {
    let rig = StereoRigBuilder::new(modality, config.resolution)
        .separation(config.separation)
        .height(config.sensor_height)
        .build()?;

    let mut session = SimulationSession::open(backend, &config.scene_id, rig.into_agent_config())?;
    info!(
        session = %session.id(),
        scene = session.scene_id(),
        %modality,
        "Starting {} pass",
        modality
    );

    let outcome = display_loop::run(&mut session, config.action, modality, config.step_limit, sink);
    session.close();
    let outcome = outcome?;

    Ok(PassReport {
        modality,
        session: session.id(),
        frames_composed: outcome.frames_composed,
        stop_reason: outcome.stop_reason,
    })
}
