//! The step / compose / render loop.
//!
//! ```text
//!            +---------------------------------------------+
//!            v                                             |
//!   [Running] -- step --> compose --> show --> wait_key ---+
//!        |                                        |
//!        | step_limit reached / step error        | 'q'
//!        v                                        v
//!   [Stopped] <-----------------------------------+
//! ```
//!
//! Without a sink (headless) the loop still steps and composes every frame
//! but never renders or polls for input.

use crate::compositor::compose;
use crate::error::StereoError;
use crate::rig::{LEFT_SENSOR_UUID, RIGHT_SENSOR_UUID};
use crate::session::SimulationSession;
use serde::{Deserialize, Serialize};
use stereo_env::{Action, DisplaySink, Modality, Simulator};
use tracing::{debug, info};

/// Window the composite frame is rendered into.
pub const STEREO_WINDOW: &str = "stereo_pair";

/// Key that ends the loop early.
pub const QUIT_KEY: char = 'q';

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `step_limit` iterations completed
    StepLimit,

    /// The sink reported the quit key
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    Stopped(StopReason),
}

/// Summary of one loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopOutcome {
    /// Composite frames produced (rendered too, if a sink was attached)
    pub frames_composed: u64,

    pub stop_reason: StopReason,
}

/// Drives `session` with `action` until the step limit or a quit key.
///
/// A failing step or sink call stops the loop and is returned to the caller;
/// the session stays open so the caller's scope decides when it is released.
pub fn run<S: Simulator>(
    session: &mut SimulationSession<S>,
    action: Action,
    modality: Modality,
    step_limit: u64,
    mut sink: Option<&mut dyn DisplaySink>,
) -> Result<LoopOutcome, StereoError> {
    info!(
        session = %session.id(),
        %action,
        %modality,
        step_limit,
        headless = sink.is_none(),
        "Display loop started"
    );

    let mut state = LoopState::Running;
    let mut frames_composed = 0u64;

    let stop_reason = loop {
        if let LoopState::Stopped(reason) = state {
            break reason;
        }
        if frames_composed >= step_limit {
            state = LoopState::Stopped(StopReason::StepLimit);
            continue;
        }

        let mut observations = session.step(action)?;
        let left = observations
            .take(LEFT_SENSOR_UUID)
            .ok_or_else(|| StereoError::MissingObservation(LEFT_SENSOR_UUID.to_string()))?;
        let right = observations
            .take(RIGHT_SENSOR_UUID)
            .ok_or_else(|| StereoError::MissingObservation(RIGHT_SENSOR_UUID.to_string()))?;

        let frame = compose(&left, &right, modality)?;
        frames_composed += 1;
        debug!(
            step = observations.step,
            width = frame.width(),
            height = frame.height(),
            "Composed stereo frame"
        );

        if let Some(sink) = sink.as_deref_mut() {
            sink.show(STEREO_WINDOW, &frame)?;
            if sink.wait_key()? == Some(QUIT_KEY) {
                state = LoopState::Stopped(StopReason::Quit);
            }
        }
    };

    info!(frames = frames_composed, reason = ?stop_reason, "Display loop stopped");
    Ok(LoopOutcome {
        frames_composed,
        stop_reason,
    })
}
