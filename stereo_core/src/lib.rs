//! Stereo Agent Core
//!
//! Builds a two-sensor stereo rig, drives it through a simulator session and
//! turns each step's pair of observations into one side-by-side frame:
//!
//! 1. **Rig**: `left_sensor` / `right_sensor` mirrored about the agent origin
//! 2. **Session**: scoped simulator ownership, released exactly once
//! 3. **Compositor**: horizontal concatenation plus depth normalization
//! 4. **Display loop**: step, compose, show, poll for the quit key
//!
//! # Example
//!
//! ```ignore
//! use stereo_core::{build_stereo_rig, display_loop, SimulationSession};
//! use stereo_env::{Action, Modality, Resolution};
//!
//! let rig = build_stereo_rig(Modality::Depth, Resolution::square(512), 0.5)?;
//! let mut session = SimulationSession::open(&backend, "rotunda", rig.into_agent_config())?;
//! let outcome = display_loop::run(&mut session, Action::TurnRight, Modality::Depth, 100, None)?;
//! session.close();
//! ```

pub mod compositor;
pub mod display_loop;
pub mod error;
pub mod rig;
pub mod session;

#[cfg(feature = "visualization")]
pub mod visualization;

// Re-export key types for convenience
pub use compositor::{compose, DEPTH_MAX};
pub use display_loop::{LoopOutcome, StopReason, QUIT_KEY, STEREO_WINDOW};
pub use error::StereoError;
pub use rig::{build_stereo_rig, AgentRig, StereoRigBuilder, LEFT_SENSOR_UUID, RIGHT_SENSOR_UUID};
pub use session::{SessionId, SimulationSession};
