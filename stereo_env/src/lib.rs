//! Stereo Agent Environment Abstraction Layer
//!
//! This crate is the boundary between the stereo pipeline and the things it
//! does not implement itself: the 3D simulator and the display backend.
//!
//! # Contents
//!
//! - Data model shared with collaborators (`SensorSpec`, `AgentConfiguration`,
//!   `Observation`, `CompositeFrame`)
//! - `SimulatorBackend` / `Simulator` traits
//! - `DisplaySink` trait
//!
//! # Example
//!
//! ```ignore
//! use stereo_env::{Action, SimulatorBackend, Simulator};
//!
//! fn spin<B: SimulatorBackend>(backend: &B, agent: &AgentConfiguration) -> Result<(), EnvError> {
//!     let mut sim = backend.load("rotunda", agent)?;
//!     let obs = sim.step(&Action::TurnRight)?;
//!     println!("{} observations", obs.len());
//!     sim.close();
//!     Ok(())
//! }
//! ```

mod agent;
mod display;
mod error;
mod observation;
mod sensor;
mod simulator;

pub use agent::{Action, ActionSpace, AgentConfiguration};
pub use display::DisplaySink;
pub use error::EnvError;
pub use observation::{CompositeFrame, Observation, ObservationSet, Rgb};
pub use sensor::{geo, Modality, Resolution, SensorSpec};
pub use simulator::{Simulator, SimulatorBackend};
