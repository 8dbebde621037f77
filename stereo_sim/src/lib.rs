//! Stereo Agent Simulation Harness
//!
//! This crate supplies runnable collaborators for the stereo pipeline and
//! the two-pass demo that ties them together.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     run_stereo_demo                      │
//! │                                                          │
//! │   color rig ──► SimulationSession ──► display_loop ──┐   │
//! │                      (pass 1)                        │   │
//! │   depth rig ──► SimulationSession ──► display_loop ──┤   │
//! │                      (pass 2)                        ▼   │
//! │                                               DisplaySink│
//! └───────────────────────┬──────────────────────────────────┘
//!                         │ SimulatorBackend::load
//!               ┌─────────▼──────────┐
//!               │ ProceduralBackend  │  ray-cast rooms (rotunda, atrium)
//!               └────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use stereo_sim::{run_stereo_demo, DemoConfig, ProceduralBackend};
//!
//! let backend = ProceduralBackend::default();
//! let report = run_stereo_demo(&backend, &DemoConfig::default(), None)?;
//! assert_eq!(report.passes.len(), 2);
//! ```

pub mod procedural;
pub mod runner;
pub mod scene;

#[cfg(feature = "highgui")]
pub mod highgui;

pub use procedural::{Pose, ProceduralBackend, ProceduralConfig, ProceduralSimulator};
pub use runner::{run_stereo_demo, DemoConfig, DemoReport, PassReport};
pub use scene::{SceneCatalog, SceneDescriptor};
