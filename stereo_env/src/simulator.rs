//! Simulator abstraction for the stereo agent.

use crate::agent::{Action, AgentConfiguration};
use crate::error::EnvError;
use crate::observation::ObservationSet;

/// Factory for simulator instances.
///
/// # Implementations
///
/// - **Procedural**: `stereo_sim::ProceduralBackend` - deterministic ray caster
/// - **Test doubles**: scripted backends in unit tests
pub trait SimulatorBackend {
    /// The simulator type this backend produces.
    type Sim: Simulator;

    /// Instantiates a simulator bound to one scene and one agent.
    ///
    /// # Returns
    /// * `Err(EnvError::SceneNotFound)` - the scene id cannot be located
    /// * `Err(EnvError::InvalidConfiguration)` - the agent cannot be built
    fn load(&self, scene_id: &str, agent: &AgentConfiguration) -> Result<Self::Sim, EnvError>;
}

/// A running simulator holding one agent.
///
/// Stepping is blocking: `step` returns once the frame is rendered.
pub trait Simulator {
    /// Applies one action and renders every sensor.
    ///
    /// The returned set holds one observation per configured sensor uuid.
    fn step(&mut self, action: &Action) -> Result<ObservationSet, EnvError>;

    /// Releases simulator-owned resources.
    fn close(&mut self);
}
