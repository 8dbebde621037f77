//! Scoped ownership of one simulator instance.
//!
//! Lifecycle: `open -> step* -> close`. The simulator is released exactly
//! once, either by an explicit `close()` or when the session is dropped, so
//! early returns and `?` propagation never leak it.

use crate::error::StereoError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stereo_env::{Action, AgentConfiguration, ObservationSet, Simulator, SimulatorBackend};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identifier of one simulation session (for logs and reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A simulator bound to one scene.
pub struct SimulationSession<S: Simulator> {
    id: SessionId,
    scene_id: String,

    /// `None` once closed
    sim: Option<S>,

    steps_taken: u64,
}

impl<S: Simulator> SimulationSession<S> {
    /// Validates `config` and loads `scene_id` through `backend`.
    ///
    /// # Errors
    /// * `Configuration` - empty sensor list, duplicate uuids, zero resolution,
    ///   non-positive actuation amounts, or the backend rejected the agent
    /// * `SceneLoad` - the backend cannot locate the scene
    pub fn open<B>(backend: &B, scene_id: &str, config: AgentConfiguration) -> Result<Self, StereoError>
    where
        B: SimulatorBackend<Sim = S>,
    {
        validate_config(&config)?;

        let sim = backend
            .load(scene_id, &config)
            .map_err(StereoError::from_load)?;

        let id = SessionId::new();
        info!(
            session = %id,
            scene = scene_id,
            sensors = config.sensor_specifications.len(),
            "Simulation session opened"
        );

        Ok(Self {
            id,
            scene_id: scene_id.to_string(),
            sim: Some(sim),
            steps_taken: 0,
        })
    }

    /// Advances the agent by one action.
    pub fn step(&mut self, action: Action) -> Result<ObservationSet, StereoError> {
        let sim = self.sim.as_mut().ok_or(StereoError::SessionClosed)?;
        let step = self.steps_taken + 1;

        let observations = sim
            .step(&action)
            .map_err(|e| StereoError::from_step(step, e))?;

        self.steps_taken = step;
        debug!(session = %self.id, step, %action, "Stepped");
        Ok(observations)
    }

    /// Releases the simulator. Calling it again is a no-op.
    pub fn close(&mut self) {
        if let Some(mut sim) = self.sim.take() {
            sim.close();
            info!(
                session = %self.id,
                scene = %self.scene_id,
                steps = self.steps_taken,
                "Simulation session closed"
            );
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn is_closed(&self) -> bool {
        self.sim.is_none()
    }
}

impl<S: Simulator> Drop for SimulationSession<S> {
    fn drop(&mut self) {
        if self.sim.is_some() {
            warn!(session = %self.id, "Session dropped without close(); releasing simulator");
            self.close();
        }
    }
}

/// Structural checks that do not need the simulator.
fn validate_config(config: &AgentConfiguration) -> Result<(), StereoError> {
    if config.sensor_specifications.is_empty() {
        return Err(StereoError::config("agent has no sensors"));
    }

    let mut seen = HashSet::new();
    for spec in &config.sensor_specifications {
        if !seen.insert(spec.uuid.as_str()) {
            return Err(StereoError::config(format!(
                "duplicate sensor uuid '{}'",
                spec.uuid
            )));
        }
        if !spec.resolution.is_valid() {
            return Err(StereoError::config(format!(
                "sensor '{}' has zero resolution {}",
                spec.uuid, spec.resolution
            )));
        }
    }

    let space = &config.action_space;
    if !(space.forward_step.is_finite() && space.forward_step > 0.0) {
        return Err(StereoError::config("forward_step must be positive"));
    }
    if !(space.turn_angle_deg.is_finite() && space.turn_angle_deg > 0.0) {
        return Err(StereoError::config("turn_angle_deg must be positive"));
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use crate::rig::build_stereo_rig;
    use stereo_env::{Modality, Resolution};

    fn stereo_config() -> AgentConfiguration {
        build_stereo_rig(Modality::Color, Resolution::square(4), 0.5)
            .unwrap()
            .into_agent_config()
    }

    #[test]
    fn test_open_step_close() {
        let backend = ScriptedBackend::new();
        let mut session = SimulationSession::open(&backend, "test_scene", stereo_config()).unwrap();
        assert_eq!(session.scene_id(), "test_scene");

        let obs = session.step(Action::TurnRight).unwrap();
        assert_eq!(obs.step, 1);
        assert!(obs.get("left_sensor").is_some());
        assert!(obs.get("right_sensor").is_some());
        assert_eq!(session.steps_taken(), 1);

        session.close();
        assert!(session.is_closed());
        assert_eq!(backend.probe.closes.get(), 1);
    }

    #[test]
    fn test_step_after_close_fails() {
        let backend = ScriptedBackend::new();
        let mut session = SimulationSession::open(&backend, "test_scene", stereo_config()).unwrap();

        session.close();
        session.close();
        assert!(matches!(
            session.step(Action::TurnRight),
            Err(StereoError::SessionClosed)
        ));
        drop(session);

        // Explicit close twice plus drop still releases exactly once
        assert_eq!(backend.probe.closes.get(), 1);
        assert_eq!(backend.probe.steps.get(), 0);
    }

    #[test]
    fn test_drop_releases_simulator() {
        let backend = ScriptedBackend::new();
        {
            let mut session =
                SimulationSession::open(&backend, "test_scene", stereo_config()).unwrap();
            session.step(Action::TurnLeft).unwrap();
        }
        assert_eq!(backend.probe.closes.get(), 1);
    }

    #[test]
    fn test_unknown_scene() {
        let backend = ScriptedBackend::new();
        let result = SimulationSession::open(&backend, "castle.glb", stereo_config());

        assert!(matches!(result, Err(StereoError::SceneLoad(ref s)) if s == "castle.glb"));
        assert_eq!(backend.probe.loads.get(), 0);
    }

    #[test]
    fn test_duplicate_uuids_rejected_before_load() {
        let backend = ScriptedBackend::new();
        let mut config = stereo_config();
        config.sensor_specifications[1].uuid = "left_sensor".to_string();

        let result = SimulationSession::open(&backend, "test_scene", config);
        assert!(matches!(result, Err(StereoError::Configuration(_))));
        assert_eq!(backend.probe.loads.get(), 0);
    }

    #[test]
    fn test_invalid_action_space_rejected() {
        let backend = ScriptedBackend::new();
        let mut config = stereo_config();
        config.action_space.turn_angle_deg = 0.0;

        assert!(matches!(
            SimulationSession::open(&backend, "test_scene", config),
            Err(StereoError::Configuration(_))
        ));
        assert!(matches!(
            SimulationSession::open(&backend, "test_scene", AgentConfiguration::new(vec![])),
            Err(StereoError::Configuration(_))
        ));
    }

    #[test]
    fn test_step_fault_reports_step_index() {
        let mut backend = ScriptedBackend::new();
        backend.fail_at_step = Some(3);
        let mut session = SimulationSession::open(&backend, "test_scene", stereo_config()).unwrap();

        session.step(Action::TurnRight).unwrap();
        session.step(Action::TurnRight).unwrap();
        match session.step(Action::TurnRight) {
            Err(StereoError::SimulationStep { step, .. }) => assert_eq!(step, 3),
            other => panic!("unexpected result: {:?}", other.map(|o| o.step)),
        }
        assert_eq!(session.steps_taken(), 2);
    }
}
