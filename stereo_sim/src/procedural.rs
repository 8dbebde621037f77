//! Procedural ray-cast simulator.
//!
//! Renders the built-in rooms from every sensor of one agent:
//! - **Color**: wall panels, floor checkerboard, ceiling
//! - **Depth**: z-depth along the optical axis (meters)
//! - **Semantic**: wall panel index, `FLOOR_ID`, `CEILING_ID`
//!
//! Each sensor is a pinhole camera with square pixels mounted at
//! `agent.position + R(yaw) * offset`, looking along the agent heading.
//! Rays are cast through pixel centers with the camera-space direction
//! `(u, v, -1)`, so the hit parameter `t` is directly the z-depth.

use crate::scene::{SceneCatalog, SceneDescriptor, CEILING_ID, FLOOR_ID};
use nalgebra::{DMatrix, Rotation3, Vector3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use stereo_env::{
    Action, AgentConfiguration, EnvError, Modality, Observation, ObservationSet, Rgb, SensorSpec,
    Simulator, SimulatorBackend,
};
use tracing::debug;

/// Keep sensors at least this far from the wall (meters).
const WALL_MARGIN: f64 = 0.1;

/// Configuration for the procedural backend.
#[derive(Debug, Clone)]
pub struct ProceduralConfig {
    /// Seed for depth noise
    pub seed: u64,

    /// Depth noise standard deviation (meters, 0 = noiseless)
    pub depth_noise_std: f64,

    /// Horizontal field of view of every sensor (degrees)
    pub hfov_deg: f64,

    /// Inject a `StepFault` on this step (1-based)
    pub fail_at_step: Option<u64>,
}

impl Default for ProceduralConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            depth_noise_std: 0.0,
            hfov_deg: 90.0,
            fail_at_step: None,
        }
    }
}

/// Agent pose on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Agent origin (meters), `y = 0` on the floor
    pub position: Vector3<f64>,

    /// Heading about +Y (radians); 0 faces -Z, positive turns left
    pub yaw: f64,
}

impl Pose {
    fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            yaw: 0.0,
        }
    }
}

/// Factory for [`ProceduralSimulator`] instances.
#[derive(Debug, Clone, Default)]
pub struct ProceduralBackend {
    pub config: ProceduralConfig,
    pub catalog: SceneCatalog,
}

impl ProceduralBackend {
    pub fn new(config: ProceduralConfig) -> Self {
        Self {
            config,
            catalog: SceneCatalog::builtin(),
        }
    }
}

impl SimulatorBackend for ProceduralBackend {
    type Sim = ProceduralSimulator;

    fn load(&self, scene_id: &str, agent: &AgentConfiguration) -> Result<ProceduralSimulator, EnvError> {
        let scene = self
            .catalog
            .get(scene_id)
            .cloned()
            .ok_or_else(|| EnvError::SceneNotFound(scene_id.to_string()))?;

        if !(self.config.hfov_deg > 0.0 && self.config.hfov_deg < 180.0) {
            return Err(EnvError::InvalidConfiguration(format!(
                "hfov must be in (0, 180) degrees, got {}",
                self.config.hfov_deg
            )));
        }

        let mut reach = 0.0f64;
        for spec in &agent.sensor_specifications {
            let o = spec.offset;
            if o.y <= 0.0 || o.y >= scene.wall_height {
                return Err(EnvError::InvalidConfiguration(format!(
                    "sensor '{}' at height {} is outside the room (0, {})",
                    spec.uuid, o.y, scene.wall_height
                )));
            }
            reach = reach.max(o.x.hypot(o.z));
        }
        let roam_radius = scene.radius - reach - WALL_MARGIN;
        if roam_radius <= 0.0 {
            return Err(EnvError::InvalidConfiguration(format!(
                "sensor reach {:.2} m does not fit in '{}' (radius {} m)",
                reach, scene.name, scene.radius
            )));
        }

        let noise_std = self.config.depth_noise_std;
        if !(noise_std.is_finite() && noise_std >= 0.0) {
            return Err(EnvError::InvalidConfiguration(format!(
                "depth noise std must be finite and >= 0, got {}",
                noise_std
            )));
        }

        let noise = if noise_std > 0.0 {
            Some(Normal::new(0.0, noise_std).map_err(|e| {
                EnvError::InvalidConfiguration(format!("depth noise: {}", e))
            })?)
        } else {
            None
        };

        debug!(scene = scene.name, sensors = agent.sensor_specifications.len(), "Procedural scene loaded");

        Ok(ProceduralSimulator {
            scene,
            agent: agent.clone(),
            pose: Pose::default(),
            roam_radius,
            focal_scale: 1.0 / (self.config.hfov_deg.to_radians() / 2.0).tan(),
            noise,
            rng: ChaCha8Rng::seed_from_u64(self.config.seed),
            fail_at_step: self.config.fail_at_step,
            step: 0,
            closed: false,
        })
    }
}

/// What a ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Surface {
    Wall { phi: f64 },
    Floor,
    Ceiling,
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    t: f64,
    point: Vector3<f64>,
    surface: Surface,
}

/// One agent in one procedural room.
pub struct ProceduralSimulator {
    scene: SceneDescriptor,
    agent: AgentConfiguration,
    pose: Pose,

    /// Max distance of the agent origin from the room center
    roam_radius: f64,

    /// `1 / tan(hfov / 2)`
    focal_scale: f64,

    noise: Option<Normal<f64>>,
    rng: ChaCha8Rng,
    fail_at_step: Option<u64>,
    step: u64,
    closed: bool,
}

impl ProceduralSimulator {
    /// Current agent pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    fn apply(&mut self, action: &Action) {
        let space = self.agent.action_space;
        match action {
            Action::TurnLeft => self.pose.yaw += space.turn_angle_deg.to_radians(),
            Action::TurnRight => self.pose.yaw -= space.turn_angle_deg.to_radians(),
            Action::MoveForward => {
                let heading = self.pose.rotation() * Vector3::new(0.0, 0.0, -1.0);
                let mut next = self.pose.position + heading * space.forward_step;
                let planar = next.x.hypot(next.z);
                if planar > self.roam_radius {
                    let scale = self.roam_radius / planar;
                    next.x *= scale;
                    next.z *= scale;
                }
                self.pose.position = next;
            }
        }
        self.pose.yaw = self.pose.yaw.rem_euclid(std::f64::consts::TAU);
    }

    fn render(&mut self, spec: &SensorSpec) -> Observation {
        let (w, h) = (spec.resolution.width, spec.resolution.height);
        let rotation = self.pose.rotation();
        let origin = self.pose.position + rotation * spec.offset;
        // Pixels per unit of image-plane distance
        let focal = (w as f64 / 2.0) * self.focal_scale;

        let cast = |row: usize, col: usize| -> Hit {
            let u = (col as f64 + 0.5 - w as f64 / 2.0) / focal;
            let v = -(row as f64 + 0.5 - h as f64 / 2.0) / focal;
            let dir = rotation * Vector3::new(u, v, -1.0);
            intersect(&self.scene, &origin, &dir)
        };

        match spec.modality {
            Modality::Color => Observation::Color(DMatrix::from_fn(h, w, |r, c| {
                let hit = cast(r, c);
                shade(&self.scene, &hit)
            })),
            Modality::Semantic => Observation::Semantic(DMatrix::from_fn(h, w, |r, c| {
                match cast(r, c).surface {
                    Surface::Wall { phi } => self.scene.panel_index(phi),
                    Surface::Floor => FLOOR_ID,
                    Surface::Ceiling => CEILING_ID,
                }
            })),
            Modality::Depth => {
                let mut depth = DMatrix::from_fn(h, w, |r, c| cast(r, c).t as f32);
                if let Some(noise) = self.noise {
                    let rng = &mut self.rng;
                    depth.apply(|d| *d += noise.sample(rng) as f32);
                }
                Observation::Depth(depth)
            }
        }
    }
}

impl Simulator for ProceduralSimulator {
    fn step(&mut self, action: &Action) -> Result<ObservationSet, EnvError> {
        if self.closed {
            return Err(EnvError::Closed);
        }

        self.step += 1;
        if self.fail_at_step == Some(self.step) {
            return Err(EnvError::step_fault(format!(
                "injected fault at step {}",
                self.step
            )));
        }

        self.apply(action);

        let mut set = ObservationSet::new(self.step);
        let sensors = self.agent.sensor_specifications.clone();
        for spec in &sensors {
            let obs = self.render(spec);
            set.insert(spec.uuid.clone(), obs);
        }
        Ok(set)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Nearest surface along `origin + t * dir`, `t > 0`.
///
/// The origin is inside the room, so the wall root with the `+` sign is the
/// only positive one.
fn intersect(scene: &SceneDescriptor, origin: &Vector3<f64>, dir: &Vector3<f64>) -> Hit {
    let mut best = (f64::INFINITY, Surface::Ceiling);

    let a = dir.x * dir.x + dir.z * dir.z;
    if a > f64::EPSILON {
        let b = 2.0 * (origin.x * dir.x + origin.z * dir.z);
        let c = origin.x * origin.x + origin.z * origin.z - scene.radius * scene.radius;
        let t = (-b + (b * b - 4.0 * a * c).sqrt()) / (2.0 * a);
        let p = origin + dir * t;
        best = (t, Surface::Wall { phi: p.z.atan2(p.x) });
    }

    if dir.y < 0.0 {
        let t = -origin.y / dir.y;
        if t < best.0 {
            best = (t, Surface::Floor);
        }
    } else if dir.y > 0.0 {
        let t = (scene.wall_height - origin.y) / dir.y;
        if t < best.0 {
            best = (t, Surface::Ceiling);
        }
    }

    Hit {
        t: best.0,
        point: origin + dir * best.0,
        surface: best.1,
    }
}

fn shade(scene: &SceneDescriptor, hit: &Hit) -> Rgb {
    match hit.surface {
        Surface::Wall { phi } => scene.wall_color(phi, hit.point.y),
        Surface::Floor => scene.floor_color(hit.point.x, hit.point.z),
        Surface::Ceiling => scene.ceiling_color(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use stereo_env::Resolution;

    fn stereo_agent(modality: Modality, side: usize) -> AgentConfiguration {
        let res = Resolution::square(side);
        AgentConfiguration::new(vec![
            SensorSpec::new("left_sensor", res, Vector3::new(-0.25, 1.5, 0.0), modality),
            SensorSpec::new("right_sensor", res, Vector3::new(0.25, 1.5, 0.0), modality),
        ])
    }

    fn depth_of(obs: &Observation) -> &DMatrix<f32> {
        match obs {
            Observation::Depth(m) => m,
            other => panic!("expected depth, got {:?}", other.modality()),
        }
    }

    #[test]
    fn test_unknown_scene() {
        let backend = ProceduralBackend::default();
        let err = backend
            .load("skokloster-castle.glb", &stereo_agent(Modality::Color, 8))
            .err()
            .unwrap();
        assert!(matches!(err, EnvError::SceneNotFound(_)));
    }

    #[test]
    fn test_sensor_outside_room_rejected() {
        let backend = ProceduralBackend::default();
        let mut agent = stereo_agent(Modality::Color, 8);
        agent.sensor_specifications[0].offset.y = 4.0;

        let err = backend.load("rotunda", &agent).err().unwrap();
        assert!(matches!(err, EnvError::InvalidConfiguration(_)));

        let mut agent = stereo_agent(Modality::Color, 8);
        agent.sensor_specifications[1].offset.x = 7.0;
        assert!(backend.load("rotunda", &agent).is_err());
    }

    #[test]
    fn test_step_renders_every_sensor() {
        let backend = ProceduralBackend::default();
        let mut sim = backend.load("rotunda", &stereo_agent(Modality::Color, 16)).unwrap();

        let obs = sim.step(&Action::TurnRight).unwrap();
        assert_eq!(obs.step, 1);
        assert_eq!(obs.len(), 2);
        for uuid in ["left_sensor", "right_sensor"] {
            let o = obs.get(uuid).unwrap();
            assert_eq!(o.modality(), Modality::Color);
            assert_eq!(o.resolution(), Resolution::square(16));
        }
    }

    #[test]
    fn test_center_pixel_depth_reaches_wall() {
        let backend = ProceduralBackend::default();
        let mut sim = backend.load("rotunda", &stereo_agent(Modality::Depth, 64)).unwrap();

        let obs = sim.step(&Action::TurnRight).unwrap();
        let depth = depth_of(obs.get("left_sensor").unwrap());

        // Looking almost straight at the wall 6 m away
        let center = depth[(32, 32)] as f64;
        assert!(center > 5.8 && center < 6.0, "center depth {}", center);

        // Bottom row sees the floor 1.5 m below: t = 1.5 / |v|
        let bottom = depth[(63, 32)] as f64;
        assert_relative_eq!(bottom, 1.5 / (31.5 / 32.0), epsilon = 1e-4);
    }

    #[test]
    fn test_depth_is_bounded_by_room() {
        let backend = ProceduralBackend::default();
        let mut sim = backend.load("atrium", &stereo_agent(Modality::Depth, 24)).unwrap();

        for _ in 0..5 {
            let obs = sim.step(&Action::MoveForward).unwrap();
            for uuid in ["left_sensor", "right_sensor"] {
                for &d in depth_of(obs.get(uuid).unwrap()).iter() {
                    assert!(d.is_finite() && d > 0.0 && d < 18.0);
                }
            }
        }
    }

    #[test]
    fn test_stereo_pair_has_disparity() {
        let backend = ProceduralBackend::default();
        let mut sim = backend.load("rotunda", &stereo_agent(Modality::Color, 32)).unwrap();

        let obs = sim.step(&Action::TurnRight).unwrap();
        assert_ne!(obs.get("left_sensor"), obs.get("right_sensor"));
    }

    #[test]
    fn test_turning_changes_view_and_wraps_yaw() {
        let backend = ProceduralBackend::default();
        let mut sim = backend.load("rotunda", &stereo_agent(Modality::Semantic, 16)).unwrap();

        let first = sim.step(&Action::TurnRight).unwrap();
        let second = sim.step(&Action::TurnRight).unwrap();
        assert_ne!(first.get("left_sensor"), second.get("left_sensor"));

        for _ in 0..34 {
            sim.step(&Action::TurnRight).unwrap();
        }
        assert_relative_eq!(sim.pose().yaw.sin(), 0.0, epsilon = 1e-9);
        assert!(sim.pose().yaw >= 0.0 && sim.pose().yaw <= std::f64::consts::TAU);
    }

    #[test]
    fn test_forward_motion_stays_inside_room() {
        let backend = ProceduralBackend::default();
        let mut sim = backend.load("rotunda", &stereo_agent(Modality::Semantic, 4)).unwrap();

        for _ in 0..100 {
            sim.step(&Action::MoveForward).unwrap();
        }
        let p = sim.pose().position;
        assert!(p.x.hypot(p.z) <= 6.0 - 0.25 - WALL_MARGIN + 1e-9);
        assert!(p.z < -5.0);
    }

    #[test]
    fn test_depth_noise_is_seeded() {
        let config = ProceduralConfig {
            depth_noise_std: 0.05,
            ..Default::default()
        };
        let backend = ProceduralBackend::new(config);
        let agent = stereo_agent(Modality::Depth, 8);

        let mut a = backend.load("rotunda", &agent).unwrap();
        let mut b = backend.load("rotunda", &agent).unwrap();
        let oa = a.step(&Action::TurnLeft).unwrap();
        let ob = b.step(&Action::TurnLeft).unwrap();
        assert_eq!(oa.get("left_sensor"), ob.get("left_sensor"));

        let clean = ProceduralBackend::default()
            .load("rotunda", &agent)
            .unwrap()
            .step(&Action::TurnLeft)
            .unwrap();
        assert_ne!(oa.get("left_sensor"), clean.get("left_sensor"));
    }

    #[test]
    fn test_invalid_depth_noise_rejected() {
        let agent = stereo_agent(Modality::Depth, 4);
        for std in [-0.1, f64::NAN, f64::INFINITY] {
            let backend = ProceduralBackend::new(ProceduralConfig {
                depth_noise_std: std,
                ..Default::default()
            });
            assert!(matches!(
                backend.load("rotunda", &agent),
                Err(EnvError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_fault_injection_and_close() {
        let config = ProceduralConfig {
            fail_at_step: Some(2),
            ..Default::default()
        };
        let backend = ProceduralBackend::new(config);
        let mut sim = backend.load("rotunda", &stereo_agent(Modality::Color, 4)).unwrap();

        assert!(sim.step(&Action::TurnRight).is_ok());
        assert!(matches!(sim.step(&Action::TurnRight), Err(EnvError::StepFault(_))));

        sim.close();
        assert!(matches!(sim.step(&Action::TurnRight), Err(EnvError::Closed)));
    }
}
