//! Built-in procedural scenes.
//!
//! Every scene is a closed cylindrical room centered on the origin: a
//! checkerboard floor at `y = 0`, a flat ceiling at `y = wall_height`, and a
//! wall split into equal angular panels of alternating colors.

use stereo_env::Rgb;

/// Geometry and palette of one room.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescriptor {
    /// Scene id used by `SimulatorBackend::load`
    pub name: &'static str,

    /// Wall radius (meters)
    pub radius: f64,

    /// Ceiling height (meters)
    pub wall_height: f64,

    /// Number of wall panels around the circumference
    pub panels: u32,
}

/// Panel colors, cycled around the wall.
const PANEL_PALETTE: [Rgb; 6] = [
    Rgb([200, 60, 60]),
    Rgb([60, 160, 70]),
    Rgb([60, 90, 200]),
    Rgb([210, 180, 50]),
    Rgb([150, 70, 170]),
    Rgb([50, 170, 170]),
];

const FLOOR_DARK: Rgb = Rgb([70, 70, 70]);
const FLOOR_LIGHT: Rgb = Rgb([150, 150, 150]);
const CEILING: Rgb = Rgb([225, 225, 215]);

/// Semantic id of the floor.
pub const FLOOR_ID: u32 = 1000;

/// Semantic id of the ceiling.
pub const CEILING_ID: u32 = 1001;

impl SceneDescriptor {
    /// Color of the wall at azimuth `phi` (radians) and height `y`.
    ///
    /// Panels darken toward the floor so vertical structure is visible.
    pub fn wall_color(&self, phi: f64, y: f64) -> Rgb {
        let base = PANEL_PALETTE[self.panel_index(phi) as usize % PANEL_PALETTE.len()];
        let shade = 0.55 + 0.45 * (y / self.wall_height).clamp(0.0, 1.0);
        Rgb(base.0.map(|c| (c as f64 * shade).round() as u8))
    }

    /// Floor checkerboard with 1 m tiles.
    pub fn floor_color(&self, x: f64, z: f64) -> Rgb {
        let parity = (x.floor() as i64 + z.floor() as i64).rem_euclid(2);
        if parity == 0 {
            FLOOR_DARK
        } else {
            FLOOR_LIGHT
        }
    }

    pub fn ceiling_color(&self) -> Rgb {
        CEILING
    }

    /// Wall panel hit at azimuth `phi`, in `0..panels`.
    pub fn panel_index(&self, phi: f64) -> u32 {
        let turn = (phi + std::f64::consts::PI) / std::f64::consts::TAU;
        ((turn * self.panels as f64).floor() as u32).min(self.panels - 1)
    }
}

/// Scenes available to the procedural backend.
#[derive(Debug, Clone)]
pub struct SceneCatalog {
    scenes: Vec<SceneDescriptor>,
}

impl SceneCatalog {
    /// The two stock rooms: `rotunda` and `atrium`.
    pub fn builtin() -> Self {
        Self {
            scenes: vec![
                SceneDescriptor {
                    name: "rotunda",
                    radius: 6.0,
                    wall_height: 3.0,
                    panels: 24,
                },
                SceneDescriptor {
                    name: "atrium",
                    radius: 9.0,
                    wall_height: 5.0,
                    panels: 36,
                },
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&SceneDescriptor> {
        self.scenes.iter().find(|s| s.name == name)
    }

    /// Scene ids in catalog order.
    pub fn names(&self) -> Vec<&'static str> {
        self.scenes.iter().map(|s| s.name).collect()
    }
}

impl Default for SceneCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_builtin_catalog() {
        let catalog = SceneCatalog::builtin();
        assert_eq!(catalog.names(), vec!["rotunda", "atrium"]);
        assert_eq!(catalog.get("rotunda").unwrap().radius, 6.0);
        assert!(catalog.get("skokloster-castle.glb").is_none());
    }

    #[test]
    fn test_panel_index_covers_full_circle() {
        let scene = SceneCatalog::builtin().get("rotunda").cloned().unwrap();
        assert_eq!(scene.panel_index(-PI), 0);
        assert_eq!(scene.panel_index(PI), 23);
        assert_eq!(scene.panel_index(0.0), 12);
    }

    #[test]
    fn test_wall_shading_brightens_upward() {
        let scene = SceneCatalog::builtin().get("rotunda").cloned().unwrap();
        let low = scene.wall_color(0.1, 0.0);
        let high = scene.wall_color(0.1, 3.0);
        assert!(high.0[0] > low.0[0]);
        assert_eq!(high, PANEL_PALETTE[0]);
    }

    #[test]
    fn test_floor_checkerboard() {
        let scene = SceneCatalog::builtin().get("rotunda").cloned().unwrap();
        assert_ne!(scene.floor_color(0.5, 0.5), scene.floor_color(1.5, 0.5));
        assert_eq!(scene.floor_color(-0.5, -0.5), scene.floor_color(0.5, 0.5));
    }

    proptest! {
        #[test]
        fn prop_panel_index_in_range(phi in -PI..=PI, panels in 1u32..128) {
            let scene = SceneDescriptor {
                name: "test",
                radius: 5.0,
                wall_height: 3.0,
                panels,
            };
            prop_assert!(scene.panel_index(phi) < panels);
        }
    }
}
