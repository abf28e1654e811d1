use crate::layout::{self, CupPlacement, WheelLayout, CUP_RING_HEIGHT};
use crate::math;
use crate::params::WheelParameters;
use crate::templates::{self, MeshRegistry, MeshTemplate};
use rand::Rng;
use std::f64::consts::PI;
use std::sync::Arc;

/// Fixed cosmetic tilt of the whole wheel about the forward axis.
pub const WHEEL_TILT: f64 = PI / 32.0;
/// Vertical stretch applied to every per-cup group.
pub const CUP_STRETCH: f64 = 3.0;
/// Lift of the water surface inside its cup, in group units.
pub const WATER_LIFT: f64 = 4.0;
/// The base pedestal never changes with the wheel parameters.
pub const BASE_RADIUS: f64 = 15.0;
pub const BASE_HEIGHT: f64 = 240.0;
const BASE_SEGMENTS: usize = 32;

/// Shading description attached to each mesh instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [u8; 3],
    pub opacity: f64,
    /// Translucent materials blend over the frame and skip the depth buffer.
    pub translucent: bool,
}

impl Material {
    pub const TRANSLUCENT_CUP: Material = Material {
        color: [255, 255, 255],
        opacity: 0.1,
        translucent: true,
    };
    pub const WATER: Material = Material {
        color: [160, 160, 255],
        opacity: 1.0,
        translucent: false,
    };
    pub const RIM: Material = Material {
        color: [230, 230, 230],
        opacity: 1.0,
        translucent: false,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Unit vector pointing from the scene toward the light.
    pub direction: [f64; 3],
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct HemisphereLight {
    pub sky: f64,
    pub ground: f64,
}

/// Fixed scene dressing, constant across all configurations.
#[derive(Debug, Clone, Copy)]
pub struct Lights {
    pub directional: DirectionalLight,
    pub hemisphere: HemisphereLight,
}

impl Lights {
    fn fixed() -> Lights {
        Lights {
            directional: DirectionalLight {
                direction: math::normalize(&[-10000.0, 100.0, 20000.0]),
                intensity: 0.8,
            },
            hemisphere: HemisphereLight {
                sky: 0x09 as f64 / 255.0,
                ground: 0xa0 as f64 / 255.0,
            },
        }
    }

    /// Shading intensity for a world-space normal: a Lambert term from the
    /// directional light plus the hemisphere blend by the normal's upness.
    pub fn intensity(&self, normal: &[f64; 3]) -> f64 {
        let lambert =
            math::dot(normal, &self.directional.direction).max(0.0) * self.directional.intensity;
        let upness = (normal[1] + 1.0) / 2.0;
        let hemisphere = self.hemisphere.ground * (1.0 - upness) + self.hemisphere.sky * upness;
        (lambert + hemisphere).min(1.0)
    }
}

/// One renderable instantiation of a shared mesh template. The position is
/// not affected by the instance's own scale, matching group-transform order.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub mesh: Arc<MeshTemplate>,
    pub material: Material,
    pub position: [f64; 3],
    pub scale: [f64; 3],
}

/// A cup and its water, grouped at the cup's placement on the ring and
/// stretched vertically by the fixed factor.
#[derive(Debug, Clone)]
pub struct CupInstance {
    pub placement: CupPlacement,
    pub stretch: [f64; 3],
    pub cup: MeshInstance,
    pub water: MeshInstance,
}

/// The rotating group: every cup of the wheel plus the rotation currently
/// applied to them. The rim and base stay outside so they never spin.
#[derive(Debug)]
pub struct CupRing {
    pub cups: Vec<CupInstance>,
    pub rotation: f64,
}

#[derive(Debug)]
pub struct WheelAssembly {
    pub ring: CupRing,
    pub rim: MeshInstance,
    pub tilt: f64,
}

/// Everything the renderer consumes. Exactly one of these is live at a time;
/// structural parameter changes replace it wholesale.
#[derive(Debug)]
pub struct SceneState {
    pub wheel: WheelAssembly,
    pub base: MeshInstance,
    pub lights: Lights,
}

impl SceneState {
    /// Rotation-only update: touches the rotating group's orientation and
    /// nothing else.
    pub fn set_rotation(&mut self, rotation: f64) {
        self.wheel.ring.rotation = rotation;
    }

    pub fn rotation(&self) -> f64 {
        self.wheel.ring.rotation
    }
}

/// Builds the per-cup instances for a layout. Each cup group sits at its
/// placement, holds a uniformly scaled translucent cup and a water slab whose
/// height is jittered by the injected generator for visual variety.
pub fn build_cups<R: Rng>(registry: &MeshRegistry, wheel: &WheelLayout, rng: &mut R) -> CupRing {
    let scale = wheel.cup_scale;
    let cups = wheel
        .placements
        .iter()
        .map(|&placement| CupInstance {
            placement,
            stretch: [1.0, CUP_STRETCH, 1.0],
            cup: MeshInstance {
                mesh: Arc::clone(&registry.cup),
                material: Material::TRANSLUCENT_CUP,
                position: [0.0, 0.0, 0.0],
                scale: [scale, scale, scale],
            },
            water: MeshInstance {
                mesh: Arc::clone(&registry.water),
                material: Material::WATER,
                position: [0.0, WATER_LIFT, 0.0],
                scale: [scale, scale * rng.gen::<f64>(), scale],
            },
        })
        .collect();
    CupRing {
        cups,
        rotation: 0.0,
    }
}

/// Assembles a complete scene for the given parameters: cup ring, rim
/// outline scaled to the radius, fixed base pedestal and fixed lights.
pub fn build_scene<R: Rng>(
    registry: &MeshRegistry,
    params: &WheelParameters,
    rng: &mut R,
) -> SceneState {
    let wheel = layout::layout(params);
    let ring = build_cups(registry, &wheel, rng);
    let radius = params.radius();
    let rim = MeshInstance {
        mesh: Arc::clone(&registry.rim),
        material: Material::RIM,
        position: [0.0, CUP_RING_HEIGHT, 0.0],
        scale: [radius, radius, radius],
    };
    // Top of the pedestal meets the wheel plane at y = 0.
    let base = MeshInstance {
        mesh: Arc::new(templates::cylinder(BASE_RADIUS, BASE_HEIGHT, BASE_SEGMENTS)),
        material: Material::RIM,
        position: [0.0, -BASE_HEIGHT / 2.0, 0.0],
        scale: [1.0, 1.0, 1.0],
    };
    SceneState {
        wheel: WheelAssembly {
            ring,
            rim,
            tilt: WHEEL_TILT,
        },
        base,
        lights: Lights::fixed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry() -> MeshRegistry {
        MeshRegistry::build().unwrap()
    }

    fn params(cup_count: usize, radius: f64) -> WheelParameters {
        WheelParameters::try_new(cup_count, radius, 0.0).unwrap()
    }

    #[test]
    fn builds_one_instance_pair_per_placement() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(1);
        let scene = build_scene(&registry, &params(24, 500.0), &mut rng);
        assert_eq!(scene.wheel.ring.cups.len(), 24);
        for cup in &scene.wheel.ring.cups {
            assert!(Arc::ptr_eq(&cup.cup.mesh, &registry.cup));
            assert!(Arc::ptr_eq(&cup.water.mesh, &registry.water));
            assert_eq!(cup.stretch, [1.0, CUP_STRETCH, 1.0]);
        }
    }

    #[test]
    fn cup_scale_is_uniform_and_water_fill_is_bounded() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(2);
        let wheel = layout::layout(&params(12, 400.0));
        let ring = build_cups(&registry, &wheel, &mut rng);
        for cup in &ring.cups {
            let [sx, sy, sz] = cup.cup.scale;
            assert_eq!(sx, wheel.cup_scale);
            assert_eq!(sy, wheel.cup_scale);
            assert_eq!(sz, wheel.cup_scale);

            let [wx, wy, wz] = cup.water.scale;
            assert_eq!(wx, wheel.cup_scale);
            assert_eq!(wz, wheel.cup_scale);
            assert!(wy >= 0.0 && wy < wheel.cup_scale);
            assert_eq!(cup.water.position, [0.0, WATER_LIFT, 0.0]);
        }
    }

    #[test]
    fn seeded_fills_are_reproducible() {
        let registry = registry();
        let wheel = layout::layout(&params(40, 500.0));
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let first = build_cups(&registry, &wheel, &mut a);
        let second = build_cups(&registry, &wheel, &mut b);
        for (x, y) in first.cups.iter().zip(&second.cups) {
            assert_eq!(x.water.scale, y.water.scale);
        }
    }

    #[test]
    fn rebuilds_are_structurally_identical() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(3);
        let first = build_scene(&registry, &params(16, 700.0), &mut rng);
        let second = build_scene(&registry, &params(16, 700.0), &mut rng);
        let placements = |scene: &SceneState| -> Vec<CupPlacement> {
            scene.wheel.ring.cups.iter().map(|c| c.placement).collect()
        };
        assert_eq!(placements(&first), placements(&second));
        // Same templates, distinct instances.
        assert!(Arc::ptr_eq(
            &first.wheel.ring.cups[0].cup.mesh,
            &second.wheel.ring.cups[0].cup.mesh
        ));
        assert_ne!(
            first.wheel.ring.cups.as_ptr(),
            second.wheel.ring.cups.as_ptr()
        );
    }

    #[test]
    fn fixed_dressing_ignores_the_parameters() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(4);
        let narrow = build_scene(&registry, &params(4, 100.0), &mut rng);
        let wide = build_scene(&registry, &params(300, 1000.0), &mut rng);
        assert_eq!(narrow.wheel.tilt, WHEEL_TILT);
        assert_eq!(wide.wheel.tilt, WHEEL_TILT);
        assert_eq!(narrow.base.position, [0.0, -BASE_HEIGHT / 2.0, 0.0]);
        assert_eq!(narrow.base.position, wide.base.position);
        // The rim tracks the radius, the base does not.
        assert_eq!(narrow.wheel.rim.scale, [100.0, 100.0, 100.0]);
        assert_eq!(wide.wheel.rim.scale, [1000.0, 1000.0, 1000.0]);
    }

    #[test]
    fn rotation_update_leaves_instances_alone() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(5);
        let mut scene = build_scene(&registry, &params(8, 500.0), &mut rng);
        let before: Vec<[f64; 3]> = scene
            .wheel
            .ring
            .cups
            .iter()
            .map(|c| c.placement.position)
            .collect();
        scene.set_rotation(1.25);
        assert_relative_eq!(scene.rotation(), 1.25);
        let after: Vec<[f64; 3]> = scene
            .wheel
            .ring
            .cups
            .iter()
            .map(|c| c.placement.position)
            .collect();
        assert_eq!(before, after);
    }
}
