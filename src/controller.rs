use crate::camera::Camera;
use crate::params::WheelParameters;
use crate::scene::{self, SceneState};
use crate::templates::MeshRegistry;
use log::info;
use rand::rngs::StdRng;
use std::sync::Arc;

/// Owns the live scene and camera, and routes every parameter change down one
/// of two channels: structural changes (cup count, radius) rebuild the scene
/// wholesale before the next render; rotation and viewport changes update the
/// existing scene and camera in place without touching any instance.
pub struct SceneController {
    registry: Arc<MeshRegistry>,
    params: WheelParameters,
    scene: SceneState,
    camera: Camera,
    rng: StdRng,
}

impl SceneController {
    /// Mounts the controller: builds the initial scene and places the camera.
    /// The camera never moves again; only its aspect tracks the viewport.
    pub fn mount(registry: Arc<MeshRegistry>, params: WheelParameters, mut rng: StdRng) -> Self {
        let mut scene = scene::build_scene(&registry, &params, &mut rng);
        scene.set_rotation(params.rotation());
        SceneController {
            registry,
            params,
            scene,
            camera: Camera::mounted(1.0),
            rng,
        }
    }

    /// Applies a parameter update. Runs synchronously, so a rebuild is always
    /// complete by the time the caller renders.
    pub fn sync(&mut self, params: WheelParameters) {
        if params.structurally_differs_from(&self.params) {
            info!(
                "rebuilding wheel: {} cups, radius {:.0}",
                params.cup_count(),
                params.radius()
            );
            self.scene = scene::build_scene(&self.registry, &params, &mut self.rng);
        }
        self.scene.set_rotation(params.rotation());
        self.params = params;
    }

    /// Viewport changes reach the camera without a structural rebuild.
    pub fn sync_viewport(&mut self, width: f64, height: f64) {
        self.camera.set_aspect(width, height);
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn params(&self) -> &WheelParameters {
        &self.params
    }
}
