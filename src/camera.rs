use crate::math;

/// Perspective camera fixed at the mount-time vantage point. Only the aspect
/// ratio ever changes after mount, tracking the viewport.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: [f64; 3],
    /// Fixed downward pitch, in radians.
    pub pitch: f64,
    /// Vertical field of view, in degrees.
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub aspect: f64,
}

impl Camera {
    pub fn mounted(aspect: f64) -> Camera {
        Camera {
            position: [-0.7, 300.0, 1000.0],
            pitch: -0.2,
            fov: 75.0,
            near: 1.0,
            far: 10000.0,
            aspect,
        }
    }

    pub fn set_aspect(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// World point into view space: x right, y up, z the distance in front of
    /// the camera.
    pub fn view_point(&self, point: &[f64; 3]) -> [f64; 3] {
        let translated = math::sub(point, &self.position);
        let rotated = math::multiply_matrix_vector(&math::rotation_x(-self.pitch), &translated);
        [rotated[0], rotated[1], -rotated[2]]
    }

    /// Projects a view-space point to pixel coordinates. `None` outside the
    /// near/far range.
    pub fn project(&self, view: &[f64; 3], width: f64, height: f64) -> Option<[f64; 2]> {
        let depth = view[2];
        if depth < self.near || depth > self.far {
            return None;
        }
        let focal = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let ndc_x = view[0] * focal / self.aspect / depth;
        let ndc_y = view[1] * focal / depth;
        Some([
            (ndc_x + 1.0) / 2.0 * width,
            (1.0 - ndc_y) / 2.0 * height,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn points_straight_ahead_land_near_the_screen_center() {
        let camera = Camera {
            position: [0.0, 0.0, 100.0],
            pitch: 0.0,
            ..Camera::mounted(1.0)
        };
        let view = camera.view_point(&[0.0, 0.0, 0.0]);
        assert_relative_eq!(view[2], 100.0, epsilon = 1e-12);
        let screen = camera.project(&view, 800.0, 600.0).unwrap();
        assert_relative_eq!(screen[0], 400.0, epsilon = 1e-9);
        assert_relative_eq!(screen[1], 300.0, epsilon = 1e-9);
    }

    #[test]
    fn depth_range_is_clipped() {
        let camera = Camera::mounted(1.5);
        assert!(camera.project(&[0.0, 0.0, 0.5], 800.0, 600.0).is_none());
        assert!(camera.project(&[0.0, 0.0, 10001.0], 800.0, 600.0).is_none());
        assert!(camera.project(&[0.0, 0.0, 500.0], 800.0, 600.0).is_some());
    }

    #[test]
    fn viewport_changes_only_touch_the_aspect() {
        let mut camera = Camera::mounted(1.0);
        let position = camera.position;
        camera.set_aspect(1600.0, 900.0);
        assert_relative_eq!(camera.aspect, 16.0 / 9.0, epsilon = 1e-12);
        assert_eq!(camera.position, position);
        // Degenerate viewports are ignored.
        camera.set_aspect(0.0, 900.0);
        assert_relative_eq!(camera.aspect, 16.0 / 9.0, epsilon = 1e-12);
    }

    #[test]
    fn farther_points_shrink_toward_the_center() {
        let camera = Camera::mounted(1.0);
        let near = camera.project(&[50.0, 0.0, 200.0], 800.0, 600.0).unwrap();
        let far = camera.project(&[50.0, 0.0, 2000.0], 800.0, 600.0).unwrap();
        assert!((near[0] - 400.0).abs() > (far[0] - 400.0).abs());
    }
}
