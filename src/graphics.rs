use crate::camera::Camera;
use crate::math;
use crate::scene::{Lights, Material, MeshInstance, SceneState};
use crate::vertex::Vertex;
use druid::Color;

const ORIGIN: [f64; 3] = [0.0, 0.0, 0.0];
const UNIT: [f64; 3] = [1.0, 1.0, 1.0];

/// Draws one frame of the scene into the pixel and depth buffers. Opaque
/// geometry goes first, then the rim outline, and the translucent cups last
/// so they blend over everything behind them.
pub fn render_scene(
    scene: &SceneState,
    camera: &Camera,
    width: usize,
    height: usize,
    pixel_data: &mut [u8],
    z_buffer: &mut [f64],
    wireframe: bool,
) {
    if width == 0 || height == 0 {
        return;
    }
    let tilt = math::rotation_z(scene.wheel.tilt);
    let spin = math::multiply_matrices(&tilt, &math::rotation_y(scene.wheel.ring.rotation));
    let lights = &scene.lights;

    let mut frame = Frame {
        camera,
        width,
        height,
        pixel_data,
        z_buffer,
        wireframe,
    };

    frame.draw_instance(&scene.base, &ORIGIN, &UNIT, &math::IDENTITY, lights);
    for cup in &scene.wheel.ring.cups {
        frame.draw_instance(&cup.water, &cup.placement.position, &cup.stretch, &spin, lights);
    }
    frame.draw_instance(&scene.wheel.rim, &ORIGIN, &UNIT, &tilt, lights);
    for cup in &scene.wheel.ring.cups {
        frame.draw_instance(&cup.cup, &cup.placement.position, &cup.stretch, &spin, lights);
    }
}

struct Frame<'a> {
    camera: &'a Camera,
    width: usize,
    height: usize,
    pixel_data: &'a mut [u8],
    z_buffer: &'a mut [f64],
    wireframe: bool,
}

impl Frame<'_> {
    /// Transforms one mesh instance into world space through its group and
    /// orientation, projects it, and rasterizes its faces and edges. Faces
    /// with a vertex outside the depth range are skipped rather than clipped.
    fn draw_instance(
        &mut self,
        instance: &MeshInstance,
        group_position: &[f64; 3],
        group_scale: &[f64; 3],
        orientation: &[[f64; 3]; 3],
        lights: &Lights,
    ) {
        let template = &instance.mesh;
        let world: Vec<[f64; 3]> = template
            .positions
            .iter()
            .map(|v| {
                let local = math::add(
                    &instance.position,
                    &math::scale_components(&instance.scale, v),
                );
                let grouped = math::add(group_position, &math::scale_components(group_scale, &local));
                math::multiply_matrix_vector(orientation, &grouped)
            })
            .collect();

        // Accumulate face normals into vertex normals, as computed after the
        // transform so non-uniform group scaling shades correctly.
        let mut normals = vec![[0.0; 3]; world.len()];
        for &[a, b, c] in &template.faces {
            let normal = math::calculate_normal(&world[a], &world[b], &world[c]);
            for index in [a, b, c] {
                normals[index] = math::add(&normals[index], &normal);
            }
        }

        let shaded = !template.faces.is_empty();
        let (width_f, height_f) = (self.width as f64, self.height as f64);
        let vertices: Vec<Option<Vertex>> = world
            .iter()
            .zip(&normals)
            .map(|(point, normal)| {
                let view = self.camera.view_point(point);
                self.camera
                    .project(&view, width_f, height_f)
                    .map(|screen_position| Vertex {
                        position: view,
                        screen_position,
                        // Outline-only templates have no faces to shade.
                        normal: if shaded {
                            math::normalize(normal)
                        } else {
                            [0.0, 1.0, 0.0]
                        },
                    })
            })
            .collect();

        for &[a, b, c] in &template.faces {
            if let (Some(v0), Some(v1), Some(v2)) = (&vertices[a], &vertices[b], &vertices[c]) {
                if self.wireframe {
                    let color = Color::rgb8(40, 40, 40);
                    self.draw_edge(v0, v1, color.clone());
                    self.draw_edge(v1, v2, color.clone());
                    self.draw_edge(v2, v0, color);
                } else {
                    self.draw_triangle(v0, v1, v2, lights, &instance.material);
                }
            }
        }

        let [red, green, blue] = instance.material.color;
        let edge_color = math::apply_lighting(Color::rgb8(red, green, blue), 0.6);
        for &[a, b] in &template.edges {
            if let (Some(v0), Some(v1)) = (&vertices[a], &vertices[b]) {
                self.draw_edge(v0, v1, edge_color.clone());
            }
        }
    }

    fn draw_edge(&mut self, v0: &Vertex, v1: &Vertex, color: Color) {
        draw_line(
            v0.screen_position[0],
            v0.screen_position[1],
            v1.screen_position[0],
            v1.screen_position[1],
            self.pixel_data,
            self.width,
            self.height,
            color,
        );
    }

    /// Draws a triangle with per-pixel lighting. Faces are two-sided; the
    /// normal is flipped for back-facing triangles. Translucent materials
    /// blend over the frame and leave the depth buffer untouched.
    fn draw_triangle(
        &mut self,
        v0: &Vertex,
        v1: &Vertex,
        v2: &Vertex,
        lights: &Lights,
        material: &Material,
    ) {
        // Compute bounding box of the triangle
        let min_x = v0.screen_position[0]
            .min(v1.screen_position[0])
            .min(v2.screen_position[0])
            .floor()
            .max(0.0) as usize;
        let max_x = v0.screen_position[0]
            .max(v1.screen_position[0])
            .max(v2.screen_position[0])
            .ceil()
            .min(self.width as f64 - 1.0) as usize;
        let min_y = v0.screen_position[1]
            .min(v1.screen_position[1])
            .min(v2.screen_position[1])
            .floor()
            .max(0.0) as usize;
        let max_y = v0.screen_position[1]
            .max(v1.screen_position[1])
            .max(v2.screen_position[1])
            .ceil()
            .min(self.height as f64 - 1.0) as usize;

        let area = math::edge_function(
            &v0.screen_position,
            &v1.screen_position,
            &v2.screen_position,
        );
        if area == 0.0 {
            return;
        }
        let facing = if area < 0.0 { -1.0 } else { 1.0 };

        let [red, green, blue] = material.color;
        let base_color = Color::rgb8(red, green, blue);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = [x as f64 + 0.5, y as f64 + 0.5];

                // Normalizing by the signed area keeps both windings positive
                // inside the triangle.
                let w0 = math::edge_function(&v1.screen_position, &v2.screen_position, &p) / area;
                let w1 = math::edge_function(&v2.screen_position, &v0.screen_position, &p) / area;
                let w2 = math::edge_function(&v0.screen_position, &v1.screen_position, &p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth =
                    v0.position[2] * w0 + v1.position[2] * w1 + v2.position[2] * w2;
                let offset = y * self.width + x;

                if !material.translucent {
                    if depth >= self.z_buffer[offset] {
                        continue;
                    }
                    self.z_buffer[offset] = depth;
                }

                // Interpolate normal
                let nx = v0.normal[0] * w0 + v1.normal[0] * w1 + v2.normal[0] * w2;
                let ny = v0.normal[1] * w0 + v1.normal[1] * w1 + v2.normal[1] * w2;
                let nz = v0.normal[2] * w0 + v1.normal[2] * w1 + v2.normal[2] * w2;
                let normal = math::normalize(&[nx * facing, ny * facing, nz * facing]);

                let shaded = math::apply_lighting(base_color.clone(), lights.intensity(&normal));
                let (r, g, b, _) = shaded.as_rgba8();
                let pixel_offset = offset * 4;
                if material.translucent {
                    let alpha = material.opacity;
                    for (slot, src) in [r, g, b].into_iter().enumerate() {
                        let dst = self.pixel_data[pixel_offset + slot] as f64;
                        self.pixel_data[pixel_offset + slot] =
                            (src as f64 * alpha + dst * (1.0 - alpha)).min(255.0) as u8;
                    }
                } else {
                    self.pixel_data[pixel_offset] = r;
                    self.pixel_data[pixel_offset + 1] = g;
                    self.pixel_data[pixel_offset + 2] = b;
                }
                self.pixel_data[pixel_offset + 3] = 255;
            }
        }
    }
}

/// Draws a line between two points in the pixel buffer using Bresenham's algorithm
#[allow(clippy::too_many_arguments)]
pub fn draw_line(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    pixel_data: &mut [u8],
    width: usize,
    height: usize,
    color: Color,
) {
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        if x0 >= 0 && x0 < width as isize && y0 >= 0 && y0 < height as isize {
            let offset = (y0 as usize * width + x0 as usize) * 4;
            let (r, g, b, a) = color.as_rgba8();
            pixel_data[offset] = r;
            pixel_data[offset + 1] = g;
            pixel_data[offset + 2] = b;
            pixel_data[offset + 3] = a;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WheelParameters;
    use crate::scene;
    use crate::templates::MeshRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn a_frame_touches_the_buffers() {
        let registry = MeshRegistry::build().unwrap();
        let params = WheelParameters::try_new(8, 500.0, 0.3).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let scene = scene::build_scene(&registry, &params, &mut rng);
        let mut camera = Camera::mounted(1.0);
        camera.set_aspect(320.0, 240.0);

        let (width, height) = (320usize, 240usize);
        let mut pixel_data = vec![255u8; width * height * 4];
        let mut z_buffer = vec![f64::INFINITY; width * height];
        render_scene(
            &scene,
            &camera,
            width,
            height,
            &mut pixel_data,
            &mut z_buffer,
            false,
        );

        assert!(z_buffer.iter().any(|&d| d.is_finite()));
        assert!(pixel_data
            .chunks_exact(4)
            .any(|px| px[0] != 255 || px[1] != 255 || px[2] != 255));
    }

    #[test]
    fn lines_stay_inside_the_buffer() {
        let (width, height) = (32usize, 32usize);
        let mut pixel_data = vec![0u8; width * height * 4];
        // Endpoints far outside the viewport must clip instead of panicking.
        draw_line(
            -100.0,
            -50.0,
            200.0,
            90.0,
            &mut pixel_data,
            width,
            height,
            Color::rgb8(255, 0, 0),
        );
        assert!(pixel_data.chunks_exact(4).any(|px| px[0] == 255));
    }
}
