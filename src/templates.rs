use std::f64::consts::PI;
use std::sync::Arc;
use thiserror::Error;

const CUP_SEGMENTS: usize = 24;
const RIM_SEGMENTS: usize = 64;

/// A mesh template failed validation while the registry was being built.
/// Templates are required singletons with no fallback, so this aborts startup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    #[error("{name} template has no geometry")]
    Empty { name: &'static str },
    #[error("{name} template contains a non-finite coordinate")]
    NonFinite { name: &'static str },
}

/// Shared, read-only geometry. Instances reference a template through an
/// [`Arc`] and never duplicate or mutate the vertex data.
#[derive(Debug, PartialEq)]
pub struct MeshTemplate {
    pub positions: Vec<[f64; 3]>,
    /// Triangles, as indices into `positions`.
    pub faces: Vec<[usize; 3]>,
    /// Line segments for outline-only templates such as the wheel rim.
    pub edges: Vec<[usize; 2]>,
}

impl MeshTemplate {
    fn validated(self, name: &'static str) -> Result<MeshTemplate, TemplateError> {
        if self.positions.is_empty() || (self.faces.is_empty() && self.edges.is_empty()) {
            return Err(TemplateError::Empty { name });
        }
        if self.positions.iter().flatten().any(|c| !c.is_finite()) {
            return Err(TemplateError::NonFinite { name });
        }
        Ok(self)
    }
}

/// The three named templates every scene is built from, generated once at
/// process start and handed around behind [`Arc`]s.
#[derive(Debug)]
pub struct MeshRegistry {
    pub cup: Arc<MeshTemplate>,
    pub water: Arc<MeshTemplate>,
    pub rim: Arc<MeshTemplate>,
}

impl MeshRegistry {
    pub fn build() -> Result<MeshRegistry, TemplateError> {
        Ok(MeshRegistry {
            cup: Arc::new(cup_body().validated("cup body")?),
            water: Arc::new(water_fill().validated("water fill")?),
            rim: Arc::new(wheel_rim().validated("wheel rim")?),
        })
    }
}

/// Tapered open cup: a narrow base ring, a wide mouth ring, and a capped
/// bottom. Unit mouth radius, so an instance scale equals the cup's half
/// width at the rim.
fn cup_body() -> MeshTemplate {
    let mut positions = Vec::with_capacity(CUP_SEGMENTS * 2 + 1);
    for i in 0..CUP_SEGMENTS {
        let angle = i as f64 / CUP_SEGMENTS as f64 * 2.0 * PI;
        positions.push([0.55 * angle.sin(), 0.0, 0.55 * angle.cos()]);
        positions.push([angle.sin(), 1.5, angle.cos()]);
    }
    let bottom_center = positions.len();
    positions.push([0.0, 0.0, 0.0]);

    let mut faces = Vec::with_capacity(CUP_SEGMENTS * 3);
    for i in 0..CUP_SEGMENTS {
        let next = (i + 1) % CUP_SEGMENTS;
        let (base0, mouth0) = (2 * i, 2 * i + 1);
        let (base1, mouth1) = (2 * next, 2 * next + 1);
        faces.push([base0, mouth0, mouth1]);
        faces.push([base0, mouth1, base1]);
        faces.push([base1, base0, bottom_center]);
    }
    MeshTemplate {
        positions,
        faces,
        edges: Vec::new(),
    }
}

/// Squat cylinder sitting just inside the cup wall, capped on top so the
/// water surface is visible. Unit-height instances squash this by the random
/// fill factor.
fn water_fill() -> MeshTemplate {
    let mut positions = Vec::with_capacity(CUP_SEGMENTS * 2 + 1);
    for i in 0..CUP_SEGMENTS {
        let angle = i as f64 / CUP_SEGMENTS as f64 * 2.0 * PI;
        positions.push([0.9 * angle.sin(), 0.0, 0.9 * angle.cos()]);
        positions.push([0.9 * angle.sin(), 0.6, 0.9 * angle.cos()]);
    }
    let top_center = positions.len();
    positions.push([0.0, 0.6, 0.0]);

    let mut faces = Vec::with_capacity(CUP_SEGMENTS * 3);
    for i in 0..CUP_SEGMENTS {
        let next = (i + 1) % CUP_SEGMENTS;
        let (low0, top0) = (2 * i, 2 * i + 1);
        let (low1, top1) = (2 * next, 2 * next + 1);
        faces.push([low0, top0, top1]);
        faces.push([low0, top1, low1]);
        faces.push([top0, top1, top_center]);
    }
    MeshTemplate {
        positions,
        faces,
        edges: Vec::new(),
    }
}

/// Unit-radius outline in the horizontal plane, drawn as a line loop and
/// uniformly scaled up to the wheel radius.
fn wheel_rim() -> MeshTemplate {
    let mut positions = Vec::with_capacity(RIM_SEGMENTS);
    let mut edges = Vec::with_capacity(RIM_SEGMENTS);
    for i in 0..RIM_SEGMENTS {
        let angle = i as f64 / RIM_SEGMENTS as f64 * 2.0 * PI;
        positions.push([angle.sin(), 0.0, angle.cos()]);
        edges.push([i, (i + 1) % RIM_SEGMENTS]);
    }
    MeshTemplate {
        positions,
        faces: Vec::new(),
        edges,
    }
}

/// Solid cylinder centred on the origin, used for the fixed wheel base.
pub fn cylinder(radius: f64, height: f64, segments: usize) -> MeshTemplate {
    let half = height / 2.0;
    let mut positions = Vec::with_capacity(segments * 2 + 2);
    for i in 0..segments {
        let angle = i as f64 / segments as f64 * 2.0 * PI;
        positions.push([radius * angle.sin(), -half, radius * angle.cos()]);
        positions.push([radius * angle.sin(), half, radius * angle.cos()]);
    }
    let bottom_center = positions.len();
    positions.push([0.0, -half, 0.0]);
    let top_center = positions.len();
    positions.push([0.0, half, 0.0]);

    let mut faces = Vec::with_capacity(segments * 4);
    for i in 0..segments {
        let next = (i + 1) % segments;
        let (low0, top0) = (2 * i, 2 * i + 1);
        let (low1, top1) = (2 * next, 2 * next + 1);
        faces.push([low0, top0, top1]);
        faces.push([low0, top1, low1]);
        faces.push([low1, low0, bottom_center]);
        faces.push([top0, top1, top_center]);
    }
    MeshTemplate {
        positions,
        faces,
        edges: Vec::new(),
    }
}
