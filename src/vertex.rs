/// Vertex after the camera transform: view-space position (z is the distance
/// in front of the camera, used for depth tests), projected screen position,
/// and the world-space normal used for shading.
pub struct Vertex {
    pub position: [f64; 3],
    pub screen_position: [f64; 2],
    pub normal: [f64; 3],
}
