use druid::Data;

/// Application state
#[derive(Clone, Data)]
pub struct AppState {
    /// Number of cups on the wheel
    pub cup_count: usize,
    /// Wheel radius in world units
    pub wheel_radius: f64,
    /// Wheel rotation in degrees, as the control surface supplies it
    pub rotation_deg: f64,
    /// Enable debug mode
    pub debug: bool,
    /// Animation paused
    pub paused: bool,
    /// Wireframe mode enabled
    pub wireframe: bool,
}
