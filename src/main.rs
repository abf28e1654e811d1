mod camera;
mod controller;
mod graphics;
mod layout;
mod math;
mod params;
mod scene;
mod state;
mod templates;
mod vertex;
mod widget;

use crate::params::WheelParameters;
use crate::state::AppState;
use crate::templates::MeshRegistry;
use crate::widget::WheelWidget;
use anyhow::Context;
use clap::Parser;
use druid::{AppLauncher, LocalizedString, WindowDesc};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Animated parametric 3D water wheel
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Initial number of cups on the wheel
    #[arg(long, default_value_t = 100)]
    cups: usize,
    /// Initial wheel radius in world units
    #[arg(long, default_value_t = 500.0)]
    radius: f64,
    /// Initial wheel rotation in degrees
    #[arg(long, default_value_t = 0.0)]
    rotation: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = WheelParameters::try_new(args.cups, args.radius, args.rotation.to_radians())
        .context("invalid wheel parameters")?;
    let registry =
        Arc::new(MeshRegistry::build().context("failed to build the mesh templates")?);
    info!(
        "starting with {} cups, radius {:.0}",
        params.cup_count(),
        params.radius()
    );

    let main_window = WindowDesc::new(WheelWidget::new(registry, params, StdRng::from_entropy()))
        .title(LocalizedString::new("Water Wheel"))
        .window_size((900.0, 700.0));

    let initial_state = AppState {
        cup_count: args.cups,
        wheel_radius: args.radius,
        rotation_deg: args.rotation,
        debug: false,
        paused: false,
        wireframe: false,
    };

    AppLauncher::with_window(main_window)
        .launch(initial_state)
        .map_err(|err| anyhow::anyhow!("failed to launch the window: {err}"))?;

    Ok(())
}
