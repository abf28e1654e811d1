use crate::controller::SceneController;
use crate::graphics;
use crate::params::{
    WheelParameters, MAX_CUP_COUNT, MAX_RADIUS, MIN_CUP_COUNT, MIN_RADIUS,
};
use crate::state::AppState;
use crate::templates::MeshRegistry;
use druid::piet::{FontWeight, ImageFormat, InterpolationMode, Text, TextLayout, TextLayoutBuilder};
use druid::text::FontFamily;
use druid::widget::prelude::*;
use druid::{commands, Color, KbKey, RenderContext};
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Degrees the wheel advances per animation tick.
const SPIN_STEP_DEG: f64 = 1.0;
/// Degrees per arrow-key nudge.
const NUDGE_DEG: f64 = 5.0;
/// World units per radius-key step.
const RADIUS_STEP: f64 = 25.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Water wheel canvas widget
pub struct WheelWidget {
    controller: SceneController,
    initial: WheelParameters,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl WheelWidget {
    pub fn new(registry: Arc<MeshRegistry>, initial: WheelParameters, rng: StdRng) -> Self {
        WheelWidget {
            controller: SceneController::mount(registry, initial, rng),
            initial,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }
}

impl Widget<AppState> for WheelWidget {
    /// Handle events for the wheel widget
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut AppState, _env: &Env) {
        match event {
            Event::WindowConnected => {
                ctx.request_timer(FRAME_INTERVAL);
                // Request focus to receive keyboard events
                ctx.request_focus();
            }
            Event::Timer(_) => {
                if !data.paused {
                    data.rotation_deg = (data.rotation_deg + SPIN_STEP_DEG).rem_euclid(360.0);
                }
                // The clock always re-renders, even with nothing to advance.
                ctx.request_paint();
                ctx.request_timer(FRAME_INTERVAL);
            }
            Event::KeyDown(key_event) => match &key_event.key {
                KbKey::Character(s) => {
                    match s.as_str() {
                        "d" | "D" => {
                            data.debug = !data.debug;
                        }
                        "p" | "P" => {
                            data.paused = !data.paused;
                        }
                        "q" | "Q" => {
                            ctx.submit_command(commands::QUIT_APP);
                        }
                        "w" | "W" => {
                            data.wireframe = !data.wireframe;
                        }
                        "r" | "R" => {
                            data.cup_count = self.initial.cup_count();
                            data.wheel_radius = self.initial.radius();
                            data.rotation_deg = self.initial.rotation().to_degrees();
                            data.wireframe = false;
                        }
                        "+" | "=" => {
                            data.cup_count = (data.cup_count + 1).min(MAX_CUP_COUNT);
                        }
                        "-" | "_" => {
                            data.cup_count = data.cup_count.saturating_sub(1).max(MIN_CUP_COUNT);
                        }
                        "]" => {
                            data.wheel_radius = (data.wheel_radius + RADIUS_STEP).min(MAX_RADIUS);
                        }
                        "[" => {
                            data.wheel_radius = (data.wheel_radius - RADIUS_STEP).max(MIN_RADIUS);
                        }
                        _ => {}
                    }
                    ctx.request_paint();
                }
                KbKey::ArrowLeft => {
                    data.rotation_deg = (data.rotation_deg - NUDGE_DEG).rem_euclid(360.0);
                    ctx.request_paint();
                }
                KbKey::ArrowRight => {
                    data.rotation_deg = (data.rotation_deg + NUDGE_DEG).rem_euclid(360.0);
                    ctx.request_paint();
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn lifecycle(
        &mut self,
        _ctx: &mut LifeCycleCtx,
        _event: &LifeCycle,
        _data: &AppState,
        _env: &Env,
    ) {
    }

    fn update(&mut self, _ctx: &mut UpdateCtx, _old_data: &AppState, _data: &AppState, _env: &Env) {}

    /// Determines the layout constraints for the wheel widget
    fn layout(
        &mut self,
        _layout_ctx: &mut LayoutCtx,
        bc: &BoxConstraints,
        _data: &AppState,
        _env: &Env,
    ) -> Size {
        bc.max()
    }

    /// Paint the wheel widget
    fn paint(&mut self, ctx: &mut PaintCtx, data: &AppState, _env: &Env) {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let size = ctx.size();
        let width = size.width as usize;
        let height = size.height as usize;
        if width == 0 || height == 0 {
            return;
        }

        // The control surface keeps its values inside the valid range, so
        // this only trips on a bug.
        let params = match WheelParameters::try_new(
            data.cup_count,
            data.wheel_radius,
            data.rotation_deg.to_radians(),
        ) {
            Ok(params) => params,
            Err(err) => {
                log::error!("ignoring invalid parameters: {err}");
                return;
            }
        };
        self.controller.sync(params);
        self.controller.sync_viewport(size.width, size.height);

        // Fresh buffers per frame, cleared to the white backdrop
        let mut pixel_data = vec![255u8; width * height * 4];
        let mut z_buffer = vec![f64::INFINITY; width * height];
        graphics::render_scene(
            self.controller.scene(),
            self.controller.camera(),
            width,
            height,
            &mut pixel_data,
            &mut z_buffer,
            data.wireframe,
        );

        // Create and draw the image
        let image = ctx
            .make_image(width, height, &pixel_data, ImageFormat::RgbaSeparate)
            .unwrap();
        ctx.draw_image(&image, size.to_rect(), InterpolationMode::NearestNeighbor);

        // Add debug info if debug mode is enabled
        if data.debug {
            let text = format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            let text_layout = ctx
                .text()
                .new_text_layout(text)
                .font(FontFamily::SYSTEM_UI, 12.0)
                .text_color(Color::BLACK)
                .build()
                .unwrap();
            ctx.draw_text(&text_layout, (10.0, 10.0));

            let text = format!("Cups: {}", data.cup_count);
            let text_layout = ctx
                .text()
                .new_text_layout(text)
                .font(FontFamily::SYSTEM_UI, 12.0)
                .text_color(Color::BLACK)
                .build()
                .unwrap();
            ctx.draw_text(&text_layout, (10.0, 30.0));

            let text = format!("Radius: {:.0}", data.wheel_radius);
            let text_layout = ctx
                .text()
                .new_text_layout(text)
                .font(FontFamily::SYSTEM_UI, 12.0)
                .text_color(Color::BLACK)
                .build()
                .unwrap();
            ctx.draw_text(&text_layout, (10.0, 50.0));

            let text = format!("Rotation: {:.1}°", data.rotation_deg);
            let text_layout = ctx
                .text()
                .new_text_layout(text)
                .font(FontFamily::SYSTEM_UI, 12.0)
                .text_color(Color::BLACK)
                .build()
                .unwrap();
            ctx.draw_text(&text_layout, (10.0, 70.0));

            let text = format!("FPS: {:.2}", self.fps);
            let text_layout = ctx
                .text()
                .new_text_layout(text)
                .font(FontFamily::SYSTEM_UI, 12.0)
                .text_color(Color::BLACK)
                .build()
                .unwrap();
            ctx.draw_text(&text_layout, (10.0, 90.0));
        }

        // Display 'Paused' if the animation is paused
        if data.paused {
            // Draw a semi-transparent overlay
            let overlay_color = Color::rgba8(0, 0, 0, 150);
            ctx.fill(size.to_rect(), &overlay_color);

            let text = "Paused";
            let text_layout = ctx
                .text()
                .new_text_layout(text)
                .font(FontFamily::SYSTEM_UI, 36.0)
                .default_attribute(FontWeight::BOLD)
                .text_color(Color::WHITE)
                .build()
                .unwrap();
            let text_size = text_layout.size();
            let pos = (
                (size.width - text_size.width) / 2.0,
                (size.height - text_size.height) / 2.0,
            );
            ctx.draw_text(&text_layout, pos);
        }
    }
}
