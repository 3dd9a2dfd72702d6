#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Labyrinth.
//!
//! The game plays no sound, so macroquad is built without its `audio` feature.

use anyhow::Result;
use glam::Vec2;
use labyrinth_core::DirectionalKeys;
use labyrinth_rendering::{
    marker_center, tile_origin, Color, FrameInput, Presentation, RenderingBackend, Scene,
    MESSAGE_BACKGROUND, MESSAGE_TEXT,
};
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::time::{Duration, Instant};

const MESSAGE_FONT_SIZE: u16 = 40;
const MESSAGE_PADDING: f32 = 10.0;

/// Caps the frame rate by reporting how long to idle after each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePacer {
    frame_budget: Option<Duration>,
}

impl FramePacer {
    /// Creates a pacer targeting `frames_per_second`. `None` or zero disables pacing.
    #[must_use]
    pub fn new(frames_per_second: Option<u32>) -> Self {
        let frame_budget = frames_per_second
            .filter(|fps| *fps > 0)
            .map(|fps| Duration::from_secs(1) / fps);
        Self { frame_budget }
    }

    /// Time budget of a single frame, if pacing is enabled.
    #[must_use]
    pub const fn frame_budget(&self) -> Option<Duration> {
        self.frame_budget
    }

    /// Time left in the current frame's budget after `elapsed` was spent.
    #[must_use]
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame_budget
            .map_or(Duration::ZERO, |budget| budget.saturating_sub(elapsed))
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    pacer: FramePacer,
}

impl MacroquadBackend {
    /// Creates a backend capped at the provided frame rate.
    #[must_use]
    pub fn new(frames_per_second: Option<u32>) -> Self {
        Self {
            pacer: FramePacer::new(frames_per_second),
        }
    }
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self::new(Some(15))
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self { pacer } = self;
        let window_size = presentation.window_size();
        let Presentation {
            window_title,
            clear_color,
            tile_size,
            scene,
        } = presentation;

        let config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x.max(1.0) as i32,
            window_height: window_size.y.max(1.0) as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                let frame_start = Instant::now();
                if is_key_pressed(KeyCode::Escape) {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let input = FrameInput {
                    keys: poll_directional_keys(),
                };

                update_scene(frame_dt, input, &mut scene);

                macroquad::window::clear_background(background);
                draw_grid(&scene, tile_size);
                draw_markers(&scene, tile_size);
                if let Some(message) = &scene.message {
                    draw_message(message);
                }

                let idle = pacer.remaining(frame_start.elapsed());
                if !idle.is_zero() {
                    std::thread::sleep(idle);
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn poll_directional_keys() -> DirectionalKeys {
    DirectionalKeys {
        left: is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::Right),
        up: is_key_down(KeyCode::Up),
        down: is_key_down(KeyCode::Down),
    }
}

fn draw_grid(scene: &Scene, tile_size: f32) {
    for (position, color) in scene.grid.iter() {
        let origin = tile_origin(position, tile_size);
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            tile_size,
            tile_size,
            to_macroquad_color(color),
        );
    }
}

fn draw_markers(scene: &Scene, tile_size: f32) {
    let radius = tile_size / 2.0;
    for marker in scene.markers() {
        let center = marker_center(marker.position, tile_size);
        let color = to_macroquad_color(marker.color);
        macroquad::shapes::draw_circle(center.x, center.y, radius, color);
    }
}

fn draw_message(message: &str) {
    let screen = Vec2::new(
        macroquad::window::screen_width(),
        macroquad::window::screen_height(),
    );
    let dimensions = macroquad::text::measure_text(message, None, MESSAGE_FONT_SIZE, 1.0);
    let size = Vec2::new(dimensions.width, dimensions.height);
    let origin = (screen - size) / 2.0;

    macroquad::shapes::draw_rectangle(
        origin.x - MESSAGE_PADDING,
        origin.y - MESSAGE_PADDING,
        size.x + MESSAGE_PADDING * 2.0,
        size.y + MESSAGE_PADDING * 2.0,
        to_macroquad_color(MESSAGE_BACKGROUND),
    );
    macroquad::text::draw_text(
        message,
        origin.x,
        origin.y + dimensions.offset_y,
        f32::from(MESSAGE_FONT_SIZE),
        to_macroquad_color(MESSAGE_TEXT),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
