#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad window for Tower Defense.
//!
//! The 800x600 field is letterboxed into the window and drawn with circles,
//! lines and rectangles only; the game makes no sounds, so macroquad is built
//! without its `audio` feature. Clicks are translated back into field units
//! before they reach the scene callback.
//!
//! The game over prompt is the only immediate-mode UI and lives in `ui`.

mod ui;

use self::ui::{draw_restart_prompt, RestartPromptContext};
use anyhow::Result;
use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::{
    color::{BLACK, GREEN, WHITE},
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tower_defense_core::{FIELD_HEIGHT, FIELD_WIDTH};
use tower_defense_rendering::{
    Color, CountdownBanner, EnemyPresentation, FieldPresentation, FrameInput,
    GameOverPresentation, HudPresentation, PathPresentation, PointerButton, PointerClick,
    Presentation, RenderingBackend, Scene, ShopPresentation, TowerPresentation,
};
use tracing::info;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlayInputState {
    restart_latched: bool,
}

impl OverlayInputState {
    /// Returns whether the UI requested a restart and clears the latch so the
    /// action fires only once.
    pub fn take_restart(&mut self) -> bool {
        let latched = self.restart_latched;
        self.restart_latched = false;
        latched
    }

    /// Records that the game over prompt requested a restart this frame.
    pub fn register_restart(&mut self) {
        self.restart_latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `R` starts a new match.
    restart: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let restart = is_key_pressed(KeyCode::R);

        Self {
            quit_requested,
            restart,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

const REPORT_INTERVAL: Duration = Duration::from_secs(1);
const TRAILING_WINDOW: Duration = Duration::from_secs(10);

/// Time spent on one frame and on its two halves.
#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Averages logged once per second when `--show-fps` is set.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    fps_trailing: f32,
    simulation: Duration,
    render: Duration,
}

/// Frame timing accumulated since the last report, plus a ten second
/// trailing window of frame durations.
#[derive(Debug, Default)]
struct FrameStats {
    interval: Duration,
    frames: u32,
    simulation: Duration,
    render: Duration,
    trailing: VecDeque<Duration>,
    trailing_total: Duration,
}

impl FrameStats {
    /// Adds a frame and returns a report once a full interval was observed.
    fn record(&mut self, sample: FrameBreakdown) -> Option<FrameReport> {
        self.interval += sample.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation += sample.simulation;
        self.render += sample.render;

        self.trailing.push_back(sample.frame);
        self.trailing_total += sample.frame;
        while self.trailing_total > TRAILING_WINDOW {
            let Some(oldest) = self.trailing.pop_front() else {
                break;
            };
            self.trailing_total = self.trailing_total.saturating_sub(oldest);
        }

        if self.interval < REPORT_INTERVAL {
            return None;
        }

        let frames = self.frames;
        let fps = frames as f32 / self.interval.as_secs_f32();
        let trailing_seconds = self.trailing_total.as_secs_f32();
        let report = FrameReport {
            fps,
            fps_trailing: if trailing_seconds > 0.0 {
                self.trailing.len() as f32 / trailing_seconds
            } else {
                fps
            },
            simulation: self.simulation / frames,
            render: self.render / frames,
        };

        self.interval = Duration::ZERO;
        self.frames = 0;
        self.simulation = Duration::ZERO;
        self.render = Duration::ZERO;
        Some(report)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: FIELD_WIDTH as i32,
            window_height: FIELD_HEIGHT as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut frame_stats = FrameStats::default();
            let mut overlay_input = OverlayInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before =
                    SceneMetrics::from_field(&scene.field, screen_width, screen_height);
                let restart = overlay_input.take_restart() || keyboard.restart;
                let frame_input = gather_frame_input(&scene.field, &metrics_before, restart);

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();

                let metrics = SceneMetrics::from_field(&scene.field, screen_width, screen_height);
                let cursor = metrics.to_field(mouse_vec());

                let render_start = Instant::now();
                draw_field(&scene.field, &metrics);
                draw_path(&scene.path, &metrics);
                draw_towers(&scene.towers, &metrics);
                draw_enemies(&scene.enemies, &metrics);
                draw_hud(&scene.hud, &scene.field, &metrics);
                draw_shop(&scene.shop, &scene.field, &metrics, cursor);

                if let Some(results) = scene.game_over {
                    draw_game_over_backdrop(&scene.field, &metrics);
                    let mut prompt_ui = macroquad::ui::root_ui();
                    let context = restart_prompt_context(results, &metrics);
                    if draw_restart_prompt(&mut prompt_ui, context) {
                        overlay_input.register_restart();
                    }
                }

                let frame_breakdown = FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render: render_start.elapsed(),
                };

                let report = frame_stats.record(frame_breakdown);
                if let Some(report) = report.filter(|_| show_fps) {
                    info!(
                        fps = report.fps,
                        fps_10s = report.fps_trailing,
                        sim_ms = report.simulation.as_secs_f64() * 1_000.0,
                        render_ms = report.render.as_secs_f64() * 1_000.0,
                        "frame timing"
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Uniform scale and letterbox offset mapping field units to screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_field(field: &FieldPresentation, screen_width: f32, screen_height: f32) -> Self {
        let scale = if field.width <= f32::EPSILON || field.height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / field.width).min(screen_height / field.height)
        };

        Self {
            scale,
            offset_x: ((screen_width - field.width * scale) * 0.5).max(0.0),
            offset_y: ((screen_height - field.height * scale) * 0.5).max(0.0),
        }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }

    fn to_field(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        )
    }

    fn length(&self, length: f32) -> f32 {
        length * self.scale
    }
}

fn mouse_vec() -> Vec2 {
    let (x, y) = mouse_position();
    Vec2::new(x, y)
}

fn gather_frame_input(
    field: &FieldPresentation,
    metrics: &SceneMetrics,
    restart: bool,
) -> FrameInput {
    gather_frame_input_from_observations(
        field,
        metrics,
        mouse_vec(),
        is_mouse_button_pressed(MouseButton::Left),
        is_mouse_button_pressed(MouseButton::Right),
        restart,
    )
}

fn gather_frame_input_from_observations(
    field: &FieldPresentation,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    primary_click: bool,
    secondary_click: bool,
    restart: bool,
) -> FrameInput {
    let mut input = FrameInput {
        restart,
        ..FrameInput::default()
    };

    if metrics.scale <= f32::EPSILON {
        return input;
    }

    let position = metrics.to_field(cursor_position);
    let inside = position.x >= 0.0
        && position.x < field.width
        && position.y >= 0.0
        && position.y < field.height;
    if !inside {
        return input;
    }

    if primary_click {
        input
            .clicks
            .push(PointerClick::new(position, PointerButton::Primary));
    }
    if secondary_click {
        input
            .clicks
            .push(PointerClick::new(position, PointerButton::Secondary));
    }

    input
}

fn draw_field(field: &FieldPresentation, metrics: &SceneMetrics) {
    let origin = metrics.to_screen(Vec2::ZERO);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        metrics.length(field.width),
        metrics.length(field.height),
        to_macroquad_color(field.grass),
    );

    if field.grid_spacing <= f32::EPSILON {
        return;
    }

    let grid_color = to_macroquad_color(field.grid_color);
    let mut x = 0.0;
    while x < field.width {
        let top = metrics.to_screen(Vec2::new(x, 0.0));
        let bottom = metrics.to_screen(Vec2::new(x, field.height));
        macroquad::shapes::draw_line(top.x, top.y, bottom.x, bottom.y, 1.0, grid_color);
        x += field.grid_spacing;
    }

    let mut y = 0.0;
    while y < field.height {
        let left = metrics.to_screen(Vec2::new(0.0, y));
        let right = metrics.to_screen(Vec2::new(field.width, y));
        macroquad::shapes::draw_line(left.x, left.y, right.x, right.y, 1.0, grid_color);
        y += field.grid_spacing;
    }
}

fn draw_path(path: &PathPresentation, metrics: &SceneMetrics) {
    let fill = to_macroquad_color(path.color);
    for segment in path.waypoints.windows(2) {
        let start = metrics.to_screen(segment[0]);
        let end = metrics.to_screen(segment[1]);
        let width = metrics.length(path.width);
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, width, fill);
        macroquad::shapes::draw_circle(start.x, start.y, metrics.length(path.width * 0.5), fill);
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, 2.0, BLACK);
    }

    for dot in path.dots(20.0) {
        let centre = metrics.to_screen(dot);
        macroquad::shapes::draw_circle(centre.x, centre.y, metrics.length(2.0), BLACK);
    }
}

fn draw_towers(towers: &[TowerPresentation], metrics: &SceneMetrics) {
    let base = macroquad::color::Color::from_rgba(50, 50, 50, 255);
    let range = macroquad::color::Color::from_rgba(100, 100, 100, 50);

    for tower in towers {
        let centre = metrics.to_screen(tower.position);
        let base_radius = metrics.length(tower.size + 2.0);
        macroquad::shapes::draw_circle(centre.x, centre.y, base_radius, base);
        macroquad::shapes::draw_circle(
            centre.x,
            centre.y,
            metrics.length(tower.size),
            to_macroquad_color(tower.color),
        );
        let level = tower.level.to_string();
        draw_text_centered(&level, tower.position, 20.0, WHITE, metrics);
        macroquad::shapes::draw_circle(centre.x, centre.y, metrics.length(tower.range), range);
    }
}

fn draw_enemies(enemies: &[EnemyPresentation], metrics: &SceneMetrics) {
    let bar_background = macroquad::color::Color::from_rgba(50, 50, 50, 255);
    let bar_width = EnemyPresentation::HEALTH_BAR_WIDTH;

    for enemy in enemies {
        let centre = metrics.to_screen(enemy.position);
        macroquad::shapes::draw_circle(
            centre.x,
            centre.y,
            metrics.length(enemy.size),
            to_macroquad_color(enemy.color),
        );

        let bar_offset = Vec2::new(-bar_width * 0.5, -enemy.size - 10.0);
        let bar_origin = metrics.to_screen(enemy.position + bar_offset);
        let bar_height = metrics.length(5.0);
        macroquad::shapes::draw_rectangle(
            bar_origin.x,
            bar_origin.y,
            metrics.length(bar_width),
            bar_height,
            bar_background,
        );
        let fill = metrics.length(bar_width * enemy.health_fraction.clamp(0.0, 1.0));
        if fill > f32::EPSILON {
            macroquad::shapes::draw_rectangle(bar_origin.x, bar_origin.y, fill, bar_height, GREEN);
        }
    }
}

fn draw_hud(hud: &HudPresentation, field: &FieldPresentation, metrics: &SceneMetrics) {
    let lines = [
        format!("Money: ${}", hud.money.get()),
        format!("Lives: {}", hud.lives),
        format!("Wave: {}", hud.wave),
        format!("Score: {}", hud.score),
    ];
    for (index, line) in lines.iter().enumerate() {
        let position = Vec2::new(10.0, 10.0 + index as f32 * 30.0);
        draw_text_top_left(line, position, 36.0, BLACK, metrics);
    }
    if let Some(best) = hud.high_score {
        let text = format!("Best: {best}");
        draw_text_top_left(&text, Vec2::new(10.0, 130.0), 24.0, BLACK, metrics);
    }

    if let Some(banner) = hud.countdown {
        let centre = match banner {
            CountdownBanner::GameStartsIn(_) => Vec2::new(field.width * 0.5, field.height * 0.5),
            CountdownBanner::NextWaveIn(_) => Vec2::new(field.width * 0.5, 100.0),
        };
        draw_text_centered(&banner.text(), centre, 36.0, BLACK, metrics);
    }
}

fn draw_shop(
    shop: &ShopPresentation,
    field: &FieldPresentation,
    metrics: &SceneMetrics,
    cursor: Vec2,
) {
    let left = field.shop_left();
    let origin = metrics.to_screen(Vec2::new(left, 0.0));
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        metrics.length(field.width - left),
        metrics.length(field.height),
        macroquad::color::Color::from_rgba(240, 240, 240, 255),
    );
    let bottom = metrics.to_screen(Vec2::new(left, field.height));
    macroquad::shapes::draw_line(origin.x, origin.y, bottom.x, bottom.y, 2.0, BLACK);

    let unaffordable = macroquad::color::Color::from_rgba(160, 30, 30, 255);
    for entry in &shop.entries {
        let button = entry.button;
        let fill = if entry.selected {
            macroquad::color::Color::from_rgba(200, 220, 255, 255)
        } else if button.contains(cursor) {
            macroquad::color::Color::from_rgba(220, 220, 220, 255)
        } else {
            WHITE
        };
        let top_left = metrics.to_screen(button.origin);
        let size = button.size * metrics.scale;
        macroquad::shapes::draw_rectangle(top_left.x, top_left.y, size.x, size.y, fill);
        macroquad::shapes::draw_rectangle_lines(
            top_left.x, top_left.y, size.x, size.y, 2.0, BLACK,
        );

        let kind = button.kind;
        let swatch = metrics.to_screen(button.origin + Vec2::new(25.0, 30.0));
        macroquad::shapes::draw_circle(
            swatch.x,
            swatch.y,
            metrics.length(kind.size()),
            to_macroquad_color(Color::from_entity(kind.color())),
        );
        let label_position = button.origin + Vec2::new(50.0, 10.0);
        draw_text_top_left(kind.label(), label_position, 24.0, BLACK, metrics);
        let cost_color = if entry.affordable { BLACK } else { unaffordable };
        draw_text_top_left(
            &format!("${}", kind.cost().get()),
            button.origin + Vec2::new(50.0, 35.0),
            24.0,
            cost_color,
            metrics,
        );
    }

    let selected = shop.selected;
    draw_text_top_left(
        &format!("Selected: {}", selected.label()),
        Vec2::new(left + 10.0, field.height - 60.0),
        24.0,
        BLACK,
        metrics,
    );
    draw_text_top_left(
        selected.description(),
        Vec2::new(left + 10.0, field.height - 30.0),
        20.0,
        BLACK,
        metrics,
    );
}

fn draw_game_over_backdrop(field: &FieldPresentation, metrics: &SceneMetrics) {
    let origin = metrics.to_screen(Vec2::ZERO);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        metrics.length(field.width),
        metrics.length(field.height),
        to_macroquad_color(Color::new(0.0, 0.0, 0.0, 0.55)),
    );
}

fn restart_prompt_context(
    results: GameOverPresentation,
    metrics: &SceneMetrics,
) -> RestartPromptContext {
    let size = Vec2::new(280.0, 220.0);
    let origin = metrics.to_screen(Vec2::new(
        (FIELD_WIDTH - size.x) * 0.5,
        (FIELD_HEIGHT - size.y) * 0.5,
    ));

    RestartPromptContext {
        origin: MacroquadVec2::new(origin.x, origin.y),
        size: MacroquadVec2::new(size.x * metrics.scale, size.y * metrics.scale),
        background: macroquad::color::Color::from_rgba(40, 40, 40, 240),
        results,
    }
}

fn draw_text_top_left(
    text: &str,
    position: Vec2,
    font_size: f32,
    color: macroquad::color::Color,
    metrics: &SceneMetrics,
) {
    let size = metrics.length(font_size);
    let origin = metrics.to_screen(position);
    let _ = macroquad::text::draw_text(text, origin.x, origin.y + size * 0.75, size, color);
}

fn draw_text_centered(
    text: &str,
    centre: Vec2,
    font_size: f32,
    color: macroquad::color::Color,
    metrics: &SceneMetrics,
) {
    let size = metrics.length(font_size);
    let dimensions = macroquad::text::measure_text(text, None, size.max(1.0) as u16, 1.0);
    let anchor = metrics.to_screen(centre);
    let _ = macroquad::text::draw_text(
        text,
        anchor.x - dimensions.width * 0.5,
        anchor.y + dimensions.offset_y * 0.5,
        size,
        color,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
