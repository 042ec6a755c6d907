#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tower Defense adapters.
//!
//! Scenes are plain data expressed in field units (the 800x600 play field).
//! Backends scale them to the window and report pointer input in the same
//! units, so nothing outside a backend needs to know about screen pixels.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::time::Duration;
use tower_defense_core::{
    EntityColor, Gold, TowerKind, WavePhase, WaveStatus, FIELD_HEIGHT, FIELD_WIDTH,
    SHOP_PANEL_WIDTH,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Converts an archetype color into an opaque presentation color.
    #[must_use]
    pub const fn from_entity(color: EntityColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Mouse button that produced a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left button: selects shop entries and places towers.
    Primary,
    /// Right button: upgrades towers.
    Secondary,
}

/// Click observed by a backend, expressed in field units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerClick {
    /// Field position of the click.
    pub position: Vec2,
    /// Button that was pressed.
    pub button: PointerButton,
}

impl PointerClick {
    /// Creates a new click descriptor.
    #[must_use]
    pub const fn new(position: Vec2, button: PointerButton) -> Self {
        Self { position, button }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Clicks observed during the frame, in the order they happened.
    pub clicks: Vec<PointerClick>,
    /// Whether the player asked to start a new match.
    pub restart: bool,
}

/// Geometry of a single shop button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShopButton {
    /// Tower kind sold by the button.
    pub kind: TowerKind,
    /// Top-left corner in field units.
    pub origin: Vec2,
    /// Width and height in field units.
    pub size: Vec2,
}

impl ShopButton {
    /// Left edge of every shop button.
    pub const LEFT: f32 = FIELD_WIDTH - 140.0;
    /// Top edge of the first button.
    pub const TOP: f32 = 10.0;
    /// Vertical distance between consecutive buttons.
    pub const SPACING: f32 = 70.0;
    /// Width and height of a button.
    pub const SIZE: Vec2 = Vec2::new(130.0, 60.0);

    /// Reports whether `point` falls on the button.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.x < max.x && point.y >= self.origin.y && point.y < max.y
    }
}

/// Shop buttons in archetype order.
pub fn shop_buttons() -> impl Iterator<Item = ShopButton> {
    TowerKind::ALL
        .into_iter()
        .enumerate()
        .map(|(index, kind)| ShopButton {
            kind,
            origin: Vec2::new(
                ShopButton::LEFT,
                ShopButton::TOP + index as f32 * ShopButton::SPACING,
            ),
            size: ShopButton::SIZE,
        })
}

/// Tower kind whose shop button lies under `point`, if any.
#[must_use]
pub fn shop_button_at(point: Vec2) -> Option<TowerKind> {
    shop_buttons()
        .find(|button| button.contains(point))
        .map(|button| button.kind)
}

/// Static appearance of the play field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPresentation {
    /// Width of the field including the shop panel.
    pub width: f32,
    /// Height of the field.
    pub height: f32,
    /// Background fill.
    pub grass: Color,
    /// Distance between grid lines.
    pub grid_spacing: f32,
    /// Color of the grid lines.
    pub grid_color: Color,
}

impl FieldPresentation {
    /// Default distance between grid lines.
    pub const DEFAULT_GRID_SPACING: f32 = 40.0;

    /// Field using the standard dimensions and palette.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            grass: Color::from_rgb_u8(34, 139, 34),
            grid_spacing: Self::DEFAULT_GRID_SPACING,
            grid_color: Color::from_rgb_u8(50, 120, 50),
        }
    }

    /// Left edge of the shop panel.
    #[must_use]
    pub fn shop_left(&self) -> f32 {
        self.width - SHOP_PANEL_WIDTH
    }
}

/// Path drawn beneath towers and enemies.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Waypoints in field units.
    pub waypoints: Vec<Vec2>,
    /// Stroke width of the path.
    pub width: f32,
    /// Fill color of the path.
    pub color: Color,
}

impl PathPresentation {
    /// Creates a path with the standard stroke and color.
    #[must_use]
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self {
            waypoints,
            width: 30.0,
            color: Color::from_rgb_u8(139, 69, 19),
        }
    }

    /// Points spaced roughly `spacing` apart along every segment.
    ///
    /// Each segment contributes its start point but not its end point.
    #[must_use]
    pub fn dots(&self, spacing: f32) -> Vec<Vec2> {
        if spacing <= 0.0 {
            return Vec::new();
        }

        let mut dots = Vec::new();
        for segment in self.waypoints.windows(2) {
            let (start, end) = (segment[0], segment[1]);
            let steps = (start.distance(end) / spacing) as usize;
            for step in 0..steps {
                dots.push(start.lerp(end, step as f32 / steps as f32));
            }
        }
        dots
    }
}

/// Tower drawn on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Centre of the tower.
    pub position: Vec2,
    /// Radius of the tower body.
    pub size: f32,
    /// Radius of the range indicator.
    pub range: f32,
    /// Upgrade level shown on the tower.
    pub level: u32,
    /// Body color.
    pub color: Color,
}

/// Enemy drawn on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Centre of the enemy.
    pub position: Vec2,
    /// Radius of the enemy body.
    pub size: f32,
    /// Body color.
    pub color: Color,
    /// Remaining health as a fraction of maximum health.
    pub health_fraction: f32,
}

impl EnemyPresentation {
    /// Width of the health bar above every enemy.
    pub const HEALTH_BAR_WIDTH: f32 = 40.0;
}

/// Countdown shown while no wave is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownBanner {
    /// Seconds until the very first wave.
    GameStartsIn(u32),
    /// Seconds until the next wave.
    NextWaveIn(u32),
}

impl CountdownBanner {
    /// Banner to display for the provided director status, if any.
    #[must_use]
    pub fn from_status(status: WaveStatus) -> Option<Self> {
        let seconds = status.countdown_seconds()?;
        match status.phase {
            WavePhase::PreGame => Some(Self::GameStartsIn(seconds)),
            WavePhase::Intermission => Some(Self::NextWaveIn(seconds)),
            WavePhase::Spawning => None,
        }
    }

    /// Text rendered for the banner.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::GameStartsIn(seconds) => format!("Game starts in: {seconds}"),
            Self::NextWaveIn(seconds) => format!("Next wave in: {seconds}"),
        }
    }
}

/// Heads-up display values.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct HudPresentation {
    /// Money available.
    pub money: Gold,
    /// Lives left.
    pub lives: u32,
    /// Current wave number.
    pub wave: u32,
    /// Score of the running match.
    pub score: u32,
    /// Best score recorded so far.
    pub high_score: Option<u32>,
    /// Countdown banner, if one should be shown.
    pub countdown: Option<CountdownBanner>,
}

/// Single entry of the shop panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShopEntry {
    /// Button geometry and the kind it sells.
    pub button: ShopButton,
    /// Whether the kind is the active selection.
    pub selected: bool,
    /// Whether the player can currently pay for it.
    pub affordable: bool,
}

/// Shop panel listing every tower kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ShopPresentation {
    /// Entries in archetype order.
    pub entries: Vec<ShopEntry>,
    /// Kind used by the next placement.
    pub selected: TowerKind,
}

impl ShopPresentation {
    /// Builds the shop for the current selection and balance.
    #[must_use]
    pub fn new(selected: TowerKind, money: Gold) -> Self {
        let entries = shop_buttons()
            .map(|button| ShopEntry {
                button,
                selected: button.kind == selected,
                affordable: money >= button.kind.cost(),
            })
            .collect();
        Self { entries, selected }
    }
}

/// Overlay shown once lives ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverPresentation {
    /// Final score.
    pub score: u32,
    /// Best score recorded so far.
    pub high_score: Option<u32>,
    /// Whether the final score set a new best.
    pub new_high_score: bool,
}

/// Scene description combining the field, path, inhabitants and overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Field background.
    pub field: FieldPresentation,
    /// Path enemies follow.
    pub path: PathPresentation,
    /// Towers on the field.
    pub towers: Vec<TowerPresentation>,
    /// Enemies on the field.
    pub enemies: Vec<EnemyPresentation>,
    /// Heads-up display.
    pub hud: HudPresentation,
    /// Shop panel.
    pub shop: ShopPresentation,
    /// Game over overlay, present once the match ended.
    pub game_over: Option<GameOverPresentation>,
}

impl Scene {
    /// Creates a scene with no inhabitants and a shop selecting `Basic`.
    #[must_use]
    pub fn new(field: FieldPresentation, path: PathPresentation) -> Self {
        Self {
            field,
            path,
            towers: Vec::new(),
            enemies: Vec::new(),
            hud: HudPresentation::default(),
            shop: ShopPresentation::new(TowerKind::Basic, Gold::new(0)),
            game_over: None,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tower Defense scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}
