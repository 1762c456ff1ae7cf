#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Treasure Room adapters.
//!
//! Adapters never read the world directly. They capture a
//! [`Snapshot`](treasure_room_core::Snapshot), turn it into a [`Scene`] made of
//! positioned glyphs and labels, and hand the scene to a [`RenderingBackend`].

use std::slice::Chunks;

use anyhow::Result as AnyResult;
use glam::Vec2;
use treasure_room_core::{Direction, Occupant, Position, RewardKind, RewardValues, Snapshot};

const HUD_GAP: f32 = 10.0;
const DIVIDER_OFFSET: f32 = 40.0;
const DIVIDER_LENGTH: f32 = 195.0;
const DIVIDER_THICKNESS: f32 = 4.0;
const LEGEND_OFFSET: f32 = 60.0;
const LEGEND_LINE_SPACING: f32 = 10.0;

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

    /// Converts the color channels back into bytes, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        ]
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Colors assigned to every element of the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Wall tiles.
    pub wall: Color,
    /// Floor tiles.
    pub floor: Color,
    /// Player glyph.
    pub player: Color,
    /// Normal rewards.
    pub normal_reward: Color,
    /// Special rewards.
    pub special_reward: Color,
    /// Score, legend and divider.
    pub text: Color,
    /// Background cleared before each frame.
    pub background: Color,
}

impl Palette {
    /// Color used for a reward of `kind`.
    #[must_use]
    pub const fn reward(&self, kind: RewardKind) -> Color {
        match kind {
            RewardKind::Normal => self.normal_reward,
            RewardKind::Special => self.special_reward,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let white = Color::from_rgb_u8(0xff, 0xff, 0xff);
        Self {
            wall: Color::from_rgb_u8(0xde, 0xb8, 0x87),
            floor: white,
            player: white,
            normal_reward: Color::from_rgb_u8(0xff, 0x00, 0x00),
            special_reward: Color::from_rgb_u8(0xff, 0xff, 0x00),
            text: white,
            background: Color::from_rgb_u8(0x00, 0x00, 0x00),
        }
    }
}

/// Character drawn for a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// `#`
    Wall,
    /// `.`
    Floor,
    /// `@`
    Player,
    /// `$`
    Reward,
}

impl Glyph {
    /// Character representing the glyph.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
            Self::Player => '@',
            Self::Reward => '$',
        }
    }
}

/// Pixel size of a single glyph cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMetrics {
    width: f32,
    height: f32,
}

impl CellMetrics {
    /// Width of a cell in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Top-left pixel of the cell at `position`.
    #[must_use]
    pub fn origin(&self, position: Position) -> Vec2 {
        Vec2::new(
            position.x() as f32 * self.width,
            position.y() as f32 * self.height,
        )
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 14.0,
            height: 20.0,
        }
    }
}

/// Relative size of a text label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextSize {
    /// Same size as the map glyphs.
    Large,
    /// Small informational print.
    Small,
}

/// Positioned glyph for a single tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCell {
    /// Tile the glyph represents.
    pub position: Position,
    /// Glyph to draw.
    pub glyph: Glyph,
    /// Glyph color.
    pub color: Color,
    /// Top-left pixel of the glyph.
    pub origin: Vec2,
}

/// Positioned line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    /// Content of the label.
    pub text: String,
    /// Top-left pixel of the label.
    pub origin: Vec2,
    /// Label color.
    pub color: Color,
    /// Font size class.
    pub size: TextSize,
}

/// Straight line drawn between two pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    /// First endpoint.
    pub start: Vec2,
    /// Second endpoint.
    pub end: Vec2,
    /// Stroke width in pixels.
    pub thickness: f32,
    /// Stroke color.
    pub color: Color,
}

/// Backend-agnostic description of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    columns: u32,
    rows: u32,
    /// Tile glyphs in row-major order.
    pub cells: Vec<SceneCell>,
    /// Score line followed by the legend lines.
    pub labels: Vec<TextLabel>,
    /// Separator between the score and the legend.
    pub divider: LineSegment,
}

impl Scene {
    /// Builds a scene from a snapshot of the game.
    ///
    /// `values` feeds the legend so it always matches the configured rewards.
    #[must_use]
    pub fn from_snapshot(
        snapshot: &Snapshot,
        values: RewardValues,
        metrics: CellMetrics,
        palette: &Palette,
    ) -> Self {
        let grid = snapshot.grid();
        let cells = grid
            .cells()
            .map(|position| {
                let (glyph, color) = match snapshot.occupant(position) {
                    Occupant::Player => (Glyph::Player, palette.player),
                    Occupant::Reward(kind) => (Glyph::Reward, palette.reward(kind)),
                    Occupant::Empty if grid.is_walkable(position) => (Glyph::Floor, palette.floor),
                    Occupant::Empty => (Glyph::Wall, palette.wall),
                };
                SceneCell {
                    position,
                    glyph,
                    color,
                    origin: metrics.origin(position),
                }
            })
            .collect();

        let hud = Vec2::new(grid.width() as f32 * metrics.width() + HUD_GAP, HUD_GAP);
        let labels = vec![
            TextLabel {
                text: format!("Score: {}", snapshot.score()),
                origin: hud,
                color: palette.text,
                size: TextSize::Large,
            },
            TextLabel {
                text: format!("red $ are worth {} points", values.normal),
                origin: hud + Vec2::new(0.0, LEGEND_OFFSET),
                color: palette.text,
                size: TextSize::Small,
            },
            TextLabel {
                text: format!("yellow $ are worth {} points", values.special),
                origin: hud + Vec2::new(0.0, LEGEND_OFFSET + LEGEND_LINE_SPACING),
                color: palette.text,
                size: TextSize::Small,
            },
        ];
        let divider_start = hud + Vec2::new(0.0, DIVIDER_OFFSET);

        Self {
            columns: grid.width(),
            rows: grid.height(),
            cells,
            labels,
            divider: LineSegment {
                start: divider_start,
                end: divider_start + Vec2::new(DIVIDER_LENGTH, 0.0),
                thickness: DIVIDER_THICKNESS,
                color: palette.text,
            },
        }
    }

    /// Dimensions of the tile area as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Glyph drawn at `position`, if it lies inside the scene.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&SceneCell> {
        if position.x() >= self.columns || position.y() >= self.rows {
            return None;
        }
        let index = position.y() as usize * self.columns as usize + position.x() as usize;
        self.cells.get(index)
    }

    /// Tile glyphs grouped into rows, top to bottom.
    pub fn rows(&self) -> Chunks<'_, SceneCell> {
        self.cells.chunks(self.columns.max(1) as usize)
    }
}

/// Input gathered by a backend for a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Directional key pressed this frame, if any.
    pub direction: Option<Direction>,
}

/// Maps a key name to a movement direction.
///
/// Arrow key names, `w`/`a`/`s`/`d` and `k`/`h`/`j`/`l` are recognised; any
/// other key yields `None` and must be ignored.
#[must_use]
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key.trim().to_ascii_lowercase().as_str() {
        "up" | "w" | "k" => Some(Direction::Up),
        "down" | "s" | "j" => Some(Direction::Down),
        "left" | "a" | "h" => Some(Direction::Left),
        "right" | "d" | "l" => Some(Direction::Right),
        _ => None,
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

/// Rendering backend capable of presenting Treasure Room scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The backend calls `update_scene` once per input event and redraws the
    /// scene afterwards. An error returned by the closure stops the backend.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> AnyResult<()>;
}
