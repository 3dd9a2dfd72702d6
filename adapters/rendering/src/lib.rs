#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Labyrinth adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use labyrinth_core::{
    AgentRole, AgentSnapshot, DirectionalKeys, GameState, GridView, Position, TileType,
};
use std::{collections::BTreeMap, error::Error, fmt, time::Duration};

/// Marker colour used for the hero.
pub const HERO_COLOR: Color = Color::from_rgb_u8(255, 255, 255);
/// Marker colour used for the enemy.
pub const ENEMY_COLOR: Color = Color::from_rgb_u8(255, 0, 255);
/// Fill colour of the box drawn behind outcome messages.
pub const MESSAGE_BACKGROUND: Color = Color::from_rgb_u8(200, 0, 230);
/// Colour of outcome message text.
pub const MESSAGE_TEXT: Color = Color::from_rgb_u8(255, 255, 255);

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
}

/// Maps tile codes to fill colours.
#[derive(Clone, Debug, PartialEq)]
pub struct TilePalette {
    colors: BTreeMap<TileType, Color>,
    fallback: Color,
}

impl TilePalette {
    /// Creates an empty palette that paints every tile with `fallback`.
    #[must_use]
    pub fn new(fallback: Color) -> Self {
        Self {
            colors: BTreeMap::new(),
            fallback,
        }
    }

    /// Returns the palette with `tile` painted in `color`.
    #[must_use]
    pub fn with(mut self, tile: TileType, color: Color) -> Self {
        let _ = self.colors.insert(tile, color);
        self
    }

    /// Colour used to paint the provided tile.
    #[must_use]
    pub fn color_for(&self, tile: TileType) -> Color {
        self.colors.get(&tile).copied().unwrap_or(self.fallback)
    }
}

impl Default for TilePalette {
    /// Floor is black, walls light grey, and the finish dark grey.
    fn default() -> Self {
        Self::new(Color::from_rgb_u8(255, 0, 0))
            .with(TileType::new(0), Color::from_rgb_u8(0, 0, 0))
            .with(TileType::new(1), Color::from_rgb_u8(120, 120, 120))
            .with(TileType::new(2), Color::from_rgb_u8(50, 50, 50))
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Directional keys held during the frame.
    pub keys: DirectionalKeys,
}

/// Painted tiles of the static grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneGrid {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Tile colours in row-major order.
    pub tiles: Vec<Color>,
}

impl SceneGrid {
    /// Paints the provided grid view with the palette.
    #[must_use]
    pub fn paint(view: GridView<'_>, palette: &TilePalette) -> Self {
        let (columns, rows) = view.dimensions();
        Self {
            columns,
            rows,
            tiles: view.iter().map(|(_, tile)| palette.color_for(tile)).collect(),
        }
    }

    /// Iterator over every tile and its colour in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Color)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, color)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            let x = i32::try_from(index % columns).unwrap_or(i32::MAX);
            let y = i32::try_from(index / columns).unwrap_or(i32::MAX);
            (Position::new(x, y), *color)
        })
    }
}

/// Circular marker drawn for an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentMarker {
    /// Agent represented by the marker.
    pub role: AgentRole,
    /// Cell the agent occupies.
    pub position: Position,
    /// Fill colour of the marker.
    pub color: Color,
}

impl AgentMarker {
    /// Builds the marker for an agent snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: AgentSnapshot) -> Self {
        let color = match snapshot.role {
            AgentRole::Hero => HERO_COLOR,
            AgentRole::Enemy => ENEMY_COLOR,
        };
        Self {
            role: snapshot.role,
            position: snapshot.position,
            color,
        }
    }
}

/// Read-only snapshot of everything drawn in a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Painted tile grid.
    pub grid: SceneGrid,
    /// Hero marker.
    pub hero: AgentMarker,
    /// Enemy marker.
    pub enemy: AgentMarker,
    /// Outcome message shown once the round is over.
    pub message: Option<String>,
}

impl Scene {
    /// Creates a scene from a painted grid and the settled world state.
    #[must_use]
    pub fn new(grid: SceneGrid, agents: [AgentSnapshot; 2], state: GameState) -> Self {
        let [hero, enemy] = agents;
        Self {
            grid,
            hero: AgentMarker::from_snapshot(hero),
            enemy: AgentMarker::from_snapshot(enemy),
            message: state.message().map(str::to_owned),
        }
    }

    /// Refreshes the dynamic parts of the scene after a frame's commands settled.
    pub fn populate(&mut self, agents: [AgentSnapshot; 2], state: GameState) {
        let [hero, enemy] = agents;
        self.hero = AgentMarker::from_snapshot(hero);
        self.enemy = AgentMarker::from_snapshot(enemy);
        self.message = state.message().map(str::to_owned);
    }

    /// Markers in draw order.
    #[must_use]
    pub fn markers(&self) -> [AgentMarker; 2] {
        [self.hero, self.enemy]
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Edge length of a tile in screen pixels.
    pub tile_size: f32,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        tile_size: f32,
        scene: Scene,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(RenderingError::InvalidTileSize { tile_size });
        }

        Ok(Self {
            window_title: window_title.into(),
            clear_color,
            tile_size,
            scene,
        })
    }

    /// Window size in pixels needed to show the whole grid.
    #[must_use]
    pub fn window_size(&self) -> Vec2 {
        Vec2::new(
            self.scene.grid.columns as f32 * self.tile_size,
            self.scene.grid.rows as f32 * self.tile_size,
        )
    }
}

/// Upper-left pixel of the tile at `position`.
#[must_use]
pub fn tile_origin(position: Position, tile_size: f32) -> Vec2 {
    Vec2::new(position.x() as f32, position.y() as f32) * tile_size
}

/// Pixel centre of the tile at `position`, where agent markers are drawn.
#[must_use]
pub fn marker_center(position: Position, tile_size: f32) -> Vec2 {
    tile_origin(position, tile_size) + Vec2::splat(tile_size / 2.0)
}

/// Rendering backend capable of presenting Labyrinth scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive, finite edge length.
    InvalidTileSize {
        /// Provided edge length that failed validation.
        tile_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize { tile_size } => {
                write!(f, "tile_size must be positive (received {tile_size})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents(hero: Position, enemy: Position) -> [AgentSnapshot; 2] {
        [
            AgentSnapshot {
                role: AgentRole::Hero,
                position: hero,
            },
            AgentSnapshot {
                role: AgentRole::Enemy,
                position: enemy,
            },
        ]
    }

    fn painted() -> SceneGrid {
        let tiles = [TileType::new(0), TileType::new(1), TileType::new(2), TileType::new(9)];
        SceneGrid::paint(GridView::new(&tiles, 2, 2), &TilePalette::default())
    }

    #[test]
    fn palette_paints_known_codes_and_falls_back_for_others() {
        let grid = painted();
        assert_eq!(grid.tiles[0], Color::from_rgb_u8(0, 0, 0));
        assert_eq!(grid.tiles[1], Color::from_rgb_u8(120, 120, 120));
        assert_eq!(grid.tiles[2], Color::from_rgb_u8(50, 50, 50));
        assert_eq!(grid.tiles[3], Color::from_rgb_u8(255, 0, 0));

        let cells: Vec<_> = grid.iter().map(|(position, _)| position).collect();
        assert_eq!(cells[2], Position::new(0, 1));
    }

    #[test]
    fn scene_shows_message_only_when_terminal() {
        let mut scene = Scene::new(
            painted(),
            agents(Position::new(0, 0), Position::new(1, 1)),
            GameState::Running,
        );
        assert!(scene.message.is_none());
        assert_eq!(scene.hero.color, HERO_COLOR);
        assert_eq!(scene.enemy.color, ENEMY_COLOR);

        scene.populate(agents(Position::new(0, 0), Position::new(0, 0)), GameState::Lost);
        assert_eq!(scene.message.as_deref(), Some("YOU LOSE!"));
        assert_eq!(scene.enemy.position, Position::new(0, 0));

        scene.populate(agents(Position::new(0, 1), Position::new(1, 1)), GameState::Won);
        assert_eq!(scene.message.as_deref(), Some("YOU WON!"));
    }

    #[test]
    fn marker_center_sits_in_the_middle_of_the_tile() {
        assert_eq!(marker_center(Position::new(2, 1), 32.0), Vec2::new(80.0, 48.0));
        assert_eq!(tile_origin(Position::new(2, 1), 32.0), Vec2::new(64.0, 32.0));
    }

    #[test]
    fn presentation_rejects_non_positive_tile_size() {
        let scene = Scene::new(
            painted(),
            agents(Position::new(0, 0), Position::new(1, 1)),
            GameState::Running,
        );
        let error = Presentation::new(
            "Labyrinth",
            Color::from_rgb_u8(0, 0, 0),
            0.0,
            scene.clone(),
        )
        .expect_err("zero tile size must be rejected");
        assert!(matches!(error, RenderingError::InvalidTileSize { .. }));

        let presentation =
            Presentation::new("Labyrinth", Color::from_rgb_u8(0, 0, 0), 32.0, scene)
                .expect("valid presentation");
        assert_eq!(presentation.window_size(), Vec2::new(64.0, 64.0));
    }
}
