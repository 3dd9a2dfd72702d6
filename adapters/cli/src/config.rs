//! Game configuration assembled from defaults, a TOML file, and flags.

use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use labyrinth_core::{Position, TileType};
use labyrinth_world::{Grid, World};
use serde::Deserialize;
use tracing::{info, warn};

/// Settings needed to start a round.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Path of the grid source.
    pub(crate) map: PathBuf,
    /// Hero start cell as `[x, y]`.
    pub(crate) hero: [i32; 2],
    /// Enemy start cell as `[x, y]`.
    pub(crate) enemy: [i32; 2],
    /// Tile codes agents may occupy.
    pub(crate) free_tiles: Vec<u32>,
    /// Tile code that wins the round.
    pub(crate) finish_tile: u32,
    /// Milliseconds between enemy steps.
    pub(crate) enemy_interval_ms: u64,
    /// Frame rate cap; zero runs uncapped.
    pub(crate) frames_per_second: u32,
    /// Edge length of a tile in pixels.
    pub(crate) tile_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map: PathBuf::from("maps/simple_map.txt"),
            hero: [7, 7],
            enemy: [7, 1],
            free_tiles: vec![0, 2],
            finish_tile: 2,
            enemy_interval_ms: 100,
            frames_per_second: 15,
            tile_size: 32.0,
        }
    }
}

/// Values supplied on the command line that replace configured ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) map: Option<PathBuf>,
    pub(crate) hero: Option<Position>,
    pub(crate) enemy: Option<Position>,
    pub(crate) free_tiles: Option<Vec<u32>>,
    pub(crate) finish_tile: Option<u32>,
    pub(crate) enemy_interval_ms: Option<u64>,
    pub(crate) frames_per_second: Option<u32>,
    pub(crate) tile_size: Option<f32>,
}

impl GameConfig {
    /// Reads a configuration file; missing keys keep their defaults.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub(crate) fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Replaces every setting that has an override.
    #[must_use]
    pub(crate) fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(map) = overrides.map {
            self.map = map;
        }
        if let Some(hero) = overrides.hero {
            self.hero = [hero.x(), hero.y()];
        }
        if let Some(enemy) = overrides.enemy {
            self.enemy = [enemy.x(), enemy.y()];
        }
        if let Some(free_tiles) = overrides.free_tiles {
            self.free_tiles = free_tiles;
        }
        if let Some(finish_tile) = overrides.finish_tile {
            self.finish_tile = finish_tile;
        }
        if let Some(interval) = overrides.enemy_interval_ms {
            self.enemy_interval_ms = interval;
        }
        if let Some(fps) = overrides.frames_per_second {
            self.frames_per_second = fps;
        }
        if let Some(tile_size) = overrides.tile_size {
            self.tile_size = tile_size;
        }
        self
    }

    pub(crate) fn hero_start(&self) -> Position {
        Position::new(self.hero[0], self.hero[1])
    }

    pub(crate) fn enemy_start(&self) -> Position {
        Position::new(self.enemy[0], self.enemy[1])
    }

    pub(crate) fn enemy_interval(&self) -> Duration {
        Duration::from_millis(self.enemy_interval_ms)
    }

    /// Frame rate cap, or `None` when uncapped.
    pub(crate) fn frame_rate(&self) -> Option<u32> {
        (self.frames_per_second > 0).then_some(self.frames_per_second)
    }

    /// Parses a grid source using the configured tile rules.
    pub(crate) fn parse_grid(&self, text: &str) -> Result<Grid> {
        let free_tiles = self.free_tiles.iter().copied().map(TileType::new);
        Ok(Grid::from_text(text, free_tiles, TileType::new(self.finish_tile))?)
    }

    /// Loads the map and places both agents.
    pub(crate) fn build_world(&self) -> Result<World> {
        let text = fs::read_to_string(&self.map)
            .with_context(|| format!("failed to read map {}", self.map.display()))?;
        let grid = self
            .parse_grid(&text)
            .with_context(|| format!("malformed map {}", self.map.display()))?;
        info!(
            map = %self.map.display(),
            width = grid.width(),
            height = grid.height(),
            "map loaded"
        );
        if !self.free_tiles.contains(&self.finish_tile) {
            warn!(
                finish_tile = self.finish_tile,
                "finish tile is not walkable, the round cannot be won"
            );
        }
        World::new(grid, self.hero_start(), self.enemy_start()).context("invalid start positions")
    }
}

/// Parses an `X,Y` pair for command-line flags.
pub(crate) fn parse_position(value: &str) -> Result<Position, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but found {value:?}"))?;
    let x = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid column {x:?}"))?;
    let y = y.trim().parse().map_err(|_| format!("invalid row {y:?}"))?;
    Ok(Position::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_core::GameState;
    use labyrinth_world::query;

    #[test]
    fn defaults_match_the_bundled_map() {
        let config = GameConfig::default();
        assert_eq!(config.hero_start(), Position::new(7, 7));
        assert_eq!(config.enemy_start(), Position::new(7, 1));
        assert_eq!(config.enemy_interval(), Duration::from_millis(100));
        assert_eq!(config.frame_rate(), Some(15));
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let config = GameConfig::from_toml_str("finish_tile = 3\nhero = [1, 2]\n")
            .expect("valid config");
        assert_eq!(config.finish_tile, 3);
        assert_eq!(config.hero_start(), Position::new(1, 2));
        assert_eq!(config.free_tiles, vec![0, 2]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GameConfig::from_toml_str("speed = 3\n").is_err());
    }

    #[test]
    fn overrides_replace_configured_values() {
        let config = GameConfig::default().with_overrides(Overrides {
            enemy: Some(Position::new(3, 4)),
            frames_per_second: Some(0),
            ..Overrides::default()
        });
        assert_eq!(config.enemy_start(), Position::new(3, 4));
        assert_eq!(config.frame_rate(), None);
        assert_eq!(config.hero_start(), Position::new(7, 7));
    }

    #[test]
    fn parse_position_accepts_pairs() {
        assert_eq!(parse_position("3, 4"), Ok(Position::new(3, 4)));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a,4").is_err());
    }

    #[test]
    fn parse_grid_applies_tile_rules() {
        let config = GameConfig {
            free_tiles: vec![0],
            finish_tile: 5,
            ..GameConfig::default()
        };
        let grid = config.parse_grid("0 5\n1 0\n").expect("valid grid");
        assert!(grid.is_free(Position::new(0, 0)));
        assert!(!grid.is_free(Position::new(1, 0)));
        assert!(grid.is_finish(Position::new(1, 0)));

        assert!(config.parse_grid("0 5\n1\n").is_err());
    }

    #[test]
    fn bundled_map_builds_a_running_world() {
        let config = GameConfig {
            map: Path::new(env!("CARGO_MANIFEST_DIR")).join("../../maps/simple_map.txt"),
            ..GameConfig::default()
        };
        let world = config.build_world().expect("bundled map loads");
        assert_eq!(query::state(&world), GameState::Running);
        assert_eq!(query::grid(&world).width(), 15);
        assert!(query::grid(&world).is_free(config.hero_start()));
        assert!(query::grid(&world).is_free(config.enemy_start()));
    }
}
