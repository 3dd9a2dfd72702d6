#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Labyrinth pursuit engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Message shown by presentation adapters once the hero reaches the finish tile.
pub const WIN_MESSAGE: &str = "YOU WON!";

/// Message shown by presentation adapters once the enemy catches the hero.
pub const LOSE_MESSAGE: &str = "YOU LOSE!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests that the hero move by the provided delta.
    AdvanceHero {
        /// Offset derived from the directional input held during the frame.
        delta: StepDelta,
    },
    /// Requests that the enemy take one step along its shortest path to the hero.
    AdvanceEnemy,
    /// Requests that the world re-evaluate the win and lose conditions.
    EvaluateOutcome,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of wall-clock time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an agent moved between two cells.
    AgentMoved {
        /// Agent that changed position.
        role: AgentRole,
        /// Cell the agent occupied before moving.
        from: Position,
        /// Cell the agent occupies after the move.
        to: Position,
    },
    /// Reports that the hero's requested cell is not free.
    HeroBlocked {
        /// Cell the hero attempted to enter.
        candidate: Position,
    },
    /// Reports that the enemy found no path towards the hero and held position.
    EnemyHeld {
        /// Cell the enemy remains on.
        at: Position,
    },
    /// Announces that the simulation left the running state.
    StateChanged {
        /// Terminal state that became active.
        state: GameState,
    },
}

/// Zero-indexed grid coordinate.
///
/// Components are signed so that candidate cells computed from a delta may lie
/// outside the grid; the grid rejects them during lookup.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position from column and row indices.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position displaced by the provided delta.
    #[must_use]
    pub const fn offset(self, delta: StepDelta) -> Self {
        Self {
            x: self.x.saturating_add(delta.dx as i32),
            y: self.y.saturating_add(delta.dy as i32),
        }
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// Reports whether `other` is one cardinal step away.
    #[must_use]
    pub fn is_adjacent_to(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Offset applied to the hero for a single frame.
///
/// Each axis is clamped to `-1..=1`, so diagonal candidates are possible when
/// two perpendicular directions are held together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepDelta {
    dx: i8,
    dy: i8,
}

impl StepDelta {
    /// Delta that leaves the hero in place.
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    /// Creates a delta, clamping each component to the unit range.
    #[must_use]
    pub fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx: dx.clamp(-1, 1),
            dy: dy.clamp(-1, 1),
        }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> i8 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> i8 {
        self.dy
    }

    /// Returns `true` when the delta requests no movement.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Directional keys held during a frame, as reported by the input adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionalKeys {
    /// Movement toward decreasing column indices.
    pub left: bool,
    /// Movement toward increasing column indices.
    pub right: bool,
    /// Movement toward decreasing row indices.
    pub up: bool,
    /// Movement toward increasing row indices.
    pub down: bool,
}

impl DirectionalKeys {
    /// Folds the held keys into a single step delta. Opposite keys cancel.
    #[must_use]
    pub fn delta(&self) -> StepDelta {
        let dx = i8::from(self.right) - i8::from(self.left);
        let dy = i8::from(self.down) - i8::from(self.up);
        StepDelta::new(dx, dy)
    }
}

/// Integer code classifying a grid cell.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileType(u32);

impl TileType {
    /// Wraps a raw tile code.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }
}

/// Identifies which agent a snapshot or event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    /// Agent steered by player input.
    Hero,
    /// Agent that pursues the hero.
    Enemy,
}

impl AgentRole {
    /// Returns the source that decides the agent's next position.
    #[must_use]
    pub const fn policy(self) -> MovementPolicy {
        match self {
            Self::Hero => MovementPolicy::Input,
            Self::Enemy => MovementPolicy::Pursuit,
        }
    }
}

/// Source of an agent's next position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementPolicy {
    /// The next position is the current one displaced by a requested delta.
    Input,
    /// The next position is the first step of a shortest path to the hero.
    Pursuit,
}

/// Lifecycle of a pursuit round.
///
/// `Won` and `Lost` are terminal: once entered, movement commands become no-ops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Both agents are still moving.
    #[default]
    Running,
    /// The hero reached the finish tile.
    Won,
    /// The enemy caught the hero.
    Lost,
}

impl GameState {
    /// Returns `true` for `Won` and `Lost`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Message presented to the player for terminal states.
    #[must_use]
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::Running => None,
            Self::Won => Some(WIN_MESSAGE),
            Self::Lost => Some(LOSE_MESSAGE),
        }
    }
}

/// Immutable representation of an agent used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AgentSnapshot {
    /// Role of the agent.
    pub role: AgentRole,
    /// Cell currently occupied by the agent.
    pub position: Position,
}

/// Read-only view into the dense tile grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    tiles: &'a [TileType],
    width: u32,
    height: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided row-major tile slice.
    #[must_use]
    pub fn new(tiles: &'a [TileType], width: u32, height: u32) -> Self {
        Self {
            tiles,
            width,
            height,
        }
    }

    /// Returns the tile at the provided position, if it lies within the grid.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<TileType> {
        self.index(position)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, TileType)> + 'a {
        let width = self.width.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            let x = i32::try_from(index % width).unwrap_or(i32::MAX);
            let y = i32::try_from(index / width).unwrap_or(i32::MAX);
            (Position::new(x, y), *tile)
        })
    }

    /// Provides the dimensions of the underlying grid as `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, position: Position) -> Option<usize> {
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        if column < self.width && row < self.height {
            let width = usize::try_from(self.width).ok()?;
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DirectionalKeys, GameState, GridView, Position, StepDelta, TileType};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = Position::new(1, 1);
        let destination = Position::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
        assert!(origin.is_adjacent_to(Position::new(1, 0)));
        assert!(!origin.is_adjacent_to(Position::new(2, 2)));
    }

    #[test]
    fn manhattan_distance_saturates_at_extremes() {
        let corner = Position::new(i32::MIN, i32::MIN);
        let opposite = Position::new(i32::MAX, i32::MAX);
        assert_eq!(corner.manhattan_distance(opposite), u32::MAX);
    }

    #[test]
    fn position_round_trips_through_bincode() {
        let position = Position::new(-3, 7);
        let bytes = bincode::serialize(&position).expect("serialize");
        let restored: Position = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, position);
    }

    #[test]
    fn held_keys_fold_into_diagonal_delta() {
        let keys = DirectionalKeys {
            left: true,
            up: true,
            ..DirectionalKeys::default()
        };
        assert_eq!(keys.delta(), StepDelta::new(-1, -1));
        assert_eq!(
            Position::new(2, 2).offset(keys.delta()),
            Position::new(1, 1)
        );
    }

    #[test]
    fn opposite_keys_cancel() {
        let keys = DirectionalKeys {
            left: true,
            right: true,
            up: false,
            down: true,
        };
        assert_eq!(keys.delta(), StepDelta::new(0, 1));
        assert!(DirectionalKeys::default().delta().is_zero());
    }

    #[test]
    fn step_delta_clamps_components() {
        let delta = StepDelta::new(5, -9);
        assert_eq!((delta.dx(), delta.dy()), (1, -1));
    }

    #[test]
    fn terminal_states_carry_messages() {
        assert!(!GameState::Running.is_terminal());
        assert_eq!(GameState::Won.message(), Some("YOU WON!"));
        assert_eq!(GameState::Lost.message(), Some("YOU LOSE!"));
        assert_eq!(GameState::Running.message(), None);
    }

    #[test]
    fn grid_view_rejects_out_of_bounds_lookups() {
        let tiles = [TileType::new(0), TileType::new(1), TileType::new(2), TileType::new(0)];
        let view = GridView::new(&tiles, 2, 2);
        assert_eq!(view.tile(Position::new(1, 0)), Some(TileType::new(1)));
        assert_eq!(view.tile(Position::new(0, 1)), Some(TileType::new(2)));
        assert_eq!(view.tile(Position::new(-1, 0)), None);
        assert_eq!(view.tile(Position::new(2, 0)), None);

        let cells: Vec<_> = view.iter().collect();
        assert_eq!(cells[3], (Position::new(1, 1), TileType::new(0)));
    }
}
