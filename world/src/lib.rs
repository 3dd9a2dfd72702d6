#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Labyrinth.
//!
//! The world owns the static [`Grid`], both agents, and the round's
//! [`GameState`]. All mutation flows through [`apply`], which processes one
//! command at a time so hero movement, enemy movement, and outcome evaluation
//! never interleave.

mod error;
mod grid;
mod pathfinding;

pub use error::{GridError, SetupError};
pub use grid::Grid;
pub use pathfinding::{next_step, Pathfinder};

use labyrinth_core::{AgentRole, Command, Event, GameState, MovementPolicy, Position, StepDelta};
use tracing::{debug, info};

/// Result of a single movement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The agent moved between two cells.
    Moved {
        /// Cell occupied before the move.
        from: Position,
        /// Cell occupied after the move.
        to: Position,
    },
    /// The requested cell is not free, so the agent stayed put.
    Blocked {
        /// Cell the agent attempted to enter.
        candidate: Position,
    },
    /// The agent's policy chose its current cell.
    Held {
        /// Cell the agent remains on.
        at: Position,
    },
    /// The round is over and movement is disabled.
    Suspended,
}

#[derive(Clone, Copy, Debug)]
struct Agent {
    role: AgentRole,
    position: Position,
}

impl Agent {
    fn new(role: AgentRole, position: Position) -> Self {
        Self { role, position }
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// Represents the authoritative Labyrinth world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    hero: Agent,
    enemy: Agent,
    state: GameState,
    pathfinder: Pathfinder,
    tick_index: u64,
}

impl World {
    /// Creates a running world with both agents placed on free tiles.
    pub fn new(
        grid: Grid,
        hero_start: Position,
        enemy_start: Position,
    ) -> Result<Self, SetupError> {
        let starts = [(AgentRole::Hero, hero_start), (AgentRole::Enemy, enemy_start)];
        for (role, position) in starts {
            if !grid.contains(position) {
                return Err(SetupError::OutOfBounds {
                    role,
                    position,
                    width: grid.width(),
                    height: grid.height(),
                });
            }
            if !grid.is_free(position) {
                return Err(SetupError::Blocked { role, position });
            }
        }

        Ok(Self {
            grid,
            hero: Agent::new(AgentRole::Hero, hero_start),
            enemy: Agent::new(AgentRole::Enemy, enemy_start),
            state: GameState::Running,
            pathfinder: Pathfinder::default(),
            tick_index: 0,
        })
    }

    /// Moves the hero by `delta` if the candidate cell is free.
    pub fn advance_hero(&mut self, delta: StepDelta) -> StepOutcome {
        self.advance(AgentRole::Hero, delta)
    }

    /// Moves the enemy one step along a shortest path towards the hero.
    pub fn advance_enemy(&mut self) -> StepOutcome {
        self.advance(AgentRole::Enemy, StepDelta::ZERO)
    }

    /// Applies the win and lose rules, returning the resulting state.
    ///
    /// Capture takes precedence over reaching the finish when both hold.
    /// Terminal states are never left.
    pub fn evaluate_outcome(&mut self) -> GameState {
        if self.state.is_terminal() {
            return self.state;
        }

        let hero = self.hero.position();
        if hero == self.enemy.position() {
            self.state = GameState::Lost;
        } else if self.grid.is_finish(hero) {
            self.state = GameState::Won;
        }

        self.state
    }

    /// Current state of the round.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    fn agent(&self, role: AgentRole) -> &Agent {
        match role {
            AgentRole::Hero => &self.hero,
            AgentRole::Enemy => &self.enemy,
        }
    }

    fn agent_mut(&mut self, role: AgentRole) -> &mut Agent {
        match role {
            AgentRole::Hero => &mut self.hero,
            AgentRole::Enemy => &mut self.enemy,
        }
    }

    fn advance(&mut self, role: AgentRole, delta: StepDelta) -> StepOutcome {
        if self.state.is_terminal() {
            return StepOutcome::Suspended;
        }

        let from = self.agent(role).position();
        let to = match role.policy() {
            MovementPolicy::Input => {
                let candidate = from.offset(delta);
                if !self.grid.is_free(candidate) {
                    return StepOutcome::Blocked { candidate };
                }
                candidate
            }
            MovementPolicy::Pursuit => {
                let target = self.hero.position();
                self.pathfinder.next_step(&self.grid, from, target)
            }
        };

        if to == from {
            return StepOutcome::Held { at: from };
        }

        self.agent_mut(role).set_position(to);
        StepOutcome::Moved { from, to }
    }

    fn settle(&mut self, role: AgentRole, outcome: StepOutcome, out_events: &mut Vec<Event>) {
        match outcome {
            StepOutcome::Moved { from, to } => {
                debug!(
                    ?role,
                    ?from,
                    ?to,
                    gap = ?self.pathfinder.distance(
                        &self.grid,
                        self.enemy.position(),
                        self.hero.position(),
                    ),
                    "agent moved"
                );
                out_events.push(Event::AgentMoved { role, from, to });
            }
            StepOutcome::Blocked { candidate } => {
                debug!(?role, ?candidate, "move rejected");
                out_events.push(Event::HeroBlocked { candidate });
            }
            StepOutcome::Held { at } => {
                if role == AgentRole::Enemy {
                    debug!(?at, "enemy holds position");
                    out_events.push(Event::EnemyHeld { at });
                }
            }
            StepOutcome::Suspended => return,
        }

        self.settle_outcome(out_events);
    }

    fn settle_outcome(&mut self, out_events: &mut Vec<Event>) {
        let before = self.state;
        let after = self.evaluate_outcome();
        if before != after {
            info!(state = ?after, tick = self.tick_index, "round finished");
            out_events.push(Event::StateChanged { state: after });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::AdvanceHero { delta } => {
            let outcome = world.advance_hero(delta);
            world.settle(AgentRole::Hero, outcome, out_events);
        }
        Command::AdvanceEnemy => {
            let outcome = world.advance_enemy();
            world.settle(AgentRole::Enemy, outcome, out_events);
        }
        Command::EvaluateOutcome => world.settle_outcome(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use labyrinth_core::{AgentSnapshot, GameState, GridView, Position};

    use super::{Grid, World};

    /// Current state of the round.
    #[must_use]
    pub fn state(world: &World) -> GameState {
        world.state
    }

    /// Provides read-only access to the static grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Exposes a read-only view of the dense tile grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Cell currently occupied by the hero.
    #[must_use]
    pub fn hero(world: &World) -> Position {
        world.hero.position()
    }

    /// Cell currently occupied by the enemy.
    #[must_use]
    pub fn enemy(world: &World) -> Position {
        world.enemy.position()
    }

    /// Captures snapshots of both agents, hero first.
    #[must_use]
    pub fn agent_snapshots(world: &World) -> [AgentSnapshot; 2] {
        [&world.hero, &world.enemy].map(|agent| AgentSnapshot {
            role: agent.role,
            position: agent.position(),
        })
    }

    /// Number of `Tick` commands processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
