use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use labyrinth_core::{Command, Event, GameState, Position, StepDelta, TileType};
use labyrinth_world::{self as world, query, Grid, World};

#[test]
fn deterministic_replay_produces_expected_snapshot() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());

    assert_eq!(first.state, GameState::Won);
    assert_eq!(first.hero, Position::new(4, 0));
    assert_eq!(first.enemy, Position::new(3, 2));
    assert_eq!(first.ticks, 4);
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let grid = Grid::from_text(
        "0 0 0 0 2\n0 0 0 0 0\n0 0 0 0 0\n",
        [TileType::new(0), TileType::new(2)],
        TileType::new(2),
    )
    .expect("valid grid");
    let mut world = World::new(grid, Position::new(0, 0), Position::new(0, 2)).expect("world");
    let mut events = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    ReplayOutcome {
        state: query::state(&world),
        hero: query::hero(&world),
        enemy: query::enemy(&world),
        ticks: query::tick_index(&world),
        events,
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = Vec::new();
    for _ in 0..4 {
        commands.push(Command::Tick {
            dt: Duration::from_millis(100),
        });
        commands.push(Command::AdvanceHero {
            delta: StepDelta::new(1, 0),
        });
        commands.push(Command::AdvanceEnemy);
    }
    commands
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    state: GameState,
    hero: Position,
    enemy: Position,
    ticks: u64,
    events: Vec<Event>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
