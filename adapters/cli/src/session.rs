//! Frame driver that serialises scheduler output into the world.

use std::time::Duration;

use labyrinth_core::{Command, DirectionalKeys, Event, GameState};
use labyrinth_rendering::{Scene, SceneGrid, TilePalette};
use labyrinth_system_scheduler::{Config, TickScheduler};
use labyrinth_world::{self as world, query, World};
use tracing::info;

/// Owns the world and the scheduler for the lifetime of a round.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    scheduler: TickScheduler,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Session {
    pub(crate) fn new(world: World, config: Config) -> Self {
        Self {
            world,
            scheduler: TickScheduler::new(config),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Runs one frame: advances time, then applies every scheduled command in order.
    pub(crate) fn advance_frame(&mut self, dt: Duration, keys: DirectionalKeys) -> &[Event] {
        self.events.clear();
        self.commands.clear();

        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);
        self.scheduler.handle(
            &self.events,
            keys,
            query::state(&self.world),
            &mut self.commands,
        );

        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        for event in &self.events {
            if let Event::StateChanged { state } = event {
                info!(
                    ?state,
                    hero = ?query::hero(&self.world),
                    enemy = ?query::enemy(&self.world),
                    "round over"
                );
            }
        }

        &self.events
    }

    pub(crate) fn state(&self) -> GameState {
        query::state(&self.world)
    }

    /// Builds the initial scene, painting the static grid once.
    pub(crate) fn scene(&self, palette: &TilePalette) -> Scene {
        let grid = SceneGrid::paint(query::grid_view(&self.world), palette);
        Scene::new(grid, query::agent_snapshots(&self.world), self.state())
    }

    /// Copies the settled post-frame state into the scene.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        scene.populate(query::agent_snapshots(&self.world), self.state());
    }
}
