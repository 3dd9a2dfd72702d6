#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic tick scheduler that merges the frame and enemy cadences.
//!
//! The hero is driven once per rendered frame from the held directional keys,
//! while the enemy is driven by a fixed wall-clock interval that is independent
//! of the frame rate. Both signals are folded into one ordered command batch
//! per frame so the world applies them strictly one after another.

use std::time::Duration;

use labyrinth_core::{Command, DirectionalKeys, Event, GameState};
use tracing::trace;

/// Enemy cadence used when no configuration overrides it.
pub const DEFAULT_ENEMY_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    enemy_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided enemy cadence.
    ///
    /// A zero interval disables enemy ticks entirely.
    #[must_use]
    pub const fn new(enemy_interval: Duration) -> Self {
        Self { enemy_interval }
    }

}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_ENEMY_INTERVAL)
    }
}

/// Pure system that turns elapsed time and held keys into movement commands.
#[derive(Debug)]
pub struct TickScheduler {
    enemy_interval: Duration,
    accumulator: Duration,
}

impl TickScheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            enemy_interval: config.enemy_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes one frame's events and input, emitting the commands to apply.
    ///
    /// Enemy ticks that fell due during the frame are emitted first, followed
    /// by a single hero command for the frame. Nothing is emitted once the
    /// round is over.
    pub fn handle(
        &mut self,
        events: &[Event],
        keys: DirectionalKeys,
        state: GameState,
        out: &mut Vec<Command>,
    ) {
        if state.is_terminal() {
            self.accumulator = Duration::ZERO;
            return;
        }

        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        if !self.enemy_interval.is_zero() {
            self.accumulator = self.accumulator.saturating_add(elapsed);
            let enemy_ticks = self.resolve_enemy_ticks();
            if enemy_ticks > 0 {
                trace!(enemy_ticks, pending = ?self.accumulator, "enemy ticks due");
            }
            out.extend(std::iter::repeat(Command::AdvanceEnemy).take(enemy_ticks));
        }

        out.push(Command::AdvanceHero { delta: keys.delta() });
    }

    /// Drains whole intervals from the accumulator. The interval must be non-zero.
    fn resolve_enemy_ticks(&mut self) -> usize {
        let mut ticks = 0;
        while self.accumulator >= self.enemy_interval {
            self.accumulator -= self.enemy_interval;
            ticks += 1;
        }
        ticks
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_core::StepDelta;

    #[test]
    fn zero_interval_never_accumulates() {
        let mut scheduler = TickScheduler::new(Config::new(Duration::ZERO));
        let mut commands = Vec::new();
        scheduler.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(10),
            }],
            DirectionalKeys::default(),
            GameState::Running,
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::AdvanceHero {
                delta: StepDelta::ZERO
            }]
        );
        assert_eq!(scheduler.accumulator, Duration::ZERO);
    }

    #[test]
    fn leftover_time_carries_over() {
        let mut scheduler = TickScheduler::default();
        scheduler.accumulator = Duration::from_millis(250);
        assert_eq!(scheduler.resolve_enemy_ticks(), 2);
        assert_eq!(scheduler.accumulator, Duration::from_millis(50));
    }
}
