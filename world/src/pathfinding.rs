//! Breadth-first pursuit planner used to advance the enemy.

use std::collections::VecDeque;

use labyrinth_core::{Position, StepDelta};

use crate::Grid;

const UNREACHED: u32 = u32::MAX;

/// Neighbour expansion order. Changing it changes which of several equally
/// short paths is taken.
const NEIGHBOR_OFFSETS: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Shortest-path planner over the 4-connected free tiles of a [`Grid`].
///
/// The planner keeps its search buffers between calls to avoid reallocating
/// them, but every query starts a fresh search; no path state carries over.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    distances: Vec<u32>,
    predecessors: Vec<Option<usize>>,
    queue: VecDeque<Position>,
}

impl Pathfinder {
    /// Returns the first cell after `start` on a shortest free-tile path to
    /// `target`.
    ///
    /// Returns `start` unchanged when `start == target`, when either cell lies
    /// outside the grid, or when no path exists.
    pub fn next_step(&mut self, grid: &Grid, start: Position, target: Position) -> Position {
        if start == target {
            return start;
        }

        let (Some(start_index), Some(target_index)) = (grid.index(start), grid.index(target))
        else {
            return start;
        };

        if !self.search(grid, start_index, target_index) {
            return start;
        }

        let mut cursor = target_index;
        while let Some(previous) = self.predecessors[cursor] {
            if previous == start_index {
                return grid.position_of(cursor);
            }
            cursor = previous;
        }

        start
    }

    /// Breadth-first distance from `start` to `target`, if `target` is reachable.
    pub fn distance(&mut self, grid: &Grid, start: Position, target: Position) -> Option<u32> {
        let start_index = grid.index(start)?;
        let target_index = grid.index(target)?;
        if start_index == target_index {
            return Some(0);
        }

        self.search(grid, start_index, target_index)
            .then(|| self.distances[target_index])
    }

    /// Runs the search until `target` is discovered. Returns whether it was.
    fn search(&mut self, grid: &Grid, start: usize, target: usize) -> bool {
        let cell_count = grid.cell_count();
        self.distances.clear();
        self.distances.resize(cell_count, UNREACHED);
        self.predecessors.clear();
        self.predecessors.resize(cell_count, None);
        self.queue.clear();

        self.distances[start] = 0;
        self.queue.push_back(grid.position_of(start));

        while let Some(cell) = self.queue.pop_front() {
            let Some(current) = grid.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current].saturating_add(1);

            for (dx, dy) in NEIGHBOR_OFFSETS {
                let neighbor = cell.offset(StepDelta::new(dx, dy));
                if !grid.is_free(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] != UNREACHED {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                self.predecessors[neighbor_index] = Some(current);
                if neighbor_index == target {
                    return true;
                }
                self.queue.push_back(neighbor);
            }
        }

        false
    }
}

/// Convenience wrapper that plans a single step with fresh buffers.
#[must_use]
pub fn next_step(grid: &Grid, start: Position, target: Position) -> Position {
    Pathfinder::default().next_step(grid, start, target)
}
