//! Randomized Prim construction of the maze's spanning tree.

use crate::grid::{Dir, Grid, Pos};
use crate::maze::{Passages, WallRemoval};
use crate::rng::MazeRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BuildState {
    Outside,
    Frontier,
    Inside,
}

/// Grows a spanning tree from `start`, returning the open edges and the
/// walls removed, in the order they were removed.
///
/// Each frontier pick is uniform over the frontier as it stands at that
/// moment, and removal keeps the order of the remaining entries. Both
/// details decide which maze a seed produces.
pub fn carve(grid: Grid, start: Pos, rng: &mut MazeRng) -> (Passages, Vec<WallRemoval>) {
    let mut state = vec![BuildState::Outside; grid.cell_count()];
    let mut passages = Passages::new(grid);
    let mut removals = Vec::with_capacity(grid.cell_count().saturating_sub(1));
    let mut frontier: Vec<Pos> = Vec::new();

    state[grid.index(start)] = BuildState::Inside;
    add_frontier(grid, start, &mut state, &mut frontier);

    while !frontier.is_empty() {
        let idx = rng.pick_index(frontier.len());
        let cell = frontier.remove(idx);
        state[grid.index(cell)] = BuildState::Inside;

        let mut parents = Vec::with_capacity(4);
        for dir in Dir::ALL {
            let Some(next) = grid.neighbor(cell, dir) else {
                continue;
            };
            match state[grid.index(next)] {
                BuildState::Inside => parents.push((dir, next)),
                BuildState::Outside => {
                    state[grid.index(next)] = BuildState::Frontier;
                    frontier.push(next);
                }
                BuildState::Frontier => {}
            }
        }

        if parents.is_empty() {
            continue;
        }
        let (dir, parent) = parents[rng.pick_index(parents.len())];
        passages.open(cell, dir);
        removals.push(WallRemoval {
            from: cell,
            to: parent,
            dir,
        });
    }

    (passages, removals)
}

fn add_frontier(grid: Grid, cell: Pos, state: &mut [BuildState], frontier: &mut Vec<Pos>) {
    for dir in Dir::ALL {
        if let Some(next) = grid.neighbor(cell, dir) {
            let idx = grid.index(next);
            if state[idx] == BuildState::Outside {
                state[idx] = BuildState::Frontier;
                frontier.push(next);
            }
        }
    }
}
