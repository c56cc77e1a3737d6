//! Picks start and finish as the two ends of the tree's diameter.
//!
//! Two farthest-cell searches: from an arbitrary anchor, then from the cell
//! that search found. On a tree the second search always ends on a true
//! diameter endpoint, whatever anchor was used.

use crate::grid::{Dir, Grid, Pos};
use crate::maze::Passages;
use crate::rng::MazeRng;

/// Depth of every cell below an anchor, counting the anchor itself as 1.
/// Zero marks a cell the search never reached.
#[derive(Clone, Debug)]
pub struct DepthMap {
    grid: Grid,
    depths: Vec<u32>,
    farthest: Pos,
}

impl DepthMap {
    pub fn depth(&self, pos: Pos) -> u32 {
        self.depths[self.grid.index(pos)]
    }

    /// First cell reached with the greatest depth.
    pub fn farthest(&self) -> Pos {
        self.farthest
    }

    pub fn max_depth(&self) -> u32 {
        self.depths.iter().copied().max().unwrap_or(0)
    }
}

/// Depth-first search over open edges from `anchor`.
///
/// Uses an explicit stack of `(cell, next direction)` frames so deep trees
/// cannot overflow the call stack. The visit order is the same as the
/// recursive form scanning [`Dir::ALL`] in order.
pub fn depths_from(passages: &Passages, anchor: Pos) -> DepthMap {
    let grid = passages.grid();
    let mut depths = vec![0u32; grid.cell_count()];
    let mut stack: Vec<(Pos, usize)> = vec![(anchor, 0)];
    depths[grid.index(anchor)] = 1;
    let mut farthest = anchor;
    let mut best = 1;

    while let Some(frame) = stack.last_mut() {
        let (cell, next_dir) = *frame;
        if next_dir == Dir::ALL.len() {
            stack.pop();
            continue;
        }
        frame.1 += 1;

        let dir = Dir::ALL[next_dir];
        if !passages.is_open(cell, dir) {
            continue;
        }
        let Some(next) = grid.neighbor(cell, dir) else {
            continue;
        };
        let idx = grid.index(next);
        if depths[idx] != 0 {
            continue;
        }
        let depth = depths[grid.index(cell)] + 1;
        depths[idx] = depth;
        if depth > best {
            best = depth;
            farthest = next;
        }
        stack.push((next, 0));
    }

    DepthMap {
        grid,
        depths,
        farthest,
    }
}

/// Endpoints of a longest path through the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub start: Pos,
    pub finish: Pos,
    /// Cells on the path between them, both ends included.
    pub length: u32,
}

/// Two-pass diameter search from a caller-chosen anchor.
pub fn endpoints_from(passages: &Passages, anchor: Pos) -> Endpoints {
    let finish = depths_from(passages, anchor).farthest();
    let second = depths_from(passages, finish);
    Endpoints {
        start: second.farthest(),
        finish,
        length: second.max_depth(),
    }
}

/// Two-pass diameter search anchored at a random cell drawn from `rng`.
pub fn find_endpoints(passages: &Passages, rng: &mut MazeRng) -> Endpoints {
    let size = passages.grid().size();
    let anchor = Pos::new(rng.pick_index(size), rng.pick_index(size));
    endpoints_from(passages, anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prim::carve;
    use std::collections::VecDeque;

    fn distances(passages: &Passages, from: Pos) -> Vec<Option<u32>> {
        let grid = passages.grid();
        let mut dist = vec![None; grid.cell_count()];
        let mut q = VecDeque::new();
        dist[grid.index(from)] = Some(0);
        q.push_back(from);
        while let Some(pos) = q.pop_front() {
            let base = dist[grid.index(pos)].unwrap();
            for (_, next) in passages.open_neighbors(pos) {
                if dist[grid.index(next)].is_none() {
                    dist[grid.index(next)] = Some(base + 1);
                    q.push_back(next);
                }
            }
        }
        dist
    }

    fn brute_force_diameter(passages: &Passages) -> u32 {
        passages
            .grid()
            .cells()
            .map(|pos| distances(passages, pos).into_iter().flatten().max().unwrap_or(0))
            .max()
            .unwrap_or(0)
    }

    fn random_tree(size: usize, seed: u32) -> Passages {
        let grid = Grid::new(size).unwrap();
        let mut rng = MazeRng::new(seed);
        let start = Pos::new(rng.pick_index(size), rng.pick_index(size));
        carve(grid, start, &mut rng).0
    }

    fn corridor() -> Passages {
        // 3x3 with an S-shaped single path
        let mut passages = Passages::new(Grid::new(3).unwrap());
        let path = [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 2),
            (1, 1),
            (1, 0),
            (2, 0),
            (2, 1),
            (2, 2),
        ];
        for pair in path.windows(2) {
            let a = Pos::new(pair[0].0, pair[0].1);
            let b = Pos::new(pair[1].0, pair[1].1);
            passages.open_between(a, b).unwrap();
        }
        passages
    }

    #[test]
    fn depths_count_cells_along_tree_paths() {
        let passages = corridor();
        let map = depths_from(&passages, Pos::new(0, 0));
        assert_eq!(map.depth(Pos::new(0, 0)), 1);
        assert_eq!(map.depth(Pos::new(1, 2)), 4);
        assert_eq!(map.depth(Pos::new(2, 2)), 9);
        assert_eq!(map.farthest(), Pos::new(2, 2));
        assert_eq!(map.max_depth(), 9);
    }

    #[test]
    fn corridor_endpoints_are_its_two_ends() {
        let passages = corridor();
        let ends = endpoints_from(&passages, Pos::new(1, 1));
        let mut pair = [ends.start, ends.finish];
        pair.sort();
        assert_eq!(pair, [Pos::new(0, 0), Pos::new(2, 2)]);
        assert_eq!(ends.length, 9);
    }

    #[test]
    fn ties_go_to_the_first_cell_reached() {
        // plus shape centred on (1, 1); every arm tip is at depth 2
        let mut passages = Passages::new(Grid::new(3).unwrap());
        let centre = Pos::new(1, 1);
        for tip in [Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 2), Pos::new(2, 1)] {
            passages.open_between(centre, tip).unwrap();
        }
        // Left is scanned first
        assert_eq!(depths_from(&passages, centre).farthest(), Pos::new(1, 0));
    }

    #[test]
    fn unreached_cells_keep_depth_zero() {
        let mut passages = Passages::new(Grid::new(2).unwrap());
        passages.open_between(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
        let map = depths_from(&passages, Pos::new(0, 0));
        assert_eq!(map.depth(Pos::new(1, 1)), 0);
        assert_eq!(map.farthest(), Pos::new(0, 1));
    }

    #[test]
    fn matches_brute_force_diameter_from_every_anchor() {
        for size in 2..=7 {
            for seed in 0..10u32 {
                let passages = random_tree(size, seed);
                let expected = brute_force_diameter(&passages);
                for anchor in passages.grid().cells() {
                    let ends = endpoints_from(&passages, anchor);
                    let dist = distances(&passages, ends.start)[passages.grid().index(ends.finish)];
                    assert_eq!(dist, Some(expected), "size {size} seed {seed} anchor {anchor:?}");
                    assert_eq!(ends.length, expected + 1);
                    assert_ne!(ends.start, ends.finish);
                }
            }
        }
    }

    #[test]
    fn long_corridor_does_not_exhaust_the_stack() {
        // serpentine through a 200x200 grid: 40_000 cells deep
        let size = 200;
        let grid = Grid::new(size).unwrap();
        let mut passages = Passages::new(grid);
        for row in 0..size {
            for col in 0..size - 1 {
                passages
                    .open_between(Pos::new(row, col), Pos::new(row, col + 1))
                    .unwrap();
            }
            if row + 1 < size {
                let col = if row % 2 == 0 { size - 1 } else { 0 };
                passages
                    .open_between(Pos::new(row, col), Pos::new(row + 1, col))
                    .unwrap();
            }
        }
        let map = depths_from(&passages, Pos::new(0, 0));
        assert_eq!(map.max_depth() as usize, size * size);
        assert_eq!(map.farthest(), Pos::new(size - 1, 0));
    }

    #[test]
    fn random_anchor_consumes_two_draws() {
        let passages = random_tree(6, 8);
        let mut rng = MazeRng::new(77);
        let mut shadow = MazeRng::new(77);
        let anchor = Pos::new(shadow.pick_index(6), shadow.pick_index(6));
        assert_eq!(find_endpoints(&passages, &mut rng), endpoints_from(&passages, anchor));
        assert_eq!(rng.pick_index(1000), shadow.pick_index(1000));
    }
}
