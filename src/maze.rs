//! A finished maze: open passages, removal order and the chosen endpoints.

use log::debug;

use crate::diameter::{depths_from, find_endpoints};
use crate::error::{MazeError, Result};
use crate::grid::{Dir, Grid, Pos};
use crate::prim::carve;
use crate::rng::MazeRng;

/// Which edges of the grid are passable. Always symmetric: an edge is open
/// from both of its cells or from neither.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passages {
    grid: Grid,
    open: Vec<[bool; 4]>,
}

impl Passages {
    /// All walls standing.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            open: vec![[false; 4]; grid.cell_count()],
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn is_open(&self, pos: Pos, dir: Dir) -> bool {
        self.grid.contains(pos) && self.open[self.grid.index(pos)][dir.index()]
    }

    /// Opens the edge leaving `pos` in `dir` and its mirror. Returns the
    /// cell on the other side, or `None` when `dir` leads off the grid.
    pub(crate) fn open(&mut self, pos: Pos, dir: Dir) -> Option<Pos> {
        let next = self.grid.neighbor(pos, dir)?;
        self.open[self.grid.index(pos)][dir.index()] = true;
        self.open[self.grid.index(next)][dir.opposite().index()] = true;
        Some(next)
    }

    /// Opens the edge between two neighbouring cells.
    pub fn open_between(&mut self, a: Pos, b: Pos) -> Result<Dir> {
        let dir = self.grid.direction_between(a, b)?;
        self.open(a, dir);
        Ok(dir)
    }

    pub fn open_edge_count(&self) -> usize {
        let ends: usize = self
            .open
            .iter()
            .map(|sides| sides.iter().filter(|&&o| o).count())
            .sum();
        ends / 2
    }

    /// Cells reachable from `pos` in one step, in [`Dir::ALL`] order.
    pub fn open_neighbors(&self, pos: Pos) -> impl Iterator<Item = (Dir, Pos)> + '_ {
        Dir::ALL.into_iter().filter_map(move |dir| {
            if self.is_open(pos, dir) {
                self.grid.neighbor(pos, dir).map(|next| (dir, next))
            } else {
                None
            }
        })
    }
}

/// A wall knocked down during construction, from the newly joined cell
/// `from` towards its parent `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallRemoval {
    pub from: Pos,
    pub to: Pos,
    pub dir: Dir,
}

/// An immutable maze ready to be played.
#[derive(Clone, Debug)]
pub struct Maze {
    passages: Passages,
    removals: Vec<WallRemoval>,
    start: Pos,
    finish: Pos,
    path_length: u32,
    seed: Option<u32>,
}

impl Maze {
    /// Builds the maze for `seed` on a `size x size` grid.
    ///
    /// Draw order on the seeded generator: the first Prim cell, every
    /// frontier and parent pick, then the diameter search anchor. The same
    /// seed and size always yield the same maze.
    pub fn generate(size: usize, seed: u32) -> Result<Self> {
        let grid = Grid::new(size)?;
        let mut rng = MazeRng::new(seed);
        let origin = Pos::new(rng.pick_index(size), rng.pick_index(size));
        let (passages, removals) = carve(grid, origin, &mut rng);
        let ends = find_endpoints(&passages, &mut rng);
        debug!(
            "built {size}x{size} maze from seed {seed}: start {:?} finish {:?} path {} cells",
            ends.start, ends.finish, ends.length
        );
        Ok(Self {
            passages,
            removals,
            start: ends.start,
            finish: ends.finish,
            path_length: ends.length,
            seed: Some(seed),
        })
    }

    /// Wraps a hand-built passage layout. Endpoints must be on the grid and
    /// distinct unless the grid is a single cell.
    pub fn from_passages(passages: Passages, start: Pos, finish: Pos) -> Result<Self> {
        let grid = passages.grid();
        if !grid.contains(start) || !grid.contains(finish) {
            return Err(MazeError::InvalidArgument(format!(
                "endpoints {start:?} and {finish:?} must lie on the {0}x{0} grid",
                grid.size()
            )));
        }
        if start == finish && grid.cell_count() > 1 {
            return Err(MazeError::InvalidArgument(
                "start and finish must differ".to_string(),
            ));
        }
        let path_length = depths_from(&passages, start).depth(finish);
        Ok(Self {
            passages,
            removals: Vec::new(),
            start,
            finish,
            path_length,
            seed: None,
        })
    }

    pub fn grid(&self) -> Grid {
        self.passages.grid()
    }

    pub fn size(&self) -> usize {
        self.passages.grid().size()
    }

    pub fn passages(&self) -> &Passages {
        &self.passages
    }

    /// Wall removals in construction order. Empty for hand-built mazes.
    pub fn removals(&self) -> &[WallRemoval] {
        &self.removals
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn finish(&self) -> Pos {
        self.finish
    }

    /// Cells on the path from start to finish, both ends included. Zero
    /// when a hand-built layout leaves the finish unreachable.
    pub fn path_length(&self) -> u32 {
        self.path_length
    }

    pub fn seed(&self) -> Option<u32> {
        self.seed
    }
}
