//! Square grid topology: bounds, neighbours and the four movement directions.
//!
//! Coordinates are `(row, col)`. Rows grow downwards, columns grow to the
//! right, so `Up` is `(-1, 0)` and `Left` is `(0, -1)`.

use crate::error::{MazeError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Movement direction. The discriminant doubles as the index into
/// per-cell edge tables, so the order is fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Left = 0,
    Up = 1,
    Right = 2,
    Down = 3,
}

impl Dir {
    /// Scan order used by the builder and the depth search.
    pub const ALL: [Dir; 4] = [Dir::Left, Dir::Up, Dir::Right, Dir::Down];

    /// `(d_row, d_col)` for one step in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Left => (0, -1),
            Dir::Up => (-1, 0),
            Dir::Right => (0, 1),
            Dir::Down => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Down => Dir::Up,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// An `n x n` grid. Carries no per-cell data; containers index into it
/// through [`Grid::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(MazeError::InvalidConfiguration(
                "grid size must be at least 1".to_string(),
            ));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        let n = self.size as isize;
        row >= 0 && row < n && col >= 0 && col < n
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Row-major index of `pos`. Callers must pass an in-bounds cell.
    pub fn index(&self, pos: Pos) -> usize {
        pos.row * self.size + pos.col
    }

    pub fn pos_at(&self, index: usize) -> Pos {
        Pos::new(index / self.size, index % self.size)
    }

    /// The cell one step from `pos` in `dir`, if it is on the grid.
    pub fn neighbor(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = pos.row as isize + dr;
        let col = pos.col as isize + dc;
        if self.in_bounds(row, col) {
            Some(Pos::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// Direction of the single step leading from `a` to `b`.
    pub fn direction_between(&self, a: Pos, b: Pos) -> Result<Dir> {
        if self.contains(a) && self.contains(b) {
            for dir in Dir::ALL {
                if self.neighbor(a, dir) == Some(b) {
                    return Ok(dir);
                }
            }
        }
        Err(MazeError::InvalidArgument(format!(
            "cells ({}, {}) and ({}, {}) are not grid neighbours",
            a.row, a.col, b.row, b.col
        )))
    }

    /// All cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Pos> {
        (0..self.cell_count()).map(move |i| self.pos_at(i))
    }
}
