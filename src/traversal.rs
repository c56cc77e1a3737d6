//! Player movement through a built maze under the no-revisit rule.
//!
//! One intent per tick. Moving into an unvisited cell extends the path;
//! stepping back onto the path is a violation. Reaching the finish wins.
//! Both outcomes are final.

use log::info;

use crate::grid::{Dir, Grid, Pos};
use crate::maze::{Maze, Passages};

/// What the player asked for this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Intent {
    #[default]
    None,
    Left,
    Up,
    Right,
    Down,
}

impl Intent {
    pub fn direction(self) -> Option<Dir> {
        match self {
            Intent::None => None,
            Intent::Left => Some(Dir::Left),
            Intent::Up => Some(Dir::Up),
            Intent::Right => Some(Dir::Right),
            Intent::Down => Some(Dir::Down),
        }
    }
}

impl From<Dir> for Intent {
    fn from(dir: Dir) -> Self {
        match dir {
            Dir::Left => Intent::Left,
            Dir::Up => Intent::Up,
            Dir::Right => Intent::Right,
            Dir::Down => Intent::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    Won,
    Violated,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Playing
    }
}

/// Recolor and relocate notifications for whoever draws the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalEvent {
    /// Cell joined the current path.
    Visited(Pos),
    /// Cell left the path again (the cell abandoned by a violating move).
    Unvisited(Pos),
    /// Cell where the player crossed their own path.
    Violation(Pos),
    /// Cell is part of the winning path.
    Solved(Pos),
    /// Player now stands here.
    Relocated(Pos),
}

/// Cells on the current path, one flag per grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitedSet {
    grid: Grid,
    cells: Vec<bool>,
}

impl VisitedSet {
    fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![false; grid.cell_count()],
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.grid.contains(pos) && self.cells[self.grid.index(pos)]
    }

    fn insert(&mut self, pos: Pos) {
        let idx = self.grid.index(pos);
        self.cells[idx] = true;
    }

    fn remove(&mut self, pos: Pos) {
        let idx = self.grid.index(pos);
        self.cells[idx] = false;
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visited cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(|(i, _)| self.grid.pos_at(i))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    position: Pos,
    visited: VisitedSet,
}

impl PlayerState {
    pub fn position(&self) -> Pos {
        self.position
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }
}

/// Result of a single tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    pub outcome: Outcome,
    pub position: Pos,
    pub events: Vec<TraversalEvent>,
}

#[derive(Clone, Debug)]
pub struct TraversalEngine {
    passages: Passages,
    finish: Pos,
    player: PlayerState,
    outcome: Outcome,
}

impl TraversalEngine {
    /// Places the player on the maze's start. A maze whose start is its
    /// finish (a single cell) is already won.
    pub fn new(maze: &Maze) -> Self {
        let grid = maze.grid();
        let mut visited = VisitedSet::new(grid);
        visited.insert(maze.start());
        let outcome = if maze.start() == maze.finish() {
            Outcome::Won
        } else {
            Outcome::Playing
        };
        Self {
            passages: maze.passages().clone(),
            finish: maze.finish(),
            player: PlayerState {
                position: maze.start(),
                visited,
            },
            outcome,
        }
    }

    /// Events describing the initial state: the start cell is on the path
    /// and holds the player.
    pub fn initial_events(&self) -> Vec<TraversalEvent> {
        let start = self.player.position;
        let mut events = vec![TraversalEvent::Visited(start), TraversalEvent::Relocated(start)];
        if self.outcome == Outcome::Won {
            events.push(TraversalEvent::Solved(start));
        }
        events
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn finish(&self) -> Pos {
        self.finish
    }

    /// Applies one intent. Blocked moves, empty intents and anything after a
    /// terminal outcome change nothing and emit no events.
    pub fn step(&mut self, intent: Intent) -> Tick {
        let mut events = Vec::new();
        if let (Outcome::Playing, Some(dir)) = (self.outcome, intent.direction()) {
            self.advance(dir, &mut events);
        }
        Tick {
            outcome: self.outcome,
            position: self.player.position,
            events,
        }
    }

    fn advance(&mut self, dir: Dir, events: &mut Vec<TraversalEvent>) {
        let current = self.player.position;
        if !self.passages.is_open(current, dir) {
            return;
        }
        let Some(target) = self.passages.grid().neighbor(current, dir) else {
            return;
        };

        if self.player.visited.contains(target) {
            self.player.visited.remove(current);
            self.player.position = target;
            self.outcome = Outcome::Violated;
            events.push(TraversalEvent::Unvisited(current));
            events.push(TraversalEvent::Violation(target));
            events.push(TraversalEvent::Relocated(target));
            info!("path crossed itself at {target:?}");
            return;
        }

        self.player.visited.insert(target);
        self.player.position = target;
        events.push(TraversalEvent::Visited(target));
        events.push(TraversalEvent::Relocated(target));

        if target == self.finish {
            self.outcome = Outcome::Won;
            events.extend(self.player.visited.iter().map(TraversalEvent::Solved));
            info!("finish reached after {} cells", self.player.visited.len());
        }
    }
}
