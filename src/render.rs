//! Terminal drawing. Consumes wall removals and traversal events and never
//! feeds anything back into the maze core.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::grid::Pos;
use crate::maze::{Maze, WallRemoval};
use crate::traversal::TraversalEvent;

const CELL_W: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tile {
    Wall,
    Floor,
}

/// Colour a maze cell currently carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Unvisited,
    Path,
    Fault,
    Solved,
}

impl Tint {
    fn color(self) -> Color {
        match self {
            Tint::Unvisited => Color::White,
            Tint::Path => Color::Yellow,
            Tint::Fault => Color::Red,
            Tint::Solved => Color::Green,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Fault,
    Finish,
    Wall,
    Floor,
    Trail,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

/// What the screen shows: a `(2n + 1)` square of tiles where odd rows and
/// columns hold maze cells and the tiles between them hold walls.
pub struct Board {
    size: usize,
    tiles: Vec<Vec<Tile>>,
    tints: Vec<Tint>,
    player: Pos,
    finish: Pos,
    faulted: bool,
}

impl Board {
    pub fn new(maze: &Maze) -> Self {
        let size = maze.size();
        let side = size * 2 + 1;
        let mut board = Self {
            size,
            tiles: vec![vec![Tile::Wall; side]; side],
            tints: vec![Tint::Unvisited; size * size],
            player: maze.start(),
            finish: maze.finish(),
            faulted: false,
        };
        for pos in maze.grid().cells() {
            board.carve_cell(pos);
        }
        if maze.removals().is_empty() {
            // hand-built layouts carry no removal history
            for pos in maze.grid().cells() {
                for (_, next) in maze.passages().open_neighbors(pos) {
                    board.carve_between(pos, next);
                }
            }
        } else {
            for removal in maze.removals() {
                board.apply_removal(*removal);
            }
        }
        board
    }

    /// Side of the tile square.
    pub fn side(&self) -> usize {
        self.size * 2 + 1
    }

    pub fn tint(&self, pos: Pos) -> Tint {
        self.tints[pos.row * self.size + pos.col]
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn apply_removal(&mut self, removal: WallRemoval) {
        self.carve_between(removal.from, removal.to);
    }

    pub fn apply(&mut self, event: TraversalEvent) {
        match event {
            TraversalEvent::Visited(pos) => self.set_tint(pos, Tint::Path),
            TraversalEvent::Unvisited(pos) => self.set_tint(pos, Tint::Unvisited),
            TraversalEvent::Violation(pos) => {
                self.set_tint(pos, Tint::Fault);
                self.faulted = true;
            }
            TraversalEvent::Solved(pos) => self.set_tint(pos, Tint::Solved),
            TraversalEvent::Relocated(pos) => self.player = pos,
        }
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = TraversalEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    fn set_tint(&mut self, pos: Pos, tint: Tint) {
        let idx = pos.row * self.size + pos.col;
        self.tints[idx] = tint;
    }

    fn carve_cell(&mut self, pos: Pos) {
        self.tiles[pos.row * 2 + 1][pos.col * 2 + 1] = Tile::Floor;
    }

    fn carve_between(&mut self, a: Pos, b: Pos) {
        let row = a.row + b.row + 1;
        let col = a.col + b.col + 1;
        self.tiles[row][col] = Tile::Floor;
    }

    /// Maze cell shown at tile `(x, y)`, if the tile is a cell and not a wall slot.
    fn cell_at(&self, x: usize, y: usize) -> Option<Pos> {
        if x % 2 == 1 && y % 2 == 1 {
            Some(Pos::new(y / 2, x / 2))
        } else {
            None
        }
    }

    /// Tint of an open wall slot: shared by the cells on both sides, or none.
    fn slot_tint(&self, x: usize, y: usize) -> Tint {
        let (a, b) = if y % 2 == 1 {
            (Pos::new(y / 2, x / 2 - 1), Pos::new(y / 2, x / 2))
        } else {
            (Pos::new(y / 2 - 1, x / 2), Pos::new(y / 2, x / 2))
        };
        let tint = self.tint(a);
        if tint == self.tint(b) {
            tint
        } else {
            Tint::Unvisited
        }
    }

    fn cell_for(&self, x: usize, y: usize) -> Cell {
        if self.tiles[y][x] == Tile::Wall {
            return Cell {
                glyph: Glyph::Wall,
                color: Color::Blue,
            };
        }
        match self.cell_at(x, y) {
            Some(pos) if pos == self.player => Cell {
                glyph: if self.faulted { Glyph::Fault } else { Glyph::Player },
                color: Color::Yellow,
            },
            Some(pos) if pos == self.finish => Cell {
                glyph: Glyph::Finish,
                color: self.tint(pos).color(),
            },
            Some(pos) => trail_cell(self.tint(pos)),
            None => trail_cell(self.slot_tint(x, y)),
        }
    }
}

fn trail_cell(tint: Tint) -> Cell {
    match tint {
        Tint::Unvisited => Cell {
            glyph: Glyph::Floor,
            color: Color::Reset,
        },
        _ => Cell {
            glyph: Glyph::Trail,
            color: tint.color(),
        },
    }
}

pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(side: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Floor,
                    color: Color::Reset,
                };
                side * side
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Forces the next frame to redraw every tile.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    /// Draws one frame and returns whether the board is on screen. A
    /// terminal too small for the board gets a notice instead.
    pub fn render(&mut self, stdout: &mut impl Write, board: &Board, hud: &str) -> io::Result<bool> {
        let side = board.side();

        stdout.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        let Some((origin_x, origin_y)) = layout(term_w, term_h, side) else {
            let (needed_w, needed_h) = board_extent(side);
            stdout.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}. Paused.",
                needed_w, needed_h, term_w, term_h
            );
            stdout.queue(Print(msg))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(false);
        };

        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
        }

        if self.needs_full || hud != self.last_hud {
            stdout.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud.to_string();
        }

        for y in 0..side {
            for x in 0..side {
                let cell = board.cell_for(x, y);
                let idx = y * side + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(stdout, x, y, cell)?;
                }
            }
        }
        self.needs_full = false;

        stdout.flush()?;
        Ok(true)
    }

    /// Writes `text` on the line just below the maze.
    pub fn render_footer(&self, stdout: &mut impl Write, board: &Board, text: &str) -> io::Result<()> {
        stdout.queue(MoveTo(self.origin_x, self.origin_y + board.side() as u16))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(text))?;
        stdout.flush()
    }

    fn draw_cell(&self, stdout: &mut impl Write, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Player => "😃",
            Glyph::Fault => "😵",
            Glyph::Finish => "🏁",
            Glyph::Wall => "██",
            Glyph::Floor => "  ",
            Glyph::Trail => "░░",
        };
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        stdout.queue(MoveTo(x_pos, y_pos))?;
        stdout.queue(SetForegroundColor(cell.color))?;
        stdout.queue(Print(text))?;
        pad(stdout, text, CELL_W)?;
        stdout.queue(ResetColor)?;
        Ok(())
    }
}

/// Columns and rows a board of `side` tiles needs, HUD and footer included.
fn board_extent(side: usize) -> (usize, usize) {
    (side * CELL_W, side + 2)
}

/// Top-left corner of a centred board, or `None` when it does not fit.
fn layout(term_w: u16, term_h: u16, side: usize) -> Option<(u16, u16)> {
    let (needed_w, needed_h) = board_extent(side);
    let free_w = usize::from(term_w).checked_sub(needed_w)?;
    let free_h = usize::from(term_h).checked_sub(needed_h)?;
    Some(((free_w / 2) as u16, (free_h / 2) as u16 + 1))
}

/// Clears the screen and prints `lines` centred, one per row.
pub fn render_screen(stdout: &mut impl Write, lines: &[String]) -> io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    stdout.queue(Clear(ClearType::All))?;
    let top = term_h.saturating_sub(lines.len() as u16) / 2;
    for (i, line) in lines.iter().enumerate() {
        let w = UnicodeWidthStr::width(line.as_str()) as u16;
        stdout.queue(MoveTo(term_w.saturating_sub(w) / 2, top + i as u16))?;
        stdout.queue(Print(line))?;
    }
    stdout.flush()
}

fn pad(stdout: &mut impl Write, text: &str, width: usize) -> io::Result<()> {
    let w = UnicodeWidthStr::width(text);
    if w < width {
        for _ in 0..(width - w) {
            stdout.queue(Print(' '))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::maze::Passages;
    use crate::traversal::{Intent, TraversalEngine};

    fn l_shape() -> Maze {
        let mut passages = Passages::new(Grid::new(2).unwrap());
        passages.open_between(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
        passages.open_between(Pos::new(0, 1), Pos::new(1, 1)).unwrap();
        Maze::from_passages(passages, Pos::new(0, 0), Pos::new(1, 1)).unwrap()
    }

    #[test]
    fn removals_open_the_slot_between_cells() {
        let maze = Maze::generate(4, 9).unwrap();
        let board = Board::new(&maze);
        assert_eq!(board.side(), 9);
        let floors = board
            .tiles
            .iter()
            .flatten()
            .filter(|&&t| t == Tile::Floor)
            .count();
        // 16 cells plus 15 opened walls
        assert_eq!(floors, 31);
        for removal in maze.removals() {
            let row = removal.from.row + removal.to.row + 1;
            let col = removal.from.col + removal.to.col + 1;
            assert!(board.tiles[row][col] == Tile::Floor);
        }
    }

    #[test]
    fn hand_built_layout_is_carved_from_passages() {
        let board = Board::new(&l_shape());
        assert!(board.tiles[1][2] == Tile::Floor);
        assert!(board.tiles[2][3] == Tile::Floor);
        assert!(board.tiles[2][1] == Tile::Wall);
    }

    #[test]
    fn events_recolor_cells_and_move_the_player() {
        let maze = l_shape();
        let mut engine = TraversalEngine::new(&maze);
        let mut board = Board::new(&maze);
        board.apply_all(engine.initial_events());
        assert_eq!(board.tint(Pos::new(0, 0)), Tint::Path);

        board.apply_all(engine.step(Intent::Right).events);
        assert_eq!(board.player(), Pos::new(0, 1));
        assert_eq!(board.tint(Pos::new(0, 1)), Tint::Path);

        board.apply_all(engine.step(Intent::Down).events);
        for pos in [Pos::new(0, 0), Pos::new(0, 1), Pos::new(1, 1)] {
            assert_eq!(board.tint(pos), Tint::Solved);
        }
        assert_eq!(board.tint(Pos::new(1, 0)), Tint::Unvisited);
    }

    #[test]
    fn board_is_centred_when_it_fits() {
        // Easy: 10x10 cells, 21 tiles a side
        assert_eq!(layout(80, 24, 21), Some((19, 1)));
        assert_eq!(layout(42, 23, 21), Some((0, 1)));
        assert_eq!(layout(41, 23, 21), None);
        assert_eq!(layout(42, 22, 21), None);
    }

    #[test]
    fn larger_boards_do_not_fit_a_default_terminal() {
        for cells in [20, 30, 60] {
            assert_eq!(layout(80, 24, cells * 2 + 1), None, "{cells} cells");
        }
        assert_eq!(layout(82, 43, 41), Some((0, 1)));
    }

    #[test]
    fn violation_marks_the_fault() {
        let maze = l_shape();
        let mut board = Board::new(&maze);
        board.apply(TraversalEvent::Violation(Pos::new(0, 0)));
        board.apply(TraversalEvent::Relocated(Pos::new(0, 0)));
        assert_eq!(board.tint(Pos::new(0, 0)), Tint::Fault);
        assert!(board.faulted);
    }
}
