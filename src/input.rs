//! Keyboard handling: turns key presses into at most one intent per tick.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::grid::Dir;
use crate::traversal::Intent;

/// What a key press asks the game loop to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Dir),
    Menu,
    Quit,
}

pub fn command_for(key: KeyEvent) -> Option<Command> {
    // auto-repeat would turn a held key into a walk back over the path
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let command = match key.code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Command::Move(Dir::Left),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Command::Move(Dir::Up),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Command::Move(Dir::Right),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Command::Move(Dir::Down),
        KeyCode::Char('m') | KeyCode::Esc => Command::Menu,
        KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// FIFO of pending moves, drained one per tick.
#[derive(Debug, Default)]
pub struct IntentQueue {
    pending: VecDeque<Dir>,
}

impl IntentQueue {
    pub fn push(&mut self, dir: Dir) {
        self.pending.push_back(dir);
    }

    pub fn next_intent(&mut self) -> Intent {
        self.pending.pop_front().map(Intent::from).unwrap_or(Intent::None)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
