use std::io;

use crate::entity::{Canvas, Draw};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// points per side, drawn as "Player 1" (left) and "Player 2" (right) on one row.
#[derive(Debug)]
pub struct Score {
    left: u32,
    right: u32,
    row: u16,
    col: u16,
    spacing: u16,
}

impl Score {
    pub fn new(row: u16, col: u16, spacing: u16) -> Self {
        Self {
            left: 0,
            right: 0,
            row,
            col,
            spacing,
        }
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn right(&self) -> u32 {
        self.right
    }

    pub fn total(&self) -> u32 {
        self.left + self.right
    }

    pub fn point(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

impl Draw for Score {
    fn draw(&self, canvas: &mut dyn Canvas) -> io::Result<()> {
        canvas.put_str(self.row, self.col, &format!("Player 1: {}", self.left))?;
        canvas.put_str(
            self.row,
            self.col + self.spacing,
            &format!("Player 2: {}", self.right),
        )
    }
}
