use std::{error::Error, fmt::Display, io};

use collision_map::{Cell, Collisions};

pub mod ball;
pub mod collision_map;
pub mod entity;
pub mod game;
pub mod paddle;
pub mod score;

pub use game::{Game, Mode, Terminal};

/// an entity ran into a combination of cells its movement rules do not cover. on a correctly
/// sized board this never happens, so it is treated as a bug rather than a game event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionError {
    /// the kind of the entity that was moving.
    pub kind: Cell,
    pub collisions: Collisions,
}

impl Display for CollisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unexpected collision: {} hit {}", self.kind, self.collisions)
    }
}

impl Error for CollisionError {}

#[derive(Debug)]
pub enum GameError {
    Collision(CollisionError),
    Io(io::Error),
    BoardTooSmall { rows: u16, cols: u16 },
}

impl Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Collision(err) => Display::fmt(err, f),
            GameError::Io(err) => Display::fmt(err, f),
            GameError::BoardTooSmall { rows, cols } => write!(
                f,
                "terminal is {rows}x{cols}, at least {}x{} is needed",
                game::MIN_ROWS,
                game::MIN_COLS
            ),
        }
    }
}

impl Error for GameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GameError::Collision(source) => Some(source),
            GameError::Io(source) => Some(source),
            GameError::BoardTooSmall { .. } => None,
        }
    }
}

impl From<CollisionError> for GameError {
    fn from(err: CollisionError) -> Self {
        GameError::Collision(err)
    }
}

impl From<io::Error> for GameError {
    fn from(err: io::Error) -> Self {
        GameError::Io(err)
    }
}
