use std::io;

use log::debug;

use crate::{
    ball::Ball,
    collision_map::{Cell, Collidable, CollisionMap, Collisions},
    entity::{screen_coord, Canvas, Draw, Position},
    CollisionError,
};

pub const PADDLE_HEIGHT: i32 = 4;
pub const PADDLE_GLYPH: char = '│';

/// who moves a paddle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Human,
    Ai,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn dy(self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// a vertical paddle. paddles never leave the column they are placed in.
#[derive(Debug)]
pub struct Paddle {
    position: Position,
    tentative: Position,
    height: i32,
    control: Control,
}

impl Paddle {
    /// places a paddle with its top cell at `(x, y)` and stamps it into the map.
    pub fn new(x: i32, y: i32, control: Control, map: &mut CollisionMap) -> Self {
        let mut paddle = Self {
            position: Position::new(x, y),
            tentative: Position::new(x, y),
            height: PADDLE_HEIGHT,
            control,
        };
        map.commit(&mut paddle);
        paddle
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn center(&self) -> i32 {
        self.position.y + self.height / 2
    }

    /// moves the paddle one row. moves into a wall are dropped, moves that clip the ball are
    /// allowed so the paddle can catch it.
    pub fn step(
        &mut self,
        direction: Direction,
        map: &mut CollisionMap,
    ) -> Result<(), CollisionError> {
        self.tentative = self.position.offset(0, direction.dy());
        match map.query(self) {
            Collisions::EMPTY | Collisions::EMPTY_PADDLE | Collisions::BALL_PADDLE => {
                map.commit(self);
                Ok(())
            }
            Collisions::TOP_WALL | Collisions::BOTTOM_WALL => {
                debug!("paddle at column {} blocked moving {direction:?}", self.position.x);
                self.tentative = self.position;
                Ok(())
            }
            collisions => Err(CollisionError {
                kind: Cell::Paddle,
                collisions,
            }),
        }
    }

    /// follows the ball's row, but only once the ball is within a twelfth of the board's width.
    /// human controlled paddles are left alone.
    pub fn think(&mut self, ball: &Ball, map: &mut CollisionMap) -> Result<(), CollisionError> {
        if self.control != Control::Ai {
            return Ok(());
        }
        let distance = (ball.position().x - self.position.x).abs();
        if distance > map.width() / 12 {
            return Ok(());
        }
        let ball_row = ball.position().y;
        let center = self.center();
        if center < ball_row {
            self.step(Direction::Down, map)
        } else if center > ball_row {
            self.step(Direction::Up, map)
        } else {
            Ok(())
        }
    }
}

impl Collidable for Paddle {
    fn kind(&self) -> Cell {
        Cell::Paddle
    }

    fn width(&self) -> i32 {
        1
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn position(&self) -> Position {
        self.position
    }

    fn tentative(&self) -> Position {
        self.tentative
    }

    fn settle(&mut self) {
        self.position = self.tentative;
    }
}

impl Draw for Paddle {
    fn draw(&self, canvas: &mut dyn Canvas) -> io::Result<()> {
        let col = screen_coord(self.position.x);
        for row in self.position.y..self.position.y + self.height {
            canvas.put_char(screen_coord(row), col, PADDLE_GLYPH)?;
        }
        Ok(())
    }
}
