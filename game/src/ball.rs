use std::io;

use log::{debug, info};
use rand::Rng;

use crate::{
    collision_map::{Cell, Collidable, CollisionMap, Collisions},
    entity::{screen_coord, Canvas, Draw, Position},
    score::{Score, Side},
    CollisionError,
};

pub const BALL_GLYPH: char = '●';

/// the diagonal a ball travels along, one cell per axis each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}

impl Heading {
    pub const DIAGONALS: [Heading; 4] = [
        Heading::new(-1, -1),
        Heading::new(-1, 1),
        Heading::new(1, -1),
        Heading::new(1, 1),
    ];

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// each axis independently picks -1 or 1.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut axis = || if rng.gen_bool(0.5) { 1 } else { -1 };
        let dx = axis();
        let dy = axis();
        Self { dx, dy }
    }
}

/// what a single [`Ball::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallEvent {
    Moved,
    WallBounce,
    PaddleBounce,
    Scored(Side),
}

#[derive(Debug)]
pub struct Ball {
    position: Position,
    tentative: Position,
    heading: Heading,
}

impl Ball {
    /// a ball at the centre of the board, heading along a random diagonal.
    pub fn new<R: Rng + ?Sized>(map: &mut CollisionMap, rng: &mut R) -> Self {
        let centre = Self::centre(map);
        let mut ball = Self {
            position: centre,
            tentative: centre,
            heading: Heading::new(1, 1),
        };
        ball.reset(map, rng);
        ball
    }

    pub fn with_heading(position: Position, heading: Heading, map: &mut CollisionMap) -> Self {
        let mut ball = Self {
            position,
            tentative: position,
            heading,
        };
        map.commit(&mut ball);
        ball
    }

    pub fn centre(map: &CollisionMap) -> Position {
        Position::new(map.width() / 2, map.height() / 2)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// moves the ball back to the centre of the board and picks a new diagonal.
    pub fn reset<R: Rng + ?Sized>(&mut self, map: &mut CollisionMap, rng: &mut R) {
        self.tentative = Self::centre(map);
        map.commit(self);
        self.heading = Heading::random(rng);
        debug!("ball reset heading {:?}", self.heading);
    }

    /// advances the ball one cell along its heading, bouncing off walls and paddles. reaching the
    /// left or right wall scores for the opposite side and resets the ball.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        map: &mut CollisionMap,
        score: &mut Score,
        rng: &mut R,
    ) -> Result<BallEvent, CollisionError> {
        self.tentative = self.position.offset(self.heading.dx, self.heading.dy);
        let event = match map.query(self) {
            Collisions::EMPTY => {
                map.commit(self);
                return Ok(BallEvent::Moved);
            }
            Collisions::TOP_WALL | Collisions::BOTTOM_WALL => {
                self.heading.dy = -self.heading.dy;
                BallEvent::WallBounce
            }
            Collisions::PADDLE | Collisions::BALL_PADDLE => {
                self.heading.dx = -self.heading.dx;
                BallEvent::PaddleBounce
            }
            Collisions::LEFT_WALL => BallEvent::Scored(Side::Right),
            Collisions::RIGHT_WALL => BallEvent::Scored(Side::Left),
            collisions => {
                return Err(CollisionError {
                    kind: Cell::Ball,
                    collisions,
                })
            }
        };
        self.tentative = self.position;
        if let BallEvent::Scored(side) = event {
            score.point(side);
            info!("{side:?} side scored, {} - {}", score.left(), score.right());
            self.reset(map, rng);
        }
        Ok(event)
    }
}

impl Collidable for Ball {
    fn kind(&self) -> Cell {
        Cell::Ball
    }

    fn width(&self) -> i32 {
        1
    }

    fn height(&self) -> i32 {
        1
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

impl Draw for Ball {
    fn draw(&self, canvas: &mut dyn Canvas) -> io::Result<()> {
        canvas.put_char(
            screen_coord(self.position.y),
            screen_coord(self.position.x),
            BALL_GLYPH,
        )
    }
}
