use std::fmt::{self, Debug, Display};

use crate::entity::Position;

/// what occupies a single cell of the [`CollisionMap`]. the wall kinds are never stored in the
/// grid, [`CollisionMap::query`] reports them in place of an out of range footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    Empty,
    TopWall,
    BottomWall,
    LeftWall,
    RightWall,
    Paddle,
    Ball,
}

impl Cell {
    const ALL: [Cell; 7] = [
        Cell::Empty,
        Cell::TopWall,
        Cell::BottomWall,
        Cell::LeftWall,
        Cell::RightWall,
        Cell::Paddle,
        Cell::Ball,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Display::fmt("empty", f),
            Cell::TopWall => Display::fmt("top wall", f),
            Cell::BottomWall => Display::fmt("bottom wall", f),
            Cell::LeftWall => Display::fmt("left wall", f),
            Cell::RightWall => Display::fmt("right wall", f),
            Cell::Paddle => Display::fmt("paddle", f),
            Cell::Ball => Display::fmt("ball", f),
        }
    }
}

/// the set of [`Cell`] kinds a footprint overlaps, one bit per kind.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Collisions(u8);

impl Collisions {
    pub const EMPTY: Self = Self::only(Cell::Empty);
    pub const PADDLE: Self = Self::only(Cell::Paddle);
    pub const EMPTY_PADDLE: Self = Self::EMPTY.with(Cell::Paddle);
    pub const BALL_PADDLE: Self = Self::only(Cell::Ball).with(Cell::Paddle);
    pub const TOP_WALL: Self = Self::only(Cell::TopWall);
    pub const BOTTOM_WALL: Self = Self::only(Cell::BottomWall);
    pub const LEFT_WALL: Self = Self::only(Cell::LeftWall);
    pub const RIGHT_WALL: Self = Self::only(Cell::RightWall);

    pub const fn only(cell: Cell) -> Self {
        Self(cell.bit())
    }

    pub const fn with(self, cell: Cell) -> Self {
        Self(self.0 | cell.bit())
    }

    pub const fn contains(self, cell: Cell) -> bool {
        self.0 & cell.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Cell> {
        Cell::ALL.into_iter().filter(move |cell| self.contains(*cell))
    }
}

impl FromIterator<Cell> for Collisions {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |collisions, cell| collisions.with(cell))
    }
}

impl Debug for Collisions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Display for Collisions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, cell) in self.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            Display::fmt(&cell, f)?;
        }
        write!(f, "}}")
    }
}

/// an entity that occupies cells of the [`CollisionMap`].
///
/// a move is evaluated in two steps: the entity proposes a `tentative` position, the map is
/// queried with it, and only if the entity accepts the result is the move committed with
/// [`CollisionMap::commit`].
pub trait Collidable {
    fn kind(&self) -> Cell;

    fn width(&self) -> i32;

    fn height(&self) -> i32;

    /// the committed top left cell of the footprint.
    fn position(&self) -> Position;

    /// the proposed top left cell of the footprint, only meaningful during a move.
    fn tentative(&self) -> Position;

    /// makes the tentative position the committed one.
    fn settle(&mut self);
}

/// a grid of [`Cell`] markers covering the whole board, border included. the map knows nothing
/// about game rules, it only answers what a footprint overlaps.
pub struct CollisionMap {
    height: i32,
    width: i32,
    cells: Vec<Cell>,
}

impl CollisionMap {
    pub fn new(height: i32, width: i32) -> Self {
        let height = height.max(0);
        let width = width.max(0);
        Self {
            height,
            width,
            cells: vec![Cell::Empty; (height * width) as usize],
        }
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn get(&self, position: Position) -> Option<Cell> {
        self.index(position).map(|idx| self.cells[idx])
    }

    /// every non empty cell of the grid, row by row.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell != Cell::Empty)
            .map(|(idx, cell)| {
                let idx = idx as i32;
                (Position::new(idx % self.width, idx / self.width), *cell)
            })
    }

    /// the kinds the entity's tentative footprint would overlap.
    ///
    /// an out of range footprint short circuits to exactly one wall marker, checked in the order
    /// left, right, top, bottom. callers depend on that precedence.
    pub fn query<E: Collidable + ?Sized>(&self, entity: &E) -> Collisions {
        let Position { x, y } = entity.tentative();
        let (width, height) = (entity.width(), entity.height());
        if x < 1 {
            return Collisions::LEFT_WALL;
        }
        if x >= self.width + 1 - width {
            return Collisions::RIGHT_WALL;
        }
        if y < 1 {
            return Collisions::TOP_WALL;
        }
        if y >= self.height - height {
            return Collisions::BOTTOM_WALL;
        }
        footprint(entity.tentative(), width, height)
            .filter_map(|position| self.get(position))
            .collect()
    }

    /// moves the entity from its committed footprint to its tentative one. the move is not
    /// validated, [`CollisionMap::query`] must have been consulted first.
    ///
    /// only cells still marked with the entity's own kind are cleared, so a cell another entity
    /// has since claimed keeps its marker.
    pub fn commit<E: Collidable + ?Sized>(&mut self, entity: &mut E) {
        let kind = entity.kind();
        let (width, height) = (entity.width(), entity.height());
        for position in footprint(entity.position(), width, height) {
            if let Some(idx) = self.index(position) {
                if self.cells[idx] == kind {
                    self.cells[idx] = Cell::Empty;
                }
            }
        }
        for position in footprint(entity.tentative(), width, height) {
            if let Some(idx) = self.index(position) {
                self.cells[idx] = kind;
            }
        }
        entity.settle();
    }

    fn index(&self, Position { x, y }: Position) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some((y * self.width + x) as usize)
        }
    }
}

fn footprint(origin: Position, width: i32, height: i32) -> impl Iterator<Item = Position> {
    (0..height).flat_map(move |dy| (0..width).map(move |dx| origin.offset(dx, dy)))
}
