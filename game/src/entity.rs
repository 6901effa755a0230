use std::io;

/// a cell on the board. `x` is the column and `y` the row, both counted from the top left corner
/// of the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// the drawing primitives entities render themselves with.
pub trait Canvas {
    fn put_char(&mut self, row: u16, col: u16, glyph: char) -> io::Result<()>;

    fn put_str(&mut self, row: u16, col: u16, text: &str) -> io::Result<()>;
}

pub trait Draw {
    fn draw(&self, canvas: &mut dyn Canvas) -> io::Result<()>;
}

/// converts a committed board coordinate to a screen coordinate. committed positions are never
/// negative, anything else is clamped onto the border.
pub(crate) fn screen_coord(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}
