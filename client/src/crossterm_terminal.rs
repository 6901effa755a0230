use std::{
    io::{self, stdout, Stdout, Write},
    time::Duration,
};

use crossterm::{
    cursor::{self, MoveTo},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, DisableLineWrap,
        EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use game::{entity::Canvas, Terminal};

/// the game screen on the alternate buffer of the real terminal. the terminal is put back the way
/// it was when this is dropped.
pub struct CrosstermTerminal {
    stdout: Stdout,
    rows: u16,
    cols: u16,
}

impl CrosstermTerminal {
    pub fn enter() -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            DisableLineWrap,
            cursor::Hide,
            MoveTo(0, 0)
        )?;
        Ok(Self { stdout, rows, cols })
    }

    /// rows and columns, as read when the screen was entered.
    pub fn size(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    fn draw_row(&mut self, row: u16, left: char, fill: char, right: char) -> io::Result<()> {
        let line = std::iter::once(left)
            .chain(std::iter::repeat(fill).take(self.cols.saturating_sub(2) as usize))
            .chain(std::iter::once(right))
            .collect::<String>();
        queue!(self.stdout, MoveTo(0, row), Print(line))
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}

impl Canvas for CrosstermTerminal {
    fn put_char(&mut self, row: u16, col: u16, glyph: char) -> io::Result<()> {
        queue!(self.stdout, MoveTo(col, row), Print(glyph))
    }

    fn put_str(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
        queue!(self.stdout, MoveTo(col, row), Print(text))
    }
}

impl Terminal for CrosstermTerminal {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<char>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let key = match event::read()? {
            // raw mode swallows the interrupt signal, so ctrl-c quits like 'q'.
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                ..
            }) if modifiers.contains(KeyModifiers::CONTROL) => Some('q'),
            Event::Key(KeyEvent {
                code: KeyCode::Char(key),
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => Some(key),
            _ => None,
        };
        Ok(key)
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.stdout, Clear(ClearType::All))
    }

    fn draw_border(&mut self) -> io::Result<()> {
        if self.rows < 2 || self.cols < 2 {
            return Ok(());
        }
        self.draw_row(0, '┌', '─', '┐')?;
        for row in 1..self.rows - 1 {
            queue!(
                self.stdout,
                MoveTo(0, row),
                Print('│'),
                MoveTo(self.cols - 1, row),
                Print('│')
            )?;
        }
        self.draw_row(self.rows - 1, '└', '─', '┘')
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}
