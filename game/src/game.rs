use std::{collections::HashMap, io, thread::sleep, time::Duration};

use log::info;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    ball::Ball,
    collision_map::CollisionMap,
    entity::{Canvas, Draw},
    paddle::{Control, Direction, Paddle, PADDLE_HEIGHT},
    score::{Score, Side},
    CollisionError, GameError,
};

/// the pause between two ticks.
pub const TICK: Duration = Duration::from_millis(50);
/// how long a tick waits for a key press before simulating anyway.
pub const INPUT_TIMEOUT: Duration = Duration::from_millis(50);
pub const MIN_ROWS: u16 = 8;
pub const MIN_COLS: u16 = 16;

/// the screen and keyboard the game is played on.
pub trait Terminal: Canvas {
    /// waits at most `timeout` for a key press.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<char>>;

    fn clear(&mut self) -> io::Result<()>;

    fn draw_border(&mut self) -> io::Result<()>;

    fn refresh(&mut self) -> io::Result<()>;
}

/// which paddles are played from the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// both paddles are computer controlled.
    Demo,
    /// the left paddle is played, the right one is computer controlled.
    #[default]
    Single,
    /// both paddles are played from the same keyboard.
    Versus,
}

impl Mode {
    pub fn controls(self) -> (Control, Control) {
        match self {
            Mode::Demo => (Control::Ai, Control::Ai),
            Mode::Single => (Control::Human, Control::Ai),
            Mode::Versus => (Control::Human, Control::Human),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move(Side, Direction),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// owns the collision map and every entity on it, and drives them one tick at a time.
pub struct Game {
    map: CollisionMap,
    left: Paddle,
    right: Paddle,
    ball: Ball,
    score: Score,
    rng: StdRng,
    key_map: HashMap<char, Action>,
}

impl Game {
    /// sets up a board filling a `rows` by `cols` terminal.
    pub fn new(rows: u16, cols: u16, mode: Mode) -> Result<Self, GameError> {
        Self::with_rng(rows, cols, mode, StdRng::from_entropy())
    }

    pub fn with_seed(rows: u16, cols: u16, mode: Mode, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(rows, cols, mode, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rows: u16, cols: u16, mode: Mode, mut rng: StdRng) -> Result<Self, GameError> {
        if rows < MIN_ROWS || cols < MIN_COLS {
            return Err(GameError::BoardTooSmall { rows, cols });
        }
        // the last column belongs to the border.
        let mut map = CollisionMap::new(rows as i32, cols as i32 - 1);
        info!(
            "terminal is {rows}x{cols}, collision map is {}x{}",
            map.height(),
            map.width()
        );
        let (left_control, right_control) = mode.controls();
        let top = (rows as i32 - PADDLE_HEIGHT) / 2;
        let left = Paddle::new(2, top, left_control, &mut map);
        let right = Paddle::new(map.width() - 2, top, right_control, &mut map);
        let ball = Ball::new(&mut map, &mut rng);
        Ok(Self {
            map,
            left,
            right,
            ball,
            score: Score::new(0, cols / 4, cols / 4),
            rng,
            key_map: key_map(left_control, right_control),
        })
    }

    pub fn map(&self) -> &CollisionMap {
        &self.map
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// the action bound to `key`, if any.
    pub fn action_for(&self, key: char) -> Option<Action> {
        self.key_map.get(&key).copied()
    }

    pub fn apply(&mut self, action: Action) -> Result<Flow, CollisionError> {
        match action {
            Action::Move(side, direction) => {
                let paddle = match side {
                    Side::Left => &mut self.left,
                    Side::Right => &mut self.right,
                };
                paddle.step(direction, &mut self.map)?;
                Ok(Flow::Continue)
            }
            Action::Quit => Ok(Flow::Quit),
        }
    }

    /// moves the ball, then lets the computer controlled paddles react to it.
    pub fn update(&mut self) -> Result<(), CollisionError> {
        self.ball.step(&mut self.map, &mut self.score, &mut self.rng)?;
        self.right.think(&self.ball, &mut self.map)?;
        self.left.think(&self.ball, &mut self.map)
    }

    pub fn render<T: Terminal>(&self, terminal: &mut T) -> io::Result<()> {
        terminal.clear()?;
        terminal.draw_border()?;
        let entities: [&dyn Draw; 4] = [&self.left, &self.right, &self.ball, &self.score];
        for entity in entities {
            entity.draw(&mut *terminal)?;
        }
        terminal.refresh()
    }

    /// reads at most one key, then simulates and draws a single frame.
    pub fn tick<T: Terminal>(&mut self, terminal: &mut T) -> Result<Flow, GameError> {
        let action = terminal
            .poll_key(INPUT_TIMEOUT)?
            .and_then(|key| self.action_for(key));
        if let Some(action) = action {
            if self.apply(action)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
        self.update()?;
        self.render(terminal)?;
        Ok(Flow::Continue)
    }

    /// ticks until the quit key is pressed, sleeping `pace` between ticks.
    pub fn run<T: Terminal>(&mut self, terminal: &mut T, pace: Duration) -> Result<(), GameError> {
        info!("game started");
        while self.tick(terminal)? == Flow::Continue {
            sleep(pace);
        }
        info!(
            "game quit at {} - {}",
            self.score.left(),
            self.score.right()
        );
        Ok(())
    }
}

fn key_map(left: Control, right: Control) -> HashMap<char, Action> {
    let mut key_map = HashMap::from([('q', Action::Quit)]);
    if left == Control::Human {
        key_map.insert('w', Action::Move(Side::Left, Direction::Up));
        key_map.insert('s', Action::Move(Side::Left, Direction::Down));
    }
    if right == Control::Human {
        key_map.insert('i', Action::Move(Side::Right, Direction::Up));
        key_map.insert('k', Action::Move(Side::Right, Direction::Down));
    }
    key_map
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{HashMap, VecDeque},
        io,
        time::Duration,
    };

    use proptest::prelude::*;

    use crate::{
        ball::{Ball, BALL_GLYPH},
        collision_map::Cell,
        entity::{Canvas, Position},
        game::{Action, Flow, Game, Mode, Terminal},
        paddle::{Control, Direction, PADDLE_GLYPH},
        score::Side,
        GameError,
    };

    /// plays back a list of key presses, then presses 'q'.
    #[derive(Default)]
    struct ScriptedTerminal {
        keys: VecDeque<Option<char>>,
        screen: HashMap<(u16, u16), char>,
        borders: usize,
        frames: usize,
    }

    impl ScriptedTerminal {
        fn new(keys: &[Option<char>]) -> Self {
            Self {
                keys: keys.iter().copied().collect(),
                ..Default::default()
            }
        }

        fn text_at(&self, row: u16, col: u16, len: usize) -> String {
            (col..col + len as u16)
                .map(|col| self.screen.get(&(row, col)).copied().unwrap_or(' '))
                .collect()
        }
    }

    impl Canvas for ScriptedTerminal {
        fn put_char(&mut self, row: u16, col: u16, glyph: char) -> io::Result<()> {
            self.screen.insert((row, col), glyph);
            Ok(())
        }

        fn put_str(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
            for (idx, glyph) in text.chars().enumerate() {
                self.screen.insert((row, col + idx as u16), glyph);
            }
            Ok(())
        }
    }

    impl Terminal for ScriptedTerminal {
        fn poll_key(&mut self, _timeout: Duration) -> io::Result<Option<char>> {
            Ok(self.keys.pop_front().unwrap_or(Some('q')))
        }

        fn clear(&mut self) -> io::Result<()> {
            self.screen.clear();
            Ok(())
        }

        fn draw_border(&mut self) -> io::Result<()> {
            self.borders += 1;
            Ok(())
        }

        fn refresh(&mut self) -> io::Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    fn cells(game: &Game, kind: Cell) -> usize {
        game.map().occupied().filter(|(_, cell)| *cell == kind).count()
    }

    #[test]
    fn layout() {
        let game = Game::with_seed(24, 80, Mode::Single, 1).unwrap();
        assert_eq!((game.map().height(), game.map().width()), (24, 79));
        assert_eq!(game.paddle(Side::Left).position(), Position::new(2, 10));
        assert_eq!(game.paddle(Side::Right).position(), Position::new(77, 10));
        assert_eq!(game.paddle(Side::Left).control(), Control::Human);
        assert_eq!(game.paddle(Side::Right).control(), Control::Ai);
        assert_eq!(game.ball().position(), Ball::centre(game.map()));
        assert_eq!(cells(&game, Cell::Paddle), 8);
        assert_eq!(cells(&game, Cell::Ball), 1);
    }

    #[test]
    fn board_too_small() {
        assert!(matches!(
            Game::new(7, 80, Mode::Demo),
            Err(GameError::BoardTooSmall { rows: 7, cols: 80 })
        ));
        assert!(matches!(
            Game::new(24, 15, Mode::Demo),
            Err(GameError::BoardTooSmall { rows: 24, cols: 15 })
        ));
        assert!(Game::new(8, 16, Mode::Demo).is_ok());
    }

    #[test]
    fn key_bindings_follow_mode() {
        let single = Game::with_seed(24, 80, Mode::Single, 1).unwrap();
        assert_eq!(
            single.action_for('w'),
            Some(Action::Move(Side::Left, Direction::Up))
        );
        assert_eq!(
            single.action_for('s'),
            Some(Action::Move(Side::Left, Direction::Down))
        );
        assert_eq!(single.action_for('i'), None);
        assert_eq!(single.action_for('x'), None);
        assert_eq!(single.action_for('q'), Some(Action::Quit));

        let versus = Game::with_seed(24, 80, Mode::Versus, 1).unwrap();
        assert_eq!(
            versus.action_for('k'),
            Some(Action::Move(Side::Right, Direction::Down))
        );

        let demo = Game::with_seed(24, 80, Mode::Demo, 1).unwrap();
        assert_eq!(demo.action_for('w'), None);
        assert_eq!(demo.action_for('q'), Some(Action::Quit));
    }

    #[test]
    fn quit_stops_before_simulating() {
        let mut game = Game::with_seed(24, 80, Mode::Single, 3).unwrap();
        let mut terminal = ScriptedTerminal::new(&[Some('q')]);
        game.run(&mut terminal, Duration::ZERO).unwrap();
        assert_eq!(terminal.frames, 0);
        assert_eq!(game.ball().position(), Ball::centre(game.map()));
    }

    #[test]
    fn keys_move_human_paddles() {
        let mut game = Game::with_seed(24, 80, Mode::Single, 3).unwrap();
        let keys = [Some('w'), Some('w'), Some('i'), Some('x'), None];
        let mut terminal = ScriptedTerminal::new(&keys);
        game.run(&mut terminal, Duration::ZERO).unwrap();
        assert_eq!(terminal.frames, 5);
        assert_eq!(game.paddle(Side::Left).position(), Position::new(2, 8));
        assert_eq!(game.paddle(Side::Right).position(), Position::new(77, 10));
        assert_eq!(cells(&game, Cell::Paddle), 8);
    }

    #[test]
    fn renders_every_entity() {
        let mut game = Game::with_seed(24, 80, Mode::Single, 5).unwrap();
        let mut terminal = ScriptedTerminal::new(&[]);
        assert_eq!(game.tick(&mut terminal).unwrap(), Flow::Quit);
        game.render(&mut terminal).unwrap();
        assert_eq!((terminal.frames, terminal.borders), (1, 1));
        let ball = game.ball().position();
        assert_eq!(
            terminal.screen.get(&(ball.y as u16, ball.x as u16)),
            Some(&BALL_GLYPH)
        );
        for row in 10..14 {
            assert_eq!(terminal.screen.get(&(row, 2)), Some(&PADDLE_GLYPH));
            assert_eq!(terminal.screen.get(&(row, 77)), Some(&PADDLE_GLYPH));
        }
        assert_eq!(terminal.text_at(0, 20, 11), "Player 1: 0");
        assert_eq!(terminal.text_at(0, 40, 11), "Player 2: 0");
    }

    #[test]
    fn demo_runs_without_unexpected_collisions() {
        for seed in 0..8 {
            let mut game = Game::with_seed(24, 80, Mode::Demo, seed).unwrap();
            let mut total = 0;
            for _ in 0..5_000 {
                game.update().unwrap();
                assert!(game.score().total() >= total);
                total = game.score().total();
                assert_eq!(cells(&game, Cell::Paddle), 8);
                assert!(cells(&game, Cell::Ball) <= 1);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn any_board_plays_cleanly(
            rows in 8u16..40,
            cols in 16u16..120,
            seed in any::<u64>(),
            keys in proptest::collection::vec(
                proptest::option::of(proptest::sample::select(vec!['w', 's', 'i', 'k', 'x'])),
                0..200,
            ),
        ) {
            let mut game = Game::with_seed(rows, cols, Mode::Versus, seed).unwrap();
            let mut terminal = ScriptedTerminal::new(&keys);
            let mut total = game.score().total();
            while game.tick(&mut terminal).unwrap() == Flow::Continue {
                prop_assert!(game.score().total() >= total);
                total = game.score().total();
            }
            prop_assert_eq!(terminal.frames, keys.len());
            prop_assert_eq!(cells(&game, Cell::Paddle), 8);
        }

        #[test]
        fn computer_paddles_never_fault(
            rows in 8u16..40,
            cols in 16u16..120,
            seed in any::<u64>(),
        ) {
            let mut game = Game::with_seed(rows, cols, Mode::Demo, seed).unwrap();
            for _ in 0..2_000 {
                prop_assert!(game.update().is_ok());
            }
        }
    }
}
