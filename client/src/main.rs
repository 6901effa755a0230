use std::{fs::OpenOptions, io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use crossterm_terminal::CrosstermTerminal;
use env_logger::{Env, Target};
use game::{game::TICK, Game, GameError, Mode};
use log::{error, info};

mod crossterm_terminal;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Option<Start>,
    /// File the game log is appended to
    #[arg(long, default_value = "retro_pong.log")]
    log_file: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Subcommand)]
enum Start {
    /// Watch two computer paddles play each other
    Demo,
    /// Play the left paddle ('w'/'s') against the computer
    Single,
    /// Two players on one keyboard, 'w'/'s' on the left and 'i'/'k' on the right
    Versus,
}

impl From<Start> for Mode {
    fn from(value: Start) -> Self {
        match value {
            Start::Demo => Mode::Demo,
            Start::Single => Mode::Single,
            Start::Versus => Mode::Versus,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logger(&cli) {
        eprintln!("failed to open {}: {err}", cli.log_file.display());
        return ExitCode::FAILURE;
    }
    let mode = cli.command.map(Mode::from).unwrap_or_default();
    info!("starting in {mode:?} mode");
    match play(mode) {
        Ok((left, right)) => {
            println!("Player 1: {left}  Player 2: {right}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            eprintln!("error occurred: {err}");
            ExitCode::FAILURE
        }
    }
}

/// plays until quit and returns the final score. the terminal is restored before this returns,
/// whether the game ended normally or not.
fn play(mode: Mode) -> Result<(u32, u32), GameError> {
    let mut terminal = CrosstermTerminal::enter()?;
    let (rows, cols) = terminal.size();
    let mut game = Game::new(rows, cols, mode)?;
    game.run(&mut terminal, TICK)?;
    Ok((game.score().left(), game.score().right()))
}

fn init_logger(cli: &Cli) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
