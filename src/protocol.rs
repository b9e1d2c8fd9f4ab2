//! Text messages exchanged with the game server
//!
//! The server sends one command per message, words separated by spaces:
//!
//! | server                              | player            |
//! |-------------------------------------|-------------------|
//! | `name`                              | `setname <name>`  |
//! | `start [black\|white]`              | `ready`           |
//! | `go <own> <opp> <legal> [<moves>]`  | `move <column>`   |
//! | `end [win\|lose\|draw]`             | `bye`             |
//! | `quit`                              | nothing, hang up  |
//!
//! `<own>` and `<opp>` are the decimal bitboards of both players, `<legal>`
//! and `<moves>` strings of column digits.

use anyhow::{anyhow, Context, Result};

use std::fmt;

use crate::bitboard::{self, StoneSet};
use crate::playout::Side;
use crate::strategy::MoveRequest;
use crate::WIDTH;

/// The result of a game as seen by the player
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Lose,
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Name,
    /// A new game, with the colour we play if the server said so
    Start(Option<Side>),
    Go(MoveRequest),
    End(Option<GameResult>),
    Quit,
    /// Anything else, holds the first word
    Unknown(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    SetName(String),
    Ready,
    Move(usize),
    Bye,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::SetName(name) => write!(f, "setname {}", name),
            Reply::Ready => write!(f, "ready"),
            Reply::Move(column) => write!(f, "move {}", column),
            Reply::Bye => write!(f, "bye"),
        }
    }
}

/// Decodes one message from the server
pub fn parse_command(msg: &str) -> Result<Command> {
    let mut words = msg.split_whitespace();

    let command = match words.next() {
        Some(command) => command,
        None => return Ok(Command::Unknown(String::new())),
    };

    match command {
        "name" => Ok(Command::Name),
        "start" => Ok(Command::Start(match words.next() {
            Some("black") => Some(Side::Black),
            Some("white") => Some(Side::White),
            _ => None,
        })),
        "go" => parse_go(words.collect()).map(Command::Go),
        "end" => Ok(Command::End(match words.next() {
            Some("win") => Some(GameResult::Win),
            Some("lose") => Some(GameResult::Lose),
            Some("draw") => Some(GameResult::Draw),
            _ => None,
        })),
        "quit" => Ok(Command::Quit),
        other => Ok(Command::Unknown(other.to_string())),
    }
}

/// Decodes a string of column digits such as `0123456`
pub fn parse_columns(word: &str) -> Result<Vec<usize>> {
    word.chars()
        .map(|column_char| match column_char.to_digit(10).map(|c| c as usize) {
            Some(column) if column < WIDTH => Ok(column),
            _ => Err(anyhow!("could not parse '{}' as a valid move", column_char)),
        })
        .collect()
}

fn parse_stones(word: Option<&str>, what: &str) -> Result<StoneSet> {
    let word = word.ok_or_else(|| anyhow!("go: missing {}", what))?;
    word.parse::<StoneSet>()
        .with_context(|| format!("go: could not parse {} '{}'", what, word))
}

fn parse_go(args: Vec<&str>) -> Result<MoveRequest> {
    if args.len() > 4 {
        return Err(anyhow!("go: expected at most 4 arguments, got {}", args.len()));
    }
    let mut args = args.into_iter();

    let own = parse_stones(args.next(), "own stones")?;
    let opp = parse_stones(args.next(), "opponent stones")?;
    bitboard::validate_position(own, opp)?;

    let legal = parse_columns(args.next().ok_or_else(|| anyhow!("go: missing legal moves"))?)?;
    // the history is left out before the first move
    let history = match args.next() {
        Some(word) => parse_columns(word)?,
        None => Vec::new(),
    };

    let playable = bitboard::legal_moves(own, opp);
    if let Some(column) = legal.iter().find(|&&column| !playable.contains(column)) {
        return Err(anyhow!("go: column {} is offered but full", column));
    }

    Ok(MoveRequest {
        own,
        opp,
        legal,
        history,
    })
}
