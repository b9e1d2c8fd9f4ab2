//! Playing against the game server over a stream connection

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use rand::Rng;

use std::io::{Read, Write};
use std::net::TcpStream;

use crate::protocol::{parse_command, Command, Reply};
use crate::strategy::Strategy;

// the server never sends more than this in one message
const BUFFER_SIZE: usize = 1024;

/// A strategy with the state it needs between messages
pub struct Player<R> {
    strategy: Strategy,
    name: String,
    rng: R,
}

impl<R: Rng> Player<R> {
    /// Creates a new `Player`, announcing the strategy's own name unless one is given
    pub fn new(strategy: Strategy, name: Option<String>, rng: R) -> Self {
        let name = name.unwrap_or_else(|| strategy.display_name().to_string());
        Self {
            strategy,
            name,
            rng,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The answer to a command, `None` for commands that get no answer
    pub fn respond(&mut self, command: Command) -> Result<Option<Reply>> {
        let reply = match command {
            Command::Name => Reply::SetName(self.name.clone()),
            Command::Start(side) => {
                info!("Game started, playing {:?}", side);
                Reply::Ready
            }
            Command::Go(request) => {
                let column = self.strategy.choose_move(&request, &mut self.rng)?;
                info!("Move {}: column {}", request.history.len() + 1, column);
                Reply::Move(column)
            }
            Command::End(result) => {
                info!("Game over: {:?}", result);
                Reply::Bye
            }
            Command::Quit => {
                info!("Server asked to quit");
                return Ok(None);
            }
            Command::Unknown(word) => {
                warn!("Unknown command `{}`, ignoring it", word);
                return Ok(None);
            }
        };
        Ok(Some(reply))
    }
}

/// Opens the connection to the server
pub fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let stream = TcpStream::connect((host, port))
        .with_context(|| format!("failed to connect to {}:{}", host, port))?;
    info!("Connected to {}:{}", host, port);
    Ok(stream)
}

/// Answers server messages until the server says `quit`
pub fn run<S: Read + Write, R: Rng>(stream: &mut S, player: &mut Player<R>) -> Result<()> {
    let mut buffer = [0; BUFFER_SIZE];

    loop {
        let count = stream
            .read(&mut buffer)
            .context("failed to read from the server")?;
        if count == 0 {
            return Err(anyhow!("connection closed by the server before `quit`"));
        }

        let msg = std::str::from_utf8(&buffer[..count]).context("message is not valid UTF-8")?;
        debug!("recv: {}", msg.trim());

        let command = parse_command(msg).with_context(|| format!("bad message `{}`", msg.trim()))?;
        let quit = command == Command::Quit;

        if let Some(reply) = player.respond(command)? {
            let reply = reply.to_string();
            debug!("send: {}", reply);
            stream
                .write_all(reply.as_bytes())
                .context("failed to write to the server")?;
            stream.flush().context("failed to flush to the server")?;
        }
        if quit {
            return Ok(());
        }
    }
}
