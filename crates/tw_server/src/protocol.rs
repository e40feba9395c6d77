//! The line protocol spoken between clients and the server.
//!
//! Requests end with `\n` or `\r\n`; every response is one line ending with
//! `\r\n`.
//!
//! ```text
//! -> PLAYER
//! <- 1
//! -> MOVE 2 4 3 4
//! <- OK
//! -> FIRE 2 4 9 9
//! <- target is not in range
//! -> STATUS
//! <- {"width":10,"height":10,"tiles":[...],"tick":52,...}
//! -> JUMP
//! <- err: invalid command
//! ```

use std::fmt;

use tw_core::constants::PlayerId;
use tw_core::grid::Coord;

/// Line terminator of every response.
pub const LINE_END: &str = "\r\n";

/// Longest request line accepted, terminator included.
pub const MAX_LINE_LENGTH: usize = 256;

/// A parsed client request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Which player this connection controls.
    Player,
    /// Censored snapshot of the world.
    Status,
    /// Move the unit on `from` towards `to`.
    Move {
        /// Unit tile.
        from: Coord,
        /// Destination.
        to: Coord,
    },
    /// Fire from `from` at `to`.
    Fire {
        /// Unit tile.
        from: Coord,
        /// Target tile.
        to: Coord,
    },
}

/// Why a line is not a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Unknown or empty command word.
    InvalidCommand,
    /// Known command with missing or non-numeric arguments.
    InvalidArguments,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCommand => write!(f, "err: invalid command"),
            Self::InvalidArguments => write!(f, "err: invalid arguments"),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl Request {
    /// Parse one request line. Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(ProtocolError::InvalidCommand)?;

        match command {
            "PLAYER" => Ok(Self::Player),
            "STATUS" => Ok(Self::Status),
            "MOVE" | "FIRE" => {
                let args: Vec<&str> = words.collect();
                let [x1, y1, x2, y2] = args.as_slice() else {
                    return Err(ProtocolError::InvalidArguments);
                };
                let num = |s: &str| s.parse::<i32>().map_err(|_| ProtocolError::InvalidArguments);
                let from = Coord::new(num(*x1)?, num(*y1)?);
                let to = Coord::new(num(*x2)?, num(*y2)?);
                if command == "MOVE" {
                    Ok(Self::Move { from, to })
                } else {
                    Ok(Self::Fire { from, to })
                }
            }
            _ => Err(ProtocolError::InvalidCommand),
        }
    }

    /// The request as a protocol line, without terminator.
    #[must_use]
    pub fn to_line(&self) -> String {
        match self {
            Self::Player => "PLAYER".to_string(),
            Self::Status => "STATUS".to_string(),
            Self::Move { from, to } => format!("MOVE {} {} {} {}", from.x, from.y, to.x, to.y),
            Self::Fire { from, to } => format!("FIRE {} {} {} {}", from.x, from.y, to.x, to.y),
        }
    }
}

/// A server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Player number of the connection.
    Player(PlayerId),
    /// JSON snapshot.
    Status(String),
    /// Command accepted.
    Ok,
    /// Command rejected, with the reason.
    Error(String),
}

impl Response {
    /// The response as sent on the wire, terminator included.
    #[must_use]
    pub fn render(&self) -> String {
        let body = match self {
            Self::Player(player) => player.to_string(),
            Self::Status(json) => json.clone(),
            Self::Ok => "OK".to_string(),
            Self::Error(reason) => reason.clone(),
        };
        format!("{body}{LINE_END}")
    }
}

impl From<ProtocolError> for Response {
    fn from(err: ProtocolError) -> Self {
        Self::Error(err.to_string())
    }
}
