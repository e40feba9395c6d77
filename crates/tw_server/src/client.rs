//! A minimal client for the line protocol, used by bots and tests.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tw_core::constants::PlayerId;
use tw_core::grid::{Coord, World};

use crate::error::{Result, ServerError};
use crate::protocol::{Request, LINE_END};

/// A connection to a game server.
#[derive(Debug)]
pub struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    /// Connect to `addr`.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
        })
    }

    /// Send a raw line and return the reply without its terminator.
    pub async fn send_line(&mut self, line: &str) -> Result<String> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(LINE_END.as_bytes()).await?;
        self.writer.flush().await?;

        let mut reply = String::new();
        if self.reader.read_line(&mut reply).await? == 0 {
            return Err(ServerError::Closed);
        }
        Ok(reply.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn request(&mut self, request: Request) -> Result<String> {
        self.send_line(&request.to_line()).await
    }

    async fn expect_ok(&mut self, request: Request) -> Result<()> {
        let reply = self.request(request).await?;
        if reply == "OK" {
            Ok(())
        } else {
            Err(ServerError::Rejected(reply))
        }
    }

    /// The player number this connection controls.
    pub async fn player(&mut self) -> Result<PlayerId> {
        let reply = self.request(Request::Player).await?;
        reply.parse().map_err(|_| ServerError::Rejected(reply))
    }

    /// The censored world as this player sees it.
    pub async fn status(&mut self) -> Result<World> {
        let reply = self.request(Request::Status).await?;
        Ok(serde_json::from_str(&reply)?)
    }

    /// Order a move.
    pub async fn move_unit(&mut self, from: Coord, to: Coord) -> Result<()> {
        self.expect_ok(Request::Move { from, to }).await
    }

    /// Order a shot.
    pub async fn fire(&mut self, from: Coord, to: Coord) -> Result<()> {
        self.expect_ok(Request::Fire { from, to }).await
    }
}
