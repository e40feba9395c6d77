//! One client connection.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tw_core::constants::PlayerId;
use tw_core::engine::SharedEngine;

use crate::error::Result;
use crate::protocol::{ProtocolError, Request, Response, MAX_LINE_LENGTH};

/// Answer one request line for `player`.
///
/// The engine lock is taken and released inside each engine call, never
/// across an await point.
pub fn respond(engine: &SharedEngine, player: PlayerId, line: &str) -> Response {
    let request = match Request::parse(line) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(player, line, "bad request");
            return err.into();
        }
    };

    let outcome = match request {
        Request::Player => return Response::Player(player),
        Request::Status => {
            return match engine.status(player).and_then(|world| world.to_json()) {
                Ok(json) => Response::Status(json),
                Err(err) => {
                    tracing::error!(player, %err, "status failed");
                    Response::Error(format!("err: {err}"))
                }
            };
        }
        Request::Move { from, to } => engine.move_unit(from, to, player).map(|_| ()),
        Request::Fire { from, to } => engine.fire(from, to, player),
    };

    match outcome {
        Ok(()) => Response::Ok,
        Err(err) => Response::Error(err.to_string()),
    }
}

/// Read one request line into `buf`.
///
/// Returns `None` at end of stream and `Some(false)` for a line longer than
/// [`MAX_LINE_LENGTH`], whose remainder is skipped.
async fn read_request<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<Option<bool>>
where
    R: AsyncBufRead + Unpin,
{
    let limit = MAX_LINE_LENGTH as u64;
    buf.clear();
    if (&mut *reader).take(limit).read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    if buf.len() < MAX_LINE_LENGTH || buf.ends_with(b"\n") {
        return Ok(Some(true));
    }

    loop {
        buf.clear();
        let read = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
        if read == 0 || buf.ends_with(b"\n") {
            return Ok(Some(false));
        }
    }
}

/// Serve requests from `stream` until the peer hangs up.
///
/// Lines that are not valid UTF-8 or too long are answered like any other
/// unknown command.
pub async fn handle_session<S>(stream: S, engine: SharedEngine, player: PlayerId) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    while let Some(complete) = read_request(&mut reader, &mut buf).await? {
        let response = if complete {
            respond(&engine, player, &String::from_utf8_lossy(&buf))
        } else {
            tracing::debug!(player, "request line too long");
            ProtocolError::InvalidCommand.into()
        };
        writer.write_all(response.render().as_bytes()).await?;
        writer.flush().await?;
    }

    tracing::info!(player, "player has left");
    Ok(())
}
