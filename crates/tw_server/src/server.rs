//! Accept loop and tick loop.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tw_core::constants::PlayerId;
use tw_core::engine::{Engine, SharedEngine};
use tw_core::grid::World;
use tw_core::update::TickReport;

use crate::config::{ServerConfig, MAX_CONNECTIONS};
use crate::error::{Result, ServerError};
use crate::session::handle_session;

/// A bound game server.
///
/// The world is frozen until `max_players` clients have connected. Players
/// are numbered in connection order, starting at 1.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    engine: SharedEngine,
    max_players: PlayerId,
}

impl Server {
    /// Bind `addr` and freeze the world until all players have joined.
    pub async fn bind(addr: &str, engine: SharedEngine, max_players: PlayerId) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        engine.set_freeze(true)?;
        tracing::info!(addr = %listener.local_addr()?, max_players, "server listening");
        Ok(Self {
            listener,
            engine,
            max_players,
        })
    }

    /// The bound address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// The shared engine.
    #[must_use]
    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    /// Accept players until every player number is handed out.
    pub async fn run(self) -> Result<()> {
        let mut player: PlayerId = 1;
        while player <= MAX_CONNECTIONS {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::warn!(%err, "accept failed");
                    continue;
                }
            };

            tracing::info!(player, %peer, "player connected");
            let engine = self.engine.clone();
            tokio::spawn(async move {
                if let Err(err) = handle_session(stream, engine, player).await {
                    tracing::warn!(player, %err, "session ended with error");
                }
            });

            if player == self.max_players {
                self.engine.set_freeze(false)?;
                tracing::info!(players = player, "game started");
            }
            player += 1;
        }

        tracing::warn!("no player numbers left, no longer accepting connections");
        Ok(())
    }
}

/// Log the interesting parts of a tick.
fn log_report(report: &TickReport) {
    if report.is_empty() {
        return;
    }
    for id in &report.destroyed {
        tracing::info!(tick = report.tick, unit = id, "unit destroyed");
    }
    for spawn in &report.spawned {
        tracing::info!(tick = report.tick, player = spawn.player, kind = ?spawn.kind, at = %spawn.at, "reinforcement arrived");
    }
    tracing::debug!(
        tick = report.tick,
        moves = report.moves.len(),
        aborted = report.aborted_moves.len(),
        shots = report.shots.len(),
        terrain_changes = report.terrain_changes.len(),
        "tick"
    );
}

/// Tick `engine` every `period` until the engine becomes unusable.
pub fn spawn_tick_loop(engine: SharedEngine, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match engine.tick() {
                Ok(report) => log_report(&report),
                Err(err) => {
                    tracing::error!(%err, "tick loop stopped");
                    break;
                }
            }
        }
    })
}

/// Run a full server for `world` as described by `config`: bind, start the
/// tick loop, accept players.
pub async fn serve(config: &ServerConfig, world: World) -> Result<()> {
    config.validate()?;
    let max_players = match config.max_players {
        Some(n) => n,
        None => PlayerId::try_from(world.player_count())
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                ServerError::InvalidConfig("map has no players; set max_players".to_string())
            })?,
    };

    let engine = SharedEngine::new(Engine::with_seed(world, config.seed));
    let server = Server::bind(&config.addr(), engine.clone(), max_players).await?;
    let ticker = spawn_tick_loop(engine, config.tick_interval());

    let result = server.run().await;
    if result.is_ok() {
        // keep ticking for the players already connected
        if let Err(err) = ticker.await {
            tracing::error!(%err, "tick loop panicked");
        }
    } else {
        ticker.abort();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_test_utils::fixtures::{duel, engine};

    #[tokio::test]
    async fn test_bind_freezes_world() {
        let shared = SharedEngine::new(engine(duel(), 0));
        let server = Server::bind("127.0.0.1:0", shared.clone(), 2).await.unwrap();
        assert!(server.local_addr().unwrap().port() > 0);
        assert!(shared.snapshot().unwrap().freeze);
    }

    #[tokio::test]
    async fn test_tick_loop_advances_world() {
        let shared = SharedEngine::new(engine(duel(), 0));
        let handle = spawn_tick_loop(shared.clone(), Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();
        assert!(shared.snapshot().unwrap().tick > 0);
    }

    #[tokio::test]
    async fn test_serve_needs_players() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        let result = serve(&config, World::new(3, 3)).await;
        assert!(matches!(result, Err(ServerError::InvalidConfig(_))));
    }
}
