//! Server configuration.
//!
//! Defaults can be overridden by a RON file and then by command-line flags.
//!
//! ```ron
//! (
//!     host: "0.0.0.0",
//!     port: 7777,
//!     max_players: Some(2),
//!     tick_rate: 30,
//!     map: Some("maps/valley.json"),
//!     seed: 42,
//! )
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tw_core::constants::GAME_SPEED;

use crate::error::{Result, ServerError};

/// Largest number of player connections a server hands out.
pub const MAX_CONNECTIONS: u8 = 49;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Players needed before the game starts. `None` uses the number of
    /// players owning units on the map.
    pub max_players: Option<u8>,
    /// Ticks per second.
    pub tick_rate: u32,
    /// Map file to load.
    pub map: Option<PathBuf>,
    /// Seed of the game's random source.
    pub seed: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
            max_players: None,
            tick_rate: GAME_SPEED as u32,
            map: None,
            seed: 0,
        }
    }
}

impl ServerConfig {
    /// Parse a config from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 {
            return Err(ServerError::InvalidConfig(
                "tick_rate must be positive".to_string(),
            ));
        }
        match self.max_players {
            Some(0) => Err(ServerError::InvalidConfig(
                "max_players must be positive".to_string(),
            )),
            Some(n) if n > MAX_CONNECTIONS => Err(ServerError::InvalidConfig(format!(
                "max_players must be at most {MAX_CONNECTIONS}"
            ))),
            _ => Ok(()),
        }
    }

    /// `host:port`.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Time between two ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.addr(), "127.0.0.1:7777");
        assert_eq!(config.tick_interval(), Duration::from_secs(1) / 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron() {
        let config = ServerConfig::from_ron_str("(port: 9000, max_players: Some(3))").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_players, Some(3));
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ServerConfig::from_ron_str("(tick_rate: 0)"),
            Err(ServerError::InvalidConfig(_))
        ));
        assert!(matches!(
            ServerConfig::from_ron_str("(max_players: Some(50))"),
            Err(ServerError::InvalidConfig(_))
        ));
        assert!(matches!(
            ServerConfig::from_ron_str("(port: \"x\")"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.ron");
        std::fs::write(&path, "(host: \"0.0.0.0\", seed: 7, map: Some(\"a.json\"))").unwrap();
        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.seed, 7);
        assert_eq!(config.map, Some(PathBuf::from("a.json")));
    }
}
