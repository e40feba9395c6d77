//! # Tank Wars Dedicated Server
//!
//! Headless server for multiplayer games.
//!
//! Runs the simulation at a fixed tick rate and accepts one TCP connection
//! per player. Clients speak a line protocol (see [`protocol`]); every
//! request is answered with exactly one line.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod session;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
