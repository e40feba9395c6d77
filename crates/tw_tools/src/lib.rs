//! # Tank Wars Development Tools
//!
//! Command-line tools for development:
//! - Map validation
//! - Blank map creation
//! - Headless simulation runs
//! - ASCII map rendering

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod render;
pub mod simulate;
pub mod validate;

pub use validate::ToolError;
