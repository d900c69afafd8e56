//! Drum grid command-line front end
//!
//! Wires the grid and MIDI crates to files, configuration, logging and the
//! similarity search service.

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod search;

pub use cli::{run, Cli};
pub use config::Config;
