//! Standard MIDI File import and export for drum grids
//!
//! [`MidiData`] reads note onsets and the declared tempo out of a file,
//! [`Importer`] quantizes them onto a grid, and [`write_grid`] encodes a grid
//! back into a one-track drum file.

pub mod error;
pub mod import;
pub mod reader;
pub mod writer;


pub use error::{MidiError, Result};
pub use import::Importer;
pub use reader::MidiData;
pub use writer::{grid_to_events, write_grid};
