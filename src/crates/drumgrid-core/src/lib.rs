//! Core types and transforms for drum step grids
//!
//! This crate holds the pieces of a step sequencer that are independent of
//! any file format or user interface: the instrument×step grid, the
//! normalized rhythm vector derived from it, the note mapping tables used to
//! translate between grid rows and MIDI note numbers, and the quantizer that
//! places timed note events back onto a grid.
//!
//! # Examples
//!
//! ```
//! use drumgrid_core::{grid_to_vector, Grid};
//!
//! let grid = Grid::from_rows(vec![
//!     vec![true, false, true, false],
//!     vec![false, true, false, false],
//! ])
//! .unwrap();
//!
//! assert_eq!(grid_to_vector(&grid).as_slice(), &[1.0, 1.0, 1.0, 0.0]);
//! ```
//!
//! # Main Components
//!
//! - **Grid**: instrument rows of boolean step cells
//! - **RhythmVector**: per-step onset density normalized to [0, 1]
//! - **NoteMappingTable**: instrument index ↔ MIDI note number
//! - **DrumKit**: the instrument roster the grid rows stand for
//! - **midi_to_grid**: quantizes note events onto a grid
//! - **SearchQuery**: a rhythm vector prepared for the similarity search API

pub mod error;
pub mod grid;
pub mod kit;
pub mod mapping;
pub mod quantize;
pub mod search;
pub mod vector;

pub use error::{GridError, Result};
pub use grid::Grid;
pub use kit::{DrumKit, Instrument};
pub use mapping::NoteMappingTable;
pub use quantize::{midi_to_grid, ImportedPattern, NoteEvent};
pub use search::{SearchQuery, SearchResult, SEARCH_DIMENSIONS};
pub use vector::{grid_to_vector, RhythmVector};

/// Default loop length of the sequencer
pub const DEFAULT_STEPS: usize = 8;

/// Tempo used when neither the caller nor a MIDI file declares one
pub const DEFAULT_BPM: f64 = 120.0;
