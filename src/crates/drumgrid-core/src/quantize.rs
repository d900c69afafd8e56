use serde::Serialize;

use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::mapping::NoteMappingTable;
use crate::vector::{grid_to_vector, RhythmVector};

/// A note onset read from a MIDI file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub note: u8,
    pub time_sec: f64,
}

impl NoteEvent {
    pub fn new(note: u8, time_sec: f64) -> Self {
        Self { note, time_sec }
    }
}

/// Place note events onto an `instruments`×`steps` grid
///
/// Times are scaled against the latest event, so the loop spans from zero to
/// the last onset. Notes missing from `table` are ignored. An event exactly
/// at the latest time quantizes to `steps` and is dropped rather than being
/// folded onto the final step. Events with a non-finite time are dropped.
pub fn midi_to_grid(
    events: &[NoteEvent],
    steps: usize,
    instruments: usize,
    table: &NoteMappingTable,
) -> Result<Grid> {
    let max_time = events
        .iter()
        .map(|e| e.time_sec)
        .filter(|t| t.is_finite())
        .fold(0.0, f64::max);
    if events.is_empty() || max_time <= 0.0 {
        return Err(GridError::EmptyInput);
    }

    let mut grid = Grid::new(instruments, steps);
    let mut dropped = 0usize;

    for event in events {
        let row = table.instrument_for(event.note).filter(|&i| i < instruments);
        let Some(instrument) = row else {
            tracing::debug!(note = event.note, "ignoring note without a grid row");
            dropped += 1;
            continue;
        };

        let step = ((event.time_sec / max_time) * steps as f64).floor();
        if !step.is_finite() || step < 0.0 || step >= steps as f64 {
            tracing::debug!(
                note = event.note,
                time_sec = event.time_sec,
                "dropping note outside the loop"
            );
            dropped += 1;
            continue;
        }

        grid.set(instrument, step as usize, true)?;
    }

    if dropped > 0 {
        tracing::debug!(dropped, total = events.len(), "quantized with dropped notes");
    }

    Ok(grid)
}

/// A MIDI import: the grid, its rhythm vector and the tempo to search with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedPattern {
    pub bpm: f64,
    pub grid: Grid,
    pub vector: RhythmVector,
}

impl ImportedPattern {
    /// Quantize `events` and derive the vector; `declared_bpm` wins over
    /// `default_bpm` when the file carried a tempo
    pub fn from_events(
        events: &[NoteEvent],
        declared_bpm: Option<f64>,
        default_bpm: f64,
        steps: usize,
        instruments: usize,
        table: &NoteMappingTable,
    ) -> Result<Self> {
        let grid = midi_to_grid(events, steps, instruments, table)?;
        let vector = grid_to_vector(&grid);
        Ok(ImportedPattern {
            bpm: declared_bpm.unwrap_or(default_bpm),
            grid,
            vector,
        })
    }
}
