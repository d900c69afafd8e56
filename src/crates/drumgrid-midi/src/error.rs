use drumgrid_core::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("Failed to parse MIDI data: {0}")]
    Parse(#[from] midly::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Note {note} for instrument {instrument} is outside the MIDI range 0-127")]
    NoteOutOfRange { instrument: usize, note: u8 },

    #[error("Tempo must be a positive, finite BPM that fits a MIDI tempo event, got {0}")]
    InvalidTempo(f64),
}

pub type Result<T> = std::result::Result<T, MidiError>;
