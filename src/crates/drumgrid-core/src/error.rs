use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// No events, or every event sits at time zero, so there is no duration
    /// to quantize against.
    #[error("MIDI input is empty: no notes or zero total duration")]
    EmptyInput,

    #[error("Row {row} has {found} steps, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cell ({instrument}, {step}) is outside a {instruments}x{steps} grid")]
    CellOutOfRange {
        instrument: usize,
        step: usize,
        instruments: usize,
        steps: usize,
    },

    #[error("Rhythm vector has {len} elements, the search API accepts at most {max}")]
    VectorTooLong { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, GridError>;
