use std::path::Path;

use drumgrid_core::{ImportedPattern, NoteMappingTable, DEFAULT_BPM, DEFAULT_STEPS};

use crate::error::Result;
use crate::reader::MidiData;

/// Turns MIDI files into grid patterns
pub struct Importer {
    steps: usize,
    instruments: usize,
    default_bpm: f64,
    table: NoteMappingTable,
}

impl Importer {
    pub fn new(
        steps: usize,
        instruments: usize,
        default_bpm: f64,
        table: NoteMappingTable,
    ) -> Self {
        Self {
            steps,
            instruments,
            default_bpm,
            table,
        }
    }

    pub fn import_file(&self, path: &Path) -> Result<ImportedPattern> {
        let data = MidiData::from_file(path)?;
        self.import_data(&data)
    }

    pub fn import_bytes(&self, bytes: &[u8]) -> Result<ImportedPattern> {
        let data = MidiData::parse(bytes)?;
        self.import_data(&data)
    }

    pub fn import_data(&self, data: &MidiData) -> Result<ImportedPattern> {
        let pattern = ImportedPattern::from_events(
            &data.events,
            data.declared_bpm,
            self.default_bpm,
            self.steps,
            self.instruments,
            &self.table,
        )?;
        Ok(pattern)
    }
}

impl Default for Importer {
    /// Eight steps, the standard kit and the EZdrummer input table
    fn default() -> Self {
        let table = NoteMappingTable::ezdrummer();
        Self::new(DEFAULT_STEPS, table.len(), DEFAULT_BPM, table)
    }
}
