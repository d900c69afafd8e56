//! Instrument index ↔ MIDI note number tables
//!
//! Two independent tables are kept: one to read imported files (the
//! EZdrummer authoring layout) and one to write exported files (the
//! General MIDI / Cakewalk playback layout). They differ only for Tom1.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Note written for a grid row the export table has no entry for
pub const FALLBACK_EXPORT_NOTE: u8 = 36;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub struct NoteMappingTable {
    notes: Vec<u8>,
    by_note: HashMap<u8, usize>,
}

impl NoteMappingTable {
    /// Build a table from notes in instrument order
    ///
    /// If a note appears twice the lower instrument index keeps it.
    pub fn new(notes: Vec<u8>) -> Self {
        let mut by_note = HashMap::with_capacity(notes.len());
        for (index, &note) in notes.iter().enumerate() {
            if let Some(&owner) = by_note.get(&note) {
                tracing::warn!(
                    note,
                    owner,
                    index,
                    "duplicate note in mapping table, keeping first instrument"
                );
                continue;
            }
            by_note.insert(note, index);
        }
        NoteMappingTable { notes, by_note }
    }

    /// Table used to decode imported files
    pub fn ezdrummer() -> Self {
        Self::new(vec![
            36, // Kick (C1)
            38, // Snare (D1)
            37, // Rimshot (C#1)
            42, // Closed HiHat (F#1)
            46, // Open HiHat (A#1)
            44, // Pedal HiHat (G#1)
            50, // Tom1 (D2)
            47, // Tom2 (B1)
            43, // Floor Tom (G1)
            49, // Crash (C#2)
            51, // Ride (D#2)
        ])
    }

    /// Table used to encode exported files
    pub fn general_midi() -> Self {
        Self::new(vec![
            36, // Kick (C2)
            38, // Snare (D2)
            37, // Rimshot (C#2)
            42, // Closed HiHat (F#2)
            46, // Open HiHat (A#2)
            44, // Pedal HiHat (G#2)
            48, // Tom1 (C3)
            47, // Tom2 (A2)
            43, // Floor Tom (G2)
            49, // Crash (C#3)
            51, // Ride (D#3)
        ])
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[u8] {
        &self.notes
    }

    pub fn note_for(&self, instrument: usize) -> Option<u8> {
        self.notes.get(instrument).copied()
    }

    pub fn instrument_for(&self, note: u8) -> Option<usize> {
        self.by_note.get(&note).copied()
    }

    /// Note to write for a grid row, falling back to a kick
    pub fn export_note(&self, instrument: usize) -> u8 {
        self.note_for(instrument).unwrap_or(FALLBACK_EXPORT_NOTE)
    }
}

impl From<Vec<u8>> for NoteMappingTable {
    fn from(notes: Vec<u8>) -> Self {
        Self::new(notes)
    }
}

impl From<NoteMappingTable> for Vec<u8> {
    fn from(table: NoteMappingTable) -> Self {
        table.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tables() {
        let input = NoteMappingTable::ezdrummer();
        let export = NoteMappingTable::general_midi();
        assert_eq!(input.len(), 11);
        assert_eq!(export.len(), 11);

        assert_eq!(input.instrument_for(36), Some(0)); // Kick
        assert_eq!(input.instrument_for(50), Some(6)); // Tom1
        assert_eq!(input.instrument_for(48), None);
        assert_eq!(export.note_for(6), Some(48));
        assert_eq!(export.instrument_for(50), None);
    }

    #[test]
    fn test_reverse_lookup_matches_forward() {
        let table = NoteMappingTable::ezdrummer();
        for (index, &note) in table.notes().iter().enumerate() {
            assert_eq!(table.instrument_for(note), Some(index));
        }
    }

    #[test]
    fn test_duplicate_note_keeps_first() {
        let table = NoteMappingTable::new(vec![36, 38, 36]);
        assert_eq!(table.instrument_for(36), Some(0));
        assert_eq!(table.note_for(2), Some(36));
    }

    #[test]
    fn test_export_fallback() {
        let table = NoteMappingTable::new(vec![38]);
        assert_eq!(table.export_note(0), 38);
        assert_eq!(table.export_note(5), FALLBACK_EXPORT_NOTE);
    }

    #[test]
    fn test_deserialize_from_list() {
        let table: NoteMappingTable = serde_json::from_str("[40, 41]").unwrap();
        assert_eq!(table.instrument_for(41), Some(1));
    }
}
