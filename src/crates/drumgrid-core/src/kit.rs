//! The instrument roster a grid's rows stand for

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Display name (e.g. "OpenHiHat")
    pub name: String,
    /// Short label used in text grids (e.g. "oh")
    pub short: String,
}

impl Instrument {
    pub fn new(name: impl Into<String>, short: impl Into<String>) -> Self {
        Instrument {
            name: name.into(),
            short: short.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrumKit {
    instruments: Vec<Instrument>,
}

impl DrumKit {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        DrumKit { instruments }
    }

    /// The eleven-piece kit of the sequencer, in row order
    pub fn standard() -> Self {
        let pieces = [
            ("Kick", "bd"),
            ("Snare", "sd"),
            ("Rimshot", "rim"),
            ("HiHat", "hh"),
            ("OpenHiHat", "oh"),
            ("MidHiHat", "ph"),
            ("Tom1", "ht"),
            ("Tom2", "mt"),
            ("FloorTom", "lt"),
            ("Crash", "cr"),
            ("Ride", "rd"),
        ];
        DrumKit::new(
            pieces
                .iter()
                .map(|&(name, short)| Instrument::new(name, short))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instrument> {
        self.instruments.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    /// Find a row by display name or short label, ignoring case
    pub fn index_of(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.instruments.iter().position(|inst| {
            inst.name.eq_ignore_ascii_case(label) || inst.short.eq_ignore_ascii_case(label)
        })
    }
}

impl Default for DrumKit {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_kit() {
        let kit = DrumKit::standard();
        assert_eq!(kit.len(), 11);
        assert_eq!(kit.get(0).unwrap().name, "Kick");
        assert_eq!(kit.get(10).unwrap().name, "Ride");
        assert!(kit.get(11).is_none());
    }

    #[test]
    fn test_index_of() {
        let kit = DrumKit::standard();
        assert_eq!(kit.index_of("snare"), Some(1));
        assert_eq!(kit.index_of("OH"), Some(4));
        assert_eq!(kit.index_of(" FloorTom "), Some(8));
        assert_eq!(kit.index_of("cowbell"), None);
    }
}
