use std::path::Path;

use drumgrid_core::NoteEvent;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::error::Result;

/// Microseconds per quarter note until a file says otherwise (120 BPM)
const DEFAULT_TEMPO: u32 = 500_000;

/// Note onsets and tempo read from a Standard MIDI File
#[derive(Debug, Clone, PartialEq)]
pub struct MidiData {
    /// Tempo of the first tempo event in the file, if any
    pub declared_bpm: Option<f64>,
    /// Every sounding note-on across all tracks and channels, in time order
    pub events: Vec<NoteEvent>,
}

impl MidiData {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        let smf = Smf::parse(data)?;

        let clock = Clock::new(&smf);
        let declared_bpm = clock.first_tempo().map(tempo_to_bpm);

        let mut onsets = collect_onsets(&smf);
        onsets.sort_by_key(|&(tick, _)| tick);

        let events = onsets
            .into_iter()
            .map(|(tick, note)| NoteEvent::new(note, clock.tick_to_second(tick)))
            .collect::<Vec<_>>();

        tracing::debug!(
            tracks = smf.tracks.len(),
            notes = events.len(),
            bpm = ?declared_bpm,
            "parsed MIDI data"
        );

        Ok(MidiData {
            declared_bpm,
            events,
        })
    }

    /// Time of the latest onset in seconds
    pub fn duration_sec(&self) -> f64 {
        self.events.iter().map(|e| e.time_sec).fold(0.0, f64::max)
    }
}

/// Absolute ticks and keys of every note-on with non-zero velocity
fn collect_onsets(smf: &Smf) -> Vec<(u64, u8)> {
    let mut onsets = Vec::new();

    for track in &smf.tracks {
        let mut tick = 0u64;
        for event in track {
            tick += u64::from(event.delta.as_int());

            // A note-on with velocity 0 is a note-off
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                if vel.as_int() > 0 {
                    onsets.push((tick, key.as_int()));
                }
            }
        }
    }

    onsets
}

/// Converts ticks to seconds for either timing mode
enum Clock {
    /// Ticks per quarter note, scaled by tempo changes sorted by tick
    Metrical {
        ticks_per_beat: f64,
        tempos: Vec<(u64, u32)>,
    },
    /// SMPTE timing: a fixed number of ticks per second
    Timecode {
        ticks_per_second: f64,
        tempos: Vec<(u64, u32)>,
    },
}

impl Clock {
    fn new(smf: &Smf) -> Self {
        let tempos = collect_tempos(smf);
        match smf.header.timing {
            Timing::Metrical(tpb) => Clock::Metrical {
                ticks_per_beat: f64::from(tpb.as_int().max(1)),
                tempos,
            },
            Timing::Timecode(fps, subframe) => Clock::Timecode {
                ticks_per_second: (f64::from(fps.as_f32()) * f64::from(subframe)).max(1.0),
                tempos,
            },
        }
    }

    fn first_tempo(&self) -> Option<u32> {
        let tempos = match self {
            Clock::Metrical { tempos, .. } | Clock::Timecode { tempos, .. } => tempos,
        };
        tempos.first().map(|&(_, tempo)| tempo)
    }

    fn tick_to_second(&self, tick: u64) -> f64 {
        match self {
            Clock::Timecode {
                ticks_per_second, ..
            } => tick as f64 / ticks_per_second,
            Clock::Metrical {
                ticks_per_beat,
                tempos,
            } => {
                let mut seconds = 0.0;
                let mut last_tick = 0u64;
                let mut tempo = DEFAULT_TEMPO;

                for &(change_tick, change_tempo) in tempos {
                    if change_tick >= tick {
                        break;
                    }
                    seconds += tick_span_to_second(change_tick - last_tick, *ticks_per_beat, tempo);
                    last_tick = change_tick;
                    tempo = change_tempo;
                }

                seconds + tick_span_to_second(tick - last_tick, *ticks_per_beat, tempo)
            }
        }
    }
}

/// Tempo changes from every track, ordered by absolute tick
fn collect_tempos(smf: &Smf) -> Vec<(u64, u32)> {
    let mut tempos = Vec::new();

    for track in &smf.tracks {
        let mut tick = 0u64;
        for event in track {
            tick += u64::from(event.delta.as_int());
            if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = event.kind {
                tempos.push((tick, tempo.as_int()));
            }
        }
    }

    tempos.sort_by_key(|&(tick, _)| tick);
    tempos
}

fn tick_span_to_second(ticks: u64, ticks_per_beat: f64, tempo: u32) -> f64 {
    let seconds_per_tick = (f64::from(tempo) / 1_000_000.0) / ticks_per_beat;
    ticks as f64 * seconds_per_tick
}

fn tempo_to_bpm(tempo: u32) -> f64 {
    60_000_000.0 / f64::from(tempo.max(1))
}
