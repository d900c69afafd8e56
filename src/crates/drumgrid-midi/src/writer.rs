//! Grid export to a one-track drum MIDI file
//!
//! Each active cell becomes a fixed-length note on the drum channel. Steps
//! are sixteenth notes, so a step starts every quarter of a beat.

use drumgrid_core::{Grid, NoteEvent, NoteMappingTable};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use crate::error::{MidiError, Result};

pub const TICKS_PER_QUARTER: u16 = 480;

/// Channel 10 in 1-based numbering
pub const DRUM_CHANNEL: u8 = 9;

/// Step length in quarter notes
pub const STEP_QUARTERS: f64 = 0.25;

/// Note length in quarter notes
pub const NOTE_QUARTERS: f64 = 0.2;

/// 0.8 of full velocity, truncated
pub const NOTE_VELOCITY: u8 = 101;

const TRACK_NAME: &[u8] = b"drumgrid";

const MAX_TEMPO: u32 = 0xFF_FFFF;

fn quarters_to_ticks(quarters: f64) -> u32 {
    (quarters * f64::from(TICKS_PER_QUARTER)).round() as u32
}

/// Encode the active cells of `grid` as a format 0 Standard MIDI File
pub fn write_grid(grid: &Grid, bpm: f64, table: &NoteMappingTable) -> Result<Vec<u8>> {
    let tempo = bpm_to_tempo(bpm)?;
    let step_ticks = quarters_to_ticks(STEP_QUARTERS);
    let note_ticks = quarters_to_ticks(NOTE_QUARTERS);

    // (tick, note-offs first, kind)
    let mut timed: Vec<(u32, u8, TrackEventKind<'static>)> = Vec::new();
    for (instrument, step) in grid.active_cells() {
        let key = export_key(table, instrument)?;
        let start = step as u32 * step_ticks;
        let on = MidiMessage::NoteOn {
            key,
            vel: u7::new(NOTE_VELOCITY),
        };
        let off = MidiMessage::NoteOff {
            key,
            vel: u7::new(0),
        };
        timed.push((start, 1, note_kind(on)));
        timed.push((start + note_ticks, 0, note_kind(off)));
    }
    timed.sort_by_key(|&(tick, order, _)| (tick, order));

    let mut track = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(TRACK_NAME)),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo))),
        },
    ];

    let mut last_tick = 0u32;
    for (tick, _, kind) in timed {
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind,
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));
    smf.tracks.push(track);

    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)?;

    tracing::debug!(
        notes = grid.active_cells().count(),
        bytes = bytes.len(),
        bpm,
        "encoded grid as MIDI"
    );

    Ok(bytes)
}

/// The note onsets [`write_grid`] would produce, in seconds at `bpm`
pub fn grid_to_events(
    grid: &Grid,
    bpm: f64,
    table: &NoteMappingTable,
) -> Result<Vec<NoteEvent>> {
    bpm_to_tempo(bpm)?;
    let step_sec = STEP_QUARTERS * 60.0 / bpm;

    let mut events = grid
        .active_cells()
        .map(|(instrument, step)| {
            let key = export_key(table, instrument)?;
            Ok(NoteEvent::new(key.as_int(), step as f64 * step_sec))
        })
        .collect::<Result<Vec<_>>>()?;
    events.sort_by(|a, b| a.time_sec.total_cmp(&b.time_sec));
    Ok(events)
}

/// Export note for a grid row; notes above 127 cannot be written
fn export_key(table: &NoteMappingTable, instrument: usize) -> Result<u7> {
    let note = table.export_note(instrument);
    u7::try_from(note).ok_or(MidiError::NoteOutOfRange { instrument, note })
}

fn note_kind(message: MidiMessage) -> TrackEventKind<'static> {
    TrackEventKind::Midi {
        channel: u4::new(DRUM_CHANNEL),
        message,
    }
}

/// Microseconds per quarter note for `bpm`, limited to what a tempo event holds
fn bpm_to_tempo(bpm: f64) -> Result<u32> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(MidiError::InvalidTempo(bpm));
    }
    let tempo = (60_000_000.0 / bpm).round();
    if tempo < 1.0 || tempo > f64::from(MAX_TEMPO) {
        return Err(MidiError::InvalidTempo(bpm));
    }
    Ok(tempo as u32)
}
