use std::collections::BTreeMap;

// 120 BPM
pub const DEFAULT_TEMPO_MICROS_PER_QN: u32 = 500_000;

/// One message of a track as handed over by the MIDI reader.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    pub delta_time: u32, // ticks since the previous message in the same track
    pub kind: RawKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawKind {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    ProgramChange { channel: u8, program: u8 },
    SetTempo(u32),
    /// Anything the converter ignores. Still advances the track clock.
    Other,
}

impl RawMessage {
    pub fn new(delta_time: u32, kind: RawKind) -> Self {
        Self { delta_time, kind }
    }
}

/// A note event on the merged timeline. Tempo changes go to [`TempoTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub time: u64, // absolute ticks
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    NoteOn {
        note: u8,
        velocity: u8,
        channel: u8,
        program: u8,
    },
    NoteOff {
        note: u8,
        channel: u8,
    },
}

impl TimedEvent {
    pub fn is_note_on(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn { .. })
    }
}

/// Tempo in microseconds per quarter note, keyed by absolute tick.
///
/// Tempo is global: a later write at the same tick replaces the earlier one,
/// no matter which track it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoTable {
    changes: BTreeMap<u64, u32>,
}

impl TempoTable {
    pub fn new() -> Self {
        let mut changes = BTreeMap::new();
        changes.insert(0, DEFAULT_TEMPO_MICROS_PER_QN);
        Self { changes }
    }

    pub fn set(&mut self, time: u64, micros_per_qn: u32) {
        self.changes.insert(time, micros_per_qn);
    }

    pub fn initial(&self) -> u32 {
        self.changes
            .get(&0)
            .copied()
            .unwrap_or(DEFAULT_TEMPO_MICROS_PER_QN)
    }

    /// Tempo changes after the start, in time order.
    pub fn changes_after_start(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.changes.range(1..).map(|(t, tempo)| (*t, *tempo))
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

impl Default for TempoTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Notes struck together, within the grouping tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordEvent {
    pub time: u64,
    pub notes: Vec<u8>,
    pub program: u8, // taken from the anchor note only
}

pub fn micros_per_qn_to_bpm(micros_per_qn: u32) -> f64 {
    60_000_000.0 / micros_per_qn as f64
}
