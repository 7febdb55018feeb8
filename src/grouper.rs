use std::collections::{HashMap, HashSet};

use log::debug;

use crate::midi_event::{ChordEvent, EventKind, TimedEvent};

/// A chord spans at most 1/32 of a beat.
pub const TOLERANCE_DIVISOR: f64 = 32.0;

// progress is reported every this many note events (on and off)
const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone)]
pub struct Grouping {
    pub chords: Vec<ChordEvent>,
    /// Last release tick for every (channel, note).
    ///
    /// The score format has no note lengths, so nothing downstream reads
    /// this; it is only logged.
    pub note_ends: HashMap<(u8, u8), u64>,
}

pub struct ChordGrouper {
    tolerance: f64,
}

impl ChordGrouper {
    pub fn new(ticks_per_beat: u16) -> Self {
        Self {
            tolerance: f64::from(ticks_per_beat) / TOLERANCE_DIVISOR,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Collapse note-ons that start within the tolerance of each other.
    ///
    /// Every not yet covered note-on becomes the anchor of a chord which takes
    /// every note-on of the whole list within the tolerance of the anchor,
    /// and marks their ticks as covered. The chord uses the anchor's program.
    pub fn group(
        &self,
        events: &[TimedEvent],
        mut progress: Option<&mut dyn FnMut(f64)>,
    ) -> Grouping {
        let note_ends = note_end_times(events);

        let mut chords = Vec::new();
        let mut covered: HashSet<u64> = HashSet::new();
        let total = events.len();

        for (idx, anchor) in events.iter().enumerate() {
            if idx % PROGRESS_INTERVAL == 0 {
                if let Some(report) = progress.as_deref_mut() {
                    report(idx as f64 / total as f64 * 100.0);
                }
            }

            let EventKind::NoteOn { program, .. } = anchor.kind else {
                continue;
            };
            if covered.contains(&anchor.time) {
                continue;
            }

            let mut notes = Vec::new();
            for other in events {
                if let EventKind::NoteOn { note, .. } = other.kind {
                    if self.within_tolerance(anchor.time, other.time) {
                        notes.push(note);
                        covered.insert(other.time);
                    }
                }
            }

            chords.push(ChordEvent {
                time: anchor.time,
                notes,
                program,
            });
        }

        debug!(
            "Grouped {} events into {} chords (tolerance {} ticks, {} released notes)",
            total,
            chords.len(),
            self.tolerance(),
            note_ends.len()
        );

        Grouping { chords, note_ends }
    }

    fn within_tolerance(&self, a: u64, b: u64) -> bool {
        (a as f64 - b as f64).abs() <= self.tolerance
    }
}

fn note_end_times(events: &[TimedEvent]) -> HashMap<(u8, u8), u64> {
    events
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::NoteOff { note, channel } => Some(((channel, note), e.time)),
            _ => None,
        })
        .collect()
}
