use log::{debug, info};

use crate::error::ConvertError;
use crate::midi_event::{EventKind, RawKind, RawMessage, TempoTable, TimedEvent};

/// Events from every track on one timeline, plus the global tempo map.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub events: Vec<TimedEvent>,
    pub tempos: TempoTable,
}

impl Extraction {
    /// Program of the earliest sounding note.
    pub fn first_program(&self) -> Option<u8> {
        self.events.iter().find_map(|e| match e.kind {
            EventKind::NoteOn { program, .. } => Some(program),
            _ => None,
        })
    }
}

/// Walks tracks one at a time, keeping the per-track clock and program.
pub struct Extractor {
    ticks: u64,
    current_program: u8,
    events: Vec<TimedEvent>,
    tempos: TempoTable,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            current_program: 0,
            events: Vec::new(),
            tempos: TempoTable::new(),
        }
    }

    pub fn run(mut self, tracks: &[Vec<RawMessage>]) -> Result<Extraction, ConvertError> {
        for (track_num, track) in tracks.iter().enumerate() {
            self.start_track();
            for msg in track {
                self.process_message(msg);
            }
            debug!(
                "track {}: {} ticks, {} tempo entries so far",
                track_num,
                self.ticks,
                self.tempos.len()
            );
        }

        let Self {
            mut events, tempos, ..
        } = self;

        // stable, so ties keep track order
        events.sort_by_key(|e| e.time);

        let notes = events.iter().filter(|e| e.is_note_on()).count();
        if notes == 0 {
            return Err(ConvertError::NoNotes);
        }
        info!(
            "Extracted {} note events ({} note-ons, {} tempo entries)",
            events.len(),
            notes,
            tempos.len()
        );

        Ok(Extraction { events, tempos })
    }

    fn start_track(&mut self) {
        self.ticks = 0;
        self.current_program = 0;
    }

    fn process_message(&mut self, msg: &RawMessage) {
        self.ticks += u64::from(msg.delta_time);
        let time = self.ticks;
        match msg.kind {
            RawKind::NoteOn {
                channel,
                note,
                velocity,
            } if velocity > 0 => self.events.push(TimedEvent {
                time,
                kind: EventKind::NoteOn {
                    note,
                    velocity,
                    channel,
                    program: self.current_program,
                },
            }),
            RawKind::NoteOn { channel, note, .. } | RawKind::NoteOff { channel, note } => {
                self.events.push(TimedEvent {
                    time,
                    kind: EventKind::NoteOff { note, channel },
                })
            }
            RawKind::ProgramChange { program, .. } => {
                self.current_program = program;
            }
            RawKind::SetTempo(micros_per_qn) => self.handle_tempo_change(time, micros_per_qn),
            RawKind::Other => (),
        }
    }

    fn handle_tempo_change(&mut self, time: u64, micros_per_qn: u32) {
        // tempo lives in the table only, the event list holds notes
        debug!("-- Tempo change at {}: {}", time, micros_per_qn);
        self.tempos.set(time, micros_per_qn);
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

pub fn extract(tracks: &[Vec<RawMessage>]) -> Result<Extraction, ConvertError> {
    Extractor::new().run(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_on(delta: u32, note: u8, velocity: u8) -> RawMessage {
        RawMessage::new(
            delta,
            RawKind::NoteOn {
                channel: 0,
                note,
                velocity,
            },
        )
    }

    #[test]
    fn absolute_time_accumulates_across_ignored_messages() {
        let track = vec![
            RawMessage::new(10, RawKind::Other),
            note_on(20, 60, 90),
            note_on(30, 62, 90),
        ];
        let extraction = extract(&[track]).unwrap();
        let times: Vec<u64> = extraction.events.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![30, 60]);
    }

    #[test]
    fn zero_velocity_note_on_is_a_note_off() {
        let track = vec![
            note_on(0, 60, 90),
            note_on(480, 60, 0),
            RawMessage::new(0, RawKind::NoteOff { channel: 0, note: 60 }),
        ];
        let extraction = extract(&[track]).unwrap();
        assert_eq!(
            extraction.events[1],
            TimedEvent {
                time: 480,
                kind: EventKind::NoteOff { note: 60, channel: 0 }
            }
        );
        assert_eq!(extraction.events[2].kind, extraction.events[1].kind);
    }

    #[test]
    fn notes_carry_program_of_their_own_track() {
        let first = vec![
            RawMessage::new(0, RawKind::ProgramChange { channel: 0, program: 40 }),
            note_on(100, 60, 90),
        ];
        let second = vec![note_on(50, 48, 90)];
        let extraction = extract(&[first, second]).unwrap();

        let programs: Vec<(u64, u8)> = extraction
            .events
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::NoteOn { program, .. } => Some((e.time, program)),
                _ => None,
            })
            .collect();
        assert_eq!(programs, vec![(50, 0), (100, 40)]);
        assert_eq!(extraction.first_program(), Some(0));
    }

    #[test]
    fn ties_keep_track_order() {
        let first = vec![note_on(240, 64, 90)];
        let second = vec![note_on(240, 60, 90)];
        let extraction = extract(&[first, second]).unwrap();
        let notes: Vec<u8> = extraction
            .events
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::NoteOn { note, .. } => Some(note),
                _ => None,
            })
            .collect();
        assert_eq!(notes, vec![64, 60]);
    }

    #[test]
    fn tempo_is_global_and_last_write_wins() {
        let first = vec![RawMessage::new(960, RawKind::SetTempo(600_000))];
        let second = vec![
            RawMessage::new(0, RawKind::SetTempo(400_000)),
            RawMessage::new(960, RawKind::SetTempo(300_000)),
            note_on(0, 60, 90),
        ];
        let extraction = extract(&[first, second]).unwrap();
        assert_eq!(extraction.tempos.initial(), 400_000);
        assert_eq!(
            extraction.tempos.changes_after_start().collect::<Vec<_>>(),
            vec![(960, 300_000)]
        );
    }

    #[test]
    fn tempo_changes_stay_out_of_the_event_list() {
        let track = vec![
            RawMessage::new(0, RawKind::SetTempo(500_000)),
            note_on(0, 60, 90),
            RawMessage::new(480, RawKind::SetTempo(600_000)),
            note_on(0, 60, 0),
        ];
        let extraction = extract(&[track]).unwrap();
        assert_eq!(extraction.events.len(), 2);
        assert!(extraction
            .events
            .iter()
            .all(|e| matches!(e.kind, EventKind::NoteOn { .. } | EventKind::NoteOff { .. })));
        assert_eq!(
            extraction.tempos.changes_after_start().collect::<Vec<_>>(),
            vec![(480, 600_000)]
        );
    }

    #[test]
    fn no_note_on_is_reported() {
        let track = vec![
            RawMessage::new(0, RawKind::SetTempo(500_000)),
            RawMessage::new(0, RawKind::NoteOff { channel: 0, note: 60 }),
            note_on(10, 60, 0),
        ];
        let err = extract(&[track]).unwrap_err();
        assert!(matches!(err, ConvertError::NoNotes));
    }

    #[test]
    fn empty_file_is_reported() {
        let err = extract(&[]).unwrap_err();
        assert!(matches!(err, ConvertError::NoNotes));
    }
}
