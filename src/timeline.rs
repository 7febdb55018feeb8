use log::debug;

use crate::instrument::{map_instrument, DEFAULT_INSTRUMENT};
use crate::midi_event::{micros_per_qn_to_bpm, ChordEvent, TempoTable};
use crate::quantize::{quantize, MIN_REST_BEATS};

/// One instruction of the Scratch score.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreLine {
    Instrument(u8),
    Bpm(f64),
    Rest(f64),
    Note(Vec<u8>),
}

enum Step<'a> {
    Tempo(u32),
    Chord(&'a ChordEvent),
}

/// Turns chords and tempo changes into score lines.
pub struct Timeline {
    ticks_per_beat: f64,
    previous_time: u64,
    current_bpm: f64,
    last_instrument: u8,
    lines: Vec<ScoreLine>,
}

impl Timeline {
    pub fn new(ticks_per_beat: u16, first_program: Option<u8>, tempos: &TempoTable) -> Self {
        let last_instrument = first_program.map_or(DEFAULT_INSTRUMENT, map_instrument);
        let current_bpm = micros_per_qn_to_bpm(tempos.initial());
        Self {
            ticks_per_beat: f64::from(ticks_per_beat),
            previous_time: 0,
            current_bpm,
            last_instrument,
            lines: vec![
                ScoreLine::Instrument(last_instrument),
                ScoreLine::Bpm(current_bpm),
            ],
        }
    }

    pub fn render(mut self, chords: &[ChordEvent], tempos: &TempoTable) -> Vec<ScoreLine> {
        let mut steps: Vec<(u64, Step)> = tempos
            .changes_after_start()
            .map(|(time, tempo)| (time, Step::Tempo(tempo)))
            .chain(chords.iter().map(|c| (c.time, Step::Chord(c))))
            .collect();
        // stable; a tempo change comes before a chord on the same tick
        steps.sort_by_key(|(time, _)| *time);

        for (_, step) in steps {
            match step {
                Step::Tempo(micros_per_qn) => self.handle_tempo_change(micros_per_qn),
                Step::Chord(chord) => self.handle_chord(chord),
            }
        }

        debug!("Rendered {} score lines", self.lines.len());
        self.lines
    }

    fn handle_tempo_change(&mut self, micros_per_qn: u32) {
        let bpm = micros_per_qn_to_bpm(micros_per_qn);
        if bpm != self.current_bpm {
            self.lines.push(ScoreLine::Bpm(bpm));
            self.current_bpm = bpm;
        }
    }

    fn handle_chord(&mut self, chord: &ChordEvent) {
        let instrument = map_instrument(chord.program);
        if instrument != self.last_instrument {
            self.lines.push(ScoreLine::Instrument(instrument));
            self.last_instrument = instrument;
        }

        if chord.time > self.previous_time {
            let rest_beats = (chord.time - self.previous_time) as f64 / self.ticks_per_beat;
            if rest_beats >= MIN_REST_BEATS {
                self.lines.push(ScoreLine::Rest(quantize(rest_beats)));
            }
        }

        let mut notes = chord.notes.clone();
        notes.sort_unstable();
        self.lines.push(ScoreLine::Note(notes));
        self.previous_time = chord.time;
    }
}
