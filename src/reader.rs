use std::path::Path;

use log::debug;
use midi_file::core::{Message, NoteMessage};
use midi_file::file::{Division, Event, MetaEvent, TrackEvent};
use midi_file::MidiFile;

use crate::error::ConvertError;
use crate::midi_event::{RawKind, RawMessage};

/// A parsed MIDI file reduced to what the converter needs.
#[derive(Debug, Clone)]
pub struct MidiSource {
    pub ticks_per_beat: u16,
    pub tracks: Vec<Vec<RawMessage>>,
}

impl MidiSource {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let midi_file =
            MidiFile::load(path.as_ref()).map_err(|e| ConvertError::Parse(e.to_string()))?;
        Self::from_midi_file(&midi_file)
    }

    pub fn from_midi_file(midi_file: &MidiFile) -> Result<Self, ConvertError> {
        let ticks_per_beat = match midi_file.header().division() {
            Division::QuarterNote(qtr) => {
                debug!("Quarter Note Division: {}", qtr);
                checked_ticks_per_beat(qtr.get())?
            }
            Division::Smpte(smpte) => {
                return Err(ConvertError::Parse(format!(
                    "SMPTE division is not supported: {:?}",
                    smpte
                )));
            }
        };

        let tracks: Vec<Vec<RawMessage>> = midi_file
            .tracks()
            .map(|track| track.events().map(raw_message).collect())
            .collect();

        Ok(Self {
            ticks_per_beat,
            tracks,
        })
    }
}

fn checked_ticks_per_beat(ticks_per_beat: u16) -> Result<u16, ConvertError> {
    if ticks_per_beat == 0 {
        return Err(ConvertError::Parse("division of zero ticks per beat".into()));
    }
    Ok(ticks_per_beat)
}

fn raw_message(track_event: &TrackEvent) -> RawMessage {
    let dt = track_event.delta_time();
    let kind = match track_event.event() {
        Event::Midi(msg) => handle_midi_msg(msg),
        Event::Meta(MetaEvent::SetTempo(new_tempo)) => RawKind::SetTempo(new_tempo.get()),
        other => {
            debug!("-- EVENT: {:?} {:?}", dt, other);
            RawKind::Other
        }
    };
    RawMessage::new(dt, kind)
}

fn handle_midi_msg(msg: &Message) -> RawKind {
    match msg {
        Message::NoteOn(note) => handle_note(note, true),
        Message::NoteOff(note) => handle_note(note, false),
        Message::ProgramChange(pc) => RawKind::ProgramChange {
            channel: pc.channel().get(),
            program: pc.program().get(),
        },
        _ => {
            debug!("Unhandled MIDI: {:?}", msg);
            RawKind::Other
        }
    }
}

fn handle_note(note: &NoteMessage, on: bool) -> RawKind {
    let channel = note.channel().get();
    let key = note.note_number().get();
    if on {
        RawKind::NoteOn {
            channel,
            note: key,
            velocity: note.velocity().get(),
        }
    } else {
        RawKind::NoteOff { channel, note: key }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    // Format 1, two tracks, 480 ticks per quarter note
    pub(crate) fn two_track_smf() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&[0, 0, 0, 6, 0, 1, 0, 2, 0x01, 0xE0]);

        // conductor track: tempo 500000 at tick 0
        let conductor = [
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
            0x00, 0xFF, 0x2F, 0x00,
        ];
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(conductor.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&conductor);

        // note 60 on at 0, off at 480 (delta 0x83 0x60)
        let notes = [
            0x00, 0x90, 0x3C, 0x64, //
            0x83, 0x60, 0x80, 0x3C, 0x40, //
            0x00, 0xFF, 0x2F, 0x00,
        ];
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(notes.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&notes);
        bytes
    }

    #[test]
    fn loads_tracks_and_division() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&two_track_smf()).unwrap();

        let source = MidiSource::load(file.path()).unwrap();
        assert_eq!(source.ticks_per_beat, 480);
        assert_eq!(source.tracks.len(), 2);
        assert!(source.tracks[0]
            .iter()
            .any(|m| m.kind == RawKind::SetTempo(500_000)));
        assert!(source.tracks[1].contains(&RawMessage::new(
            0,
            RawKind::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100
            }
        )));
    }

    #[test]
    fn garbage_is_a_parse_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a midi file").unwrap();

        let err = MidiSource::load(file.path()).unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn smpte_division_is_a_parse_failure() {
        let mut bytes = two_track_smf();
        // -25 fps, 40 ticks per frame
        bytes[12] = 0xE7;
        bytes[13] = 0x28;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let err = MidiSource::load(file.path()).unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn zero_ticks_per_beat_is_rejected() {
        assert!(matches!(
            checked_ticks_per_beat(0),
            Err(ConvertError::Parse(msg)) if msg.contains("zero ticks")
        ));
        assert_eq!(checked_ticks_per_beat(480).unwrap(), 480);
    }

    #[test]
    fn missing_file_is_a_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = MidiSource::load(dir.path().join("missing.mid")).unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }
}
