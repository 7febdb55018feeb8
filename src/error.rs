use std::io;

use thiserror::Error;

/// Every way a conversion can end early. None of them are retried.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Error reading MIDI file: {0}")]
    Parse(String),

    #[error("No note events found in MIDI file!")]
    NoNotes,

    #[error("Error writing output file: {0}")]
    Write(#[source] io::Error),
}
