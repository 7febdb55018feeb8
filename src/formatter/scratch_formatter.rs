use crate::formatter::ScoreFormatter;
use crate::quantize::is_long_duration;
use crate::timeline::ScoreLine;

/// Text understood by the Scratch music extension importer.
pub struct ScratchFormatter {}

impl ScratchFormatter {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ScratchFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreFormatter for ScratchFormatter {
    fn format(&self, line: &ScoreLine) -> String {
        // Instr: 1 / BPM: 120.0 / Rest: 0.5 / Note: 60~64~67
        match line {
            ScoreLine::Instrument(instrument) => format!("Instr: {}", instrument),
            ScoreLine::Bpm(bpm) => format!("BPM: {:?}", bpm),
            ScoreLine::Rest(beats) => format!("Rest: {}", format_beats(*beats)),
            ScoreLine::Note(notes) => format!(
                "Note: {}",
                notes
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join("~")
            ),
        }
    }
}

// table durations print bare ("1", "0.75"), long rounded ones keep a decimal ("17.0")
fn format_beats(beats: f64) -> String {
    if is_long_duration(beats) {
        format!("{:?}", beats)
    } else {
        format!("{}", beats)
    }
}
