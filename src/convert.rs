use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::error::ConvertError;
use crate::extractor::extract;
use crate::formatter::{ScoreFormatter, ScratchFormatter};
use crate::grouper::ChordGrouper;
use crate::reader::MidiSource;
use crate::timeline::{ScoreLine, Timeline};

/// `song.mid` -> `song_scratch.txt`, next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut path = input.with_extension("").into_os_string();
    path.push("_scratch.txt");
    PathBuf::from(path)
}

/// Run the whole pipeline on an already parsed file.
pub fn render_lines(
    source: &MidiSource,
    progress: Option<&mut dyn FnMut(f64)>,
) -> Result<Vec<ScoreLine>, ConvertError> {
    let extraction = extract(&source.tracks)?;
    let grouping = ChordGrouper::new(source.ticks_per_beat).group(&extraction.events, progress);
    let timeline = Timeline::new(
        source.ticks_per_beat,
        extraction.first_program(),
        &extraction.tempos,
    );
    Ok(timeline.render(&grouping.chords, &extraction.tempos))
}

/// Load, convert and render to text. Returns the score and its line count.
pub fn convert_to_string(
    input: &Path,
    progress: Option<&mut dyn FnMut(f64)>,
) -> Result<(String, usize), ConvertError> {
    let source = MidiSource::load(input)?;
    let lines = render_lines(&source, progress)?;
    let text = ScratchFormatter::new().format_all(&lines);
    Ok((text, lines.len()))
}

fn try_convert(
    input: &Path,
    output: &Path,
    progress: Option<&mut dyn FnMut(f64)>,
) -> Result<usize, ConvertError> {
    let (text, line_count) = convert_to_string(input, progress)?;
    fs::write(output, text).map_err(ConvertError::Write)?;
    Ok(line_count)
}

/// Convert `input` into a Scratch score at `output`.
///
/// Never fails outright: the flag says whether the file was written and the
/// message is meant to be shown to the user as is. Nothing is written when
/// the input cannot be read or holds no notes.
pub fn convert(
    input: &Path,
    output: &Path,
    progress: Option<&mut dyn FnMut(f64)>,
) -> (bool, String) {
    match try_convert(input, output, progress) {
        Ok(line_count) => {
            info!("Wrote {} lines to {}", line_count, output.display());
            (
                true,
                format!(
                    "Successfully converted!\nOutput: {}\nTotal lines: {}",
                    output.display(),
                    line_count
                ),
            )
        }
        Err(e) => {
            error!("{}", e);
            (false, e.to_string())
        }
    }
}
