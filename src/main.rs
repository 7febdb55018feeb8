mod convert;
mod error;
mod extractor;
mod formatter;
mod grouper;
mod instrument;
mod midi_event;
mod quantize;
mod reader;
mod timeline;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{debug, warn};

#[derive(Parser, Debug)]
#[command(version, about = "Convert MIDI files into Scratch music scores")]
struct Args {
    #[arg(short, long)]
    midi_file: PathBuf,

    #[arg(
        short,
        long,
        help = "Where to write the score (default: <midi-name>_scratch.txt next to the input)"
    )]
    output: Option<PathBuf>,

    #[arg(long, help = "Print the score to stdout instead of writing a file")]
    stdout: bool,

    #[arg(short, long, help = "Log every processing step")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    debug!("MIDI FILE: {}", args.midi_file.display());
    let is_midi = args
        .midi_file
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mid") || ext.eq_ignore_ascii_case("midi"));
    if !is_midi {
        warn!("{} does not look like a MIDI file", args.midi_file.display());
    }

    let mut report_progress = |pct: f64| debug!("Grouping chords: {:.0}%", pct);

    if args.stdout {
        let (score, _) = convert::convert_to_string(&args.midi_file, Some(&mut report_progress))?;
        println!("{}", score);
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| convert::default_output_path(&args.midi_file));
    let (ok, message) = convert::convert(&args.midi_file, &output, Some(&mut report_progress));
    if !ok {
        // already logged by the converter
        std::process::exit(1);
    }
    println!("{}", message);

    Ok(())
}
