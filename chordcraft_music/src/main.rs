// Chordcraft CLI entry point.
//
// Generates chord progressions and writes them as MIDI. The pipeline:
// key (or reference piece, or literal chords) -> progression -> MIDI events
// -> .mid file. Without `--output` the file is rendered to a fresh path in the
// configured temp directory and left there; deleting it is up to the caller.
//
// Usage:
//   chordcraft keys
//   chordcraft songs
//   chordcraft generate --key "C Major" [--length N] [--seed N] [-o out.mid]
//   chordcraft song --name "Let It Be (The Beatles)" [-o out.mid]
//   chordcraft encode C G Am F [-o out.mid]
//   chordcraft inspect out.mid
//
// Global options: --config FILE, --ticks-per-chord N, --velocity N.
// Logging is controlled by RUST_LOG (default `chordcraft=info`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chordcraft_music::chord;
use chordcraft_music::config::AssistantConfig;
use chordcraft_music::midi::{self, MidiEvent};
use chordcraft_music::progression::Progression;
use chordcraft_music::session::MidiSession;
use chordcraft_music::{songs, vocabulary};
use chordcraft_prng::ChordRng;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "chordcraft")]
#[command(about = "Generate chord progressions and render them as MIDI")]
#[command(version)]
struct Args {
    /// JSON config file with default encoder settings
    #[arg(long, global = true, env = "CHORDCRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Length of each chord in ticks (480 = one quarter note)
    #[arg(long, global = true)]
    ticks_per_chord: Option<u32>,

    /// Note velocity, 0-127
    #[arg(long, global = true)]
    velocity: Option<u8>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every key with its diatonic chords
    Keys,
    /// List the reference pieces
    Songs,
    /// Pick random distinct chords from a key
    Generate {
        #[arg(short, long)]
        key: String,
        /// Number of chords (defaults to the config value, normally 4)
        #[arg(short, long)]
        length: Option<usize>,
        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the progression of a reference piece
    Song {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a literal list of chord symbols
    Encode {
        #[arg(required = true)]
        chords: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the note events of a MIDI file
    Inspect { path: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chordcraft=info,chordcraft_music=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    vocabulary::validate().context("chord vocabulary failed its self-check")?;

    let mut config = match &args.config {
        Some(path) => AssistantConfig::load(path)?,
        None => AssistantConfig::default(),
    };
    if let Some(ticks) = args.ticks_per_chord {
        config.ticks_per_chord = ticks;
    }
    if let Some(velocity) = args.velocity {
        config.velocity = velocity;
    }
    let options = config.encode_options();
    options.validate()?;

    let (progression, output) = match args.command {
        Command::Keys => {
            for key in vocabulary::key_names() {
                let chords = vocabulary::require_key(key)?;
                println!("{key:<10} {}", chords.join(" "));
            }
            return Ok(());
        }
        Command::Songs => {
            for name in songs::piece_names() {
                let chords = songs::piece_chords(name).unwrap_or_default();
                println!("{name}: {}", chords.join(" "));
            }
            return Ok(());
        }
        Command::Inspect { path } => return inspect(&path),
        Command::Generate {
            key,
            length,
            seed,
            output,
        } => {
            let mut rng = match seed {
                Some(s) => ChordRng::new(s),
                None => ChordRng::from_entropy(),
            };
            let n = length.unwrap_or(config.progression_length);
            let progression = Progression::generate(&key, n, &mut rng)
                .with_context(|| format!("generating a progression in {key}"))?;
            println!("Generated Progression: {progression}");
            (progression, output)
        }
        Command::Song { name, output } => {
            let progression = songs::piece(&name)?;
            println!("{name}: {progression}");
            (progression, output)
        }
        Command::Encode { chords, output } => (Progression::from_literal(chords), output),
    };

    match output {
        Some(path) => {
            midi::write_midi(progression, &path, &options)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("MIDI saved as: {}", path.display());
        }
        None => {
            let mut session = MidiSession::new(config.temp_dir());
            session.render(progression, &options)?;
            // Outlives the process; the caller deletes it.
            if let Some(path) = session.release() {
                println!("MIDI saved as: {}", path.display());
                info!(path = %path.display(), "hand this path to a MIDI player");
            }
        }
    }
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let events = midi::decode(&bytes)?;
    let mut tick: u64 = 0;
    for event in &events {
        tick += u64::from(event.delta());
        let kind = match event {
            MidiEvent::NoteOn { .. } => "on ",
            MidiEvent::NoteOff { .. } => "off",
        };
        println!(
            "{tick:>8}  {kind}  {:>3} ({})",
            event.pitch(),
            chord::PitchClass::from_pitch(event.pitch())
        );
    }
    println!("{} events", events.len());
    Ok(())
}
