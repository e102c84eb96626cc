// Chordcraft: chord progressions to MIDI.
//
// Turns a musical key (or a fixed reference progression) into a playable
// single-track Standard MIDI File. Everything up to the final file write is
// pure, in-memory data transformation.
//
// Architecture:
// - vocabulary.rs: Static key -> diatonic chord table and root spelling table,
//   plus the startup self-check
// - chord.rs: Chord symbol parser (ordered quality-suffix match) and pitch sets
// - progression.rs: Random distinct-chord sampling from a key, literal wrapping
// - songs.rs: Reference pieces with literal progressions
// - midi.rs: NoteOn/NoteOff event stream, SMF encode/decode, file output
// - session.rs: Scratch-file lifecycle for front ends (render, save, cleanup)
// - config.rs: JSON-loaded defaults
// - error.rs: `MusicError`, the error type of every fallible operation
//
// Randomness comes from `chordcraft_prng` through the `RandomSource` trait, so
// sampling is reproducible under a seed and scriptable in tests.

pub mod chord;
pub mod config;
pub mod error;
pub mod midi;
pub mod progression;
pub mod session;
pub mod songs;
pub mod vocabulary;

pub use error::{MusicError, Result};
