// Chord symbol parsing.
//
// Splits a chord symbol such as "Bbm", "F#dim" or "G7" into a root spelling
// and a quality, then resolves it to concrete MIDI pitches through the root
// table in `vocabulary.rs`.
//
// Quality detection is an ordered match against `QUALITY_SUFFIXES`: the first
// suffix the symbol ends with wins, exactly one suffix is removed, and
// whatever remains must be a known root spelling. Letters belonging to the
// root ("b" in "Bb") are therefore never mistaken for quality markers.
//
// Both generated and literal progressions go through this one parser; the
// dominant-seventh quality is always recognized.

use std::fmt;

use tracing::debug;

use crate::error::{MusicError, Result};
use crate::vocabulary::root_pitch;

/// The four chord qualities the encoder can voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Major,
    Minor,
    Diminished,
    DominantSeventh,
}

impl Quality {
    /// Semitone offsets from the root, in the order notes are emitted.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Quality::Major => &[0, 4, 7],
            Quality::Minor => &[0, 3, 7],
            Quality::Diminished => &[0, 3, 6],
            Quality::DominantSeventh => &[0, 4, 7, 10],
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quality::Major => "major",
            Quality::Minor => "minor",
            Quality::Diminished => "diminished",
            Quality::DominantSeventh => "dominant seventh",
        };
        f.write_str(name)
    }
}

/// Quality suffixes in match priority order.
///
/// "dim7" is checked before "m7", and "m7" before "7", so the longest marker
/// always wins and a bare root is left behind ("Em7" is root E, "Cdim7" is
/// root C). "dim7" voices as the diminished triad; any other symbol ending in
/// "7" voices as a dominant seventh.
const QUALITY_SUFFIXES: [(&str, Quality); 5] = [
    ("dim7", Quality::Diminished),
    ("dim", Quality::Diminished),
    ("m7", Quality::DominantSeventh),
    ("7", Quality::DominantSeventh),
    ("m", Quality::Minor),
];

/// One of the twelve pitch classes, named with the sharp/flat spelling most
/// common in the chord tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    EFlat,
    E,
    F,
    FSharp,
    G,
    AFlat,
    A,
    BFlat,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::EFlat,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::AFlat,
        PitchClass::A,
        PitchClass::BFlat,
        PitchClass::B,
    ];

    /// Pitch class of a MIDI note number.
    pub fn from_pitch(pitch: u8) -> Self {
        Self::ALL[(pitch % 12) as usize]
    }

    /// 0 = C through 11 = B.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::EFlat => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::AFlat => "Ab",
            PitchClass::A => "A",
            PitchClass::BFlat => "Bb",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A chord symbol resolved to its root and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedChord {
    pub root: PitchClass,
    pub quality: Quality,
    /// MIDI note of the root in the middle-C octave (B# sits at 72).
    pub base_pitch: u8,
}

impl ParsedChord {
    /// Chord tones in interval-table order (not sorted).
    pub fn pitches(&self) -> Vec<u8> {
        self.quality
            .intervals()
            .iter()
            .map(|&iv| self.base_pitch + iv)
            .collect()
    }
}

/// Split a symbol into (root spelling, quality) without validating the root.
fn split_quality(symbol: &str) -> (&str, Quality) {
    for (suffix, quality) in QUALITY_SUFFIXES {
        if let Some(root) = symbol.strip_suffix(suffix) {
            return (root, quality);
        }
    }
    (symbol, Quality::Major)
}

/// Parse a chord symbol such as "C", "Dm", "Bdim" or "Em7".
///
/// Fails with `InvalidChordSymbol` when the root spelling left after removing
/// the quality suffix is not in the root table.
pub fn parse(symbol: &str) -> Result<ParsedChord> {
    let (root_spelling, quality) = split_quality(symbol);
    let base_pitch = root_pitch(root_spelling).ok_or_else(|| MusicError::InvalidChordSymbol {
        symbol: symbol.to_string(),
        root: root_spelling.to_string(),
    })?;
    let chord = ParsedChord {
        root: PitchClass::from_pitch(base_pitch),
        quality,
        base_pitch,
    };
    debug!(symbol, root = %chord.root, %quality, "parsed chord");
    Ok(chord)
}
