// Reference pieces: well-known songs with their literal chord progressions.
//
// These progressions are played back exactly as listed, repeats included,
// through the same encoder as generated progressions. Several use dominant
// sevenths ("Yesterday") that never appear in the diatonic key tables.

use crate::error::{MusicError, Result};
use crate::progression::Progression;

static PIECES: &[(&str, &[&str])] = &[
    ("Let It Be (The Beatles)", &["C", "G", "Am", "F"]),
    ("Someone Like You (Adele)", &["A", "E", "F#m", "D"]),
    ("Shape of You (Ed Sheeran)", &["C#m", "F#m", "A", "B"]),
    (
        "Canon in D (Pachelbel)",
        &["D", "A", "Bm", "F#m", "G", "D", "G", "A"],
    ),
    ("No Woman, No Cry (Bob Marley)", &["C", "G", "Am", "F"]),
    ("With or Without You (U2)", &["D", "A", "Bm", "G"]),
    ("Don't Stop Believin' (Journey)", &["E", "B", "C#m", "A"]),
    (
        "Hotel California (Eagles)",
        &["Bm", "F#", "A", "E", "G", "D", "Em", "F#"],
    ),
    ("Mad World (Tears for Fears)", &["F", "G", "Em", "Am"]),
    ("All of Me (John Legend)", &["F", "G", "Em", "Am"]),
    ("Rolling in the Deep (Adele)", &["Am", "G", "F", "Em"]),
    ("Hallelujah (Leonard Cohen)", &["C", "Am", "F", "G"]),
    (
        "Imagine (John Lennon)",
        &["C", "F", "G", "E", "Am", "D", "G"],
    ),
    (
        "Yesterday (The Beatles)",
        &["F", "Em7", "A7", "Dm", "G7", "Bb", "C"],
    ),
    ("Perfect (Ed Sheeran)", &["G", "Em", "C", "D"]),
    (
        "Stairway to Heaven (Led Zeppelin)",
        &["Am", "G", "F", "G", "Am", "E"],
    ),
    ("Bohemian Rhapsody (Queen)", &["Bb", "Gm", "Cm", "F"]),
    (
        "Take Me Home, Country Roads (John Denver)",
        &["G", "Em", "D", "C"],
    ),
];

/// Names of all reference pieces, in table order.
pub fn piece_names() -> impl Iterator<Item = &'static str> {
    PIECES.iter().map(|(name, _)| *name)
}

/// Chord symbols of a piece, or `None` if there is no such piece.
pub fn piece_chords(name: &str) -> Option<&'static [&'static str]> {
    PIECES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, chords)| chords)
}

/// The literal progression of a named piece.
pub fn piece(name: &str) -> Result<Progression> {
    piece_chords(name)
        .map(|chords| Progression::from_literal(chords.iter().copied()))
        .ok_or_else(|| MusicError::UnknownPiece(name.to_string()))
}
