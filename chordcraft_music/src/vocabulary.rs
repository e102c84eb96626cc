// Static chord vocabulary: diatonic chords per key and the root spelling table.
//
// Both tables are plain `static` slices, built at compile time and never
// mutated, so concurrent readers need no synchronization. Lookups are linear
// scans; the tables are small (24 keys, 19 spellings).
//
// `validate` is the startup self-check. It parses every chord of every key
// and checks the table invariants, so a typo in the data fails fast instead
// of surfacing when a user happens to pick the broken key.

use std::collections::BTreeSet;

use crate::chord;
use crate::error::{MusicError, Result};

/// Number of diatonic chords in every key.
pub const CHORDS_PER_KEY: usize = 7;

/// Key name → its diatonic triads (I ii iii IV V vi vii° for major keys,
/// i ii° III iv v VI VII for minor keys).
static KEYS: &[(&str, [&str; CHORDS_PER_KEY])] = &[
    // Major keys
    ("C Major", ["C", "Dm", "Em", "F", "G", "Am", "Bdim"]),
    ("G Major", ["G", "Am", "Bm", "C", "D", "Em", "F#dim"]),
    ("D Major", ["D", "Em", "F#m", "G", "A", "Bm", "C#dim"]),
    ("A Major", ["A", "Bm", "C#m", "D", "E", "F#m", "G#dim"]),
    ("E Major", ["E", "F#m", "G#m", "A", "B", "C#m", "D#dim"]),
    ("B Major", ["B", "C#m", "D#m", "E", "F#", "G#m", "A#dim"]),
    ("F# Major", ["F#", "G#m", "A#m", "B", "C#", "D#m", "E#dim"]),
    ("C# Major", ["C#", "D#m", "E#m", "F#", "G#", "A#m", "B#dim"]),
    ("F Major", ["F", "Gm", "Am", "Bb", "C", "Dm", "Edim"]),
    ("Bb Major", ["Bb", "Cm", "Dm", "Eb", "F", "Gm", "Adim"]),
    ("Eb Major", ["Eb", "Fm", "Gm", "Ab", "Bb", "Cm", "Ddim"]),
    ("Ab Major", ["Ab", "Bbm", "Cm", "Db", "Eb", "Fm", "Gdim"]),
    // Minor keys
    ("A Minor", ["Am", "Bdim", "C", "Dm", "Em", "F", "G"]),
    ("E Minor", ["Em", "F#dim", "G", "Am", "Bm", "C", "D"]),
    ("B Minor", ["Bm", "C#dim", "D", "Em", "F#m", "G", "A"]),
    ("F# Minor", ["F#m", "G#dim", "A", "Bm", "C#m", "D", "E"]),
    ("C# Minor", ["C#m", "D#dim", "E", "F#m", "G#m", "A", "B"]),
    ("G# Minor", ["G#m", "A#dim", "B", "C#m", "D#m", "E", "F#"]),
    ("D# Minor", ["D#m", "E#dim", "F#", "G#m", "A#m", "B", "C#"]),
    ("A# Minor", ["A#m", "B#dim", "C#", "D#m", "E#m", "F#", "G#"]),
    ("D Minor", ["Dm", "Edim", "F", "Gm", "Am", "Bb", "C"]),
    ("G Minor", ["Gm", "Adim", "Bb", "Cm", "Dm", "Eb", "F"]),
    ("C Minor", ["Cm", "Ddim", "Eb", "Fm", "Gm", "Ab", "Bb"]),
    ("F Minor", ["Fm", "Gdim", "Ab", "Bbm", "Cm", "Db", "Eb"]),
];

/// Root spelling → MIDI note in the octave starting at middle C.
///
/// E# and B# only appear in the sharp-key diminished/minor chords. B# is
/// voiced an octave above C so the vii° chord of C# major sits above its
/// neighbors.
static ROOTS: &[(&str, u8)] = &[
    ("C", 60),
    ("C#", 61),
    ("Db", 61),
    ("D", 62),
    ("D#", 63),
    ("Eb", 63),
    ("E", 64),
    ("E#", 65),
    ("F", 65),
    ("F#", 66),
    ("Gb", 66),
    ("G", 67),
    ("G#", 68),
    ("Ab", 68),
    ("A", 69),
    ("A#", 70),
    ("Bb", 70),
    ("B", 71),
    ("B#", 72),
];

/// Diatonic chords of `key`, or `None` if the key is not in the vocabulary.
pub fn key_chords(key: &str) -> Option<&'static [&'static str; CHORDS_PER_KEY]> {
    KEYS.iter()
        .find(|(name, _)| *name == key)
        .map(|(_, chords)| chords)
}

/// Like `key_chords`, but an unknown key is an `UnknownKey` error.
pub fn require_key(key: &str) -> Result<&'static [&'static str; CHORDS_PER_KEY]> {
    key_chords(key).ok_or_else(|| MusicError::UnknownKey(key.to_string()))
}

/// All key names in table order (major keys first).
pub fn key_names() -> impl Iterator<Item = &'static str> {
    KEYS.iter().map(|(name, _)| *name)
}

/// Base MIDI pitch of a root spelling such as "C#" or "Bb".
pub fn root_pitch(spelling: &str) -> Option<u8> {
    ROOTS
        .iter()
        .find(|(s, _)| *s == spelling)
        .map(|&(_, pitch)| pitch)
}

/// Check the vocabulary invariants: unique key names, seven non-empty chords
/// per key, every chord parseable. Returns the first violation found.
pub fn validate() -> Result<()> {
    let mut seen = BTreeSet::new();
    for (name, chords) in KEYS {
        if !seen.insert(*name) {
            return Err(MusicError::Config(format!("duplicate key name '{name}'")));
        }
        for symbol in chords {
            if symbol.is_empty() {
                return Err(MusicError::Config(format!("empty chord symbol in '{name}'")));
            }
            chord::parse(symbol)?;
        }
    }
    let mut spellings = BTreeSet::new();
    for (spelling, _) in ROOTS {
        if !spellings.insert(*spelling) {
            return Err(MusicError::Config(format!(
                "duplicate root spelling '{spelling}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::{PitchClass, Quality};

    #[test]
    fn test_vocabulary_passes_self_check() {
        validate().unwrap();
    }

    #[test]
    fn test_twenty_four_keys() {
        assert_eq!(key_names().count(), 24);
        assert_eq!(key_names().next(), Some("C Major"));
    }

    #[test]
    fn test_every_key_chord_parses_to_a_known_quality() {
        for name in key_names() {
            for symbol in key_chords(name).unwrap() {
                let chord = chord::parse(symbol).unwrap();
                assert!(PitchClass::ALL.contains(&chord.root));
                assert!(matches!(
                    chord.quality,
                    Quality::Major | Quality::Minor | Quality::Diminished | Quality::DominantSeventh
                ));
            }
        }
    }

    #[test]
    fn test_major_key_shape() {
        // Major keys follow I ii iii IV V vi vii°.
        let expected = [
            Quality::Major,
            Quality::Minor,
            Quality::Minor,
            Quality::Major,
            Quality::Major,
            Quality::Minor,
            Quality::Diminished,
        ];
        for name in key_names().filter(|n| n.ends_with("Major")) {
            let qualities: Vec<Quality> = key_chords(name)
                .unwrap()
                .iter()
                .map(|s| chord::parse(s).unwrap().quality)
                .collect();
            assert_eq!(qualities, expected, "{name}");
        }
    }

    #[test]
    fn test_lookup_unknown_key() {
        assert!(key_chords("H Major").is_none());
        assert!(matches!(
            require_key("Nonexistent Key"),
            Err(MusicError::UnknownKey(ref k)) if k == "Nonexistent Key"
        ));
    }

    #[test]
    fn test_root_table() {
        assert_eq!(root_pitch("C"), Some(60));
        assert_eq!(root_pitch("Db"), root_pitch("C#"));
        assert_eq!(root_pitch("B"), Some(71));
        assert_eq!(root_pitch("H"), None);
        assert_eq!(root_pitch(""), None);
        // Every pitch class has at least one spelling.
        let covered: BTreeSet<u8> = ROOTS.iter().map(|&(_, p)| p % 12).collect();
        assert_eq!(covered.len(), 12);
    }
}
