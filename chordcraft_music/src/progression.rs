// Chord progressions: random picks from a key, or literal sequences.
//
// A `Progression` is an immutable, ordered list of chord symbols. It is built
// either by sampling distinct diatonic chords from a key (`generate`) or by
// wrapping a fixed sequence supplied from outside (`from_literal`), and is
// consumed by value by the MIDI encoder.
//
// Sampling uses a partial Fisher-Yates shuffle over chord positions, drawing
// every index from the injected `RandomSource`. Given a scripted source the
// output is fully predictable.

use std::fmt;

use chordcraft_prng::RandomSource;
use tracing::debug;

use crate::error::{MusicError, Result};
use crate::vocabulary::{CHORDS_PER_KEY, require_key};

/// Length of a freshly generated progression.
pub const DEFAULT_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    chords: Vec<String>,
}

impl Progression {
    /// Sample `n` distinct chords from `key` in random order.
    ///
    /// Fails with `UnknownKey` for a key not in the vocabulary and with
    /// `InvalidProgressionLength` unless `1 <= n <= 7`.
    pub fn generate<R: RandomSource + ?Sized>(key: &str, n: usize, rng: &mut R) -> Result<Self> {
        let pool = require_key(key)?;
        if n == 0 || n > pool.len() {
            return Err(MusicError::InvalidProgressionLength {
                requested: n,
                available: pool.len(),
            });
        }

        let mut order: [usize; CHORDS_PER_KEY] = std::array::from_fn(|i| i);
        for i in 0..n {
            let j = rng.range_usize(i, order.len());
            order.swap(i, j);
        }

        let chords: Vec<String> = order[..n].iter().map(|&i| pool[i].to_string()).collect();
        debug!(key, chords = ?chords, "generated progression");
        Ok(Self { chords })
    }

    /// Wrap a fixed progression unchanged; order and repeats are preserved.
    pub fn from_literal<I, S>(chords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chords: chords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn chords(&self) -> &[String] {
        &self.chords
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chords.join(" -> "))
    }
}
