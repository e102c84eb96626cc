// Error type shared by every stage of the chord-to-MIDI pipeline.
//
// All variants are recoverable at the caller boundary: the CLI reports them
// and exits non-zero, a UI would show the message. None of them indicate a
// bug in the static tables, because `vocabulary::validate` rejects bad table
// data at startup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MusicError {
    /// The requested key is not in the vocabulary.
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    /// The requested reference piece is not in the song table.
    #[error("Unknown piece: {0}")]
    UnknownPiece(String),

    /// A chord symbol whose root spelling is not in the root table.
    #[error("Invalid chord symbol '{symbol}': unknown root '{root}'")]
    InvalidChordSymbol { symbol: String, root: String },

    /// Asked for more distinct chords than the key offers, or none at all.
    #[error("Cannot pick {requested} distinct chords from a key of {available}")]
    InvalidProgressionLength { requested: usize, available: usize },

    /// Encoder parameter out of the range the container can express.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Writing, moving, or removing an output file failed.
    #[error("Failed to write {}: {source}", .path.display())]
    EncodingIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The MIDI container could not be serialized or parsed.
    #[error("MIDI container error: {0}")]
    Container(String),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `save_as` was called before anything was rendered.
    #[error("No MIDI file has been rendered yet")]
    NothingToSave,
}

pub type Result<T> = std::result::Result<T, MusicError>;

impl MusicError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MusicError::EncodingIo {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = MusicError::InvalidChordSymbol {
            symbol: "Hm".into(),
            root: "H".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid chord symbol 'Hm': unknown root 'H'"
        );
        assert_eq!(
            MusicError::UnknownKey("Z Major".into()).to_string(),
            "Unknown key: Z Major"
        );
    }

    #[test]
    fn io_error_keeps_path_and_source() {
        let err = MusicError::io(
            "/nowhere/out.mid",
            io::Error::new(io::ErrorKind::NotFound, "missing dir"),
        );
        assert_eq!(err.to_string(), "Failed to write /nowhere/out.mid: missing dir");
        assert!(std::error::Error::source(&err).is_some());
    }
}
