// Temporary MIDI output owned on behalf of a front end.
//
// A front end renders a progression to a scratch file, hands that path to a
// player, and later either saves it somewhere permanent or abandons it.
// `MidiSession` owns the scratch file for that whole lifecycle: rendering
// again replaces it, `save_as` moves it out, and dropping the session removes
// whatever is left. A one-shot caller such as the CLI can instead `release`
// the file and take over responsibility for deleting it.
//
// Scratch names combine the process id with a process-wide counter, so two
// sessions (or two renders) never write to the same path.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use crate::error::{MusicError, Result};
use crate::midi::{EncodeOptions, write_midi};
use crate::progression::Progression;

static NEXT_SCRATCH_ID: AtomicU64 = AtomicU64::new(0);

/// A fresh scratch path inside `dir`.
pub fn unique_temp_path(dir: &Path) -> PathBuf {
    let id = NEXT_SCRATCH_ID.fetch_add(1, Ordering::Relaxed);
    dir.join(format!("chordcraft-{}-{id}.mid", std::process::id()))
}

#[derive(Debug)]
pub struct MidiSession {
    temp_dir: PathBuf,
    current: Option<PathBuf>,
}

impl MidiSession {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            current: None,
        }
    }

    /// Path of the scratch file currently held, if any.
    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Encode `progression` into a new scratch file and return its path.
    ///
    /// On failure the previous scratch file (if any) is left untouched.
    pub fn render(&mut self, progression: Progression, options: &EncodeOptions) -> Result<PathBuf> {
        let path = unique_temp_path(&self.temp_dir);
        write_midi(progression, &path, options)?;
        self.discard();
        self.current = Some(path.clone());
        Ok(path)
    }

    /// Move the scratch file to `dest`. The session no longer owns it after
    /// a successful save.
    pub fn save_as(&mut self, dest: &Path) -> Result<PathBuf> {
        let Some(src) = self.current.as_deref() else {
            return Err(MusicError::NothingToSave);
        };
        move_file(src, dest).map_err(|e| MusicError::io(dest, e))?;
        info!(from = %src.display(), to = %dest.display(), "saved MIDI file");
        self.current = None;
        Ok(dest.to_path_buf())
    }

    /// Hand the scratch file to the caller. The session stops tracking it,
    /// so it survives the session being dropped.
    pub fn release(&mut self) -> Option<PathBuf> {
        let path = self.current.take()?;
        info!(path = %path.display(), "released MIDI file to caller");
        Some(path)
    }

    /// Delete the scratch file, if one is held.
    pub fn discard(&mut self) {
        if let Some(path) = self.current.take() {
            match fs::remove_file(&path) {
                Ok(()) => info!(path = %path.display(), "removed temporary MIDI file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "could not remove temporary MIDI file"),
            }
        }
    }
}

impl Drop for MidiSession {
    fn drop(&mut self) {
        self.discard();
    }
}

/// Rename, falling back to copy + remove when `dest` is on another
/// filesystem.
fn move_file(src: &Path, dest: &Path) -> io::Result<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    copy_file(src, dest)?;
    fs::remove_file(src)
}

/// Copy `src` to `dest`. Once `dest` has been created, a failed copy removes
/// it again so no truncated file is left behind.
fn copy_file(src: &Path, dest: &Path) -> io::Result<()> {
    let mut reader = File::open(src)?;
    let copied = File::create(dest).and_then(|mut writer| {
        io::copy(&mut reader, &mut writer)?;
        writer.sync_all()
    });
    if let Err(source) = copied {
        match fs::remove_file(dest) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %dest.display(), error = %e, "could not remove partial copy"),
        }
        return Err(source);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::decode;

    fn let_it_be() -> Progression {
        Progression::from_literal(["C", "G", "Am", "F"])
    }

    #[test]
    fn test_unique_paths() {
        let dir = Path::new("/tmp");
        assert_ne!(unique_temp_path(dir), unique_temp_path(dir));
    }

    #[test]
    fn test_render_then_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let mut session = MidiSession::new(dir.path());
            let path = session.render(let_it_be(), &EncodeOptions::default()).unwrap();
            assert!(path.exists());
            assert_eq!(session.current(), Some(path.as_path()));
            path
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_render_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MidiSession::new(dir.path());
        let first = session.render(let_it_be(), &EncodeOptions::default()).unwrap();
        let second = session
            .render(Progression::from_literal(["Dm", "G7"]), &EncodeOptions::default())
            .unwrap();
        assert_ne!(first, second);
        assert!(!first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_failed_render_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MidiSession::new(dir.path());
        let first = session.render(let_it_be(), &EncodeOptions::default()).unwrap();
        let err = session
            .render(Progression::from_literal(["C", "H"]), &EncodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, MusicError::InvalidChordSymbol { .. }));
        assert!(first.exists());
        assert_eq!(session.current(), Some(first.as_path()));
        // Only the first file was ever created.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_as_moves_file_out_of_session() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("let_it_be.mid");
        let mut session = MidiSession::new(dir.path());
        let scratch = session.render(let_it_be(), &EncodeOptions::default()).unwrap();
        session.save_as(&dest).unwrap();
        assert!(!scratch.exists());
        assert!(session.current().is_none());
        drop(session);
        let events = decode(&fs::read(&dest).unwrap()).unwrap();
        assert_eq!(events.len(), 24);
    }

    #[test]
    fn test_save_without_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MidiSession::new(dir.path());
        assert!(matches!(
            session.save_as(&dir.path().join("x.mid")),
            Err(MusicError::NothingToSave)
        ));
    }

    #[test]
    fn test_release_leaves_file_for_caller() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let mut session = MidiSession::new(dir.path());
            session.render(let_it_be(), &EncodeOptions::default()).unwrap();
            let released = session.release().unwrap();
            assert!(session.current().is_none());
            assert!(session.release().is_none());
            released
        };
        assert!(path.exists());
        let events = decode(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(events.len(), 24);
    }

    #[test]
    fn test_failed_copy_leaves_no_partial_dest() {
        // Reading a directory fails after `dest` has already been created.
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("not-a-file");
        fs::create_dir(&src).unwrap();
        let dest = dir.path().join("out.mid");
        assert!(copy_file(&src, &dest).is_err());
        assert!(!dest.exists());
        assert!(src.exists());
    }

    #[test]
    fn test_copy_fallback_preserves_contents() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MidiSession::new(dir.path());
        let scratch = session.render(let_it_be(), &EncodeOptions::default()).unwrap();
        let bytes = fs::read(&scratch).unwrap();
        let dest = dir.path().join("copied.mid");
        copy_file(&scratch, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), bytes);
    }

    #[test]
    fn test_save_into_missing_directory_keeps_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = MidiSession::new(dir.path());
        let scratch = session.render(let_it_be(), &EncodeOptions::default()).unwrap();
        let err = session
            .save_as(&dir.path().join("missing").join("out.mid"))
            .unwrap_err();
        assert!(matches!(err, MusicError::EncodingIo { .. }));
        assert!(scratch.exists());
    }
}
