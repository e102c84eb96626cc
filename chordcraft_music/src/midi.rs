// MIDI output from chord progressions.
//
// Converts a `Progression` into a Standard MIDI File for playback. Each chord
// becomes a block of simultaneous NoteOn events followed by NoteOff events
// that all land `ticks_per_chord` ticks later; the next chord starts on the
// same tick, so chords play back to back with no gap and no overlap.
//
// Output is SMF Format 0: one track on channel 0 at a fixed division of 480
// ticks per quarter note, ended by an End-of-Track meta event. No tempo or
// time signature events are written, so players use their 120 BPM default.
//
// Uses the `midly` crate for both writing and reading. `decode` exists so the
// event stream can be checked after a round trip through the container.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u28},
};
use tracing::{debug, info, warn};

use crate::chord;
use crate::error::{MusicError, Result};
use crate::progression::Progression;

/// Ticks per quarter note written into the header.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Largest delta a 4-byte variable-length quantity can hold.
const MAX_DELTA: u32 = 0x0FFF_FFFF;

const CHANNEL: u8 = 0;

/// Encoder knobs. Defaults: one quarter note per chord at velocity 64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub ticks_per_chord: u32,
    pub velocity: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ticks_per_chord: TICKS_PER_QUARTER as u32,
            velocity: 64,
        }
    }
}

impl EncodeOptions {
    /// Reject values the container cannot represent.
    pub fn validate(&self) -> Result<()> {
        if self.velocity > 127 {
            return Err(MusicError::InvalidParameter(format!(
                "velocity {} is above 127",
                self.velocity
            )));
        }
        if self.ticks_per_chord == 0 || self.ticks_per_chord > MAX_DELTA {
            return Err(MusicError::InvalidParameter(format!(
                "ticks per chord {} is outside 1..={MAX_DELTA}",
                self.ticks_per_chord
            )));
        }
        Ok(())
    }
}

/// A note event in emission order. `delta` is in ticks since the previous
/// event of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { pitch: u8, velocity: u8, delta: u32 },
    NoteOff { pitch: u8, velocity: u8, delta: u32 },
}

impl MidiEvent {
    pub fn pitch(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { pitch, .. } | MidiEvent::NoteOff { pitch, .. } => pitch,
        }
    }

    pub fn delta(&self) -> u32 {
        match *self {
            MidiEvent::NoteOn { delta, .. } | MidiEvent::NoteOff { delta, .. } => delta,
        }
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, MidiEvent::NoteOn { .. })
    }

    fn to_track_event(self) -> TrackEvent<'static> {
        let message = match self {
            MidiEvent::NoteOn {
                pitch, velocity, ..
            } => MidiMessage::NoteOn {
                key: u7::new(pitch),
                vel: u7::new(velocity),
            },
            MidiEvent::NoteOff {
                pitch, velocity, ..
            } => MidiMessage::NoteOff {
                key: u7::new(pitch),
                vel: u7::new(velocity),
            },
        };
        TrackEvent {
            delta: u28::new(self.delta()),
            kind: TrackEventKind::Midi {
                channel: u4::new(CHANNEL),
                message,
            },
        }
    }
}

/// Build the note event stream for a progression.
///
/// Every chord is parsed before anything is returned; one bad symbol fails
/// the whole progression.
pub fn encode_events(progression: &Progression, options: &EncodeOptions) -> Result<Vec<MidiEvent>> {
    options.validate()?;
    let mut events = Vec::new();

    for symbol in progression.chords() {
        let pitches = chord::parse(symbol)?.pitches();

        for &pitch in &pitches {
            events.push(MidiEvent::NoteOn {
                pitch,
                velocity: options.velocity,
                delta: 0,
            });
        }
        // The first release waits out the chord; the rest share its tick.
        for (i, &pitch) in pitches.iter().enumerate() {
            events.push(MidiEvent::NoteOff {
                pitch,
                velocity: options.velocity,
                delta: if i == 0 { options.ticks_per_chord } else { 0 },
            });
        }
    }

    debug!(
        chords = progression.len(),
        events = events.len(),
        "encoded progression"
    );
    Ok(events)
}

/// Wrap an event stream in a single-track SMF.
fn events_to_smf(events: &[MidiEvent]) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let mut track: Track<'static> = events.iter().map(|e| e.to_track_event()).collect();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);
    smf
}

/// Encode a progression into the bytes of a Standard MIDI File.
pub fn encode(progression: Progression, options: &EncodeOptions) -> Result<Vec<u8>> {
    let events = encode_events(&progression, options)?;
    let smf = events_to_smf(&events);
    let mut buf = Vec::new();
    smf.write_std(&mut buf)
        .map_err(|e| MusicError::Container(e.to_string()))?;
    Ok(buf)
}

/// Read back the note events of a single-track file.
///
/// Deltas of skipped non-note events are folded into the next note event so
/// that note timing is preserved.
pub fn decode(bytes: &[u8]) -> Result<Vec<MidiEvent>> {
    let smf = Smf::parse(bytes).map_err(|e| MusicError::Container(e.to_string()))?;
    if smf.tracks.len() != 1 {
        return Err(MusicError::Container(format!(
            "expected 1 track, found {}",
            smf.tracks.len()
        )));
    }

    let mut events = Vec::new();
    let mut carried: u32 = 0;
    for event in &smf.tracks[0] {
        let delta = carried.saturating_add(event.delta.as_int());
        match event.kind {
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } => {
                events.push(MidiEvent::NoteOn {
                    pitch: key.as_int(),
                    velocity: vel.as_int(),
                    delta,
                });
                carried = 0;
            }
            TrackEventKind::Midi {
                message: MidiMessage::NoteOff { key, vel },
                ..
            } => {
                events.push(MidiEvent::NoteOff {
                    pitch: key.as_int(),
                    velocity: vel.as_int(),
                    delta,
                });
                carried = 0;
            }
            _ => carried = delta,
        }
    }
    Ok(events)
}

/// Encode a progression and write it to `path`.
///
/// Nothing is written if any chord fails to parse. If the write itself fails
/// the partial file is removed before the error is returned.
pub fn write_midi(progression: Progression, path: &Path, options: &EncodeOptions) -> Result<()> {
    let bytes = encode(progression, options)?;
    write_bytes(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote MIDI file");
    Ok(())
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let written = File::create(path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()
    });
    if let Err(source) = written {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial file"),
        }
        return Err(MusicError::io(path, source));
    }
    Ok(())
}
