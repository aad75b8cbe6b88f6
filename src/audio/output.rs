//! `rodio`-backed [`CuePlayer`].
//!
//! The cue clip is read into memory once; every cue decodes from that buffer
//! onto its own [`Sink`], which is what lets rapid ticks overlap. Finished
//! sinks are pruned on the next cue.
//!
//! The output stream handle is not `Send`, so an `AudioOutput` lives on the
//! UI thread for the life of the window.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use thiserror::Error;

use super::CuePlayer;

/// Volume applied to every typing cue.
pub const CUE_VOLUME: f32 = 0.2;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AudioError {
    /// No default output device could be opened.
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    /// A playback sink could not be created on the device.
    #[error("cannot create playback sink: {0}")]
    Stream(String),

    /// The clip is not in a supported audio format.
    #[error("cannot decode audio clip: {0}")]
    Decode(String),

    /// The clip could not be read from disk.
    #[error("cannot read audio clip: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// AudioOutput
// ---------------------------------------------------------------------------

pub struct AudioOutput {
    // Dropping the stream silences everything; keep it alive.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    cue: Arc<[u8]>,
    volume: f32,
    cues: Vec<Sink>,
    music: Option<Sink>,
}

impl AudioOutput {
    /// Open the default device and load the cue clip at `cue_path`.
    ///
    /// The clip is decoded once up front so a bad file fails here rather
    /// than silently on every tick.
    pub fn open(cue_path: impl AsRef<Path>, volume: f32) -> Result<Self, AudioError> {
        let cue: Arc<[u8]> = std::fs::read(cue_path.as_ref())?.into();
        decode(&cue)?;

        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::NoOutputDevice(e.to_string()))?;

        log::info!("Audio output ready (cue: {})", cue_path.as_ref().display());
        Ok(Self {
            _stream: stream,
            handle,
            cue,
            volume,
            cues: Vec::new(),
            music: None,
        })
    }

    /// Loop `path` in the background until the output is dropped.
    ///
    /// Music is not a cue: [`CuePlayer::silence_all`] leaves it playing.
    pub fn start_music(&mut self, path: impl AsRef<Path>) -> Result<(), AudioError> {
        let bytes: Arc<[u8]> = std::fs::read(path.as_ref())?.into();
        let source = decode(&bytes)?;
        let sink = self.new_sink()?;
        sink.append(source.repeat_infinite());
        self.music = Some(sink);
        log::info!("Background music started ({})", path.as_ref().display());
        Ok(())
    }

    /// Cues that have not finished yet.
    pub fn active_cues(&self) -> usize {
        self.cues.iter().filter(|s| !s.empty()).count()
    }

    fn new_sink(&self) -> Result<Sink, AudioError> {
        Sink::try_new(&self.handle).map_err(|e| AudioError::Stream(e.to_string()))
    }

    fn try_play_cue(&mut self) -> Result<(), AudioError> {
        self.cues.retain(|s| !s.empty());

        let sink = self.new_sink()?;
        sink.set_volume(self.volume);
        sink.append(decode(&self.cue)?);
        self.cues.push(sink);
        Ok(())
    }
}

impl CuePlayer for AudioOutput {
    fn play_cue(&mut self) {
        if let Err(e) = self.try_play_cue() {
            log::debug!("Typing cue skipped: {e}");
        }
    }

    fn silence_all(&mut self) {
        for sink in self.cues.drain(..) {
            sink.stop();
        }
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        if let Some(music) = self.music.take() {
            music.stop();
        }
    }
}

fn decode(bytes: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, AudioError> {
    Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|e| AudioError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_cue_file_is_an_io_error() {
        let dir = tempdir().expect("temp dir");
        let result = AudioOutput::open(dir.path().join("nope.mp3"), CUE_VOLUME);
        assert!(matches!(result, Err(AudioError::Io(_))));
    }

    #[test]
    fn garbage_cue_file_is_rejected_before_opening_a_device() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("cue.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let result = AudioOutput::open(&path, CUE_VOLUME);
        assert!(matches!(result, Err(AudioError::Decode(_))));
    }
}
