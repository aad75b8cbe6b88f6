//! Sound output for the typing animation.
//!
//! The sequencer only asks for two things: "play one typing cue" and
//! "silence every cue". [`CuePlayer`] is that seam. [`AudioOutput`] backs it
//! with `rodio`; [`SilentCuePlayer`] stands in when no output device or cue
//! clip is available so the widget still runs muted.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use good_morning::audio::{AudioOutput, CuePlayer};
//!
//! let mut out = AudioOutput::open("data/audio/typing.mp3", 0.2).unwrap();
//! out.play_cue();
//! out.play_cue(); // overlaps the first one
//! out.silence_all();
//! ```

pub mod output;

pub use output::{AudioError, AudioOutput, CUE_VOLUME};

// ---------------------------------------------------------------------------
// CuePlayer
// ---------------------------------------------------------------------------

/// Fire-and-forget cue playback. Implementations never block and never
/// report failures back to the caller.
pub trait CuePlayer {
    /// Start one cue; earlier cues keep playing.
    fn play_cue(&mut self);
    /// Stop every cue that is still playing.
    fn silence_all(&mut self);
}

/// Muted fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play_cue(&mut self) {}
    fn silence_all(&mut self) {}
}
