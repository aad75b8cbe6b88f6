//! Greeting playback: the typing animation and what drives it.
//!
//! # Architecture
//!
//! ```text
//! egui update() ──Instant──▶ PlaybackDriver::advance()
//!                                  │
//!                                  ├─ TickTimer::poll()      → n due ticks (50 ms)
//!                                  ├─ PlaybackSequencer::tick() × n
//!                                  │        └─ Vec<PlaybackEvent>
//!                                  ├─ AudioCue / SilenceAll  → CuePlayer
//!                                  └─ Parity                 → SpriteView
//! ```
//!
//! The sequencer is a pure state machine and can be exercised without any
//! clock, audio device or window.

pub mod driver;
pub mod sequencer;
pub mod timer;

pub use driver::PlaybackDriver;
pub use sequencer::{MouthState, PlaybackEvent, PlaybackPhase, PlaybackSequencer};
pub use timer::{TickTimer, CLOCK_PERIOD, MAX_CATCH_UP, REVEAL_PERIOD};
