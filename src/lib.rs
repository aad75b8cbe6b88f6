//! Morning greeting widget.
//!
//! A frameless overlay that fetches a one-line AI greeting, types it out
//! with a per-character sound and a talking character, and shows a live
//! clock.
//!
//! * [`config`]   — persisted settings record and platform paths
//! * [`greeting`] — prompt building and the streaming chat-completions client
//! * [`playback`] — typing-animation state machine and its driver
//! * [`audio`]    — typing cues and background music
//! * [`sprite`]   — character images and user overrides
//! * [`clock`]    — timestamp and day-period icon
//! * [`app`]      — the egui/eframe window

pub mod app;
pub mod audio;
pub mod clock;
pub mod config;
pub mod greeting;
pub mod playback;
pub mod sprite;
