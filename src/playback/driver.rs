//! Binds the pure [`PlaybackSequencer`] to a clock and its side effects.
//!
//! Each frame the UI calls [`PlaybackDriver::advance`]. Due reveal ticks are
//! run strictly one after another and every event is dispatched before the
//! next tick starts: cues go to the [`CuePlayer`], parity events to the
//! [`SpriteView`].
//!
//! The final silence is held back by one reveal period so the cue for the
//! last character gets the same time to sound as every other cue.

use std::time::{Duration, Instant};

use crate::audio::CuePlayer;
use crate::playback::sequencer::{PlaybackEvent, PlaybackPhase, PlaybackSequencer};
use crate::playback::timer::{TickTimer, REVEAL_PERIOD};
use crate::sprite::SpriteView;

pub struct PlaybackDriver {
    sequencer: PlaybackSequencer,
    timer: TickTimer,
    audio: Box<dyn CuePlayer>,
    sprite: SpriteView,
    /// Set when the sequencer finished; cleared by the next due tick.
    silence_pending: bool,
}

impl PlaybackDriver {
    pub fn new(audio: Box<dyn CuePlayer>, now: Instant) -> Self {
        Self {
            sequencer: PlaybackSequencer::new(),
            timer: TickTimer::new(REVEAL_PERIOD, now),
            audio,
            sprite: SpriteView::new(),
            silence_pending: false,
        }
    }

    /// Begin revealing `text`; the first character appears one period after `now`.
    pub fn start(&mut self, text: &str, now: Instant) {
        log::info!("Playing greeting ({} chars)", text.chars().count());
        self.flush_silence();
        self.sequencer.start(text);
        self.timer = TickTimer::new(REVEAL_PERIOD, now);
        self.sprite = SpriteView::new();
    }

    /// Run every tick due at `now`; returns how many advanced the text.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let due = self.timer.poll(now);
        let mut advanced = 0;
        for _ in 0..due {
            if self.silence_pending {
                self.flush_silence();
                break;
            }
            let events = self.sequencer.tick();
            if events.is_empty() {
                break;
            }
            advanced += 1;
            self.dispatch(events);
        }
        advanced
    }

    fn dispatch(&mut self, events: Vec<PlaybackEvent>) {
        for event in events {
            match event {
                PlaybackEvent::Reveal(_) => {}
                PlaybackEvent::AudioCue => self.audio.play_cue(),
                PlaybackEvent::Parity(state) => {
                    self.sprite.on_parity(state);
                }
                PlaybackEvent::SilenceAll => {
                    log::debug!("Greeting fully revealed");
                    self.silence_pending = true;
                }
            }
        }
    }

    fn flush_silence(&mut self) {
        if std::mem::take(&mut self.silence_pending) {
            self.audio.silence_all();
        }
    }

    /// Delay before the next repaint is needed, or `None` once stopped and
    /// silenced.
    pub fn repaint_after(&self, now: Instant) -> Option<Duration> {
        (self.sequencer.is_running() || self.silence_pending)
            .then(|| self.timer.until_next(now))
    }

    pub fn revealed(&self) -> &str {
        self.sequencer.revealed()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.sequencer.phase()
    }

    pub fn sprite(&self) -> SpriteView {
        self.sprite
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
