//! Typing-animation state machine.
//!
//! [`PlaybackSequencer`] owns the reveal of one greeting. It performs no I/O:
//! every [`tick`](PlaybackSequencer::tick) returns the [`PlaybackEvent`]s it
//! produced and an outer driver turns them into sound and sprite changes.
//!
//! ```text
//! Idle ──start(non-empty)──▶ Running ──tick (more left)──▶ Running
//!      ──start("")─────────▶ Stopped   ──tick (last char)──▶ Stopped
//! Stopped ──start(..)──▶ Running | Stopped
//! ```
//!
//! The tick that reveals the final character also stops the sequencer, so
//! a text of `n` characters is fully shown and stopped after exactly `n`
//! ticks. Sprite parity is taken from the revealed length *after* the
//! increment: even → [`MouthState::Open`], odd → [`MouthState::Closed`].

// ---------------------------------------------------------------------------
// PlaybackPhase
// ---------------------------------------------------------------------------

/// Lifecycle phase of a [`PlaybackSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    /// No text has been started yet.
    #[default]
    Idle,
    /// Characters are still being revealed.
    Running,
    /// Everything is revealed; ticks are ignored.
    Stopped,
}

impl PlaybackPhase {
    /// Short label for logs and the debug overlay.
    pub fn label(&self) -> &'static str {
        match self {
            PlaybackPhase::Idle => "Idle",
            PlaybackPhase::Running => "Running",
            PlaybackPhase::Stopped => "Stopped",
        }
    }
}

// ---------------------------------------------------------------------------
// MouthState / PlaybackEvent
// ---------------------------------------------------------------------------

/// Which of the two character images should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouthState {
    #[default]
    Closed,
    Open,
}

impl MouthState {
    /// Parity rule: even revealed length opens the mouth.
    pub fn for_revealed_len(len: usize) -> Self {
        if len % 2 == 0 {
            MouthState::Open
        } else {
            MouthState::Closed
        }
    }
}

/// Side effects requested by one sequencer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// One more character became visible.
    Reveal(char),
    /// Play one short typing cue (fire-and-forget, overlapping allowed).
    AudioCue,
    /// Show the given sprite image.
    Parity(MouthState),
    /// Stop every cue still playing. Emitted once per playback.
    SilenceAll,
}

// ---------------------------------------------------------------------------
// PlaybackSequencer
// ---------------------------------------------------------------------------

/// Reveals a fixed string one character per tick.
#[derive(Debug, Default)]
pub struct PlaybackSequencer {
    chars: Vec<char>,
    revealed: String,
    index: usize,
    phase: PlaybackPhase,
}

impl PlaybackSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset and begin revealing `text`.
    ///
    /// Empty text goes straight to [`PlaybackPhase::Stopped`] without
    /// producing any event.
    pub fn start(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.revealed = String::with_capacity(text.len());
        self.index = 0;
        self.phase = if self.chars.is_empty() {
            PlaybackPhase::Stopped
        } else {
            PlaybackPhase::Running
        };
    }

    /// Advance by one character. No-op unless running.
    pub fn tick(&mut self) -> Vec<PlaybackEvent> {
        if self.phase != PlaybackPhase::Running {
            return Vec::new();
        }

        let ch = self.chars[self.index];
        self.revealed.push(ch);
        self.index += 1;

        let mut events = vec![
            PlaybackEvent::Reveal(ch),
            PlaybackEvent::AudioCue,
            PlaybackEvent::Parity(MouthState::for_revealed_len(self.index)),
        ];

        if self.index == self.chars.len() {
            self.phase = PlaybackPhase::Stopped;
            events.push(PlaybackEvent::SilenceAll);
        }
        events
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == PlaybackPhase::Running
    }

    /// Text shown so far.
    pub fn revealed(&self) -> &str {
        &self.revealed
    }

    /// Number of characters shown so far.
    pub fn revealed_len(&self) -> usize {
        self.index
    }

    /// Length of the whole text, in characters.
    pub fn total_len(&self) -> usize {
        self.chars.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(seq: &mut PlaybackSequencer, ticks: usize) -> Vec<PlaybackEvent> {
        (0..ticks).flat_map(|_| seq.tick()).collect()
    }

    #[test]
    fn new_sequencer_is_idle_and_ignores_ticks() {
        let mut seq = PlaybackSequencer::new();
        assert_eq!(seq.phase(), PlaybackPhase::Idle);
        assert!(seq.tick().is_empty());
        assert_eq!(seq.revealed(), "");
    }

    #[test]
    fn len_ticks_reveal_everything_and_stop() {
        for text in ["a", "Hi!", "Good morning, Alice!", "Доброе утро 🌅"] {
            let mut seq = PlaybackSequencer::new();
            seq.start(text);
            run_to_end(&mut seq, text.chars().count());

            assert_eq!(seq.phase(), PlaybackPhase::Stopped, "text {text:?}");
            assert_eq!(seq.revealed(), text);
            assert_eq!(seq.revealed_len(), seq.total_len());
        }
    }

    #[test]
    fn empty_text_stops_immediately_without_events() {
        let mut seq = PlaybackSequencer::new();
        seq.start("");

        assert_eq!(seq.phase(), PlaybackPhase::Stopped);
        assert_eq!(seq.revealed(), "");
        assert!(seq.tick().is_empty());
    }

    #[test]
    fn ticks_after_stop_are_no_ops() {
        let mut seq = PlaybackSequencer::new();
        seq.start("ok");
        run_to_end(&mut seq, 2);

        for _ in 0..10 {
            assert!(seq.tick().is_empty());
        }
        assert_eq!(seq.revealed(), "ok");
        assert_eq!(seq.phase(), PlaybackPhase::Stopped);
    }

    #[test]
    fn each_advancing_tick_emits_one_cue_and_one_parity() {
        let mut seq = PlaybackSequencer::new();
        seq.start("abcde");

        for n in 1..=5 {
            let events = seq.tick();
            let cues = events.iter().filter(|e| **e == PlaybackEvent::AudioCue).count();
            let parities: Vec<_> = events
                .iter()
                .filter_map(|e| match e {
                    PlaybackEvent::Parity(m) => Some(*m),
                    _ => None,
                })
                .collect();

            assert_eq!(cues, 1);
            assert_eq!(parities, vec![MouthState::for_revealed_len(n)]);
        }
    }

    #[test]
    fn parity_alternates_with_revealed_length() {
        assert_eq!(MouthState::for_revealed_len(0), MouthState::Open);
        assert_eq!(MouthState::for_revealed_len(1), MouthState::Closed);
        assert_eq!(MouthState::for_revealed_len(2), MouthState::Open);
        assert_eq!(MouthState::for_revealed_len(7), MouthState::Closed);
    }

    #[test]
    fn silence_is_emitted_exactly_once_on_the_last_tick() {
        let mut seq = PlaybackSequencer::new();
        seq.start("Hi!");
        let events = run_to_end(&mut seq, 8);

        let silences = events
            .iter()
            .filter(|e| **e == PlaybackEvent::SilenceAll)
            .count();
        assert_eq!(silences, 1);
        assert_eq!(events.last(), Some(&PlaybackEvent::SilenceAll));
    }

    #[test]
    fn hi_scenario() {
        let mut seq = PlaybackSequencer::new();
        seq.start("Hi!");

        assert_eq!(
            seq.tick(),
            vec![
                PlaybackEvent::Reveal('H'),
                PlaybackEvent::AudioCue,
                PlaybackEvent::Parity(MouthState::Closed),
            ]
        );
        seq.tick();
        seq.tick();
        seq.tick();
        assert_eq!(seq.revealed(), "Hi!");
        assert_eq!(seq.phase(), PlaybackPhase::Stopped);

        assert!(seq.tick().is_empty());
        assert_eq!(seq.revealed(), "Hi!");
    }

    #[test]
    fn restart_after_stop_reenters_running() {
        let mut seq = PlaybackSequencer::new();
        seq.start("x");
        seq.tick();
        assert_eq!(seq.phase(), PlaybackPhase::Stopped);

        seq.start("yz");
        assert_eq!(seq.phase(), PlaybackPhase::Running);
        assert_eq!(seq.revealed(), "");

        seq.start("");
        assert_eq!(seq.phase(), PlaybackPhase::Stopped);
    }

    #[test]
    fn revealed_length_never_decreases_while_running() {
        let mut seq = PlaybackSequencer::new();
        seq.start("monotonic");
        let mut last = 0;
        while seq.is_running() {
            seq.tick();
            assert!(seq.revealed_len() > last);
            last = seq.revealed_len();
        }
    }

    #[test]
    fn phase_labels() {
        assert_eq!(PlaybackPhase::Idle.label(), "Idle");
        assert_eq!(PlaybackPhase::Running.label(), "Running");
        assert_eq!(PlaybackPhase::Stopped.label(), "Stopped");
    }
}
