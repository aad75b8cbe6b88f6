//! Application entry point — morning greeting widget.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`GreetingConfig`] from disk (defaults on first run or bad file).
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Spawn the greeting worker around [`ApiGreetingService`].
//! 5. Open audio output (typing cue + background music), or run muted.
//! 6. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use good_morning::{
    app::{GreetingApp, GreetingCommand, GreetingResult},
    audio::{AudioOutput, CuePlayer, SilentCuePlayer, CUE_VOLUME},
    config::{AppPaths, GreetingConfig},
    greeting::{run_greeting_worker, ApiGreetingService, GreetingGenerator},
};
use tokio::sync::mpsc;

const CUE_FILE: &str = "typing.mp3";
const MUSIC_FILE: &str = "music.mp3";

/// Typing cues plus looping music, or a muted stand-in when either the
/// device or the cue clip is missing.
fn open_audio(paths: &AppPaths) -> Box<dyn CuePlayer> {
    let audio_dir = paths.bundled_audio_dir();
    match AudioOutput::open(audio_dir.join(CUE_FILE), CUE_VOLUME) {
        Ok(mut output) => {
            if let Err(e) = output.start_music(audio_dir.join(MUSIC_FILE)) {
                log::warn!("Background music unavailable: {e}");
            }
            Box::new(output)
        }
        Err(e) => {
            log::warn!("Audio unavailable ({e}); running muted");
            Box::new(SilentCuePlayer)
        }
    }
}

fn native_options() -> eframe::NativeOptions {
    let vp = egui::ViewportBuilder::default()
        .with_title("GoodMorning")
        .with_decorations(false)
        .with_transparent(true)
        .with_always_on_top()
        .with_inner_size([800.0, 400.0])
        .with_resizable(false);

    eframe::NativeOptions {
        viewport: vp,
        centered: true,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("GoodMorning starting up");

    // 2. Configuration
    let paths = AppPaths::new();
    let config = GreetingConfig::load_from(&paths.settings_file);

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Greeting worker
    let generator: Arc<dyn GreetingGenerator> = Arc::new(ApiGreetingService::new());
    let (command_tx, command_rx) = mpsc::channel::<GreetingCommand>(4);
    let (result_tx, result_rx) = mpsc::channel::<GreetingResult>(4);
    rt.spawn(run_greeting_worker(generator, command_rx, result_tx));

    // 5. Audio
    let audio = open_audio(&paths);

    // 6. Window (blocks until closed)
    let app = GreetingApp::new(config, paths, audio, command_tx, result_rx);
    eframe::run_native(
        "GoodMorning",
        native_options(),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
