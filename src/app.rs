//! Morning greeting widget — egui/eframe application.
//!
//! # Architecture
//!
//! [`GreetingApp`] is the top-level [`eframe::App`]. It owns the
//! [`PlaybackDriver`], the [`ClockWidget`] and two channel endpoints:
//!
//! * `command_tx` — sends [`GreetingCommand`] to the greeting worker.
//! * `result_rx`  — receives [`GreetingResult`] back from it.
//!
//! # Screens
//!
//! | Screen | Visual |
//! |--------|--------|
//! | `Setup` | token / name / language form, optional error notice |
//! | `Loading` | spinner while the greeting is requested |
//! | `Greeting` | clock row, typed greeting, talking character, close button |

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use eframe::egui;
use tokio::sync::mpsc;

use crate::audio::CuePlayer;
use crate::clock::{ClockWidget, DayPeriod};
use crate::config::{AppPaths, GreetingConfig, Language};
use crate::playback::PlaybackDriver;
use crate::sprite::{CharacterAssets, CharacterSlot, SPRITE_SIZE};

// ---------------------------------------------------------------------------
// Worker message types
// ---------------------------------------------------------------------------

/// Commands sent from the UI thread to the greeting worker.
#[derive(Debug, Clone)]
pub enum GreetingCommand {
    /// Request one greeting using this settings snapshot.
    Generate(GreetingConfig),
}

/// Outcomes delivered from the worker to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum GreetingResult {
    Ready { text: String },
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// What the window is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Credentials are missing or the last request failed.
    Setup { notice: Option<String> },
    /// Waiting for the greeting worker.
    Loading,
    /// The greeting is being (or has been) typed out.
    Greeting,
}

impl Screen {
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Setup { .. } => "Setup",
            Screen::Loading => "Loading",
            Screen::Greeting => "Greeting",
        }
    }

    /// Inner window size for this screen.
    pub fn window_size(&self) -> egui::Vec2 {
        match self {
            Screen::Setup { .. } => egui::vec2(400.0, 230.0),
            Screen::Loading | Screen::Greeting => egui::vec2(800.0, 400.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Textures
// ---------------------------------------------------------------------------

/// GPU textures for the character and clock icons; missing files are `None`.
struct Textures {
    closed: Option<egui::TextureHandle>,
    open: Option<egui::TextureHandle>,
    icons: HashMap<&'static str, egui::TextureHandle>,
}

impl Textures {
    fn load(ctx: &egui::Context, paths: &AppPaths) -> Self {
        let assets = CharacterAssets::resolve(paths);
        let icons = [DayPeriod::Sunrise, DayPeriod::Sun, DayPeriod::Moon]
            .into_iter()
            .filter_map(|p| {
                let path = paths.bundled_images_dir().join(p.icon_file());
                load_texture(ctx, p.icon_name(), &path).map(|t| (p.icon_name(), t))
            })
            .collect();

        Self {
            closed: load_texture(ctx, "cl_char", assets.path(CharacterSlot::Closed)),
            open: load_texture(ctx, "op_char", assets.path(CharacterSlot::Open)),
            icons,
        }
    }

    fn character(&self, slot: CharacterSlot) -> Option<&egui::TextureHandle> {
        match slot {
            CharacterSlot::Closed => self.closed.as_ref(),
            CharacterSlot::Open => self.open.as_ref(),
        }
    }
}

fn load_texture(ctx: &egui::Context, name: &str, path: &Path) -> Option<egui::TextureHandle> {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
            Some(ctx.load_texture(name, color, egui::TextureOptions::LINEAR))
        }
        Err(e) => {
            log::warn!("Image {} unavailable: {e}", path.display());
            None
        }
    }
}

// ---------------------------------------------------------------------------
// GreetingApp
// ---------------------------------------------------------------------------

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x2b, 0x2b, 0x2b);
const CLOCK_COLOR: egui::Color32 = egui::Color32::from_rgb(0x88, 0x88, 0x88);
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x00, 0xff, 0x00);
const NOTICE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);

/// eframe application — the floating morning greeting.
pub struct GreetingApp {
    /// Current screen.
    pub screen: Screen,
    /// Settings record; replaced only by the setup form.
    pub config: GreetingConfig,
    paths: AppPaths,

    // ── Setup form ───────────────────────────────────────────────────────
    token_input: String,
    name_input: String,
    language_input: Language,

    // ── Greeting ─────────────────────────────────────────────────────────
    driver: PlaybackDriver,
    clock: ClockWidget,
    textures: Option<Textures>,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<GreetingCommand>,
    result_rx: mpsc::Receiver<GreetingResult>,
}

impl GreetingApp {
    /// Create the app and, when the settings are complete, request the
    /// greeting straight away.
    pub fn new(
        config: GreetingConfig,
        paths: AppPaths,
        audio: Box<dyn CuePlayer>,
        command_tx: mpsc::Sender<GreetingCommand>,
        result_rx: mpsc::Receiver<GreetingResult>,
    ) -> Self {
        let now = Instant::now();
        let mut app = Self {
            screen: Screen::Setup { notice: None },
            token_input: config.token.clone(),
            name_input: config.name.clone(),
            language_input: config.language,
            config,
            paths,
            driver: PlaybackDriver::new(audio, now),
            clock: ClockWidget::new(now),
            textures: None,
            command_tx,
            result_rx,
        };

        if app.config.is_complete() {
            app.request_greeting();
        } else {
            log::info!("Settings incomplete; showing setup");
        }
        app
    }

    /// Text typed out so far.
    pub fn revealed(&self) -> &str {
        self.driver.revealed()
    }

    // ── Flow ─────────────────────────────────────────────────────────────

    fn request_greeting(&mut self) {
        match self
            .command_tx
            .try_send(GreetingCommand::Generate(self.config.clone()))
        {
            Ok(()) => self.screen = Screen::Loading,
            Err(e) => {
                log::warn!("Greeting worker unavailable: {e}");
                self.screen = Screen::Setup {
                    notice: Some("Greeting service is not running".into()),
                };
            }
        }
    }

    /// Validate and persist the setup form, then request a greeting.
    pub fn submit_setup(&mut self) {
        let token = self.token_input.trim();
        let name = self.name_input.trim();
        if token.is_empty() || name.is_empty() {
            self.screen = Screen::Setup {
                notice: Some("Please enter both a token and a name".into()),
            };
            return;
        }

        let updated = GreetingConfig {
            token: token.to_string(),
            name: name.to_string(),
            language: self.language_input,
            ..self.config.clone()
        }
        .normalized();

        if let Err(e) = updated.save_to(&self.paths.settings_file) {
            log::warn!("Failed to save settings: {e}");
            self.screen = Screen::Setup {
                notice: Some(format!("Could not save settings: {e}")),
            };
            return;
        }

        log::info!("Settings saved; requesting greeting");
        self.config = updated;
        self.request_greeting();
    }

    /// Apply one worker outcome.
    pub fn handle_result(&mut self, result: GreetingResult, now: Instant) {
        match result {
            GreetingResult::Ready { text } => {
                self.driver.start(&text, now);
                self.screen = Screen::Greeting;
            }
            GreetingResult::Failed { message } => {
                log::warn!("Greeting failed: {message}");
                self.screen = Screen::Setup {
                    notice: Some(message),
                };
            }
        }
    }

    /// Drain all pending worker results (non-blocking).
    fn poll_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_result(result, Instant::now());
        }
    }

    // ── Screens ──────────────────────────────────────────────────────────

    fn draw_setup(&mut self, ui: &mut egui::Ui, notice: Option<&str>) {
        ui.heading("Setup");
        ui.add_space(6.0);

        if let Some(msg) = notice {
            ui.label(egui::RichText::new(msg).color(NOTICE_COLOR).size(12.0));
            ui.add_space(4.0);
        }

        ui.add(
            egui::TextEdit::singleline(&mut self.token_input)
                .password(true)
                .hint_text("API token")
                .desired_width(f32::INFINITY),
        );
        ui.add(
            egui::TextEdit::singleline(&mut self.name_input)
                .hint_text("What is your name?")
                .desired_width(f32::INFINITY),
        );

        egui::ComboBox::from_label("Language")
            .selected_text(self.language_input.label())
            .show_ui(ui, |ui| {
                for lang in Language::ALL {
                    ui.selectable_value(&mut self.language_input, lang, lang.label());
                }
            });

        ui.add_space(8.0);
        if ui.button("Save").clicked() {
            self.submit_setup();
        }
    }

    fn draw_loading(&self, ui: &mut egui::Ui) {
        ui.centered_and_justified(|ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(
                    egui::RichText::new("Preparing your greeting...")
                        .color(CLOCK_COLOR)
                        .size(14.0),
                );
            });
        });
    }

    fn draw_clock_row(&self, ui: &mut egui::Ui) {
        let period = self.clock.period();
        ui.horizontal(|ui| {
            match self
                .textures
                .as_ref()
                .and_then(|t| t.icons.get(period.icon_name()))
            {
                Some(icon) => {
                    ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
                        icon.id(),
                        egui::vec2(20.0, 20.0),
                    )));
                }
                None => {
                    ui.label(egui::RichText::new(period.glyph()).size(14.0));
                }
            }
            ui.label(
                egui::RichText::new(self.clock.label())
                    .color(CLOCK_COLOR)
                    .size(12.0),
            );
        });
    }

    fn draw_greeting(&self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let sprite_side = SPRITE_SIZE as f32;
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.set_width(ui.available_width() - sprite_side);
                self.draw_clock_row(ui);
                ui.add_space(24.0);
                ui.label(
                    egui::RichText::new(self.driver.revealed())
                        .color(egui::Color32::WHITE)
                        .size(18.0),
                );
                ui.add_space(24.0);
                if ui
                    .add(
                        egui::Button::new(egui::RichText::new("Close").color(ACCENT).size(16.0))
                            .frame(false),
                    )
                    .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            let slot = self.driver.sprite().shown();
            if let Some(tex) = self.textures.as_ref().and_then(|t| t.character(slot)) {
                ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
                    tex.id(),
                    egui::vec2(sprite_side, sprite_side),
                )));
            }
        });
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for GreetingApp {
    /// Called every frame by eframe. Polls the worker, advances timers, then
    /// renders the current screen.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.textures.is_none() {
            self.textures = Some(Textures::load(ctx, &self.paths));
        }

        self.poll_results();

        let now = Instant::now();
        self.driver.advance(now);
        self.clock.poll(now);

        // --- Schedule the next repaint -----------------------------------
        let clock_due = self.clock.timer().until_next(now);
        let next = match self.driver.repaint_after(now) {
            Some(reveal_due) => reveal_due.min(clock_due),
            None => clock_due,
        };
        ctx.request_repaint_after(next);

        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(self.screen.window_size()));

        let frame = egui::Frame::new()
            .fill(BACKGROUND)
            .corner_radius(egui::CornerRadius::same(30))
            .inner_margin(egui::Margin::same(20));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let screen = self.screen.clone();
            match screen {
                Screen::Setup { notice } => self.draw_setup(ui, notice.as_deref()),
                Screen::Loading => self.draw_loading(ui),
                Screen::Greeting => self.draw_greeting(ui, ctx),
            }
        });
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Greeting widget closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentCuePlayer;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    struct Harness {
        _dir: TempDir,
        app: GreetingApp,
        commands: mpsc::Receiver<GreetingCommand>,
        _results: mpsc::Sender<GreetingResult>,
    }

    fn harness(config: GreetingConfig) -> Harness {
        let dir = tempdir().expect("temp dir");
        let paths = AppPaths::with_roots(dir.path().join("config"), dir.path().join("data"));
        let (command_tx, commands) = mpsc::channel(4);
        let (results, result_rx) = mpsc::channel(4);
        let app = GreetingApp::new(config, paths, Box::new(SilentCuePlayer), command_tx, result_rx);
        Harness {
            _dir: dir,
            app,
            commands,
            _results: results,
        }
    }

    fn complete() -> GreetingConfig {
        GreetingConfig {
            token: "gsk".into(),
            name: "Alice".into(),
            ..GreetingConfig::default()
        }
    }

    #[test]
    fn incomplete_settings_start_on_setup_without_request() {
        let mut h = harness(GreetingConfig::default());

        assert_eq!(h.app.screen, Screen::Setup { notice: None });
        assert!(h.commands.try_recv().is_err());
    }

    #[test]
    fn complete_settings_request_greeting_immediately() {
        let mut h = harness(complete());

        assert_eq!(h.app.screen, Screen::Loading);
        let GreetingCommand::Generate(cfg) = h.commands.try_recv().expect("command");
        assert_eq!(cfg.name, "Alice");
    }

    #[test]
    fn setup_rejects_blank_fields() {
        let mut h = harness(GreetingConfig::default());
        h.app.token_input = "tok".into();
        h.app.name_input = "   ".into();

        h.app.submit_setup();

        assert!(matches!(h.app.screen, Screen::Setup { notice: Some(_) }));
        assert!(!h.app.paths.settings_file.exists());
        assert!(h.commands.try_recv().is_err());
    }

    #[test]
    fn setup_saves_and_requests() {
        let mut h = harness(GreetingConfig::default());
        h.app.token_input = " tok ".into();
        h.app.name_input = "Bob".into();
        h.app.language_input = Language::Russian;

        h.app.submit_setup();

        assert_eq!(h.app.screen, Screen::Loading);
        let saved = GreetingConfig::try_load_from(&h.app.paths.settings_file).expect("saved");
        assert_eq!(saved.token, "tok");
        assert_eq!(saved.name, "Bob");
        assert_eq!(saved.language, Language::Russian);
        assert!(h.commands.try_recv().is_ok());
    }

    #[test]
    fn ready_result_starts_playback() {
        let mut h = harness(complete());
        let t0 = Instant::now();

        h.app.handle_result(GreetingResult::Ready { text: "Hi!".into() }, t0);
        assert_eq!(h.app.screen, Screen::Greeting);

        h.app.driver.advance(t0 + Duration::from_millis(200));
        assert_eq!(h.app.revealed(), "Hi!");
    }

    #[test]
    fn failed_result_falls_back_to_setup_with_message() {
        let mut h = harness(complete());

        h.app.handle_result(
            GreetingResult::Failed {
                message: "API returned 401: invalid key".into(),
            },
            Instant::now(),
        );

        assert_eq!(
            h.app.screen,
            Screen::Setup {
                notice: Some("API returned 401: invalid key".into())
            }
        );
    }

    #[test]
    fn closed_worker_channel_is_reported_on_setup() {
        let dir = tempdir().expect("temp dir");
        let paths = AppPaths::with_roots(dir.path().join("config"), dir.path().join("data"));
        let (command_tx, commands) = mpsc::channel(1);
        drop(commands);
        let (_results, result_rx) = mpsc::channel(1);

        let app = GreetingApp::new(complete(), paths, Box::new(SilentCuePlayer), command_tx, result_rx);

        assert!(matches!(app.screen, Screen::Setup { notice: Some(_) }));
    }

    #[test]
    fn screen_labels_and_sizes() {
        assert_eq!(Screen::Loading.label(), "Loading");
        assert_eq!(Screen::Greeting.window_size(), egui::vec2(800.0, 400.0));
        assert_eq!(
            Screen::Setup { notice: None }.window_size(),
            egui::vec2(400.0, 230.0)
        );
    }
}
