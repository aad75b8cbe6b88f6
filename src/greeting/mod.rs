//! Greeting generation for the morning widget.
//!
//! This module provides:
//! * [`GreetingGenerator`] — async trait implemented by greeting backends.
//! * [`ApiGreetingService`] — streaming OpenAI-compatible client (Groq by default).
//! * [`GreetingStream`] — lazy sequence of text deltas from one response.
//! * [`PromptBuilder`] — fills the per-language prompt template.
//! * [`SseDecoder`] — incremental Server-Sent Events decoder.
//! * [`GreetingError`] — error variants for greeting generation.
//! * [`run_greeting_worker`] — tokio task bridging the UI and the generator.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use good_morning::config::GreetingConfig;
//! use good_morning::greeting::{ApiGreetingService, GreetingGenerator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GreetingConfig::load();
//!     let service = ApiGreetingService::new();
//!     match service.generate(&config).await {
//!         Ok(text) => println!("{text}"),
//!         Err(e) => eprintln!("no greeting today: {e}"),
//!     }
//! }
//! ```

pub mod prompt;
pub mod service;
pub mod stream;
pub mod worker;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use prompt::PromptBuilder;
pub use service::{ApiGreetingService, GreetingError, GreetingGenerator, GreetingStream};
pub use stream::{single_line, SseDecoder};
pub use worker::run_greeting_worker;
