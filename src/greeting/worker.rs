//! Background task that serves greeting requests from the UI.
//!
//! Runs on the tokio runtime; one [`GreetingCommand`] in, one
//! [`GreetingResult`] out. There is no retry: a failure is reported once and
//! the UI decides what to do next.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::{GreetingCommand, GreetingResult};
use crate::greeting::GreetingGenerator;

/// Serve commands until the UI drops its sender.
pub async fn run_greeting_worker(
    generator: Arc<dyn GreetingGenerator>,
    mut command_rx: mpsc::Receiver<GreetingCommand>,
    result_tx: mpsc::Sender<GreetingResult>,
) {
    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            GreetingCommand::Generate(config) => {
                let result = match generator.generate(&config).await {
                    Ok(text) => GreetingResult::Ready { text },
                    Err(e) => GreetingResult::Failed {
                        message: e.to_string(),
                    },
                };
                if result_tx.send(result).await.is_err() {
                    log::debug!("UI gone; greeting worker exiting");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GreetingConfig;
    use crate::greeting::GreetingError;
    use async_trait::async_trait;

    /// Greets whoever is configured.
    struct Echo;

    #[async_trait]
    impl GreetingGenerator for Echo {
        async fn generate(&self, config: &GreetingConfig) -> Result<String, GreetingError> {
            Ok(format!("Good morning, {}!", config.name))
        }
    }

    /// Always rejects the token.
    struct Unauthorized;

    #[async_trait]
    impl GreetingGenerator for Unauthorized {
        async fn generate(&self, _config: &GreetingConfig) -> Result<String, GreetingError> {
            Err(GreetingError::Status {
                status: 401,
                body: "invalid api key".into(),
            })
        }
    }

    async fn round_trip(generator: Arc<dyn GreetingGenerator>) -> GreetingResult {
        let (command_tx, command_rx) = mpsc::channel(1);
        let (result_tx, mut result_rx) = mpsc::channel(1);
        let worker = tokio::spawn(run_greeting_worker(generator, command_rx, result_tx));

        let config = GreetingConfig {
            name: "Alice".into(),
            ..GreetingConfig::default()
        };
        command_tx.send(GreetingCommand::Generate(config)).await.unwrap();
        let result = result_rx.recv().await.expect("result");

        drop(command_tx);
        worker.await.unwrap();
        result
    }

    #[tokio::test]
    async fn success_is_forwarded() {
        let result = round_trip(Arc::new(Echo)).await;
        assert_eq!(
            result,
            GreetingResult::Ready {
                text: "Good morning, Alice!".into()
            }
        );
    }

    #[tokio::test]
    async fn failure_becomes_one_message() {
        let result = round_trip(Arc::new(Unauthorized)).await;
        assert_eq!(
            result,
            GreetingResult::Failed {
                message: "API returned 401: invalid api key".into()
            }
        );
    }
}
