use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::services::response_generator::{Mode, ResponseGenerator};

#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    #[error("Generation failed: {0}")]
    Generation(String),
    #[error("Responder unavailable: {0}")]
    Unavailable(String),
}

/// Produces the assistant side of an exchange.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, input: &str, mode: Mode) -> Result<String, ResponderError>;
}

/// Local stand-in for the assistant backend: waits a fixed delay, then
/// generates from the phrase pools.
pub struct MockResponder {
    generator: Mutex<ResponseGenerator>,
    delay: Duration,
}

impl MockResponder {
    pub fn new(generator: ResponseGenerator, delay: Duration) -> Self {
        Self {
            generator: Mutex::new(generator),
            delay,
        }
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, input: &str, mode: Mode) -> Result<String, ResponderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut generator = self
            .generator
            .lock()
            .map_err(|e| ResponderError::Unavailable(e.to_string()))?;
        let reply = generator.respond(input, mode);

        tracing::debug!(
            "Generated {:?} reply ({} chars) for input of {} chars",
            mode,
            reply.chars().count(),
            input.chars().count()
        );
        Ok(reply)
    }
}
