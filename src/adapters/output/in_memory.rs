//! In-memory output for tests and local runs.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::foundation::DomainError;
use crate::ports::OutputHandler;

/// Captures outgoing messages instead of delivering them.
///
/// # Example
///
/// ```ignore
/// let output = InMemoryOutput::new();
/// output.send_message("Olá!").await?;
/// assert_eq!(output.messages().await, vec!["Olá!"]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryOutput {
    sent: Mutex<Vec<String>>,
    failures: Mutex<usize>,
}

impl InMemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns all delivered messages.
    pub async fn messages(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }

    pub async fn last_message(&self) -> Option<String> {
        self.sent.lock().await.last().cloned()
    }

    /// Returns delivered messages and forgets them.
    pub async fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut *self.sent.lock().await)
    }

    /// Makes the next `count` sends fail with `DeliveryFailed`.
    pub async fn fail_next(&self, count: usize) {
        *self.failures.lock().await = count;
    }
}

#[async_trait]
impl OutputHandler for InMemoryOutput {
    async fn send_message(&self, text: &str) -> Result<(), DomainError> {
        {
            let mut failures = self.failures.lock().await;
            if *failures > 0 {
                *failures -= 1;
                return Err(DomainError::delivery("simulated delivery failure"));
            }
        }
        self.sent.lock().await.push(text.to_string());
        Ok(())
    }
}
