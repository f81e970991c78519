//! OutputHandler port - Delivers rendered text to the end user.
//!
//! Implementations wrap a messaging transport (chat API, terminal, ...).

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for outgoing messages.
#[async_trait]
pub trait OutputHandler: Send + Sync {
    /// Sends one message.
    ///
    /// # Errors
    ///
    /// `DeliveryFailed` when the transport rejects or drops the message.
    async fn send_message(&self, text: &str) -> Result<(), DomainError>;
}
