mod noop;

use async_trait::async_trait;
use thiserror::Error;

use crate::sources::webhook::AlertManagerWebhook;

pub use noop::NoopProcessor;

/// Failure reported by an [`AlertProcessor`] for a decoded message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{cause}")]
pub struct ProcessingError {
    cause: String,
}

impl ProcessingError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }
}

/// Business logic applied to every accepted webhook delivery.
///
/// Called once per request and possibly from many requests at the same time,
/// with no ordering between deliveries. Implementations that need ordering or
/// deduplication across messages have to provide it themselves.
#[async_trait]
pub trait AlertProcessor: Send + Sync {
    async fn process(&self, message: AlertManagerWebhook) -> Result<(), ProcessingError>;
}
