use async_trait::async_trait;
use tracing::debug;

use super::{AlertProcessor, ProcessingError};
use crate::sources::webhook::AlertManagerWebhook;

/// Accepts every message without acting on it.
#[derive(Debug, Default, Clone)]
pub struct NoopProcessor;

impl NoopProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertProcessor for NoopProcessor {
    async fn process(&self, message: AlertManagerWebhook) -> Result<(), ProcessingError> {
        debug!(
            receiver = %message.receiver,
            group_key = %message.group_key,
            firing = message.firing().count(),
            resolved = message.resolved().count(),
            "Ignoring alert message"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::webhook::decode;

    #[tokio::test]
    async fn accepts_everything() {
        let processor = NoopProcessor::new();
        let empty = decode(br#"{"status":"resolved","alerts":[]}"#).unwrap();
        assert!(processor.process(empty).await.is_ok());
    }
}
