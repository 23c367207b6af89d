pub mod config;
pub mod processor;
pub mod server;
pub mod sources;

use std::net::SocketAddr;
use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

pub use processor::{AlertProcessor, NoopProcessor, ProcessingError};
pub use sources::webhook::{AlertManagerAlert, AlertManagerWebhook, AlertStatus};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read request body: {0}")]
    Transport(String),
    #[error("Failed to decode Alertmanager message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to process alert: {0}")]
    Processing(#[from] ProcessingError),
    #[error("Failed to bind listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
    #[error("Server did not drain within {0:?}")]
    DrainTimeout(Duration),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Status returned to the alerting manager for request-scoped failures.
    ///
    /// Processing failures are reported as `400` together with decode failures;
    /// the processor contract does not distinguish caller faults from
    /// downstream ones.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Decode(_) | Error::Processing(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Process exit code for lifecycle failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Bind { .. } => 2,
            Error::Server(_) => 3,
            Error::DrainTimeout(_) => 4,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_map_to_status_codes() {
        let decode = serde_json::from_str::<AlertManagerWebhook>("nope").unwrap_err();
        assert_eq!(Error::from(decode).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::from(ProcessingError::new("rejected")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Transport("connection reset".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn lifecycle_errors_have_distinct_exit_codes() {
        let bind = Error::Bind {
            addr: "127.0.0.1:1236".parse().unwrap(),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        let server = Error::Server(std::io::Error::other("accept failed"));
        let drain = Error::DrainTimeout(Duration::from_secs(5));
        let config = Error::Config("bad port".into());

        let codes = [
            bind.exit_code(),
            server.exit_code(),
            drain.exit_code(),
            config.exit_code(),
        ];
        assert!(codes.iter().all(|c| *c != 0));
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
