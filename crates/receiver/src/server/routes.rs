use axum::{
    body::{self, Body},
    extract::{Request, State},
};
use http::{Method, StatusCode};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::Server;
use crate::{processor::AlertProcessor, sources::webhook::decode, Error, Result};

pub async fn receive(State(server): State<Arc<Server>>, request: Request) -> StatusCode {
    // Only HTTP POST is allowed
    if request.method() != Method::POST {
        warn!(method = %request.method(), "Unsupported HTTP method");
        return StatusCode::METHOD_NOT_ALLOWED;
    }

    match handle_message(server.processor.as_ref(), request.into_body()).await {
        Ok(()) => StatusCode::OK,
        Err(e) => e.status_code(),
    }
}

async fn handle_message(processor: &dyn AlertProcessor, body: Body) -> Result<()> {
    let bytes = body::to_bytes(body, usize::MAX).await.map_err(|e| {
        error!(error = %e, "Failed to read request body");
        Error::Transport(e.to_string())
    })?;

    let message = decode(&bytes).map_err(|e| {
        warn!(
            error = %e,
            body = %String::from_utf8_lossy(&bytes),
            "Failed to parse Alertmanager alert"
        );
        e
    })?;

    info!(
        receiver = %message.receiver,
        status = ?message.status,
        alerts = message.alerts.len(),
        group_key = %message.group_key,
        truncated = message.is_truncated(),
        "Received Alertmanager notification"
    );

    processor.process(message).await.map_err(|e| {
        error!(error = %e, "Failed to process alert");
        e
    })?;

    Ok(())
}
