mod routes;
pub mod lifecycle;

use axum::{routing::any, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{config::Config, processor::AlertProcessor};

pub use lifecycle::{cancel_on_interrupt, Phase, Service};

/// Path Alertmanager posts notifications to.
pub const RECEIVER_PATH: &str = "/receiver";

pub struct Server {
    processor: Arc<dyn AlertProcessor>,
}

impl Server {
    pub fn new(_config: &Config, processor: Arc<dyn AlertProcessor>) -> Self {
        Self { processor }
    }

    pub fn build_router(self) -> Router {
        let state = Arc::new(self);

        // Every method is routed to the handler so it can answer 405 itself
        // before touching the body.
        Router::new()
            .route(RECEIVER_PATH, any(routes::receive))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
