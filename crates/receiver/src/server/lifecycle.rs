//! Listener ownership and graceful shutdown.
//!
//! A [`Service`] moves through `Starting -> Listening -> Draining -> Stopped`.
//! The only external trigger is the shared [`CancellationToken`]; the only
//! internal one is the listener task ending on its own.

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::{net::TcpListener, sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::Server;
use crate::{config::Config, processor::AlertProcessor, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Listening,
    Draining,
    Stopped,
}

#[derive(Debug)]
pub struct Service {
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
    drain_timeout: Duration,
    phase: watch::Sender<Phase>,
}

impl Service {
    /// Bind the listener. Nothing is accepted until [`Service::run`].
    pub async fn bind(
        config: &Config,
        processor: Arc<dyn AlertProcessor>,
        shutdown: CancellationToken,
    ) -> Result<Self> {
        let (phase, _) = watch::channel(Phase::Starting);

        let addr = config.server.addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;

        Ok(Self {
            listener,
            router: Server::new(config, processor).build_router(),
            shutdown,
            drain_timeout: config.server.drain_timeout,
            phase,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Serve until the shutdown token is cancelled, then drain.
    ///
    /// Returns [`Error::DrainTimeout`] when in-flight requests are still
    /// running once the drain timeout elapses; the server task is aborted
    /// in that case rather than waited on.
    pub async fn run(self) -> Result<()> {
        let Service {
            listener,
            router,
            shutdown,
            drain_timeout,
            phase,
        } = self;
        let addr = listener.local_addr()?;

        let graceful = shutdown.clone();
        let mut server: JoinHandle<std::io::Result<()>> = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { graceful.cancelled().await })
                .await
        });
        phase.send_replace(Phase::Listening);
        info!(%addr, "Listening for Alertmanager notifications");

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {}
            joined = &mut server => {
                phase.send_replace(Phase::Stopped);
                return match flatten(joined) {
                    Ok(()) if shutdown.is_cancelled() => Ok(()),
                    Ok(()) => Err(Error::Server(std::io::Error::other(
                        "listener stopped unexpectedly",
                    ))),
                    Err(e) => {
                        error!(error = %e, "Listener failed");
                        Err(e)
                    }
                };
            }
        }

        phase.send_replace(Phase::Draining);
        info!(timeout = ?drain_timeout, "Server stopped accepting, draining in-flight requests");

        let result = match tokio::time::timeout(drain_timeout, &mut server).await {
            Ok(joined) => flatten(joined).inspect(|_| info!("Server exited properly")),
            Err(_) => {
                server.abort();
                error!(timeout = ?drain_timeout, "Server shutdown failed, abandoning in-flight requests");
                Err(Error::DrainTimeout(drain_timeout))
            }
        };

        phase.send_replace(Phase::Stopped);
        result
    }
}

fn flatten(joined: std::result::Result<std::io::Result<()>, tokio::task::JoinError>) -> Result<()> {
    match joined {
        Ok(result) => Ok(result?),
        Err(e) => Err(Error::Server(std::io::Error::other(e))),
    }
}

/// Cancel `shutdown` on the first interrupt signal.
///
/// Returns early without cancelling if the token is cancelled elsewhere or
/// the signal handler cannot be installed.
pub async fn cancel_on_interrupt(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => {
                info!("Aborted signal received");
                shutdown.cancel();
            }
            Err(e) => warn!(error = %e, "Failed to install interrupt handler"),
        },
        _ = shutdown.cancelled() => {}
    }
}
