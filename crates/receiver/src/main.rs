use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use alertmanager_statuspage::{
    config::Config,
    processor::{AlertProcessor, NoopProcessor},
    server::{cancel_on_interrupt, Service},
    Result,
};

#[derive(Parser)]
#[command(author, version, about = "Receive Alertmanager notifications for Statuspage.io", long_about = None)]
struct Cli {
    /// The port to listen on for Alertmanager notifications (overrides RECEIVER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Log level used when RUST_LOG is not set
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Receiver terminated");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load()?.with_port(cli.port);
    info!("Loaded configuration: {:?}", config);

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_interrupt(shutdown.clone()));

    let processor: Arc<dyn AlertProcessor> = Arc::new(NoopProcessor::new());

    let service = Service::bind(&config, processor, shutdown).await?;
    service.run().await?;

    info!("Server stopped");
    Ok(())
}
