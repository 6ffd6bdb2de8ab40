mod adapters;
mod application;
mod config;
mod domain;
mod interface;
mod ports;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{NvmeCliConfig, NvmeCliSource, PrometheusSink};
use application::{Backoff, PollScheduler, PollStatus, Reconciler};
use config::Config;
use interface::http::create_router;
use interface::signals::ShutdownSignals;
use ports::MetricsSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("nvme_exporter={},tower_http=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting nvme_exporter v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    let sink: Arc<dyn MetricsSink> = Arc::new(PrometheusSink::new()?);
    let status = Arc::new(PollStatus::new());
    let source = Arc::new(NvmeCliSource::new(NvmeCliConfig::new(
        config.nvme_binary.clone(),
        config.use_sudo,
    )));

    let scheduler = PollScheduler::new(
        Reconciler::new(source, sink.clone()),
        sink.clone(),
        status.clone(),
        config.check_interval,
        Backoff::new(config.initial_backoff, config.max_backoff),
    );

    let mut signals = ShutdownSignals::new()?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Create HTTP server
    let app = create_router(sink, status);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ HTTP server listening on {}", addr);
    info!("  → Metrics: http://{}/metrics", addr);

    let mut server_shutdown = shutdown_rx.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.wait_for(|stop| *stop).await;
            })
            .await
    });
    let poller = tokio::spawn(scheduler.run(shutdown_rx));

    let received = tokio::select! {
        result = &mut server => {
            match result {
                Ok(Ok(())) => warn!("HTTP server unexpectedly closed"),
                Ok(Err(e)) => error!("HTTP server failed: {}", e),
                Err(e) => error!("HTTP server task failed: {}", e),
            }
            None
        }
        name = signals.recv() => Some(name),
    };

    let _ = shutdown_tx.send(true);

    if let Some(name) = received {
        info!("Received {}, terminating", name);

        tokio::spawn(async move {
            let name = signals.recv().await;
            warn!("Received {} during shutdown, forcing exit", name);
            std::process::exit(1);
        });

        info!("Waiting up to {:?} for HTTP server to drain", config.shutdown_grace);
        match tokio::time::timeout(config.shutdown_grace, &mut server).await {
            Ok(Ok(Ok(()))) => info!("HTTP server exited properly"),
            Ok(Ok(Err(e))) => error!("HTTP server shutdown failed: {}", e),
            Ok(Err(e)) => error!("HTTP server task failed: {}", e),
            Err(_) => {
                warn!("HTTP server did not drain in time, aborting");
                server.abort();
            }
        }
    }

    info!("Waiting for poll scheduler to finish");
    if let Err(e) = poller.await {
        error!("Poll scheduler task failed: {}", e);
    }

    info!("Successfully exited");
    Ok(())
}
