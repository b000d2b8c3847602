use std::env;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::oneshot;
use tpu_webhook::api::WebhookServer;
use tpu_webhook::config::Cli;
use tpu_webhook::config::Commands;
use tpu_webhook::config::WebhookArgs;
use tpu_webhook::domain::IdentityRegistry;
use tpu_webhook::domain::MutationConfig;
use tpu_webhook::domain::WorkerIdentityMutator;
use tpu_webhook::logging;
use utils::logging::LOG_PATH_ENV_VAR;
use utils::version;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_global_hooks();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(webhook_args) => run_serve(*webhook_args).await,
    }
}

async fn run_serve(webhook_args: WebhookArgs) -> Result<()> {
    let _guard = logging::init(env::var(LOG_PATH_ENV_VAR).ok());

    tracing::info!("Starting tpu-webhook {}", &**version::VERSION);

    let registry = Arc::new(IdentityRegistry::new());
    let mutator = Arc::new(WorkerIdentityMutator::new(
        registry,
        MutationConfig::from(&webhook_args),
    ));
    let server = WebhookServer::new(
        mutator,
        webhook_args.listen_addr.clone(),
        webhook_args.tls_paths(),
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
            // keep the sender alive so the server is not stopped
            std::future::pending::<()>().await;
        }
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    });

    server
        .run(shutdown_rx)
        .await
        .map_err(|report| anyhow::anyhow!("{report:?}"))?;

    Ok(())
}
