use std::fs;
use std::path::Path;
use std::sync::Arc;

use error_stack::Report;
use error_stack::ResultExt;
use poem::get;
use poem::listener::Listener;
use poem::listener::RustlsCertificate;
use poem::listener::RustlsConfig;
use poem::listener::TcpListener;
use poem::middleware::Tracing;
use poem::post;
use poem::Endpoint;
use poem::EndpointExt;
use poem::Route;
use poem::Server;
use tokio::sync::oneshot;
use tracing::error;
use tracing::info;

use super::errors::ApiError;
use super::handlers::banner;
use super::handlers::inject;
use crate::config::TlsPaths;
use crate::domain::WorkerIdentityMutator;

/// HTTPS server answering admission reviews
pub struct WebhookServer {
    mutator: Arc<WorkerIdentityMutator>,
    listen_addr: String,
    tls: Option<TlsPaths>,
}

impl WebhookServer {
    /// Create a new webhook server; `tls: None` serves plain HTTP
    pub fn new(
        mutator: Arc<WorkerIdentityMutator>,
        listen_addr: String,
        tls: Option<TlsPaths>,
    ) -> Self {
        Self {
            mutator,
            listen_addr,
            tls,
        }
    }

    /// Start the webhook server
    ///
    /// # Errors
    ///
    /// - [`ApiError::TlsConfig`] if the certificate or key cannot be read
    /// - [`ApiError::ServerError`] if the server fails to start or bind to the address
    pub async fn run(self, shutdown_rx: oneshot::Receiver<()>) -> Result<(), Report<ApiError>> {
        let Self {
            mutator,
            listen_addr,
            tls,
        } = self;
        info!(
            listen_addr = %listen_addr,
            tls = tls.is_some(),
            node_pool_label = %mutator.config().node_pool_label,
            "Starting TPU webhook server"
        );

        let app = routes(mutator);
        match tls {
            Some(tls) => {
                let config = load_tls_config(&tls)?;
                serve(TcpListener::bind(listen_addr).rustls(config), app, shutdown_rx).await
            }
            None => serve(TcpListener::bind(listen_addr), app, shutdown_rx).await,
        }
    }
}

/// All webhook routes, sharing one mutator.
pub fn routes(mutator: Arc<WorkerIdentityMutator>) -> impl Endpoint {
    Route::new()
        .at("/", get(banner))
        .at("/inject", post(inject))
        .data(mutator)
        .with(Tracing)
}

/// Reads the PEM certificate and key.
///
/// # Errors
///
/// - [`ApiError::TlsConfig`] if either file cannot be read
pub fn load_tls_config(tls: &TlsPaths) -> Result<RustlsConfig, Report<ApiError>> {
    let read = |path: &Path| {
        fs::read(path).change_context_lazy(|| ApiError::TlsConfig {
            path: path.display().to_string(),
        })
    };
    let cert = read(&tls.cert_path)?;
    let key = read(&tls.key_path)?;

    Ok(RustlsConfig::new().fallback(RustlsCertificate::new().cert(cert).key(key)))
}

async fn serve<L>(
    listener: L,
    app: impl Endpoint + 'static,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> Result<(), Report<ApiError>>
where
    L: Listener + 'static,
{
    let server = Server::new(listener);

    tokio::select! {
        result = server.run(app) => {
            match result {
                Ok(()) => {
                    info!("Webhook server stopped normally");
                    Ok(())
                }
                Err(e) => {
                    error!("Webhook server failed: {e}");
                    Err(Report::new(ApiError::ServerError {
                        message: format!("Server failed: {e}"),
                    }))
                }
            }
        }
        _ = &mut shutdown_rx => {
            info!("Webhook server shutdown requested");
            Ok(())
        }
    }
}
