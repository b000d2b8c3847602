use std::path::PathBuf;

use clap::Parser;

use crate::domain::hostnames::DEFAULT_HOSTNAME_PREFIX;
use crate::k8s::DEFAULT_NODE_POOL_LABEL;

/// Certificate and key used to terminate TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Parser, Clone, Debug)]
pub struct WebhookArgs {
    #[arg(
        long,
        env = "WEBHOOK_LISTEN_ADDR",
        default_value = "0.0.0.0:443",
        help = "Address the admission webhook listens on"
    )]
    pub listen_addr: String,

    #[arg(
        long,
        help = "Serve HTTPS with the configured certificate and key",
        env = "WEBHOOK_ENABLE_TLS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub enable_tls: bool,

    #[arg(
        long,
        env = "WEBHOOK_TLS_CERT_PATH",
        value_hint = clap::ValueHint::FilePath,
        default_value = "/etc/kuberay-tpu-webhook/tls/tls.crt",
        help = "PEM encoded TLS certificate"
    )]
    pub tls_cert_path: PathBuf,

    #[arg(
        long,
        env = "WEBHOOK_TLS_KEY_PATH",
        value_hint = clap::ValueHint::FilePath,
        default_value = "/etc/kuberay-tpu-webhook/tls/tls.key",
        help = "PEM encoded TLS private key"
    )]
    pub tls_key_path: PathBuf,

    #[arg(
        long,
        env = "TPU_NODE_POOL_LABEL",
        default_value = DEFAULT_NODE_POOL_LABEL,
        help = "Pod label holding the TPU node pool name"
    )]
    pub node_pool_label: String,

    #[arg(
        long,
        env = "TPU_HOSTNAME_PREFIX",
        default_value = DEFAULT_HOSTNAME_PREFIX,
        help = "Prefix of injected worker hostnames, e.g. worker gives worker-0,worker-1"
    )]
    pub hostname_prefix: String,
}

impl WebhookArgs {
    /// TLS material to serve with, or `None` when TLS is disabled.
    pub fn tls_paths(&self) -> Option<TlsPaths> {
        self.enable_tls.then(|| TlsPaths {
            cert_path: self.tls_cert_path.clone(),
            key_path: self.tls_key_path.clone(),
        })
    }
}
