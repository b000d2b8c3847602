use clap::{Parser, Subcommand};
use utils::version;

use crate::config::webhook::WebhookArgs;

#[derive(Parser)]
#[command(about, long_about, version = &**version::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the TPU worker identity admission webhook
    Serve(Box<WebhookArgs>),
}
