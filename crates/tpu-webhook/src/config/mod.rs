pub mod cli;
pub mod webhook;

use crate::domain::MutationConfig;

impl From<&webhook::WebhookArgs> for MutationConfig {
    fn from(args: &webhook::WebhookArgs) -> Self {
        Self {
            node_pool_label: args.node_pool_label.clone(),
            hostname_prefix: args.hostname_prefix.clone(),
        }
    }
}

pub use cli::*;
pub use webhook::*;
