pub mod api;
pub mod config;
pub mod domain;
pub mod k8s;
pub mod logging;
