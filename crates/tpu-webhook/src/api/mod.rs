//! HTTP surface of the admission webhook
//!
//! # Endpoints
//!
//! - `GET /` - plain text banner, used as a liveness probe
//! - `POST /inject` - `admission.k8s.io/v1` `AdmissionReview` for Pods and RayClusters
//!
//! Every review is allowed. Pods receive `TPU_WORKER_ID`, RayCluster worker
//! groups receive `TPU_WORKER_HOSTNAMES`. Pods that cannot be given an
//! identity are denied instead of being patched with a wrong one.

pub mod errors;
pub mod handlers;
pub mod server;

pub use errors::ApiError;
pub use server::WebhookServer;
