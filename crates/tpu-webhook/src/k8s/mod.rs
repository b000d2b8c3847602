//! Kubernetes resource handling.
//!
//! - [`RayCluster`]: the subset of the `ray.io` RayCluster resource the webhook reads
//! - [`slice_key_for_pod`]: derives a pod's [`SliceKey`](crate::domain::SliceKey)
//! - [`decode_object`]: turns the object of an admission request into a typed resource

pub(crate) mod pod_identity;
pub(crate) mod ray_cluster;
pub(crate) mod review;
pub(crate) mod types;

pub use pod_identity::slice_key_for_pod;
pub use pod_identity::DEFAULT_NODE_POOL_LABEL;
pub use ray_cluster::RayCluster;
pub use ray_cluster::RayClusterSpec;
pub use ray_cluster::WorkerGroupSpec;
pub use review::decode_object;
pub use review::POD_KIND;
pub use review::RAY_CLUSTER_KIND;
pub use types::ResourceError;
