use k8s_openapi::api::core::v1::PodTemplateSpec;
use kube::CustomResource;
use serde::Deserialize;
use serde::Serialize;

/// The parts of a RayCluster spec that determine worker identities.
/// Fields not listed here are ignored when decoding.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize)]
#[kube(
    group = "ray.io",
    version = "v1",
    kind = "RayCluster",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct RayClusterSpec {
    #[serde(default)]
    pub worker_group_specs: Vec<WorkerGroupSpec>,
}

/// One homogeneous group of worker pods.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerGroupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(default)]
    pub template: PodTemplateSpec,
}
