use error_stack::Report;
use k8s_openapi::api::core::v1::Pod;

use crate::domain::MutationError;
use crate::domain::SliceKey;

/// Label GKE puts on pods scheduled into a node pool.
pub const DEFAULT_NODE_POOL_LABEL: &str = "cloud.google.com/gke-nodepool";

// Pods admitted before defaulting may not carry a namespace yet.
const UNKNOWN_NAMESPACE: &str = "<unset>";

/// Derives the slice key of a worker pod from its node pool label and name prefix.
///
/// The Ray operator only sets `generateName` on the pods it creates; a pod
/// created with an explicit `name` and no prefix is keyed by that name.
///
/// # Errors
///
/// - [`MutationError::MissingNodePoolLabel`] if `node_pool_label` is absent or empty
/// - [`MutationError::MissingNamePrefix`] if the pod has neither `generateName` nor `name`
pub fn slice_key_for_pod(
    pod: &Pod,
    node_pool_label: &str,
) -> Result<SliceKey, Report<MutationError>> {
    let metadata = &pod.metadata;
    let namespace = metadata
        .namespace
        .as_deref()
        .filter(|ns| !ns.is_empty())
        .unwrap_or(UNKNOWN_NAMESPACE)
        .to_string();

    let name_prefix = non_empty(&metadata.generate_name)
        .or_else(|| non_empty(&metadata.name))
        .ok_or_else(|| {
            Report::new(MutationError::MissingNamePrefix {
                namespace: namespace.clone(),
            })
        })?;

    let node_pool = metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(node_pool_label))
        .filter(|pool| !pool.is_empty())
        .ok_or_else(|| {
            Report::new(MutationError::MissingNodePoolLabel {
                pod: name_prefix.to_string(),
                namespace,
                label: node_pool_label.to_string(),
            })
        })?;

    Ok(SliceKey::new(node_pool.as_str(), name_prefix))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
