use error_stack::Report;
use kube::core::admission::AdmissionRequest;
use kube::core::DynamicObject;
use serde::de::DeserializeOwned;

use super::types::ResourceError;

pub const POD_KIND: &str = "Pod";
pub const RAY_CLUSTER_KIND: &str = "RayCluster";

/// Decodes the object of an admission request as `K`.
///
/// # Errors
///
/// - [`ResourceError::UnexpectedKind`] if the request is for another kind
/// - [`ResourceError::MissingObject`] if the request has no object (e.g. a DELETE)
/// - [`ResourceError::Decode`] if the object does not match `K`
pub fn decode_object<K: DeserializeOwned>(
    request: &AdmissionRequest<DynamicObject>,
    expected_kind: &str,
) -> Result<K, Report<ResourceError>> {
    if request.kind.kind != expected_kind {
        return Err(Report::new(ResourceError::UnexpectedKind {
            expected: expected_kind.to_string(),
            actual: request.kind.kind.clone(),
        }));
    }

    let object = request.object.as_ref().ok_or_else(|| {
        Report::new(ResourceError::MissingObject {
            uid: request.uid.clone(),
        })
    })?;

    let decode_error = |e: serde_json::Error| {
        let message = e.to_string();
        Report::new(e).change_context(ResourceError::Decode {
            kind: expected_kind.to_string(),
            message,
        })
    };

    let value = serde_json::to_value(object).map_err(decode_error)?;
    serde_json::from_value(value).map_err(decode_error)
}
