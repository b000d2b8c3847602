use std::sync::Arc;

use error_stack::Context;
use error_stack::Report;
use json_patch::Patch;
use k8s_openapi::api::core::v1::Pod;
use kube::core::admission::AdmissionRequest;
use kube::core::admission::AdmissionResponse;
use kube::core::admission::AdmissionReview;
use kube::core::DynamicObject;
use poem::handler;
use poem::web::Data;
use poem::web::Json;
use tracing::debug;
use tracing::error;
use tracing::warn;

use crate::domain::WorkerIdentityMutator;
use crate::k8s::decode_object;
use crate::k8s::RayCluster;
use crate::k8s::POD_KIND;
use crate::k8s::RAY_CLUSTER_KIND;

/// Body returned by `GET /`.
pub const BANNER: &str = "kuberay-tpu-webhook";

#[handler]
pub fn banner() -> &'static str {
    BANNER
}

/// Mutate an admitted Pod or RayCluster
#[handler]
pub async fn inject(
    Json(review): Json<AdmissionReview<DynamicObject>>,
    Data(mutator): Data<&Arc<WorkerIdentityMutator>>,
) -> Json<AdmissionReview<DynamicObject>> {
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Admission review carries no request");
            return Json(AdmissionResponse::invalid(e.to_string()).into_review());
        }
    };

    Json(review_response(&request, mutator).into_review())
}

/// Builds the response for one admission request, routing by object kind.
///
/// Kinds other than Pod and RayCluster are admitted unmutated.
pub fn review_response(
    request: &AdmissionRequest<DynamicObject>,
    mutator: &WorkerIdentityMutator,
) -> AdmissionResponse {
    match request.kind.kind.as_str() {
        RAY_CLUSTER_KIND => {
            debug!(uid = %request.uid, name = %request.name, "Received review for RayCluster");
            match decode_object::<RayCluster>(request, RAY_CLUSTER_KIND) {
                Ok(cluster) => patched(request, mutator.mutate_ray_cluster(&cluster)),
                Err(report) => denied(request, &report),
            }
        }
        POD_KIND => {
            debug!(uid = %request.uid, "Received review for Pod");
            let pod = match decode_object::<Pod>(request, POD_KIND) {
                Ok(pod) => pod,
                Err(report) => return denied(request, &report),
            };
            match mutator.mutate_pod(&pod) {
                Ok(mutation) => patched(request, mutation.patch),
                Err(report) => denied(request, &report),
            }
        }
        other => {
            warn!(uid = %request.uid, kind = other, "Unsupported kind, admitting unmutated");
            AdmissionResponse::from(request)
        }
    }
}

fn patched(request: &AdmissionRequest<DynamicObject>, patch: Patch) -> AdmissionResponse {
    match AdmissionResponse::from(request).with_patch(patch) {
        Ok(response) => response,
        Err(e) => {
            error!(uid = %request.uid, error = %e, "Failed to serialize patch");
            AdmissionResponse::from(request).deny(format!("Failed to serialize patch: {e}"))
        }
    }
}

fn denied<C: Context>(
    request: &AdmissionRequest<DynamicObject>,
    report: &Report<C>,
) -> AdmissionResponse {
    warn!(uid = %request.uid, error = ?report, "Rejecting admission");
    AdmissionResponse::from(request).deny(report.current_context().to_string())
}
