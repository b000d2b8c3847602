//! End-to-end tests of the admission endpoint

use std::sync::Arc;

use poem::test::TestClient;
use poem::Endpoint;
use serde_json::json;
use serde_json::Value;
use similar_asserts::assert_eq;
use test_log::test;
use tpu_webhook::api::server::routes;
use tpu_webhook::domain::IdentityRegistry;
use tpu_webhook::domain::MutationConfig;
use tpu_webhook::domain::SliceKey;
use tpu_webhook::domain::WorkerIdentityMutator;
use tpu_webhook::domain::WorkerIndex;

const NODE_POOL_LABEL: &str = "cloud.google.com/gke-nodepool";

struct TestHarness<E: Endpoint> {
    registry: Arc<IdentityRegistry>,
    client: TestClient<E>,
}

fn harness() -> TestHarness<impl Endpoint> {
    let registry = Arc::new(IdentityRegistry::new());
    let mutator = Arc::new(WorkerIdentityMutator::new(
        Arc::clone(&registry),
        MutationConfig::default(),
    ));
    TestHarness {
        registry,
        client: TestClient::new(routes(mutator)),
    }
}

fn review(uid: &str, kind: &str, resource: &str, object: Value) -> Value {
    let group = if kind == "RayCluster" { "ray.io" } else { "" };
    json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": uid,
            "kind": { "group": group, "version": "v1", "kind": kind },
            "resource": { "group": group, "version": "v1", "resource": resource },
            "namespace": "default",
            "operation": "CREATE",
            "userInfo": { "username": "system:serviceaccount:ray-system:kuberay-operator" },
            "object": object
        }
    })
}

fn pod_review(uid: &str, generate_name: &str, node_pool: Option<&str>) -> Value {
    let mut labels = json!({ "ray.io/node-type": "worker" });
    if let Some(pool) = node_pool {
        labels[NODE_POOL_LABEL] = json!(pool);
    }
    review(
        uid,
        "Pod",
        "pods",
        json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {
                "generateName": generate_name,
                "namespace": "default",
                "labels": labels
            },
            "spec": {
                "containers": [
                    {
                        "name": "ray-worker",
                        "env": [{ "name": "RAY_ADDRESS", "value": "head:6379" }]
                    },
                    { "name": "log-sidecar" }
                ]
            }
        }),
    )
}

fn ray_cluster_review(uid: &str) -> Value {
    review(
        uid,
        "RayCluster",
        "rayclusters",
        json!({
            "apiVersion": "ray.io/v1",
            "kind": "RayCluster",
            "metadata": { "name": "tpu-cluster", "namespace": "default" },
            "spec": {
                "headGroupSpec": {
                    "rayStartParams": {},
                    "template": { "spec": { "containers": [{ "name": "ray-head" }] } }
                },
                "workerGroupSpecs": [
                    {
                        "groupName": "v4-16",
                        "replicas": 4,
                        "template": { "spec": { "containers": [{ "name": "ray-worker" }] } }
                    },
                    {
                        "groupName": "v4-8",
                        "replicas": 2,
                        "template": { "spec": { "containers": [
                            { "name": "ray-worker", "env": [{ "name": "A", "value": "1" }] }
                        ] } }
                    }
                ]
            }
        }),
    )
}

async fn post_review<E: Endpoint>(client: &TestClient<E>, body: &Value) -> Value {
    let resp = client.post("/inject").body_json(body).send().await;
    resp.assert_status_is_ok();
    resp.json().await.value().deserialize::<Value>()
}

/// `AdmissionResponse::patch` is raw bytes, serialized as a JSON byte array.
fn decoded_patch(review: &Value) -> Value {
    let bytes: Vec<u8> = serde_json::from_value(review["response"]["patch"].clone())
        .expect("response should carry the patch bytes");
    serde_json::from_slice(&bytes).expect("patch should be JSON")
}

#[test(tokio::test)]
async fn pod_review_is_allowed_with_worker_id_patch() {
    let harness = harness();

    let review = pod_review("uid-1", "tpu-worker-", Some("tpu-pool-a"));

    let body = post_review(&harness.client, &review).await;

    assert_eq!(body["response"]["uid"], json!("uid-1"));
    assert_eq!(body["response"]["allowed"], json!(true));
    assert_eq!(body["response"]["patchType"], json!("JSONPatch"));
    assert_eq!(
        decoded_patch(&body),
        json!([
            {
                "op": "add",
                "path": "/spec/containers/0/env/-",
                "value": { "name": "TPU_WORKER_ID", "value": "0" }
            },
            {
                "op": "add",
                "path": "/spec/containers/1/env",
                "value": [{ "name": "TPU_WORKER_ID", "value": "0" }]
            }
        ])
    );
}

#[test(tokio::test)]
async fn pods_get_distinct_ids_and_retries_reuse_them() {
    let harness = harness();

    let mut ids = Vec::new();
    for (uid, prefix) in [("u0", "p0"), ("u1", "p1"), ("u2", "p2"), ("u3", "p1")] {
        let review = pod_review(uid, prefix, Some("tpu-pool-a"));
        let body = post_review(&harness.client, &review).await;
        ids.push(decoded_patch(&body)[0]["value"]["value"].clone());
    }

    assert_eq!(ids, vec![json!("0"), json!("1"), json!("2"), json!("1")]);
    assert_eq!(harness.registry.assigned_count("tpu-pool-a"), 3);
    assert_eq!(
        harness.registry.lookup(&SliceKey::new("tpu-pool-a", "p1")),
        Some(WorkerIndex::new(1))
    );
}

#[test(tokio::test)]
async fn node_pools_are_numbered_separately() {
    let harness = harness();

    post_review(&harness.client, &pod_review("u0", "p0", Some("tpu-pool-a"))).await;
    let body = post_review(&harness.client, &pod_review("u1", "p0", Some("tpu-pool-b"))).await;

    assert_eq!(decoded_patch(&body)[0]["value"]["value"], json!("0"));
}

#[test(tokio::test)]
async fn pod_without_node_pool_is_denied() {
    let harness = harness();

    let body = post_review(&harness.client, &pod_review("uid-2", "tpu-worker-", None)).await;

    assert_eq!(body["response"]["uid"], json!("uid-2"));
    assert_eq!(body["response"]["allowed"], json!(false));
    assert!(body["response"]["patch"].is_null(), "denied review must not be patched");
    let message = body["response"]["status"]["message"]
        .as_str()
        .expect("denial carries a message");
    assert!(message.contains(NODE_POOL_LABEL), "unexpected message {message}");
    assert_eq!(harness.registry.assigned_count("tpu-pool-a"), 0);
}

#[test(tokio::test)]
async fn ray_cluster_review_injects_hostnames() {
    let harness = harness();

    let body = post_review(&harness.client, &ray_cluster_review("uid-3")).await;

    assert_eq!(body["response"]["uid"], json!("uid-3"));
    assert_eq!(body["response"]["allowed"], json!(true));
    assert_eq!(
        decoded_patch(&body),
        json!([
            {
                "op": "add",
                "path": "/spec/workerGroupSpecs/0/template/spec/containers/0/env",
                "value": [{
                    "name": "TPU_WORKER_HOSTNAMES",
                    "value": "worker-0,worker-1,worker-2,worker-3"
                }]
            },
            {
                "op": "add",
                "path": "/spec/workerGroupSpecs/1/template/spec/containers/0/env/-",
                "value": { "name": "TPU_WORKER_HOSTNAMES", "value": "worker-0,worker-1" }
            }
        ])
    );
}

#[test(tokio::test)]
async fn ray_cluster_patch_applies_to_the_admitted_object() {
    let harness = harness();
    let review = ray_cluster_review("uid-4");
    let mut object = review["request"]["object"].clone();

    let body = post_review(&harness.client, &review).await;
    let patch: json_patch::Patch =
        serde_json::from_value(decoded_patch(&body)).expect("valid JSON patch");
    json_patch::patch(&mut object, &patch).expect("patch should apply");

    assert_eq!(
        object["spec"]["workerGroupSpecs"][1]["template"]["spec"]["containers"][0]["env"],
        json!([
            { "name": "A", "value": "1" },
            { "name": "TPU_WORKER_HOSTNAMES", "value": "worker-0,worker-1" }
        ])
    );
}

#[test(tokio::test)]
async fn unsupported_kind_is_allowed_unmutated() {
    let harness = harness();
    let body = review(
        "uid-5",
        "ConfigMap",
        "configmaps",
        json!({
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": { "name": "settings" },
            "data": { "key": "value" }
        }),
    );

    let body = post_review(&harness.client, &body).await;

    assert_eq!(body["response"]["uid"], json!("uid-5"));
    assert_eq!(body["response"]["allowed"], json!(true));
    assert!(body["response"]["patch"].is_null());
}

#[test(tokio::test)]
async fn review_without_request_is_invalid() {
    let harness = harness();

    let body = post_review(
        &harness.client,
        &json!({ "apiVersion": "admission.k8s.io/v1", "kind": "AdmissionReview" }),
    )
    .await;

    assert_eq!(body["response"]["allowed"], json!(false));
}
