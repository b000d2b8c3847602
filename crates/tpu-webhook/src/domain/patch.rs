//! JSON Patch (RFC 6902) construction for container environment injection.

use std::fmt;

use json_patch::AddOperation;
use json_patch::PatchOperation;
use k8s_openapi::api::core::v1::Container;
use serde_json::json;
use serde_json::Value;

/// Worker index of the pod within its slice.
pub const TPU_WORKER_ID: &str = "TPU_WORKER_ID";
/// Comma separated hostnames of every worker in the group.
pub const TPU_WORKER_HOSTNAMES: &str = "TPU_WORKER_HOSTNAMES";

/// An environment variable to inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVariable {
    pub name: &'static str,
    pub value: String,
}

impl EnvVariable {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    fn to_json(&self) -> Value {
        json!({ "name": self.name, "value": self.value })
    }
}

/// Location of a container inside the object being mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPath {
    /// `/spec/containers/{container}` of a Pod
    Pod { container: usize },
    /// `/spec/workerGroupSpecs/{group}/template/spec/containers/{container}` of a RayCluster
    WorkerGroup { group: usize, container: usize },
}

impl fmt::Display for ContainerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pod { container } => write!(f, "/spec/containers/{container}"),
            Self::WorkerGroup { group, container } => write!(
                f,
                "/spec/workerGroupSpecs/{group}/template/spec/containers/{container}"
            ),
        }
    }
}

/// Builds the operation adding `variable` to one container.
///
/// A container without env entries gets a new one-element list at `.../env`;
/// otherwise the variable is appended at `.../env/-`.
pub fn build_env_patch(
    target: ContainerPath,
    existing_env_count: usize,
    variable: &EnvVariable,
) -> PatchOperation {
    let env_path = format!("{target}/env");

    let operation = if existing_env_count == 0 {
        AddOperation {
            path: env_path,
            value: Value::Array(vec![variable.to_json()]),
        }
    } else {
        AddOperation {
            path: format!("{env_path}/-"),
            value: variable.to_json(),
        }
    };
    PatchOperation::Add(operation)
}

/// One operation per container, in container order.
pub fn container_env_patches(
    containers: &[Container],
    path: impl Fn(usize) -> ContainerPath,
    variable: &EnvVariable,
) -> Vec<PatchOperation> {
    containers
        .iter()
        .enumerate()
        .map(|(i, container)| {
            let existing = container.env.as_ref().map_or(0, Vec::len);
            build_env_patch(path(i), existing, variable)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use json_patch::Patch;
    use k8s_openapi::api::core::v1::EnvVar;
    use similar_asserts::assert_eq;

    use super::*;

    fn container(name: &str, env: &[(&str, &str)]) -> Container {
        Container {
            name: name.to_string(),
            env: (!env.is_empty()).then(|| {
                env.iter()
                    .map(|(n, v)| EnvVar {
                        name: n.to_string(),
                        value: Some(v.to_string()),
                        ..Default::default()
                    })
                    .collect()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn empty_env_creates_list() {
        let op = build_env_patch(
            ContainerPath::Pod { container: 0 },
            0,
            &EnvVariable::new(TPU_WORKER_ID, "3"),
        );

        assert_eq!(
            serde_json::to_value(&op).expect("serialize patch"),
            json!({
                "op": "add",
                "path": "/spec/containers/0/env",
                "value": [{ "name": "TPU_WORKER_ID", "value": "3" }]
            })
        );
    }

    #[test]
    fn existing_env_appends_single_entry() {
        let op = build_env_patch(
            ContainerPath::WorkerGroup {
                group: 1,
                container: 2,
            },
            4,
            &EnvVariable::new(TPU_WORKER_HOSTNAMES, "worker-0,worker-1"),
        );

        assert_eq!(
            serde_json::to_value(&op).expect("serialize patch"),
            json!({
                "op": "add",
                "path": "/spec/workerGroupSpecs/1/template/spec/containers/2/env/-",
                "value": { "name": "TPU_WORKER_HOSTNAMES", "value": "worker-0,worker-1" }
            })
        );
    }

    #[test]
    fn one_operation_per_container_in_order() {
        let containers = vec![
            container("ray-worker", &[("RAY_ADDRESS", "head:6379")]),
            container("sidecar", &[]),
        ];

        let ops = container_env_patches(
            &containers,
            |container| ContainerPath::Pod { container },
            &EnvVariable::new(TPU_WORKER_ID, "0"),
        );

        let paths: Vec<String> = ops
            .iter()
            .map(|op| match op {
                PatchOperation::Add(add) => add.path.clone(),
                other => panic!("unexpected operation {other:?}"),
            })
            .collect();
        assert_eq!(
            paths,
            vec![
                "/spec/containers/0/env/-".to_string(),
                "/spec/containers/1/env".to_string(),
            ]
        );
    }

    #[test]
    fn patch_applies_to_pod_document() {
        let mut doc = json!({
            "spec": {
                "containers": [
                    { "name": "a" },
                    { "name": "b", "env": [{ "name": "X", "value": "1" }] }
                ]
            }
        });
        let containers = vec![container("a", &[]), container("b", &[("X", "1")])];
        let patch = Patch(container_env_patches(
            &containers,
            |container| ContainerPath::Pod { container },
            &EnvVariable::new(TPU_WORKER_ID, "5"),
        ));

        json_patch::patch(&mut doc, &patch).expect("patch should apply");

        assert_eq!(
            doc["spec"]["containers"][0]["env"],
            json!([{ "name": "TPU_WORKER_ID", "value": "5" }])
        );
        assert_eq!(
            doc["spec"]["containers"][1]["env"],
            json!([
                { "name": "X", "value": "1" },
                { "name": "TPU_WORKER_ID", "value": "5" }
            ])
        );
    }
}
