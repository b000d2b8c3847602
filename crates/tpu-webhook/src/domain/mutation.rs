//! Mutations applied to admitted RayClusters and worker pods.

use std::sync::Arc;

use error_stack::Report;
use json_patch::Patch;
use k8s_openapi::api::core::v1::Pod;
use tracing::debug;
use tracing::info;

use super::error::MutationError;
use super::hostnames;
use super::patch::container_env_patches;
use super::patch::ContainerPath;
use super::patch::EnvVariable;
use super::patch::TPU_WORKER_HOSTNAMES;
use super::patch::TPU_WORKER_ID;
use super::slice::IdentityRegistry;
use super::slice::SliceKey;
use super::slice::WorkerIndex;
use crate::k8s::slice_key_for_pod;
use crate::k8s::RayCluster;
use crate::k8s::DEFAULT_NODE_POOL_LABEL;

/// Settings that shape the injected identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationConfig {
    /// Pod label naming the TPU node pool a pod runs in
    pub node_pool_label: String,
    /// Prefix of the generated worker hostnames
    pub hostname_prefix: String,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            node_pool_label: DEFAULT_NODE_POOL_LABEL.to_string(),
            hostname_prefix: hostnames::DEFAULT_HOSTNAME_PREFIX.to_string(),
        }
    }
}

/// Outcome of mutating a worker pod.
#[derive(Debug, Clone)]
pub struct PodMutation {
    pub slice_key: SliceKey,
    pub worker_index: WorkerIndex,
    pub patch: Patch,
}

/// Computes the patches for admitted objects.
///
/// Holds the process-wide [`IdentityRegistry`]; every request handler shares
/// one instance.
#[derive(Debug)]
pub struct WorkerIdentityMutator {
    registry: Arc<IdentityRegistry>,
    config: MutationConfig,
}

impl WorkerIdentityMutator {
    pub fn new(registry: Arc<IdentityRegistry>, config: MutationConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Injects `TPU_WORKER_HOSTNAMES` into every container of every worker group.
    ///
    /// Operations are ordered by worker group, then by container.
    pub fn mutate_ray_cluster(&self, cluster: &RayCluster) -> Patch {
        let mut operations = Vec::new();

        for (group, spec) in cluster.spec.worker_group_specs.iter().enumerate() {
            let replicas = hostnames::replica_count(spec.replicas);
            let joined = hostnames::join_hostnames(&hostnames::build_hostnames(
                &self.config.hostname_prefix,
                replicas,
            ));
            debug!(
                cluster = cluster.metadata.name.as_deref().unwrap_or_default(),
                group,
                replicas,
                hostnames = %joined,
                "Built worker hostnames"
            );

            let Some(pod_spec) = spec.template.spec.as_ref() else {
                continue;
            };
            let variable = EnvVariable::new(TPU_WORKER_HOSTNAMES, joined);
            operations.extend(container_env_patches(
                &pod_spec.containers,
                |container| ContainerPath::WorkerGroup { group, container },
                &variable,
            ));
        }

        Patch(operations)
    }

    /// Assigns the pod its worker index and injects it as `TPU_WORKER_ID`
    /// into every container. Re-admitting the same pod yields the same patch.
    ///
    /// # Errors
    ///
    /// - [`MutationError::MissingNodePoolLabel`] if the pod has no node pool label
    /// - [`MutationError::MissingNamePrefix`] if the pod has no name prefix
    pub fn mutate_pod(&self, pod: &Pod) -> Result<PodMutation, Report<MutationError>> {
        let slice_key = slice_key_for_pod(pod, &self.config.node_pool_label)?;
        let allocation = self.registry.allocate(&slice_key);

        if allocation.newly_assigned {
            info!(
                node_pool = slice_key.node_pool(),
                name_prefix = slice_key.name_prefix(),
                worker_index = %allocation.index,
                "Assigned TPU worker index"
            );
        }

        let variable = EnvVariable::new(TPU_WORKER_ID, allocation.index.to_string());
        let containers = pod
            .spec
            .as_ref()
            .map(|spec| spec.containers.as_slice())
            .unwrap_or_default();
        let operations = container_env_patches(
            containers,
            |container| ContainerPath::Pod { container },
            &variable,
        );

        Ok(PodMutation {
            slice_key,
            worker_index: allocation.index,
            patch: Patch(operations),
        })
    }
}
