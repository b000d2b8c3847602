//! Peer hostname list for a worker group.
//!
//! Every worker of a group receives the same list, and position `i` of the
//! list is the hostname of worker index `i`.

/// Prefix used when none is configured, giving `worker-0`, `worker-1`, ...
pub const DEFAULT_HOSTNAME_PREFIX: &str = "worker";

const HOSTNAME_SEPARATOR: &str = ",";

/// Builds `replicas` hostnames in ascending index order.
pub fn build_hostnames(prefix: &str, replicas: u32) -> Vec<String> {
    (0..replicas).map(|index| format!("{prefix}-{index}")).collect()
}

/// Joins a hostname list into the single value injected into containers.
pub fn join_hostnames(hostnames: &[String]) -> String {
    hostnames.join(HOSTNAME_SEPARATOR)
}

/// Replica count of a worker group as declared on the resource.
/// A missing or negative count yields an empty list.
pub fn replica_count(replicas: Option<i32>) -> u32 {
    replicas
        .and_then(|r| u32::try_from(r).ok())
        .unwrap_or_default()
}
