use std::fmt;

/// Position of a worker inside its pod slice, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct WorkerIndex(u32);

impl WorkerIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Identifies one worker pod within a pod slice.
///
/// The node pool is the physical TPU slice; the name prefix is the
/// `generateName` the Ray operator fixes before creating the pod, so every
/// admission retry of the same pod derives the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SliceKey {
    node_pool: String,
    name_prefix: String,
}

impl SliceKey {
    pub fn new(node_pool: impl Into<String>, name_prefix: impl Into<String>) -> Self {
        Self {
            node_pool: node_pool.into(),
            name_prefix: name_prefix.into(),
        }
    }

    pub fn node_pool(&self) -> &str {
        &self.node_pool
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }
}

impl fmt::Display for SliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.node_pool, self.name_prefix)
    }
}
