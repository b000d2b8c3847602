//! In-memory worker index registry
//!
//! Assignments live for the lifetime of the process. A restart of the webhook
//! starts every node pool from index 0 again.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use tracing::debug;

use super::types::SliceKey;
use super::types::WorkerIndex;

/// Result of [`IdentityRegistry::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub index: WorkerIndex,
    /// `false` when the key already had an index, e.g. on an admission retry
    pub newly_assigned: bool,
}

#[derive(Debug, Default)]
struct RegistryState {
    assigned: HashMap<SliceKey, WorkerIndex>,
    /// Next index to hand out, per node pool
    next_index: HashMap<String, u32>,
}

/// Process-wide registry of worker indices.
///
/// Both maps sit behind one mutex so that the check for an existing
/// assignment and the counter increment happen as a single step. Two
/// different pods in the same node pool can never observe the same counter
/// value, and racing retries of one pod converge on one index.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    state: Mutex<RegistryState>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the worker index of `key`, assigning the next free index of
    /// its node pool if the key has not been seen before.
    pub fn allocate(&self, key: &SliceKey) -> Allocation {
        let mut state = self.lock();

        if let Some(&index) = state.assigned.get(key) {
            debug!(slice_key = %key, index = %index, "Reusing worker index");
            return Allocation {
                index,
                newly_assigned: false,
            };
        }

        let next = state
            .next_index
            .entry(key.node_pool().to_owned())
            .or_insert(0);
        let index = WorkerIndex::new(*next);
        *next += 1;
        state.assigned.insert(key.clone(), index);

        Allocation {
            index,
            newly_assigned: true,
        }
    }

    /// Returns the existing assignment of `key` without allocating.
    pub fn lookup(&self, key: &SliceKey) -> Option<WorkerIndex> {
        self.lock().assigned.get(key).copied()
    }

    /// Number of indices handed out so far in `node_pool`.
    pub fn assigned_count(&self, node_pool: &str) -> u32 {
        self.lock()
            .next_index
            .get(node_pool)
            .copied()
            .unwrap_or_default()
    }

    // Every critical section leaves the maps consistent, so a poisoned lock
    // still guards valid state.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
