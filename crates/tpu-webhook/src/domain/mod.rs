//! Worker identity assignment for TPU pod slices.
//!
//! The components, leaf first:
//! - [`IdentityRegistry`]: process-wide map from [`SliceKey`] to [`WorkerIndex`]
//!   plus the per node pool counter, behind a single mutex
//! - [`hostnames`]: the ordered peer hostname list of a worker group
//! - [`patch`]: JSON Patch operations injecting env variables into containers
//! - [`WorkerIdentityMutator`]: ties the above together for pods and RayClusters

pub mod error;
pub mod hostnames;
pub mod mutation;
pub mod patch;
pub mod slice;

pub use error::MutationError;
pub use mutation::MutationConfig;
pub use mutation::PodMutation;
pub use mutation::WorkerIdentityMutator;
pub use slice::Allocation;
pub use slice::IdentityRegistry;
pub use slice::SliceKey;
pub use slice::WorkerIndex;
