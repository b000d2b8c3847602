mod registry;
mod types;

pub use registry::Allocation;
pub use registry::IdentityRegistry;
pub use types::SliceKey;
pub use types::WorkerIndex;
