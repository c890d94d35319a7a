pub mod hash;
pub mod jobs;
pub mod legacy;
pub mod memory;

pub use hash::content_hash;
pub use jobs::{JobRepository, JobRepositoryTrait};
pub use legacy::LegacyJobRepository;
pub use memory::InMemoryJobRepository;

#[cfg(test)]
pub use jobs::MockJobRepositoryTrait;
