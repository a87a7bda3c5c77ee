#![deny(missing_docs)]

//! Replica/ensemble bookkeeping for path-sampling runs.

/// YAML configuration schema and seeding policy.
pub mod config;
/// Samples and replica identifiers.
pub mod sample;
/// Doubly indexed sample collection.
pub mod sampleset;

pub use config::{SampleSetConfig, SeedPolicy};
pub use sample::{ReplicaId, Sample};
pub use sampleset::{EnsembleKey, IntoSamples, SampleSet};
