use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one replica (parallel walker) in a sampling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReplicaId(u64);

impl ReplicaId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ReplicaId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "replica-{}", self.0)
    }
}

/// Immutable association of a trajectory with a replica and an ensemble.
///
/// Two samples are interchangeable when all three parts compare equal.
/// Samples are cloned into the indexes of a
/// [`SampleSet`](crate::SampleSet), so large trajectories should be shared
/// (e.g. `Arc<Trajectory>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample<E, T> {
    replica: ReplicaId,
    trajectory: T,
    ensemble: E,
}

impl<E, T> Sample<E, T> {
    /// Creates a sample.
    pub fn new(replica: impl Into<ReplicaId>, trajectory: T, ensemble: E) -> Self {
        Self {
            replica: replica.into(),
            trajectory,
            ensemble,
        }
    }

    /// Replica carrying the trajectory.
    pub fn replica(&self) -> ReplicaId {
        self.replica
    }

    /// Sampled trajectory.
    pub fn trajectory(&self) -> &T {
        &self.trajectory
    }

    /// Ensemble the trajectory was sampled in.
    pub fn ensemble(&self) -> &E {
        &self.ensemble
    }
}
