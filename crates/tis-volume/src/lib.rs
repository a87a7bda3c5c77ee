#![deny(missing_docs)]

//! Composable phase-space volumes for defining states and interfaces.
//!
//! A [`Volume`] is an immutable predicate over snapshots. Leaves test an
//! order parameter against an interval ([`LambdaVolume`],
//! [`LambdaVolumePeriodic`]) or a Voronoi cell ([`VoronoiVolume`]); the set
//! operators `|`, `&`, `^`, `-` and `!` combine them, simplifying around the
//! `Empty`/`Full` sentinels and identical operands.

mod algebra;
mod config;
mod descriptor;
mod factory;
mod hash;
mod lambda;
mod volume;
mod voronoi;

pub use config::InterfaceSetConfig;
pub use descriptor::{descriptor_from_json, descriptor_to_json, VolumeDescriptor};
pub use factory::VolumeFactory;
pub use hash::canonical_hash;
pub use lambda::{LambdaVolume, LambdaVolumePeriodic, PeriodicDomain};
pub use volume::{BoolOp, Combination, Volume, VolumeKind, VolumeNode};
pub use voronoi::VoronoiVolume;
