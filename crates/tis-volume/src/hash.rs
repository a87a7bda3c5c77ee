use sha2::{Digest, Sha256};

use crate::descriptor::VolumeDescriptor;
use crate::lambda::PeriodicDomain;
use crate::volume::Volume;

/// Computes the canonical structural hash of a volume tree.
///
/// Structurally identical trees hash equally regardless of node identity.
/// Operand order is significant.
pub fn canonical_hash<S: ?Sized>(volume: &Volume<S>) -> String {
    let mut hasher = Sha256::new();
    encode_descriptor(&volume.describe(), &mut hasher);
    format!("{:x}", hasher.finalize())
}

// Every tag and name is length-prefixed so no encoding is a prefix of another.
fn encode_descriptor(descriptor: &VolumeDescriptor, hasher: &mut Sha256) {
    match descriptor {
        VolumeDescriptor::Empty => encode_str("empty", hasher),
        VolumeDescriptor::Full => encode_str("full", hasher),
        VolumeDescriptor::Negated { inner } => {
            encode_str("not", hasher);
            encode_descriptor(inner, hasher);
        }
        VolumeDescriptor::Combination { op, left, right } => {
            encode_str("comb", hasher);
            encode_str(op.as_str(), hasher);
            encode_descriptor(left, hasher);
            encode_descriptor(right, hasher);
        }
        VolumeDescriptor::Lambda {
            orderparameter,
            lambda_min,
            lambda_max,
        } => {
            encode_str("lambda", hasher);
            encode_str(orderparameter, hasher);
            encode_f64(*lambda_min, hasher);
            encode_f64(*lambda_max, hasher);
        }
        VolumeDescriptor::LambdaPeriodic {
            orderparameter,
            lambda_min,
            lambda_max,
            period,
        } => {
            encode_str("lambda-periodic", hasher);
            encode_str(orderparameter, hasher);
            encode_f64(*lambda_min, hasher);
            encode_f64(*lambda_max, hasher);
            encode_period(period.as_ref(), hasher);
        }
        VolumeDescriptor::Voronoi {
            orderparameter,
            state,
        } => {
            encode_str("voronoi", hasher);
            encode_str(orderparameter, hasher);
            hasher.update((*state as u64).to_le_bytes());
        }
    }
}

fn encode_period(period: Option<&PeriodicDomain>, hasher: &mut Sha256) {
    match period {
        Some(domain) => {
            encode_str("period-some", hasher);
            encode_f64(domain.shift, hasher);
            encode_f64(domain.len, hasher);
        }
        None => encode_str("period-none", hasher),
    }
}

fn encode_str(value: &str, hasher: &mut Sha256) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn encode_f64(value: f64, hasher: &mut Sha256) {
    hasher.update(value.to_bits().to_le_bytes());
}
