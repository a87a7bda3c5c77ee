use std::fmt::Debug;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use tis_core::errors::ErrorInfo;
use tis_core::{RngHandle, TisError};
use tracing::{debug, trace, warn};

use crate::sample::{ReplicaId, Sample};

/// Bound shared by every ensemble key.
pub trait EnsembleKey: Clone + Eq + Hash + Debug {}

impl<E> EnsembleKey for E where E: Clone + Eq + Hash + Debug {}

/// Values accepted by [`SampleSet::new`], [`SampleSet::extend`] and
/// [`SampleSet::apply_samples`]: a single sample, a sequence of samples or
/// another set.
pub trait IntoSamples<E, T> {
    /// Converts into an ordered list of samples.
    fn into_samples(self) -> Vec<Sample<E, T>>;
}

impl<E, T> IntoSamples<E, T> for Sample<E, T> {
    fn into_samples(self) -> Vec<Sample<E, T>> {
        vec![self]
    }
}

impl<E, T> IntoSamples<E, T> for Vec<Sample<E, T>> {
    fn into_samples(self) -> Vec<Sample<E, T>> {
        self
    }
}

impl<E: Clone, T: Clone> IntoSamples<E, T> for &[Sample<E, T>] {
    fn into_samples(self) -> Vec<Sample<E, T>> {
        self.to_vec()
    }
}

impl<E, T, const N: usize> IntoSamples<E, T> for [Sample<E, T>; N] {
    fn into_samples(self) -> Vec<Sample<E, T>> {
        self.into()
    }
}

impl<E, T> IntoSamples<E, T> for SampleSet<E, T> {
    fn into_samples(self) -> Vec<Sample<E, T>> {
        self.samples
    }
}

impl<E: Clone, T: Clone> IntoSamples<E, T> for &SampleSet<E, T> {
    fn into_samples(self) -> Vec<Sample<E, T>> {
        self.samples.clone()
    }
}

/// Samples of a path-sampling run indexed by ensemble and by replica.
///
/// `samples` keeps insertion order and holds no duplicate value. Both indexes
/// map each key present in `samples` to every sample using that key, in
/// insertion order, and drop a key as soon as its last sample is removed.
/// When several samples share a key, [`SampleSet::get_by_ensemble`] and
/// [`SampleSet::set_by_ensemble`] (and their replica counterparts) pick one
/// uniformly at random from the injected [`RngHandle`].
#[derive(Debug, Clone)]
pub struct SampleSet<E, T> {
    samples: Vec<Sample<E, T>>,
    ensemble_dict: IndexMap<E, Vec<Sample<E, T>>>,
    replica_dict: IndexMap<ReplicaId, Vec<Sample<E, T>>>,
    verify: bool,
}

impl<E: EnsembleKey, T: Clone + PartialEq> Default for SampleSet<E, T> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
            ensemble_dict: IndexMap::new(),
            replica_dict: IndexMap::new(),
            verify: false,
        }
    }
}

impl<E: EnsembleKey, T: Clone + PartialEq> SampleSet<E, T> {
    /// Builds a set by appending `samples` in order; exact duplicates collapse.
    pub fn new(samples: impl IntoSamples<E, T>) -> Self {
        let mut set = Self::default();
        for sample in samples.into_samples() {
            set.insert(sample);
        }
        set
    }

    /// Runs [`SampleSet::consistency_check`] after every mutation when enabled.
    pub fn verify_after_mutation(mut self, enabled: bool) -> Self {
        self.verify = enabled;
        self
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the set holds no sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether `sample` is stored.
    pub fn contains(&self, sample: &Sample<E, T>) -> bool {
        self.samples.contains(sample)
    }

    /// Iterates over the samples in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample<E, T>> {
        self.samples.iter()
    }

    /// Whether any sample uses `ensemble`.
    pub fn has_ensemble(&self, ensemble: &E) -> bool {
        self.ensemble_dict.contains_key(ensemble)
    }

    /// Whether any sample uses `replica`.
    pub fn has_replica(&self, replica: ReplicaId) -> bool {
        self.replica_dict.contains_key(&replica)
    }

    /// Distinct replicas in first-seen order.
    pub fn replica_list(&self) -> Vec<ReplicaId> {
        self.replica_dict.keys().copied().collect()
    }

    /// Distinct ensembles in first-seen order.
    pub fn ensemble_list(&self) -> Vec<&E> {
        self.ensemble_dict.keys().collect()
    }

    /// Every sample in `ensemble`, in insertion order.
    pub fn all_from_ensemble(&self, ensemble: &E) -> Vec<&Sample<E, T>> {
        self.samples
            .iter()
            .filter(|sample| sample.ensemble() == ensemble)
            .collect()
    }

    /// Every sample of `replica`, in insertion order.
    pub fn all_from_replica(&self, replica: ReplicaId) -> Vec<&Sample<E, T>> {
        self.samples
            .iter()
            .filter(|sample| sample.replica() == replica)
            .collect()
    }

    /// Returns the sample for `ensemble`, drawing uniformly if several exist.
    pub fn get_by_ensemble(
        &self,
        ensemble: &E,
        rng: &mut RngHandle,
    ) -> Result<&Sample<E, T>, TisError> {
        let bucket = self.ensemble_dict.get(ensemble).ok_or_else(|| {
            TisError::NotFound(
                ErrorInfo::new("ensemble-not-found", "no sample uses this ensemble")
                    .with_context("ensemble", format!("{ensemble:?}")),
            )
        })?;
        let chosen = pick(bucket, rng);
        trace!(ensemble = ?ensemble, replica = %chosen.replica(), "lookup by ensemble");
        Ok(chosen)
    }

    /// Returns the sample for `replica`, drawing uniformly if several exist.
    pub fn get_by_replica(
        &self,
        replica: ReplicaId,
        rng: &mut RngHandle,
    ) -> Result<&Sample<E, T>, TisError> {
        let bucket = self.replica_dict.get(&replica).ok_or_else(|| {
            TisError::NotFound(
                ErrorInfo::new("replica-not-found", "no sample uses this replica")
                    .with_context("replica", replica.as_raw().to_string()),
            )
        })?;
        let chosen = pick(bucket, rng);
        trace!(replica = %replica, ensemble = ?chosen.ensemble(), "lookup by replica");
        Ok(chosen)
    }

    /// Most recently inserted sample for `ensemble`.
    pub fn latest_by_ensemble(&self, ensemble: &E) -> Option<&Sample<E, T>> {
        self.ensemble_dict.get(ensemble).and_then(|bucket| bucket.last())
    }

    /// Most recently inserted sample for `replica`.
    pub fn latest_by_replica(&self, replica: ReplicaId) -> Option<&Sample<E, T>> {
        self.replica_dict.get(&replica).and_then(|bucket| bucket.last())
    }

    /// Makes `sample` the sample for `ensemble`.
    ///
    /// No-op if `sample` is already stored. Otherwise one existing sample of
    /// the ensemble, drawn uniformly, is removed and `sample` is appended.
    /// Fails without touching the set if `sample` belongs to another ensemble.
    pub fn set_by_ensemble(
        &mut self,
        ensemble: &E,
        sample: Sample<E, T>,
        rng: &mut RngHandle,
    ) -> Result<(), TisError> {
        if sample.ensemble() != ensemble {
            return Err(TisError::KeyMismatch(
                ErrorInfo::new("ensemble-mismatch", "sample belongs to another ensemble")
                    .with_context("key", format!("{ensemble:?}"))
                    .with_context("sample_ensemble", format!("{:?}", sample.ensemble())),
            ));
        }
        let replaced = match self.ensemble_dict.get(ensemble) {
            Some(bucket) if bucket.contains(&sample) => {
                trace!(ensemble = ?ensemble, "sample already present");
                return self.verified();
            }
            Some(bucket) => Some(pick(bucket, rng).clone()),
            None => None,
        };
        if let Some(dead) = replaced {
            self.remove(&dead);
            debug!(
                ensemble = ?ensemble,
                removed = %dead.replica(),
                inserted = %sample.replica(),
                "replaced sample by ensemble"
            );
        }
        self.insert(sample);
        self.verified()
    }

    /// Makes `sample` the sample for `replica`; see [`SampleSet::set_by_ensemble`].
    pub fn set_by_replica(
        &mut self,
        replica: ReplicaId,
        sample: Sample<E, T>,
        rng: &mut RngHandle,
    ) -> Result<(), TisError> {
        if sample.replica() != replica {
            return Err(TisError::KeyMismatch(
                ErrorInfo::new("replica-mismatch", "sample belongs to another replica")
                    .with_context("key", replica.as_raw().to_string())
                    .with_context("sample_replica", sample.replica().as_raw().to_string()),
            ));
        }
        let replaced = match self.replica_dict.get(&replica) {
            Some(bucket) if bucket.contains(&sample) => {
                trace!(replica = %replica, "sample already present");
                return self.verified();
            }
            Some(bucket) => Some(pick(bucket, rng).clone()),
            None => None,
        };
        if let Some(dead) = replaced {
            self.remove(&dead);
            debug!(
                replica = %replica,
                removed = ?dead.ensemble(),
                inserted = ?sample.ensemble(),
                "replaced sample by replica"
            );
        }
        self.insert(sample);
        self.verified()
    }

    /// Adds `sample` unless an equal sample is already stored.
    pub fn append(&mut self, sample: Sample<E, T>) -> Result<(), TisError> {
        if !self.insert(sample) {
            trace!("append skipped duplicate sample");
        }
        self.verified()
    }

    /// Appends every sample of `samples` in order.
    pub fn extend(&mut self, samples: impl IntoSamples<E, T>) -> Result<(), TisError> {
        for sample in samples.into_samples() {
            self.append(sample)?;
        }
        Ok(())
    }

    /// Removes `sample`; keys no remaining sample uses are dropped from the indexes.
    pub fn delete(&mut self, sample: &Sample<E, T>) -> Result<(), TisError> {
        if !self.remove(sample) {
            return Err(TisError::NotFound(
                ErrorInfo::new("sample-not-found", "sample is not part of the set")
                    .with_context("replica", sample.replica().as_raw().to_string())
                    .with_context("ensemble", format!("{:?}", sample.ensemble())),
            ));
        }
        debug!(
            replica = %sample.replica(),
            ensemble = ?sample.ensemble(),
            remaining = self.samples.len(),
            "deleted sample"
        );
        self.verified()
    }

    /// Returns a copy of the set with every sample of `samples` assigned by replica.
    pub fn apply_samples(
        &self,
        samples: impl IntoSamples<E, T>,
        rng: &mut RngHandle,
    ) -> Result<Self, TisError> {
        let mut next = self.clone();
        for sample in samples.into_samples() {
            next.set_by_replica(sample.replica(), sample, rng)?;
        }
        Ok(next)
    }

    /// Verifies that both indexes agree with the stored samples.
    ///
    /// A failure means a bug in a mutator, never a recoverable condition.
    pub fn consistency_check(&self) -> Result<(), TisError> {
        let ensembles: IndexSet<&E> = self.samples.iter().map(|s| s.ensemble()).collect();
        if ensembles.len() != self.ensemble_dict.len() {
            return Err(TisError::Consistency(
                ErrorInfo::new("ensemble-index-size", "ensemble index size differs")
                    .with_context("distinct", ensembles.len().to_string())
                    .with_context("indexed", self.ensemble_dict.len().to_string()),
            ));
        }
        let replicas: IndexSet<ReplicaId> = self.samples.iter().map(|s| s.replica()).collect();
        if replicas.len() != self.replica_dict.len() {
            return Err(TisError::Consistency(
                ErrorInfo::new("replica-index-size", "replica index size differs")
                    .with_context("distinct", replicas.len().to_string())
                    .with_context("indexed", self.replica_dict.len().to_string()),
            ));
        }

        let by_ensemble: usize = self.ensemble_dict.values().map(Vec::len).sum();
        if by_ensemble != self.samples.len() {
            return Err(TisError::Consistency(
                ErrorInfo::new("ensemble-index-count", "ensemble index count differs")
                    .with_context("indexed", by_ensemble.to_string())
                    .with_context("samples", self.samples.len().to_string()),
            ));
        }
        let by_replica: usize = self.replica_dict.values().map(Vec::len).sum();
        if by_replica != self.samples.len() {
            return Err(TisError::Consistency(
                ErrorInfo::new("replica-index-count", "replica index count differs")
                    .with_context("indexed", by_replica.to_string())
                    .with_context("samples", self.samples.len().to_string()),
            ));
        }

        for sample in &self.samples {
            let in_ensemble = self
                .ensemble_dict
                .get(sample.ensemble())
                .is_some_and(|bucket| bucket.contains(sample));
            let in_replica = self
                .replica_dict
                .get(&sample.replica())
                .is_some_and(|bucket| bucket.contains(sample));
            if !(in_ensemble && in_replica) {
                return Err(TisError::Consistency(
                    ErrorInfo::new("unindexed-sample", "sample missing from an index")
                        .with_context("replica", sample.replica().as_raw().to_string())
                        .with_context("ensemble", format!("{:?}", sample.ensemble())),
                ));
            }
        }

        let indexed = self
            .ensemble_dict
            .values()
            .chain(self.replica_dict.values())
            .flatten();
        for sample in indexed {
            if !self.samples.contains(sample) {
                return Err(TisError::Consistency(
                    ErrorInfo::new("stale-index-entry", "index refers to a removed sample")
                        .with_context("replica", sample.replica().as_raw().to_string()),
                ));
            }
        }

        for (idx, sample) in self.samples.iter().enumerate() {
            if self.samples[..idx].contains(sample) {
                return Err(TisError::Consistency(
                    ErrorInfo::new("duplicate-sample", "samples contain a duplicate")
                        .with_context("position", idx.to_string()),
                ));
            }
        }
        Ok(())
    }

    fn verified(&self) -> Result<(), TisError> {
        if !self.verify {
            return Ok(());
        }
        self.consistency_check().map_err(|err| {
            warn!(error = %err, "sample set failed consistency check");
            err
        })
    }

    fn insert(&mut self, sample: Sample<E, T>) -> bool {
        if self.samples.contains(&sample) {
            return false;
        }
        self.ensemble_dict
            .entry(sample.ensemble().clone())
            .or_default()
            .push(sample.clone());
        self.replica_dict
            .entry(sample.replica())
            .or_default()
            .push(sample.clone());
        self.samples.push(sample);
        true
    }

    fn remove(&mut self, sample: &Sample<E, T>) -> bool {
        let Some(position) = self.samples.iter().position(|s| s == sample) else {
            return false;
        };
        self.samples.remove(position);
        remove_from_bucket(&mut self.ensemble_dict, sample.ensemble(), sample);
        remove_from_bucket(&mut self.replica_dict, &sample.replica(), sample);
        true
    }
}

fn pick<'a, E, T>(bucket: &'a [Sample<E, T>], rng: &mut RngHandle) -> &'a Sample<E, T> {
    // buckets are never empty: keys are dropped with their last sample
    let idx = rng.choose_index(bucket.len()).unwrap_or(0);
    &bucket[idx]
}

fn remove_from_bucket<K, E, T>(
    index: &mut IndexMap<K, Vec<Sample<E, T>>>,
    key: &K,
    sample: &Sample<E, T>,
) where
    K: Eq + Hash,
    E: PartialEq,
    T: PartialEq,
{
    let emptied = match index.get_mut(key) {
        Some(bucket) => {
            if let Some(pos) = bucket.iter().position(|s| s == sample) {
                bucket.remove(pos);
            }
            bucket.is_empty()
        }
        None => false,
    };
    if emptied {
        index.shift_remove(key);
    }
}

impl<'a, E, T> IntoIterator for &'a SampleSet<E, T> {
    type Item = &'a Sample<E, T>;
    type IntoIter = std::slice::Iter<'a, Sample<E, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl<E, T> IntoIterator for SampleSet<E, T> {
    type Item = Sample<E, T>;
    type IntoIter = std::vec::IntoIter<Sample<E, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<E: EnsembleKey, T: Clone + PartialEq> FromIterator<Sample<E, T>> for SampleSet<E, T> {
    fn from_iter<I: IntoIterator<Item = Sample<E, T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(raw: u64) -> ReplicaId {
        ReplicaId::from_raw(raw)
    }

    fn fixture() -> SampleSet<&'static str, u32> {
        SampleSet::new(vec![
            Sample::new(rid(0), 10, "A"),
            Sample::new(rid(1), 11, "A"),
            Sample::new(rid(2), 12, "B"),
        ])
    }

    #[test]
    fn fresh_set_is_consistent() {
        assert!(fixture().consistency_check().is_ok());
        assert!(SampleSet::<&str, u32>::default().consistency_check().is_ok());
    }

    #[test]
    fn missing_ensemble_key_is_reported() {
        let mut set = fixture();
        set.ensemble_dict.shift_remove("B");
        assert_eq!(
            set.consistency_check().unwrap_err().code(),
            "ensemble-index-size"
        );
    }

    #[test]
    fn missing_replica_key_is_reported() {
        let mut set = fixture();
        set.replica_dict.shift_remove(&rid(0));
        assert_eq!(
            set.consistency_check().unwrap_err().code(),
            "replica-index-size"
        );
    }

    #[test]
    fn bucket_drift_is_reported() {
        let mut set = fixture();
        if let Some(bucket) = set.ensemble_dict.get_mut("A") {
            bucket.pop();
        }
        assert_eq!(
            set.consistency_check().unwrap_err().code(),
            "ensemble-index-count"
        );
    }

    #[test]
    fn replaced_bucket_entry_is_unindexed() {
        let mut set = fixture();
        let ghost = Sample::new(rid(0), 99, "A");
        if let Some(bucket) = set.ensemble_dict.get_mut("A") {
            bucket[0] = ghost.clone();
        }
        if let Some(bucket) = set.replica_dict.get_mut(&rid(0)) {
            bucket[0] = ghost;
        }
        assert_eq!(
            set.consistency_check().unwrap_err().code(),
            "unindexed-sample"
        );
    }

    #[test]
    fn stale_entry_is_reported() {
        let mut set = fixture();
        let dup = set.samples[2].clone();
        set.samples.push(dup);
        let ghost = Sample::new(rid(2), 77, "B");
        set.ensemble_dict.entry("B").or_default().push(ghost.clone());
        set.replica_dict.entry(rid(2)).or_default().push(ghost);
        let err = set.consistency_check().unwrap_err();
        assert_eq!(err.code(), "stale-index-entry");
        assert_eq!(err.info().context.get("replica"), Some(&"2".to_string()));
    }

    #[test]
    fn duplicate_samples_are_reported() {
        let mut set = fixture();
        let dup = set.samples[2].clone();
        set.samples.push(dup.clone());
        set.ensemble_dict.entry("B").or_default().push(dup.clone());
        set.replica_dict.entry(dup.replica()).or_default().push(dup);
        assert_eq!(
            set.consistency_check().unwrap_err().code(),
            "duplicate-sample"
        );
    }

    #[test]
    fn verification_surfaces_corruption_on_mutation() {
        let mut set = fixture().verify_after_mutation(true);
        set.replica_dict.shift_remove(&rid(1));
        let err = set.append(Sample::new(rid(3), 13, "C")).unwrap_err();
        assert!(matches!(err, TisError::Consistency(_)));

        let mut unchecked = fixture();
        unchecked.replica_dict.shift_remove(&rid(1));
        assert!(unchecked.append(Sample::new(rid(3), 13, "C")).is_ok());
    }

    #[test]
    fn delete_drops_emptied_keys_only() {
        let mut set = fixture();
        set.delete(&Sample::new(rid(0), 10, "A")).unwrap();
        assert_eq!(set.ensemble_dict.get("A").map(Vec::len), Some(1));
        assert!(!set.replica_dict.contains_key(&rid(0)));
        set.consistency_check().unwrap();
    }
}
