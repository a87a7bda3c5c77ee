use tis_core::RngHandle;
use tis_sample::{ReplicaId, Sample, SampleSet, SeedPolicy};

fn crowded() -> SampleSet<char, u32> {
    (0..8u64)
        .map(|raw| Sample::new(ReplicaId::from_raw(raw), raw as u32, 'A'))
        .collect()
}

fn draws(rng: &mut RngHandle) -> Vec<ReplicaId> {
    let set = crowded();
    (0..32)
        .map(|_| set.get_by_ensemble(&'A', rng).map(Sample::replica))
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn same_seed_gives_same_picks() {
    let first = draws(&mut RngHandle::from_seed(11));
    let second = draws(&mut RngHandle::from_seed(11));
    assert_eq!(first, second);
}

#[test]
fn substreams_are_independent() {
    let policy = SeedPolicy::default();
    let a = draws(&mut policy.rng(0));
    let b = draws(&mut policy.rng(1));
    assert_ne!(a, b);
    assert_eq!(a, draws(&mut policy.rng(0)));
}

#[test]
fn picks_cover_the_bucket() {
    let set = crowded();
    let mut rng = RngHandle::from_seed(3);
    let mut seen = [false; 8];
    for _ in 0..512 {
        let picked = set.get_by_ensemble(&'A', &mut rng).unwrap();
        seen[picked.replica().as_raw() as usize] = true;
    }
    assert!(seen.iter().all(|hit| *hit));
}

#[test]
fn replacement_is_reproducible() {
    let run = |seed: u64| {
        let mut set = crowded();
        let mut rng = RngHandle::from_seed(seed);
        for raw in 100..110u64 {
            let sample = Sample::new(ReplicaId::from_raw(raw), raw as u32, 'A');
            set.set_by_ensemble(&'A', sample, &mut rng).unwrap();
        }
        set.replica_list()
    };
    assert_eq!(run(5), run(5));
    assert_eq!(run(5).len(), 8);
}

fn replica_mates() -> SampleSet<char, u32> {
    ['A', 'B', 'C']
        .into_iter()
        .enumerate()
        .map(|(idx, ensemble)| Sample::new(ReplicaId::from_raw(0), idx as u32, ensemble))
        .collect()
}

fn removed_by_replica(seed: u64) -> char {
    let mut set = replica_mates();
    let mut rng = RngHandle::from_seed(seed);
    let incoming = Sample::new(ReplicaId::from_raw(0), 99, 'D');
    set.set_by_replica(ReplicaId::from_raw(0), incoming.clone(), &mut rng).unwrap();
    assert_eq!(set.len(), 3);
    assert!(set.contains(&incoming));
    set.consistency_check().unwrap();
    let survivors: Vec<char> = set.ensemble_list().into_iter().copied().collect();
    let removed: Vec<char> = ['A', 'B', 'C']
        .into_iter()
        .filter(|ensemble| !survivors.contains(ensemble))
        .collect();
    assert_eq!(removed.len(), 1);
    removed[0]
}

#[test]
fn replica_replacement_is_reproducible() {
    for seed in [0, 17, 4242] {
        assert_eq!(removed_by_replica(seed), removed_by_replica(seed));
    }
}

#[test]
fn replica_replacement_reaches_every_mate() {
    let mut counts = [0usize; 3];
    for seed in 0..300 {
        let removed = removed_by_replica(seed);
        counts[(removed as u8 - b'A') as usize] += 1;
    }
    assert!(counts.iter().all(|&count| count > 50), "{counts:?}");
}
