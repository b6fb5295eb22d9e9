use modcalc_engine::{
    ComparisonMode, LevelVector, MAX_ENHANCEMENTS, MAX_LEVEL, SLOT_COUNT, StrengthenOptions,
    compute,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const MODES: [ComparisonMode; 2] = [
    ComparisonMode::PositionWise,
    ComparisonMode::OrderIndependent,
];

/// Counts by walking every slot sequence directly instead of the engine's
/// tree search.
///
/// A sequence is reachable when no slot is picked more often than its
/// headroom. If the combined headroom is below the budget every run maxes
/// out early, so only sequences that spend the headroom exactly are
/// walked, each charged once per wasted upgrade.
fn oracle(initial: [u8; SLOT_COUNT], target: [u8; SLOT_COUNT], mode: ComparisonMode) -> (u64, u64) {
    let headroom: Vec<usize> = initial.iter().map(|&l| usize::from(MAX_LEVEL - l)).collect();
    let total_headroom: usize = headroom.iter().sum();
    let (length, weight) = if total_headroom < MAX_ENHANCEMENTS {
        (total_headroom, (MAX_ENHANCEMENTS - total_headroom) as u64)
    } else {
        (MAX_ENHANCEMENTS, 1)
    };

    let mut successful = 0;
    let mut total = 0;
    let sequences = SLOT_COUNT.pow(u32::try_from(length).unwrap());
    for code in 0..sequences {
        let mut counts = [0usize; SLOT_COUNT];
        let mut rest = code;
        for _ in 0..length {
            counts[rest % SLOT_COUNT] += 1;
            rest /= SLOT_COUNT;
        }
        if counts.iter().zip(&headroom).any(|(c, h)| c > h) {
            continue;
        }
        let mut finals = initial;
        for (level, count) in finals.iter_mut().zip(counts) {
            *level += u8::try_from(count).unwrap();
        }
        total += weight;
        if meets(finals, target, mode) {
            successful += weight;
        }
    }
    (successful, total)
}

fn meets(mut current: [u8; SLOT_COUNT], mut target: [u8; SLOT_COUNT], mode: ComparisonMode) -> bool {
    if mode == ComparisonMode::OrderIndependent {
        current.sort_unstable();
        current.reverse();
        target.sort_unstable();
        target.reverse();
    }
    current.iter().zip(target.iter()).all(|(c, t)| c >= t)
}

fn engine(initial: [u8; SLOT_COUNT], target: [u8; SLOT_COUNT], mode: ComparisonMode) -> (u64, u64) {
    let outcome = compute(
        &LevelVector::new(initial).unwrap(),
        &LevelVector::new(target).unwrap(),
        StrengthenOptions::new(mode),
    )
    .unwrap();
    assert!(outcome.successful_outcomes <= outcome.total_outcomes);
    assert!((0.0..=1.0).contains(&outcome.probability));
    (outcome.successful_outcomes, outcome.total_outcomes)
}

fn random_pair(rng: &mut ChaCha8Rng) -> ([u8; SLOT_COUNT], [u8; SLOT_COUNT]) {
    let mut initial = [1u8; SLOT_COUNT];
    let mut target = [1u8; SLOT_COUNT];
    for slot in 0..SLOT_COUNT {
        initial[slot] = rng.gen_range(1..=MAX_LEVEL);
        target[slot] = rng.gen_range(initial[slot]..=MAX_LEVEL);
    }
    (initial, target)
}

#[test]
fn engine_matches_oracle_on_sampled_pairs() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0DD5);
    for _ in 0..250 {
        let (initial, target) = random_pair(&mut rng);
        for mode in MODES {
            assert_eq!(
                engine(initial, target, mode),
                oracle(initial, target, mode),
                "mismatch for {initial:?} -> {target:?} ({mode})"
            );
        }
    }
}

#[test]
fn engine_matches_oracle_near_the_level_cap() {
    // Every initial vector with at most one slot below the cap exercises
    // the stalled shortcut.
    for low_slot in 0..SLOT_COUNT {
        for low_level in 1..=MAX_LEVEL {
            let mut initial = [MAX_LEVEL; SLOT_COUNT];
            initial[low_slot] = low_level;
            let target = [MAX_LEVEL; SLOT_COUNT];
            for mode in MODES {
                assert_eq!(engine(initial, target, mode), oracle(initial, target, mode));
            }
        }
    }
}

#[test]
fn surjection_scenario_matches_oracle_exactly() {
    let initial = [1, 1, 1, 1];
    let target = [2, 2, 2, 2];
    let expected = oracle(initial, target, ComparisonMode::PositionWise);
    assert_eq!(expected, (240, 1020));
    assert_eq!(engine(initial, target, ComparisonMode::PositionWise), expected);
}

#[test]
fn relaxed_mode_is_never_stricter() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..100 {
        let (initial, target) = random_pair(&mut rng);
        let (strict, total_strict) = engine(initial, target, ComparisonMode::PositionWise);
        let (relaxed, total_relaxed) = engine(initial, target, ComparisonMode::OrderIndependent);
        assert_eq!(total_strict, total_relaxed);
        assert!(relaxed >= strict, "{initial:?} -> {target:?}");
    }
}

#[test]
fn reaching_own_start_is_certain() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..50 {
        let (initial, _) = random_pair(&mut rng);
        let (successful, total) = engine(initial, initial, ComparisonMode::PositionWise);
        assert_eq!(successful, total);
    }
}
