//! Exact strengthen odds by exhaustive enumeration.
//!
//! A strengthen run applies [`MAX_ENHANCEMENTS`] upgrades, each landing on
//! one of the slots that is not yet maxed, every candidate being equally
//! likely. The engine walks the full tree of those choices depth-first,
//! classifies every leaf against the target, and tallies the results.
//!
//! When every slot is maxed before the budget runs out, the remaining
//! upgrades are wasted. Each wasted upgrade still counts as its own outcome
//! with the classification of the stalled vector; the engine charges them
//! in one step instead of recursing through no-op choices.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::MAX_ENHANCEMENTS;
use crate::goal::{ComparisonMode, satisfies};
use crate::levels::{LevelError, LevelVector, check_reachable, validate_pair};
use crate::numbers::{ratio, to_percent};

/// Steps along one branch, never more than the upgrade budget.
pub type StepTrail = SmallVec<[UpgradeStep; MAX_ENHANCEMENTS]>;

/// One upgrade applied during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStep {
    /// 1-based position of the upgrade within the run.
    pub step: usize,
    /// 0-based slot that received the upgrade.
    pub slot: usize,
    pub new_level: u8,
}

/// A complete branch of the upgrade tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradePath {
    pub success: bool,
    pub final_levels: LevelVector,
    /// Shorter than the budget when the run stalled on maxed slots.
    pub steps: StepTrail,
}

impl UpgradePath {
    #[must_use]
    pub fn stalled(&self) -> bool {
        self.steps.len() < MAX_ENHANCEMENTS
    }
}

/// Knobs for a strengthen computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthenOptions {
    pub mode: ComparisonMode,
    /// Record every enumerated branch in the outcome.
    pub retain_paths: bool,
    /// Stop recording branches past this many; counts are unaffected.
    #[serde(default)]
    pub path_limit: Option<usize>,
}

impl StrengthenOptions {
    #[must_use]
    pub const fn new(mode: ComparisonMode) -> Self {
        Self {
            mode,
            retain_paths: false,
            path_limit: None,
        }
    }

    #[must_use]
    pub const fn with_paths(mut self, path_limit: Option<usize>) -> Self {
        self.retain_paths = true;
        self.path_limit = path_limit;
        self
    }
}

/// Aggregate result of enumerating every upgrade sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthenOutcome {
    pub initial: LevelVector,
    pub target: LevelVector,
    pub mode: ComparisonMode,
    pub successful_outcomes: u64,
    pub total_outcomes: u64,
    pub probability: f64,
    pub probability_percent: f64,
    /// Present only when path retention was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<UpgradePath>>,
}

impl StrengthenOutcome {
    #[must_use]
    pub const fn failed_outcomes(&self) -> u64 {
        self.total_outcomes - self.successful_outcomes
    }

    pub fn successful_paths(&self) -> impl Iterator<Item = &UpgradePath> {
        self.paths.iter().flatten().filter(|path| path.success)
    }

    pub fn failed_paths(&self) -> impl Iterator<Item = &UpgradePath> {
        self.paths.iter().flatten().filter(|path| !path.success)
    }
}

/// Running totals threaded through one traversal.
struct Tally {
    successful: u64,
    total: u64,
    paths: Option<Vec<UpgradePath>>,
    path_limit: Option<usize>,
}

impl Tally {
    fn new(options: &StrengthenOptions) -> Self {
        Self {
            successful: 0,
            total: 0,
            paths: options.retain_paths.then(Vec::new),
            path_limit: options.path_limit,
        }
    }

    const fn retains_paths(&self) -> bool {
        self.paths.is_some()
    }

    /// Count `outcomes` leaves that share one classification.
    fn record(&mut self, outcomes: usize, success: bool, levels: LevelVector, trail: &StepTrail) {
        let outcomes = outcomes as u64;
        self.total += outcomes;
        if success {
            self.successful += outcomes;
        }

        let limit = self.path_limit;
        if let Some(paths) = self.paths.as_mut() {
            for _ in 0..outcomes {
                if limit.is_some_and(|cap| paths.len() >= cap) {
                    break;
                }
                paths.push(UpgradePath {
                    success,
                    final_levels: levels,
                    steps: trail.clone(),
                });
            }
        }
    }
}

struct Search {
    target: LevelVector,
    mode: ComparisonMode,
}

impl Search {
    fn explore(&self, levels: LevelVector, used: usize, trail: &StepTrail, tally: &mut Tally) {
        if used >= MAX_ENHANCEMENTS {
            let success = satisfies(&levels, &self.target, self.mode);
            tally.record(1, success, levels, trail);
            return;
        }

        let slots = levels.upgradeable_slots();
        if slots.is_empty() {
            let remaining = MAX_ENHANCEMENTS - used;
            let success = satisfies(&levels, &self.target, self.mode);
            log::trace!("stalled at {levels} after {used} upgrades, charging {remaining} outcomes");
            tally.record(remaining, success, levels, trail);
            return;
        }

        for slot in slots {
            let Some(next) = levels.upgraded(slot) else {
                continue;
            };
            let mut branch = StepTrail::new();
            if tally.retains_paths() {
                branch.clone_from(trail);
                branch.push(UpgradeStep {
                    step: used + 1,
                    slot,
                    new_level: next[slot],
                });
            }
            self.explore(next, used + 1, &branch, tally);
        }
    }
}

/// Enumerate every upgrade sequence for an already-validated pair.
///
/// Each call builds its own tally, so repeated calls with the same inputs
/// return identical outcomes.
#[must_use]
pub fn compute_validated(
    initial: LevelVector,
    target: LevelVector,
    options: StrengthenOptions,
) -> StrengthenOutcome {
    log::debug!(
        "strengthen odds: initial={initial} target={target} mode={} paths={}",
        options.mode,
        options.retain_paths
    );

    let search = Search {
        target,
        mode: options.mode,
    };
    let mut tally = Tally::new(&options);
    search.explore(initial, 0, &StepTrail::new(), &mut tally);

    let probability = ratio(tally.successful, tally.total);
    log::debug!(
        "strengthen odds: {}/{} successful ({probability:.6})",
        tally.successful,
        tally.total
    );

    StrengthenOutcome {
        initial,
        target,
        mode: options.mode,
        successful_outcomes: tally.successful,
        total_outcomes: tally.total,
        probability,
        probability_percent: to_percent(probability),
        paths: tally.paths,
    }
}

/// Enumerate every upgrade sequence from `initial` and score it against
/// `target`.
///
/// # Errors
///
/// Returns [`LevelError::UnreachableTarget`] when a target slot is below its
/// initial level; no enumeration happens in that case.
pub fn compute(
    initial: &LevelVector,
    target: &LevelVector,
    options: StrengthenOptions,
) -> Result<StrengthenOutcome, LevelError> {
    check_reachable(initial, target)?;
    Ok(compute_validated(*initial, *target, options))
}

/// Validate raw level lists, then enumerate.
///
/// # Errors
///
/// Returns [`LevelError::InvalidLevelVector`] for malformed input and
/// [`LevelError::UnreachableTarget`] for a target below the initial levels.
pub fn compute_raw(
    initial: &[i64],
    target: &[i64],
    options: StrengthenOptions,
) -> Result<StrengthenOutcome, LevelError> {
    let (initial, target) = validate_pair(initial, target)?;
    Ok(compute_validated(initial, target, options))
}
