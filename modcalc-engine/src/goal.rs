//! Goal evaluation for strengthen outcomes.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::SLOT_COUNT;
use crate::levels::LevelVector;

/// How a finished level vector is compared against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Every slot must reach the target level of the same slot.
    PositionWise,
    /// Both vectors are sorted highest-first and compared rank by rank, so
    /// any slot may cover any target level.
    #[default]
    OrderIndependent,
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonMode::PositionWise => write!(f, "position-wise"),
            ComparisonMode::OrderIndependent => write!(f, "order-independent"),
        }
    }
}

/// Whether `current` meets `target` under `mode`.
///
/// `OrderIndependent` is deliberately the rank-wise check on independently
/// sorted vectors; reported probabilities are defined against it.
#[must_use]
pub fn satisfies(current: &LevelVector, target: &LevelVector, mode: ComparisonMode) -> bool {
    match mode {
        ComparisonMode::PositionWise => (0..SLOT_COUNT).all(|slot| current[slot] >= target[slot]),
        ComparisonMode::OrderIndependent => {
            let current = current.sorted_descending();
            let target = target.sorted_descending();
            current.iter().zip(target.iter()).all(|(have, need)| have >= need)
        }
    }
}
