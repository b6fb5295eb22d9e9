//! Affix level vectors and input validation.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{MAX_LEVEL, MIN_LEVEL, SLOT_COUNT};

/// Upgradeable slot indices, never more than [`SLOT_COUNT`].
pub type SlotList = SmallVec<[usize; SLOT_COUNT]>;

/// Which side of a strengthen request a vector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorRole {
    Initial,
    Target,
}

impl fmt::Display for VectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorRole::Initial => write!(f, "initial"),
            VectorRole::Target => write!(f, "target"),
        }
    }
}

/// Why a raw list of levels is not a valid [`LevelVector`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LevelIssue {
    #[error("expected {expected} slot levels, got {found}")]
    Length { expected: usize, found: usize },
    #[error("slot {} is {value}, outside {min}..={max}", .slot + 1)]
    OutOfRange {
        slot: usize,
        value: i64,
        min: u8,
        max: u8,
    },
    #[error("slot {} value {token:?} is not a whole number", .slot + 1)]
    NotANumber { slot: usize, token: String },
}

/// Errors raised before any enumeration starts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("invalid {role} levels: {issue}")]
    InvalidLevelVector { role: VectorRole, issue: LevelIssue },
    #[error(
        "target level {target} for slot {} is below the initial level {initial}",
        .slot + 1
    )]
    UnreachableTarget { slot: usize, initial: u8, target: u8 },
}

impl LevelError {
    const fn invalid(role: VectorRole, issue: LevelIssue) -> Self {
        Self::InvalidLevelVector { role, issue }
    }
}

/// Levels of the four affix slots, each within `MIN_LEVEL..=MAX_LEVEL`.
///
/// Only the validating constructors build one, so every value in
/// circulation already satisfies the range invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>")]
pub struct LevelVector([u8; SLOT_COUNT]);

impl LevelVector {
    /// Build a vector from already-typed levels.
    ///
    /// # Errors
    ///
    /// Returns [`LevelIssue::OutOfRange`] when any level is outside the
    /// allowed range.
    pub fn new(levels: [u8; SLOT_COUNT]) -> Result<Self, LevelIssue> {
        for (slot, &level) in levels.iter().enumerate() {
            check_range(slot, i64::from(level))?;
        }
        Ok(Self(levels))
    }

    /// Build a vector from loosely typed input, such as parsed CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`LevelIssue::Length`] when the slice does not hold exactly
    /// [`SLOT_COUNT`] values and [`LevelIssue::OutOfRange`] for any level
    /// outside the allowed range.
    pub fn from_slice(values: &[i64]) -> Result<Self, LevelIssue> {
        if values.len() != SLOT_COUNT {
            return Err(LevelIssue::Length {
                expected: SLOT_COUNT,
                found: values.len(),
            });
        }
        let mut levels = [MIN_LEVEL; SLOT_COUNT];
        for (slot, &value) in values.iter().enumerate() {
            levels[slot] = check_range(slot, value)?;
        }
        Ok(Self(levels))
    }

    #[must_use]
    pub const fn levels(&self) -> [u8; SLOT_COUNT] {
        self.0
    }

    #[must_use]
    pub fn is_maxed(&self, slot: usize) -> bool {
        self.0.get(slot).is_none_or(|&level| level >= MAX_LEVEL)
    }

    /// Slots that can still take an upgrade, in ascending index order.
    #[must_use]
    pub fn upgradeable_slots(&self) -> SlotList {
        (0..SLOT_COUNT).filter(|&slot| !self.is_maxed(slot)).collect()
    }

    /// True once every slot sits at [`MAX_LEVEL`].
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        (0..SLOT_COUNT).all(|slot| self.is_maxed(slot))
    }

    /// Total upgrades still possible before the vector stalls.
    #[must_use]
    pub fn headroom(&self) -> usize {
        self.0
            .iter()
            .map(|&level| usize::from(MAX_LEVEL.saturating_sub(level)))
            .sum()
    }

    /// Copy of this vector with `slot` raised by one level.
    ///
    /// Returns `None` when the slot is already maxed or out of bounds.
    #[must_use]
    pub fn upgraded(&self, slot: usize) -> Option<Self> {
        if self.is_maxed(slot) {
            return None;
        }
        let mut next = self.0;
        next[slot] += 1;
        Some(Self(next))
    }

    /// Levels sorted from highest to lowest.
    #[must_use]
    pub fn sorted_descending(&self) -> [u8; SLOT_COUNT] {
        let mut sorted = self.0;
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted
    }
}

fn check_range(slot: usize, value: i64) -> Result<u8, LevelIssue> {
    u8::try_from(value)
        .ok()
        .filter(|level| (MIN_LEVEL..=MAX_LEVEL).contains(level))
        .ok_or(LevelIssue::OutOfRange {
            slot,
            value,
            min: MIN_LEVEL,
            max: MAX_LEVEL,
        })
}

impl Index<usize> for LevelVector {
    type Output = u8;

    fn index(&self, slot: usize) -> &Self::Output {
        &self.0[slot]
    }
}

impl TryFrom<&[i64]> for LevelVector {
    type Error = LevelIssue;

    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        Self::from_slice(values)
    }
}

impl TryFrom<Vec<i64>> for LevelVector {
    type Error = LevelIssue;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl FromStr for LevelVector {
    type Err = LevelIssue;

    /// Accepts `1,2,3,1`, `1 2 3 1` or `[1, 2, 3, 1]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
        let values = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .enumerate()
            .map(|(slot, token)| {
                token.parse::<i64>().map_err(|_| LevelIssue::NotANumber {
                    slot,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_slice(&values)
    }
}

impl fmt::Display for LevelVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{a}, {b}, {c}, {d}]")
    }
}

/// Confirm every target slot is at or above its initial level.
///
/// # Errors
///
/// Returns [`LevelError::UnreachableTarget`] for the first slot whose target
/// is below its initial level.
pub fn check_reachable(initial: &LevelVector, target: &LevelVector) -> Result<(), LevelError> {
    for slot in 0..SLOT_COUNT {
        if target[slot] < initial[slot] {
            return Err(LevelError::UnreachableTarget {
                slot,
                initial: initial[slot],
                target: target[slot],
            });
        }
    }
    Ok(())
}

/// Validate a raw initial/target pair.
///
/// Shape and range checks for both vectors run before the reachability
/// check, so a malformed target is always reported as invalid rather than
/// unreachable.
///
/// # Errors
///
/// Returns [`LevelError::InvalidLevelVector`] for a malformed vector and
/// [`LevelError::UnreachableTarget`] when a target slot is below its
/// initial level.
pub fn validate_pair(
    initial: &[i64],
    target: &[i64],
) -> Result<(LevelVector, LevelVector), LevelError> {
    let initial = LevelVector::from_slice(initial)
        .map_err(|issue| LevelError::invalid(VectorRole::Initial, issue))?;
    let target = LevelVector::from_slice(target)
        .map_err(|issue| LevelError::invalid(VectorRole::Target, issue))?;
    check_reachable(&initial, &target)?;
    Ok((initial, target))
}
