//! modcalc odds engine
//!
//! Exact probabilities for mod crafting: how likely a strengthen run is to
//! reach a target set of affix levels, and how likely an affix roll is to
//! stay inside a wanted range. This crate has no I/O; front ends feed it
//! level vectors and render the outcomes it returns.

pub mod affix;
pub mod constants;
pub mod goal;
pub mod levels;
pub mod numbers;
pub mod strengthen;

// Re-export commonly used types
pub use affix::{Affix, AffixCatalog, AffixCategory, AffixError, AffixOdds, affix_odds, catalog};
pub use constants::{
    AFFIX_POOL_SIZE, DEFAULT_PATH_LIMIT, MAX_ENHANCEMENTS, MAX_LEVEL, MIN_LEVEL, SLOT_COUNT,
};
pub use goal::{ComparisonMode, satisfies};
pub use levels::{LevelError, LevelIssue, LevelVector, VectorRole, check_reachable, validate_pair};
pub use strengthen::{
    StrengthenOptions, StrengthenOutcome, UpgradePath, UpgradeStep, compute, compute_raw,
    compute_validated,
};
