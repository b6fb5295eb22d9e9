//! Fixed rules of the mod upgrade system.
//!
//! These values define the shape of the state space the engine explores.
//! They are compile-time constants so every probability the engine reports
//! is tied to a reviewed ruleset rather than to runtime input.

// Strengthen rules ---------------------------------------------------------
/// Number of affix slots on a mod.
pub const SLOT_COUNT: usize = 4;
/// Lowest level an affix slot can hold.
pub const MIN_LEVEL: u8 = 1;
/// Highest level an affix slot can reach; maxed slots are never picked.
pub const MAX_LEVEL: u8 = 5;
/// Upgrade actions applied per simulated strengthen run.
pub const MAX_ENHANCEMENTS: usize = 5;

// Path retention -----------------------------------------------------------
/// Path cap used by front ends that do not pick their own.
pub const DEFAULT_PATH_LIMIT: usize = 100;

// Affix pool ---------------------------------------------------------------
/// Size of the affix pool a mod rolls from.
pub const AFFIX_POOL_SIZE: u8 = 10;
/// Combination listings larger than this are withheld.
pub const COMBINATION_LISTING_LIMIT: u64 = 1_000;
