//! Affix pool and the closed-form odds of rolling only wanted affixes.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{AFFIX_POOL_SIZE, COMBINATION_LISTING_LIMIT};
use crate::numbers::{binomial, ratio, to_percent};

const DEFAULT_AFFIX_DATA: &str = include_str!("../assets/affixes.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffixCategory {
    Damage,
    Defense,
    Utility,
}

impl fmt::Display for AffixCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffixCategory::Damage => write!(f, "damage"),
            AffixCategory::Defense => write!(f, "defense"),
            AffixCategory::Utility => write!(f, "utility"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affix {
    pub id: u8,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: AffixCategory,
}

/// Every affix a mod can roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffixCatalog {
    pub affixes: Vec<Affix>,
}

impl Default for AffixCatalog {
    fn default() -> Self {
        serde_json::from_str(DEFAULT_AFFIX_DATA).unwrap_or_else(|err| {
            log::warn!("bundled affix data unreadable ({err}), using built-in list");
            Self::builtin()
        })
    }
}

impl AffixCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::default()
    }

    fn builtin() -> Self {
        let entries: [(&str, AffixCategory); AFFIX_POOL_SIZE as usize] = [
            ("Status Damage", AffixCategory::Damage),
            ("Magazine Capacity", AffixCategory::Utility),
            ("Reload Speed", AffixCategory::Utility),
            ("Damage vs. Normal Enemies", AffixCategory::Damage),
            ("Damage vs. Elite Enemies", AffixCategory::Damage),
            ("Damage vs. Great Ones", AffixCategory::Damage),
            ("Max HP", AffixCategory::Defense),
            ("Headshot Damage Reduction", AffixCategory::Defense),
            ("Gunfire Damage Reduction", AffixCategory::Defense),
            ("Status Damage Reduction", AffixCategory::Defense),
        ];
        let affixes = (1..=AFFIX_POOL_SIZE)
            .zip(entries)
            .map(|(id, (name, category))| Affix {
                id,
                name: name.to_string(),
                description: String::new(),
                category,
            })
            .collect();
        Self { affixes }
    }

    #[must_use]
    pub fn by_id(&self, id: u8) -> Option<&Affix> {
        self.affixes.iter().find(|affix| affix.id == id)
    }

    pub fn by_category(&self, category: AffixCategory) -> impl Iterator<Item = &Affix> {
        self.affixes
            .iter()
            .filter(move |affix| affix.category == category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.affixes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.affixes.is_empty()
    }
}

#[must_use]
pub fn catalog() -> &'static AffixCatalog {
    static CATALOG: OnceLock<AffixCatalog> = OnceLock::new();
    CATALOG.get_or_init(AffixCatalog::load_from_static)
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AffixError {
    #[error("slot count must be between 1 and {max} (got {requested})")]
    InvalidSlotCount { requested: i64, max: u8 },
    #[error("no valid affix ids in the target range (ids run 1..={max})")]
    EmptyTargetRange { max: u8 },
}

/// Odds that every rolled affix lands inside the target range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffixOdds {
    pub probability: f64,
    pub probability_percent: f64,
    pub total_combinations: u64,
    pub valid_combinations: u64,
    pub slot_count: u8,
    /// Deduplicated, sorted target ids that survived validation.
    pub target_range: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combinations: Option<Vec<Vec<u8>>>,
}

/// Probability that drawing `slot_count` distinct affixes from the pool
/// yields only ids from `target_ids`, i.e. `C(k, n) / C(pool, n)`.
///
/// Ids outside the pool are dropped and duplicates collapse. With
/// `list_combinations`, every winning draw is listed as long as there are
/// at most [`COMBINATION_LISTING_LIMIT`] of them.
///
/// # Errors
///
/// Returns [`AffixError::InvalidSlotCount`] when `slot_count` is not in
/// `1..=AFFIX_POOL_SIZE` and [`AffixError::EmptyTargetRange`] when no
/// target id is valid.
pub fn affix_odds(
    slot_count: i64,
    target_ids: &[i64],
    list_combinations: bool,
) -> Result<AffixOdds, AffixError> {
    let slots = u8::try_from(slot_count)
        .ok()
        .filter(|n| (1..=AFFIX_POOL_SIZE).contains(n))
        .ok_or(AffixError::InvalidSlotCount {
            requested: slot_count,
            max: AFFIX_POOL_SIZE,
        })?;

    let target_range: Vec<u8> = target_ids
        .iter()
        .filter_map(|&id| u8::try_from(id).ok())
        .filter(|id| (1..=AFFIX_POOL_SIZE).contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if target_range.is_empty() {
        return Err(AffixError::EmptyTargetRange {
            max: AFFIX_POOL_SIZE,
        });
    }

    let range_size = target_range.len() as u64;
    let total_combinations = binomial(u64::from(AFFIX_POOL_SIZE), u64::from(slots));
    let valid_combinations = binomial(range_size, u64::from(slots));
    let probability = ratio(valid_combinations, total_combinations);

    let combinations = (list_combinations
        && valid_combinations > 0
        && valid_combinations <= COMBINATION_LISTING_LIMIT)
        .then(|| combinations_of(&target_range, usize::from(slots)));

    log::debug!(
        "affix odds: {slots} slots from {target_range:?} -> {valid_combinations}/{total_combinations}"
    );

    Ok(AffixOdds {
        probability,
        probability_percent: to_percent(probability),
        total_combinations,
        valid_combinations,
        slot_count: slots,
        target_range,
        combinations,
    })
}

/// All `size`-element combinations of `items`, in lexicographic order.
fn combinations_of(items: &[u8], size: usize) -> Vec<Vec<u8>> {
    fn extend(items: &[u8], size: usize, start: usize, buf: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        if buf.len() == size {
            out.push(buf.clone());
            return;
        }
        let needed = size - buf.len();
        for idx in start..=items.len() - needed {
            buf.push(items[idx]);
            extend(items, size, idx + 1, buf, out);
            buf.pop();
        }
    }

    let mut out = Vec::new();
    if size <= items.len() {
        extend(items, size, 0, &mut Vec::with_capacity(size), &mut out);
    }
    out
}
