//! Technology research: prerequisite validation and atomic application.
//!
//! [`can_research`] and [`apply_research`] are always called as a pair;
//! apply-without-check is never issued. Application deducts the full cost
//! and raises the level in one transition, so partial application is never
//! observable.

use crate::catalog::{TechDef, TechRequirement};
use crate::facility::FacilityState;
use crate::fixed::{Fixed64, u64_to_fixed64};
use crate::id::{FacilityId, TechId};
use crate::ledger::ResourceLedger;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unlocked technology levels. Absent means level 0; a level only ever
/// moves up, by one per successful research.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechLevels(BTreeMap<TechId, u32>);

impl TechLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlocked level of a technology; 0 when never researched.
    pub fn level(&self, id: TechId) -> u32 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    /// Raise a technology by one level.
    pub fn raise(&mut self, id: TechId) {
        *self.0.entry(id).or_insert(0) += 1;
    }

    /// Iterate over unlocked technologies in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TechId, u32)> + '_ {
        self.0.iter().map(|(id, level)| (*id, *level))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Research-point price of the next level: the flat cost times the
/// technology's multiplier, applied once per research (not compounded
/// with the current level).
pub fn scaled_research_cost(def: &TechDef) -> Fixed64 {
    u64_to_fixed64(def.cost.research_points).saturating_mul(def.cost_multiplier)
}

/// Whether `def` can be researched right now. Never mutates anything.
///
/// All of the following must hold: the level ceiling (when non-zero) is
/// not reached, the scaled research-point price is covered, every tech
/// and facility requirement is at its required level, and every flat
/// resource cost is covered.
pub fn can_research(
    def: &TechDef,
    current_level: u32,
    ledger: &ResourceLedger,
    techs: &TechLevels,
    facilities: &BTreeMap<FacilityId, FacilityState>,
) -> bool {
    if def.max_level != 0 && current_level >= def.max_level {
        return false;
    }
    if ledger.research_points < scaled_research_cost(def) {
        return false;
    }
    for requirement in &def.requirements {
        match requirement {
            TechRequirement::Tech { id, level } => {
                if techs.level(*id) < *level {
                    return false;
                }
            }
            TechRequirement::Facility { id, level } => {
                let have = facilities.get(id).map(|f| f.level).unwrap_or(0);
                if have < *level {
                    return false;
                }
            }
        }
    }
    ledger.can_afford_tech(&def.cost)
}

/// Deduct the full cost and raise the technology by one level. Callers
/// must have checked [`can_research`] first.
pub fn apply_research(def: &TechDef, ledger: &mut ResourceLedger, techs: &mut TechLevels) {
    ledger.debit_tech(&def.cost, scaled_research_cost(def));
    techs.raise(def.id);
}
