//! The resource ledger: named stockpiles and the affordability contract.
//!
//! Deductions are only issued after an affordability check and use
//! saturating subtraction, so no ledger field ever goes negative as the
//! result of an engine-authorized spend.

use crate::catalog::{FacilityCost, TechCost};
use crate::fixed::{Fixed64, u64_to_fixed64};
use serde::{Deserialize, Serialize};

/// The closed set of resource kinds the economy knows about.
///
/// `Equipment` is produced by crafting facilities but has no stockpile
/// field; yields of it are observable as events only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Gold,
    Gems,
    Lumber,
    Stone,
    Population,
    Soldiers,
    ResearchPoints,
    Equipment,
}

/// The settlement's stockpiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub gold: Fixed64,
    pub gems: Fixed64,
    pub lumber: Fixed64,
    pub stone: Fixed64,
    pub population: u32,
    pub soldiers: u32,
    pub research_points: Fixed64,
}

impl ResourceLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current amount of a resource. Kinds without a stockpile field read
    /// as zero.
    pub fn amount(&self, kind: ResourceKind) -> Fixed64 {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Gems => self.gems,
            ResourceKind::Lumber => self.lumber,
            ResourceKind::Stone => self.stone,
            ResourceKind::Population => u64_to_fixed64(self.population as u64),
            ResourceKind::Soldiers => u64_to_fixed64(self.soldiers as u64),
            ResourceKind::ResearchPoints => self.research_points,
            ResourceKind::Equipment => Fixed64::ZERO,
        }
    }

    /// Credit a production yield. Only gold, lumber, stone, and research
    /// points are fed by production; every other kind is ignored.
    pub fn credit_production(&mut self, kind: ResourceKind, amount: Fixed64) {
        match kind {
            ResourceKind::Gold => self.gold = self.gold.saturating_add(amount),
            ResourceKind::Lumber => self.lumber = self.lumber.saturating_add(amount),
            ResourceKind::Stone => self.stone = self.stone.saturating_add(amount),
            ResourceKind::ResearchPoints => {
                self.research_points = self.research_points.saturating_add(amount)
            }
            _ => {}
        }
    }

    /// Whether every field of a facility cost is covered.
    pub fn can_afford(&self, cost: &FacilityCost) -> bool {
        self.gold >= u64_to_fixed64(cost.gold)
            && self.gems >= u64_to_fixed64(cost.gems)
            && self.lumber >= u64_to_fixed64(cost.lumber)
            && self.stone >= u64_to_fixed64(cost.stone)
    }

    /// Deduct a facility cost. Callers must have checked [`can_afford`]
    /// first.
    ///
    /// [`can_afford`]: ResourceLedger::can_afford
    pub fn debit(&mut self, cost: &FacilityCost) {
        self.gold = self.gold.saturating_sub(u64_to_fixed64(cost.gold));
        self.gems = self.gems.saturating_sub(u64_to_fixed64(cost.gems));
        self.lumber = self.lumber.saturating_sub(u64_to_fixed64(cost.lumber));
        self.stone = self.stone.saturating_sub(u64_to_fixed64(cost.stone));
    }

    /// Whether the flat resource part of a technology cost is covered.
    /// The scaled research-point price is checked separately.
    pub fn can_afford_tech(&self, cost: &TechCost) -> bool {
        self.gold >= u64_to_fixed64(cost.gold)
            && self.gems >= u64_to_fixed64(cost.gems)
            && self.lumber >= u64_to_fixed64(cost.lumber)
            && self.stone >= u64_to_fixed64(cost.stone)
    }

    /// Deduct a technology cost: the flat resource amounts plus the scaled
    /// research-point price.
    pub fn debit_tech(&mut self, cost: &TechCost, scaled_research_points: Fixed64) {
        self.gold = self.gold.saturating_sub(u64_to_fixed64(cost.gold));
        self.gems = self.gems.saturating_sub(u64_to_fixed64(cost.gems));
        self.lumber = self.lumber.saturating_sub(u64_to_fixed64(cost.lumber));
        self.stone = self.stone.saturating_sub(u64_to_fixed64(cost.stone));
        self.research_points = self.research_points.saturating_sub(scaled_research_points);
    }
}
