//! Static facility and technology definitions.
//!
//! Definitions are registered through [`CatalogBuilder`] with stable string
//! keys, cross-references between entries are expressed by key, and
//! [`CatalogBuilder::finalize`] resolves every reference into a dense
//! copyable id, validates the result, and freezes it into a [`Catalog`].
//! The catalog is never mutated after startup; the engine only reads it.

use crate::fixed::{Fixed64, Ticks};
use crate::id::{FacilityId, TechId};
use crate::ledger::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Facility definitions
// ---------------------------------------------------------------------------

/// Broad grouping used by list views and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityCategory {
    Production,
    Research,
    Military,
    Infrastructure,
    Population,
    Crafting,
    Special,
}

/// Price of a build or upgrade. Every numeric field participates in the
/// repeatable-facility cost curve, construction time included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityCost {
    pub gold: u64,
    pub gems: u64,
    pub lumber: u64,
    pub stone: u64,
    /// Turns of construction bought at this price. Zero for authored costs
    /// that defer to the facility's own construction time.
    pub construction_time: Ticks,
}

/// Recurring resource output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionDef {
    pub resource: ResourceKind,
    /// Base output per event, before efficiency, level, technology, and
    /// focus multipliers.
    pub amount: Fixed64,
    /// Turns between output events. Always at least 1.
    pub interval: Ticks,
}

/// One authored upgrade step for a non-repeatable facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub cost: FacilityCost,
    pub construction_time: Ticks,
    pub capacity: Option<u32>,
    pub efficiency: Option<Fixed64>,
}

/// Prerequisites surfaced to the player before a facility is worth
/// starting. Queryable; the engine does not gate commands on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRequirements {
    pub population: u32,
    pub facilities: Vec<(FacilityId, u32)>,
    pub techs: Vec<(TechId, u32)>,
}

/// A facility type. Frozen after catalog construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityDef {
    pub id: FacilityId,
    /// Stable string key, e.g. "mine".
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: FacilityCategory,
    pub base_cost: FacilityCost,
    /// Turns for the initial build (level 0 to 1).
    pub construction_time: Ticks,
    /// Level ceiling. Ignored when `repeatable` is true.
    pub max_level: u32,
    /// Repeatable facilities level without bound on a scaled cost curve
    /// instead of authored upgrades.
    pub repeatable: bool,
    pub production: Option<ProductionDef>,
    pub base_capacity: Option<u32>,
    /// Output multiplier, defaulted to 1 at build time.
    pub base_efficiency: Fixed64,
    pub upgrades: Vec<UpgradeDef>,
    pub requirements: Option<FacilityRequirements>,
}

// ---------------------------------------------------------------------------
// Technology definitions
// ---------------------------------------------------------------------------

/// What aspect of the target facility an effect multiplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Production,
    Capacity,
}

/// A multiplier applied to one facility per unlocked level of the
/// technology. Effects compound: level `n` multiplies by `amount^n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechEffect {
    pub kind: EffectKind,
    pub amount: Fixed64,
    pub facility: FacilityId,
}

/// A gate that must be satisfied before a technology can be researched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TechRequirement {
    Tech { id: TechId, level: u32 },
    Facility { id: FacilityId, level: u32 },
}

/// Flat resource price of one research, plus the research-point cost that
/// the technology's multiplier scales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechCost {
    pub gold: u64,
    pub gems: u64,
    pub lumber: u64,
    pub stone: u64,
    pub research_points: u64,
}

/// A technology. Frozen after catalog construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechDef {
    pub id: TechId,
    /// Stable string key, e.g. "tech_mining_1".
    pub key: String,
    pub name: String,
    pub description: String,
    pub cost: TechCost,
    pub effects: Vec<TechEffect>,
    pub requirements: Vec<TechRequirement>,
    pub repeatable: bool,
    /// Applied once per research to the research-point cost. Defaulted to 1
    /// at build time.
    pub cost_multiplier: Fixed64,
    /// Level ceiling. Zero means no ceiling.
    pub max_level: u32,
}

// ---------------------------------------------------------------------------
// Drafts (pre-resolution)
// ---------------------------------------------------------------------------

/// A facility definition as registered, with cross-references still
/// expressed by key.
#[derive(Debug, Clone)]
pub struct FacilityDraft {
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: FacilityCategory,
    pub base_cost: FacilityCost,
    pub construction_time: Ticks,
    pub max_level: u32,
    pub repeatable: bool,
    pub production: Option<ProductionDef>,
    pub base_capacity: Option<u32>,
    pub base_efficiency: Option<Fixed64>,
    pub upgrades: Vec<UpgradeDef>,
    pub requirements: Option<RequirementsDraft>,
}

/// Facility prerequisites by key.
#[derive(Debug, Clone, Default)]
pub struct RequirementsDraft {
    pub population: u32,
    pub facilities: Vec<(String, u32)>,
    pub techs: Vec<(String, u32)>,
}

/// A technology definition as registered, with cross-references still
/// expressed by key.
#[derive(Debug, Clone)]
pub struct TechDraft {
    pub key: String,
    pub name: String,
    pub description: String,
    pub cost: TechCost,
    pub effects: Vec<EffectDraft>,
    pub requirements: Vec<RequirementDraft>,
    pub repeatable: bool,
    pub cost_multiplier: Option<Fixed64>,
    pub max_level: u32,
}

/// An effect whose target facility is still a key.
#[derive(Debug, Clone)]
pub struct EffectDraft {
    pub kind: EffectKind,
    pub amount: Fixed64,
    pub facility: String,
}

/// A requirement whose target is still a key.
#[derive(Debug, Clone)]
pub enum RequirementDraft {
    Tech { key: String, level: u32 },
    Facility { key: String, level: u32 },
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors detected while building a catalog. The engine itself never
/// raises these; malformed definitions are rejected before the engine
/// ever sees them.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate facility key: {0}")]
    DuplicateFacility(String),

    #[error("duplicate tech key: {0}")]
    DuplicateTech(String),

    #[error("unknown facility reference '{reference}' in '{from}'")]
    UnknownFacilityRef { from: String, reference: String },

    #[error("unknown tech reference '{reference}' in '{from}'")]
    UnknownTechRef { from: String, reference: String },

    #[error("facility '{0}' declares production with a zero interval")]
    ZeroProductionInterval(String),

    #[error("tech '{0}' has a negative cost multiplier")]
    NegativeCostMultiplier(String),
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`Catalog`].
/// Two-phase lifecycle: registration, then finalization.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    facilities: Vec<FacilityDraft>,
    facility_keys: HashMap<String, FacilityId>,
    techs: Vec<TechDraft>,
    tech_keys: HashMap<String, TechId>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a facility. Returns its id; the key must be unique.
    pub fn add_facility(&mut self, draft: FacilityDraft) -> Result<FacilityId, CatalogError> {
        if self.facility_keys.contains_key(&draft.key) {
            return Err(CatalogError::DuplicateFacility(draft.key));
        }
        let id = FacilityId(self.facilities.len() as u32);
        self.facility_keys.insert(draft.key.clone(), id);
        self.facilities.push(draft);
        Ok(id)
    }

    /// Register a technology. Returns its id; the key must be unique.
    pub fn add_tech(&mut self, draft: TechDraft) -> Result<TechId, CatalogError> {
        if self.tech_keys.contains_key(&draft.key) {
            return Err(CatalogError::DuplicateTech(draft.key));
        }
        let id = TechId(self.techs.len() as u32);
        self.tech_keys.insert(draft.key.clone(), id);
        self.techs.push(draft);
        Ok(id)
    }

    /// Look up a registered facility id by key.
    pub fn facility_id(&self, key: &str) -> Option<FacilityId> {
        self.facility_keys.get(key).copied()
    }

    /// Look up a registered tech id by key.
    pub fn tech_id(&self, key: &str) -> Option<TechId> {
        self.tech_keys.get(key).copied()
    }

    /// Resolve every cross-reference, validate, and freeze the catalog.
    pub fn finalize(self) -> Result<Catalog, CatalogError> {
        let Self { facilities, facility_keys, techs, tech_keys } = self;

        let resolve_facility = |from: &str, key: &str| -> Result<FacilityId, CatalogError> {
            facility_keys.get(key).copied().ok_or_else(|| CatalogError::UnknownFacilityRef {
                from: from.to_string(),
                reference: key.to_string(),
            })
        };
        let resolve_tech = |from: &str, key: &str| -> Result<TechId, CatalogError> {
            tech_keys.get(key).copied().ok_or_else(|| CatalogError::UnknownTechRef {
                from: from.to_string(),
                reference: key.to_string(),
            })
        };

        let mut resolved_facilities = Vec::with_capacity(facilities.len());
        for (index, draft) in facilities.into_iter().enumerate() {
            if let Some(production) = &draft.production
                && production.interval == 0
            {
                return Err(CatalogError::ZeroProductionInterval(draft.key));
            }

            let requirements = match draft.requirements {
                None => None,
                Some(reqs) => {
                    let mut resolved = FacilityRequirements {
                        population: reqs.population,
                        ..Default::default()
                    };
                    for (key, level) in &reqs.facilities {
                        resolved.facilities.push((resolve_facility(&draft.key, key)?, *level));
                    }
                    for (key, level) in &reqs.techs {
                        resolved.techs.push((resolve_tech(&draft.key, key)?, *level));
                    }
                    Some(resolved)
                }
            };

            resolved_facilities.push(FacilityDef {
                id: FacilityId(index as u32),
                key: draft.key,
                name: draft.name,
                description: draft.description,
                category: draft.category,
                base_cost: draft.base_cost,
                construction_time: draft.construction_time,
                max_level: draft.max_level,
                repeatable: draft.repeatable,
                production: draft.production,
                base_capacity: draft.base_capacity,
                base_efficiency: draft.base_efficiency.unwrap_or(Fixed64::ONE),
                upgrades: draft.upgrades,
                requirements,
            });
        }

        let mut resolved_techs = Vec::with_capacity(techs.len());
        for (index, draft) in techs.into_iter().enumerate() {
            let cost_multiplier = draft.cost_multiplier.unwrap_or(Fixed64::ONE);
            if cost_multiplier < Fixed64::ZERO {
                return Err(CatalogError::NegativeCostMultiplier(draft.key));
            }

            let mut effects = Vec::with_capacity(draft.effects.len());
            for effect in &draft.effects {
                effects.push(TechEffect {
                    kind: effect.kind,
                    amount: effect.amount,
                    facility: resolve_facility(&draft.key, &effect.facility)?,
                });
            }

            let mut requirements = Vec::with_capacity(draft.requirements.len());
            for requirement in &draft.requirements {
                requirements.push(match requirement {
                    RequirementDraft::Tech { key, level } => TechRequirement::Tech {
                        id: resolve_tech(&draft.key, key)?,
                        level: *level,
                    },
                    RequirementDraft::Facility { key, level } => TechRequirement::Facility {
                        id: resolve_facility(&draft.key, key)?,
                        level: *level,
                    },
                });
            }

            resolved_techs.push(TechDef {
                id: TechId(index as u32),
                key: draft.key,
                name: draft.name,
                description: draft.description,
                cost: draft.cost,
                effects,
                requirements,
                repeatable: draft.repeatable,
                cost_multiplier,
                max_level: draft.max_level,
            });
        }

        Ok(Catalog {
            facilities: resolved_facilities,
            techs: resolved_techs,
            facility_keys,
            tech_keys,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable registry of facility and technology definitions, frozen at
/// startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    facilities: Vec<FacilityDef>,
    techs: Vec<TechDef>,
    facility_keys: HashMap<String, FacilityId>,
    tech_keys: HashMap<String, TechId>,
}

impl Catalog {
    /// Get a facility definition by id.
    pub fn facility(&self, id: FacilityId) -> Option<&FacilityDef> {
        self.facilities.get(id.0 as usize)
    }

    /// Get a technology definition by id.
    pub fn tech(&self, id: TechId) -> Option<&TechDef> {
        self.techs.get(id.0 as usize)
    }

    /// Resolve a facility key to its id.
    pub fn facility_id(&self, key: &str) -> Option<FacilityId> {
        self.facility_keys.get(key).copied()
    }

    /// Resolve a tech key to its id.
    pub fn tech_id(&self, key: &str) -> Option<TechId> {
        self.tech_keys.get(key).copied()
    }

    /// Iterate over every facility definition, in id order.
    pub fn facilities(&self) -> impl Iterator<Item = &FacilityDef> {
        self.facilities.iter()
    }

    /// Iterate over every technology definition, in id order.
    pub fn techs(&self) -> impl Iterator<Item = &TechDef> {
        self.techs.iter()
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    pub fn tech_count(&self) -> usize {
        self.techs.len()
    }
}
