//! Serde data file structs for game content definitions.
//!
//! These structs define the on-disk format for facilities, technologies,
//! and the starting snapshot. They are deserialized from RON, JSON, or
//! TOML and then resolved into engine types by the loader.

use bastide_core::catalog::{EffectKind, FacilityCategory};
use bastide_core::ledger::ResourceKind;
use serde::Deserialize;

/// Top-level content pack: the full catalog plus the starting snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub facilities: Vec<FacilityData>,
    #[serde(default)]
    pub techs: Vec<TechData>,
    pub start: StartData,
}

// ===========================================================================
// Facilities
// ===========================================================================

/// A facility definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityData {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: FacilityCategory,
    #[serde(default)]
    pub cost: CostData,
    pub construction_time: u64,
    #[serde(default)]
    pub max_level: u32,
    #[serde(default)]
    pub repeatable: bool,
    #[serde(default)]
    pub production: Option<ProductionData>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub efficiency: Option<f64>,
    #[serde(default)]
    pub upgrades: Vec<UpgradeData>,
    #[serde(default)]
    pub requirements: Option<RequirementsData>,
}

/// A build or upgrade price. Missing fields read as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CostData {
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub gems: u64,
    #[serde(default)]
    pub lumber: u64,
    #[serde(default)]
    pub stone: u64,
    #[serde(default)]
    pub construction_time: u64,
}

/// A recurring resource output.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductionData {
    pub resource: ResourceKind,
    pub amount: f64,
    pub interval: u64,
}

/// One authored upgrade step.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeData {
    #[serde(default)]
    pub cost: CostData,
    pub construction_time: u64,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub efficiency: Option<f64>,
}

/// Facility prerequisites, by key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequirementsData {
    #[serde(default)]
    pub population: u32,
    #[serde(default)]
    pub facilities: Vec<(String, u32)>,
    #[serde(default)]
    pub techs: Vec<(String, u32)>,
}

// ===========================================================================
// Technologies
// ===========================================================================

/// A technology definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct TechData {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: TechCostData,
    #[serde(default)]
    pub effects: Vec<EffectData>,
    #[serde(default)]
    pub requirements: Vec<RequirementData>,
    #[serde(default)]
    pub repeatable: bool,
    #[serde(default)]
    pub cost_multiplier: Option<f64>,
    #[serde(default)]
    pub max_level: u32,
}

/// A research price. Missing fields read as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechCostData {
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub gems: u64,
    #[serde(default)]
    pub lumber: u64,
    #[serde(default)]
    pub stone: u64,
    #[serde(default)]
    pub research_points: u64,
}

/// A per-level multiplier on a facility.
#[derive(Debug, Clone, Deserialize)]
pub struct EffectData {
    pub kind: EffectKind,
    pub amount: f64,
    pub facility: String,
}

/// A research gate, by key.
#[derive(Debug, Clone, Deserialize)]
pub enum RequirementData {
    Tech { key: String, level: u32 },
    Facility { key: String, level: u32 },
}

// ===========================================================================
// Starting snapshot
// ===========================================================================

/// The state a new game begins with.
#[derive(Debug, Clone, Deserialize)]
pub struct StartData {
    pub resources: StartResourcesData,
    #[serde(default)]
    pub focus: FocusData,
    #[serde(default)]
    pub facilities: Vec<StartFacilityData>,
    pub clock: ClockData,
}

/// Opening stockpiles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartResourcesData {
    #[serde(default)]
    pub gold: f64,
    #[serde(default)]
    pub gems: f64,
    #[serde(default)]
    pub lumber: f64,
    #[serde(default)]
    pub stone: f64,
    #[serde(default)]
    pub population: u32,
    #[serde(default)]
    pub soldiers: u32,
    #[serde(default)]
    pub research_points: f64,
}

/// Opening focus split.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FocusData {
    #[serde(default)]
    pub growth: u32,
    #[serde(default)]
    pub production: u32,
    #[serde(default)]
    pub research: u32,
    #[serde(default)]
    pub exploration: u32,
    #[serde(default)]
    pub trade: u32,
}

/// A facility already standing when the game begins.
#[derive(Debug, Clone, Deserialize)]
pub struct StartFacilityData {
    pub key: String,
    pub level: u32,
}

/// Countdown phase lengths, in ticks.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockData {
    pub work_duration: u64,
    pub break_duration: u64,
}
