//! Resolution pipeline: reads a content pack, registers it with the
//! catalog builder, and produces a ready-to-run catalog plus starting
//! snapshot.

use crate::schema::{
    CatalogData, CostData, FacilityData, RequirementData, StartData, TechData,
};
use bastide_core::catalog::{
    Catalog, CatalogBuilder, CatalogError, EffectDraft, FacilityCost, FacilityDraft,
    ProductionDef, RequirementDraft, RequirementsDraft, TechCost, TechDraft, UpgradeDef,
};
use bastide_core::clock::ClockConfig;
use bastide_core::facility::FacilityState;
use bastide_core::fixed::f64_to_fixed64;
use bastide_core::society::SocietyFocus;
use bastide_core::state::GameState;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during content loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {0}")]
    UnsupportedFormat(PathBuf),

    /// A deserialization error occurred.
    #[error("parse error: {0}")]
    Parse(String),

    /// The catalog rejected the content (duplicate keys, dangling
    /// references, invalid numbers).
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The start section places a facility the catalog does not define.
    #[error("start facility '{0}' is not in the catalog")]
    UnknownStartFacility(String),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported content file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Json,
    Toml,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(DataLoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

// ===========================================================================
// Loading
// ===========================================================================

/// A resolved content pack: the frozen catalog and the starting snapshot.
#[derive(Debug, Clone)]
pub struct GameData {
    pub catalog: Catalog,
    pub start: GameState,
}

/// Load a content pack from a string in the given format.
pub fn load_str(content: &str, format: Format) -> Result<GameData, DataLoadError> {
    let data: CatalogData = match format {
        Format::Ron => {
            ron::from_str(content).map_err(|e| DataLoadError::Parse(e.to_string()))?
        }
        Format::Json => {
            serde_json::from_str(content).map_err(|e| DataLoadError::Parse(e.to_string()))?
        }
        Format::Toml => {
            toml::from_str(content).map_err(|e| DataLoadError::Parse(e.to_string()))?
        }
    };
    build(data)
}

/// Load a content pack from a file, detecting the format by extension.
pub fn load_path(path: &Path) -> Result<GameData, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    load_str(&content, format)
}

/// The base content pack compiled into the crate.
pub fn base_game() -> Result<GameData, DataLoadError> {
    load_str(include_str!("../data/base.ron"), Format::Ron)
}

// ===========================================================================
// Resolution
// ===========================================================================

fn cost(data: &CostData) -> FacilityCost {
    FacilityCost {
        gold: data.gold,
        gems: data.gems,
        lumber: data.lumber,
        stone: data.stone,
        construction_time: data.construction_time,
    }
}

fn facility_draft(data: FacilityData) -> FacilityDraft {
    FacilityDraft {
        key: data.key,
        name: data.name,
        description: data.description,
        category: data.category,
        base_cost: cost(&data.cost),
        construction_time: data.construction_time,
        max_level: data.max_level,
        repeatable: data.repeatable,
        production: data.production.map(|p| ProductionDef {
            resource: p.resource,
            amount: f64_to_fixed64(p.amount),
            interval: p.interval,
        }),
        base_capacity: data.capacity,
        base_efficiency: data.efficiency.map(f64_to_fixed64),
        upgrades: data
            .upgrades
            .into_iter()
            .map(|u| UpgradeDef {
                cost: cost(&u.cost),
                construction_time: u.construction_time,
                capacity: u.capacity,
                efficiency: u.efficiency.map(f64_to_fixed64),
            })
            .collect(),
        requirements: data.requirements.map(|r| RequirementsDraft {
            population: r.population,
            facilities: r.facilities,
            techs: r.techs,
        }),
    }
}

fn tech_draft(data: TechData) -> TechDraft {
    TechDraft {
        key: data.key,
        name: data.name,
        description: data.description,
        cost: TechCost {
            gold: data.cost.gold,
            gems: data.cost.gems,
            lumber: data.cost.lumber,
            stone: data.cost.stone,
            research_points: data.cost.research_points,
        },
        effects: data
            .effects
            .into_iter()
            .map(|e| EffectDraft {
                kind: e.kind,
                amount: f64_to_fixed64(e.amount),
                facility: e.facility,
            })
            .collect(),
        requirements: data
            .requirements
            .into_iter()
            .map(|r| match r {
                RequirementData::Tech { key, level } => RequirementDraft::Tech { key, level },
                RequirementData::Facility { key, level } => {
                    RequirementDraft::Facility { key, level }
                }
            })
            .collect(),
        repeatable: data.repeatable,
        cost_multiplier: data.cost_multiplier.map(f64_to_fixed64),
        max_level: data.max_level,
    }
}

fn start_state(catalog: &Catalog, start: StartData) -> Result<GameState, DataLoadError> {
    let mut state = GameState::new(ClockConfig {
        work_duration: start.clock.work_duration,
        break_duration: start.clock.break_duration,
    });

    state.resources.gold = f64_to_fixed64(start.resources.gold);
    state.resources.gems = f64_to_fixed64(start.resources.gems);
    state.resources.lumber = f64_to_fixed64(start.resources.lumber);
    state.resources.stone = f64_to_fixed64(start.resources.stone);
    state.resources.population = start.resources.population;
    state.resources.soldiers = start.resources.soldiers;
    state.resources.research_points = f64_to_fixed64(start.resources.research_points);

    state.focus = SocietyFocus {
        growth: start.focus.growth,
        production: start.focus.production,
        research: start.focus.research,
        exploration: start.focus.exploration,
        trade: start.focus.trade,
    };

    for placed in start.facilities {
        let id = catalog
            .facility_id(&placed.key)
            .ok_or_else(|| DataLoadError::UnknownStartFacility(placed.key.clone()))?;
        state.facilities.insert(id, FacilityState::at_level(id, placed.level));
    }

    Ok(state)
}

fn build(data: CatalogData) -> Result<GameData, DataLoadError> {
    let mut builder = CatalogBuilder::new();
    for facility in data.facilities {
        builder.add_facility(facility_draft(facility))?;
    }
    for tech in data.techs {
        builder.add_tech(tech_draft(tech))?;
    }
    let catalog = builder.finalize()?;
    let start = start_state(&catalog, data.start)?;
    Ok(GameData { catalog, start })
}
