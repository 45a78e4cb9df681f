//! Shared test helpers for unit tests, integration tests, and benchmarks
//! (via the `test-utils` feature).

use crate::catalog::{
    Catalog, CatalogBuilder, EffectDraft, EffectKind, FacilityCategory, FacilityCost,
    FacilityDraft, ProductionDef, RequirementDraft, RequirementsDraft, TechCost, TechDraft,
    UpgradeDef,
};
use crate::clock::ClockConfig;
use crate::engine::Engine;
use crate::facility::FacilityState;
use crate::fixed::Fixed64;
use crate::ledger::ResourceKind;
use crate::society::SocietyFocus;
use crate::state::GameState;

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// The default focus split used across tests: 4 growth, 4 production,
/// 2 research.
pub fn focus() -> SocietyFocus {
    SocietyFocus { growth: 4, production: 4, research: 2, exploration: 0, trade: 0 }
}

fn facility_draft(key: &str, name: &str, category: FacilityCategory) -> FacilityDraft {
    FacilityDraft {
        key: key.to_string(),
        name: name.to_string(),
        description: String::new(),
        category,
        base_cost: FacilityCost::default(),
        construction_time: 1,
        max_level: 50,
        repeatable: true,
        production: None,
        base_capacity: None,
        base_efficiency: None,
        upgrades: Vec::new(),
        requirements: None,
    }
}

fn tech_draft(key: &str, name: &str) -> TechDraft {
    TechDraft {
        key: key.to_string(),
        name: name.to_string(),
        description: String::new(),
        cost: TechCost::default(),
        effects: Vec::new(),
        requirements: Vec::new(),
        repeatable: true,
        cost_multiplier: None,
        max_level: 10,
    }
}

/// A small standard catalog: three repeatable producers, housing, one
/// non-repeatable facility with an authored upgrade ladder, and a handful
/// of technologies exercising every effect and requirement kind.
pub fn base_catalog() -> Catalog {
    let mut builder = CatalogBuilder::new();

    let mut mine = facility_draft("mine", "Mine", FacilityCategory::Production);
    mine.base_cost = FacilityCost { gold: 100, lumber: 50, stone: 100, ..Default::default() };
    mine.construction_time = 2;
    mine.production = Some(ProductionDef {
        resource: ResourceKind::Gold,
        amount: fixed(20.0),
        interval: 1,
    });
    mine.requirements = Some(RequirementsDraft { population: 5, ..Default::default() });
    builder.add_facility(mine).unwrap();

    let mut library = facility_draft("library", "Library", FacilityCategory::Research);
    library.base_cost = FacilityCost { gold: 150, lumber: 100, stone: 50, ..Default::default() };
    library.construction_time = 5;
    library.production = Some(ProductionDef {
        resource: ResourceKind::ResearchPoints,
        amount: fixed(1.0),
        interval: 2,
    });
    library.requirements = Some(RequirementsDraft { population: 3, ..Default::default() });
    builder.add_facility(library).unwrap();

    let mut housing = facility_draft("housing", "Housing", FacilityCategory::Population);
    housing.base_cost = FacilityCost { gold: 50, lumber: 100, ..Default::default() };
    housing.construction_time = 2;
    housing.base_capacity = Some(10);
    builder.add_facility(housing).unwrap();

    let mut forge = facility_draft("forge", "Forge", FacilityCategory::Crafting);
    forge.base_cost = FacilityCost { gold: 100, lumber: 100, stone: 100, ..Default::default() };
    forge.construction_time = 4;
    forge.production = Some(ProductionDef {
        resource: ResourceKind::Equipment,
        amount: fixed(1.0),
        interval: 1,
    });
    builder.add_facility(forge).unwrap();

    let mut watchtower = facility_draft("watchtower", "Watchtower", FacilityCategory::Military);
    watchtower.base_cost =
        FacilityCost { gold: 200, lumber: 150, stone: 200, ..Default::default() };
    watchtower.construction_time = 7;
    watchtower.max_level = 4;
    watchtower.repeatable = false;
    watchtower.base_capacity = Some(5);
    watchtower.upgrades = vec![
        UpgradeDef {
            cost: FacilityCost { gold: 300, stone: 100, ..Default::default() },
            construction_time: 4,
            capacity: Some(8),
            efficiency: None,
        },
        UpgradeDef {
            cost: FacilityCost { gold: 450, stone: 150, ..Default::default() },
            construction_time: 5,
            capacity: Some(12),
            efficiency: None,
        },
    ];
    watchtower.requirements = Some(RequirementsDraft {
        population: 10,
        facilities: vec![("library".to_string(), 2)],
        techs: vec![("prospecting".to_string(), 1)],
    });
    builder.add_facility(watchtower).unwrap();

    let mut prospecting = tech_draft("prospecting", "Prospecting");
    prospecting.cost = TechCost { gold: 100, gems: 100, research_points: 100, ..Default::default() };
    prospecting.cost_multiplier = Some(fixed(1.5));
    prospecting.effects = vec![EffectDraft {
        kind: EffectKind::Production,
        amount: fixed(1.5),
        facility: "mine".to_string(),
    }];
    builder.add_tech(prospecting).unwrap();

    let mut deep_mining = tech_draft("deep_mining", "Deep Mining");
    deep_mining.cost = TechCost { gold: 200, gems: 200, research_points: 200, ..Default::default() };
    deep_mining.cost_multiplier = Some(fixed(2.0));
    deep_mining.effects = vec![EffectDraft {
        kind: EffectKind::Production,
        amount: fixed(2.0),
        facility: "mine".to_string(),
    }];
    deep_mining.requirements =
        vec![RequirementDraft::Tech { key: "prospecting".to_string(), level: 5 }];
    builder.add_tech(deep_mining).unwrap();

    let mut drill_teams = tech_draft("drill_teams", "Drill Teams");
    drill_teams.cost = TechCost { research_points: 100, ..Default::default() };
    drill_teams.effects = vec![EffectDraft {
        kind: EffectKind::Production,
        amount: fixed(1.5),
        facility: "mine".to_string(),
    }];
    drill_teams.requirements =
        vec![RequirementDraft::Facility { key: "mine".to_string(), level: 2 }];
    builder.add_tech(drill_teams).unwrap();

    let mut timber_frames = tech_draft("timber_frames", "Timber Frames");
    timber_frames.cost = TechCost { gold: 50, gems: 50, research_points: 50, ..Default::default() };
    timber_frames.cost_multiplier = Some(fixed(1.5));
    timber_frames.effects = vec![EffectDraft {
        kind: EffectKind::Capacity,
        amount: fixed(1.5),
        facility: "housing".to_string(),
    }];
    builder.add_tech(timber_frames).unwrap();

    builder.finalize().unwrap()
}

fn engine_with_gold(gold: f64) -> Engine {
    let catalog = base_catalog();
    let mut state = GameState::new(ClockConfig { work_duration: 6, break_duration: 3 });
    state.focus = focus();
    state.resources.gold = fixed(gold);
    state.resources.gems = fixed(gold);
    state.resources.lumber = fixed(gold);
    state.resources.stone = fixed(gold);
    state.resources.research_points = fixed(gold);
    state.resources.population = 10;

    let housing = catalog.facility_id("housing").unwrap();
    state.facilities.insert(housing, FacilityState::at_level(housing, 1));

    Engine::new(catalog, state)
}

/// An engine over [`base_catalog`] with modest resources: housing at
/// level 1, population 10, the default focus split.
pub fn new_engine() -> Engine {
    engine_with_gold(100.0)
}

/// Like [`new_engine`], but wealthy enough that affordability never gets
/// in the way.
pub fn rich_engine() -> Engine {
    engine_with_gold(10_000.0)
}

/// Overwrite a facility's state with an idle entry at the given level.
pub fn seed_facility(engine: &mut Engine, key: &str, level: u32) {
    let id = engine.catalog().facility_id(key).unwrap();
    engine.state_mut().facilities.insert(id, FacilityState::at_level(id, level));
}
