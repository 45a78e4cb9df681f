//! Property tests for the engine's numeric contracts.

use bastide_core::catalog::{
    CatalogBuilder, EffectDraft, EffectKind, FacilityCategory, FacilityCost, FacilityDraft,
    ProductionDef, TechCost, TechDraft,
};
use bastide_core::facility::{
    FacilityState, advance_construction, production_amount, required_construction_time,
    upgrade_cost,
};
use bastide_core::fixed::Ticks;
use bastide_core::ledger::ResourceKind;
use bastide_core::research::TechLevels;
use bastide_core::society::{FocusUpdate, SocietyFocus};
use bastide_core::test_utils::{fixed, new_engine};
use proptest::prelude::*;

/// A lone repeatable producer with the given base cost and build time.
fn producer(
    gold: u64,
    lumber: u64,
    stone: u64,
    construction_time: Ticks,
    effect_amount: f64,
) -> bastide_core::catalog::Catalog {
    let mut builder = CatalogBuilder::new();
    builder
        .add_facility(FacilityDraft {
            key: "pit".to_string(),
            name: "Pit".to_string(),
            description: String::new(),
            category: FacilityCategory::Production,
            base_cost: FacilityCost { gold, lumber, stone, ..Default::default() },
            construction_time,
            max_level: 50,
            repeatable: true,
            production: Some(ProductionDef {
                resource: ResourceKind::Gold,
                amount: fixed(20.0),
                interval: 1,
            }),
            base_capacity: None,
            base_efficiency: None,
            upgrades: Vec::new(),
            requirements: None,
        })
        .unwrap();
    builder
        .add_tech(TechDraft {
            key: "boost".to_string(),
            name: "Boost".to_string(),
            description: String::new(),
            cost: TechCost { research_points: 10, ..Default::default() },
            effects: vec![EffectDraft {
                kind: EffectKind::Production,
                amount: fixed(effect_amount),
                facility: "pit".to_string(),
            }],
            requirements: Vec::new(),
            repeatable: true,
            cost_multiplier: None,
            max_level: 0,
        })
        .unwrap();
    builder.finalize().unwrap()
}

proptest! {
    // Construction finishes in exactly the required number of turns:
    // never fewer, never more, and ends idle with zero progress.
    #[test]
    fn construction_completes_exactly_on_time(
        construction_time in 1u64..20,
        level in 0u32..8,
    ) {
        let catalog = producer(100, 50, 100, construction_time, 1.5);
        let id = catalog.facility_id("pit").unwrap();
        let def = catalog.facility(id).unwrap();

        let required = required_construction_time(def, level).unwrap();
        let mut state = FacilityState::at_level(id, level).begin_construction();

        for turn in 1..=required {
            prop_assert!(state.is_constructing, "finished before turn {turn}");
            state = advance_construction(&state, def);
        }
        prop_assert!(!state.is_constructing);
        prop_assert_eq!(state.level, level + 1);
        prop_assert_eq!(state.construction_progress, 0);
    }

    // The repeatable cost curve is floor(base x 1.5^level) on every field,
    // independent of call site.
    #[test]
    fn repeatable_cost_curve_is_floored_exponential(
        gold in 0u64..10_000,
        lumber in 0u64..10_000,
        stone in 0u64..10_000,
        construction_time in 1u64..50,
        level in 0u32..12,
    ) {
        let catalog = producer(gold, lumber, stone, construction_time, 1.5);
        let def = catalog.facility(catalog.facility_id("pit").unwrap()).unwrap();

        let cost = upgrade_cost(def, level);
        let multiplier = 1.5f64.powi(level as i32);
        prop_assert_eq!(cost.gold, (gold as f64 * multiplier).floor() as u64);
        prop_assert_eq!(cost.lumber, (lumber as f64 * multiplier).floor() as u64);
        prop_assert_eq!(cost.stone, (stone as f64 * multiplier).floor() as u64);
        prop_assert_eq!(
            cost.construction_time,
            (construction_time as f64 * multiplier).floor() as u64
        );
    }

    // Production effects compound exponentially: with an effect of `e` at
    // unlocked level `n`, the output is the base output times e^n.
    #[test]
    fn tech_effects_multiply_exponentially(
        level in 1u32..20,
        tech_level in 0u32..10,
        effect_index in 0usize..3,
    ) {
        let effect = [1.25, 1.5, 2.0][effect_index];
        let catalog = producer(100, 50, 100, 2, effect);
        let def = catalog.facility(catalog.facility_id("pit").unwrap()).unwrap();
        let boost = catalog.tech_id("boost").unwrap();
        let focus = SocietyFocus { production: 4, ..Default::default() };

        let base = production_amount(def, level, &focus, &TechLevels::new(), &catalog);

        let mut techs = TechLevels::new();
        for _ in 0..tech_level {
            techs.raise(boost);
        }
        let boosted = production_amount(def, level, &focus, &techs, &catalog);

        let mut expected = base;
        for _ in 0..tech_level {
            expected = expected * fixed(effect);
        }
        prop_assert_eq!(boosted, expected);
    }

    // No focus update may ever leave the allocation above the population.
    #[test]
    fn focus_allocation_never_exceeds_population(
        updates in proptest::collection::vec(
            (0u32..8, 0u32..20),
            1..20,
        ),
    ) {
        let mut engine = new_engine();
        for (field, value) in updates {
            let mut update = FocusUpdate::default();
            match field % 5 {
                0 => update.growth = Some(value),
                1 => update.production = Some(value),
                2 => update.research = Some(value),
                3 => update.exploration = Some(value),
                _ => update.trade = Some(value),
            }
            engine.update_society_focus(&update);
            let snapshot = engine.snapshot();
            prop_assert!(
                snapshot.focus.total() <= snapshot.resources.population as u64
            );
        }
    }

    // Research is all-or-nothing: a failed attempt changes no ledger field
    // and no tech level.
    #[test]
    fn failed_research_changes_nothing(
        gold in 0u64..250,
        gems in 0u64..250,
        research_points in 0u64..200,
    ) {
        let mut engine = new_engine();
        {
            let state = engine.state_mut();
            state.resources.gold = fixed(gold as f64);
            state.resources.gems = fixed(gems as f64);
            state.resources.research_points = fixed(research_points as f64);
        }
        let prospecting = engine.catalog().tech_id("prospecting").unwrap();

        let before = engine.snapshot().clone();
        let accepted = engine.research_tech(prospecting);

        // Cost: 100 gold, 100 gems, 150 scaled research points.
        let affordable = gold >= 100 && gems >= 100 && research_points >= 150;
        prop_assert_eq!(accepted, affordable);
        if !accepted {
            prop_assert_eq!(engine.snapshot(), &before);
        } else {
            prop_assert_eq!(engine.snapshot().techs.level(prospecting), 1);
        }
    }

    // Ticking the clock any number of times banks exactly one credit per
    // three running ticks.
    #[test]
    fn saved_turns_track_running_ticks(ticks in 0u32..200) {
        let mut engine = new_engine();
        engine.clock_start();
        for _ in 0..ticks {
            engine.clock_tick();
        }
        prop_assert_eq!(engine.snapshot().clock.saved_turns, ticks / 3);
    }
}
