//! Facility construction and production state machines.
//!
//! Each facility is an independent two-state machine: `Idle` and
//! `UnderConstruction`, with completion returning to `Idle` one level
//! higher. Production is a separate accumulator that fires an output event
//! every `interval` turns. Both advance by exactly one turn per call and
//! never look at any other facility's state.

use crate::catalog::{Catalog, EffectKind, FacilityCost, FacilityDef};
use crate::fixed::{self, Fixed64, Ticks, u64_to_fixed64};
use crate::id::FacilityId;
use crate::ledger::ResourceKind;
use crate::research::TechLevels;
use crate::society::SocietyFocus;
use serde::{Deserialize, Serialize};

/// Per-level cost growth for repeatable facilities.
fn repeat_growth() -> Fixed64 {
    Fixed64::from_num(1.5)
}

/// Dynamic state for one facility instance. Level 0 means "not yet built".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityState {
    pub id: FacilityId,
    pub level: u32,
    /// Accumulated turns toward completing the current build or upgrade.
    pub construction_progress: Ticks,
    pub is_constructing: bool,
    /// Accumulated turns toward the next output event.
    pub production_progress: Ticks,
}

impl FacilityState {
    /// A fresh, unbuilt facility.
    pub fn new(id: FacilityId) -> Self {
        Self {
            id,
            level: 0,
            construction_progress: 0,
            is_constructing: false,
            production_progress: 0,
        }
    }

    /// An already-built facility at the given level.
    pub fn at_level(id: FacilityId, level: u32) -> Self {
        Self { level, ..Self::new(id) }
    }

    /// The same facility with a build in flight. Production progress is
    /// kept; construction progress restarts from zero.
    pub fn begin_construction(&self) -> Self {
        Self {
            construction_progress: 0,
            is_constructing: true,
            ..self.clone()
        }
    }
}

/// Turns of construction needed to take `def` from `level` to `level + 1`
/// (or to build it at all when `level` is 0). `None` means the facility
/// has no further construction path: it is at its ceiling, or no next
/// upgrade step was authored.
pub fn required_construction_time(def: &FacilityDef, level: u32) -> Option<Ticks> {
    if level == 0 {
        return Some(def.construction_time);
    }
    if def.repeatable {
        return Some(upgrade_cost(def, level).construction_time);
    }
    if level >= def.max_level {
        return None;
    }
    def.upgrades.get(level as usize - 1).map(|u| u.construction_time)
}

/// The cost-curve contract shared by the engine's deduction step and every
/// affordability check a front end performs.
///
/// Repeatable facilities scale every numeric field of the base cost by
/// `1.5^level`, floored to an integer. Non-repeatable facilities use the
/// authored upgrade cost at `current_level`, falling back to the base cost
/// when no further upgrade was authored.
pub fn upgrade_cost(def: &FacilityDef, current_level: u32) -> FacilityCost {
    if !def.repeatable {
        return def
            .upgrades
            .get(current_level as usize)
            .map(|u| u.cost.clone())
            .unwrap_or_else(|| def.base_cost.clone());
    }

    let multiplier = fixed::pow(repeat_growth(), current_level);
    FacilityCost {
        gold: fixed::scale_floor(def.base_cost.gold, multiplier),
        gems: fixed::scale_floor(def.base_cost.gems, multiplier),
        lumber: fixed::scale_floor(def.base_cost.lumber, multiplier),
        stone: fixed::scale_floor(def.base_cost.stone, multiplier),
        construction_time: fixed::scale_floor(def.construction_time, multiplier),
    }
}

/// Advance one facility's construction by one turn.
///
/// A no-op unless a build is in flight and a construction path exists.
/// On completion the facility returns to idle at `level + 1` with its
/// progress reset to zero.
pub fn advance_construction(state: &FacilityState, def: &FacilityDef) -> FacilityState {
    if !state.is_constructing {
        return state.clone();
    }
    let Some(required) = required_construction_time(def, state.level) else {
        return state.clone();
    };

    let mut next = state.clone();
    next.construction_progress += 1;
    if next.construction_progress >= required {
        next.is_constructing = false;
        next.construction_progress = 0;
        next.level += 1;
    }
    next
}

/// A single production output event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionYield {
    pub resource: ResourceKind,
    pub amount: Fixed64,
}

/// Output of one production event for `def` at `level`.
///
/// ```text
/// amount = base x efficiency x level
///          x product over production effects of amount^tech_level
///          x focus share (research focus for research points,
///                         production focus otherwise)
/// ```
///
/// Technology effects compound exponentially in the unlocked level; this
/// is what makes repeatable technologies worth repeating.
pub fn production_amount(
    def: &FacilityDef,
    level: u32,
    focus: &SocietyFocus,
    techs: &TechLevels,
    catalog: &Catalog,
) -> Fixed64 {
    let Some(production) = &def.production else {
        return Fixed64::ZERO;
    };

    let mut amount = production
        .amount
        .saturating_mul(def.base_efficiency)
        .saturating_mul(u64_to_fixed64(level as u64));

    for (tech_id, tech_level) in techs.iter() {
        let Some(tech) = catalog.tech(tech_id) else { continue };
        for effect in &tech.effects {
            if effect.kind == EffectKind::Production && effect.facility == def.id {
                amount = amount.saturating_mul(fixed::pow(effect.amount, tech_level));
            }
        }
    }

    let focus_share = if production.resource == ResourceKind::ResearchPoints {
        focus.research
    } else {
        focus.production
    };
    amount.saturating_mul(u64_to_fixed64(focus_share as u64))
}

/// Advance one facility's production accumulator by one turn.
///
/// A no-op for facilities without production. Returns the new accumulator
/// value and the output event that fired this turn, if any.
pub fn advance_production(
    state: &FacilityState,
    def: &FacilityDef,
    focus: &SocietyFocus,
    techs: &TechLevels,
    catalog: &Catalog,
) -> (Ticks, Option<ProductionYield>) {
    let Some(production) = &def.production else {
        return (state.production_progress, None);
    };

    let progress = state.production_progress + 1;
    if progress < production.interval {
        return (progress, None);
    }

    let amount = production_amount(def, state.level, focus, techs, catalog);
    (0, Some(ProductionYield { resource: production.resource, amount }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::f64_to_fixed64;
    use crate::test_utils::*;

    #[test]
    fn construction_takes_exactly_the_required_turns() {
        let catalog = base_catalog();
        let def = catalog.facility(catalog.facility_id("mine").unwrap()).unwrap();

        // constructionTime is 2: two turns to finish, never one, never three.
        let mut state = FacilityState::new(def.id).begin_construction();
        state = advance_construction(&state, def);
        assert!(state.is_constructing);
        assert_eq!(state.level, 0);

        state = advance_construction(&state, def);
        assert!(!state.is_constructing);
        assert_eq!(state.level, 1);
        assert_eq!(state.construction_progress, 0);

        // A third call is a no-op without a new build request.
        let after = advance_construction(&state, def);
        assert_eq!(after, state);
    }

    #[test]
    fn construction_is_inert_when_idle() {
        let catalog = base_catalog();
        let def = catalog.facility(catalog.facility_id("mine").unwrap()).unwrap();
        let state = FacilityState::at_level(def.id, 3);
        assert_eq!(advance_construction(&state, def), state);
    }

    #[test]
    fn non_repeatable_without_next_upgrade_never_completes() {
        let catalog = base_catalog();
        let def = catalog.facility(catalog.facility_id("watchtower").unwrap()).unwrap();

        // Two upgrade steps are authored; level 3 has no path onward.
        let mut state = FacilityState::at_level(def.id, 3).begin_construction();
        for _ in 0..10 {
            state = advance_construction(&state, def);
        }
        assert_eq!(state.level, 3);
        assert_eq!(state.construction_progress, 0);
        assert!(state.is_constructing);
    }

    #[test]
    fn repeatable_cost_curve_scales_every_field() {
        let catalog = base_catalog();
        let def = catalog.facility(catalog.facility_id("mine").unwrap()).unwrap();

        let at_zero = upgrade_cost(def, 0);
        assert_eq!(at_zero.gold, def.base_cost.gold);
        assert_eq!(at_zero.lumber, def.base_cost.lumber);
        assert_eq!(at_zero.stone, def.base_cost.stone);
        assert_eq!(at_zero.construction_time, def.construction_time);

        // 1.5^2 = 2.25; every field floors independently.
        let at_two = upgrade_cost(def, 2);
        assert_eq!(at_two.gold, 225);
        assert_eq!(at_two.lumber, 112);
        assert_eq!(at_two.stone, 225);
        assert_eq!(at_two.construction_time, 4);
    }

    #[test]
    fn authored_upgrade_cost_with_base_fallback() {
        let catalog = base_catalog();
        let def = catalog.facility(catalog.facility_id("watchtower").unwrap()).unwrap();

        assert_eq!(upgrade_cost(def, 0), def.upgrades[0].cost);
        assert_eq!(upgrade_cost(def, 1), def.upgrades[1].cost);
        // Past the authored list, the base cost is the fallback.
        assert_eq!(upgrade_cost(def, 2), def.base_cost);
    }

    #[test]
    fn production_fires_every_interval() {
        let catalog = base_catalog();
        let def = catalog.facility(catalog.facility_id("watchtower").unwrap()).unwrap();
        // Watchtower has no production at all.
        let state = FacilityState::at_level(def.id, 1);
        let (progress, fired) =
            advance_production(&state, def, &focus(), &TechLevels::new(), &catalog);
        assert_eq!(progress, 0);
        assert!(fired.is_none());

        let def = catalog.facility(catalog.facility_id("library").unwrap()).unwrap();
        let mut state = FacilityState::at_level(def.id, 1);

        // Interval 2: first turn accumulates, second fires.
        let (progress, fired) =
            advance_production(&state, def, &focus(), &TechLevels::new(), &catalog);
        assert_eq!(progress, 1);
        assert!(fired.is_none());
        state.production_progress = progress;

        let (progress, fired) =
            advance_production(&state, def, &focus(), &TechLevels::new(), &catalog);
        assert_eq!(progress, 0);
        let fired = fired.unwrap();
        assert_eq!(fired.resource, ResourceKind::ResearchPoints);
        // 1 x efficiency 1 x level 1 x research focus 2.
        assert_eq!(fired.amount, f64_to_fixed64(2.0));
    }

    #[test]
    fn tech_effects_compound_exponentially() {
        let catalog = base_catalog();
        let mine = catalog.facility_id("mine").unwrap();
        let def = catalog.facility(mine).unwrap();
        let prospecting = catalog.tech_id("prospecting").unwrap();

        let mut techs = TechLevels::new();
        let base = production_amount(def, 2, &focus(), &techs, &catalog);

        techs.raise(prospecting);
        techs.raise(prospecting);
        techs.raise(prospecting);
        let boosted = production_amount(def, 2, &focus(), &techs, &catalog);

        // effect 1.5 at level 3: base x 1.5^3.
        assert_eq!(boosted, base.saturating_mul(crate::fixed::pow(f64_to_fixed64(1.5), 3)));
    }

    #[test]
    fn level_zero_produces_nothing() {
        let catalog = base_catalog();
        let def = catalog.facility(catalog.facility_id("mine").unwrap()).unwrap();
        let amount = production_amount(def, 0, &focus(), &TechLevels::new(), &catalog);
        assert_eq!(amount, Fixed64::ZERO);
    }
}
