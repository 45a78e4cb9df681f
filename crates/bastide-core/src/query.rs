//! Read-only views over a snapshot: income rates, housing capacity,
//! prerequisite checks, and the front end's selection type.

use crate::catalog::{Catalog, EffectKind, FacilityCategory, FacilityDef};
use crate::facility;
use crate::fixed::{self, Fixed64, Ticks, u64_to_fixed64};
use crate::id::FacilityId;
use crate::ledger::ResourceKind;
use crate::state::GameState;

/// The front end's currently-inspected entity. A closed set; each variant
/// carries exactly the payload its detail view needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Resource(ResourceKind),
    Population,
    SocietyFocus,
    Exploration(String),
    TradeRoute(String),
    Facility(FacilityId),
    ResearchPoints,
}

/// Countdown readout for timer displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockView {
    pub time_left: Ticks,
    pub running: bool,
    pub on_break: bool,
}

/// Per-turn income rate of a resource: the sum over facilities producing
/// it of `amount / interval`. Facilities under construction do not count
/// toward the rate.
pub fn resource_income(kind: ResourceKind, state: &GameState, catalog: &Catalog) -> Fixed64 {
    let mut total = Fixed64::ZERO;
    for (id, facility_state) in &state.facilities {
        let Some(def) = catalog.facility(*id) else { continue };
        let Some(production) = &def.production else { continue };
        if production.resource != kind || facility_state.is_constructing {
            continue;
        }
        let amount = facility::production_amount(
            def,
            facility_state.level,
            &state.focus,
            &state.techs,
            catalog,
        );
        let per_turn = amount
            .checked_div(u64_to_fixed64(production.interval))
            .unwrap_or(Fixed64::ZERO);
        total = total.saturating_add(per_turn);
    }
    total
}

/// Housing capacity: for every population-category facility with a base
/// capacity, level times base capacity, multiplied by any capacity
/// technology effects targeting it. Capacity on other categories (unit
/// capacity on military facilities, say) does not house anyone.
pub fn max_population(state: &GameState, catalog: &Catalog) -> u32 {
    let mut capacity = Fixed64::ZERO;
    for (id, facility_state) in &state.facilities {
        let Some(def) = catalog.facility(*id) else { continue };
        if def.category != FacilityCategory::Population {
            continue;
        }
        let Some(base) = def.base_capacity else { continue };

        let mut housed =
            u64_to_fixed64(base as u64).saturating_mul(u64_to_fixed64(facility_state.level as u64));
        for (tech_id, tech_level) in state.techs.iter() {
            let Some(tech) = catalog.tech(tech_id) else { continue };
            for effect in &tech.effects {
                if effect.kind == EffectKind::Capacity && effect.facility == def.id {
                    housed = housed.saturating_mul(fixed::pow(effect.amount, tech_level));
                }
            }
        }
        capacity = capacity.saturating_add(housed);
    }

    let floored: i64 = capacity.to_num();
    floored.clamp(0, u32::MAX as i64) as u32
}

/// Whether a facility's authored prerequisites are currently satisfied.
/// Definitions without requirements always pass.
pub fn requirements_met(def: &FacilityDef, state: &GameState) -> bool {
    let Some(requirements) = &def.requirements else {
        return true;
    };
    if state.resources.population < requirements.population {
        return false;
    }
    for (facility, level) in &requirements.facilities {
        if state.facility_level(*facility) < *level {
            return false;
        }
    }
    for (tech, level) in &requirements.techs {
        if state.techs.level(*tech) < *level {
            return false;
        }
    }
    true
}
