//! The command surface and the turn scheduler.
//!
//! The engine owns the current snapshot. Every command derives a new
//! snapshot from it and publishes the result with a single assignment;
//! nothing ever mutates a snapshot a reader may already hold. Commands
//! run to completion before the next is admitted -- there is one logical
//! thread of control and no suspension point inside a command.
//!
//! User-triggered economic actions fail silently or return `false`;
//! operating on an unknown id, a facility past its ceiling, or an entry
//! lacking a next authored upgrade leaves the snapshot untouched without
//! raising anything.

use crate::catalog::{Catalog, FacilityCost};
use crate::clock::{ALARM_TICKS, Phase};
use crate::event::EngineEvent;
use crate::facility::{self, FacilityState};
use crate::fixed::Fixed64;
use crate::id::{FacilityId, TechId};
use crate::ledger::ResourceKind;
use crate::query::{self, ClockView};
use crate::research;
use crate::society::{self, FocusUpdate};
use crate::state::{Exploration, GameState, TradeRoute};

/// The simulation engine: one frozen catalog, one live snapshot, and a
/// drainable event buffer.
pub struct Engine {
    catalog: Catalog,
    state: GameState,
    events: Vec<EngineEvent>,
}

impl Engine {
    pub fn new(catalog: Catalog, state: GameState) -> Self {
        Self { catalog, state, events: Vec::new() }
    }

    /// The static definitions this engine runs against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current snapshot. Read-only; submit commands to change it.
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    /// Direct snapshot access for test setup.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    // -- Construction commands --

    /// Put a facility under construction, creating its state entry if it
    /// was never started. No cost is deducted and no eligibility is
    /// checked; a no-op for unknown definitions.
    pub fn start_construction(&mut self, id: FacilityId) {
        if self.catalog.facility(id).is_none() {
            return;
        }
        let mut next = self.state.clone();
        let entry = next.facilities.entry(id).or_insert_with(|| FacilityState::new(id));
        *entry = entry.begin_construction();
        let turn = next.turn;
        self.state = next;
        self.events.push(EngineEvent::ConstructionStarted { facility: id, turn });
    }

    /// Whether an upgrade request would be accepted right now: the
    /// facility exists, is not already constructing, has a construction
    /// path left, and the upgrade cost is covered.
    pub fn can_upgrade(&self, id: FacilityId) -> bool {
        let Some(def) = self.catalog.facility(id) else { return false };
        let Some(state) = self.state.facilities.get(&id) else { return false };
        if state.is_constructing {
            return false;
        }
        if !def.repeatable {
            if state.level >= def.max_level {
                return false;
            }
            // The next authored step must exist; level 0 builds go through
            // start_construction instead.
            if state.level == 0 || def.upgrades.get(state.level as usize - 1).is_none() {
                return false;
            }
        }
        self.state.resources.can_afford(&facility::upgrade_cost(def, state.level))
    }

    /// Deduct the upgrade cost up front and put the facility under
    /// construction. Returns whether the upgrade was accepted.
    pub fn upgrade_facility(&mut self, id: FacilityId) -> bool {
        if !self.can_upgrade(id) {
            return false;
        }
        let Some(def) = self.catalog.facility(id) else { return false };
        let Some(state) = self.state.facilities.get(&id) else { return false };
        let cost = facility::upgrade_cost(def, state.level);

        let mut next = self.state.clone();
        next.resources.debit(&cost);
        if let Some(entry) = next.facilities.get_mut(&id) {
            *entry = entry.begin_construction();
        }
        let turn = next.turn;
        self.state = next;
        self.events.push(EngineEvent::ConstructionStarted { facility: id, turn });
        true
    }

    /// The price the next upgrade of a facility would charge, for
    /// affordability displays. Identical to what the deduction uses.
    pub fn upgrade_cost_of(&self, id: FacilityId) -> Option<FacilityCost> {
        let def = self.catalog.facility(id)?;
        Some(facility::upgrade_cost(def, self.state.facility_level(id)))
    }

    // -- Research commands --

    /// Validate and apply one research. Returns whether it succeeded; on
    /// failure nothing changes.
    pub fn research_tech(&mut self, id: TechId) -> bool {
        let Some(def) = self.catalog.tech(id) else { return false };
        let current = self.state.techs.level(id);
        if !research::can_research(
            def,
            current,
            &self.state.resources,
            &self.state.techs,
            &self.state.facilities,
        ) {
            return false;
        }

        let mut next = self.state.clone();
        research::apply_research(def, &mut next.resources, &mut next.techs);
        let turn = next.turn;
        self.state = next;
        self.events.push(EngineEvent::ResearchCompleted { tech: id, level: current + 1, turn });
        true
    }

    // -- Society commands --

    /// Reallocate the society focus. Rejected in full when the resulting
    /// total exceeds the current population.
    pub fn update_society_focus(&mut self, update: &FocusUpdate) -> bool {
        let merged = self.state.focus.with_update(update);
        if merged.total() > self.state.resources.population as u64 {
            return false;
        }
        let mut next = self.state.clone();
        next.focus = merged;
        self.state = next;
        true
    }

    // -- Trade and exploration commands --

    /// Open a trade route toward `destination`.
    pub fn start_trade_route(&mut self, key: &str, destination: &str) {
        let mut next = self.state.clone();
        next.trade_routes.insert(
            key.to_string(),
            TradeRoute {
                destination: destination.to_string(),
                progress: 0,
                active: true,
                repeat: false,
            },
        );
        self.state = next;
    }

    /// Send out an exploration party of the given kind.
    pub fn start_exploration(&mut self, key: &str, kind: &str) {
        let mut next = self.state.clone();
        next.explorations.insert(
            key.to_string(),
            Exploration {
                kind: kind.to_string(),
                progress: 0,
                units: Vec::new(),
                equipment: Vec::new(),
            },
        );
        self.state = next;
    }

    // -- Turn scheduler --

    /// Advance the whole settlement by one turn.
    ///
    /// Every facility runs construction, then production, against the
    /// pre-turn snapshot: a facility finishing its build this turn still
    /// produces at its pre-turn level, and no facility sees another's
    /// same-turn changes. Afterwards the population grows by the growth
    /// focus (capped by housing capacity), the turn counter increments,
    /// and the work/break flag flips.
    pub fn advance_turn(&mut self) {
        let prev = self.state.clone();
        let mut next = prev.clone();

        for (id, before) in &prev.facilities {
            let Some(def) = self.catalog.facility(*id) else { continue };

            let mut after = facility::advance_construction(before, def);
            let (progress, yielded) =
                facility::advance_production(before, def, &prev.focus, &prev.techs, &self.catalog);
            after.production_progress = progress;

            if after.level > before.level {
                self.events.push(EngineEvent::ConstructionCompleted {
                    facility: *id,
                    level: after.level,
                    turn: prev.turn,
                });
            }
            if let Some(yielded) = yielded {
                next.resources.credit_production(yielded.resource, yielded.amount);
                if yielded.amount > Fixed64::ZERO {
                    self.events.push(EngineEvent::ProductionYielded {
                        facility: *id,
                        resource: yielded.resource,
                        amount: yielded.amount,
                        turn: prev.turn,
                    });
                }
            }

            next.facilities.insert(*id, after);
        }

        let capacity = query::max_population(&next, &self.catalog);
        next.resources.population =
            society::grown_population(next.resources.population, prev.focus.growth, capacity);

        next.turn += 1;
        next.work_phase = !next.work_phase;
        let turn = next.turn;
        self.state = next;
        self.events.push(EngineEvent::TurnAdvanced { turn });
    }

    /// Spend one banked turn credit on one turn advance. Returns `false`
    /// (and changes nothing) when no credit is banked. Batch redemption is
    /// a caller-level loop.
    pub fn redeem_saved_turn(&mut self) -> bool {
        let Some(clock) = self.state.clock.spend_saved_turn() else {
            return false;
        };
        let mut next = self.state.clone();
        next.clock = clock;
        self.state = next;
        self.advance_turn();
        true
    }

    // -- Clock commands --

    pub fn clock_start(&mut self) {
        self.replace_clock(self.state.clock.started());
    }

    pub fn clock_stop(&mut self) {
        self.replace_clock(self.state.clock.stopped());
    }

    pub fn clock_reset(&mut self) {
        self.replace_clock(self.state.clock.reset());
    }

    pub fn clock_skip(&mut self) {
        self.replace_clock(self.state.clock.skipped());
    }

    /// One countdown tick. Phase completions and the end-of-work alarm
    /// surface as events.
    pub fn clock_tick(&mut self) {
        let (clock, outcome) = self.state.clock.ticked();
        self.replace_clock(clock);
        if let Some(ended) = outcome.completed {
            self.events.push(EngineEvent::PhaseCompleted { ended });
            if ended == Phase::Work {
                self.events.push(EngineEvent::AlarmStarted { duration: ALARM_TICKS });
            }
        }
    }

    /// Countdown readout for timer displays.
    pub fn clock_view(&self) -> ClockView {
        ClockView {
            time_left: self.state.clock.time_left,
            running: self.state.clock.running,
            on_break: self.state.clock.phase == Phase::Break,
        }
    }

    fn replace_clock(&mut self, clock: crate::clock::ClockState) {
        let mut next = self.state.clone();
        next.clock = clock;
        self.state = next;
    }

    // -- Queries --

    /// Per-turn income rate of a resource. See [`query::resource_income`].
    pub fn resource_income(&self, kind: ResourceKind) -> Fixed64 {
        query::resource_income(kind, &self.state, &self.catalog)
    }

    /// Current housing capacity. See [`query::max_population`].
    pub fn max_population(&self) -> u32 {
        query::max_population(&self.state, &self.catalog)
    }

    /// Whether a facility's authored prerequisites are satisfied. Unknown
    /// ids read as unmet.
    pub fn requirements_met(&self, id: FacilityId) -> bool {
        self.catalog
            .facility(id)
            .map(|def| query::requirements_met(def, &self.state))
            .unwrap_or(false)
    }

    // -- Events --

    /// Drain all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// A read-only view of pending events.
    pub fn pending_events(&self) -> &[EngineEvent] {
        &self.events
    }
}
