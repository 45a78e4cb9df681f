//! The aggregate game snapshot.

use crate::clock::{ClockConfig, ClockState, Phase};
use crate::facility::FacilityState;
use crate::hash::StateHash;
use crate::id::FacilityId;
use crate::ledger::ResourceLedger;
use crate::research::TechLevels;
use crate::society::SocietyFocus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An outbound caravan toward a named destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRoute {
    pub destination: String,
    pub progress: u64,
    pub active: bool,
    pub repeat: bool,
}

/// A party sent out to survey the surroundings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exploration {
    pub kind: String,
    pub progress: u64,
    pub units: Vec<String>,
    pub equipment: Vec<String>,
}

/// The complete mutable game snapshot.
///
/// All mutation flows through engine commands; a front end reads a
/// snapshot and submits commands, never writing fields directly. Maps are
/// ordered so that iteration, hashing, and serialization are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub resources: ResourceLedger,
    pub facilities: BTreeMap<FacilityId, FacilityState>,
    pub techs: TechLevels,
    pub focus: SocietyFocus,
    pub trade_routes: BTreeMap<String, TradeRoute>,
    pub explorations: BTreeMap<String, Exploration>,
    /// Completed-turn counter, starting at 1.
    pub turn: u64,
    /// Scheduler-side work/break flag, flipped once per turn.
    pub work_phase: bool,
    pub clock: ClockState,
}

impl GameState {
    /// An empty settlement on turn 1, in the work phase, with a stopped
    /// clock.
    pub fn new(clock: ClockConfig) -> Self {
        Self {
            resources: ResourceLedger::new(),
            facilities: BTreeMap::new(),
            techs: TechLevels::new(),
            focus: SocietyFocus::default(),
            trade_routes: BTreeMap::new(),
            explorations: BTreeMap::new(),
            turn: 1,
            work_phase: true,
            clock: ClockState::new(clock),
        }
    }

    /// Current level of a facility; 0 when it has never been started.
    pub fn facility_level(&self, id: FacilityId) -> u32 {
        self.facilities.get(&id).map(|f| f.level).unwrap_or(0)
    }

    /// Deterministic FNV-1a digest of the snapshot, for desync detection.
    pub fn state_hash(&self) -> u64 {
        let mut hash = StateHash::new();

        hash.write_fixed64(self.resources.gold);
        hash.write_fixed64(self.resources.gems);
        hash.write_fixed64(self.resources.lumber);
        hash.write_fixed64(self.resources.stone);
        hash.write_u32(self.resources.population);
        hash.write_u32(self.resources.soldiers);
        hash.write_fixed64(self.resources.research_points);

        hash.write_u64(self.facilities.len() as u64);
        for (id, facility) in &self.facilities {
            hash.write_u32(id.0);
            hash.write_u32(facility.level);
            hash.write_u64(facility.construction_progress);
            hash.write_bool(facility.is_constructing);
            hash.write_u64(facility.production_progress);
        }

        for (tech, level) in self.techs.iter() {
            hash.write_u32(tech.0);
            hash.write_u32(level);
        }

        hash.write_u32(self.focus.growth);
        hash.write_u32(self.focus.production);
        hash.write_u32(self.focus.research);
        hash.write_u32(self.focus.exploration);
        hash.write_u32(self.focus.trade);

        for (key, route) in &self.trade_routes {
            hash.write_str(key);
            hash.write_str(&route.destination);
            hash.write_u64(route.progress);
            hash.write_bool(route.active);
            hash.write_bool(route.repeat);
        }
        for (key, exploration) in &self.explorations {
            hash.write_str(key);
            hash.write_str(&exploration.kind);
            hash.write_u64(exploration.progress);
        }

        hash.write_u64(self.turn);
        hash.write_bool(self.work_phase);
        hash.write_bool(self.clock.running);
        hash.write_bool(self.clock.phase == Phase::Work);
        hash.write_u64(self.clock.time_left);
        hash.write_u32(self.clock.saved_turns);

        hash.finish()
    }
}
