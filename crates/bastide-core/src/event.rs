//! Engine events: observable state changes, buffered per command and
//! drained by the embedding. Events are transient; they are not part of
//! the snapshot and are never serialized.

use crate::clock::Phase;
use crate::fixed::{Fixed64, Ticks};
use crate::id::{FacilityId, TechId};
use crate::ledger::ResourceKind;

/// An observable state change.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A build or upgrade entered the construction queue.
    ConstructionStarted { facility: FacilityId, turn: u64 },

    /// A build or upgrade finished; the facility now sits at `level`.
    ConstructionCompleted { facility: FacilityId, level: u32, turn: u64 },

    /// A production interval elapsed and paid out.
    ProductionYielded {
        facility: FacilityId,
        resource: ResourceKind,
        amount: Fixed64,
        turn: u64,
    },

    /// A technology reached `level`.
    ResearchCompleted { tech: TechId, level: u32, turn: u64 },

    /// The turn counter moved to `turn`.
    TurnAdvanced { turn: u64 },

    /// A countdown phase ran out.
    PhaseCompleted { ended: Phase },

    /// The end-of-work alarm should sound for `duration` ticks.
    AlarmStarted { duration: Ticks },
}
