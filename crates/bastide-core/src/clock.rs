//! The focus countdown that banks turns for the settlement.
//!
//! The clock alternates between a work phase and a break phase. While it
//! runs, the countdown drops by one each tick, and every
//! [`TICKS_PER_SAVED_TURN`] running ticks one turn credit is banked. When
//! the countdown crosses zero the phase flips, the countdown resets to the
//! new phase's duration, and -- when the ended phase was work -- an alarm
//! is due for [`ALARM_TICKS`].
//!
//! The clock never advances turns itself. Banked credits are spent one at
//! a time through the engine, so one credit always corresponds to exactly
//! one turn.

use crate::fixed::Ticks;
use serde::{Deserialize, Serialize};

/// Running ticks between two banked turn credits.
pub const TICKS_PER_SAVED_TURN: u32 = 3;

/// How long the end-of-work alarm sounds, in ticks.
pub const ALARM_TICKS: Ticks = 10;

/// The two countdown phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn flipped(self) -> Phase {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }
}

/// Configured phase lengths, in countdown ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    pub work_duration: Ticks,
    pub break_duration: Ticks,
}

impl ClockConfig {
    pub fn duration(&self, phase: Phase) -> Ticks {
        match phase {
            Phase::Work => self.work_duration,
            Phase::Break => self.break_duration,
        }
    }
}

/// What a tick did beyond counting down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// A turn credit was banked this tick.
    pub banked_turn: bool,
    /// The phase that just ended, when the countdown crossed zero.
    pub completed: Option<Phase>,
}

/// The countdown itself. Stopped or running; stopping freezes the
/// countdown where it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockState {
    pub config: ClockConfig,
    pub phase: Phase,
    pub time_left: Ticks,
    pub running: bool,
    /// Banked turn credits, spent one per turn advance.
    pub saved_turns: u32,
    /// Running ticks since the last banked credit. Lives on the clock
    /// state itself so independent clocks never share a counter.
    save_counter: u32,
}

impl ClockState {
    /// A stopped clock at the start of a work phase.
    pub fn new(config: ClockConfig) -> Self {
        Self {
            config,
            phase: Phase::Work,
            time_left: config.work_duration,
            running: false,
            saved_turns: 0,
            save_counter: 0,
        }
    }

    /// The clock, running. The countdown resumes where it was frozen.
    pub fn started(&self) -> Self {
        Self { running: true, ..self.clone() }
    }

    /// The clock, stopped, with the countdown frozen in place.
    pub fn stopped(&self) -> Self {
        Self { running: false, ..self.clone() }
    }

    /// The clock forced back to a stopped work phase with a full
    /// countdown. Banked credits are kept.
    pub fn reset(&self) -> Self {
        Self {
            phase: Phase::Work,
            time_left: self.config.work_duration,
            running: false,
            ..self.clone()
        }
    }

    /// The clock with the phase flipped and the countdown reset,
    /// regardless of time remaining. Stops the clock.
    pub fn skipped(&self) -> Self {
        let phase = self.phase.flipped();
        Self {
            phase,
            time_left: self.config.duration(phase),
            running: false,
            ..self.clone()
        }
    }

    /// One countdown tick. A no-op while stopped.
    pub fn ticked(&self) -> (ClockState, TickOutcome) {
        if !self.running {
            return (self.clone(), TickOutcome::default());
        }

        let mut next = self.clone();
        let mut outcome = TickOutcome::default();

        next.time_left = next.time_left.saturating_sub(1);
        next.save_counter += 1;
        if next.save_counter >= TICKS_PER_SAVED_TURN {
            next.save_counter = 0;
            next.saved_turns += 1;
            outcome.banked_turn = true;
        }

        if next.time_left == 0 {
            let ended = next.phase;
            next.phase = ended.flipped();
            next.time_left = next.config.duration(next.phase);
            outcome.completed = Some(ended);
        }

        (next, outcome)
    }

    /// Spend one banked credit. `None` when nothing is banked.
    pub fn spend_saved_turn(&self) -> Option<ClockState> {
        if self.saved_turns == 0 {
            return None;
        }
        Some(Self { saved_turns: self.saved_turns - 1, ..self.clone() })
    }
}

/// Folds wall-clock time into whole clock ticks, carrying the remainder
/// forward. The countdown itself never sees partial ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickAccumulator {
    carry_ms: u64,
}

impl TickAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `elapsed_ms` of real time and return how many whole ticks of
    /// length `tick_ms` fit, keeping the remainder for the next call.
    pub fn advance(&mut self, elapsed_ms: u64, tick_ms: u64) -> u64 {
        if tick_ms == 0 {
            return 0;
        }
        self.carry_ms += elapsed_ms;
        let ticks = self.carry_ms / tick_ms;
        self.carry_ms %= tick_ms;
        ticks
    }
}
