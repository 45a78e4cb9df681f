//! Bastide Core -- the economy simulation engine for a turn-based
//! settlement builder driven by a focus countdown.
//!
//! The engine owns a single [`state::GameState`] snapshot and a frozen
//! [`catalog::Catalog`] of facility and technology definitions. A front end
//! never writes state directly: it reads the current snapshot and submits
//! commands through [`engine::Engine`].
//!
//! # Turn Pipeline
//!
//! Each call to [`engine::Engine::advance_turn`] advances the settlement by
//! one turn through the following phases:
//!
//! 1. **Construction** -- every facility under construction gains one turn
//!    of progress; completed builds raise the facility level.
//! 2. **Production** -- every producing facility gains one turn toward its
//!    next output event; events that fire credit the resource ledger.
//! 3. **Growth** -- population grows by the growth focus, capped by housing
//!    capacity.
//! 4. **Bookkeeping** -- the turn counter increments and the work/break
//!    flag flips.
//!
//! Phases 1 and 2 read the pre-turn snapshot, so a facility completing
//! construction mid-turn still produces at its pre-turn level.
//!
//! # Snapshot Discipline
//!
//! Commands never mutate a published snapshot in place. Each command builds
//! a new snapshot from the current one and publishes it with a single
//! assignment, so a reader holding the previous snapshot never observes a
//! half-applied command.
//!
//! # Key Types
//!
//! - [`engine::Engine`] -- command surface and turn scheduler.
//! - [`catalog::Catalog`] -- immutable facility/technology definitions
//!   (frozen at startup, interned string keys).
//! - [`state::GameState`] -- the aggregate mutable snapshot.
//! - [`clock::ClockState`] -- the work/break countdown that banks turns.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`event::EngineEvent`] -- drainable buffer of observable changes.

pub mod catalog;
pub mod clock;
pub mod engine;
pub mod event;
pub mod facility;
pub mod fixed;
pub mod hash;
pub mod id;
pub mod ledger;
pub mod query;
pub mod research;
pub mod society;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
